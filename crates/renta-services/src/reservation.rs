//! Reservation workflow
//!
//! Turns a validated cart into a persisted booking aggregate. All prices
//! are recomputed server-side from the submitted per-line figures; client
//! totals are never trusted. Creation is all-or-nothing through the
//! repository transaction, and reads are scoped to the owning renter
//! unless the caller is an admin.

use crate::booking_lock::BookingLockManager;
use crate::pricing;
use chrono::{NaiveDate, Utc};
use renta_core::config::BookingConfig;
use renta_core::models::{
    Booking, BookingAggregate, BookingCustomer, BookingLine, BookingStatus, BookingSummary,
    DeliveryMode, Principal,
};
use renta_core::traits::{BookingRepository, IdentityRepository};
use renta_core::{AppError, AppResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// One cart line as submitted by the renter
///
/// Carries the price snapshot the client displayed; the server recomputes
/// every subtotal and total from these unit figures.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub item_id: Uuid,
    pub host_id: Uuid,
    pub name: String,
    pub quantity: i32,
    /// Rental price per unit per day, minor units
    pub price_per_day: i64,
    /// Deposit per unit, minor units
    pub deposit_per_unit: i64,
}

/// Renter contact details to snapshot onto the booking
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: Option<String>,
}

/// A reservation request after transport-level validation
#[derive(Debug, Clone, Deserialize)]
pub struct NewReservation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub delivery: DeliveryMode,
    pub lines: Vec<CartLine>,
    pub customer: CustomerDetails,
    /// Discount in minor units, defaults to zero
    #[serde(default)]
    pub discount: i64,
}

/// Booking creation and read operations
pub struct ReservationService<I, B>
where
    I: IdentityRepository + ?Sized,
    B: BookingRepository + ?Sized,
{
    identity_repo: Arc<I>,
    booking_repo: Arc<B>,
    lock: BookingLockManager,
    policy: BookingConfig,
}

impl<I, B> Clone for ReservationService<I, B>
where
    I: IdentityRepository + ?Sized,
    B: BookingRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            identity_repo: self.identity_repo.clone(),
            booking_repo: self.booking_repo.clone(),
            lock: self.lock,
            policy: self.policy.clone(),
        }
    }
}

impl<I, B> ReservationService<I, B>
where
    I: IdentityRepository + ?Sized,
    B: BookingRepository + ?Sized,
{
    pub fn new(identity_repo: Arc<I>, booking_repo: Arc<B>, policy: BookingConfig) -> Self {
        let lock = BookingLockManager::new(policy.lock_window_minutes);
        Self {
            identity_repo,
            booking_repo,
            lock,
            policy,
        }
    }

    /// Create a booking from a cart
    ///
    /// Validates the cart, gates on identity verification when the
    /// deployment requires it, recomputes pricing server-side, stamps
    /// the payment lock window and persists the aggregate atomically.
    #[instrument(skip(self, request), fields(renter_id = %principal.user_id))]
    pub async fn create_reservation(
        &self,
        principal: &Principal,
        request: NewReservation,
    ) -> AppResult<BookingAggregate> {
        self.validate_cart(&request)?;

        let host_id = request.lines[0].host_id;

        let identity = self
            .identity_repo
            .find_latest_by_renter(principal.user_id)
            .await?;

        if self.policy.require_verified_identity
            && !identity.as_ref().map(|r| r.is_approved()).unwrap_or(false)
        {
            warn!("Booking attempted without approved identity");
            return Err(AppError::IdentityNotVerified(
                principal.user_id.to_string(),
            ));
        }

        let total_days = self.billable_days(request.start_date, request.end_date);

        let now = Utc::now();
        let booking_id = Uuid::new_v4();

        let lines = request
            .lines
            .iter()
            .map(|line| {
                // Client-supplied prices; checked math keeps a hostile
                // cart from wrapping into garbage totals
                let quantity = i64::from(line.quantity);
                let subtotal_rental = line
                    .price_per_day
                    .checked_mul(quantity)
                    .and_then(|v| v.checked_mul(total_days))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "rental subtotal for item '{}' is too large",
                            line.name
                        ))
                    })?;
                let subtotal_deposit =
                    line.deposit_per_unit.checked_mul(quantity).ok_or_else(|| {
                        AppError::Validation(format!(
                            "deposit subtotal for item '{}' is too large",
                            line.name
                        ))
                    })?;

                Ok(BookingLine {
                    id: Uuid::new_v4(),
                    booking_id,
                    item_id: line.item_id,
                    host_id: line.host_id,
                    name: line.name.clone(),
                    quantity: line.quantity,
                    price_per_day: line.price_per_day,
                    deposit_per_unit: line.deposit_per_unit,
                    subtotal_rental,
                    subtotal_deposit,
                })
            })
            .collect::<AppResult<Vec<BookingLine>>>()?;

        let quote = pricing::price(&lines, request.discount)?;

        let booking = Booking {
            id: booking_id,
            renter_id: principal.user_id,
            host_id,
            status: BookingStatus::PendingPayment,
            locked_until: self.lock.lock_expiry(now),
            start_date: request.start_date,
            end_date: request.end_date,
            total_days,
            delivery: request.delivery,
            rental_subtotal: quote.rental,
            deposit_subtotal: quote.deposit,
            discount: request.discount,
            total: quote.total,
            outstanding: quote.outstanding,
            identity_id: identity.as_ref().map(|r| r.id),
            identity_status: identity.as_ref().map(|r| r.status),
            created_at: now,
            updated_at: now,
        };

        let customer = BookingCustomer {
            id: Uuid::new_v4(),
            booking_id,
            full_name: request.customer.full_name,
            phone: request.customer.phone,
            email: request.customer.email,
            address: request.customer.address,
            notes: request.customer.notes,
        };

        let aggregate = self
            .booking_repo
            .create_aggregate(&booking, &lines, &customer)
            .await?;

        info!(
            booking_id = %aggregate.booking.id,
            total = aggregate.booking.total,
            locked_until = %aggregate.booking.locked_until,
            "Booking created"
        );

        Ok(aggregate)
    }

    /// Fetch a booking aggregate
    ///
    /// Only the owning renter or an admin may read it; for anyone else
    /// the booking does not exist.
    #[instrument(skip(self), fields(caller_id = %principal.user_id, booking_id = %id))]
    pub async fn get_booking(&self, principal: &Principal, id: Uuid) -> AppResult<BookingAggregate> {
        let aggregate = self
            .booking_repo
            .find_aggregate(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

        if aggregate.booking.renter_id != principal.user_id && !principal.is_admin() {
            warn!("Booking access denied for non-owner");
            return Err(AppError::BookingNotFound(id.to_string()));
        }

        Ok(aggregate)
    }

    /// List the caller's bookings, newest first
    #[instrument(skip(self), fields(renter_id = %principal.user_id))]
    pub async fn list_bookings(&self, principal: &Principal) -> AppResult<Vec<BookingSummary>> {
        self.booking_repo
            .list_summaries_by_renter(principal.user_id)
            .await
    }

    /// Inclusive day count, floored at the configured minimum
    fn billable_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        ((end - start).num_days() + 1).max(self.policy.min_billable_days)
    }

    fn validate_cart(&self, request: &NewReservation) -> AppResult<()> {
        if request.lines.is_empty() {
            return Err(AppError::Validation("cart must not be empty".to_string()));
        }

        if request.end_date < request.start_date {
            return Err(AppError::InvalidInput(
                "end date must not precede start date".to_string(),
            ));
        }

        for line in &request.lines {
            if line.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "quantity for item '{}' must be positive",
                    line.name
                )));
            }
            if line.price_per_day < 0 || line.deposit_per_unit < 0 {
                return Err(AppError::Validation(format!(
                    "prices for item '{}' must not be negative",
                    line.name
                )));
            }
        }

        let host_id = request.lines[0].host_id;
        if request.lines.iter().any(|l| l.host_id != host_id) {
            return Err(AppError::InvalidInput(
                "all items in a booking must belong to the same host".to_string(),
            ));
        }

        Ok(())
    }
}
