//! Booking aggregate models
//!
//! A booking is the priced, time-bounded record of a renter's intent to
//! rent one or more catalog items. It is always created and read together
//! with its line items and the renter snapshot taken at booking time.
//!
//! All money fields are non-negative integers in the smallest currency
//! unit. Invariants: `total == rental_subtotal + deposit_subtotal -
//! discount` and `outstanding == total` at creation.

use crate::models::IdentityStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Booking status
///
/// Bookings are created in `PendingPayment`; later transitions are driven
/// by the payment flow and are not part of the reservation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, waiting for payment within the lock window
    #[default]
    PendingPayment,
    /// Payment completed
    Confirmed,
    /// Cancelled by the renter or staff
    Cancelled,
    /// Lock window elapsed without payment
    Expired,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::PendingPayment => write!(f, "pending_payment"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Expired => write!(f, "expired"),
        }
    }
}

impl BookingStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending_payment" => Some(BookingStatus::PendingPayment),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "expired" => Some(BookingStatus::Expired),
            _ => None,
        }
    }
}

/// How the rented items reach the renter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Renter picks the items up from the host
    #[default]
    Pickup,
    /// Host delivers the items
    Delivery,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Pickup => write!(f, "pickup"),
            DeliveryMode::Delivery => write!(f, "delivery"),
        }
    }
}

impl DeliveryMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pickup" => Some(DeliveryMode::Pickup),
            "delivery" => Some(DeliveryMode::Delivery),
            _ => None,
        }
    }
}

/// Booking aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: Uuid,

    /// Renter who created the booking
    pub renter_id: Uuid,

    /// Host owning the booked items (single host per booking)
    pub host_id: Uuid,

    /// Current status
    pub status: BookingStatus,

    /// End of the payment lock window
    pub locked_until: DateTime<Utc>,

    /// First rental day (inclusive)
    pub start_date: NaiveDate,

    /// Last rental day (inclusive)
    pub end_date: NaiveDate,

    /// Billable day count
    pub total_days: i64,

    /// Delivery mode
    pub delivery: DeliveryMode,

    /// Sum of line rental subtotals, minor units
    pub rental_subtotal: i64,

    /// Sum of line deposit subtotals, minor units
    pub deposit_subtotal: i64,

    /// Discount applied, minor units
    pub discount: i64,

    /// rental + deposit - discount, minor units
    pub total: i64,

    /// Balance still owed; equals `total` at creation
    pub outstanding: i64,

    /// Identity record referenced at creation time, if any
    pub identity_id: Option<Uuid>,

    /// Denormalized identity status projection, refreshed on review
    /// decisions; the authoritative value lives on the identity record
    pub identity_status: Option<IdentityStatus>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Minutes remaining on the payment lock, never negative.
    ///
    /// Derived at read time; the lock is advisory and is not a
    /// concurrency primitive.
    pub fn time_remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        (self.locked_until - now).num_minutes().max(0)
    }
}

/// Snapshot of a booked catalog item
///
/// Frozen at creation time so later catalog price changes do not alter
/// historic bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLine {
    /// Unique identifier
    pub id: Uuid,

    /// Owning booking
    pub booking_id: Uuid,

    /// Catalog item id
    pub item_id: Uuid,

    /// Host owning the item
    pub host_id: Uuid,

    /// Item name at booking time
    pub name: String,

    /// Number of units booked
    pub quantity: i32,

    /// Rental price per unit per day, minor units
    pub price_per_day: i64,

    /// Deposit per unit, minor units
    pub deposit_per_unit: i64,

    /// price_per_day * quantity * total_days, minor units
    pub subtotal_rental: i64,

    /// deposit_per_unit * quantity, minor units
    pub subtotal_deposit: i64,
}

/// Denormalized renter contact details captured at booking time
///
/// Independent of later edits to the renter's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCustomer {
    /// Unique identifier
    pub id: Uuid,

    /// Owning booking
    pub booking_id: Uuid,

    /// Renter's full name
    pub full_name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email address
    pub email: String,

    /// Delivery or billing address
    pub address: String,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Full booking aggregate as returned by read APIs
#[derive(Debug, Clone, Serialize)]
pub struct BookingAggregate {
    pub booking: Booking,
    pub lines: Vec<BookingLine>,
    pub customer: BookingCustomer,
    /// Current status of the renter's identity record, read fresh
    pub identity_status: Option<IdentityStatus>,
}

/// Read-side projection for booking lists
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: i64,
    pub outstanding: i64,
    pub locked_until: DateTime<Utc>,
    /// Comma-separated line names for display
    pub item_names: String,
    /// Total quantity across lines
    pub total_quantity: i64,
    pub created_at: DateTime<Utc>,
}
