//! Booking aggregate repository implementation
//!
//! Persists a booking together with its line items and renter snapshot as
//! a single atomic unit, and reconstructs the full aggregate for read
//! APIs. Any failure mid-insert rolls back all three tables.

use renta_core::{
    models::{
        Booking, BookingAggregate, BookingCustomer, BookingLine, BookingStatus, BookingSummary,
        DeliveryMode, IdentityStatus,
    },
    traits::BookingRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of BookingRepository
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse booking status from string
    fn parse_status(s: &str) -> BookingStatus {
        BookingStatus::from_str(s).unwrap_or(BookingStatus::PendingPayment)
    }

    /// Parse delivery mode from string
    fn parse_delivery(s: &str) -> DeliveryMode {
        DeliveryMode::from_str(s).unwrap_or(DeliveryMode::Pickup)
    }

    async fn fetch_lines(&self, booking_id: Uuid) -> AppResult<Vec<BookingLine>> {
        let rows = sqlx::query_as::<sqlx::Postgres, BookingItemRow>(
            r#"
            SELECT
                id, booking_id, item_id, host_id, name, quantity,
                price_per_day, deposit_per_unit, subtotal_rental, subtotal_deposit
            FROM booking_items
            WHERE booking_id = $1
            ORDER BY name
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching booking items: {}", e);
            AppError::Database(format!("Failed to fetch booking items: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_customer(&self, booking_id: Uuid) -> AppResult<Option<BookingCustomer>> {
        let row = sqlx::query_as::<sqlx::Postgres, BookingCustomerRow>(
            r#"
            SELECT id, booking_id, full_name, phone, email, address, notes
            FROM booking_customers
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching booking customer: {}", e);
            AppError::Database(format!("Failed to fetch booking customer: {}", e))
        })?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self, booking, lines, customer))]
    async fn create_aggregate(
        &self,
        booking: &Booking,
        lines: &[BookingLine],
        customer: &BookingCustomer,
    ) -> AppResult<BookingAggregate> {
        debug!(
            "Creating booking {} with {} lines for renter {}",
            booking.id,
            lines.len(),
            booking.renter_id
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, renter_id, host_id, status, locked_until,
                start_date, end_date, total_days, delivery,
                rental_subtotal, deposit_subtotal, discount, total, outstanding,
                identity_id, identity_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(booking.id)
        .bind(booking.renter_id)
        .bind(booking.host_id)
        .bind(booking.status.to_string())
        .bind(booking.locked_until)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_days)
        .bind(booking.delivery.to_string())
        .bind(booking.rental_subtotal)
        .bind(booking.deposit_subtotal)
        .bind(booking.discount)
        .bind(booking.total)
        .bind(booking.outstanding)
        .bind(booking.identity_id)
        .bind(booking.identity_status.map(|s| s.to_string()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error inserting booking: {}", e);
            AppError::Database(format!("Failed to insert booking: {}", e))
        })?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO booking_items (
                    id, booking_id, item_id, host_id, name, quantity,
                    price_per_day, deposit_per_unit, subtotal_rental, subtotal_deposit
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(line.id)
            .bind(line.booking_id)
            .bind(line.item_id)
            .bind(line.host_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.price_per_day)
            .bind(line.deposit_per_unit)
            .bind(line.subtotal_rental)
            .bind(line.subtotal_deposit)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error inserting booking item: {}", e);
                AppError::Database(format!("Failed to insert booking item: {}", e))
            })?;
        }

        sqlx::query(
            r#"
            INSERT INTO booking_customers (
                id, booking_id, full_name, phone, email, address, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(customer.id)
        .bind(customer.booking_id)
        .bind(&customer.full_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error inserting booking customer: {}", e);
            AppError::Database(format!("Failed to insert booking customer: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        // Read back the persisted aggregate for the caller
        self.find_aggregate(booking.id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "Booking {} missing immediately after creation",
                booking.id
            ))
        })
    }

    #[instrument(skip(self))]
    async fn find_aggregate(&self, id: Uuid) -> AppResult<Option<BookingAggregate>> {
        debug!("Finding booking aggregate: {}", id);

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            SELECT
                b.id, b.renter_id, b.host_id, b.status, b.locked_until,
                b.start_date, b.end_date, b.total_days, b.delivery,
                b.rental_subtotal, b.deposit_subtotal, b.discount, b.total, b.outstanding,
                b.identity_id, b.identity_status, b.created_at, b.updated_at,
                (
                    SELECT d.status FROM identity_documents d
                    WHERE d.renter_id = b.renter_id
                    ORDER BY d.created_at DESC
                    LIMIT 1
                ) AS current_identity_status
            FROM bookings b
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding booking {}: {}", id, e);
            AppError::Database(format!("Failed to find booking: {}", e))
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let identity_status = row
            .current_identity_status
            .as_deref()
            .and_then(IdentityStatus::from_str);
        let booking: Booking = row.into();

        let lines = self.fetch_lines(booking.id).await?;
        let customer = self.fetch_customer(booking.id).await?.ok_or_else(|| {
            AppError::Internal(format!("Booking {} has no renter snapshot", booking.id))
        })?;

        Ok(Some(BookingAggregate {
            booking,
            lines,
            customer,
            identity_status,
        }))
    }

    #[instrument(skip(self))]
    async fn list_summaries_by_renter(&self, renter_id: Uuid) -> AppResult<Vec<BookingSummary>> {
        debug!("Listing booking summaries for renter: {}", renter_id);

        let rows = sqlx::query_as::<sqlx::Postgres, SummaryRow>(
            r#"
            SELECT
                b.id, b.status, b.start_date, b.end_date, b.total, b.outstanding,
                b.locked_until, b.created_at,
                COALESCE(STRING_AGG(i.name, ', ' ORDER BY i.name), '') AS item_names,
                COALESCE(SUM(i.quantity), 0)::BIGINT AS total_quantity
            FROM bookings b
            LEFT JOIN booking_items i ON i.booking_id = b.id
            WHERE b.renter_id = $1
            GROUP BY b.id
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(renter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing bookings for renter {}: {}", renter_id, e);
            AppError::Database(format!("Failed to list bookings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping booking rows
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    renter_id: Uuid,
    host_id: Uuid,
    status: String,
    locked_until: DateTime<Utc>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_days: i64,
    delivery: String,
    rental_subtotal: i64,
    deposit_subtotal: i64,
    discount: i64,
    total: i64,
    outstanding: i64,
    identity_id: Option<Uuid>,
    identity_status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    current_identity_status: Option<String>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            renter_id: row.renter_id,
            host_id: row.host_id,
            status: PgBookingRepository::parse_status(&row.status),
            locked_until: row.locked_until,
            start_date: row.start_date,
            end_date: row.end_date,
            total_days: row.total_days,
            delivery: PgBookingRepository::parse_delivery(&row.delivery),
            rental_subtotal: row.rental_subtotal,
            deposit_subtotal: row.deposit_subtotal,
            discount: row.discount,
            total: row.total,
            outstanding: row.outstanding,
            identity_id: row.identity_id,
            identity_status: row
                .identity_status
                .as_deref()
                .and_then(IdentityStatus::from_str),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Helper struct for mapping booking item rows
#[derive(Debug, sqlx::FromRow)]
struct BookingItemRow {
    id: Uuid,
    booking_id: Uuid,
    item_id: Uuid,
    host_id: Uuid,
    name: String,
    quantity: i32,
    price_per_day: i64,
    deposit_per_unit: i64,
    subtotal_rental: i64,
    subtotal_deposit: i64,
}

impl From<BookingItemRow> for BookingLine {
    fn from(row: BookingItemRow) -> Self {
        Self {
            id: row.id,
            booking_id: row.booking_id,
            item_id: row.item_id,
            host_id: row.host_id,
            name: row.name,
            quantity: row.quantity,
            price_per_day: row.price_per_day,
            deposit_per_unit: row.deposit_per_unit,
            subtotal_rental: row.subtotal_rental,
            subtotal_deposit: row.subtotal_deposit,
        }
    }
}

/// Helper struct for mapping renter snapshot rows
#[derive(Debug, sqlx::FromRow)]
struct BookingCustomerRow {
    id: Uuid,
    booking_id: Uuid,
    full_name: String,
    phone: String,
    email: String,
    address: String,
    notes: Option<String>,
}

impl From<BookingCustomerRow> for BookingCustomer {
    fn from(row: BookingCustomerRow) -> Self {
        Self {
            id: row.id,
            booking_id: row.booking_id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            notes: row.notes,
        }
    }
}

/// Helper struct for mapping summary rows
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total: i64,
    outstanding: i64,
    locked_until: DateTime<Utc>,
    created_at: DateTime<Utc>,
    item_names: String,
    total_quantity: i64,
}

impl From<SummaryRow> for BookingSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            booking_id: row.id,
            status: PgBookingRepository::parse_status(&row.status),
            start_date: row.start_date,
            end_date: row.end_date,
            total: row.total,
            outstanding: row.outstanding,
            locked_until: row.locked_until,
            item_names: row.item_names,
            total_quantity: row.total_quantity,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgBookingRepository::parse_status("pending_payment"),
            BookingStatus::PendingPayment
        );
        assert_eq!(
            PgBookingRepository::parse_status("confirmed"),
            BookingStatus::Confirmed
        );
        assert_eq!(
            PgBookingRepository::parse_status("garbage"),
            BookingStatus::PendingPayment
        );
    }

    #[test]
    fn test_parse_delivery() {
        assert_eq!(
            PgBookingRepository::parse_delivery("pickup"),
            DeliveryMode::Pickup
        );
        assert_eq!(
            PgBookingRepository::parse_delivery("delivery"),
            DeliveryMode::Delivery
        );
    }
}
