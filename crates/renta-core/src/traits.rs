//! Repository traits for the identity and booking aggregates
//!
//! Defines abstractions for database access so services stay independent
//! of the storage backend and trivially mockable in tests.

use crate::error::AppError;
use crate::models::{
    Booking, BookingAggregate, BookingCustomer, BookingLine, BookingSummary, IdentityRecord,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage for identity records
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find the authoritative (latest) record for a renter
    async fn find_latest_by_renter(
        &self,
        renter_id: Uuid,
    ) -> Result<Option<IdentityRecord>, AppError>;

    /// Find a record by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<IdentityRecord>, AppError>;

    /// Persist a new record
    async fn create(&self, record: &IdentityRecord) -> Result<IdentityRecord, AppError>;

    /// Persist an updated record (re-upload reset)
    async fn update(&self, record: &IdentityRecord) -> Result<IdentityRecord, AppError>;

    /// Persist a review decision and refresh the denormalized
    /// identity-status projection on the renter's bookings, atomically
    async fn apply_decision(&self, record: &IdentityRecord) -> Result<IdentityRecord, AppError>;
}

/// Storage for the booking aggregate
///
/// A booking, its lines and its renter snapshot are created in a single
/// transaction and never partially exist.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert booking, lines and renter snapshot atomically, then read
    /// back and return the full aggregate
    async fn create_aggregate(
        &self,
        booking: &Booking,
        lines: &[BookingLine],
        customer: &BookingCustomer,
    ) -> Result<BookingAggregate, AppError>;

    /// Reconstruct the full aggregate for a booking
    async fn find_aggregate(&self, id: Uuid) -> Result<Option<BookingAggregate>, AppError>;

    /// One summary row per booking for the renter, newest first
    async fn list_summaries_by_renter(
        &self,
        renter_id: Uuid,
    ) -> Result<Vec<BookingSummary>, AppError>;
}
