//! Domain models for the Renta marketplace
//!
//! This module contains all the core domain models used throughout the application.

pub mod booking;
pub mod identity;
pub mod principal;

pub use booking::{
    Booking, BookingAggregate, BookingCustomer, BookingLine, BookingStatus, BookingSummary,
    DeliveryMode,
};
pub use identity::{IdentityDecision, IdentityRecord, IdentityStatus};
pub use principal::{Principal, UserRole};
