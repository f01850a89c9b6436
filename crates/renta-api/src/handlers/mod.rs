//! HTTP request handlers

pub mod booking;
pub mod identity;

use renta_core::traits::{BookingRepository, IdentityRepository};
use renta_services::{IdentityVerificationManager, ReservationService};

/// Identity service as registered in app data; backed by the Postgres
/// repository in production, by in-memory stores in tests
pub type IdentityService = IdentityVerificationManager<dyn IdentityRepository>;

/// Reservation service as registered in app data
pub type BookingService = ReservationService<dyn IdentityRepository, dyn BookingRepository>;

pub use booking::configure as configure_bookings;
pub use identity::configure as configure_identity;
