//! Business logic services for the Renta marketplace
//!
//! This crate contains the reservation workflow and the identity
//! verification lifecycle it depends on.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies (repositories behind traits)
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - The authenticated caller is an explicit `Principal` parameter on
//!   every operation
//!
//! # Services
//!
//! - `pricing` - pure cart pricing (subtotals, discount, outstanding)
//! - `BookingLockManager` - advisory payment lock window
//! - `IdentityVerificationManager` - document upload and review lifecycle
//! - `ReservationService` - booking creation and reads

pub mod booking_lock;
pub mod identity;
pub mod pricing;
pub mod reservation;

pub use booking_lock::BookingLockManager;
pub use identity::IdentityVerificationManager;
pub use pricing::{price, Quote};
pub use reservation::{CartLine, CustomerDetails, NewReservation, ReservationService};
