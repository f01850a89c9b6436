//! HTTP API layer for the Renta marketplace
//!
//! Request/response DTOs and actix-web handlers for the identity
//! verification and reservation endpoints.

pub mod dto;
pub mod handlers;

pub use dto::ApiResponse;
pub use handlers::{configure_bookings, configure_identity, BookingService, IdentityService};
