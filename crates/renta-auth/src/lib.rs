//! Authentication layer for the Renta marketplace
//!
//! Provides JWT claims, token validation, and actix-web request
//! extractors. Token issuance for login flows and password hashing live
//! outside this core; handlers only consume the validated principal.

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthenticatedUser, StaffUser};
