//! Repository implementations for the Renta marketplace

pub mod booking_repo;
pub mod identity_repo;

pub use booking_repo::PgBookingRepository;
pub use identity_repo::PgIdentityRepository;
