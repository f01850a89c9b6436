//! Renta Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Renta rental marketplace backend. It includes:
//!
//! - Domain models (IdentityRecord, Booking, BookingLine, ...)
//! - Repository traits for the identity and booking aggregates
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
