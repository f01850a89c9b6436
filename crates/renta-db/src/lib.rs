//! Renta Database Layer
//!
//! This crate provides PostgreSQL database access and repository
//! implementations for the Renta marketplace backend. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for the identity and booking aggregates
//! - Transaction support for atomic aggregate creation

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use renta_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
