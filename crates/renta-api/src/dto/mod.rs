//! Request and response DTOs

pub mod booking;
pub mod common;
pub mod identity;

pub use common::ApiResponse;
