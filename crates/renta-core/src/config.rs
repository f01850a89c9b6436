//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub booking: BookingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Comma-separated list of allowed CORS origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

/// Authentication configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,

    /// JWT token expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: i64,
}

fn default_jwt_expiration() -> i64 {
    1800 // 30 minutes
}

/// Booking workflow configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Payment lock window in minutes
    #[serde(default = "default_lock_window")]
    pub lock_window_minutes: i64,

    /// Minimum billable days for a booking (same-day bookings bill at
    /// least this many days)
    #[serde(default = "default_min_billable_days")]
    pub min_billable_days: i64,

    /// Whether an approved identity document is required before a
    /// booking can be created
    #[serde(default)]
    pub require_verified_identity: bool,
}

fn default_lock_window() -> i64 {
    30
}

fn default_min_billable_days() -> i64 {
    1
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default(
                "server.cors_origins",
                "http://localhost:3000,http://127.0.0.1:3000",
            )?
            .set_default("database.max_connections", 20)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("auth.jwt_expiration_secs", 1800)?
            .set_default("booking.lock_window_minutes", 30)?
            .set_default("booking.min_billable_days", 1)?
            .set_default("booking.require_verified_identity", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with RENTA_ prefix
            .add_source(
                Environment::with_prefix("RENTA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("RENTA").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            lock_window_minutes: 30,
            min_billable_days: 1,
            require_verified_identity: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_booking_config() {
        let config = BookingConfig::default();
        assert_eq!(config.lock_window_minutes, 30);
        assert_eq!(config.min_billable_days, 1);
        assert!(!config.require_verified_identity);
    }

    #[test]
    fn test_server_addr() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9000,
                workers: 2,
                cors_origins: default_cors_origins(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/renta".to_string(),
                max_connections: 5,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
            },
            auth: AuthConfig {
                jwt_secret: "secret".to_string(),
                jwt_expiration_secs: 1800,
            },
            booking: BookingConfig::default(),
        };

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
    }
}
