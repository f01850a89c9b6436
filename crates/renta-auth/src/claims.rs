//! JWT Claims structure
//!
//! Defines the claims structure used in JWT tokens for authentication.

use chrono::{Duration, Utc};
use renta_core::models::UserRole;
use renta_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims
///
/// `sub` carries the authenticated user's id; `role` carries the
/// marketplace role the middleware hands to handlers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// User role
    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims for a user; expiration is set by `JwtService`
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: 0,
        }
    }

    /// Create new claims with custom expiration duration
    pub fn with_expiration(user_id: Uuid, role: UserRole, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_secs);

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        self.exp <= now
    }

    /// Parse the user id out of the subject
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::InvalidToken(format!("Malformed subject: {}", self.sub)))
    }

    /// Get the user role
    pub fn role(&self) -> UserRole {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, UserRole::Customer);
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, UserRole::Customer);
        assert!(claims.iat > 0);
        assert_eq!(claims.user_id().unwrap(), id);
    }

    #[test]
    fn test_claims_with_expiration() {
        let claims = Claims::with_expiration(Uuid::new_v4(), UserRole::Admin, 3600);
        assert!(!claims.is_expired());

        let now = Utc::now().timestamp();
        assert!(claims.exp > now);
        assert!(claims.exp <= now + 3600);
    }

    #[test]
    fn test_expired_claims() {
        let mut claims = Claims::new(Uuid::new_v4(), UserRole::Host);
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_malformed_subject() {
        let mut claims = Claims::new(Uuid::new_v4(), UserRole::Customer);
        claims.sub = "not-a-uuid".to_string();
        assert!(matches!(claims.user_id(), Err(AppError::InvalidToken(_))));
    }
}
