//! JWT token creation and validation service
//!
//! Provides secure JWT token generation and validation using the jsonwebtoken crate.

use crate::claims::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use renta_core::models::UserRole;
use renta_core::AppError;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// JWT Service for token creation and validation
#[derive(Clone)]
pub struct JwtService {
    /// Default token expiration time in seconds
    expiration_secs: i64,

    /// Encoding key (cached)
    encoding_key: EncodingKey,

    /// Decoding key (cached)
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    ///
    /// # Arguments
    ///
    /// * `secret` - The secret key used to sign tokens
    /// * `expiration_secs` - Default token expiration time in seconds
    pub fn new(secret: &str, expiration_secs: i64) -> Self {
        Self {
            expiration_secs,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a JWT token from claims
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidToken` if token creation fails
    pub fn create_token(&self, claims: &Claims) -> Result<String, AppError> {
        let mut token_claims = claims.clone();

        // Set expiration if not already set
        if token_claims.exp == 0 {
            let exp = Utc::now() + Duration::seconds(self.expiration_secs);
            token_claims.exp = exp.timestamp();
        }

        debug!(
            user_id = %token_claims.sub,
            role = ?token_claims.role,
            exp = %token_claims.exp,
            "Creating JWT token"
        );

        encode(&Header::default(), &token_claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to create JWT token");
            AppError::InvalidToken(format!("Token creation failed: {}", e))
        })
    }

    /// Create a token for a user id and role
    pub fn create_token_for_user(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<String, AppError> {
        let claims = Claims::new(user_id, role);
        self.create_token(&claims)
    }

    /// Validate a JWT token and extract claims
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `AppError::TokenExpired` if the token has expired
    /// - `AppError::InvalidToken` if the token is invalid
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                warn!("Token expired");
                return AppError::TokenExpired;
            }

            warn!(error = %e, "Invalid token");
            AppError::InvalidToken(format!("Token validation failed: {}", e))
        })?;

        let claims = token_data.claims;

        if claims.is_expired() {
            warn!(user_id = %claims.sub, "Token expired (manual check)");
            return Err(AppError::TokenExpired);
        }

        debug!(
            user_id = %claims.sub,
            role = ?claims.role,
            "Token validated successfully"
        );

        Ok(claims)
    }

    /// Get the expiration time for tokens created by this service
    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_secs", &self.expiration_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-12345";

    #[test]
    fn test_create_and_validate_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);
        let id = Uuid::new_v4();
        let claims = Claims::new(id, UserRole::Admin);

        let token = jwt_service.create_token(&claims).unwrap();
        assert!(!token.is_empty());

        let decoded = jwt_service.validate_token(&token).unwrap();
        assert_eq!(decoded.user_id().unwrap(), id);
        assert_eq!(decoded.role, UserRole::Admin);
    }

    #[test]
    fn test_expired_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 1);

        let claims = Claims::with_expiration(Uuid::new_v4(), UserRole::Customer, -10);
        let token = jwt_service.create_token(&claims).unwrap();

        let result = jwt_service.validate_token(&token);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);

        let result = jwt_service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_token_with_different_secret() {
        let jwt_service1 = JwtService::new("secret1", 3600);
        let jwt_service2 = JwtService::new("secret2", 3600);

        let claims = Claims::new(Uuid::new_v4(), UserRole::Host);
        let token = jwt_service1.create_token(&claims).unwrap();

        let result = jwt_service2.validate_token(&token);
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_debug_impl_hides_secret() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);
        let debug_str = format!("{:?}", jwt_service);

        assert!(debug_str.contains("JwtService"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains(TEST_SECRET));
    }
}
