//! Actix-web authentication extractors
//!
//! Extractors validate the caller's JWT and hand handlers an explicit
//! `Principal` value; services never read identity from ambient state.

use crate::jwt::JwtService;
use crate::Claims;
use actix_web::{
    dev::Payload,
    error::{ErrorForbidden, ErrorUnauthorized},
    web, FromRequest, HttpRequest,
};
use futures::future::{ready, Ready};
use renta_core::models::{Principal, UserRole};
use renta_core::AppError;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Extract JWT token from request
///
/// Checks for token in the following order:
/// 1. Authorization header (Bearer token)
/// 2. Cookie named "token"
fn extract_token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie) = req.cookie("token") {
        return Some(cookie.value().to_string());
    }

    None
}

/// Authenticated user extractor
///
/// Extracts and validates the JWT token from the request, providing the
/// caller's id and role. Can be used as a request extractor in actix-web
/// handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Id of the authenticated user
    pub user_id: Uuid,

    /// Role of the authenticated user
    pub role: UserRole,

    /// Full claims from the JWT token
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// The explicit principal value passed into service calls
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.role)
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user may act on identity decisions
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let jwt_service = match req.app_data::<web::Data<Arc<JwtService>>>() {
            Some(service) => service.get_ref().clone(),
            None => {
                warn!("JwtService not found in app data");
                return ready(Err(ErrorUnauthorized(AppError::Unauthorized(
                    "Authentication service not configured".to_string(),
                ))));
            }
        };

        let token = match extract_token_from_request(req) {
            Some(t) => t,
            None => {
                debug!("No authentication token found in request");
                return ready(Err(ErrorUnauthorized(AppError::Unauthorized(
                    "No authentication token provided".to_string(),
                ))));
            }
        };

        let claims = match jwt_service.validate_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Token validation failed");
                return ready(Err(ErrorUnauthorized(e)));
            }
        };

        let user_id = match claims.user_id() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Token subject is not a user id");
                return ready(Err(ErrorUnauthorized(e)));
            }
        };

        debug!(
            user_id = %user_id,
            role = ?claims.role,
            "User authenticated successfully"
        );

        ready(Ok(AuthenticatedUser {
            user_id,
            role: claims.role,
            claims,
        }))
    }
}

/// Staff user extractor
///
/// Requires the user to have host or admin role; the identity review
/// endpoints are gated on it. Returns a forbidden error otherwise.
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthenticatedUser);

impl std::ops::Deref for StaffUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for StaffUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth_user = match AuthenticatedUser::from_request(req, payload).into_inner() {
            Ok(user) => user,
            Err(e) => return ready(Err(e)),
        };

        if !auth_user.is_staff() {
            warn!(
                user_id = %auth_user.user_id,
                role = %auth_user.role,
                "User attempted staff access without privileges"
            );
            // Authenticated but not allowed: 403, matching the service
            // layer's Forbidden mapping
            return ready(Err(ErrorForbidden(AppError::Forbidden)));
        }

        debug!(
            user_id = %auth_user.user_id,
            role = %auth_user.role,
            "Staff access granted"
        );

        ready(Ok(StaffUser(auth_user)))
    }
}
