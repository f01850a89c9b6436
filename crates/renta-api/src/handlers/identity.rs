//! Identity verification handlers
//!
//! HTTP handlers for the identity document lifecycle: upload,
//! re-upload, status checks and staff review decisions.

use crate::dto::identity::{DecisionRequest, IdentityResponse, SubmitIdentityRequest};
use crate::dto::ApiResponse;
use crate::handlers::IdentityService;
use actix_web::{web, HttpResponse};
use renta_auth::{AuthenticatedUser, StaffUser};
use renta_core::AppError;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Upload an identity document for the calling renter
///
/// POST /api/v1/identity
#[instrument(skip(service, req), fields(renter_id = %user.user_id))]
pub async fn submit_identity(
    service: web::Data<IdentityService>,
    user: AuthenticatedUser,
    req: web::Json<SubmitIdentityRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Identity submission validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let record = service
        .submit(&user.principal(), req.into_inner().document_url)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        IdentityResponse::from(record),
        "Identity document submitted for review",
    )))
}

/// Replace the document on an existing record
///
/// PUT /api/v1/identity
#[instrument(skip(service, req), fields(renter_id = %user.user_id))]
pub async fn resubmit_identity(
    service: web::Data<IdentityService>,
    user: AuthenticatedUser,
    req: web::Json<SubmitIdentityRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Identity resubmission validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let record = service
        .resubmit(&user.principal(), req.into_inner().document_url)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        IdentityResponse::from(record),
        "Identity document replaced, review reset",
    )))
}

/// Current verification status for the calling renter
///
/// GET /api/v1/identity
#[instrument(skip(service), fields(renter_id = %user.user_id))]
pub async fn get_identity_status(
    service: web::Data<IdentityService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!("Fetching identity status");

    let record = service.status(&user.principal()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(IdentityResponse::from(record))))
}

/// Apply a staff review decision to an identity record
///
/// POST /api/v1/identity/{id}/decision
#[instrument(skip(service, req), fields(reviewer_id = %staff.user_id))]
pub async fn decide_identity(
    service: web::Data<IdentityService>,
    staff: StaffUser,
    path: web::Path<Uuid>,
    req: web::Json<DecisionRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Identity decision validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let identity_id = path.into_inner();
    let body = req.into_inner();

    let record = service
        .decide(&staff.principal(), identity_id, &body.decision, body.reason)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(IdentityResponse::from(record))))
}

/// Configure identity routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/identity")
            .route("", web::post().to(submit_identity))
            .route("", web::put().to(resubmit_identity))
            .route("", web::get().to(get_identity_status))
            .route("/{id}/decision", web::post().to(decide_identity)),
    );
}
