//! Booking handlers
//!
//! HTTP handlers for creating and reading bookings. Creation is gated on
//! authentication; reads are scoped to the owning renter by the service.

use crate::dto::booking::{BookingResponse, BookingSummaryResponse, CreateBookingRequest};
use crate::dto::ApiResponse;
use crate::handlers::BookingService;
use actix_web::{web, HttpResponse};
use renta_auth::AuthenticatedUser;
use renta_core::AppError;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Create a booking from the renter's cart
///
/// POST /api/v1/bookings
#[instrument(skip(service, req), fields(renter_id = %user.user_id))]
pub async fn create_booking(
    service: web::Data<BookingService>,
    user: AuthenticatedUser,
    req: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Booking creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        items = req.items.len(),
        start_date = %req.start_date,
        end_date = %req.end_date,
        "Creating booking"
    );

    let aggregate = service
        .create_reservation(&user.principal(), req.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        BookingResponse::from(aggregate),
        "Booking created, complete payment before the lock expires",
    )))
}

/// List the calling renter's bookings, newest first
///
/// GET /api/v1/bookings
#[instrument(skip(service), fields(renter_id = %user.user_id))]
pub async fn list_bookings(
    service: web::Data<BookingService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!("Listing bookings");

    let summaries = service.list_bookings(&user.principal()).await?;
    let response: Vec<BookingSummaryResponse> = summaries.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Fetch a single booking aggregate
///
/// GET /api/v1/bookings/{id}
#[instrument(skip(service), fields(caller_id = %user.user_id))]
pub async fn get_booking(
    service: web::Data<BookingService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let aggregate = service
        .get_booking(&user.principal(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(BookingResponse::from(aggregate))))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking)),
    );
}
