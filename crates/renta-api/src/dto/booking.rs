//! Booking DTOs
//!
//! Client-submitted prices are display snapshots; the service recomputes
//! every total before persisting.

use chrono::{DateTime, NaiveDate, Utc};
use renta_core::models::{BookingAggregate, BookingStatus, BookingSummary, DeliveryMode, IdentityStatus};
use renta_services::{CartLine, CustomerDetails, NewReservation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One cart line in a booking creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItemRequest {
    pub item_id: Uuid,
    pub host_id: Uuid,

    #[validate(length(min = 1, message = "item name is required"))]
    pub name: String,

    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,

    /// Rental price per unit per day, minor units
    #[validate(range(min = 0, message = "price_per_day must not be negative"))]
    pub price_per_day: i64,

    /// Deposit per unit, minor units
    #[validate(range(min = 0, message = "deposit_per_unit must not be negative"))]
    pub deposit_per_unit: i64,
}

/// Renter contact details captured on the booking
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,

    #[validate(email(message = "email must be valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,

    pub notes: Option<String>,
}

/// Request to create a booking
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub delivery: DeliveryMode,

    #[validate(length(min = 1, message = "cart must not be empty"), nested)]
    pub items: Vec<CartItemRequest>,

    #[validate(nested)]
    pub customer: CustomerRequest,

    /// Discount in minor units
    #[serde(default)]
    #[validate(range(min = 0, message = "discount must not be negative"))]
    pub discount: i64,
}

impl From<CreateBookingRequest> for NewReservation {
    fn from(req: CreateBookingRequest) -> Self {
        NewReservation {
            start_date: req.start_date,
            end_date: req.end_date,
            delivery: req.delivery,
            lines: req
                .items
                .into_iter()
                .map(|item| CartLine {
                    item_id: item.item_id,
                    host_id: item.host_id,
                    name: item.name,
                    quantity: item.quantity,
                    price_per_day: item.price_per_day,
                    deposit_per_unit: item.deposit_per_unit,
                })
                .collect(),
            customer: CustomerDetails {
                full_name: req.customer.full_name,
                phone: req.customer.phone,
                email: req.customer.email,
                address: req.customer.address,
                notes: req.customer.notes,
            },
            discount: req.discount,
        }
    }
}

/// Booking line response DTO
#[derive(Debug, Clone, Serialize)]
pub struct BookingLineResponse {
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    pub price_per_day: i64,
    pub deposit_per_unit: i64,
    pub subtotal_rental: i64,
    pub subtotal_deposit: i64,
}

/// Renter snapshot response DTO
#[derive(Debug, Clone, Serialize)]
pub struct BookingCustomerResponse {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: Option<String>,
}

/// Full booking aggregate response DTO
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub status: BookingStatus,
    pub delivery: DeliveryMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub rental_subtotal: i64,
    pub deposit_subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub outstanding: i64,
    pub locked_until: DateTime<Utc>,
    /// Minutes left on the payment lock at response time
    pub time_remaining_minutes: i64,
    pub identity_status: Option<IdentityStatus>,
    pub lines: Vec<BookingLineResponse>,
    pub customer: BookingCustomerResponse,
    pub created_at: DateTime<Utc>,
}

impl From<BookingAggregate> for BookingResponse {
    fn from(aggregate: BookingAggregate) -> Self {
        let booking = aggregate.booking;
        let time_remaining_minutes = booking.time_remaining_minutes(Utc::now());
        Self {
            id: booking.id.to_string(),
            status: booking.status,
            delivery: booking.delivery,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_days: booking.total_days,
            rental_subtotal: booking.rental_subtotal,
            deposit_subtotal: booking.deposit_subtotal,
            discount: booking.discount,
            total: booking.total,
            outstanding: booking.outstanding,
            locked_until: booking.locked_until,
            time_remaining_minutes,
            identity_status: aggregate.identity_status,
            lines: aggregate
                .lines
                .into_iter()
                .map(|line| BookingLineResponse {
                    item_id: line.item_id.to_string(),
                    name: line.name,
                    quantity: line.quantity,
                    price_per_day: line.price_per_day,
                    deposit_per_unit: line.deposit_per_unit,
                    subtotal_rental: line.subtotal_rental,
                    subtotal_deposit: line.subtotal_deposit,
                })
                .collect(),
            customer: BookingCustomerResponse {
                full_name: aggregate.customer.full_name,
                phone: aggregate.customer.phone,
                email: aggregate.customer.email,
                address: aggregate.customer.address,
                notes: aggregate.customer.notes,
            },
            created_at: booking.created_at,
        }
    }
}

/// Booking list row response DTO
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummaryResponse {
    pub id: String,
    pub status: BookingStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: i64,
    pub outstanding: i64,
    pub locked_until: DateTime<Utc>,
    pub time_remaining_minutes: i64,
    pub item_names: String,
    pub total_quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl From<BookingSummary> for BookingSummaryResponse {
    fn from(summary: BookingSummary) -> Self {
        let time_remaining_minutes = (summary.locked_until - Utc::now()).num_minutes().max(0);
        Self {
            id: summary.booking_id.to_string(),
            status: summary.status,
            start_date: summary.start_date,
            end_date: summary.end_date,
            total: summary.total,
            outstanding: summary.outstanding,
            locked_until: summary.locked_until,
            time_remaining_minutes,
            item_names: summary.item_names,
            total_quantity: summary.total_quantity,
            created_at: summary.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use renta_core::models::{Booking, BookingCustomer, BookingLine};

    fn sample_item() -> CartItemRequest {
        CartItemRequest {
            item_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            name: "Camera".to_string(),
            quantity: 1,
            price_per_day: 100,
            deposit_per_unit: 50,
        }
    }

    fn sample_customer() -> CustomerRequest {
        CustomerRequest {
            full_name: "Maria Lopez".to_string(),
            phone: "+51 999 888 777".to_string(),
            email: "maria@example.com".to_string(),
            address: "Av. Arequipa 1234".to_string(),
            notes: None,
        }
    }

    fn sample_request() -> CreateBookingRequest {
        let day = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        CreateBookingRequest {
            start_date: day,
            end_date: day,
            delivery: DeliveryMode::Pickup,
            items: vec![sample_item()],
            customer: sample_customer(),
            discount: 0,
        }
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_empty_cart_fails_validation() {
        let mut req = sample_request();
        req.items.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_email_fails_validation() {
        let mut req = sample_request();
        req.customer.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_quantity_fails_validation() {
        let mut req = sample_request();
        req.items[0].quantity = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_discount_fails_validation() {
        let mut req = sample_request();
        req.discount = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_converts_to_reservation() {
        let req = sample_request();
        let item_id = req.items[0].item_id;
        let reservation = NewReservation::from(req);

        assert_eq!(reservation.lines.len(), 1);
        assert_eq!(reservation.lines[0].item_id, item_id);
        assert_eq!(reservation.customer.full_name, "Maria Lopez");
        assert_eq!(reservation.discount, 0);
    }

    #[test]
    fn test_booking_response_computes_remaining_minutes() {
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            status: BookingStatus::PendingPayment,
            locked_until: now + Duration::minutes(30),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            total_days: 1,
            delivery: DeliveryMode::Pickup,
            rental_subtotal: 100,
            deposit_subtotal: 50,
            discount: 0,
            total: 150,
            outstanding: 150,
            identity_id: None,
            identity_status: None,
            created_at: now,
            updated_at: now,
        };
        let booking_id = booking.id;
        let aggregate = BookingAggregate {
            booking,
            lines: vec![BookingLine {
                id: Uuid::new_v4(),
                booking_id,
                item_id: Uuid::new_v4(),
                host_id: Uuid::new_v4(),
                name: "Camera".to_string(),
                quantity: 1,
                price_per_day: 100,
                deposit_per_unit: 50,
                subtotal_rental: 100,
                subtotal_deposit: 50,
            }],
            customer: BookingCustomer {
                id: Uuid::new_v4(),
                booking_id,
                full_name: "Maria Lopez".to_string(),
                phone: "+51 999 888 777".to_string(),
                email: "maria@example.com".to_string(),
                address: "Av. Arequipa 1234".to_string(),
                notes: None,
            },
            identity_status: None,
        };

        let response = BookingResponse::from(aggregate);
        assert!(response.time_remaining_minutes > 0);
        assert!(response.time_remaining_minutes <= 30);
        assert_eq!(response.lines.len(), 1);
    }
}
