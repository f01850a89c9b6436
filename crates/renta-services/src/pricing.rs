//! Cart pricing
//!
//! Pure function over pre-computed line subtotals; no I/O. All amounts
//! are non-negative integers in the smallest currency unit.

use renta_core::{models::BookingLine, AppError, AppResult};

/// Priced totals for a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Sum of line rental subtotals
    pub rental: i64,

    /// Sum of line deposit subtotals
    pub deposit: i64,

    /// rental + deposit - discount
    pub total: i64,

    /// Balance owed at creation; no partial payments are modeled here,
    /// so it equals `total`
    pub outstanding: i64,
}

/// Price a cart
///
/// # Errors
///
/// Returns a validation error if the discount is negative, the summed
/// cart value overflows, or the discount exceeds the cart value; a
/// negative total is rejected, never clamped.
pub fn price(lines: &[BookingLine], discount: i64) -> AppResult<Quote> {
    if discount < 0 {
        return Err(AppError::Validation(
            "discount must not be negative".to_string(),
        ));
    }

    let overflow = || AppError::Validation("cart value is too large".to_string());

    let mut rental: i64 = 0;
    let mut deposit: i64 = 0;
    for line in lines {
        rental = rental.checked_add(line.subtotal_rental).ok_or_else(overflow)?;
        deposit = deposit.checked_add(line.subtotal_deposit).ok_or_else(overflow)?;
    }

    let gross = rental.checked_add(deposit).ok_or_else(overflow)?;
    let total = gross - discount;

    if total < 0 {
        return Err(AppError::Validation(format!(
            "discount {} exceeds cart value {}",
            discount, gross
        )));
    }

    Ok(Quote {
        rental,
        deposit,
        total,
        outstanding: total,
    })
}
