//! Advisory payment lock window
//!
//! Every booking gets a lock window at creation; the renter is expected
//! to pay before it elapses. The window is advisory only: nothing here
//! prevents concurrent bookings of the same item, and expiry is computed
//! at read time rather than enforced by a background job.

use chrono::{DateTime, Duration, Utc};

/// Computes lock expiries and remaining time for bookings
#[derive(Debug, Clone, Copy)]
pub struct BookingLockManager {
    window_minutes: i64,
}

impl BookingLockManager {
    /// Create a manager with the given window in minutes
    pub fn new(window_minutes: i64) -> Self {
        Self { window_minutes }
    }

    /// Lock expiry for a booking created at `now`
    pub fn lock_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(self.window_minutes)
    }

    /// Whole minutes remaining until `expiry`, never negative
    pub fn remaining_minutes(&self, expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (expiry - now).num_minutes().max(0)
    }

    /// The configured window in minutes
    pub fn window_minutes(&self) -> i64 {
        self.window_minutes
    }
}

impl Default for BookingLockManager {
    fn default() -> Self {
        Self::new(30)
    }
}
