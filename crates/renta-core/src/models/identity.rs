//! Identity verification models
//!
//! A renter's submitted proof-of-identity document and its approval status.
//! Invariants: `verified == (status == Approved)` and `verified_at` is
//! non-null iff the record is approved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Verification status of an identity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    /// Document uploaded, waiting for review
    #[default]
    Pending,
    /// Document reviewed and accepted
    Approved,
    /// Document reviewed and rejected
    Rejected,
}

impl fmt::Display for IdentityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStatus::Pending => write!(f, "pending"),
            IdentityStatus::Approved => write!(f, "approved"),
            IdentityStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl IdentityStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(IdentityStatus::Pending),
            "approved" => Some(IdentityStatus::Approved),
            "rejected" => Some(IdentityStatus::Rejected),
            _ => None,
        }
    }
}

/// Review decision applied to an identity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityDecision {
    Approved,
    Rejected,
}

impl fmt::Display for IdentityDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityDecision::Approved => write!(f, "approved"),
            IdentityDecision::Rejected => write!(f, "rejected"),
        }
    }
}

impl IdentityDecision {
    /// Parse from string; only the two review outcomes are legal
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approved" => Some(IdentityDecision::Approved),
            "rejected" => Some(IdentityDecision::Rejected),
            _ => None,
        }
    }
}

/// Identity record entity
///
/// Lifecycle: created on first upload (`Pending`), mutated by re-upload
/// (reset to `Pending`) or by a review decision. Re-upload after approval
/// is rejected as a conflict at the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Owning renter
    pub renter_id: Uuid,

    /// Publicly resolvable URL of the uploaded document
    pub document_url: String,

    /// Whether the document has been approved
    pub verified: bool,

    /// Current status
    pub status: IdentityStatus,

    /// Reason given on rejection
    pub rejection_reason: Option<String>,

    /// When the document was approved
    pub verified_at: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Create a new pending record for a first upload
    pub fn new(renter_id: Uuid, document_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            renter_id,
            document_url,
            verified: false,
            status: IdentityStatus::Pending,
            rejection_reason: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the record is approved
    pub fn is_approved(&self) -> bool {
        self.status == IdentityStatus::Approved
    }

    /// Overwrite the document and reset the record to pending,
    /// clearing any prior rejection reason and verification timestamp
    pub fn reset_document(&mut self, document_url: String, now: DateTime<Utc>) {
        self.document_url = document_url;
        self.verified = false;
        self.status = IdentityStatus::Pending;
        self.rejection_reason = None;
        self.verified_at = None;
        self.updated_at = now;
    }

    /// Apply a review decision
    pub fn apply_decision(
        &mut self,
        decision: IdentityDecision,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) {
        match decision {
            IdentityDecision::Approved => {
                self.status = IdentityStatus::Approved;
                self.verified = true;
                self.verified_at = Some(now);
                self.rejection_reason = None;
            }
            IdentityDecision::Rejected => {
                self.status = IdentityStatus::Rejected;
                self.verified = false;
                self.verified_at = None;
                self.rejection_reason = reason;
            }
        }
        self.updated_at = now;
    }

    /// Check the record invariants: `verified` mirrors approval and
    /// `verified_at` is set exactly for approved records
    pub fn invariants_hold(&self) -> bool {
        self.verified == (self.status == IdentityStatus::Approved)
            && self.verified_at.is_some() == (self.status == IdentityStatus::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_pending() {
        let record = IdentityRecord::new(Uuid::new_v4(), "https://x/a.jpg".to_string());
        assert_eq!(record.status, IdentityStatus::Pending);
        assert!(!record.verified);
        assert!(record.verified_at.is_none());
        assert!(record.invariants_hold());
    }

    #[test]
    fn test_approval_sets_verified() {
        let mut record = IdentityRecord::new(Uuid::new_v4(), "https://x/a.jpg".to_string());
        record.apply_decision(IdentityDecision::Approved, None, Utc::now());

        assert_eq!(record.status, IdentityStatus::Approved);
        assert!(record.verified);
        assert!(record.verified_at.is_some());
        assert!(record.rejection_reason.is_none());
        assert!(record.invariants_hold());
    }

    #[test]
    fn test_rejection_stores_reason() {
        let mut record = IdentityRecord::new(Uuid::new_v4(), "https://x/a.jpg".to_string());
        record.apply_decision(
            IdentityDecision::Rejected,
            Some("blurry".to_string()),
            Utc::now(),
        );

        assert_eq!(record.status, IdentityStatus::Rejected);
        assert!(!record.verified);
        assert!(record.verified_at.is_none());
        assert_eq!(record.rejection_reason.as_deref(), Some("blurry"));
        assert!(record.invariants_hold());
    }

    #[test]
    fn test_reset_clears_rejection_state() {
        let mut record = IdentityRecord::new(Uuid::new_v4(), "https://x/a.jpg".to_string());
        record.apply_decision(
            IdentityDecision::Rejected,
            Some("blurry".to_string()),
            Utc::now(),
        );

        record.reset_document("https://x/b.jpg".to_string(), Utc::now());

        assert_eq!(record.status, IdentityStatus::Pending);
        assert_eq!(record.document_url, "https://x/b.jpg");
        assert!(record.rejection_reason.is_none());
        assert!(record.verified_at.is_none());
        assert!(record.invariants_hold());
    }

    #[test]
    fn test_decision_parsing() {
        assert_eq!(
            IdentityDecision::from_str("approved"),
            Some(IdentityDecision::Approved)
        );
        assert_eq!(
            IdentityDecision::from_str("Rejected"),
            Some(IdentityDecision::Rejected)
        );
        assert_eq!(IdentityDecision::from_str("maybe"), None);
    }
}
