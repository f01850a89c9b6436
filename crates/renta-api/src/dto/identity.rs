//! Identity verification DTOs

use chrono::{DateTime, Utc};
use renta_core::models::{IdentityRecord, IdentityStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to upload an identity document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitIdentityRequest {
    /// Publicly resolvable URL of the uploaded document
    #[validate(url(message = "document_url must be a valid URL"))]
    pub document_url: String,
}

/// Staff review decision on an identity document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DecisionRequest {
    /// "approved" or "rejected"
    #[validate(length(min = 1, message = "decision is required"))]
    pub decision: String,

    /// Reason shown to the renter on rejection
    #[validate(length(max = 500, message = "reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Identity record response DTO
#[derive(Debug, Clone, Serialize)]
pub struct IdentityResponse {
    pub id: String,
    pub renter_id: String,
    pub document_url: String,
    pub verified: bool,
    pub status: IdentityStatus,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IdentityRecord> for IdentityResponse {
    fn from(record: IdentityRecord) -> Self {
        Self {
            id: record.id.to_string(),
            renter_id: record.renter_id.to_string(),
            document_url: record.document_url,
            verified: record.verified,
            status: record.status,
            rejection_reason: record.rejection_reason,
            verified_at: record.verified_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_submit_request_rejects_non_url() {
        let req = SubmitIdentityRequest {
            document_url: "not-a-url".to_string(),
        };
        assert!(req.validate().is_err());

        let req = SubmitIdentityRequest {
            document_url: "https://cdn.example.com/doc.jpg".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_identity_response_serialization() {
        let record = IdentityRecord::new(Uuid::new_v4(), "https://cdn.example.com/doc.jpg".to_string());
        let response = IdentityResponse::from(record);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"verified\":false"));
    }
}
