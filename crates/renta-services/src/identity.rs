//! Identity verification lifecycle
//!
//! A renter uploads a proof-of-identity document, staff review it, and
//! the outcome gates booking creation when the deployment requires it.
//! A renter has exactly one authoritative record; re-uploading replaces
//! the document and resets review state, except that approved records
//! are immutable and re-upload is rejected as a conflict.

use chrono::Utc;
use renta_core::models::{IdentityDecision, IdentityRecord, Principal};
use renta_core::traits::IdentityRepository;
use renta_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Manages the identity document lifecycle
///
/// Generic over the repository (trait objects included) so handlers and
/// tests can run against an in-memory store.
pub struct IdentityVerificationManager<R: IdentityRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: IdentityRepository + ?Sized> Clone for IdentityVerificationManager<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: IdentityRepository + ?Sized> IdentityVerificationManager<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Submit a document for the calling renter
    ///
    /// First upload creates a pending record. A later upload overwrites
    /// the document and resets the record to pending, unless the record
    /// is already approved, which is a conflict.
    #[instrument(skip(self, document_url), fields(renter_id = %principal.user_id))]
    pub async fn submit(
        &self,
        principal: &Principal,
        document_url: String,
    ) -> AppResult<IdentityRecord> {
        match self.repo.find_latest_by_renter(principal.user_id).await? {
            Some(existing) if existing.is_approved() => {
                warn!(identity_id = %existing.id, "Re-upload attempted on approved identity");
                Err(AppError::Conflict(
                    "identity already uploaded and approved".to_string(),
                ))
            }
            Some(mut existing) => {
                existing.reset_document(document_url, Utc::now());
                let saved = self.repo.update(&existing).await?;
                info!(identity_id = %saved.id, "Identity document replaced, review reset");
                Ok(saved)
            }
            None => {
                let record = IdentityRecord::new(principal.user_id, document_url);
                let saved = self.repo.create(&record).await?;
                info!(identity_id = %saved.id, "Identity document submitted");
                Ok(saved)
            }
        }
    }

    /// Replace the document on an existing record
    ///
    /// Unlike `submit`, requires a record to already exist; used after a
    /// rejection. Approved records cannot be replaced.
    #[instrument(skip(self, document_url), fields(renter_id = %principal.user_id))]
    pub async fn resubmit(
        &self,
        principal: &Principal,
        document_url: String,
    ) -> AppResult<IdentityRecord> {
        let mut record = self
            .repo
            .find_latest_by_renter(principal.user_id)
            .await?
            .ok_or_else(|| AppError::IdentityNotFound(principal.user_id.to_string()))?;

        if record.is_approved() {
            warn!(identity_id = %record.id, "Re-upload attempted on approved identity");
            return Err(AppError::Conflict(
                "identity already uploaded and approved".to_string(),
            ));
        }

        record.reset_document(document_url, Utc::now());
        let saved = self.repo.update(&record).await?;
        info!(identity_id = %saved.id, "Identity document replaced, review reset");
        Ok(saved)
    }

    /// Current record for the calling renter
    #[instrument(skip(self), fields(renter_id = %principal.user_id))]
    pub async fn status(&self, principal: &Principal) -> AppResult<IdentityRecord> {
        self.repo
            .find_latest_by_renter(principal.user_id)
            .await?
            .ok_or_else(|| AppError::IdentityNotFound(principal.user_id.to_string()))
    }

    /// Apply a staff review decision to a record
    ///
    /// Approval marks the record verified; rejection stores the reason.
    /// The denormalized status on the renter's bookings is refreshed in
    /// the same transaction by the repository.
    #[instrument(skip(self, reason), fields(reviewer_id = %principal.user_id, identity_id = %identity_id))]
    pub async fn decide(
        &self,
        principal: &Principal,
        identity_id: Uuid,
        decision: &str,
        reason: Option<String>,
    ) -> AppResult<IdentityRecord> {
        if !principal.is_staff() {
            warn!("Non-staff caller attempted identity decision");
            return Err(AppError::Forbidden);
        }

        let decision = IdentityDecision::from_str(decision).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "decision must be 'approved' or 'rejected', got '{}'",
                decision
            ))
        })?;

        let mut record = self
            .repo
            .find_by_id(identity_id)
            .await?
            .ok_or_else(|| AppError::IdentityNotFound(identity_id.to_string()))?;

        record.apply_decision(decision, reason, Utc::now());
        let saved = self.repo.apply_decision(&record).await?;
        info!(
            renter_id = %saved.renter_id,
            status = %saved.status,
            "Identity decision applied"
        );
        Ok(saved)
    }
}
