//! Identity record repository implementation
//!
//! Provides PostgreSQL-backed storage for renter identity documents.
//! Review decisions also refresh the denormalized identity-status
//! projection on the renter's bookings, inside the same transaction.

use renta_core::{
    models::{IdentityRecord, IdentityStatus},
    traits::IdentityRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of IdentityRepository
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    /// Create a new identity repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse identity status from string
    fn parse_status(s: &str) -> IdentityStatus {
        IdentityStatus::from_str(s).unwrap_or(IdentityStatus::Pending)
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    #[instrument(skip(self))]
    async fn find_latest_by_renter(&self, renter_id: Uuid) -> AppResult<Option<IdentityRecord>> {
        debug!("Finding identity record for renter: {}", renter_id);

        let result = sqlx::query_as::<sqlx::Postgres, IdentityRow>(
            r#"
            SELECT
                id, renter_id, document_url, verified, status,
                rejection_reason, verified_at, created_at, updated_at
            FROM identity_documents
            WHERE renter_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(renter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding identity for renter {}: {}", renter_id, e);
            AppError::Database(format!("Failed to find identity record: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<IdentityRecord>> {
        debug!("Finding identity record by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, IdentityRow>(
            r#"
            SELECT
                id, renter_id, document_url, verified, status,
                rejection_reason, verified_at, created_at, updated_at
            FROM identity_documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding identity {}: {}", id, e);
            AppError::Database(format!("Failed to find identity record: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, record))]
    async fn create(&self, record: &IdentityRecord) -> AppResult<IdentityRecord> {
        debug!("Creating identity record for renter: {}", record.renter_id);

        let row = sqlx::query_as::<sqlx::Postgres, IdentityRow>(
            r#"
            INSERT INTO identity_documents (
                id, renter_id, document_url, verified, status,
                rejection_reason, verified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, renter_id, document_url, verified, status,
                rejection_reason, verified_at, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(record.renter_id)
        .bind(&record.document_url)
        .bind(record.verified)
        .bind(record.status.to_string())
        .bind(&record.rejection_reason)
        .bind(record.verified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating identity record: {}", e);
            AppError::Database(format!("Failed to create identity record: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, record))]
    async fn update(&self, record: &IdentityRecord) -> AppResult<IdentityRecord> {
        debug!("Updating identity record: {}", record.id);

        let row = sqlx::query_as::<sqlx::Postgres, IdentityRow>(
            r#"
            UPDATE identity_documents
            SET document_url = $2,
                verified = $3,
                status = $4,
                rejection_reason = $5,
                verified_at = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, renter_id, document_url, verified, status,
                rejection_reason, verified_at, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.document_url)
        .bind(record.verified)
        .bind(record.status.to_string())
        .bind(&record.rejection_reason)
        .bind(record.verified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating identity record {}: {}", record.id, e);
            AppError::Database(format!("Failed to update identity record: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, record))]
    async fn apply_decision(&self, record: &IdentityRecord) -> AppResult<IdentityRecord> {
        debug!(
            "Applying decision {} to identity record {}",
            record.status, record.id
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        let row = sqlx::query_as::<sqlx::Postgres, IdentityRow>(
            r#"
            UPDATE identity_documents
            SET verified = $2,
                status = $3,
                rejection_reason = $4,
                verified_at = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, renter_id, document_url, verified, status,
                rejection_reason, verified_at, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(record.verified)
        .bind(record.status.to_string())
        .bind(&record.rejection_reason)
        .bind(record.verified_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error applying identity decision: {}", e);
            AppError::Database(format!("Failed to apply identity decision: {}", e))
        })?;

        // Refresh the denormalized projection on the renter's bookings
        sqlx::query(
            r#"
            UPDATE bookings
            SET identity_status = $2,
                updated_at = NOW()
            WHERE renter_id = $1
            "#,
        )
        .bind(record.renter_id)
        .bind(record.status.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error refreshing booking identity status: {}", e);
            AppError::Database(format!("Failed to refresh booking projection: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(row.into())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    renter_id: Uuid,
    document_url: String,
    verified: bool,
    status: String,
    rejection_reason: Option<String>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IdentityRow> for IdentityRecord {
    fn from(row: IdentityRow) -> Self {
        Self {
            id: row.id,
            renter_id: row.renter_id,
            document_url: row.document_url,
            verified: row.verified,
            status: PgIdentityRepository::parse_status(&row.status),
            rejection_reason: row.rejection_reason,
            verified_at: row.verified_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
