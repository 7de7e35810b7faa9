//! The `Database` trait, a single async interface for all persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::survey::Response;

/// One accepted submission as held by the collection service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubmission {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub responses: Vec<Response>,
    pub submitted_at: DateTime<Utc>,
}

/// Backend-agnostic database trait covering settings and survey responses.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Settings ────────────────────────────────────────────────────

    /// Get a JSON setting for a user (or device).
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Upsert a JSON setting.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    // ── Survey responses ────────────────────────────────────────────

    /// Append an accepted submission.
    async fn insert_submission(&self, submission: &StoredSubmission) -> Result<(), DatabaseError>;

    /// When `user_id` last submitted, if ever.
    async fn latest_submission_at(
        &self,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>, DatabaseError>;

    /// Every stored submission, newest first.
    async fn list_submissions(&self) -> Result<Vec<StoredSubmission>, DatabaseError>;
}
