//! libSQL implementation of the `Database` trait.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{Database, StoredSubmission};
use crate::survey::Response;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn row_to_submission(row: &libsql::Row) -> Result<StoredSubmission, DatabaseError> {
    let query = |e: libsql::Error| DatabaseError::Query(format!("row_to_submission: {e}"));

    let id: String = row.get(0).map_err(query)?;
    let user_id: String = row.get(1).map_err(query)?;
    let name: String = row.get(2).map_err(query)?;
    let responses_json: String = row.get(3).map_err(query)?;
    let submitted_at: String = row.get(4).map_err(query)?;

    let responses: Vec<Response> = serde_json::from_str(&responses_json)
        .map_err(|e| DatabaseError::Serialization(format!("submission {id}: {e}")))?;

    Ok(StoredSubmission {
        id: id.parse().unwrap_or_else(|_| Uuid::nil()),
        user_id,
        name,
        responses,
        submitted_at: parse_datetime(&submitted_at),
    })
}

// ── Trait implementation ────────────────────────────────────────────

const SUBMISSION_COLUMNS: &str = "id, user_id, name, responses, submitted_at";

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Settings ────────────────────────────────────────────────────

    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row.get(0).unwrap_or_else(|_| "null".to_string());
                let value: serde_json::Value =
                    serde_json::from_str(&value_str).unwrap_or(serde_json::Value::Null);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_setting: {e}"))),
        }
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = format_datetime(&Utc::now());
        let value_str = serde_json::to_string(value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![user_id, key, value_str, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("set_setting: {e}")))?;

        Ok(())
    }

    // ── Survey responses ────────────────────────────────────────────

    async fn insert_submission(&self, submission: &StoredSubmission) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let responses = serde_json::to_string(&submission.responses)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO survey_responses (id, user_id, name, responses, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                submission.id.to_string(),
                submission.user_id.as_str(),
                submission.name.as_str(),
                responses,
                format_datetime(&submission.submitted_at)
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_submission: {e}")))?;

        debug!(id = %submission.id, user_id = %submission.user_id, "Submission stored");
        Ok(())
    }

    async fn latest_submission_at(
        &self,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT MAX(submitted_at) FROM survey_responses WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("latest_submission_at: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let latest: Option<String> = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("latest_submission_at: {e}")))?;
                Ok(latest.as_deref().map(parse_datetime))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("latest_submission_at: {e}"))),
        }
    }

    async fn list_submissions(&self) -> Result<Vec<StoredSubmission>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SUBMISSION_COLUMNS} FROM survey_responses
                     ORDER BY submitted_at DESC, rowid DESC"
                ),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_submissions: {e}")))?;

        let mut submissions = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_submissions: {e}")))?
        {
            submissions.push(row_to_submission(&row)?);
        }
        Ok(submissions)
    }
}
