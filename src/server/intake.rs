//! Submission intake: validation, duplicate policy, storage, CSV export.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::IntakeError;
use crate::store::{Database, StoredSubmission};
use crate::survey::{NodeId, Submission};

/// Export columns, in order.
pub const CSV_COLUMNS: [&str; 13] = [
    "user_id",
    "name",
    "date",
    "feeling_today",
    "not_good_reason",
    "physical_issue",
    "want_to_talk",
    "positive_action",
    "medication",
    "physical_days",
    "mental_days",
    "mental_days_follow_up",
    "open_ended",
];

/// Submission times are exported in the server's local time.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Intake {
    db: Arc<dyn Database>,
    resubmit_after_days: Option<u32>,
    /// Serializes the duplicate check with the insert.
    gate: Mutex<()>,
}

impl Intake {
    /// `resubmit_after_days: None` means one submission per participant, ever.
    pub fn new(db: Arc<dyn Database>, resubmit_after_days: Option<u32>) -> Self {
        Self {
            db,
            resubmit_after_days,
            gate: Mutex::new(()),
        }
    }

    pub async fn accept(&self, submission: Submission) -> Result<StoredSubmission, IntakeError> {
        self.accept_at(submission, Utc::now()).await
    }

    pub async fn accept_at(
        &self,
        submission: Submission,
        now: DateTime<Utc>,
    ) -> Result<StoredSubmission, IntakeError> {
        if submission.responses.is_empty() {
            return Err(IntakeError::EmptyResponses);
        }
        let user_id = match submission.user_id.trim() {
            "" => Uuid::new_v4().to_string(),
            id => id.to_string(),
        };

        let _gate = self.gate.lock().await;
        if let Some(last) = self.db.latest_submission_at(&user_id).await? {
            self.check_window(&user_id, last, now)?;
        }

        let stored = StoredSubmission {
            id: Uuid::new_v4(),
            user_id,
            name: submission.name,
            responses: submission.responses,
            submitted_at: now,
        };
        self.db.insert_submission(&stored).await?;
        info!(
            user_id = %stored.user_id,
            responses = stored.responses.len(),
            "Submission accepted"
        );
        Ok(stored)
    }

    fn check_window(
        &self,
        user_id: &str,
        last: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), IntakeError> {
        let Some(window) = self.resubmit_after_days else {
            info!(user_id = %user_id, "Duplicate submission refused");
            return Err(IntakeError::AlreadySubmitted);
        };
        let days_since = (now - last).num_days();
        if days_since >= i64::from(window) {
            return Ok(());
        }
        let days_remaining = i64::from(window) - days_since;
        info!(user_id = %user_id, days_remaining, "Submission inside resubmission window refused");
        Err(IntakeError::TooSoon { days_remaining })
    }

    /// All submissions as CSV, newest first. `None` when nothing is stored.
    pub async fn export_csv(&self) -> Result<Option<String>, IntakeError> {
        let submissions = self.db.list_submissions().await?;
        if submissions.is_empty() {
            return Ok(None);
        }

        let export = |e: &dyn std::fmt::Display| IntakeError::Export(e.to_string());
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_COLUMNS).map_err(|e| export(&e))?;
        for submission in &submissions {
            writer.write_record(csv_row(submission)).map_err(|e| export(&e))?;
        }
        let bytes = writer.into_inner().map_err(|e| export(&e))?;
        String::from_utf8(bytes).map(Some).map_err(|e| export(&e))
    }
}

/// One export row. Unknown questions are dropped; answers sharing a column
/// are joined in response order.
pub fn csv_row(submission: &StoredSubmission) -> Vec<String> {
    let mut row = vec![String::new(); CSV_COLUMNS.len()];
    row[0] = submission.user_id.clone();
    row[1] = submission.name.clone();
    row[2] = submission
        .submitted_at
        .with_timezone(&Local)
        .format(DATE_FORMAT)
        .to_string();

    for response in &submission.responses {
        let Some(column) = NodeId::column_for_question(&response.question) else {
            continue;
        };
        let Some(idx) = CSV_COLUMNS.iter().position(|c| *c == column) else {
            continue;
        };
        let cell = &mut row[idx];
        if !cell.is_empty() {
            cell.push_str(", ");
        }
        cell.push_str(&response.answer);
    }
    row
}
