//! Error types for the wellbeing survey.

use crate::survey::NodeId;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Survey error: {0}")]
    Survey(#[from] SurveyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the survey flow controller.
///
/// All of these are rejections: the session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurveyError {
    #[error("Please enter your name")]
    BlankName,

    #[error("You have already completed this survey. Each participant can answer only once.")]
    AlreadyCompleted,

    #[error("Survey already started")]
    AlreadyStarted,

    #[error("Survey has not been started")]
    NotStarted,

    #[error("Expected an answer for {expected}, got one for {got}")]
    WrongNode { expected: NodeId, got: NodeId },

    #[error("'{value}' is not an option for {node}")]
    InvalidOption { node: NodeId, value: String },

    #[error("Answer must not be empty")]
    BlankAnswer,

    #[error("Survey is not finished yet (currently at {current})")]
    NotFinished { current: NodeId },

    #[error("Submission already in progress")]
    SubmissionInFlight,

    #[error("Responses were already submitted")]
    AlreadySubmitted,

    #[error("No submission is awaiting a result")]
    NothingToResolve,
}

/// Submission transport errors. Every variant is retryable.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Reasons the collection service turns a submission away.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("No responses provided")]
    EmptyResponses,

    #[error("This user has already responded")]
    AlreadySubmitted,

    #[error("You have already responded recently. You can respond again in {days_remaining} days.")]
    TooSoon { days_remaining: i64 },

    #[error("Storage failure: {0}")]
    Storage(#[from] DatabaseError),

    #[error("CSV export failed: {0}")]
    Export(String),
}

impl IntakeError {
    /// Whether the submitter is at fault (as opposed to the service).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyResponses | Self::AlreadySubmitted | Self::TooSoon { .. }
        )
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
