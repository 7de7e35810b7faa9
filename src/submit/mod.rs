//! Client side of the acceptance endpoint.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::survey::{SubmitOutcome, Submission};

pub use http::HttpSubmitter;

/// Body returned by `POST /submit`, whatever the HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitReply {
    pub fn accepted(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            user_id: Some(user_id.into()),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn refused(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            user_id: None,
            error: Some(error.into()),
            message,
        }
    }

    /// Interpret the reply. A refusal prefers `error` over `message`.
    pub fn into_outcome(self) -> SubmitOutcome {
        if self.success {
            SubmitOutcome::Accepted {
                message: self.message,
            }
        } else {
            SubmitOutcome::Rejected {
                message: self.error.or(self.message),
            }
        }
    }
}

/// Sends a finished survey to the acceptance endpoint.
///
/// `Err` means the endpoint was never reached or answered something that is
/// not a [`SubmitReply`]; both are retryable.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReply, SubmitError>;
}
