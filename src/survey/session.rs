//! Session state: one participant's single pass through the survey.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question: String,
    pub answer: String,
}

impl Response {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Where the terminal submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    NotSubmitted,
    /// A submit call is outstanding.
    InFlight,
    /// The last attempt never reached the endpoint; may be retried.
    Failed,
    /// The endpoint answered (accepted or refused). Final.
    Resolved,
}

/// Device-held state consulted at `start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub user_id: Option<String>,
    pub completed: bool,
}

/// A participant's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_name: String,
    pub user_id: String,
    /// Answers in traversal order.
    pub responses: Vec<Response>,
    pub current_node: NodeId,
    pub completed: bool,
    pub submission: SubmissionState,
    /// Open-ended answer, held until `finish()` records it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_text: Option<String>,
}

impl Session {
    pub fn new(user_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            user_id: user_id.into(),
            responses: Vec::new(),
            current_node: NodeId::FIRST,
            completed: false,
            submission: SubmissionState::NotSubmitted,
            closing_text: None,
        }
    }

    pub fn record(&mut self, node: NodeId, answer: impl Into<String>) {
        self.responses.push(Response::new(node.question(), answer));
    }

    /// The payload for the acceptance endpoint.
    pub fn payload(&self) -> Submission {
        Submission {
            user_id: self.user_id.clone(),
            name: self.user_name.clone(),
            responses: self.responses.clone(),
        }
    }
}

/// Body of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub responses: Vec<Response>,
}
