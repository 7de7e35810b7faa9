//! `Submitter` over HTTP with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::survey::Submission;

use super::{SubmitReply, Submitter};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpSubmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpSubmitter {
    /// `base_url` is the service root; the request goes to `{base_url}/submit`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/submit", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReply, SubmitError> {
        let resp = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Submission request failed");
                SubmitError::Transport {
                    url: self.url.clone(),
                    reason: e.to_string(),
                }
            })?;

        // Refusals arrive as 4xx/5xx with a JSON body; read it regardless.
        let status = resp.status();
        let reply: SubmitReply = resp.json().await.map_err(|e| {
            warn!(url = %self.url, status = %status, error = %e, "Undecodable submission reply");
            SubmitError::InvalidResponse {
                url: self.url.clone(),
                reason: format!("HTTP {status}: {e}"),
            }
        })?;

        debug!(status = %status, success = reply.success, "Submission reply received");
        Ok(reply)
    }
}
