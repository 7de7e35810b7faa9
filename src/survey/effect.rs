//! Commands emitted by the controller for the adapter layer to carry out.

use std::time::Duration;

use super::node::{Choice, NodeId};
use super::session::Submission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Bot chat bubble.
    Say(String),
    /// Echo of what the participant picked or typed.
    Echo(String),
    /// Present a closed set of options for `node`.
    Ask {
        node: NodeId,
        prompt: &'static str,
        choices: &'static [Choice],
    },
    /// Present a free-text input for `node`.
    AskText { node: NodeId, prompt: &'static str },
    /// Render a titled list of suggestions.
    Suggest {
        title: &'static str,
        items: &'static [&'static str],
    },
    /// Conversational pacing.
    Pause(Duration),
    /// Store a freshly synthesized participant id on the device.
    PersistUserId(String),
    /// Send the responses to the acceptance endpoint.
    Submit(Submission),
    /// Set the device's completion flag.
    MarkCompleted,
}
