//! Survey flow controller: a pure, table-driven interpreter.
//!
//! The controller owns a single [`Session`] and never performs I/O. Every
//! operation either rejects the input (leaving the session untouched) or
//! mutates the session and returns the [`Effect`]s the adapter must carry out.

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::FlowConfig;
use crate::error::SurveyError;

use super::branch::{Note, route};
use super::effect::Effect;
use super::node::NodeId;
use super::script;
use super::session::{DeviceState, Session, SubmissionState};

/// What became of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint stored the responses.
    Accepted { message: Option<String> },
    /// The endpoint answered but refused (duplicate, validation, ...).
    Rejected { message: Option<String> },
    /// The endpoint was never reached or answered gibberish.
    TransportFailed,
}

/// Synthesize a new participant identifier.
pub fn new_user_id() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

pub struct SurveyController {
    config: FlowConfig,
    session: Option<Session>,
}

impl SurveyController {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The node awaiting an answer, if a session is running.
    pub fn current_node(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.current_node)
    }

    /// Whether `finish()` would issue a submission right now.
    pub fn can_finish(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            s.current_node.is_terminal()
                && matches!(
                    s.submission,
                    SubmissionState::NotSubmitted | SubmissionState::Failed
                )
        })
    }

    /// Begin a session for `name` on a device in state `device`.
    pub fn start(&mut self, name: &str, device: &DeviceState) -> Result<Vec<Effect>, SurveyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SurveyError::BlankName);
        }
        if self.session.is_some() {
            return Err(SurveyError::AlreadyStarted);
        }
        if device.completed {
            info!("Survey start refused: device already completed");
            return Err(SurveyError::AlreadyCompleted);
        }

        let mut effects = Vec::new();
        let user_id = match device.user_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let id = new_user_id();
                effects.push(Effect::PersistUserId(id.clone()));
                id
            }
        };
        info!(user_id = %user_id, "Survey started");

        let session = Session::new(name, user_id);
        effects.push(Effect::Say(script::greeting(&session.user_name)));
        effects.push(Effect::Pause(self.config.pacing.greeting));
        effects.push(present(session.current_node));
        self.session = Some(session);
        Ok(effects)
    }

    /// Record `value` as the answer to `node` and advance.
    pub fn answer(&mut self, node: NodeId, value: &str) -> Result<Vec<Effect>, SurveyError> {
        let session = self.session.as_mut().ok_or(SurveyError::NotStarted)?;
        if session.current_node != node {
            return Err(SurveyError::WrongNode {
                expected: session.current_node,
                got: node,
            });
        }

        if node.is_free_text() {
            let text = value.trim();
            let next = route(node, text).ok_or(SurveyError::BlankAnswer)?.next;
            session.closing_text = Some(text.to_string());
            session.current_node = next;
            debug!(user_id = %session.user_id, "Open-ended answer captured");
            return Ok(vec![
                Effect::Echo(text.to_string()),
                Effect::Pause(self.config.pacing.finish),
            ]);
        }

        let invalid = || SurveyError::InvalidOption {
            node,
            value: value.to_string(),
        };
        let choice = node.choice(value).ok_or_else(invalid)?;
        let next = route(node, value).ok_or_else(invalid)?;

        session.record(node, choice.value);
        session.current_node = next.next;
        debug!(
            user_id = %session.user_id,
            node = %node,
            answer = choice.value,
            next = %next.next,
            "Answer recorded"
        );

        let mut effects = vec![Effect::Echo(choice.label.to_string())];
        if let Some(note) = next.note {
            effects.extend(note_effects(&self.config, note));
        }
        effects.push(Effect::Pause(self.config.pacing.step));
        effects.push(present(next.next));
        Ok(effects)
    }

    /// Issue the terminal submission (or retry it after a transport failure).
    pub fn finish(&mut self) -> Result<Vec<Effect>, SurveyError> {
        let session = self.session.as_mut().ok_or(SurveyError::NotStarted)?;
        if !session.current_node.is_terminal() {
            return Err(SurveyError::NotFinished {
                current: session.current_node,
            });
        }

        let mut effects = Vec::new();
        match session.submission {
            SubmissionState::InFlight => return Err(SurveyError::SubmissionInFlight),
            SubmissionState::Resolved => return Err(SurveyError::AlreadySubmitted),
            SubmissionState::Failed => {
                info!(user_id = %session.user_id, "Retrying submission");
            }
            SubmissionState::NotSubmitted => {
                let Some(text) = session.closing_text.clone() else {
                    return Err(SurveyError::NotFinished {
                        current: NodeId::OpenEnded,
                    });
                };
                session.record(NodeId::OpenEnded, text);
                effects.push(Effect::Say(script::farewell(&session.user_name)));
            }
        }

        session.submission = SubmissionState::InFlight;
        info!(
            user_id = %session.user_id,
            responses = session.responses.len(),
            "Submitting responses"
        );
        effects.push(Effect::Submit(session.payload()));
        Ok(effects)
    }

    /// Feed back the result of the outstanding submission.
    pub fn resolve(&mut self, outcome: SubmitOutcome) -> Result<Vec<Effect>, SurveyError> {
        let session = self.session.as_mut().ok_or(SurveyError::NotStarted)?;
        if session.submission != SubmissionState::InFlight {
            return Err(SurveyError::NothingToResolve);
        }

        let effects = match outcome {
            SubmitOutcome::Accepted { message } => {
                info!(
                    user_id = %session.user_id,
                    reply = message.as_deref().unwrap_or_default(),
                    "Submission accepted"
                );
                session.submission = SubmissionState::Resolved;
                session.completed = true;
                vec![Effect::MarkCompleted]
            }
            SubmitOutcome::Rejected { message } => {
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| script::SUBMISSION_REJECTED.to_string());
                info!(user_id = %session.user_id, reason = %message, "Submission refused by endpoint");
                session.submission = SubmissionState::Resolved;
                session.completed = true;
                vec![
                    Effect::Say(script::server_notice(&message)),
                    Effect::MarkCompleted,
                ]
            }
            SubmitOutcome::TransportFailed => {
                info!(user_id = %session.user_id, "Submission failed in transport; retry allowed");
                session.submission = SubmissionState::Failed;
                vec![Effect::Say(script::SUBMISSION_FAILED.to_string())]
            }
        };
        Ok(effects)
    }
}

fn present(node: NodeId) -> Effect {
    if node.is_free_text() {
        Effect::AskText {
            node,
            prompt: node.prompt(),
        }
    } else {
        Effect::Ask {
            node,
            prompt: node.prompt(),
            choices: node.choices(),
        }
    }
}

fn note_effects(config: &FlowConfig, note: Note) -> Vec<Effect> {
    match note {
        Note::MedicationReminder => vec![Effect::Say(script::MEDICATION_REMINDER.to_string())],
        Note::AdherenceReminder => vec![Effect::Say(script::ADHERENCE_REMINDER.to_string())],
        Note::ContactInfo => vec![Effect::Say(script::contact_info(&config.contact_number))],
        Note::ContactLine => vec![Effect::Say(script::contact_line(&config.contact_number))],
        Note::Suggestions => vec![
            Effect::Say(script::SUGGESTIONS_INTRO.to_string()),
            Effect::Suggest {
                title: script::SUGGESTIONS_TITLE,
                items: script::SUGGESTIONS,
            },
            Effect::Pause(config.pacing.suggestion),
            Effect::Say(script::SUGGESTIONS_OUTRO.to_string()),
        ],
    }
}
