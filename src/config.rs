//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Contact number shown when the participant asks to talk to someone.
pub const DEFAULT_CONTACT_NUMBER: &str = "[contact number]";

/// Conversational pacing. Purely cosmetic; no logic depends on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after the greeting, before the first question.
    pub greeting: Duration,
    /// Pause between an answer and the next question.
    pub step: Duration,
    /// Pause after the suggestion list.
    pub suggestion: Duration,
    /// Pause between the open-ended answer and submission.
    pub finish: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            greeting: Duration::from_millis(1000),
            step: Duration::from_millis(1500),
            suggestion: Duration::from_millis(2000),
            finish: Duration::from_millis(1000),
        }
    }
}

impl Pacing {
    /// No pauses at all (tests, scripted runs).
    pub fn instant() -> Self {
        Self {
            greeting: Duration::ZERO,
            step: Duration::ZERO,
            suggestion: Duration::ZERO,
            finish: Duration::ZERO,
        }
    }
}

/// Flow settings consumed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    pub pacing: Pacing,
    pub contact_number: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            contact_number: DEFAULT_CONTACT_NUMBER.to_string(),
        }
    }
}

/// Client-side (chat) configuration.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub flow: FlowConfig,
    /// Base URL of the acceptance endpoint (without `/submit`).
    pub submit_url: String,
    /// Device-local database holding the participant id and completion flag.
    pub db_path: PathBuf,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            flow: FlowConfig::default(),
            submit_url: "http://127.0.0.1:5002".to_string(),
            db_path: PathBuf::from("./data/survey-device.db"),
        }
    }
}

impl SurveyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let pacing = Pacing {
            greeting: millis(&lookup, "SURVEY_GREETING_DELAY_MS", defaults.flow.pacing.greeting)?,
            step: millis(&lookup, "SURVEY_STEP_DELAY_MS", defaults.flow.pacing.step)?,
            suggestion: millis(
                &lookup,
                "SURVEY_SUGGESTION_DELAY_MS",
                defaults.flow.pacing.suggestion,
            )?,
            finish: millis(&lookup, "SURVEY_FINISH_DELAY_MS", defaults.flow.pacing.finish)?,
        };

        Ok(Self {
            flow: FlowConfig {
                pacing,
                contact_number: lookup("SURVEY_CONTACT_NUMBER")
                    .unwrap_or(defaults.flow.contact_number),
            },
            submit_url: lookup("SURVEY_SUBMIT_URL").unwrap_or(defaults.submit_url),
            db_path: lookup("SURVEY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        })
    }
}

/// Acceptance endpoint configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    /// `None` accepts one submission per user ever; `Some(n)` allows another
    /// once `n` days have passed since the last one.
    pub resubmit_after_days: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5002,
            db_path: PathBuf::from("./data/survey-responses.db"),
            resubmit_after_days: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match lookup("SURVEY_SERVER_PORT") {
            Some(raw) => parse(&raw, "SURVEY_SERVER_PORT")?,
            None => defaults.port,
        };
        let resubmit_after_days = match lookup("SURVEY_RESUBMIT_AFTER_DAYS") {
            Some(raw) if !raw.trim().is_empty() => Some(parse(&raw, "SURVEY_RESUBMIT_AFTER_DAYS")?),
            _ => None,
        };

        Ok(Self {
            port,
            db_path: lookup("SURVEY_SERVER_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            resubmit_after_days,
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match lookup(key) {
        Some(raw) => Ok(Duration::from_millis(parse(&raw, key)?)),
        None => Ok(default),
    }
}

fn parse<T>(raw: &str, key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}': {e}"),
    })
}
