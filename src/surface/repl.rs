//! Interactive line-based session: name, answers, submission, retry.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::info;

use crate::error::{Error, Result, SurveyError};
use crate::survey::{NodeId, SubmissionState, SurveyRunner, script};

use super::ChatSurface;

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEnd {
    /// The endpoint answered; the device is marked completed.
    Settled,
    /// This device had already taken part.
    AlreadyCompleted,
    /// Transport failed and the participant declined to retry.
    Unsent,
    /// Input ended before the survey was submitted.
    InputClosed,
}

/// Resolve typed input to an option value: a 1-based number or the value itself.
pub fn parse_choice(node: NodeId, input: &str) -> Option<&'static str> {
    let input = input.trim();
    let choices = node.choices();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| choices.get(i)).map(|c| c.value);
    }
    choices
        .iter()
        .find(|c| c.value.eq_ignore_ascii_case(input))
        .map(|c| c.value)
}

/// Drive one full session from `input` until it settles or input runs out.
pub async fn run_chat<S, R>(runner: &mut SurveyRunner<S>, input: R) -> Result<ChatEnd>
where
    S: ChatSurface,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    // ── Name ────────────────────────────────────────────────────────
    loop {
        runner.surface_mut().bot_message(script::NAME_PROMPT).await?;
        let Some(name) = next_line(&mut lines).await? else {
            return Ok(ChatEnd::InputClosed);
        };
        match runner.start(&name).await {
            Ok(()) => break,
            Err(Error::Survey(SurveyError::BlankName)) => {
                notice(runner, &SurveyError::BlankName).await?;
            }
            Err(Error::Survey(e @ SurveyError::AlreadyCompleted)) => {
                notice(runner, &e).await?;
                return Ok(ChatEnd::AlreadyCompleted);
            }
            Err(e) => return Err(e),
        }
    }

    // ── Questions ───────────────────────────────────────────────────
    while let Some(node) = runner.current_node().filter(|n| !n.is_terminal()) {
        let Some(line) = next_line(&mut lines).await? else {
            info!(node = %node, "Input closed mid-survey");
            return Ok(ChatEnd::InputClosed);
        };

        let value = if node.is_free_text() {
            line
        } else {
            match parse_choice(node, &line) {
                Some(value) => value.to_string(),
                None => {
                    let hint = format!("Please pick one of the options (1-{}).", node.choices().len());
                    runner.surface_mut().bot_message(&hint).await?;
                    continue;
                }
            }
        };

        match runner.answer(node, &value).await {
            Ok(()) => {}
            Err(Error::Survey(e)) => notice(runner, &e).await?,
            Err(e) => return Err(e),
        }
    }

    // ── Submission ──────────────────────────────────────────────────
    loop {
        match runner.finish().await? {
            SubmissionState::Failed => {
                runner.surface_mut().bot_message(script::RETRY_PROMPT).await?;
                let again = next_line(&mut lines).await?;
                let yes = again
                    .as_deref()
                    .is_some_and(|a| matches!(a.trim().to_lowercase().as_str(), "y" | "yes"));
                if !yes {
                    return Ok(if again.is_some() {
                        ChatEnd::Unsent
                    } else {
                        ChatEnd::InputClosed
                    });
                }
            }
            _ => return Ok(ChatEnd::Settled),
        }
    }
}

async fn next_line<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

async fn notice<S: ChatSurface>(runner: &mut SurveyRunner<S>, error: &SurveyError) -> Result<()> {
    runner.surface_mut().bot_message(&error.to_string()).await?;
    Ok(())
}
