//! SurveyRunner: carries out controller effects against real I/O.
//!
//! The controller decides what happens and the runner performs it.
//! Submission outcomes are fed straight back into the controller so the
//! caller only ever sees the settled state.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::FlowConfig;
use crate::error::Result;
use crate::store::DeviceStore;
use crate::submit::Submitter;
use crate::surface::ChatSurface;

use super::controller::{SubmitOutcome, SurveyController};
use super::effect::Effect;
use super::node::NodeId;
use super::session::{Session, SubmissionState};

pub struct SurveyRunner<S> {
    controller: SurveyController,
    device: Arc<dyn DeviceStore>,
    submitter: Arc<dyn Submitter>,
    surface: S,
}

impl<S: ChatSurface> SurveyRunner<S> {
    pub fn new(
        config: FlowConfig,
        device: Arc<dyn DeviceStore>,
        submitter: Arc<dyn Submitter>,
        surface: S,
    ) -> Self {
        Self {
            controller: SurveyController::new(config),
            device,
            submitter,
            surface,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.controller.session()
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.controller.current_node()
    }

    pub fn submission_state(&self) -> Option<SubmissionState> {
        self.session().map(|s| s.submission)
    }

    pub fn can_finish(&self) -> bool {
        self.controller.can_finish()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Load the device state and begin the session.
    pub async fn start(&mut self, name: &str) -> Result<()> {
        let device = self.device.load().await?;
        let effects = self.controller.start(name, &device)?;
        self.execute(effects).await
    }

    pub async fn answer(&mut self, node: NodeId, value: &str) -> Result<()> {
        let effects = self.controller.answer(node, value)?;
        self.execute(effects).await
    }

    /// Submit (or resubmit) and settle the outcome.
    pub async fn finish(&mut self) -> Result<SubmissionState> {
        let effects = self.controller.finish()?;
        self.execute(effects).await?;
        Ok(self
            .submission_state()
            .unwrap_or(SubmissionState::NotSubmitted))
    }

    /// Run effects in order. Rendering errors do not stop later effects, so a
    /// broken surface can never strand a submission in flight; the first one
    /// is returned once the queue drains.
    async fn execute(&mut self, effects: Vec<Effect>) -> Result<()> {
        let mut queue = VecDeque::from(effects);
        let mut render_error = None;

        while let Some(effect) = queue.pop_front() {
            let rendered = match effect {
                Effect::Say(text) => self.surface.bot_message(&text).await,
                Effect::Echo(text) => self.surface.user_message(&text).await,
                Effect::Ask {
                    node,
                    prompt,
                    choices,
                } => self.surface.show_choices(node, prompt, choices).await,
                Effect::AskText { node, prompt } => {
                    self.surface.show_text_prompt(node, prompt).await
                }
                Effect::Suggest { title, items } => {
                    self.surface.show_suggestions(title, items).await
                }
                Effect::Pause(delay) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(())
                }
                Effect::PersistUserId(user_id) => {
                    if let Err(e) = self.device.save_user_id(&user_id).await {
                        warn!(user_id = %user_id, error = %e, "Failed to persist participant id");
                    }
                    Ok(())
                }
                Effect::MarkCompleted => {
                    if let Err(e) = self.device.mark_completed().await {
                        warn!(error = %e, "Failed to persist completion flag");
                    }
                    Ok(())
                }
                Effect::Submit(submission) => {
                    let outcome = match self.submitter.submit(&submission).await {
                        Ok(reply) => reply.into_outcome(),
                        Err(e) => {
                            warn!(user_id = %submission.user_id, error = %e, "Submission did not reach the endpoint");
                            SubmitOutcome::TransportFailed
                        }
                    };
                    debug!(?outcome, "Resolving submission");
                    let follow_up = self.controller.resolve(outcome)?;
                    for effect in follow_up.into_iter().rev() {
                        queue.push_front(effect);
                    }
                    Ok(())
                }
            };

            if let Err(e) = rendered {
                warn!(error = %e, "Chat surface failed to render");
                render_error.get_or_insert(e);
            }
        }

        match render_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::config::Pacing;
    use crate::error::{DatabaseError, Error, SubmitError, SurveyError};
    use crate::store::{Database, LibSqlBackend, SettingsDeviceStore};
    use crate::submit::SubmitReply;
    use crate::survey::node::Choice;
    use crate::survey::script;
    use crate::survey::session::{DeviceState, Submission};

    /// Everything the surface was asked to show, as plain strings.
    #[derive(Default)]
    struct RecordingSurface {
        lines: Vec<String>,
        fail: bool,
    }

    impl RecordingSurface {
        fn push(&mut self, line: String) -> std::io::Result<()> {
            self.lines.push(line);
            if self.fail {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            } else {
                Ok(())
            }
        }

        fn count(&self, needle: &str) -> usize {
            self.lines.iter().filter(|l| l.contains(needle)).count()
        }
    }

    #[async_trait]
    impl ChatSurface for RecordingSurface {
        async fn bot_message(&mut self, text: &str) -> std::io::Result<()> {
            self.push(format!("bot: {text}"))
        }

        async fn user_message(&mut self, text: &str) -> std::io::Result<()> {
            self.push(format!("user: {text}"))
        }

        async fn show_choices(
            &mut self,
            node: NodeId,
            _prompt: &str,
            choices: &[Choice],
        ) -> std::io::Result<()> {
            self.push(format!("ask: {node} ({} options)", choices.len()))
        }

        async fn show_text_prompt(&mut self, node: NodeId, _prompt: &str) -> std::io::Result<()> {
            self.push(format!("ask: {node} (text)"))
        }

        async fn show_suggestions(&mut self, title: &str, items: &[&str]) -> std::io::Result<()> {
            self.push(format!("suggest: {title} ({})", items.len()))
        }
    }

    /// Replies from a script, one per call; records every payload.
    struct ScriptedSubmitter {
        replies: Mutex<VecDeque<std::result::Result<SubmitReply, SubmitError>>>,
        seen: Mutex<Vec<Submission>>,
    }

    impl ScriptedSubmitter {
        fn new(replies: Vec<std::result::Result<SubmitReply, SubmitError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Submission> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Submitter for ScriptedSubmitter {
        async fn submit(
            &self,
            submission: &Submission,
        ) -> std::result::Result<SubmitReply, SubmitError> {
            self.seen.lock().unwrap().push(submission.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected submit call")
        }
    }

    struct BrokenDeviceStore;

    #[async_trait]
    impl DeviceStore for BrokenDeviceStore {
        async fn load(&self) -> std::result::Result<DeviceState, DatabaseError> {
            Ok(DeviceState::default())
        }

        async fn save_user_id(&self, _user_id: &str) -> std::result::Result<(), DatabaseError> {
            Err(DatabaseError::Query("disk full".to_string()))
        }

        async fn mark_completed(&self) -> std::result::Result<(), DatabaseError> {
            Err(DatabaseError::Query("disk full".to_string()))
        }
    }

    fn flow() -> FlowConfig {
        FlowConfig {
            pacing: Pacing::instant(),
            contact_number: "021-555".to_string(),
        }
    }

    fn transport_error() -> SubmitError {
        SubmitError::Transport {
            url: "http://127.0.0.1:9/submit".to_string(),
            reason: "connection refused".to_string(),
        }
    }

    async fn device() -> Arc<SettingsDeviceStore> {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        Arc::new(SettingsDeviceStore::new(db))
    }

    async fn walk<S: ChatSurface>(runner: &mut SurveyRunner<S>, answers: &[&str]) {
        for answer in answers {
            let node = runner.current_node().unwrap();
            runner.answer(node, answer).await.unwrap();
        }
    }

    const SCENARIO_C: &[&str] = &["good", "yes", "regular", "energetic", "good", "hello"];

    #[tokio::test]
    async fn completed_run_submits_once_and_marks_device() {
        let device = device().await;
        let submitter = ScriptedSubmitter::new(vec![Ok(SubmitReply::accepted("x", "Saved"))]);
        let mut runner = SurveyRunner::new(
            flow(),
            device.clone(),
            submitter.clone(),
            RecordingSurface::default(),
        );

        runner.start("Sara").await.unwrap();
        let stored_id = device.load().await.unwrap().user_id.unwrap();
        assert_eq!(runner.session().unwrap().user_id, stored_id);

        walk(&mut runner, SCENARIO_C).await;
        assert_eq!(runner.finish().await.unwrap(), SubmissionState::Resolved);

        let calls = submitter.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_id, stored_id);
        assert_eq!(calls[0].responses.len(), 6);
        assert_eq!(calls[0].responses[5].answer, "hello");
        assert!(device.load().await.unwrap().completed);

        let surface = runner.into_surface();
        assert_eq!(surface.lines[0], format!("bot: {}", script::greeting("Sara")));
        assert_eq!(surface.lines[1], "ask: feeling_today (3 options)");
        assert_eq!(surface.count("ask: open_ended (text)"), 1);
        assert_eq!(surface.count("Thank you for taking the time"), 1);
    }

    #[tokio::test]
    async fn refusal_is_shown_and_final() {
        let device = device().await;
        let submitter = ScriptedSubmitter::new(vec![Ok(SubmitReply::refused(
            "already submitted",
            None,
        ))]);
        let mut runner = SurveyRunner::new(
            flow(),
            device.clone(),
            submitter.clone(),
            RecordingSurface::default(),
        );

        runner.start("Sara").await.unwrap();
        walk(&mut runner, SCENARIO_C).await;
        assert_eq!(runner.finish().await.unwrap(), SubmissionState::Resolved);
        assert!(device.load().await.unwrap().completed);

        assert!(matches!(
            runner.finish().await,
            Err(Error::Survey(SurveyError::AlreadySubmitted))
        ));
        assert_eq!(submitter.calls().len(), 1);
        assert_eq!(runner.into_surface().count("bot: ⚠️ already submitted"), 1);
    }

    #[tokio::test]
    async fn transport_failure_leaves_device_open_and_retry_resends_same_payload() {
        let device = device().await;
        let submitter = ScriptedSubmitter::new(vec![
            Err(transport_error()),
            Ok(SubmitReply::accepted("x", "Saved")),
        ]);
        let mut runner = SurveyRunner::new(
            flow(),
            device.clone(),
            submitter.clone(),
            RecordingSurface::default(),
        );

        runner.start("Sara").await.unwrap();
        walk(&mut runner, SCENARIO_C).await;

        assert_eq!(runner.finish().await.unwrap(), SubmissionState::Failed);
        assert!(!device.load().await.unwrap().completed);
        assert!(runner.can_finish());

        assert_eq!(runner.finish().await.unwrap(), SubmissionState::Resolved);
        assert!(device.load().await.unwrap().completed);

        let calls = submitter.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(runner.into_surface().count(script::SUBMISSION_FAILED), 1);
    }

    #[tokio::test]
    async fn completed_device_never_starts() {
        let device = device().await;
        device.mark_completed().await.unwrap();
        let submitter = ScriptedSubmitter::new(vec![]);
        let mut runner = SurveyRunner::new(
            flow(),
            device,
            submitter.clone(),
            RecordingSurface::default(),
        );

        assert!(matches!(
            runner.start("Sara").await,
            Err(Error::Survey(SurveyError::AlreadyCompleted))
        ));
        assert!(runner.session().is_none());
        assert!(runner.into_surface().lines.is_empty());
    }

    #[tokio::test]
    async fn stored_id_is_reused_without_rewriting() {
        let device = device().await;
        device.save_user_id("user_kept").await.unwrap();
        let submitter = ScriptedSubmitter::new(vec![]);
        let mut runner = SurveyRunner::new(
            flow(),
            device.clone(),
            submitter,
            RecordingSurface::default(),
        );

        runner.start("Sara").await.unwrap();
        assert_eq!(runner.session().unwrap().user_id, "user_kept");
    }

    #[tokio::test]
    async fn store_write_failures_do_not_break_the_session() {
        let submitter = ScriptedSubmitter::new(vec![Ok(SubmitReply::accepted("x", "Saved"))]);
        let mut runner = SurveyRunner::new(
            flow(),
            Arc::new(BrokenDeviceStore),
            submitter.clone(),
            RecordingSurface::default(),
        );

        runner.start("Sara").await.unwrap();
        walk(&mut runner, SCENARIO_C).await;
        assert_eq!(runner.finish().await.unwrap(), SubmissionState::Resolved);
        assert!(runner.session().unwrap().completed);
        assert_eq!(submitter.calls().len(), 1);
    }

    #[tokio::test]
    async fn broken_surface_still_settles_submission() {
        let device = device().await;
        let submitter = ScriptedSubmitter::new(vec![Ok(SubmitReply::accepted("x", "Saved"))]);
        let mut runner = SurveyRunner::new(
            flow(),
            device.clone(),
            submitter.clone(),
            RecordingSurface::default(),
        );
        runner.start("Sara").await.unwrap();
        walk(&mut runner, SCENARIO_C).await;

        runner.surface_mut().fail = true;
        assert!(matches!(runner.finish().await, Err(Error::Io(_))));
        assert_eq!(runner.submission_state(), Some(SubmissionState::Resolved));
        assert_eq!(submitter.calls().len(), 1);
        assert!(device.load().await.unwrap().completed);
    }

    #[tokio::test]
    async fn rejected_input_touches_nothing() {
        let device = device().await;
        let submitter = ScriptedSubmitter::new(vec![]);
        let mut runner = SurveyRunner::new(
            flow(),
            device.clone(),
            submitter.clone(),
            RecordingSurface::default(),
        );

        assert!(matches!(
            runner.start("  ").await,
            Err(Error::Survey(SurveyError::BlankName))
        ));
        assert_eq!(device.load().await.unwrap(), DeviceState::default());

        runner.start("Sara").await.unwrap();
        let shown = runner.surface_mut().lines.len();
        assert!(runner.answer(NodeId::FeelingToday, "great").await.is_err());
        assert!(runner.answer(NodeId::Medication, "regular").await.is_err());
        assert_eq!(runner.surface_mut().lines.len(), shown);
        assert!(submitter.calls().is_empty());
    }
}
