//! Presentation seam between the survey runner and whatever renders the chat.

pub mod repl;
pub mod terminal;

use async_trait::async_trait;

use crate::survey::{Choice, NodeId};

pub use repl::{ChatEnd, run_chat};
pub use terminal::TerminalSurface;

/// Renders chat output. Input is gathered by the caller driving the runner.
#[async_trait]
pub trait ChatSurface: Send {
    /// A bot bubble.
    async fn bot_message(&mut self, text: &str) -> std::io::Result<()>;

    /// Echo of the participant's own answer.
    async fn user_message(&mut self, text: &str) -> std::io::Result<()>;

    /// A question with a closed set of options.
    async fn show_choices(
        &mut self,
        node: NodeId,
        prompt: &str,
        choices: &[Choice],
    ) -> std::io::Result<()>;

    /// A question answered with free text.
    async fn show_text_prompt(&mut self, node: NodeId, prompt: &str) -> std::io::Result<()>;

    async fn show_suggestions(&mut self, title: &str, items: &[&str]) -> std::io::Result<()>;
}
