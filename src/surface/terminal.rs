//! Terminal rendering of the chat.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

use crate::survey::{Choice, NodeId};

use super::ChatSurface;

/// Writes the chat as plain text lines.
pub struct TerminalSurface<W = Stdout> {
    out: W,
}

impl TerminalSurface<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> ChatSurface for TerminalSurface<W> {
    async fn bot_message(&mut self, text: &str) -> std::io::Result<()> {
        self.write(&format!("\n{text}\n")).await
    }

    async fn user_message(&mut self, text: &str) -> std::io::Result<()> {
        self.write(&format!("  > {text}\n")).await
    }

    async fn show_choices(
        &mut self,
        _node: NodeId,
        prompt: &str,
        choices: &[Choice],
    ) -> std::io::Result<()> {
        let mut block = format!("\n{prompt}\n");
        for (i, choice) in choices.iter().enumerate() {
            block.push_str(&format!("  {}. {}\n", i + 1, choice.label));
        }
        self.write(&block).await
    }

    async fn show_text_prompt(&mut self, _node: NodeId, prompt: &str) -> std::io::Result<()> {
        self.write(&format!("\n{prompt}\n")).await
    }

    async fn show_suggestions(&mut self, title: &str, items: &[&str]) -> std::io::Result<()> {
        let mut block = format!("\n{title}\n");
        for item in items {
            block.push_str(&format!("  • {item}\n"));
        }
        self.write(&block).await
    }
}
