//! Language-model collaborator for Vizier.
//!
//! Turns a user question plus data context into either a plain-text
//! answer or one or more dry widget configs. The rest of the system only
//! depends on the [`LanguageModel`] seam and on receiving conformant
//! [`DryWidgetConfig`](vizier_core::widget::DryWidgetConfig) values --
//! not on how a reply is produced.

mod client;
pub mod messages;

pub use client::{HttpLanguageModel, LlmError};

use async_trait::async_trait;

use crate::messages::{ChatMessage, DataContext, LlmReply};

/// Sink for incremental text deltas produced while a reply is generated.
///
/// Send failures mean the receiving side has gone away (client
/// disconnected); implementations drop further deltas and finish the
/// reply normally.
pub type DeltaSink = tokio::sync::mpsc::UnboundedSender<String>;

/// Generates replies to data-exploration questions.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a reply to `question` given the project's data context and
    /// prior conversation turns. Text deltas are forwarded through
    /// `deltas` as they become available.
    async fn generate(
        &self,
        question: &str,
        context: &DataContext,
        history: &[ChatMessage],
        deltas: DeltaSink,
    ) -> Result<LlmReply, LlmError>;
}
