//! Shared response envelope types for API handlers.
//!
//! Unary endpoints use a `{ "data": ... }` envelope; the streaming ask
//! endpoint emits newline-delimited JSON frames tagged with a `kind`
//! discriminator.

use serde::Serialize;
use vizier_core::widget::WetWidgetConfig;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response
/// format.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One frame of the newline-delimited JSON stream emitted by `/ask`.
///
/// Frames arrive in order: zero or more `delta` frames while the model
/// generates, then one `widget` frame per hydrated widget or a single
/// `text` frame. An `error` frame terminates a stream whose HTTP status
/// was already committed.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamChunk {
    /// Incremental model output text.
    Delta { text: String },
    /// A fully hydrated widget.
    Widget { widget: WetWidgetConfig },
    /// Final plain-text answer (when the model produced no widget).
    Text { text: String },
    /// Terminal error frame.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
