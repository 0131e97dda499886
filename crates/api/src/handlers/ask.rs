//! Handler for the conversational ask endpoint.
//!
//! A single POST drives the whole turn: fetch the project's data context,
//! let the model answer (streaming its text deltas), execute the SQL of
//! any widget configs it produced, hydrate each against the result rows,
//! and emit everything as a chunked newline-delimited JSON response.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use validator::Validate;

use vizier_core::hydration::hydrate;
use vizier_llm::messages::{ChatMessage, DataContext, LlmReply};
use vizier_llm::{DeltaSink, LanguageModel};
use vizier_query::QueryEngine;

use crate::error::{AppError, AppResult};
use crate::response::StreamChunk;
use crate::state::AppState;

/// Request body for `POST /api/v1/ask`.
#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    /// The natural-language question.
    #[validate(length(min = 1, max = 4000, message = "question must be 1-4000 characters"))]
    pub question: String,
    /// Project whose datasets the question is about.
    #[validate(length(min = 1, message = "project_id is required"))]
    pub project_id: String,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// POST /api/v1/ask
///
/// Streams `application/x-ndjson` frames: `delta` frames while the model
/// generates, then one `widget` frame per hydrated widget or a final
/// `text` frame. Failures before the stream starts (validation, context
/// fetch) return a regular JSON error response; failures after the
/// status is committed terminate the stream with an `error` frame.
pub async fn ask(
    State(state): State<AppState>,
    Json(input): Json<AskRequest>,
) -> AppResult<Response> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(project_id = %input.project_id, "Question received");

    let context = state.context.get(&input.project_id).await?;

    let (delta_tx, delta_rx) = tokio::sync::mpsc::unbounded_channel();

    let llm = Arc::clone(&state.llm);
    let query = Arc::clone(&state.query);
    let AskRequest {
        question, history, ..
    } = input;

    let pipeline =
        tokio::spawn(
            async move { run_pipeline(llm, query, question, context, history, delta_tx).await },
        );

    // Deltas drain first; the sink is dropped when generation finishes,
    // which ends this stream and hands over to the pipeline result.
    let deltas =
        UnboundedReceiverStream::new(delta_rx).map(|text| StreamChunk::Delta { text });

    let tail = futures::stream::once(async move {
        match pipeline.await {
            Ok(Ok(chunks)) => chunks,
            Ok(Err(err)) => {
                tracing::error!(error = %err, "Ask pipeline failed");
                vec![StreamChunk::Error {
                    message: err.to_string(),
                }]
            }
            Err(join_err) => {
                tracing::error!(error = %join_err, "Ask pipeline panicked");
                vec![StreamChunk::Error {
                    message: "Internal error".to_string(),
                }]
            }
        }
    })
    .flat_map(futures::stream::iter);

    let frames = deltas.chain(tail).map(|chunk| encode_frame(&chunk));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(frames))
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(response)
}

/// Run one turn: generate a reply, then execute and hydrate any widgets.
async fn run_pipeline(
    llm: Arc<dyn LanguageModel>,
    query: Arc<dyn QueryEngine>,
    question: String,
    context: DataContext,
    history: Vec<ChatMessage>,
    deltas: DeltaSink,
) -> Result<Vec<StreamChunk>, AppError> {
    let reply = llm.generate(&question, &context, &history, deltas).await?;

    match reply {
        LlmReply::Text(text) => Ok(vec![StreamChunk::Text { text }]),
        LlmReply::Widgets(configs) => {
            let mut chunks = Vec::with_capacity(configs.len());
            for config in configs {
                let rows = query.run(&config.sql).await?;
                tracing::debug!(
                    widget = %config.title,
                    rows = rows.len(),
                    "Hydrating widget"
                );
                chunks.push(StreamChunk::Widget {
                    widget: hydrate(&config, &rows),
                });
            }
            Ok(chunks)
        }
    }
}

/// Encode one stream chunk as a newline-terminated JSON frame.
fn encode_frame(chunk: &StreamChunk) -> Result<Bytes, serde_json::Error> {
    let mut buf = serde_json::to_vec(chunk)?;
    buf.push(b'\n');
    Ok(Bytes::from(buf))
}
