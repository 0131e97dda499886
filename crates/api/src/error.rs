use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vizier_core::error::CoreError;
use vizier_llm::LlmError;
use vizier_query::QueryError;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors from `vizier_core` and upstream errors from the
/// collaborator crates, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses; upstream
/// API failures surface with their origin status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vizier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the query-engine collaborator.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// An error from the language-model collaborator.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Query-engine errors ---
            AppError::Query(err) => classify_query_error(err),

            // --- Language-model errors ---
            AppError::Llm(err) => classify_llm_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a query-engine error into an HTTP status, code, and message.
///
/// - API errors pass their origin status through (502 for unmappable
///   codes).
/// - Transport failures map to 502.
fn classify_query_error(err: &QueryError) -> (StatusCode, &'static str, String) {
    match err {
        QueryError::Api { status, body } => (
            upstream_status(*status),
            "QUERY_ERROR",
            format!("Query engine error: {body}"),
        ),
        QueryError::Request(e) => {
            tracing::error!(error = %e, "Query engine unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNREACHABLE",
                "Query engine is unreachable".to_string(),
            )
        }
        QueryError::Decode(msg) => {
            tracing::error!(error = %msg, "Malformed query engine response");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Query engine returned a malformed response".to_string(),
            )
        }
    }
}

/// Classify a language-model error; same status-passthrough policy as
/// [`classify_query_error`].
fn classify_llm_error(err: &LlmError) -> (StatusCode, &'static str, String) {
    match err {
        LlmError::Api { status, body } => (
            upstream_status(*status),
            "MODEL_ERROR",
            format!("Model API error: {body}"),
        ),
        LlmError::Request(e) => {
            tracing::error!(error = %e, "Model API unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNREACHABLE",
                "Model API is unreachable".to_string(),
            )
        }
        LlmError::MalformedReply(msg) => {
            tracing::error!(error = %msg, "Malformed model reply");
            (
                StatusCode::BAD_GATEWAY,
                "MODEL_ERROR",
                "Model returned an unusable reply".to_string(),
            )
        }
    }
}

/// Map an upstream status code onto this response, falling back to 502
/// for codes that don't parse.
fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
