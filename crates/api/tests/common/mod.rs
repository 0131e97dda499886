//! Shared test harness: stub collaborators and app construction.
//!
//! Each integration test binary pulls in what it needs; the rest is
//! intentionally allowed to sit unused.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use vizier_api::config::{LlmConfig, QueryConfig, ServerConfig};
use vizier_api::context::ContextCache;
use vizier_api::router::build_app_router;
use vizier_api::state::AppState;
use vizier_core::widget::Row;
use vizier_llm::messages::{ChatMessage, DataContext, LlmReply};
use vizier_llm::{DeltaSink, LanguageModel, LlmError};
use vizier_query::{QueryEngine, QueryError};

// ---------------------------------------------------------------------------
// Stub collaborators
// ---------------------------------------------------------------------------

/// Stub query engine serving canned rows.
pub struct StubQueryEngine {
    pub rows: Vec<Row>,
    /// When set, `run` fails with this upstream status.
    pub fail_run_with_status: Option<u16>,
    /// When set, `describe` fails with this upstream status.
    pub fail_describe_with_status: Option<u16>,
}

impl StubQueryEngine {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            fail_run_with_status: None,
            fail_describe_with_status: None,
        }
    }
}

#[async_trait]
impl QueryEngine for StubQueryEngine {
    async fn run(&self, _sql: &str) -> Result<Vec<Row>, QueryError> {
        match self.fail_run_with_status {
            Some(status) => Err(QueryError::Api {
                status,
                body: "stub query failure".to_string(),
            }),
            None => Ok(self.rows.clone()),
        }
    }

    async fn describe(&self, project_id: &str) -> Result<String, QueryError> {
        match self.fail_describe_with_status {
            Some(status) => Err(QueryError::Api {
                status,
                body: "stub describe failure".to_string(),
            }),
            None => Ok(format!(
                "{project_id}: sales(date DATE, daily_sales NUMERIC)"
            )),
        }
    }
}

/// Stub model replaying canned deltas followed by a canned reply.
pub struct StubLanguageModel {
    pub deltas: Vec<String>,
    pub reply: LlmReply,
}

#[async_trait]
impl LanguageModel for StubLanguageModel {
    async fn generate(
        &self,
        _question: &str,
        _context: &DataContext,
        _history: &[ChatMessage],
        deltas: DeltaSink,
    ) -> Result<LlmReply, LlmError> {
        for delta in &self.deltas {
            let _ = deltas.send(delta.clone());
        }
        Ok(self.reply.clone())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Config for tests; never read from the environment.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        context_ttl_secs: 300,
        llm: LlmConfig {
            api_url: "http://llm.invalid".to_string(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
        },
        query: QueryConfig {
            api_url: "http://query.invalid".to_string(),
            api_token: None,
        },
    }
}

/// Build the full app router around stub collaborators.
pub fn app(query: Arc<dyn QueryEngine>, llm: Arc<dyn LanguageModel>) -> Router {
    let config = test_config();
    let context = ContextCache::new(
        Arc::clone(&query),
        Duration::from_secs(config.context_ttl_secs),
    );
    let state = AppState {
        config: Arc::new(config.clone()),
        query,
        llm,
        context,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// POST a JSON body and return the raw response.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Collect a response body and parse it as a single JSON value.
pub async fn json_body(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, value)
}

/// Collect a streaming response body and parse its NDJSON frames.
pub async fn ndjson_frames(response: Response<Body>) -> (StatusCode, Vec<Value>) {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let frames = bytes
        .split(|b| *b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_slice(line).expect("frame should be JSON"))
        .collect();
    (status, frames)
}

/// Build rows from a JSON array of objects.
pub fn rows(value: Value) -> Vec<Row> {
    value
        .as_array()
        .expect("rows fixture must be an array")
        .iter()
        .map(|row| row.as_object().expect("row must be an object").clone())
        .collect()
}
