//! Integration test for the root-level health check.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use common::{app, json_body, StubLanguageModel, StubQueryEngine};
use vizier_llm::messages::LlmReply;

#[tokio::test]
async fn health_reports_ok_and_version() {
    let app = app(
        Arc::new(StubQueryEngine::with_rows(Vec::new())),
        Arc::new(StubLanguageModel {
            deltas: Vec::new(),
            reply: LlmReply::Text(String::new()),
        }),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should not fail at the transport level");

    let (status, value) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "ok");
    assert!(value["version"].is_string());
}
