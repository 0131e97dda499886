//! HTTP client for the upstream SQL execution service.
//!
//! Wraps the service's REST endpoints (query execution, project schema
//! description) using [`reqwest`].

use async_trait::async_trait;
use serde::Deserialize;
use vizier_core::widget::Row;

use crate::{QueryEngine, QueryError};

/// HTTP-backed [`QueryEngine`] implementation.
pub struct HttpQueryEngine {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

/// Response returned by the `/v1/queries` endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    rows: Vec<Row>,
}

/// Response returned by the `/v1/projects/{id}/schema` endpoint.
#[derive(Debug, Deserialize)]
struct SchemaResponse {
    description: String,
}

impl HttpQueryEngine {
    /// Create a client for the execution service.
    ///
    /// * `base_url`  - Base HTTP URL, e.g. `https://query.internal:8443`.
    /// * `api_token` - Optional bearer token attached to every request.
    pub fn new(base_url: String, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful for
    /// connection pooling across collaborators).
    pub fn with_client(
        client: reqwest::Client,
        base_url: String,
        api_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_token,
        }
    }

    // ---- private helpers ----

    /// Attach the bearer token when one is configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`QueryError::Api`] carrying the origin
    /// status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, QueryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(QueryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, QueryError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QueryEngine for HttpQueryEngine {
    /// Execute SQL via `POST /v1/queries` and decode the row set.
    async fn run(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        let body = serde_json::json!({ "sql": sql });

        let response = self
            .authorize(self.client.post(format!("{}/v1/queries", self.base_url)))
            .json(&body)
            .send()
            .await?;

        let payload: QueryResponse = Self::parse_response(response).await?;

        tracing::debug!(rows = payload.rows.len(), "Query executed");

        Ok(payload.rows)
    }

    /// Fetch the schema description via `GET /v1/projects/{id}/schema`.
    async fn describe(&self, project_id: &str) -> Result<String, QueryError> {
        let response = self
            .authorize(self.client.get(format!(
                "{}/v1/projects/{}/schema",
                self.base_url, project_id
            )))
            .send()
            .await?;

        let payload: SchemaResponse = Self::parse_response(response).await?;

        Ok(payload.description)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_response_decodes_nested_rows() {
        let payload: QueryResponse = serde_json::from_value(json!({
            "rows": [
                {"date": "2024-01-01", "items": [{"price": 1}]},
                {"date": "2024-01-02"}
            ]
        }))
        .expect("payload should decode");

        assert_eq!(payload.rows.len(), 2);
        assert_eq!(payload.rows[0]["items"][0]["price"], json!(1));
    }

    #[test]
    fn query_response_rejects_non_object_rows() {
        let result: Result<QueryResponse, _> = serde_json::from_value(json!({
            "rows": [1, 2, 3]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn api_error_preserves_origin_status() {
        let err = QueryError::Api {
            status: 403,
            body: "access denied".to_string(),
        };
        assert_eq!(err.to_string(), "Query engine error (403): access denied");
    }
}
