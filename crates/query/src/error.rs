/// Errors from the query-engine HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code. The origin status is
    /// preserved so callers can surface it.
    #[error("Query engine error ({status}): {body}")]
    Api {
        /// HTTP status code returned by the engine.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The engine answered 2xx but the payload did not decode.
    #[error("Malformed query response: {0}")]
    Decode(String),
}
