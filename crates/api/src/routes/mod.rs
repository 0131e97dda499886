pub mod ask;
pub mod health;
pub mod widgets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ask                 ask a question about a project's data (POST, NDJSON stream)
/// /widgets/hydrate     hydrate a dry widget config against rows (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(ask::router()).merge(widgets::router())
}
