//! Route definitions for conversational data exploration.

use axum::routing::post;
use axum::Router;

use crate::handlers::ask;
use crate::state::AppState;

/// Ask routes mounted at the API root.
///
/// ```text
/// POST /ask    -> ask
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ask", post(ask::ask))
}
