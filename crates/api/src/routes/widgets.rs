//! Route definitions for direct widget hydration.

use axum::routing::post;
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// Widget routes mounted at `/widgets`.
///
/// ```text
/// POST /hydrate    -> hydrate_widget
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/widgets/hydrate", post(widgets::hydrate_widget))
}
