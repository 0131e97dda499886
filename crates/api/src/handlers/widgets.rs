//! Handler exposing the hydration engine directly.
//!
//! Lets a caller that already holds a dry config and rows (e.g. a client
//! re-running a widget's SQL with edits) materialize the widget without
//! going through the model.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use vizier_core::hydration::hydrate;
use vizier_core::widget::{DryWidgetConfig, Row};

use crate::error::AppResult;
use crate::response::DataResponse;

/// Request body for `POST /api/v1/widgets/hydrate`.
#[derive(Debug, Deserialize)]
pub struct HydrateRequest {
    /// The widget template to materialize.
    pub config: DryWidgetConfig,
    /// Result rows to hydrate against.
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// POST /api/v1/widgets/hydrate
///
/// Pure transformation; never fails for well-typed input.
pub async fn hydrate_widget(Json(input): Json<HydrateRequest>) -> AppResult<impl IntoResponse> {
    let wet = hydrate(&input.config, &input.rows);

    Ok(Json(DataResponse { data: wet }))
}
