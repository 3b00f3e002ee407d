//! Feature surface served by a satellite instance.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use galaxy_common::CallResult;

use crate::response::ApiResponse;
use crate::routes::AppState;

/// `POST /api/feature` — the scaffold handler: acknowledge the enveloped
/// payload. Real features replace this with their own processing.
pub async fn handle_feature_request(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResponse<Value> {
    debug!(feature = %state.instance.id, "Handling feature request");

    ApiResponse::success(json!({
        "feature": state.instance.id,
        "name": state.instance.name,
        "received": payload,
        "processedAt": Utc::now(),
    }))
}

/// `GET /api/feature` — static liveness/identity document.
pub async fn feature_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "feature": state.instance.id,
        "name": state.instance.name,
        "type": "feature",
        "apiEndpoint": state.instance.api_endpoint,
        "timestamp": Utc::now(),
    }))
}

/// `POST /api/siblings/{id}` — relay a payload to a declared sibling and
/// return the normalized outcome. Unknown siblings and role violations
/// come back as failed results, never HTTP errors.
pub async fn call_sibling(
    State(state): State<AppState>,
    Path(sibling_id): Path<String>,
    Json(payload): Json<Value>,
) -> Json<CallResult> {
    Json(state.sibling_caller.call_sibling(&sibling_id, payload).await)
}
