use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use galaxy_common::{HealthStatus, SYSTEM_VERSION};

use crate::response::ApiResponse;
use crate::routes::AppState;

/// `GET /health` and `GET /api/health` — static liveness document; the
/// latter path is the target of derived health probes.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.instance.id,
        "role": state.role,
        "version": SYSTEM_VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// `GET /api/system/health` — probe every feature with an endpoint and
/// return the liveness map.
pub async fn system_health(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
    let status = state.health_monitor.probe_all(&state.registry).await;
    ApiResponse::success(status)
}
