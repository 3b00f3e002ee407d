//! Orchestration surface served by a core instance.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use url::Url;
use uuid::Uuid;

use galaxy_common::OrchestrationSummary;

use crate::response::ApiResponse;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct OrchestrateRequest {
    pub features: Vec<String>,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalledFeature {
    pub feature_id: String,
    pub feature_name: String,
    pub endpoint: Url,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrateResponse {
    pub success: bool,
    pub orchestration_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub called_features: Vec<CalledFeature>,
    pub summary: OrchestrationSummary,
}

/// `POST /api/orchestrate` — fan the payload out to the requested
/// features and report per-feature outcomes plus the summary.
pub async fn orchestrate(
    State(state): State<AppState>,
    Json(request): Json<OrchestrateRequest>,
) -> Json<OrchestrateResponse> {
    let orchestration_id = Uuid::new_v4();
    info!(
        %orchestration_id,
        requested = request.features.len(),
        "Handling orchestration request"
    );

    let mut result = state
        .orchestrator
        .orchestrate(&request.features, request.payload, &state.instance.id)
        .await;

    // Annotate each outcome with the descriptor it was resolved from,
    // keeping the request order for diagnostics.
    let mut called_features = Vec::with_capacity(result.results.len());
    for id in &request.features {
        let Some(call) = result.results.remove(id) else {
            continue;
        };
        let Some(descriptor) = state.registry.get(id) else {
            continue;
        };
        let Some(endpoint) = descriptor.api_endpoint.clone() else {
            continue;
        };
        called_features.push(CalledFeature {
            feature_id: descriptor.id.clone(),
            feature_name: descriptor.name.clone(),
            endpoint,
            success: call.success,
            data: call.data,
            error: call.error,
        });
    }

    Json(OrchestrateResponse {
        success: result.success,
        orchestration_id,
        timestamp: Utc::now(),
        error: result.error,
        called_features,
        summary: result.summary,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratableFeature {
    pub id: String,
    pub name: String,
    pub endpoint: Url,
    pub can_orchestrate: bool,
}

/// `GET /api/orchestrate` — every registry entry with an API endpoint,
/// annotated as orchestratable.
pub async fn list_orchestratable(
    State(state): State<AppState>,
) -> ApiResponse<Vec<OrchestratableFeature>> {
    let features = state
        .registry
        .with_endpoints()
        .filter_map(|descriptor| {
            descriptor
                .api_endpoint
                .clone()
                .map(|endpoint| OrchestratableFeature {
                    id: descriptor.id.clone(),
                    name: descriptor.name.clone(),
                    endpoint,
                    can_orchestrate: true,
                })
        })
        .collect();

    ApiResponse::success(features)
}
