use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use url::Url;

use galaxy_common::{Registry, Role};
use galaxy_orchestration::{HealthMonitor, Orchestrator, SiblingCaller};

use crate::handlers::{
    feature::{call_sibling, feature_info, handle_feature_request},
    health::{health_check, system_health},
    orchestration::{list_orchestratable, orchestrate},
};

/// Identity of the running instance, as declared in configuration.
#[derive(Debug, Clone)]
pub struct InstanceInfo {
    pub id: String,
    pub name: String,
    pub api_endpoint: Option<Url>,
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub role: Role,
    pub instance: Arc<InstanceInfo>,
    pub registry: Arc<Registry>,
    pub orchestrator: Arc<Orchestrator>,
    pub sibling_caller: Arc<SiblingCaller>,
    pub health_monitor: Arc<HealthMonitor>,
}

/// Builds the role-specific router.
///
/// Both roles serve the liveness routes; the orchestration surface only
/// exists on a core instance and the feature surface only on a feature
/// instance.
pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/health", get(health_check));

    let router = match state.role {
        Role::Core => router
            .route("/api/orchestrate", get(list_orchestratable).post(orchestrate))
            .route("/api/system/health", get(system_health)),
        Role::Feature => router
            .route("/api/feature", get(feature_info).post(handle_feature_request))
            .route("/api/siblings/{id}", post(call_sibling)),
    };

    router.with_state(state)
}
