//! Core-role fan-out with aggregated success/failure summary.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use galaxy_common::{
    CallOptions, CallOrigin, OrchestrationResult, Registry, Role, CORE_CALLER_TAG,
};

use crate::dispatcher::{BatchDispatcher, CallRequest};

/// Fans a payload out to a set of features and aggregates the outcomes.
///
/// The role is injected at construction and checked on every call; a
/// non-core instance gets a failed result back, never a fault.
pub struct Orchestrator {
    registry: Arc<Registry>,
    dispatcher: BatchDispatcher,
    role: Role,
}

impl Orchestrator {
    pub fn new(registry: Arc<Registry>, dispatcher: BatchDispatcher, role: Role) -> Self {
        Self {
            registry,
            dispatcher,
            role,
        }
    }

    /// Resolves `feature_ids` against the registry, keeping only known
    /// features that expose an API endpoint, then dispatches to all of
    /// them concurrently. Unknown ids and endpoint-less features are
    /// silently excluded from the result and its summary.
    pub async fn orchestrate(
        &self,
        feature_ids: &[String],
        payload: Value,
        caller_id: &str,
    ) -> OrchestrationResult {
        if self.role != Role::Core {
            return OrchestrationResult::rejected(
                "Orchestration calls are only available for the core app",
            );
        }

        let mut seen = HashSet::new();
        let resolved: Vec<(String, url::Url)> = feature_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.registry.get(id))
            .filter_map(|descriptor| {
                descriptor
                    .api_endpoint
                    .clone()
                    .map(|endpoint| (descriptor.id.clone(), endpoint))
            })
            .collect();

        if resolved.is_empty() {
            debug!(requested = feature_ids.len(), "No orchestratable features resolved");
            return OrchestrationResult::from_results(Default::default());
        }

        let envelope_payload = augment_payload(payload, caller_id);

        let requests: Vec<CallRequest> = resolved
            .iter()
            .map(|(_, endpoint)| CallRequest {
                endpoint: endpoint.clone(),
                payload: envelope_payload.clone(),
                options: CallOptions::default(),
                origin: CallOrigin::Service(Role::Core),
            })
            .collect();

        info!(count = requests.len(), caller_id, "Orchestrating feature calls");

        let outcomes = self.dispatcher.dispatch_all(requests).await;

        let results = resolved
            .into_iter()
            .map(|(id, _)| id)
            .zip(outcomes)
            .collect();

        let aggregate = OrchestrationResult::from_results(results);
        info!(
            total = aggregate.summary.total,
            successful = aggregate.summary.successful,
            failed = aggregate.summary.failed,
            "Orchestration finished"
        );
        aggregate
    }
}

/// Stamps the orchestrated payload with its origin before enveloping.
fn augment_payload(payload: Value, caller_id: &str) -> Value {
    let mut body = match payload {
        Value::Object(map) => map,
        Value::Null => serde_json::Map::new(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("payload".to_string(), other);
            map
        }
    };
    body.insert("calledFrom".to_string(), Value::String(CORE_CALLER_TAG.to_string()));
    body.insert("coreId".to_string(), Value::String(caller_id.to_string()));
    Value::Object(body)
}
