//! Feature-role calls to declared sibling features.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use galaxy_common::{CallOptions, CallOrigin, CallResult, Registry, Role};

use crate::executor::RequestExecutor;

/// Calls one declared sibling on behalf of a feature instance.
///
/// Role and self identity are injected at construction. The registry view
/// excludes the caller itself: asking for your own id behaves like an
/// unknown sibling.
pub struct SiblingCaller {
    registry: Arc<Registry>,
    executor: Arc<RequestExecutor>,
    role: Role,
    self_id: String,
    self_name: String,
}

impl SiblingCaller {
    pub fn new(
        registry: Arc<Registry>,
        executor: Arc<RequestExecutor>,
        role: Role,
        self_id: impl Into<String>,
        self_name: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            executor,
            role,
            self_id: self_id.into(),
            self_name: self_name.into(),
        }
    }

    pub async fn call_sibling(&self, sibling_id: &str, payload: Value) -> CallResult {
        if self.role != Role::Feature {
            return CallResult::error("Sibling calls are only available for feature apps");
        }

        if sibling_id == self.self_id {
            return CallResult::error(format!("Sibling feature {sibling_id} not found"));
        }

        let Some(descriptor) = self.registry.get(sibling_id) else {
            return CallResult::error(format!("Sibling feature {sibling_id} not found"));
        };

        let Some(endpoint) = descriptor.api_endpoint.as_ref() else {
            return CallResult::error(format!(
                "Sibling {sibling_id} does not have an API endpoint"
            ));
        };

        debug!(sibling = sibling_id, caller = %self.self_id, "Calling sibling feature");

        let origin = CallOrigin::Sibling {
            id: self.self_id.clone(),
            name: self.self_name.clone(),
        };
        self.executor
            .execute(endpoint, payload, &CallOptions::default(), &origin)
            .await
    }
}
