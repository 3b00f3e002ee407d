#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use url::Url;

use galaxy_api::{create_routes, AppState, InstanceInfo};
use galaxy_common::{FeatureDescriptor, Registry, Role};
use galaxy_orchestration::{
    BatchDispatcher, HealthMonitor, Orchestrator, RequestExecutor, SiblingCaller,
};

/// Serves an axum app on an ephemeral port, returning its base URL.
pub async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Failed to start test server");
    });

    Url::parse(&format!("http://{address}/")).expect("Failed to parse test server url")
}

/// Wires a full instance (executor, dispatcher, orchestrator, sibling
/// caller, health monitor) and serves its role-specific router.
pub async fn spawn_instance(
    role: Role,
    id: &str,
    name: &str,
    api_endpoint: Option<Url>,
    registry: Registry,
) -> Url {
    let registry = Arc::new(registry);
    let executor = Arc::new(RequestExecutor::new());
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&registry),
        BatchDispatcher::new(Arc::clone(&executor)),
        role,
    ));
    let sibling_caller = Arc::new(SiblingCaller::new(
        Arc::clone(&registry),
        Arc::clone(&executor),
        role,
        id,
        name,
    ));

    let state = AppState {
        role,
        instance: Arc::new(InstanceInfo {
            id: id.to_string(),
            name: name.to_string(),
            api_endpoint,
        }),
        registry,
        orchestrator,
        sibling_caller,
        health_monitor: Arc::new(HealthMonitor::new()),
    };

    serve(create_routes(state)).await
}

pub fn descriptor(id: &str, name: &str, endpoint: Option<Url>) -> FeatureDescriptor {
    FeatureDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        base_url: Url::parse("http://localhost:4000").unwrap(),
        api_endpoint: endpoint,
    }
}

/// A port with nothing listening on it.
pub async fn unused_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = listener.local_addr().expect("Failed to read local addr");
    drop(listener);

    Url::parse(&format!("http://{address}/api/feature")).expect("Failed to parse url")
}
