use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use galaxy_api::{create_routes, AppState, InstanceInfo};
use galaxy_config::{AppConfig, ServerConfig};
use galaxy_orchestration::{
    BatchDispatcher, HealthMonitor, Orchestrator, RequestExecutor, SiblingCaller,
};
use tokio::{net::TcpListener, sync::broadcast};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// The running instance: configuration plus the wired component graph.
///
/// All wiring happens once here; the registry and the executor are built
/// at startup and shared by reference into every component.
pub struct Application {
    config: AppConfig,
    state: AppState,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = Arc::new(config.build_registry()?);
        let role = config.instance.role;

        let executor = Arc::new(RequestExecutor::with_auth_token(config.auth.token.clone()));
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&registry),
            BatchDispatcher::new(Arc::clone(&executor)),
            role,
        ));
        let sibling_caller = Arc::new(SiblingCaller::new(
            Arc::clone(&registry),
            executor,
            role,
            config.instance.id.clone(),
            config.instance.name.clone(),
        ));

        let instance = Arc::new(InstanceInfo {
            id: config.instance.id.clone(),
            name: config.instance.name.clone(),
            api_endpoint: config.instance_endpoint()?,
        });

        let state = AppState {
            role,
            instance,
            registry,
            orchestrator,
            sibling_caller,
            health_monitor: Arc::new(HealthMonitor::new()),
        };

        Ok(Self { config, state })
    }

    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let mut app = create_routes(self.state.clone()).layer(TraceLayer::new_for_http());
        if self.config.server.cors_enabled {
            app = app.layer(build_cors(&self.config.server)?);
        }

        let listener = TcpListener::bind(&self.config.server.bind_address)
            .await
            .with_context(|| {
                format!("Failed to bind address: {}", self.config.server.bind_address)
            })?;

        info!(
            "Serving {} instance on http://{}",
            self.config.instance.role, self.config.server.bind_address
        );

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Server failed: {e}");
            }
        });

        let _ = shutdown_rx.recv().await;
        info!("Server received shutdown signal");

        server_handle.abort();
        Ok(())
    }
}

fn build_cors(server: &ServerConfig) -> Result<CorsLayer> {
    if server.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = server
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
