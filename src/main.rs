use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use galaxy_common::Role;
use galaxy_config::AppConfig;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod shutdown;

use app::Application;
use shutdown::ShutdownManager;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("galaxy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hub-and-satellite service template")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("role")
                .short('r')
                .long("role")
                .value_name("ROLE")
                .help("Override the configured instance role")
                .value_parser(["core", "feature"]),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("Log format")
                .value_parser(["json", "pretty"])
                .default_value("pretty"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let log_level = matches.get_one::<String>("log-level").map_or("info", String::as_str);
    let log_format = matches.get_one::<String>("log-format").map_or("pretty", String::as_str);

    init_logging(log_level, log_format)?;

    let mut config = AppConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(role) = matches.get_one::<String>("role") {
        config.instance.role = role.parse::<Role>()?;
    }

    info!(
        role = %config.instance.role,
        instance = %config.instance.id,
        features = config.features.len(),
        "Starting galaxy instance"
    );

    let app = Application::new(config)?;
    let shutdown_manager = ShutdownManager::new();

    let app_handle = {
        let app = Arc::new(app);
        let shutdown_rx = shutdown_manager.subscribe().await;

        tokio::spawn(async move {
            if let Err(e) = app.run(shutdown_rx).await {
                error!("Application failed: {e}");
            }
        })
    };

    wait_for_shutdown_signal().await;
    info!("Shutdown signal received, shutting down gracefully...");

    shutdown_manager.shutdown().await;
    let _ = app_handle.await;

    info!("Galaxy instance stopped");
    Ok(())
}

fn init_logging(level: &str, format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
