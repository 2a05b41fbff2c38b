//! # pixelhubd — pixelhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the object store and the device client (adapters)
//! - Start one [`AppLifecycle`] per configured app and provision its objects
//! - Build the axum router and serve it
//! - On SIGTERM/SIGINT stop serving, then unload every app
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pixelhub_adapter_awtrix_http::AwtrixClient;
use pixelhub_adapter_http_axum::state::AppState;
use pixelhub_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteObjectStore};
use pixelhub_app::event_bus::InProcessEventBus;
use pixelhub_app::hooks::DefaultHooks;
use pixelhub_app::lifecycle::{APPS_PREFIX, AppLifecycle};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;

    // Event bus + store
    let event_bus = InProcessEventBus::new(256);
    let store = Arc::new(SqliteObjectStore::new(
        db.pool().clone(),
        config.namespace()?,
        event_bus.clone(),
    ));

    // Device
    let client = Arc::new(AwtrixClient::new(&config.awtrix)?);

    // Apps
    let mut apps = Vec::with_capacity(config.apps.len());
    for definition in &config.apps {
        let app = AppLifecycle::new(
            definition.clone(),
            DefaultHooks,
            Arc::clone(&store),
            Arc::clone(&client),
            &event_bus,
            config.lifecycle_options(),
        );
        app.init().await?;
        app.create_objects(APPS_PREFIX).await?;
        tracing::info!(app = app.name(), "app started");
        apps.push(app);
    }

    // HTTP
    let router = pixelhub_adapter_http_axum::router::build(AppState::new(Arc::clone(&store)));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, apps = apps.len(), "pixelhubd listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for app in &apps {
        app.unload().await;
    }
    tracing::info!("pixelhubd stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
