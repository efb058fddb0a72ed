use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use popflix_core::{
    load_config, validate_config, AvailabilitySync, CatalogProvider, SqlitePool, SystemClock,
    TmdbClient,
};
use popflix_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("POPFLIX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Database path: {:?}", config.database.path);
    let pool = Arc::new(
        SqlitePool::open(
            &config.database.path,
            config.database.pool_size,
            Duration::from_secs(config.database.acquire_timeout_secs),
        )
        .context("Failed to open database")?,
    );
    info!(pool_size = pool.size(), "Database ready");

    let provider: Arc<dyn CatalogProvider> =
        Arc::new(TmdbClient::new(&config.tmdb).context("Failed to create TMDB client")?);
    info!(
        language = %config.tmdb.language,
        region = %config.tmdb.region,
        "TMDB client initialized"
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        pool,
        provider,
        Arc::new(SystemClock),
    ));

    let sync = (config.catalog.availability_sync_secs > 0).then(|| {
        AvailabilitySync::new(
            state.catalog_handle(),
            Duration::from_secs(config.catalog.availability_sync_secs),
            config.catalog.availability_batch,
        )
    });
    match &sync {
        Some(sync) => sync.start(),
        None => info!("Availability sync disabled in config"),
    }

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(sync) = &sync {
        sync.stop();
    }
    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
