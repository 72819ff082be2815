use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hashgate_core::{
    load_config, load_config_from_env, validate_config, Config, HttpProber, LibrqbitDiscoverer,
    MetadataDiscoverer, RecordStore, SqliteRecordStore, StreamResolver, UrlProber,
};
use hashgate_server::api::create_router;
use hashgate_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file used when `HASHGATE_CONFIG` is unset
const DEFAULT_CONFIG_FILE: &str = "hashgate.toml";

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

    info!(version = VERSION, "Starting hashgate");

    let config = load_configuration()?;
    validate_config(&config).context("Invalid configuration")?;

    // Record store: the server comes up even when the database does not
    let sqlite_path = config.database.sqlite_path();
    let store: Arc<dyn RecordStore> =
        Arc::new(SqliteRecordStore::connect_lazy(sqlite_path.as_deref()));
    info!(url = %config.database.url, "Record store configured");

    let prober: Arc<dyn UrlProber> =
        Arc::new(HttpProber::new(&config.prober).context("Failed to build HTTP client")?);

    let discoverer: Option<Arc<dyn MetadataDiscoverer>> = if config.discovery.enabled {
        info!(
            timeout_secs = config.discovery.timeout_secs,
            dht = config.discovery.enable_dht,
            "Swarm discovery enabled"
        );
        Some(Arc::new(LibrqbitDiscoverer::new(config.discovery.clone())))
    } else {
        warn!("Swarm discovery disabled; lookup misses go straight to the fallback");
        None
    };

    let mut resolver = StreamResolver::new(config.resolver.clone(), store, prober);
    if let Some(ref discoverer) = discoverer {
        resolver = resolver.with_discoverer(discoverer.clone());
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, resolver));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    if let Some(discoverer) = discoverer {
        discoverer.shutdown().await;
        info!("Discovery session stopped");
    }

    Ok(())
}

/// `HASHGATE_CONFIG` must exist when set; the default file is optional.
fn load_configuration() -> Result<Config> {
    match std::env::var("HASHGATE_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
            load_config(Path::new(DEFAULT_CONFIG_FILE))
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE))
        }
        Err(_) => {
            info!("No config file found, using defaults and environment");
            load_config_from_env().context("Failed to load config from environment")
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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
