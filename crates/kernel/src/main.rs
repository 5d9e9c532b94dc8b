//! Newsdesk Kernel
//!
//! HTTP server for the blog and news content API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk_kernel::{AppState, Config, ServerMode, db, middleware, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env().context("failed to load configuration")?;

    init_tracing(&config);

    info!(
        app_version = %config.app_version,
        log_level = %config.log_level,
        mode = %config.server_mode,
        port = config.port,
        "Starting Newsdesk kernel"
    );

    // Initialize application state (database pool, migrations, services)
    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let stats = db::pool_stats(state.db());
    info!(
        size = stats.size,
        idle = stats.idle,
        max_connections = stats.max_connections,
        "PostgreSQL connected"
    );

    let app = middleware::apply(routes::app_router(state), &config);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},tower_http=debug,sqlx=warn",
            config.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match config.server_mode {
        ServerMode::Development => registry.with(tracing_subscriber::fmt::layer()).init(),
        ServerMode::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
