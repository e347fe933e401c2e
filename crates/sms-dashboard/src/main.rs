//! SMS Dashboard Server
//!
//! Serves the admin dashboard and runs the background dispatcher that
//! delivers queued campaign messages.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sms_dashboard::{
    config::{AppConfig, DatabaseConfig, ProviderConfig},
    db::{create_pool, init_schema},
    dispatcher::{DispatchLimits, Dispatcher},
    routes::build_router,
    sms::build_provider,
    state::AppState,
    template::Views,
};

/// Initialize tracing/logging.
///
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sms_dashboard=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting SMS Dashboard"
    );

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let provider_config = ProviderConfig::from_env()?;

    if app_config.uses_default_token() {
        tracing::warn!("ADMIN_TOKEN not set, using default (not secure for production)");
    }

    tracing::info!(
        app_name = %app_config.app_name,
        public_base_url = %app_config.public_base_url,
        send_per_second = app_config.send_per_second,
        max_daily_per_contact = app_config.max_daily_per_contact,
        "Configuration loaded"
    );

    // Database
    let db_pool = create_pool(&db_config).await?;
    init_schema(&db_pool).await?;

    // Outbound SMS; TLS settings are applied here, once
    let provider = build_provider(&provider_config)?;

    let dispatcher = Dispatcher::new(
        db_pool.clone(),
        provider,
        DispatchLimits::from(&app_config),
    );
    dispatcher.recover_interrupted().await?;
    let dispatcher_handle = dispatcher.spawn();

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let state = AppState::new(db_pool, app_config, Views::new()?);
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dispatcher_handle.abort();
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
