//! people-svc - person registry with name-based enrichment

use anyhow::Result;
use clap::Parser;
use tracing::info;

use people_svc::db::PersonStore;
use people_svc::enrich::HttpSources;
use people_svc::{build_router, db, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let default_level = if config.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    info!(
        "Starting people-svc v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.http_addr
    );

    let pool = db::connect(&config.database_url).await?;
    info!("Connected to database");

    db::init_schema(&pool).await?;
    info!("Schema ready");

    let sources = HttpSources::new(&config)?;
    let state = AppState::new(PersonStore::new(pool), sources);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("people-svc listening on http://{}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("people-svc stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
