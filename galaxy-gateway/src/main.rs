//! Binary entrypoint: runs the HTTP server by default, or one of the
//! `galaxy` operator subcommands (§6 "CLI") when invoked with arguments.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use galaxy_common::clock::SystemClock;
use galaxy_gateway::cli::Cli;
use galaxy_gateway::http::AppState;
use galaxy_gateway::Config;
use galaxy_store::Store;

#[cfg(feature = "postgres")]
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    let store = galaxy_store::postgres::PgStore::connect(&config.database_url).await?;
    store.run_pending_migrations().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_store(_config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    tracing::warn!("built without the postgres feature; running against an in-memory store");
    Ok(Arc::new(galaxy_store::memory::InMemoryStore::new()))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = build_store(&config).await?;
    store.assert_migrations_applied().await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let allow_origin = if config.cors_origin == "*" {
        AllowOrigin::any()
    } else {
        let origin = config
            .cors_origin
            .parse::<HeaderValue>()
            .with_context(|| format!("CORS_ORIGIN {:?} is not a valid origin", config.cors_origin))?;
        AllowOrigin::exact(origin)
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let state = AppState {
        store,
        clock: Arc::new(SystemClock),
        config: Arc::new(config),
    };

    let app = galaxy_gateway::http::routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!(%addr, "starting galaxy gateway");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let turn_duration = chrono::Duration::from_std(config.turn_duration).unwrap_or_else(|_| chrono::Duration::hours(24));

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        let cli = Cli::parse();
        let store = build_store(&config).await?;
        galaxy_gateway::cli::run(cli, store.as_ref(), turn_duration, 5).await?;
        return Ok(());
    }

    serve(config).await
}
