mod assets;
mod cache;
mod config;
mod content;
mod db;
mod errors;
mod extractors;
mod models;
mod response;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::{AssetHost, DisabledAssetHost, S3AssetHost};
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the document store
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_max_connections).await?;
            info!("PostgreSQL document store ready");
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store, content is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    if std::env::args().skip(1).any(|arg| arg == "--seed") {
        let counts = content::seed::seed_sample(store.as_ref()).await?;
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        info!("Database seeded successfully ({total} records)");
        return Ok(());
    }

    // Initialize S3 / MinIO asset host
    let assets: Arc<dyn AssetHost> = match S3AssetHost::from_config(&config).await {
        Some(host) => Arc::new(host),
        None => {
            warn!("S3_BUCKET not set; uploads are disabled");
            Arc::new(DisabledAssetHost)
        }
    };

    let state = AppState::new(store, assets, config.clone());

    let app = build_router(state)
        .layer(CatchPanicLayer::custom(routes::panic_response))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(middleware::map_response(routes::timeout_envelope))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Only the configured origins may call the API from a browser.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
