//! Coastal Alert Backend Server
//!
//! Classifies the coastal hazard level for a point from live marine and
//! atmospheric observations, or for client-supplied feature records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      COASTAL ALERT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │  API      │  │  Inference       │  │  Observation     │ │
//! │  │  (Axum)   │─►│  Pipeline        │─►│  Fetcher         │ │
//! │  └───────────┘  └────────┬─────────┘  └────────┬─────────┘ │
//! │                          ▼                     ▼            │
//! │                 ┌──────────────────┐  ┌──────────────────┐ │
//! │                 │ Scaler + kNN     │  │ Open-Meteo       │ │
//! │                 │ (artifacts)      │  │ marine/forecast  │ │
//! │                 └──────────────────┘  └──────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};
use crate::logic::model::ModelArtifacts;
use crate::logic::observation::OpenMeteoFetcher;
use crate::logic::pipeline::InferencePipeline;

pub use error::{AppError, AppResult};

/// Largest accepted batch upload
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(&config);

    tracing::info!("Coastal Alert server starting...");
    tracing::info!("Environment: {}", config.environment);

    // Artifacts are required; refuse to serve without them
    let artifacts = ModelArtifacts::load(&config.scaler_path, &config.model_path)
        .context("Failed to load model artifacts")?;

    let fetcher = OpenMeteoFetcher::new(config.upstream())
        .context("Failed to build upstream HTTP client")?;

    let pipeline = InferencePipeline::new(artifacts, Arc::new(fetcher), config.batch_concurrency);
    tracing::info!("Batch concurrency: {}", pipeline.batch_concurrency());

    // Build application state
    let state = AppState {
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = if config.is_production() {
        "coastal_alert=info,tower_http=info"
    } else {
        "coastal_alert=debug,tower_http=debug"
    };
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: InferencePipeline,
    pub config: Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Paths the web client already calls
    let client_routes = Router::new()
        .route("/", get(handlers::predict::banner))
        .route("/predict_from_coords/", get(handlers::predict::from_coordinates))
        .route("/predict_file/", post(handlers::predict::predict_file));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/layout", get(handlers::health::layout))
        .route("/predict", post(handlers::predict::predict))
        .route("/api/v1/predict/batch", post(handlers::predict::predict_batch));

    // Combine all routes
    Router::new()
        .merge(client_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
