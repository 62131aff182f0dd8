//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::logic::features::{layout_hash, LayoutInfo, FEATURE_VERSION};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    feature_version: u8,
    layout_hash: u32,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Feature order the loaded artifacts expect
pub async fn layout() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
