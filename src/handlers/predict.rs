//! Prediction handlers

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    Json,
};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState};
use crate::logic::observation::Coordinate;
use crate::logic::pipeline::{parse_document, PredictionResult};
use crate::models::{BannerResponse, BatchResponse};

pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Coastal Alert backend running",
    })
}

/// Fetch live observations for a point and classify them
pub async fn from_coordinates(
    State(state): State<AppState>,
    query: Result<Query<Coordinate>, QueryRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Query(coordinate) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let result = state.pipeline.predict_from_coordinates(coordinate).await?;

    tracing::info!(
        latitude = coordinate.latitude,
        longitude = coordinate.longitude,
        "Coordinate prediction: {}",
        result.label
    );

    Ok(Json(result))
}

/// Classify a fully specified feature record
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Value::Object(raw) = body else {
        return Err(AppError::BadRequest("expected a JSON object of features".to_string()));
    };

    let result = state.pipeline.predict_raw(&raw)?;
    tracing::debug!("Record prediction: {}", result.label);

    Ok(Json(result))
}

/// Batch upload as multipart form data (field `file`)
pub async fn predict_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<BatchResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;

        tracing::debug!("Received batch file {} ({} bytes)", file_name, bytes.len());
        return run_batch(&state, &bytes).await;
    }

    Err(AppError::BadRequest("multipart field `file` is required".to_string()))
}

/// Batch upload as a raw JSON body
pub async fn predict_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<BatchResponse>> {
    run_batch(&state, &body).await
}

async fn run_batch(state: &AppState, document: &[u8]) -> AppResult<Json<BatchResponse>> {
    let items = parse_document(document)?;
    let batch_id = Uuid::new_v4();

    let span = tracing::info_span!("batch", %batch_id, items = items.len());
    let predictions = state.pipeline.predict_batch(items).instrument(span).await;

    Ok(Json(BatchResponse::new(batch_id, predictions)))
}
