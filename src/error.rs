//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::errors::{DocumentError, PredictError};
use crate::logic::observation::FetchError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Inference errors
    Predict(PredictError),

    // Upload errors
    Document(DocumentError),

    // Request errors
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Predict(PredictError::InvalidRecord { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Predict(PredictError::InvalidCoordinate(_)) => StatusCode::BAD_REQUEST,
            AppError::Predict(PredictError::Upstream(FetchError::UpstreamUnavailable { .. })) => StatusCode::BAD_GATEWAY,
            AppError::Predict(PredictError::Upstream(FetchError::MalformedUpstreamResponse { .. })) => StatusCode::BAD_GATEWAY,
            AppError::Predict(PredictError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Document(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = match &self {
            AppError::Predict(e) => {
                match e {
                    PredictError::Upstream(upstream) => tracing::warn!("Upstream error: {}", upstream),
                    PredictError::Internal(msg) => tracing::error!("Internal error: {}", msg),
                    _ => tracing::debug!("Rejected request: {}", e),
                }
                serde_json::to_value(e.to_body()).unwrap_or_else(|_| json!(e.to_string()))
            }
            AppError::Document(e) => json!({
                "kind": e.kind(),
                "message": e.to_string(),
                "retryable": false,
            }),
            AppError::BadRequest(msg) => json!({
                "kind": "BadRequest",
                "message": msg,
                "retryable": false,
            }),
        };

        let body = Json(json!({
            "error": error,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::Predict(err)
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::Document(err)
    }
}
