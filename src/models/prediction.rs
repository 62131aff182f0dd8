//! Prediction request/response models

use serde::Serialize;
use uuid::Uuid;

use crate::logic::pipeline::BatchResult;

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

/// Batch upload reply; `predictions[i]` answers input `i`
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub total: usize,
    pub failed: usize,
    pub predictions: BatchResult,
}

impl BatchResponse {
    pub fn new(batch_id: Uuid, predictions: BatchResult) -> Self {
        let failed = predictions.iter().filter(|item| !item.is_ok()).count();
        Self {
            batch_id,
            total: predictions.len(),
            failed,
            predictions,
        }
    }
}
