//! Inference Pipeline
//!
//! Assembler → Scaling Transform → Classifier, for one record or a batch.
//!
//! ```text
//! coordinates ──► fetcher ──► assemble_observations ─┐
//!                                                     ├─► scaler ─► classifier ─► label
//! raw JSON ─────────────────► assemble_raw ──────────┘
//! ```

pub mod types;
pub mod input;


pub use types::{BatchItem, BatchResult, PredictionResult};
pub use input::{parse_coordinate, parse_document, RawInput};

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use validator::Validate;

use crate::logic::errors::PredictError;
use crate::logic::features::{assemble_observations, assemble_raw, FeatureRecord};
use crate::logic::model::ModelArtifacts;
use crate::logic::observation::{Coordinate, ObservationFetcher, ObservationWindow};

/// Default number of batch items processed at once
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Shared, read-only inference service; clones share the same artifacts
#[derive(Clone)]
pub struct InferencePipeline {
    artifacts: ModelArtifacts,
    fetcher: Arc<dyn ObservationFetcher>,
    batch_concurrency: usize,
}

impl InferencePipeline {
    pub fn new(
        artifacts: ModelArtifacts,
        fetcher: Arc<dyn ObservationFetcher>,
        batch_concurrency: usize,
    ) -> Self {
        Self {
            artifacts,
            fetcher,
            batch_concurrency: batch_concurrency.max(1),
        }
    }

    pub fn batch_concurrency(&self) -> usize {
        self.batch_concurrency
    }

    // ========================================================================
    // SINGLE RECORD
    // ========================================================================

    /// Scale the layout-ordered vector and classify it. Pure: same record and
    /// artifacts always give the same label.
    pub fn predict(&self, record: &FeatureRecord) -> PredictionResult {
        let scaled = self.artifacts.scaler.transform(&record.to_vector());
        let label = self.artifacts.classifier.predict(&scaled);

        PredictionResult { features: None, label }
    }

    /// Validate a client-supplied record, then predict
    pub fn predict_raw(&self, raw: &Map<String, Value>) -> Result<PredictionResult, PredictError> {
        let record = assemble_raw(raw)?;
        Ok(self.predict(&record))
    }

    /// Fetch the current hour's observations for a point, then predict.
    /// The assembled features are echoed back.
    pub async fn predict_from_coordinates(
        &self,
        coordinate: Coordinate,
    ) -> Result<PredictionResult, PredictError> {
        self.predict_from_coordinates_at(coordinate, ObservationWindow::current()).await
    }

    pub async fn predict_from_coordinates_at(
        &self,
        coordinate: Coordinate,
        window: ObservationWindow,
    ) -> Result<PredictionResult, PredictError> {
        // Range checks pass NaN through
        if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
            return Err(PredictError::InvalidCoordinate(format!(
                "latitude and longitude must be finite, got ({}, {})",
                coordinate.latitude, coordinate.longitude
            )));
        }
        coordinate
            .validate()
            .map_err(|e| PredictError::InvalidCoordinate(e.to_string()))?;

        let observations = self.fetcher.fetch(coordinate, window).await?;
        let record = assemble_observations(&observations)?;

        let mut result = self.predict(&record);
        result.features = Some(record);
        Ok(result)
    }

    /// Dispatch one batch entry
    pub async fn predict_input(
        &self,
        input: RawInput,
        window: ObservationWindow,
    ) -> Result<PredictionResult, PredictError> {
        match input {
            RawInput::Features(raw) => self.predict_raw(&raw),
            RawInput::Coordinates { latitude, longitude } => {
                let coordinate = parse_coordinate(latitude.as_ref(), longitude.as_ref())?;
                self.predict_from_coordinates_at(coordinate, window).await
            }
        }
    }

    // ========================================================================
    // BATCH
    // ========================================================================

    /// Predict every entry independently. The result has one slot per input,
    /// in input order, whatever order the items finish in. A failing item only
    /// fills its own slot with an error.
    pub async fn predict_batch(&self, items: Vec<RawInput>) -> BatchResult {
        // Every coordinate entry in one batch reads the same hour
        let window = ObservationWindow::current();
        let semaphore = Arc::new(Semaphore::new(self.batch_concurrency));
        let mut handles = Vec::with_capacity(items.len());

        tracing::debug!(
            items = items.len(),
            concurrency = self.batch_concurrency,
            "Starting batch"
        );

        for input in items {
            // The semaphore is never closed, so acquiring cannot fail
            let permit = semaphore.clone().acquire_owned().await.ok();
            let pipeline = self.clone();

            handles.push(tokio::spawn(async move {
                let outcome = pipeline.predict_input(input, window).await;
                drop(permit);
                outcome
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(PredictError::Internal(format!("batch item task failed: {}", e))),
            };

            if let Err(e) = &outcome {
                tracing::warn!(index, kind = e.kind(), "Batch item failed: {}", e);
            }

            results.push(BatchItem { index, outcome });
        }

        let failed = results.iter().filter(|item| !item.is_ok()).count();
        tracing::info!("Batch finished: {} ok, {} failed", results.len() - failed, failed);

        results
    }
}
