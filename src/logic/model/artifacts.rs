//! Artifact loading
//!
//! Reads the fitted scaler and classifier from disk or memory and hands them
//! out as shared, read-only handles.

use std::path::Path;
use std::sync::Arc;

use super::{ArtifactError, Classifier, KnnClassifier, ScalingTransform, StandardScaler};

/// Immutable handles shared by every request
#[derive(Clone)]
pub struct ModelArtifacts {
    pub scaler: Arc<dyn ScalingTransform>,
    pub classifier: Arc<dyn Classifier>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts").finish_non_exhaustive()
    }
}

impl ModelArtifacts {
    pub fn new(scaler: Arc<dyn ScalingTransform>, classifier: Arc<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    /// Load both artifacts from JSON files
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self, ArtifactError> {
        tracing::info!("Loading scaler from: {}", scaler_path.display());
        let scaler_bytes = read("scaler", scaler_path)?;

        tracing::info!("Loading classifier from: {}", model_path.display());
        let model_bytes = read("classifier", model_path)?;

        Self::from_bytes(&scaler_bytes, &model_bytes)
    }

    /// Load both artifacts from memory
    pub fn from_bytes(scaler_bytes: &[u8], model_bytes: &[u8]) -> Result<Self, ArtifactError> {
        let scaler = StandardScaler::from_json(scaler_bytes)?;
        let classifier = KnnClassifier::from_json(model_bytes)?;

        tracing::info!(
            samples = classifier.n_samples(),
            classes = classifier.classes().len(),
            "Model artifacts loaded"
        );

        Ok(Self::new(Arc::new(scaler), Arc::new(classifier)))
    }
}

fn read(artifact: &'static str, path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| ArtifactError::Io {
        artifact,
        path: path.to_path_buf(),
        source,
    })
}
