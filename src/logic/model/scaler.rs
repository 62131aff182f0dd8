//! Scaling Transform - standardization fitted at training time

use serde::Deserialize;

use super::ArtifactError;
use crate::logic::features::{validate_feature_names, FEATURE_COUNT};

/// Fitted, immutable transform applied to the ordered feature vector
pub trait ScalingTransform: Send + Sync {
    fn transform(&self, vector: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT];
}

/// On-disk form, mirroring a fitted standard scaler's attributes
#[derive(Debug, Deserialize)]
struct StandardScalerArtifact {
    /// `null` when fitted without centering
    mean: Option<Vec<f64>>,
    /// `null` when fitted without scaling
    scale: Option<Vec<f64>>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

/// `(x - mean) / scale` per feature
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    const ARTIFACT: &'static str = "scaler";

    /// Zero scale (a constant training column) divides by one instead
    pub fn new(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Self {
        let scale = scale.map(|s| if s == 0.0 { 1.0 } else { s });
        Self { mean, scale }
    }

    #[cfg(test)]
    pub fn identity() -> Self {
        Self::new([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT])
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: StandardScalerArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ArtifactError::Parse { artifact: Self::ARTIFACT, message: e.to_string() })?;

        if let Some(names) = &artifact.feature_names {
            validate_feature_names(names)
                .map_err(|source| ArtifactError::Layout { artifact: Self::ARTIFACT, source })?;
        }

        let mean = match artifact.mean {
            Some(mean) => to_row(Self::ARTIFACT, "mean", mean)?,
            None => [0.0; FEATURE_COUNT],
        };
        let scale = match artifact.scale {
            Some(scale) => to_row(Self::ARTIFACT, "scale", scale)?,
            None => [1.0; FEATURE_COUNT],
        };

        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s < 0.0) {
            return Err(ArtifactError::InvalidParameter {
                artifact: Self::ARTIFACT,
                message: format!("scale[{}] = {} is not a finite non-negative number", i, scale[i]),
            });
        }

        Ok(Self::new(mean, scale))
    }
}

impl ScalingTransform for StandardScaler {
    fn transform(&self, vector: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0f64; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (vector[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

/// Check a fitted row has exactly one value per feature
pub(crate) fn to_row(
    artifact: &'static str,
    what: &str,
    values: Vec<f64>,
) -> Result<[f64; FEATURE_COUNT], ArtifactError> {
    let len = values.len();
    values.try_into().map_err(|_| ArtifactError::Shape {
        artifact,
        message: format!("{} has {} values, expected {}", what, len, FEATURE_COUNT),
    })
}
