//! Model Module - fitted scaling transform and classifier
//!
//! Both artifacts are loaded once at startup and only read afterwards.

pub mod scaler;
pub mod knn;
pub mod artifacts;

pub use scaler::{ScalingTransform, StandardScaler};
pub use knn::{Classifier, KnnClassifier};
pub use artifacts::ModelArtifacts;

use std::path::PathBuf;

use thiserror::Error;

use crate::logic::features::LayoutMismatchError;

/// Missing or corrupt artifact; fatal at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {artifact} artifact at {}: {source}", .path.display())]
    Io {
        artifact: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {artifact} artifact: {message}")]
    Parse { artifact: &'static str, message: String },

    #[error("{artifact} shape mismatch: {message}")]
    Shape { artifact: &'static str, message: String },

    #[error("{artifact} was fitted with a different feature layout")]
    Layout {
        artifact: &'static str,
        source: LayoutMismatchError,
    },

    #[error("invalid {artifact} parameter: {message}")]
    InvalidParameter { artifact: &'static str, message: String },
}
