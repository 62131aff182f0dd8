//! Prediction error taxonomy
//!
//! Shared by the single-record, coordinate and batch paths. Batch items carry
//! the same [`ErrorBody`] the HTTP layer returns for a failed single request.

use serde::Serialize;
use thiserror::Error;

use super::observation::{FetchError, UpstreamSource};

/// A single problem with one field of a client-supplied record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum FieldViolation {
    MissingField { field: String },
    InvalidType { field: String, found: String },
}

impl FieldViolation {
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } | Self::InvalidType { field, .. } => field,
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing field `{}`", field),
            Self::InvalidType { field, found } => {
                write!(f, "field `{}` is not numeric (found {})", field, found)
            }
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum PredictError {
    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// Every violation found in the record, not just the first
    #[error("invalid feature record: {}", join_violations(.violations))]
    InvalidRecord { violations: Vec<FieldViolation> },

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("internal error: {0}")]
    Internal(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PredictError {
    /// Stable identifier used in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream(e) => e.kind(),
            Self::InvalidRecord { .. } => "InvalidRecord",
            Self::InvalidCoordinate(_) => "InvalidCoordinate",
            Self::Internal(_) => "Internal",
        }
    }

    /// Whether the same request may succeed if repeated unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(FetchError::UpstreamUnavailable { .. }))
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::InvalidRecord { violations } => violations,
            _ => &[],
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let (provider, status) = match self {
            Self::Upstream(FetchError::UpstreamUnavailable { provider, status, .. }) => {
                (Some(*provider), *status)
            }
            Self::Upstream(FetchError::MalformedUpstreamResponse { provider, .. }) => {
                (Some(*provider), None)
            }
            _ => (None, None),
        };

        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
            retryable: self.is_retryable(),
            provider,
            status,
            violations: self.violations().to_vec(),
        }
    }
}

/// Serialized form of a [`PredictError`]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<UpstreamSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

/// Whole-document failures; these reject an entire batch upload
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error("uploaded document is not valid JSON: {0}")]
    UnparseableDocument(String),

    #[error("unsupported document shape: {0}")]
    UnsupportedDocumentShape(String),
}

impl DocumentError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnparseableDocument(_) => "UnparseableDocument",
            Self::UnsupportedDocumentShape(_) => "UnsupportedDocumentShape",
        }
    }
}
