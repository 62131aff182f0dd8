//! Nearest-neighbor classifier
//!
//! Brute-force k-NN over the stored (already scaled) training rows. Inference
//! is a pure function of the loaded artifact and the input vector.

use std::cmp::Ordering;

use serde::Deserialize;

use super::scaler::to_row;
use super::ArtifactError;
use crate::logic::features::{validate_feature_names, FEATURE_COUNT};

/// Maps a scaled vector to a discrete label
pub trait Classifier: Send + Sync {
    fn predict(&self, scaled: &[f64; FEATURE_COUNT]) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weights {
    #[default]
    Uniform,
    Distance,
}

/// Training label as stored in the artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ClassLabel {
    /// Numbers sort before text; numbers compare by value
    fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            // Whole floats keep their decimal point (`2.0`, not `2`)
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// On-disk form of a fitted k-NN model
#[derive(Debug, Deserialize)]
struct KnnArtifact {
    #[serde(default = "default_neighbors")]
    n_neighbors: usize,
    #[serde(default)]
    weights: Weights,
    #[serde(default = "default_p")]
    p: f64,
    fit_x: Vec<Vec<f64>>,
    labels: Vec<ClassLabel>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

fn default_neighbors() -> usize {
    5
}

fn default_p() -> f64 {
    2.0
}

#[derive(Debug, Clone)]
pub struct KnnClassifier {
    n_neighbors: usize,
    weights: Weights,
    p: f64,
    fit_x: Vec<[f64; FEATURE_COUNT]>,
    /// Class index of each training row
    row_class: Vec<usize>,
    /// Distinct labels in sorted order; vote ties go to the earliest
    classes: Vec<ClassLabel>,
}

impl KnnClassifier {
    const ARTIFACT: &'static str = "classifier";

    pub fn new(
        n_neighbors: usize,
        weights: Weights,
        p: f64,
        fit_x: Vec<[f64; FEATURE_COUNT]>,
        labels: Vec<ClassLabel>,
    ) -> Result<Self, ArtifactError> {
        let invalid = |message: String| ArtifactError::InvalidParameter { artifact: Self::ARTIFACT, message };

        if fit_x.is_empty() {
            return Err(ArtifactError::Shape {
                artifact: Self::ARTIFACT,
                message: "no training rows".to_string(),
            });
        }
        if fit_x.len() != labels.len() {
            return Err(ArtifactError::Shape {
                artifact: Self::ARTIFACT,
                message: format!("{} training rows but {} labels", fit_x.len(), labels.len()),
            });
        }
        if n_neighbors == 0 || n_neighbors > fit_x.len() {
            return Err(invalid(format!(
                "n_neighbors = {} must be between 1 and {}",
                n_neighbors,
                fit_x.len()
            )));
        }
        if !(p.is_finite() && p >= 1.0) {
            return Err(invalid(format!("p = {} must be a finite number >= 1", p)));
        }

        let mut classes = labels.clone();
        classes.sort_by(ClassLabel::sort_cmp);
        classes.dedup_by(|a, b| a.sort_cmp(b) == Ordering::Equal);

        let row_class = labels
            .iter()
            .map(|label| {
                classes
                    .binary_search_by(|c| c.sort_cmp(label))
                    .map_err(|_| invalid(format!("label {} not comparable", label)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { n_neighbors, weights, p, fit_x, row_class, classes })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: KnnArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ArtifactError::Parse { artifact: Self::ARTIFACT, message: e.to_string() })?;

        if let Some(names) = &artifact.feature_names {
            validate_feature_names(names)
                .map_err(|source| ArtifactError::Layout { artifact: Self::ARTIFACT, source })?;
        }

        let fit_x = artifact
            .fit_x
            .into_iter()
            .enumerate()
            .map(|(i, row)| to_row(Self::ARTIFACT, &format!("fit_x[{}]", i), row))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(artifact.n_neighbors, artifact.weights, artifact.p, fit_x, artifact.labels)
    }

    pub fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    pub fn n_samples(&self) -> usize {
        self.fit_x.len()
    }

    /// Minkowski distance of order `p`
    fn distance(&self, a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
        let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
        if self.p == 1.0 {
            diffs.sum()
        } else if self.p == 2.0 {
            diffs.map(|d| d * d).sum::<f64>().sqrt()
        } else {
            diffs.map(|d| d.powf(self.p)).sum::<f64>().powf(1.0 / self.p)
        }
    }
}

impl Classifier for KnnClassifier {
    fn predict(&self, scaled: &[f64; FEATURE_COUNT]) -> String {
        let mut ranked: Vec<(f64, usize)> = self
            .fit_x
            .iter()
            .enumerate()
            .map(|(row, x)| (self.distance(x, scaled), row))
            .collect();

        // Equal distances keep training-row order
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let neighbors = &ranked[..self.n_neighbors];

        let mut votes = vec![0.0f64; self.classes.len()];
        match self.weights {
            Weights::Uniform => {
                for &(_, row) in neighbors {
                    votes[self.row_class[row]] += 1.0;
                }
            }
            Weights::Distance => {
                // Exact matches take all of the weight
                let exact = neighbors.iter().any(|&(d, _)| d == 0.0);
                for &(d, row) in neighbors {
                    let weight = if exact {
                        if d == 0.0 { 1.0 } else { 0.0 }
                    } else {
                        1.0 / d
                    };
                    votes[self.row_class[row]] += weight;
                }
            }
        }

        let mut best = 0;
        for (class, &vote) in votes.iter().enumerate() {
            if vote > votes[best] {
                best = class;
            }
        }

        self.classes[best].to_string()
    }
}
