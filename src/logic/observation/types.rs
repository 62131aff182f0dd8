//! Observation Types

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

// ============================================================================
// COORDINATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

// ============================================================================
// OBSERVATION WINDOW
// ============================================================================

/// One-hour UTC interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ObservationWindow {
    /// Provider timestamp format (`start_hour` / `end_hour`)
    const QUERY_FORMAT: &'static str = "%Y-%m-%dT%H:%M";

    /// The hour that contains `now`
    pub fn containing(now: DateTime<Utc>) -> Self {
        let start = now.duration_trunc(Duration::hours(1)).unwrap_or(now);
        Self {
            start,
            end: start + Duration::hours(1),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn start_param(&self) -> String {
        self.start.format(Self::QUERY_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(Self::QUERY_FORMAT).to_string()
    }
}

// ============================================================================
// SAMPLES
// ============================================================================

/// The representative hour's reading per variable
pub type Sample = BTreeMap<String, f64>;

/// Output of one fetch: both providers' samples for the same window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    pub marine: Sample,
    pub atmospheric: Sample,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamSource {
    Marine,
    Atmospheric,
}

impl std::fmt::Display for UpstreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Marine => write!(f, "marine"),
            Self::Atmospheric => write!(f, "atmospheric"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Non-success status, transport failure or timeout; `status` is `None`
    /// when no response arrived
    #[error("{provider} provider unavailable (status: {}): {body}", status_label(.status))]
    UpstreamUnavailable {
        provider: UpstreamSource,
        status: Option<u16>,
        body: String,
    },

    #[error("malformed {provider} response: {reason}")]
    MalformedUpstreamResponse {
        provider: UpstreamSource,
        reason: String,
    },
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { .. } => "UpstreamUnavailable",
            Self::MalformedUpstreamResponse { .. } => "MalformedUpstreamResponse",
        }
    }

    pub fn provider(&self) -> UpstreamSource {
        match self {
            Self::UpstreamUnavailable { provider, .. }
            | Self::MalformedUpstreamResponse { provider, .. } => *provider,
        }
    }
}
