//! Observation Fetcher - the seam between the pipeline and upstream providers

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{Coordinate, FetchError, ObservationWindow, Observations, Sample, UpstreamSource};

/// Retrieves one representative hour of marine and atmospheric readings.
///
/// Retry, caching or rate limiting belong in wrappers around an implementation;
/// the pipeline only ever sees this trait.
#[async_trait]
pub trait ObservationFetcher: Send + Sync {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        window: ObservationWindow,
    ) -> Result<Observations, FetchError>;
}

#[async_trait]
impl<T: ObservationFetcher + ?Sized> ObservationFetcher for Arc<T> {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        window: ObservationWindow,
    ) -> Result<Observations, FetchError> {
        (**self).fetch(coordinate, window).await
    }
}

/// Decode a provider payload of the form
/// `{"hourly": {"time": [..], "<variable>": [v0, v1, ..], ..}}`.
///
/// The first entry of each series is the representative value. Later entries
/// are ignored, never averaged.
pub fn decode_hourly(
    provider: UpstreamSource,
    body: &str,
    variables: &[&str],
) -> Result<Sample, FetchError> {
    let malformed = |reason: String| FetchError::MalformedUpstreamResponse { provider, reason };

    let payload: Value = serde_json::from_str(body)
        .map_err(|e| malformed(format!("body is not JSON: {}", e)))?;

    let hourly = payload
        .get("hourly")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing `hourly` object".to_string()))?;

    let mut sample = Sample::new();
    let mut problems = Vec::new();

    for &variable in variables {
        match hourly.get(variable) {
            None => problems.push(format!("`{}` absent", variable)),
            Some(Value::Array(series)) => match series.first() {
                None => problems.push(format!("`{}` has no samples", variable)),
                Some(first) => match first.as_f64() {
                    Some(v) => {
                        sample.insert(variable.to_string(), v);
                    }
                    None => problems.push(format!("`{}` first sample is {}", variable, first)),
                },
            },
            Some(other) => problems.push(format!("`{}` is not a series: {}", variable, other)),
        }
    }

    if !problems.is_empty() {
        return Err(malformed(problems.join(", ")));
    }

    Ok(sample)
}
