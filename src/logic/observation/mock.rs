//! In-memory fetcher for tests

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::fetcher::{decode_hourly, ObservationFetcher};
use super::types::{Coordinate, FetchError, ObservationWindow, Observations, UpstreamSource};
use crate::logic::features::{ATMOSPHERIC_FEATURES, MARINE_FEATURES};

/// Canned provider reply
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16, String),
}

/// Answers every fetch with the same canned marine and atmospheric replies,
/// decoded through the real `hourly` decoder
pub struct StaticFetcher {
    marine: Reply,
    atmospheric: Reply,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(marine: Reply, atmospheric: Reply) -> Self {
        Self { marine, atmospheric, calls: AtomicUsize::new(0) }
    }

    /// Both providers answer with the given first-hour values
    pub fn from_values(marine: &[f64; 9], atmospheric: &[f64; 9]) -> Self {
        Self::new(
            Reply::Body(hourly_body(MARINE_FEATURES, marine)),
            Reply::Body(hourly_body(ATMOSPHERIC_FEATURES, atmospheric)),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Build an `hourly` payload with a second hour that must never be used
pub fn hourly_body(variables: &[&str], values: &[f64]) -> String {
    let mut hourly = serde_json::Map::new();
    hourly.insert(
        "time".to_string(),
        serde_json::json!(["2025-07-14T09:00", "2025-07-14T10:00"]),
    );
    for (name, value) in variables.iter().zip(values) {
        hourly.insert(name.to_string(), serde_json::json!([value, value + 1000.0]));
    }
    serde_json::json!({ "hourly": hourly }).to_string()
}

fn answer(provider: UpstreamSource, reply: &Reply, variables: &[&str]) -> Result<super::Sample, FetchError> {
    match reply {
        Reply::Body(body) => decode_hourly(provider, body, variables),
        Reply::Status(status, body) => Err(FetchError::UpstreamUnavailable {
            provider,
            status: Some(*status),
            body: body.clone(),
        }),
    }
}

#[async_trait]
impl ObservationFetcher for StaticFetcher {
    async fn fetch(
        &self,
        _coordinate: Coordinate,
        _window: ObservationWindow,
    ) -> Result<Observations, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let marine = answer(UpstreamSource::Marine, &self.marine, MARINE_FEATURES);
        let atmospheric = answer(UpstreamSource::Atmospheric, &self.atmospheric, ATMOSPHERIC_FEATURES);
        Ok(Observations { marine: marine?, atmospheric: atmospheric? })
    }
}
