//! Open-Meteo Client
//!
//! HTTP implementation of [`ObservationFetcher`] for the Open-Meteo marine and
//! forecast APIs. Any provider returning the same `hourly` shape works.

use std::time::Duration;

use async_trait::async_trait;

use super::fetcher::{decode_hourly, ObservationFetcher};
use super::types::{Coordinate, FetchError, ObservationWindow, Observations, Sample, UpstreamSource};
use crate::logic::features::{ATMOSPHERIC_FEATURES, MARINE_FEATURES};

pub const DEFAULT_MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Upstream endpoint configuration
#[derive(Debug, Clone)]
pub struct OpenMeteoConfig {
    pub marine_url: String,
    pub weather_url: String,
    pub timeout_seconds: u64,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            marine_url: DEFAULT_MARINE_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

pub struct OpenMeteoFetcher {
    config: OpenMeteoConfig,
    http_client: reqwest::Client,
}

impl OpenMeteoFetcher {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, http_client })
    }

    /// Request the hourly series for `variables` from one provider
    async fn fetch_source(
        &self,
        provider: UpstreamSource,
        url: &str,
        variables: &[&str],
        coordinate: Coordinate,
        window: ObservationWindow,
    ) -> Result<Sample, FetchError> {
        let unavailable = |status: Option<u16>, body: String| FetchError::UpstreamUnavailable {
            provider,
            status,
            body,
        };

        let query = [
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("hourly", variables.join(",")),
            ("start_hour", window.start_param()),
            ("end_hour", window.end_param()),
        ];

        tracing::debug!(
            %provider,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            start = %window.start_param(),
            "Requesting hourly observations"
        );

        let response = self.http_client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out after {}s", self.config.timeout_seconds)
                } else {
                    e.to_string()
                };
                unavailable(None, reason)
            })?;

        let status = response.status();
        let body = response.text().await
            .map_err(|e| unavailable(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%provider, status = status.as_u16(), "Upstream returned error status");
            return Err(unavailable(Some(status.as_u16()), body));
        }

        decode_hourly(provider, &body, variables)
    }
}

#[async_trait]
impl ObservationFetcher for OpenMeteoFetcher {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        window: ObservationWindow,
    ) -> Result<Observations, FetchError> {
        // Independent requests; both must settle before anything is assembled.
        let (marine, atmospheric) = tokio::join!(
            self.fetch_source(
                UpstreamSource::Marine,
                &self.config.marine_url,
                MARINE_FEATURES,
                coordinate,
                window,
            ),
            self.fetch_source(
                UpstreamSource::Atmospheric,
                &self.config.weather_url,
                ATMOSPHERIC_FEATURES,
                coordinate,
                window,
            ),
        );

        Ok(Observations {
            marine: marine?,
            atmospheric: atmospheric?,
        })
    }
}
