//! Observation Module - upstream marine and atmospheric readings
//!
//! This module handles:
//! - Coordinates and the one-hour observation window
//! - The fetch contract the pipeline depends on
//! - The Open-Meteo HTTP implementation

pub mod types;
pub mod fetcher;
pub mod open_meteo;

#[cfg(test)]
pub mod mock;

pub use types::{Coordinate, FetchError, ObservationWindow, Observations, Sample, UpstreamSource};
pub use fetcher::ObservationFetcher;
pub use open_meteo::{OpenMeteoConfig, OpenMeteoFetcher};
