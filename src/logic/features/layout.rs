//! Feature Layout
//!
//! The scaler and classifier were fitted on columns in exactly this order.
//! A reordered vector does not fail, it silently classifies the wrong point,
//! so the order lives here and nowhere else.
//!
//! Changing the list means bumping [`FEATURE_VERSION`] and refitting both
//! artifacts. Never sort it.

use crc32fast::Hasher;
use serde::Serialize;

pub const FEATURE_VERSION: u8 = 1;

/// Training column order: nine marine readings, then nine atmospheric ones
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Marine (0-8) ===
    "wave_height",             // 0: m
    "wave_direction",          // 1: degrees
    "wave_period",             // 2: s
    "sea_level_height_msl",    // 3: m
    "sea_surface_temperature", // 4: °C
    "ocean_current_direction", // 5: degrees
    "ocean_current_velocity",  // 6: km/h
    "swell_wave_direction",    // 7: degrees
    "swell_wave_period",       // 8: s

    // === Atmospheric (9-17) ===
    "temperature_2m",          // 9: °C
    "relative_humidity_2m",    // 10: %
    "precipitation",           // 11: mm
    "weather_code",            // 12: WMO code
    "pressure_msl",            // 13: hPa
    "surface_pressure",        // 14: hPa
    "wind_speed_10m",          // 15: km/h
    "wind_direction_10m",      // 16: degrees
    "wind_direction_100m",     // 17: degrees
];

/// Checked against `FEATURE_LAYOUT.len()` at compile time below
pub const FEATURE_COUNT: usize = 18;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

/// Number of leading features sourced from the marine provider
pub const MARINE_FEATURE_COUNT: usize = 9;

/// Marine-origin variables, in layout order
pub const MARINE_FEATURES: &[&str] = split_marine(FEATURE_LAYOUT);

/// Atmospheric-origin variables, in layout order
pub const ATMOSPHERIC_FEATURES: &[&str] = split_atmospheric(FEATURE_LAYOUT);

const fn split_marine(layout: &'static [&'static str]) -> &'static [&'static str] {
    layout.split_at(MARINE_FEATURE_COUNT).0
}

const fn split_atmospheric(layout: &'static [&'static str]) -> &'static [&'static str] {
    layout.split_at(MARINE_FEATURE_COUNT).1
}

// ============================================================================
// FINGERPRINT
// ============================================================================

/// CRC32 over the version byte and the NUL-terminated names. Reported by
/// `/health` and `/api/v1/layout` so clients can spot a retrained layout.
pub fn layout_hash() -> u32 {
    let mut crc = Hasher::new();
    crc.update(&[FEATURE_VERSION]);
    FEATURE_LAYOUT.iter().for_each(|name| {
        crc.update(name.as_bytes());
        crc.update(b"\0");
    });
    crc.finalize()
}

/// What a client needs to build a record the classifier understands
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<&'static str>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.to_vec(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Column names declared by a fitted artifact don't match the layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("feature layout mismatch at column {position}: expected `{expected}`, artifact has `{actual}`")]
pub struct LayoutMismatchError {
    pub position: usize,
    pub expected: String,
    pub actual: String,
}

/// Validate the column names an artifact was fitted with
pub fn validate_feature_names<S: AsRef<str>>(names: &[S]) -> Result<(), LayoutMismatchError> {
    let max = names.len().max(FEATURE_COUNT);

    for position in 0..max {
        let expected = feature_name(position).unwrap_or("<none>");
        let actual = names.get(position).map(AsRef::as_ref).unwrap_or("<none>");
        if expected != actual {
            return Err(LayoutMismatchError {
                position,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

/// Position of a named feature in the vector
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&candidate| candidate == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
