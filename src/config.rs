//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::logic::observation::open_meteo::{DEFAULT_MARINE_URL, DEFAULT_WEATHER_URL};
use crate::logic::observation::OpenMeteoConfig;
use crate::logic::pipeline::DEFAULT_BATCH_CONCURRENCY;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Fitted scaler artifact
    pub scaler_path: PathBuf,

    /// Fitted classifier artifact
    pub model_path: PathBuf,

    /// Marine observations endpoint
    pub marine_api_url: String,

    /// Atmospheric observations endpoint
    pub weather_api_url: String,

    /// Per-request upstream timeout in seconds
    pub fetch_timeout_secs: u64,

    /// Batch items processed at once
    pub batch_concurrency: usize,

    pub log_format: LogFormat,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            scaler_path: var("SCALER_PATH")
                .unwrap_or_else(|| "artifacts/scaler.json".to_string())
                .into(),

            model_path: var("MODEL_PATH")
                .unwrap_or_else(|| "artifacts/knn_model.json".to_string())
                .into(),

            marine_api_url: var("MARINE_API_URL")
                .unwrap_or_else(|| DEFAULT_MARINE_URL.to_string()),

            weather_api_url: var("WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),

            fetch_timeout_secs: var("FETCH_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(10),

            batch_concurrency: var("BATCH_CONCURRENCY")
                .and_then(|c| c.parse().ok())
                .unwrap_or(DEFAULT_BATCH_CONCURRENCY)
                .max(1),

            log_format: match var("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            environment: var("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn upstream(&self) -> OpenMeteoConfig {
        OpenMeteoConfig {
            marine_url: self.marine_api_url.clone(),
            weather_url: self.weather_api_url.clone(),
            timeout_seconds: self.fetch_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.scaler_path, PathBuf::from("artifacts/scaler.json"));
        assert_eq!(config.model_path, PathBuf::from("artifacts/knn_model.json"));
        assert_eq!(config.marine_api_url, DEFAULT_MARINE_URL);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.batch_concurrency, DEFAULT_BATCH_CONCURRENCY);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9090"),
            ("BATCH_CONCURRENCY", "16"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "json"),
            ("ENVIRONMENT", "production"),
            ("WEATHER_API_URL", "http://localhost:9000/forecast"),
        ]);
        assert_eq!(config.port, 9090);
        assert_eq!(config.batch_concurrency, 16);
        assert_eq!(config.upstream().timeout_seconds, 3);
        assert_eq!(config.upstream().weather_url, "http://localhost:9000/forecast");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config(&[("PORT", "eighty"), ("BATCH_CONCURRENCY", "0")]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.batch_concurrency, 1);
    }
}
