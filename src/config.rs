//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default scoring API deployment
const DEFAULT_API_URL: &str = "https://api-scoring-credit-final.onrender.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote scoring API (no trailing slash)
    pub api_url: String,

    /// Path of the test-set CSV
    pub data_path: PathBuf,

    /// Server port
    pub port: u16,

    /// Timeout for `GET /status`
    pub status_timeout: Duration,

    /// Timeout for `GET /model/info`
    pub model_info_timeout: Duration,

    /// Timeout for `POST /predict`
    pub predict_timeout: Duration,

    /// Timeout for `POST /explain`
    pub explain_timeout: Duration,

    /// Maximum points drawn in the comparison scatter plot
    pub scatter_sample_size: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_path: PathBuf::from("data/all_clients_test.csv"),
            port: 8501,
            status_timeout: Duration::from_secs(2),
            model_info_timeout: Duration::from_secs(5),
            predict_timeout: Duration::from_secs(5),
            explain_timeout: Duration::from_secs(10),
            scatter_sample_size: 500,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: env::var("SCORING_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),

            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            status_timeout: secs_var("STATUS_TIMEOUT_SECS").unwrap_or(defaults.status_timeout),
            model_info_timeout: secs_var("MODEL_INFO_TIMEOUT_SECS").unwrap_or(defaults.model_info_timeout),
            predict_timeout: secs_var("PREDICT_TIMEOUT_SECS").unwrap_or(defaults.predict_timeout),
            explain_timeout: secs_var("EXPLAIN_TIMEOUT_SECS").unwrap_or(defaults.explain_timeout),

            scatter_sample_size: env::var("SCATTER_SAMPLE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.scatter_sample_size),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn secs_var(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = Config::default();
        assert_eq!(config.status_timeout, Duration::from_secs(2));
        assert_eq!(config.predict_timeout, Duration::from_secs(5));
        assert_eq!(config.explain_timeout, Duration::from_secs(10));
        assert!(config.explain_timeout > config.predict_timeout);
        assert!(!config.is_production());
    }
}
