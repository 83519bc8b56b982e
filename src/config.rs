//! Environment-backed configuration
//!
//! API keys and provider base URLs come from the process environment, loaded
//! once at startup. Missing keys are not an error here: adapters report a
//! typed failure on use and the aggregator falls back to synthetic data, so
//! the binary stays usable with no credentials at all.

use std::env;

/// Runtime configuration for the provider adapters
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key, shared by the weather and wind adapters
    pub openweathermap_api_key: Option<String>,
    /// WorldTides API key
    pub worldtides_api_key: Option<String>,
    pub openweathermap_base_url: String,
    pub worldtides_base_url: String,
}

const OPENWEATHERMAP_DEFAULT_URL: &str = "https://api.openweathermap.org";
const WORLDTIDES_DEFAULT_URL: &str = "https://www.worldtides.info";

impl Config {
    /// Reads the configuration from the environment
    ///
    /// Base URL overrides (`OPENWEATHERMAP_BASE_URL`, `WORLDTIDES_BASE_URL`)
    /// exist so tests and proxies can point the adapters elsewhere.
    pub fn from_env() -> Self {
        Self {
            openweathermap_api_key: non_empty_var("OPENWEATHERMAP_API_KEY"),
            worldtides_api_key: non_empty_var("WORLDTIDES_API_KEY"),
            openweathermap_base_url: non_empty_var("OPENWEATHERMAP_BASE_URL")
                .unwrap_or_else(|| OPENWEATHERMAP_DEFAULT_URL.to_string()),
            worldtides_base_url: non_empty_var("WORLDTIDES_BASE_URL")
                .unwrap_or_else(|| WORLDTIDES_DEFAULT_URL.to_string()),
        }
    }

    /// Configuration with dummy keys and an unroutable base URL, for tests
    /// that must never reach a real provider
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            openweathermap_api_key: Some("test-key".to_string()),
            worldtides_api_key: Some("test-key".to_string()),
            openweathermap_base_url: "http://127.0.0.1:9".to_string(),
            worldtides_base_url: "http://127.0.0.1:9".to_string(),
        }
    }
}

/// Reads an environment variable, treating empty values as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
