//! Generator configuration and startup credential loading.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the generation-service API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Configuration for the streaming generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generation API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Cosmetic delay between fragments in milliseconds.
    #[serde(default)]
    pub fragment_delay_ms: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            fragment_delay_ms: 0,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the cosmetic inter-fragment delay.
    #[must_use]
    pub fn with_fragment_delay(mut self, millis: u64) -> Self {
        self.fragment_delay_ms = millis;
        self
    }

    /// Gets the timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Gets the inter-fragment delay as a Duration.
    #[must_use]
    pub fn fragment_delay(&self) -> Duration {
        Duration::from_millis(self.fragment_delay_ms)
    }
}

/// Reads the API key from the environment.
///
/// Absence (or a blank value) is a fatal startup condition: the session must
/// report it and accept no input.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    load_api_key(API_KEY_VAR)
}

fn load_api_key(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::missing_api_key(var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.fragment_delay(), Duration::ZERO);
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new()
            .with_model("custom-model")
            .with_timeout(5.0)
            .with_fragment_delay(100);

        assert_eq!(config.model, "custom-model");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.fragment_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GeneratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert_eq!(config.fragment_delay_ms, 0);
    }

    #[test]
    fn test_load_api_key_present() {
        std::env::set_var("IDEAFORGE_TEST_KEY_PRESENT", "secret");
        assert_eq!(
            load_api_key("IDEAFORGE_TEST_KEY_PRESENT"),
            Ok("secret".to_string())
        );
    }

    #[test]
    fn test_load_api_key_missing_or_blank() {
        assert!(load_api_key("IDEAFORGE_TEST_KEY_MISSING").is_err());

        std::env::set_var("IDEAFORGE_TEST_KEY_BLANK", "   ");
        assert!(load_api_key("IDEAFORGE_TEST_KEY_BLANK").is_err());
    }
}
