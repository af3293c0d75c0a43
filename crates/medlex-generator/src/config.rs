//! Configuration for the word generator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which JSON Schema the model is asked to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// word, prefix, root, suffix, meaning, explanation, chineseTranslation, category
    Basic,
    /// Basic plus traditionalChineseTranslation
    #[default]
    Bilingual,
}

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model name sent to the provider
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub api_base: String,

    /// Attempts per token, including the first
    pub max_attempts: u32,

    /// Backoff time unit in milliseconds; the delay before retry k is unit * 2^(k-1)
    pub backoff_unit_ms: u64,

    /// Number of tokens processed at once
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Sampling temperature; provider default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Schema the model must follow
    pub schema_variant: SchemaVariant,
}

impl GeneratorConfig {
    /// Get the backoff unit as a Duration
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.api_base.trim().is_empty() {
            return Err("api_base must not be empty".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(format!("temperature {} out of range [0.0, 2.0]", t));
            }
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    /// Default configuration: five workers, three attempts, one-second backoff unit
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            max_attempts: 3,
            backoff_unit_ms: 1_000,
            concurrency: 5,
            request_timeout_secs: 60,
            temperature: None,
            schema_variant: SchemaVariant::Bilingual,
        }
    }
}

impl GeneratorConfig {
    /// Aggressive preset: wider pool, fewer and faster retries
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 2,
            backoff_unit_ms: 500,
            concurrency: 8,
            request_timeout_secs: 30,
            ..Self::default()
        }
    }

    /// Lenient preset: narrow pool, more patient retries
    pub fn lenient() -> Self {
        Self {
            max_attempts: 5,
            backoff_unit_ms: 2_000,
            concurrency: 3,
            request_timeout_secs: 120,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff_unit(), Duration::from_secs(1));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(GeneratorConfig::aggressive().validate().is_ok());
        assert!(GeneratorConfig::lenient().validate().is_ok());
        assert_eq!(GeneratorConfig::aggressive().concurrency, 8);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = GeneratorConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = GeneratorConfig::default();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_range() {
        let mut config = GeneratorConfig::default();
        config.temperature = Some(3.5);
        assert!(config.validate().is_err());
        config.temperature = Some(0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GeneratorConfig::from_toml(
            "concurrency = 8\nschema_variant = \"basic\"\n",
        )
        .unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.schema_variant, SchemaVariant::Basic);
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneratorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = GeneratorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
