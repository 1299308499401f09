//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::batch::DEFAULT_MAX_CHARS;

/// Default Sarvam translation endpoint
const DEFAULT_API_ENDPOINT: &str = "https://api.sarvam.ai/translate";

/// Origins allowed to call the HTTP API when none are configured
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://job-joseph.com",
    "https://www.job-joseph.com",
];

/// Configuration for the translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Sarvam API subscription key
    pub api_key: String,
    /// Translation endpoint URL
    pub api_endpoint: String,
    /// Per-batch character budget, separators excluded
    pub max_chars: usize,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Origins allowed by the HTTP API's CORS policy
    pub allowed_origins: Vec<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("SARVAM_API_KEY").unwrap_or_default(),
            api_endpoint: std::env::var("SARVAM_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string()),
            max_chars: DEFAULT_MAX_CHARS,
            timeout_ms: 30000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    ///
    /// Fails when `SARVAM_API_KEY` is absent so a misconfigured service
    /// refuses to start instead of failing on the first request.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("SARVAM_API_KEY")
            .map_err(|_| anyhow::anyhow!("SARVAM_API_KEY environment variable is required"))?;

        let api_endpoint = std::env::var("SARVAM_API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string());

        let max_chars = std::env::var("MAX_CHARS")
            .unwrap_or_else(|_| DEFAULT_MAX_CHARS.to_string())
            .parse::<usize>()?;

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(Self {
            api_key,
            api_endpoint,
            max_chars,
            timeout_ms,
            allowed_origins,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!("API key is required"));
        }

        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.max_chars == 0 {
            return Err(anyhow::anyhow!("max_chars must be greater than 0"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TranslatorConfig {
        TranslatorConfig {
            api_key: "test_key".to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            timeout_ms: 30000,
            allowed_origins: vec!["https://example.com".to_string()],
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = TranslatorConfig {
            api_key: "".to_string(),
            ..test_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_budget() {
        let config = TranslatorConfig {
            max_chars: 0,
            ..test_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = test_config();
        config.to_file(&path).unwrap();

        let loaded = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api_key, config.api_key);
        assert_eq!(loaded.max_chars, config.max_chars);
        assert_eq!(loaded.allowed_origins, config.allowed_origins);
    }
}
