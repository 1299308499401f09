//! Async client for the Sarvam translation API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::core::batch::Translate;
use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{TranslationRequest, TranslationResponse};

/// Async Sarvam translation client
///
/// Constructed once at startup and injected into the components that need
/// it; failures surface immediately when the configuration is invalid.
#[derive(Debug, Clone)]
pub struct SarvamClient {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
}

impl SarvamClient {
    /// Create a new client from a validated configuration
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| TranslationError::ConfigError {
                message: e.to_string(),
            })?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::new(config)
    }

    /// Access the client's configuration
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Send a translation request to the provider
    async fn send_request(&self, request: &TranslationRequest) -> Result<TranslationResponse> {
        let body = serde_json::json!({
            "input": request.input,
            "source_language_code": request.source_lang,
            "target_language_code": request.target_lang,
        });

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("api-subscription-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_success() {
            let parsed: TranslationResponse =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::InvalidResponseError {
                        message: e.to_string(),
                    })?;

            if let Some(request_id) = &parsed.request_id {
                debug!("Translation request {} completed", request_id);
            }

            Ok(parsed)
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            if status_code == 429 {
                return Err(TranslationError::RateLimitError { retry_after: None });
            }

            Err(TranslationError::ApiError {
                status: status_code,
                message: error_text,
            })
        }
    }
}

#[async_trait]
impl Translate for SarvamClient {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let request = TranslationRequest::new(text, source_lang, target_lang);
        let response = self.send_request(&request).await?;
        Ok(response.translated_text)
    }
}
