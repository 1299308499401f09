//! Core data models for translation

use serde::{Deserialize, Serialize};

/// Translation request sent to the provider
///
/// Language codes are opaque strings passed through unchanged; validation,
/// if any, is the provider's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text block to translate, segments separated by line breaks
    pub input: String,
    /// Source language code (e.g. "en-IN")
    pub source_lang: String,
    /// Target language code (e.g. "hi-IN")
    pub target_lang: String,
}

impl TranslationRequest {
    /// Create a new translation request
    pub fn new(
        input: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Provider response wire shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Translated text block, line breaks preserved between segments
    pub translated_text: String,
    /// Provider-assigned request identifier
    #[serde(default)]
    pub request_id: Option<String>,
    /// Source language as detected or echoed by the provider
    #[serde(default)]
    pub source_language_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_construction() {
        let request = TranslationRequest::new("Hello\nWorld", "en-IN", "hi-IN");
        assert_eq!(request.input, "Hello\nWorld");
        assert_eq!(request.source_lang, "en-IN");
        assert_eq!(request.target_lang, "hi-IN");
    }

    #[test]
    fn test_response_parsing_without_optional_fields() {
        let response: TranslationResponse =
            serde_json::from_str(r#"{"translated_text": "नमस्ते"}"#).unwrap();
        assert_eq!(response.translated_text, "नमस्ते");
        assert!(response.request_id.is_none());
        assert!(response.source_language_code.is_none());
    }
}
