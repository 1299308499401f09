//! Sarvam Document Translator - document translation service library
//!
//! This library translates Word documents paragraph by paragraph through the
//! Sarvam translation API, batching paragraph text into bounded-size
//! requests, and exposes the flow as an HTTP service and a CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;
pub mod processors;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    batch::{plan_batches, translate_document, Segment, Translate, DEFAULT_MAX_CHARS},
    client::SarvamClient,
    config::TranslatorConfig,
    errors::TranslationError,
    models::{TranslationRequest, TranslationResponse},
};

pub use crate::processors::docx::DocxProcessor;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
