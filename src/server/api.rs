//! HTTP API server implementation

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::core::client::SarvamClient;
use crate::core::errors::TranslationError;
use crate::processors::docx::DocxProcessor;

/// MIME type returned with translated documents
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Upload cap for document files
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Provider client, constructed once at startup
    translator: Arc<SarvamClient>,
    /// Document format boundary
    processor: DocxProcessor,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    /// Always "ok" when the service is up
    status: String,
    /// Service name
    service: String,
    /// Crate version
    version: String,
}

/// Error response envelope
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error detail payload
    pub error: ErrorDetail,
}

/// Error detail payload
#[derive(Serialize)]
pub struct ErrorDetail {
    /// Human-readable failure description
    pub message: String,
    /// Stable machine-readable code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Error category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// Build a structured error reply
fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    code: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message: message.into(),
                code: Some(code.to_string()),
                r#type: Some("api_error".to_string()),
            },
        }),
    )
}

/// Map a translation failure to an HTTP status
fn status_for(err: &TranslationError) -> StatusCode {
    match err {
        TranslationError::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
        TranslationError::RateLimitError { .. } => StatusCode::TOO_MANY_REQUESTS,
        TranslationError::ApiError { .. }
        | TranslationError::NetworkError { .. }
        | TranslationError::InvalidResponseError { .. }
        | TranslationError::AlignmentMismatch { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check handler
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "sarvam-doc-translator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Document translation handler
///
/// Accepts a multipart form with `file`, `source_lang`, and `target_lang`
/// fields and responds with the translated document. The working directory
/// for the request is a temporary directory released on every exit path.
async fn translate_doc(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut file_bytes: Option<Bytes> = None;
    let mut source_lang: Option<String> = None;
    let mut target_lang: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Malformed multipart request: {}", e),
            "invalid_request",
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field.bytes().await.map_err(|e| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file field: {}", e),
                        "invalid_request",
                    )
                })?;
                file_bytes = Some(bytes);
            }
            "source_lang" | "target_lang" => {
                let value = field.text().await.map_err(|e| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read {} field: {}", name, e),
                        "invalid_request",
                    )
                })?;
                if name == "source_lang" {
                    source_lang = Some(value);
                } else {
                    target_lang = Some(value);
                }
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "file field is required",
            "invalid_request",
        )
    })?;
    let source_lang = source_lang.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "source_lang field is required",
            "invalid_request",
        )
    })?;
    let target_lang = target_lang.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "target_lang field is required",
            "invalid_request",
        )
    })?;

    // Request-scoped working directory, removed when dropped
    let tmpdir = tempfile::tempdir().map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create working directory: {}", e),
            "internal_error",
        )
    })?;
    let input_path = tmpdir.path().join("input.docx");
    let output_path = tmpdir.path().join("translated.docx");

    tokio::fs::write(&input_path, &file_bytes).await.map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to store upload: {}", e),
            "internal_error",
        )
    })?;

    let max_chars = state.translator.config().max_chars;
    state
        .processor
        .translate_file(
            state.translator.as_ref(),
            &input_path,
            &output_path,
            &source_lang,
            &target_lang,
            max_chars,
        )
        .await
        .map_err(|e| {
            warn!("Translation failed: {}", e);
            error_response(status_for(&e), e.to_string(), "translation_error")
        })?;

    let body = tokio::fs::read(&output_path).await.map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read translated document: {}", e),
            "internal_error",
        )
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"translated.docx\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Build the CORS layer from the configured origins
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the application router
fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/translate-doc", post(translate_doc))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16) -> anyhow::Result<()> {
    // Fail fast when the credential is absent
    let translator = Arc::new(SarvamClient::from_env()?);
    let cors = cors_layer(&translator.config().allowed_origins);

    let state = Arc::new(AppState {
        translator,
        processor: DocxProcessor::new(),
    });

    let app = create_router(state, cors);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
