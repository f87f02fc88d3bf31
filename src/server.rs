use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::extract::{DocumentAiClient, EntityExtractor, ExtractionError};
use crate::license::{FieldMapper, LicenseRecord};

/// Maximum upload size in bytes (10MB).
const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let extractor = DocumentAiClient::from_config(&config.extraction)?;

    info!(
        name: "extract.client.ready",
        extractor = extractor.name(),
        processor = %extractor.processor_name(),
        "Extraction client ready"
    );

    let state = AppState {
        extractor: Arc::new(extractor),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/process", post(process_handler))
        .route("/healthz", get(healthz_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors a request can end with.
///
/// Only the variant decides what the caller sees; the detailed cause of a
/// 5xx stays in the server logs.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The multipart body carried no non-empty `file` part.
    #[error("File required")]
    MissingFile,

    /// The upload could not be staged to a temp file.
    #[error("Failed to store upload")]
    TempStorage(#[from] std::io::Error),

    /// The extraction service call failed.
    #[error("Document processing failed")]
    Extraction(#[from] ExtractionError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::TempStorage(_) | Self::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingFile => {}
            Self::TempStorage(cause) => {
                tracing::error!(name: "process.temp_storage.failed", error = %cause, "Failed to stage upload");
            }
            Self::Extraction(cause) => {
                tracing::error!(name: "process.extraction.failed", error = %cause, "Extraction failed");
            }
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Response from the process endpoint.
#[derive(Debug, Serialize)]
struct ProcessedDocument {
    /// The mapped license record.
    extracted: LicenseRecord,
}

/// POST /process - Upload one document image and get the mapped record.
async fn process_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessedDocument>, ServerError> {
    let data = read_file_part(multipart).await?;
    let upload_id = uuid::Uuid::new_v4();

    info!(
        name: "process.upload.received",
        upload_id = %upload_id,
        size = data.len(),
        "Upload received"
    );

    // Stage the upload in a scoped temp file; the guard deletes it on
    // every exit path, error paths included.
    let mut temp_file = tempfile::NamedTempFile::new()?;
    temp_file.write_all(&data)?;
    temp_file.flush()?;

    let content = tokio::fs::read(temp_file.path()).await?;

    let entities = state
        .extractor
        .extract(&content, &state.config.extraction.mime_type)
        .await?;

    let record = FieldMapper::new().map(&entities);

    info!(
        name: "process.document.mapped",
        upload_id = %upload_id,
        entity_count = entities.len(),
        "Document mapped"
    );

    Ok(Json(ProcessedDocument { extracted: record }))
}

/// Pull the bytes of the `file` part out of the multipart body.
///
/// Any other parts are skipped. A missing or empty `file` part is a
/// client error; so is a body that fails to parse as multipart.
async fn read_file_part(mut multipart: Multipart) -> Result<Vec<u8>, ServerError> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let data = field.bytes().await.map_err(|e| {
            tracing::debug!(name: "process.multipart.read_failed", error = %e, "Failed to read file part");
            ServerError::MissingFile
        })?;
        if data.is_empty() {
            return Err(ServerError::MissingFile);
        }
        return Ok(data.to_vec());
    }

    Err(ServerError::MissingFile)
}

/// GET /healthz - liveness probe.
async fn healthz_handler() -> &'static str {
    "ok"
}
