//! Document AI extraction client.
//!
//! Wraps the external Document AI processor behind the [`EntityExtractor`]
//! trait so the HTTP layer never talks to the cloud service directly.

use super::types::{Entity, ProcessRequest, ProcessResponse, RawDocument};
use crate::config::ExtractionConfig;
use async_trait::async_trait;
use base64::Engine;

/// Errors that can occur while talking to the extraction service.
///
/// Callers outside this module collapse every variant into one opaque
/// failure; the variants exist so server-side logs stay diagnosable.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The processor identity is incomplete.
    #[error("Extraction config incomplete: {0}")]
    Config(String),

    /// The credential file could not be read.
    #[error("Failed to read credentials from {path}: {source}")]
    Credentials {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded document has no content.
    #[error("Document is empty")]
    EmptyDocument,

    /// Transport-level failure reaching the service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Service error ({status}): {detail}")]
    Service { status: u16, detail: String },

    /// The service answered 200 but the body did not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for entity extraction backends.
///
/// Implementors take raw document bytes plus a MIME type and return the
/// top-level entities the service found. Each call is a fresh request;
/// no caching or idempotency guarantee is provided.
#[async_trait]
pub trait EntityExtractor: Send + Sync + std::fmt::Debug {
    /// Extract entities from one document.
    async fn extract(&self, content: &[u8], mime_type: &str) -> Result<Vec<Entity>, ExtractionError>;

    /// Get the extractor name for logging and debugging.
    fn name(&self) -> &'static str;
}

/// Client for the Document AI `:process` REST endpoint.
///
/// Built once at startup from [`ExtractionConfig`]; the processor resource
/// name and credential are fixed for the life of the process.
#[derive(Debug)]
pub struct DocumentAiClient {
    client: reqwest::Client,
    endpoint: String,
    processor_name: String,
    token: String,
}

impl DocumentAiClient {
    /// Create a client from process-wide configuration.
    ///
    /// Reads the bearer token from `credentials_path` once; credential
    /// refresh is a deployment concern, not handled here.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        if config.project_id.is_empty() || config.processor_id.is_empty() {
            return Err(ExtractionError::Config(
                "project_id and processor_id must be set".to_string(),
            ));
        }

        let token = std::fs::read_to_string(&config.credentials_path)
            .map(|t| t.trim().to_string())
            .map_err(|e| ExtractionError::Credentials {
                path: config.credentials_path.clone(),
                source: e,
            })?;

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}-documentai.googleapis.com", config.location));

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            processor_name: processor_name(&config.project_id, &config.location, &config.processor_id),
            token,
        })
    }

    /// Fully-qualified processor resource name this client calls.
    pub fn processor_name(&self) -> &str {
        &self.processor_name
    }
}

/// Build the fully-qualified processor resource name.
pub fn processor_name(project_id: &str, location: &str, processor_id: &str) -> String {
    format!("projects/{project_id}/locations/{location}/processors/{processor_id}")
}

#[async_trait]
impl EntityExtractor for DocumentAiClient {
    async fn extract(&self, content: &[u8], mime_type: &str) -> Result<Vec<Entity>, ExtractionError> {
        if content.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let url = format!("{}/v1/{}:process", self.endpoint, self.processor_name);

        let request = ProcessRequest {
            raw_document: RawDocument {
                content: base64::engine::general_purpose::STANDARD.encode(content),
                mime_type: mime_type.to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Service { status, detail });
        }

        let process_response: ProcessResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

        let entities = process_response.document.entities;

        tracing::debug!(
            name: "extract.document.processed",
            entity_count = entities.len(),
            "Document processed by extraction service"
        );

        Ok(entities)
    }

    fn name(&self) -> &'static str {
        "document_ai"
    }
}
