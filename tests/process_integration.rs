//! End-to-end tests for the /process endpoint with a stubbed extraction
//! backend. The real Document AI client is exercised only by its own unit
//! tests; here the trait seam keeps the cloud out of the loop.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;
use std::sync::Arc;

use docai_license_service::AppState;
use docai_license_service::config::{AppConfig, ExtractionConfig, ServerConfig};
use docai_license_service::extract::{Entity, EntityExtractor, ExtractionError};
use docai_license_service::server::build_router;

/// Extractor stub that returns a canned entity list.
#[derive(Debug)]
struct StubExtractor {
    entities: Vec<Entity>,
}

#[async_trait]
impl EntityExtractor for StubExtractor {
    async fn extract(
        &self,
        content: &[u8],
        _mime_type: &str,
    ) -> Result<Vec<Entity>, ExtractionError> {
        if content.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        Ok(self.entities.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Extractor stub that always fails, standing in for auth/network/service
/// failures.
#[derive(Debug)]
struct FailingExtractor;

#[async_trait]
impl EntityExtractor for FailingExtractor {
    async fn extract(
        &self,
        _content: &[u8],
        _mime_type: &str,
    ) -> Result<Vec<Entity>, ExtractionError> {
        Err(ExtractionError::Service {
            status: 403,
            detail: "PERMISSION_DENIED: token expired".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing-stub"
    }
}

fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        extraction: ExtractionConfig {
            project_id: "test-project".to_string(),
            location: "us".to_string(),
            processor_id: "test-processor".to_string(),
            credentials_path: "service_account.json".to_string(),
            mime_type: "image/png".to_string(),
            endpoint: None,
        },
    })
}

fn server_with(extractor: Arc<dyn EntityExtractor>) -> TestServer {
    let state = AppState {
        extractor,
        config: test_config(),
    };
    TestServer::new(build_router(state)).expect("failed to start test server")
}

fn file_part(bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name("license.png")
        .mime_type("image/png")
}

#[tokio::test]
async fn test_missing_file_part_returns_400() {
    let server = server_with(Arc::new(StubExtractor { entities: vec![] }));

    let response = server
        .post("/process")
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "File required");
}

#[tokio::test]
async fn test_empty_file_part_returns_400() {
    let server = server_with(Arc::new(StubExtractor { entities: vec![] }));

    let response = server
        .post("/process")
        .multipart(MultipartForm::new().add_part("file", file_part(b"")))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "File required");
}

#[tokio::test]
async fn test_process_maps_entities_into_record() {
    let entities = vec![
        Entity::new("id", "LIC-2024-001", 0.91),
        Entity::new("organization", "City Revenue Office", 0.88),
        Entity::new("organization", "Retail Trade", 0.82),
        Entity::new("person", "Jane Doe", 0.9),
        Entity::new("person", "Central Region", 0.85),
        Entity::new("date_time", "2024-01-10", 0.8),
        Entity::new("date_time", "2025-01-10", 0.79),
        Entity::new("price", "1000", 0.75),
        Entity::new("note", "ignored entirely", 0.99),
        Entity::new("person", "Low Confidence", 0.3),
    ];
    let server = server_with(Arc::new(StubExtractor { entities }));

    let response = server
        .post("/process")
        .multipart(MultipartForm::new().add_part("file", file_part(b"\x89PNG fake image bytes")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let extracted = &body["extracted"];
    assert_eq!(extracted["license_id"], "LIC-2024-001");
    assert_eq!(extracted["issuing_office"], "City Revenue Office");
    assert_eq!(extracted["business_type"], "Retail Trade");
    assert_eq!(extracted["licensee_name"], "Jane Doe");
    assert_eq!(extracted["region"], "Central Region");
    assert_eq!(extracted["issue_date"], "2024-01-10");
    assert_eq!(extracted["expiry_date"], "2025-01-10");
    assert_eq!(extracted["amount_paid"], "1000");
    // Fields no entity reached stay empty.
    assert_eq!(extracted["ward"], "");
    assert_eq!(extracted["street"], "");
    assert_eq!(extracted["branch_type"], "");
}

#[tokio::test]
async fn test_extraction_failure_returns_500_without_detail() {
    let server = server_with(Arc::new(FailingExtractor));

    let response = server
        .post("/process")
        .multipart(MultipartForm::new().add_part("file", file_part(b"bytes")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Document processing failed");
    // The cloud error is logged server-side only, never echoed back.
    assert!(!response.text().contains("PERMISSION_DENIED"));
}

#[tokio::test]
async fn test_extra_parts_are_ignored() {
    let entities = vec![Entity::new("id", "LIC-7", 0.9)];
    let server = server_with(Arc::new(StubExtractor { entities }));

    let response = server
        .post("/process")
        .multipart(
            MultipartForm::new()
                .add_text("comment", "front of the card")
                .add_part("file", file_part(b"bytes")),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["extracted"]["license_id"], "LIC-7");
}

#[tokio::test]
async fn test_healthz() {
    let server = server_with(Arc::new(StubExtractor { entities: vec![] }));

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}
