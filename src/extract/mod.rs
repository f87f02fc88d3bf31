//! Extraction client for the external Document AI service.
//!
//! The service is a collaborator, not something this crate owns: it takes
//! raw document bytes plus a MIME type and returns a document whose
//! entities carry `type` / `mentionText` / `confidence` and optional
//! nested properties of the same shape.

pub mod client;
pub mod types;

pub use client::{DocumentAiClient, EntityExtractor, ExtractionError};
pub use types::Entity;
