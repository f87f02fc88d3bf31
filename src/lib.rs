//! Document AI License Service
//!
//! An HTTP service that accepts an uploaded business license image,
//! forwards it to an external Document AI processor, and maps the
//! extracted entity list onto a fixed-shape license record.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server with one multipart upload endpoint
//! - **Extraction**: reqwest client for the Document AI `:process` call,
//!   behind the [`extract::EntityExtractor`] trait
//! - **Mapping**: ordered rule-table heuristic that resolves repeated
//!   entity type labels into distinct record fields
//!
//! # Modules
//!
//! - [`config`]: startup configuration (CLI, env, file)
//! - [`extract`]: extraction client and wire types
//! - [`license`]: license record and field mapper
//! - [`server`]: router and request handlers

pub mod config;
pub mod extract;
pub mod license;
pub mod server;

use crate::config::AppConfig;
use crate::extract::EntityExtractor;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Extraction client for the external Document AI processor.
    pub extractor: Arc<dyn EntityExtractor>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
