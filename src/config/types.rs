//! Core configuration type for the legislation server

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by the upstream clients, the caches and the PDF strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the legislation site (search listings, document pages, PDFs)
    pub(crate) mevzuat_base_url: String,
    /// Base URL of the bedesten JSON API used by the unified tools
    pub(crate) bedesten_base_url: String,
    /// Per-request timeout for every upstream call
    pub(crate) request_timeout: Duration,
    /// Time-to-live of cached search, document and match results
    pub(crate) cache_ttl: Duration,
    /// Retries after the first attempt for transient upstream failures
    pub(crate) max_retries: u32,
    pub(crate) user_agent: String,

    /// OCR credential; selects OCR over the PDF text layer when present
    #[serde(skip_serializing)]
    pub(crate) ocr_api_key: Option<String>,
    pub(crate) ocr_endpoint: String,
    pub(crate) ocr_model: String,
}
