//! Fluent builder for `ServerConfig`

use super::types::ServerConfig;
use crate::errors::{MevzuatError, MevzuatResult};
use crate::ocr::{DEFAULT_OCR_ENDPOINT, DEFAULT_OCR_MODEL};
use std::time::Duration;
use url::Url;

pub const DEFAULT_MEVZUAT_BASE_URL: &str = "https://www.mevzuat.gov.tr";
pub const DEFAULT_BEDESTEN_BASE_URL: &str = "https://bedesten.adalet.gov.tr/mevzuat";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound on retries so a misconfiguration cannot stall a tool call
const MAX_RETRIES_LIMIT: u32 = 10;

pub struct ServerConfigBuilder {
    pub(crate) mevzuat_base_url: String,
    pub(crate) bedesten_base_url: String,
    pub(crate) request_timeout: Duration,
    pub(crate) cache_ttl: Duration,
    pub(crate) max_retries: u32,
    pub(crate) user_agent: String,
    pub(crate) ocr_api_key: Option<String>,
    pub(crate) ocr_endpoint: String,
    pub(crate) ocr_model: String,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            mevzuat_base_url: DEFAULT_MEVZUAT_BASE_URL.to_string(),
            bedesten_base_url: DEFAULT_BEDESTEN_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ocr_api_key: None,
            ocr_endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            ocr_model: DEFAULT_OCR_MODEL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a builder for configuring a `ServerConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

fn normalize_base_url(field: &str, raw: &str) -> MevzuatResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| MevzuatError::invalid_parameter(field, format!("'{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MevzuatError::invalid_parameter(
            field,
            format!("'{raw}' must be an http(s) URL"),
        ));
    }
    Ok(trimmed.to_string())
}

impl ServerConfigBuilder {
    /// Validate and build the configuration
    pub fn build(self) -> MevzuatResult<ServerConfig> {
        let mevzuat_base_url = normalize_base_url("mevzuat_base_url", &self.mevzuat_base_url)?;
        let bedesten_base_url = normalize_base_url("bedesten_base_url", &self.bedesten_base_url)?;
        let ocr_endpoint = normalize_base_url("ocr_endpoint", &self.ocr_endpoint)?;

        if self.request_timeout.is_zero() {
            return Err(MevzuatError::invalid_parameter(
                "request_timeout",
                "must be greater than zero",
            ));
        }
        if self.cache_ttl.is_zero() {
            return Err(MevzuatError::invalid_parameter(
                "cache_ttl",
                "must be greater than zero",
            ));
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(MevzuatError::invalid_parameter(
                "max_retries",
                format!("must be at most {MAX_RETRIES_LIMIT}"),
            ));
        }

        Ok(ServerConfig {
            mevzuat_base_url,
            bedesten_base_url,
            request_timeout: self.request_timeout,
            cache_ttl: self.cache_ttl,
            max_retries: self.max_retries,
            user_agent: self.user_agent,
            ocr_api_key: self.ocr_api_key.filter(|k| !k.trim().is_empty()),
            ocr_endpoint,
            ocr_model: self.ocr_model,
        })
    }
}
