//! Configuration for the legislation server
//!
//! `ServerConfig` is built either through its fluent builder or from the
//! process environment. The OCR credential is read once here and decides the
//! PDF strategy for the lifetime of the process.

pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

pub use builder::{
    DEFAULT_BEDESTEN_BASE_URL, DEFAULT_CACHE_TTL, DEFAULT_MAX_RETRIES, DEFAULT_MEVZUAT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, ServerConfigBuilder,
};
pub use types::ServerConfig;

use crate::errors::{MevzuatError, MevzuatResult};
use std::time::Duration;

pub const ENV_MEVZUAT_BASE_URL: &str = "MEVZUAT_BASE_URL";
pub const ENV_BEDESTEN_BASE_URL: &str = "BEDESTEN_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEVZUAT_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "MEVZUAT_CACHE_TTL_SECS";
pub const ENV_OCR_API_KEY: &str = "MISTRAL_API_KEY";

fn parse_secs(name: &str, raw: &str) -> MevzuatResult<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| MevzuatError::invalid_parameter(name, format!("'{raw}' is not a number of seconds")))
}

impl ServerConfig {
    /// Build a configuration from environment variables, defaulting the rest
    pub fn from_env() -> MevzuatResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> MevzuatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(url) = lookup(ENV_MEVZUAT_BASE_URL) {
            builder = builder.mevzuat_base_url(url);
        }
        if let Some(url) = lookup(ENV_BEDESTEN_BASE_URL) {
            builder = builder.bedesten_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            builder = builder.request_timeout(parse_secs(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_CACHE_TTL_SECS) {
            builder = builder.cache_ttl(parse_secs(ENV_CACHE_TTL_SECS, &raw)?);
        }
        builder.ocr_api_key(lookup(ENV_OCR_API_KEY)).build()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mevzuat_base_url: DEFAULT_MEVZUAT_BASE_URL.to_string(),
            bedesten_base_url: DEFAULT_BEDESTEN_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ocr_api_key: None,
            ocr_endpoint: crate::ocr::DEFAULT_OCR_ENDPOINT.to_string(),
            ocr_model: crate::ocr::DEFAULT_OCR_MODEL.to_string(),
        }
    }
}
