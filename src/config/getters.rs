//! Getter methods for `ServerConfig`

use super::types::ServerConfig;
use crate::errors::RetryConfig;
use std::time::Duration;

impl ServerConfig {
    #[must_use]
    pub fn mevzuat_base_url(&self) -> &str {
        &self.mevzuat_base_url
    }

    #[must_use]
    pub fn bedesten_base_url(&self) -> &str {
        &self.bedesten_base_url
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn ocr_api_key(&self) -> Option<&str> {
        self.ocr_api_key.as_deref()
    }

    #[must_use]
    pub fn ocr_endpoint(&self) -> &str {
        &self.ocr_endpoint
    }

    #[must_use]
    pub fn ocr_model(&self) -> &str {
        &self.ocr_model
    }

    /// Whether PDF documents will be sent to OCR
    #[must_use]
    pub fn ocr_enabled(&self) -> bool {
        self.ocr_api_key.is_some()
    }

    /// Retry policy for upstream requests
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            ..RetryConfig::default()
        }
    }
}
