//! Setter methods for `ServerConfigBuilder`

use super::builder::ServerConfigBuilder;
use std::time::Duration;

impl ServerConfigBuilder {
    #[must_use]
    pub fn mevzuat_base_url(mut self, url: impl Into<String>) -> Self {
        self.mevzuat_base_url = url.into();
        self
    }

    #[must_use]
    pub fn bedesten_base_url(mut self, url: impl Into<String>) -> Self {
        self.bedesten_base_url = url.into();
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the time-to-live of all cache namespaces
    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the OCR credential
    ///
    /// With a key, PDF documents go through OCR; without one (or with an
    /// empty one) the PDF text layer is used instead.
    #[must_use]
    pub fn ocr_api_key(mut self, key: Option<String>) -> Self {
        self.ocr_api_key = key;
        self
    }

    #[must_use]
    pub fn ocr_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ocr_endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn ocr_model(mut self, model: impl Into<String>) -> Self {
        self.ocr_model = model.into();
        self
    }
}
