//! Upstream HTTP client with retry for transient failures
//!
//! Only connection-level failures, 5xx and 429 responses are retried. A 404
//! for a document request is reported as `NotFound`; every other non-2xx
//! status is an `UpstreamError` carrying the status code.

use crate::config::ServerConfig;
use crate::document_types::DocumentId;
use crate::errors::{MevzuatError, MevzuatResult, RetryConfig};
use crate::query::SearchQuery;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

/// Search listing page on mevzuat.gov.tr
pub const SEARCH_PATH: &str = "/aramasonuclari";

/// Document body rendered for embedding
pub const DOCUMENT_PATH: &str = "/anasayfa/MevzuatFihristDetayIframe";

/// Directory of PDF renditions (`/MevzuatMetin/{tur}.{tertip}.{no}.pdf`)
pub const PDF_PATH: &str = "/MevzuatMetin";

/// Value of the `AdaletApplicationName` header and `applicationName` field
pub const BEDESTEN_APPLICATION_NAME: &str = "UyapMevzuat";

const BEDESTEN_ORIGIN: &str = "https://mevzuat.adalet.gov.tr";

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    mevzuat_base: Url,
    bedesten_base: String,
    retry: RetryConfig,
}

fn transport_error(operation: &str, err: &reqwest::Error) -> MevzuatError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    MevzuatError::upstream(operation, message)
}

impl UpstreamClient {
    pub fn new(config: &ServerConfig) -> MevzuatResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| MevzuatError::upstream("client_init", e.to_string()))?;

        let mevzuat_base = Url::parse(config.mevzuat_base_url()).map_err(|e| {
            MevzuatError::invalid_parameter("mevzuat_base_url", e.to_string())
        })?;

        Ok(Self {
            http,
            mevzuat_base,
            bedesten_base: config.bedesten_base_url().trim_end_matches('/').to_string(),
            retry: config.retry_config(),
        })
    }

    /// Underlying HTTP client, shared with the OCR client
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    #[must_use]
    pub fn mevzuat_base(&self) -> &Url {
        &self.mevzuat_base
    }

    fn mevzuat_url(&self, path: &str) -> String {
        format!("{}{path}", self.mevzuat_base.as_str().trim_end_matches('/'))
    }

    /// Send a request, retrying transient failures with exponential backoff
    async fn send_with_retry<F>(
        &self,
        operation: &str,
        document_id: Option<&str>,
        build: F,
    ) -> MevzuatResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let result = match build().send().await {
                Ok(response) => self.check_status(operation, document_id, response).await,
                Err(e) => Err(transport_error(operation, &e)),
            };

            let err = match result {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };
            let err = match document_id {
                Some(id) => err.for_document(id),
                None => err,
            };

            if !err.is_transient() || attempt >= self.retry.max_retries {
                return Err(err);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                operation,
                attempt = attempt + 1,
                max_retries = self.retry.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient upstream failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn check_status(
        &self,
        operation: &str,
        document_id: Option<&str>,
        response: Response,
    ) -> MevzuatResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND
            && let Some(id) = document_id
        {
            return Err(MevzuatError::NotFound {
                document_id: id.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(MevzuatError::UpstreamError {
            operation: operation.to_string(),
            document_id: None,
            status: Some(status.as_u16()),
            message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }

    /// Fetch a search listing page for a per-type query
    pub async fn search_listing(&self, query: &SearchQuery) -> MevzuatResult<String> {
        let url = self.mevzuat_url(SEARCH_PATH);
        let params = query.site_params();
        debug!(url = %url, ?params, "Fetching search listing");

        let response = self
            .send_with_retry("search", None, || self.http.get(&url).query(&params))
            .await?;
        response
            .text()
            .await
            .map_err(|e| transport_error("search", &e))
    }

    /// Fetch the HTML body of a document
    pub async fn document_html(&self, id: &DocumentId) -> MevzuatResult<String> {
        let url = self.mevzuat_url(DOCUMENT_PATH);
        let id_str = id.to_string();
        let params = [
            ("MevzuatTur", id.mevzuat_tur.to_string()),
            ("MevzuatNo", id.mevzuat_no.clone()),
            ("MevzuatTertip", id.tertip.to_string()),
        ];
        debug!(document_id = %id_str, "Fetching document HTML");

        let response = self
            .send_with_retry("fetch_document", Some(&id_str), || {
                self.http.get(&url).query(&params)
            })
            .await?;
        response
            .text()
            .await
            .map_err(|e| transport_error("fetch_document", &e).for_document(&id_str))
    }

    /// Fetch the PDF rendition of a document
    pub async fn document_pdf(&self, id: &DocumentId) -> MevzuatResult<Vec<u8>> {
        let url = self.mevzuat_url(&format!("{PDF_PATH}/{}", id.pdf_file_name()));
        let id_str = id.to_string();
        debug!(document_id = %id_str, url = %url, "Fetching document PDF");

        let response = self
            .send_with_retry("fetch_pdf", Some(&id_str), || self.http.get(&url))
            .await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| transport_error("fetch_pdf", &e).for_document(&id_str))
    }

    fn bedesten_post(&self, endpoint: &str, body: &Value) -> RequestBuilder {
        self.http
            .post(format!("{}/{endpoint}", self.bedesten_base))
            .header("AdaletApplicationName", BEDESTEN_APPLICATION_NAME)
            .header("Origin", BEDESTEN_ORIGIN)
            .header("Referer", format!("{BEDESTEN_ORIGIN}/"))
            .json(body)
    }

    /// Run a unified search; returns the raw JSON envelope
    pub async fn bedesten_search(&self, payload: &Value) -> MevzuatResult<Vec<u8>> {
        let response = self
            .send_with_retry("search_mevzuat", None, || {
                self.bedesten_post("searchDocuments", payload)
            })
            .await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| transport_error("search_mevzuat", &e))
    }

    async fn bedesten_content(
        &self,
        operation: &str,
        id: &str,
        document_type: &str,
    ) -> MevzuatResult<Vec<u8>> {
        let payload = json!({
            "data": { "id": id, "documentType": document_type },
            "applicationName": BEDESTEN_APPLICATION_NAME,
        });
        let response = self
            .send_with_retry(operation, Some(id), || {
                self.bedesten_post("getDocumentContent", &payload)
            })
            .await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| transport_error(operation, &e).for_document(id))
    }

    /// Fetch a full document by its bedesten id; returns the raw JSON envelope
    pub async fn bedesten_document(&self, mevzuat_id: &str) -> MevzuatResult<Vec<u8>> {
        self.bedesten_content("get_mevzuat_content", mevzuat_id, "MEVZUAT")
            .await
    }

    /// Fetch a single article by its bedesten article id
    pub async fn bedesten_article(&self, madde_id: &str) -> MevzuatResult<Vec<u8>> {
        self.bedesten_content("get_mevzuat_article_content", madde_id, "MADDE")
            .await
    }

    /// Fetch the article tree of a document; returns the raw JSON envelope
    pub async fn bedesten_article_tree(&self, mevzuat_id: &str) -> MevzuatResult<Vec<u8>> {
        let payload = json!({
            "data": { "mevzuatId": mevzuat_id },
            "applicationName": BEDESTEN_APPLICATION_NAME,
        });
        debug!(document_id = mevzuat_id, "Fetching article tree");
        let response = self
            .send_with_retry("get_mevzuat_article_tree", Some(mevzuat_id), || {
                self.bedesten_post("mevzuatMaddeTree", &payload)
            })
            .await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| transport_error("get_mevzuat_article_tree", &e).for_document(mevzuat_id))
    }
}
