//! OCR client for scanned legislation PDFs
//!
//! Talks to the Mistral OCR HTTP API: the PDF is posted inline as a base64
//! data URI and the per-page Markdown of the response is joined in page order.

use crate::errors::{MevzuatError, MevzuatResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.mistral.ai/v1/ocr";
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";

#[derive(Serialize)]
struct OcrRequest<'a> {
    model: &'a str,
    document: OcrDocument,
    include_image_base64: bool,
}

#[derive(Serialize)]
struct OcrDocument {
    #[serde(rename = "type")]
    kind: &'static str,
    document_url: String,
}

#[derive(Deserialize)]
struct OcrResponse {
    #[serde(default)]
    pages: Vec<OcrPage>,
}

#[derive(Deserialize)]
struct OcrPage {
    #[serde(default)]
    index: usize,
    #[serde(default)]
    markdown: String,
}

/// Client for the OCR service
#[derive(Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for OcrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OcrClient {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Run OCR over a PDF and return its Markdown
    pub async fn pdf_to_markdown(&self, pdf: &[u8]) -> MevzuatResult<String> {
        let request = OcrRequest {
            model: &self.model,
            document: OcrDocument {
                kind: "document_url",
                document_url: format!("data:application/pdf;base64,{}", STANDARD.encode(pdf)),
            },
            include_image_base64: false,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MevzuatError::upstream("ocr", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MevzuatError::UpstreamError {
                operation: "ocr".to_string(),
                document_id: None,
                status: Some(status.as_u16()),
                message: body.chars().take(200).collect(),
            });
        }

        let mut parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| MevzuatError::upstream("ocr", format!("invalid response: {e}")))?;

        parsed.pages.sort_by_key(|p| p.index);
        let markdown = parsed
            .pages
            .iter()
            .map(|p| p.markdown.trim())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        if markdown.is_empty() {
            return Err(MevzuatError::extraction("ocr", "OCR returned no text"));
        }
        Ok(markdown)
    }
}
