//! PDF to Markdown strategies
//!
//! The strategy is picked once at startup: OCR when a credential is
//! configured, the PDF text layer otherwise. The text layer keeps the words
//! but usually loses the bold article markers, so fewer headings survive.

use super::document::build_document;
use crate::document_types::DocumentType;
use crate::errors::{MevzuatError, MevzuatResult};
use crate::ocr::OcrClient;
use crate::types::{ContentOrigin, DocumentContent};

/// Magic bytes at the start of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

#[must_use]
pub fn bytes_look_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// How PDF documents are turned into text
#[derive(Debug, Clone)]
pub enum PdfStrategy {
    Ocr(OcrClient),
    TextLayer,
}

impl PdfStrategy {
    #[must_use]
    pub fn origin(&self) -> ContentOrigin {
        match self {
            PdfStrategy::Ocr(_) => ContentOrigin::PdfOcr,
            PdfStrategy::TextLayer => ContentOrigin::PdfTextLayer,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PdfStrategy::Ocr(_) => "ocr",
            PdfStrategy::TextLayer => "text_layer",
        }
    }

    /// Convert PDF bytes to raw Markdown or plain text
    pub async fn convert(&self, pdf: Vec<u8>) -> MevzuatResult<String> {
        if !bytes_look_like_pdf(&pdf) {
            return Err(MevzuatError::extraction(
                "pdf_to_markdown",
                "response is not a PDF",
            ));
        }

        match self {
            PdfStrategy::Ocr(client) => client.pdf_to_markdown(&pdf).await,
            PdfStrategy::TextLayer => tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&pdf)
            })
            .await
            .map_err(|e| MevzuatError::extraction("pdf_text_layer", e.to_string()))?
            .map_err(|e| MevzuatError::extraction("pdf_text_layer", e.to_string())),
        }
    }

    /// Convert a PDF document and run the structural pass over the result
    pub async fn extract_document(
        &self,
        document_id: &str,
        document_type: Option<DocumentType>,
        pdf: Vec<u8>,
    ) -> MevzuatResult<DocumentContent> {
        let raw = self
            .convert(pdf)
            .await
            .map_err(|e| e.for_document(document_id))?;
        build_document(document_id, document_type, &raw, self.origin())
    }
}
