//! Error types for legislation search and retrieval
//!
//! Every failure the pipeline can produce maps onto one of four categories:
//! invalid caller input, upstream failure, extraction failure, or an unknown
//! document. Invalid input is always detected before any network call.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type MevzuatResult<T> = Result<T, MevzuatError>;

/// Coarse error category exposed to tool callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    UpstreamError,
    ExtractionFailed,
    NotFound,
}

/// Error types for pipeline operations
#[derive(Debug, Error)]
pub enum MevzuatError {
    /// Malformed page, size, document type or keyword input
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    /// Date string not in `YYYY-MM-DD` form or not a calendar date
    #[error("Invalid date for '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDateFormat { field: String, value: String },

    /// Network failure, non-2xx response or unexpected response shape
    #[error("Upstream request failed during {operation}{}{}: {message}",
        document_suffix(.document_id), status_suffix(.status))]
    UpstreamError {
        operation: String,
        document_id: Option<String>,
        status: Option<u16>,
        message: String,
    },

    /// Content was received but could not be turned into the expected structure
    #[error("Extraction failed during {operation}{}: {reason}", document_suffix(.document_id))]
    ExtractionFailed {
        operation: String,
        document_id: Option<String>,
        reason: String,
    },

    /// Document identifier unknown to upstream
    #[error("Document not found: {document_id}")]
    NotFound { document_id: String },
}

fn document_suffix(document_id: &Option<String>) -> String {
    document_id
        .as_deref()
        .map(|id| format!(" for document {id}"))
        .unwrap_or_default()
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl MevzuatError {
    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MevzuatError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn upstream(operation: impl Into<String>, message: impl Into<String>) -> Self {
        MevzuatError::UpstreamError {
            operation: operation.into(),
            document_id: None,
            status: None,
            message: message.into(),
        }
    }

    pub fn extraction(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        MevzuatError::ExtractionFailed {
            operation: operation.into(),
            document_id: None,
            reason: reason.into(),
        }
    }

    /// Attach a document identifier to upstream and extraction failures
    #[must_use]
    pub fn for_document(mut self, id: &str) -> Self {
        match &mut self {
            MevzuatError::UpstreamError { document_id, .. }
            | MevzuatError::ExtractionFailed { document_id, .. } => {
                if document_id.is_none() {
                    *document_id = Some(id.to_string());
                }
            }
            _ => {}
        }
        self
    }

    /// Category used at the tool boundary
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MevzuatError::InvalidParameter { .. } | MevzuatError::InvalidDateFormat { .. } => {
                ErrorKind::InvalidParameter
            }
            MevzuatError::UpstreamError { .. } => ErrorKind::UpstreamError,
            MevzuatError::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            MevzuatError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Check if error is transient and the request may be retried
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            MevzuatError::UpstreamError { status, .. } => match status {
                Some(code) => *code >= 500 || *code == 429,
                None => true,
            },
            _ => false,
        }
    }
}

/// Retry policy for upstream requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Initial retry delay
    pub initial_delay: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum retry delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Calculate delay for given retry number (0-based)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (self.initial_delay.as_millis() as f64 * multiplier) as u64;
        let delay = Duration::from_millis(delay_ms);

        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}
