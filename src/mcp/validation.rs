//! Error context builder for tool failures
//!
//! Failures surfaced to the client state what was attempted, what went
//! wrong, and what the caller can try next. No internal trace is exposed.

use crate::errors::{ErrorKind, MevzuatError};

/// Builder for structured error messages with context and suggestions
#[derive(Debug, Clone)]
pub struct ErrorContext {
    operation: String,
    details: Vec<String>,
    suggestions: Vec<String>,
}

impl ErrorContext {
    /// Create new error context for an operation
    ///
    /// # Example
    /// ```
    /// use mevzuat_mcp::mcp::ErrorContext;
    /// let ctx = ErrorContext::new("search_kanun");
    /// ```
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            details: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add detail about what was checked or why it failed
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Add actionable suggestion for resolution
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Context for a pipeline failure inside `tool`
    #[must_use]
    pub fn for_error(tool: &str, error: &MevzuatError) -> Self {
        let ctx = Self::new(tool)
            .detail(error.to_string())
            .detail(format!("category: {}", kind_label(error.kind())));

        match error.kind() {
            ErrorKind::InvalidParameter => ctx
                .suggest("Check the parameter named above against the tool schema")
                .suggest("Dates use YYYY-MM-DD; document ids look like 1.5.5237"),
            ErrorKind::NotFound => ctx
                .suggest("Verify the document id with the matching search tool")
                .suggest("Repealed legislation may no longer be published"),
            ErrorKind::UpstreamError if error.is_transient() => ctx
                .suggest("The legislation service may be temporarily unavailable; retry shortly"),
            ErrorKind::UpstreamError => ctx
                .suggest("The upstream response was rejected or had an unexpected shape")
                .suggest("Narrow the query or try a different page"),
            ErrorKind::ExtractionFailed => ctx
                .suggest("The document was retrieved but its text could not be extracted")
                .suggest("Scanned PDF documents need an OCR credential (MISTRAL_API_KEY)"),
        }
    }

    /// Build formatted error message
    ///
    /// Format:
    /// ```text
    /// Operation failed: {operation}
    ///
    /// Details:
    ///   - {detail1}
    ///
    /// Suggestions:
    ///   - {suggestion1}
    /// ```
    #[must_use]
    pub fn build(self) -> String {
        let mut msg = format!("Operation failed: {}\n", self.operation);

        if !self.details.is_empty() {
            msg.push_str("\nDetails:\n");
            for detail in &self.details {
                msg.push_str(&format!("  - {detail}\n"));
            }
        }

        if !self.suggestions.is_empty() {
            msg.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                msg.push_str(&format!("  - {suggestion}\n"));
            }
        }

        msg
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidParameter => "InvalidParameter",
        ErrorKind::UpstreamError => "UpstreamError",
        ErrorKind::ExtractionFailed => "ExtractionFailed",
        ErrorKind::NotFound => "NotFound",
    }
}
