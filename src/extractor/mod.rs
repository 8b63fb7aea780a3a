//! Content extraction: search listings, document bodies and PDFs to Markdown

pub mod bedesten;
pub mod document;
pub mod markdown;
pub mod pdf;
pub mod search_results;

pub use bedesten::{
    DocumentPayload, parse_article_content_response, parse_article_tree, parse_content_response,
    parse_search_response,
};
pub use document::{build_document, extract_html_document, html_to_markdown};
pub use markdown::{finalize, normalize_whitespace, promote_structure};
pub use pdf::{PdfStrategy, bytes_look_like_pdf};
pub use search_results::{ListingContext, extract_search_results};
