//! Turkish legislation search and retrieval exposed as MCP tools
//!
//! The pipeline behind every tool is the same: normalise the request
//! ([`query`]), consult the [`cache`], fetch from mevzuat.gov.tr or the
//! bedesten API ([`upstream`]), turn the response into Markdown
//! ([`extractor`]) and, for in-document search, rank its articles
//! ([`scorer`]). [`service::MevzuatService`] wires these together and
//! [`mcp::MevzuatServer`] exposes them over the Model Context Protocol.

pub mod cache;
pub mod config;
pub mod document_types;
pub mod errors;
pub mod extractor;
pub mod mcp;
pub mod ocr;
pub mod query;
pub mod scorer;
pub mod service;
pub mod types;
pub mod upstream;

pub use cache::{Clock, ManualClock, MevzuatCaches, SystemClock, TtlCache};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use document_types::{ContentSource, DocumentId, DocumentType};
pub use errors::{ErrorKind, MevzuatError, MevzuatResult};
pub use mcp::MevzuatServer;
pub use query::{SearchParams, SearchWithinParams, UnifiedSearchParams};
pub use service::MevzuatService;
pub use types::{
    ArticleContent, ArticleMatch, ArticleNode, ArticleTree, ContentOrigin, DocumentContent, GazetteInfo, SearchResultItem,
    SearchResultPage, SearchWithinResult,
};
