//! MCP tool facade
//!
//! Twenty-two tools over one table-driven server:
//!
//! - `search_<type>` and `search_within_<type>` for each of the nine
//!   legislation types (`kanun`, `khk`, `tuzuk`, `kurum_yonetmeligi`,
//!   `cb_kararnamesi`, `cb_karari`, `cb_yonetmeligi`, `cb_genelgesi`, `teblig`)
//! - `search_mevzuat` and `get_mevzuat_content`, which search and read across
//!   all types through the bedesten API
//! - `get_mevzuat_article_tree` and `get_mevzuat_article_content`, which
//!   navigate a bedesten document article by article
//!
//! ## Error Handling
//!
//! Invalid arguments are returned as MCP `invalid_params` errors. Upstream,
//! extraction and not-found failures come back as tool results flagged
//! `is_error`, with text built by [`ErrorContext`].

pub mod server;
pub mod tools;
pub mod validation;

pub use server::MevzuatServer;
pub use tools::{
    ARTICLE_CONTENT_TOOL, ARTICLE_TREE_TOOL, ArticleContentParams, ContentParams, ToolKind,
    UNIFIED_CONTENT_TOOL, UNIFIED_SEARCH_TOOL, all_tools, find_tool,
};
pub use validation::ErrorContext;
