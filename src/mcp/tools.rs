//! Tool table
//!
//! Every tool is a row: a name, the pipeline operation it maps onto, and the
//! schema of its arguments. The per-type tools are generated from
//! [`DocumentType::ALL`], so adding a type adds its two tools.

use crate::document_types::{ContentSource, DocumentType};
use crate::query::{SearchParams, SearchWithinParams, UnifiedSearchParams};
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

pub const UNIFIED_SEARCH_TOOL: &str = "search_mevzuat";
pub const UNIFIED_CONTENT_TOOL: &str = "get_mevzuat_content";
pub const ARTICLE_TREE_TOOL: &str = "get_mevzuat_article_tree";
pub const ARTICLE_CONTENT_TOOL: &str = "get_mevzuat_article_content";

/// Arguments of `get_mevzuat_content`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentParams {
    /// Legislation id returned by `search_mevzuat` (`mevzuatId`)
    #[serde(alias = "mevzuat_id")]
    pub document_id: String,
}

/// Arguments of `get_mevzuat_article_content`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleContentParams {
    /// Article id from `get_mevzuat_article_tree` (`maddeId`)
    #[serde(alias = "madde_id")]
    pub article_id: String,
    /// Legislation id the article belongs to (`mevzuatId`)
    #[serde(alias = "mevzuat_id")]
    pub document_id: String,
}

/// Pipeline operation behind a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Search(DocumentType),
    SearchWithin(DocumentType),
    UnifiedSearch,
    UnifiedContent,
    ArticleTree,
    ArticleContent,
}

impl ToolKind {
    #[must_use]
    pub fn name(self) -> String {
        match self {
            ToolKind::Search(t) => format!("search_{}", t.slug()),
            ToolKind::SearchWithin(t) => format!("search_within_{}", t.slug()),
            ToolKind::UnifiedSearch => UNIFIED_SEARCH_TOOL.to_string(),
            ToolKind::UnifiedContent => UNIFIED_CONTENT_TOOL.to_string(),
            ToolKind::ArticleTree => ARTICLE_TREE_TOOL.to_string(),
            ToolKind::ArticleContent => ARTICLE_CONTENT_TOOL.to_string(),
        }
    }

    #[must_use]
    pub fn description(self) -> String {
        match self {
            ToolKind::Search(t) => format!(
                "Search Turkish {name} on mevzuat.gov.tr.\n\n\
                 Returns one page of matching documents with their id, number, \
                 title and Official Gazette date/number. The phrase accepts \
                 AND, OR, NOT (uppercase, evaluated left to right) and \
                 double-quoted exact runs. Dates are YYYY-MM-DD.\n\n\
                 Use search_within_{slug} with a returned document_id to find \
                 the relevant articles.",
                name = t.display_name(),
                slug = t.slug(),
            ),
            ToolKind::SearchWithin(t) => {
                let pdf_note = match t.content_source() {
                    ContentSource::Pdf => " These documents are published as PDF and converted to text first.",
                    ContentSource::Html => "",
                };
                format!(
                    "Search inside one {name} document and return its articles \
                     ranked by relevance.\n\n\
                     The keyword uses the same AND/OR/NOT syntax as search_{slug}; \
                     quoted phrases weigh double. Each match carries the article \
                     label, title, score, a snippet and the full article text.{pdf_note}",
                    name = t.display_name(),
                    slug = t.slug(),
                )
            }
            ToolKind::UnifiedSearch => "Search all Turkish legislation through the bedesten API.\n\n\
                 Filter by phrase, legislation number, Official Gazette number and \
                 document types (KANUN, CB_KARARNAME, YONETMELIK, CB_YONETMELIK, \
                 CB_KARAR, CB_GENELGE, KHK, TUZUK, KKY, UY, TEBLIGLER, MULGA). \
                 Multi-word phrases that find nothing are retried as proximity \
                 queries. Use get_mevzuat_content with a returned document_id \
                 to read the full text."
                .to_string(),
            ToolKind::UnifiedContent => "Retrieve the full text of a legislation document found with \
                 search_mevzuat, as Markdown with part, chapter and article headings."
                .to_string(),
            ToolKind::ArticleTree => "List the article tree (table of contents) of a legislation \
                 document found with search_mevzuat.\n\n\
                 Each node carries an article_id, its number and title, and nested \
                 children. Pass an article_id to get_mevzuat_article_content to read \
                 one article instead of the whole document."
                .to_string(),
            ToolKind::ArticleContent => "Retrieve the text of a single article, as Markdown, using \
                 an article_id from get_mevzuat_article_tree."
                .to_string(),
        }
    }

    /// JSON schema of the tool's arguments
    #[must_use]
    pub fn input_schema(self) -> Arc<JsonObject> {
        match self {
            ToolKind::Search(_) => schema_object::<SearchParams>(),
            ToolKind::SearchWithin(_) => schema_object::<SearchWithinParams>(),
            ToolKind::UnifiedSearch => schema_object::<UnifiedSearchParams>(),
            ToolKind::UnifiedContent | ToolKind::ArticleTree => schema_object::<ContentParams>(),
            ToolKind::ArticleContent => schema_object::<ArticleContentParams>(),
        }
    }

    #[must_use]
    pub fn to_tool(self) -> Tool {
        Tool::new(self.name(), self.description(), self.input_schema())
    }
}

fn schema_object<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(obj)) => Arc::new(obj),
        _ => Arc::new(JsonObject::new()),
    }
}

static TOOL_TABLE: LazyLock<Vec<(String, ToolKind)>> = LazyLock::new(|| {
    let per_type = DocumentType::ALL
        .iter()
        .flat_map(|&t| [ToolKind::Search(t), ToolKind::SearchWithin(t)]);
    per_type
        .chain([
            ToolKind::UnifiedSearch,
            ToolKind::UnifiedContent,
            ToolKind::ArticleTree,
            ToolKind::ArticleContent,
        ])
        .map(|kind| (kind.name(), kind))
        .collect()
});

/// All tools in registration order
#[must_use]
pub fn all_tools() -> impl Iterator<Item = ToolKind> {
    TOOL_TABLE.iter().map(|(_, kind)| *kind)
}

/// Resolve a tool name
#[must_use]
pub fn find_tool(name: &str) -> Option<ToolKind> {
    TOOL_TABLE
        .iter()
        .find(|(tool_name, _)| tool_name == name)
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let names: Vec<String> = all_tools().map(ToolKind::name).collect();
        assert_eq!(names.len(), 22);
        let mut dedup = names.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 22);
    }

    #[test]
    fn names_resolve_back_to_kinds() {
        assert_eq!(find_tool("search_kanun"), Some(ToolKind::Search(DocumentType::Kanun)));
        assert_eq!(
            find_tool("search_within_cb_genelgesi"),
            Some(ToolKind::SearchWithin(DocumentType::CbGenelgesi))
        );
        assert_eq!(find_tool("search_mevzuat"), Some(ToolKind::UnifiedSearch));
        assert_eq!(find_tool(ARTICLE_TREE_TOOL), Some(ToolKind::ArticleTree));
        assert_eq!(find_tool("scrape_url"), None);
    }

    #[test]
    fn schemas_describe_arguments() {
        let schema = ToolKind::Search(DocumentType::Teblig).input_schema();
        let props = schema.get("properties").and_then(|p| p.as_object()).unwrap();
        assert!(props.contains_key("phrase"));
        assert!(props.contains_key("page_size"));

        let schema = ToolKind::UnifiedContent.input_schema();
        assert!(schema["properties"].get("document_id").is_some());

        let schema = ToolKind::ArticleContent.input_schema();
        assert!(schema["properties"].get("article_id").is_some());
        assert!(schema["properties"].get("document_id").is_some());
    }
}
