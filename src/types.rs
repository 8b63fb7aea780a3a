//! Value objects returned by the search and retrieval pipeline

use crate::document_types::DocumentType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Official Gazette publication metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GazetteInfo {
    /// Gazette issue number (`Resmî Gazete sayısı`)
    pub number: Option<String>,
    /// Publication date as shown by upstream (`DD.MM.YYYY` or ISO)
    pub date: Option<String>,
}

/// One matched legislation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResultItem {
    /// Opaque identifier accepted by the content and in-document search tools
    pub document_id: String,
    /// Legislation number (e.g. `5237`)
    pub mevzuat_no: Option<String>,
    pub title: String,
    /// Document type tag as reported by upstream
    pub document_type: String,
    pub gazette: GazetteInfo,
    /// Link to the document on the legislation site
    pub url: Option<String>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResultPage {
    pub items: Vec<SearchResultItem>,
    /// Total number of matches reported by upstream across all pages
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    /// Query expression actually sent upstream
    pub query_used: String,
}

impl SearchResultPage {
    /// Build a page, reconciling the total with the items actually returned
    ///
    /// The total is raised to cover every item up to and including this page
    /// so that `total_count >= (page_number - 1) * page_size + items.len()`.
    #[must_use]
    pub fn new(
        items: Vec<SearchResultItem>,
        total_count: u64,
        page_number: u32,
        page_size: u32,
        query_used: String,
    ) -> Self {
        let seen = u64::from(page_number.saturating_sub(1)) * u64::from(page_size)
            + items.len() as u64;
        let total_count = if items.is_empty() {
            total_count
        } else {
            total_count.max(seen)
        };
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(page_size))
        };

        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
            query_used,
        }
    }

    #[must_use]
    pub fn empty(page_number: u32, page_size: u32, query_used: String) -> Self {
        Self::new(Vec::new(), 0, page_number, page_size, query_used)
    }

    /// Check if further pages exist after this one
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.page_number) < self.total_pages
    }
}

/// How the Markdown of a document was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentOrigin {
    Html,
    PdfOcr,
    PdfTextLayer,
}

/// Structural level of a heading marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SectionLevel {
    /// `KISIM`
    Part,
    /// `BÖLÜM`
    Chapter,
    /// `MADDE`, `Ek Madde`, `Geçici Madde`
    Article,
}

impl SectionLevel {
    /// Markdown heading depth used for this level
    #[must_use]
    pub fn heading_depth(self) -> usize {
        match self {
            SectionLevel::Part => 2,
            SectionLevel::Chapter => 3,
            SectionLevel::Article => 4,
        }
    }
}

/// A structural marker found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadingMarker {
    pub level: SectionLevel,
    pub label: String,
}

/// Full normalised Markdown of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentContent {
    pub document_id: String,
    pub document_type: Option<DocumentType>,
    pub markdown: String,
    pub origin: ContentOrigin,
    /// Parts, chapters and articles in document order
    pub headings: Vec<HeadingMarker>,
}

impl DocumentContent {
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.headings
            .iter()
            .filter(|h| h.level == SectionLevel::Article)
            .count()
    }
}

/// One sub-section matched by an in-document keyword search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleMatch {
    /// 1-based rank after sorting by score
    pub rank: usize,
    /// Section label, e.g. `MADDE 12` or `Giriş`
    pub section_label: String,
    /// Article number when the section is an article
    pub article_number: Option<String>,
    /// Article title (`Amaç`, `Tanımlar`, ...) when present
    pub title: Option<String>,
    /// Relevance score, non-negative, higher is more relevant
    pub score: f64,
    /// Occurrences of the query terms in this section
    pub match_count: usize,
    /// Text around the first occurrence
    pub snippet: String,
    /// Full section text
    pub content: String,
}

/// Result of an in-document keyword search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchWithinResult {
    pub document_id: String,
    pub keyword: String,
    /// Number of matching sections before `max_results` truncation
    pub total_matches: usize,
    pub matches: Vec<ArticleMatch>,
}

/// One node of a document's article tree (its table of contents)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleNode {
    /// Id accepted by `get_mevzuat_article_content`
    pub article_id: String,
    /// Bedesten id of the document the node belongs to
    pub document_id: String,
    pub article_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<ArticleNode>,
}

/// Article tree of one document, top-level nodes first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleTree {
    pub document_id: String,
    pub nodes: Vec<ArticleNode>,
}

/// Text of a single article fetched through the bedesten API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleContent {
    pub article_id: String,
    pub document_id: String,
    pub markdown: String,
    pub origin: ContentOrigin,
}
