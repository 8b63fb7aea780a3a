//! Search and retrieval pipeline shared by every tool
//!
//! Each operation validates its input, consults the cache, and only then
//! goes upstream. Successful results are cached; failures never are.

use crate::cache::{MevzuatCaches, article_key, document_key};
use crate::config::ServerConfig;
use crate::document_types::{ContentSource, DocumentId, DocumentType};
use crate::errors::{MevzuatError, MevzuatResult};
use crate::extractor::{
    DocumentPayload, ListingContext, PdfStrategy, extract_html_document, extract_search_results,
    parse_article_content_response, parse_article_tree, parse_content_response,
    parse_search_response,
};
use crate::ocr::OcrClient;
use crate::query::{
    SearchParams, SearchWithinParams, UnifiedSearchParams, normalize, normalize_unified,
    parse_keyword, resolve_max_results,
};
use crate::scorer;
use crate::types::{
    ArticleContent, ArticleTree, DocumentContent, SearchResultPage, SearchWithinResult,
};
use crate::upstream::UpstreamClient;
use std::sync::Arc;
use tracing::{debug, info};

/// Cache scope of documents fetched through the bedesten API
const BEDESTEN_SCOPE: &str = "bedesten";

/// Cache scope of single articles fetched through the bedesten API
const ARTICLE_SCOPE: &str = "bedesten_article";

/// Pipeline state shared by all tool invocations
#[derive(Clone)]
pub struct MevzuatService {
    upstream: UpstreamClient,
    caches: MevzuatCaches,
    pdf: PdfStrategy,
}

impl MevzuatService {
    /// Build the service from configuration
    ///
    /// The PDF strategy is fixed here: OCR when a credential is configured,
    /// the PDF text layer otherwise.
    pub fn new(config: &ServerConfig) -> MevzuatResult<Self> {
        let upstream = UpstreamClient::new(config)?;
        let pdf = match config.ocr_api_key() {
            Some(key) => PdfStrategy::Ocr(OcrClient::new(
                upstream.http().clone(),
                config.ocr_endpoint(),
                config.ocr_model(),
                key,
            )),
            None => PdfStrategy::TextLayer,
        };
        info!(
            pdf_strategy = pdf.name(),
            cache_ttl_secs = config.cache_ttl().as_secs(),
            "Legislation service initialised"
        );
        Ok(Self::with_parts(
            upstream,
            MevzuatCaches::new(config.cache_ttl()),
            pdf,
        ))
    }

    #[must_use]
    pub fn with_parts(upstream: UpstreamClient, caches: MevzuatCaches, pdf: PdfStrategy) -> Self {
        Self {
            upstream,
            caches,
            pdf,
        }
    }

    #[must_use]
    pub fn caches(&self) -> &MevzuatCaches {
        &self.caches
    }

    #[must_use]
    pub fn pdf_strategy(&self) -> &PdfStrategy {
        &self.pdf
    }

    /// `search_<type>`: one page of documents of `doc_type`
    pub async fn search(
        &self,
        doc_type: DocumentType,
        params: &SearchParams,
    ) -> MevzuatResult<SearchResultPage> {
        let (query, fingerprint) = normalize(doc_type, params)?;
        if let Some(page) = self.caches.search.get(fingerprint.as_str()) {
            return Ok(page);
        }

        let html = self.upstream.search_listing(&query).await?;
        let query_used = query.expression.clone().unwrap_or_default();
        let page = extract_search_results(
            &html,
            &ListingContext {
                doc_type,
                page_number: query.page_number,
                page_size: query.page_size,
                query_used: &query_used,
                base_url: self.upstream.mevzuat_base(),
            },
        )?;

        info!(
            document_type = doc_type.slug(),
            query = %query_used,
            items = page.items.len(),
            total = page.total_count,
            "Search complete"
        );
        self.caches.search.put(fingerprint.as_str(), page.clone());
        Ok(page)
    }

    /// Full document of `doc_type`, served as HTML or PDF depending on the type
    pub async fn document(
        &self,
        doc_type: DocumentType,
        document_id: &str,
    ) -> MevzuatResult<Arc<DocumentContent>> {
        let id = DocumentId::parse(document_id, doc_type)?;
        self.fetch_document(doc_type, &id).await
    }

    async fn fetch_document(
        &self,
        doc_type: DocumentType,
        id: &DocumentId,
    ) -> MevzuatResult<Arc<DocumentContent>> {
        let id_str = id.to_string();
        let key = document_key(doc_type.slug(), &id_str);
        if let Some(doc) = self.caches.documents.get(&key) {
            return Ok(doc);
        }

        let content = match doc_type.content_source() {
            ContentSource::Html => {
                let html = self.upstream.document_html(id).await?;
                extract_html_document(&id_str, Some(doc_type), &html)?
            }
            ContentSource::Pdf => {
                let pdf = self.upstream.document_pdf(id).await?;
                self.pdf.extract_document(&id_str, Some(doc_type), pdf).await?
            }
        };

        let content = Arc::new(content);
        self.caches.documents.put(key, Arc::clone(&content));
        Ok(content)
    }

    /// `search_within_<type>`: rank the articles of one document
    pub async fn search_within(
        &self,
        doc_type: DocumentType,
        params: &SearchWithinParams,
    ) -> MevzuatResult<SearchWithinResult> {
        // All validation happens before the document is fetched
        parse_keyword(&params.keyword)?;
        let max_results = resolve_max_results(params.max_results)?;
        let id = DocumentId::parse(&params.document_id, doc_type)?;
        let id_str = id.to_string();

        let key = article_key(&id_str, &params.keyword, params.case_sensitive, max_results);
        if let Some(result) = self.caches.articles.get(&key) {
            return Ok(result);
        }

        let document = self.fetch_document(doc_type, &id).await?;
        let result = scorer::search_within(
            &document,
            &params.keyword,
            params.case_sensitive,
            max_results,
        )?;

        self.caches.articles.put(key, result.clone());
        Ok(result)
    }

    /// `search_mevzuat`: search across types through the bedesten API
    ///
    /// A multi-word phrase that finds nothing is retried as adjacent-word
    /// proximity queries until one of them finds something.
    pub async fn unified_search(
        &self,
        params: &UnifiedSearchParams,
    ) -> MevzuatResult<SearchResultPage> {
        let (query, fingerprint) = normalize_unified(params)?;
        if let Some(page) = self.caches.search.get(fingerprint.as_str()) {
            return Ok(page);
        }

        let query_used = query.expression.clone().unwrap_or_default();
        let body = self.upstream.bedesten_search(&query.bedesten_payload()).await?;
        let mut page =
            parse_search_response(&body, query.page_number, query.page_size, &query_used)?;

        if page.total_count == 0 {
            for fallback in query.proximity_fallbacks() {
                debug!(query = %fallback, "No results, trying proximity fallback");
                let retry = query.with_expression(fallback.clone());
                let body = self.upstream.bedesten_search(&retry.bedesten_payload()).await?;
                let candidate =
                    parse_search_response(&body, query.page_number, query.page_size, &fallback)?;
                if candidate.total_count > 0 {
                    info!(query = %fallback, total = candidate.total_count, "Proximity fallback matched");
                    page = candidate;
                    break;
                }
            }
        }

        info!(
            query = %page.query_used,
            items = page.items.len(),
            total = page.total_count,
            "Unified search complete"
        );
        self.caches.search.put(fingerprint.as_str(), page.clone());
        Ok(page)
    }

    /// `get_mevzuat_content`: full document by bedesten id
    pub async fn unified_content(&self, mevzuat_id: &str) -> MevzuatResult<Arc<DocumentContent>> {
        let mevzuat_id = bedesten_id("document_id", mevzuat_id)?;

        let key = document_key(BEDESTEN_SCOPE, mevzuat_id);
        if let Some(doc) = self.caches.documents.get(&key) {
            return Ok(doc);
        }

        let body = self.upstream.bedesten_document(mevzuat_id).await?;
        let payload = parse_content_response(&body).map_err(|e| e.for_document(mevzuat_id))?;
        let content = Arc::new(self.extract_payload(mevzuat_id, payload).await?);
        self.caches.documents.put(key, Arc::clone(&content));
        Ok(content)
    }

    /// `get_mevzuat_article_tree`: table of contents of a bedesten document
    ///
    /// Not cached; the tree is small and only read while navigating.
    pub async fn article_tree(&self, mevzuat_id: &str) -> MevzuatResult<ArticleTree> {
        let mevzuat_id = bedesten_id("document_id", mevzuat_id)?;
        let body = self.upstream.bedesten_article_tree(mevzuat_id).await?;
        let nodes = parse_article_tree(&body, mevzuat_id).map_err(|e| e.for_document(mevzuat_id))?;
        debug!(document_id = mevzuat_id, nodes = nodes.len(), "Fetched article tree");
        Ok(ArticleTree {
            document_id: mevzuat_id.to_string(),
            nodes,
        })
    }

    /// `get_mevzuat_article_content`: text of one article from the tree
    pub async fn article_content(
        &self,
        madde_id: &str,
        mevzuat_id: &str,
    ) -> MevzuatResult<ArticleContent> {
        let madde_id = bedesten_id("article_id", madde_id)?;
        let mevzuat_id = bedesten_id("document_id", mevzuat_id)?;

        let key = document_key(ARTICLE_SCOPE, &format!("{madde_id}:{mevzuat_id}"));
        let content = match self.caches.documents.get(&key) {
            Some(doc) => doc,
            None => {
                let body = self.upstream.bedesten_article(madde_id).await?;
                let payload = parse_article_content_response(&body)
                    .map_err(|e| e.for_document(madde_id))?;
                let doc = Arc::new(self.extract_payload(madde_id, payload).await?);
                self.caches.documents.put(key, Arc::clone(&doc));
                doc
            }
        };

        Ok(ArticleContent {
            article_id: madde_id.to_string(),
            document_id: mevzuat_id.to_string(),
            markdown: content.markdown.clone(),
            origin: content.origin,
        })
    }

    async fn extract_payload(
        &self,
        id: &str,
        payload: DocumentPayload,
    ) -> MevzuatResult<DocumentContent> {
        match payload {
            DocumentPayload::Html(html) => extract_html_document(id, None, &html),
            DocumentPayload::Pdf(pdf) => self.pdf.extract_document(id, None, pdf).await,
        }
    }
}

/// Bedesten ids are opaque but never contain more than `[A-Za-z0-9_-]`
fn bedesten_id<'a>(field: &str, id: &'a str) -> MevzuatResult<&'a str> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(MevzuatError::invalid_parameter(
            field,
            format!("'{id}' is not a valid legislation id"),
        ));
    }
    Ok(id)
}
