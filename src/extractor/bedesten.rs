//! Decoding of bedesten.adalet.gov.tr JSON responses
//!
//! Every response is wrapped in `{ "metadata": { "FMTY": ..., "FMTE": ... }, "data": ... }`.
//! Anything but `FMTY == "SUCCESS"` is an upstream failure carrying `FMTE`.

use crate::errors::{MevzuatError, MevzuatResult};
use crate::types::{ArticleNode, GazetteInfo, SearchResultItem, SearchResultPage};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Prefix of a base64-encoded PDF (`%PDF-`)
const BASE64_PDF_PREFIX: &str = "JVBERi0";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(rename = "FMTY", default)]
    fmty: Option<String>,
    #[serde(rename = "FMTE", default)]
    fmte: Option<String>,
}

/// Check the envelope status and decode its `data` member
pub fn unwrap_envelope<T: DeserializeOwned>(operation: &str, body: &[u8]) -> MevzuatResult<T> {
    let envelope: Envelope = serde_json::from_slice(body).map_err(|e| {
        MevzuatError::upstream(operation, format!("unexpected response shape: {e}"))
    })?;

    let metadata = envelope.metadata.unwrap_or(Metadata {
        fmty: None,
        fmte: None,
    });
    if metadata.fmty.as_deref() != Some("SUCCESS") {
        return Err(MevzuatError::upstream(
            operation,
            metadata
                .fmte
                .unwrap_or_else(|| "upstream reported an unspecified error".to_string()),
        ));
    }

    let data = envelope
        .data
        .ok_or_else(|| MevzuatError::upstream(operation, "response has no data"))?;
    serde_json::from_value(data)
        .map_err(|e| MevzuatError::upstream(operation, format!("unexpected data shape: {e}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    #[serde(default)]
    pub total: u64,
    /// Rows are decoded one by one so a malformed row cannot fail the page
    #[serde(default)]
    pub mevzuat_list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct BedestenType {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedestenDocument {
    #[serde(default)]
    pub mevzuat_id: Option<Value>,
    /// Number or string depending on the endpoint version
    #[serde(default)]
    pub mevzuat_no: Option<Value>,
    #[serde(default)]
    pub mevzuat_adi: Option<String>,
    #[serde(default)]
    pub mevzuat_tur: Option<BedestenType>,
    #[serde(default)]
    pub resmi_gazete_tarihi: Option<String>,
    /// Number or string, like `mevzuat_no`
    #[serde(default)]
    pub resmi_gazete_sayisi: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl BedestenDocument {
    fn into_item(self) -> Option<SearchResultItem> {
        let document_id = self.mevzuat_id.as_ref().and_then(scalar_to_string)?;
        let title = self.mevzuat_adi.filter(|t| !t.trim().is_empty())?;
        let document_type = self
            .mevzuat_tur
            .and_then(|t| t.description.or(t.name))
            .unwrap_or_default();

        Some(SearchResultItem {
            document_id,
            mevzuat_no: self.mevzuat_no.as_ref().and_then(scalar_to_string),
            title: title.trim().to_string(),
            document_type,
            gazette: GazetteInfo {
                number: self.resmi_gazete_sayisi.as_ref().and_then(scalar_to_string),
                // ISO timestamp; the date part is enough
                date: self
                    .resmi_gazete_tarihi
                    .map(|d| d.split('T').next().unwrap_or_default().to_string()),
            },
            url: self.url,
        })
    }
}

/// Decode a `searchDocuments` response into a page
pub fn parse_search_response(
    body: &[u8],
    page_number: u32,
    page_size: u32,
    query_used: &str,
) -> MevzuatResult<SearchResultPage> {
    let data: SearchData = unwrap_envelope("search_mevzuat", body)?;

    let mut items = Vec::with_capacity(data.mevzuat_list.len());
    for (index, row) in data.mevzuat_list.into_iter().enumerate() {
        let item = serde_json::from_value::<BedestenDocument>(row)
            .ok()
            .and_then(BedestenDocument::into_item);
        match item {
            Some(item) => items.push(item),
            None => tracing::warn!(row = index, "Skipping malformed bedesten result row"),
        }
    }

    Ok(SearchResultPage::new(
        items,
        data.total,
        page_number,
        page_size,
        query_used.to_string(),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentData {
    #[serde(default)]
    content: String,
}

/// Decoded body of a `getDocumentContent` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPayload {
    Html(String),
    Pdf(Vec<u8>),
}

/// Decode a `getDocumentContent` response for a full document
pub fn parse_content_response(body: &[u8]) -> MevzuatResult<DocumentPayload> {
    decode_content("get_mevzuat_content", body)
}

/// Decode a `getDocumentContent` response for a single article
pub fn parse_article_content_response(body: &[u8]) -> MevzuatResult<DocumentPayload> {
    decode_content("get_mevzuat_article_content", body)
}

fn decode_content(operation: &str, body: &[u8]) -> MevzuatResult<DocumentPayload> {
    let data: ContentData = unwrap_envelope(operation, body)?;
    let encoded = data.content.trim();
    if encoded.is_empty() {
        return Err(MevzuatError::extraction(operation, "document content is empty"));
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| MevzuatError::extraction(operation, format!("invalid base64: {e}")))?;

    if encoded.starts_with(BASE64_PDF_PREFIX) {
        return Ok(DocumentPayload::Pdf(bytes));
    }

    String::from_utf8(bytes)
        .map(DocumentPayload::Html)
        .map_err(|e| MevzuatError::extraction(operation, format!("invalid UTF-8: {e}")))
}

#[derive(Debug, Default, Deserialize)]
struct TreeRoot {
    #[serde(default)]
    children: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticleNode {
    #[serde(default)]
    madde_id: Option<Value>,
    #[serde(default)]
    madde_no: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mevzuat_id: Option<Value>,
    #[serde(default)]
    children: Vec<Value>,
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn decode_nodes(rows: Vec<Value>, document_id: &str) -> Vec<ArticleNode> {
    let mut nodes = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let Some(raw) = serde_json::from_value::<RawArticleNode>(row).ok() else {
            tracing::warn!(row = index, document_id, "Skipping malformed article tree node");
            continue;
        };
        let Some(article_id) = raw.madde_id.as_ref().and_then(scalar_to_string) else {
            tracing::warn!(row = index, document_id, "Skipping article tree node without id");
            continue;
        };
        let node_document = raw
            .mevzuat_id
            .as_ref()
            .and_then(scalar_to_string)
            .unwrap_or_else(|| document_id.to_string());

        nodes.push(ArticleNode {
            children: decode_nodes(raw.children, &node_document),
            article_id,
            document_id: node_document,
            article_number: raw.madde_no.as_ref().and_then(scalar_to_string),
            title: non_blank(raw.title),
            description: non_blank(raw.description),
        });
    }
    nodes
}

/// Decode a `mevzuatMaddeTree` response into the top-level nodes
///
/// The upstream root node only groups its children and is not returned.
pub fn parse_article_tree(body: &[u8], document_id: &str) -> MevzuatResult<Vec<ArticleNode>> {
    let root: Option<TreeRoot> = unwrap_envelope("get_mevzuat_article_tree", body)?;
    Ok(decode_nodes(root.unwrap_or_default().children, document_id))
}
