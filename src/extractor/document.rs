//! Document body extraction
//!
//! Isolates the legislation text from the surrounding page, converts it to
//! Markdown and runs the structural post-processing pass.

use super::markdown::finalize;
use crate::document_types::DocumentType;
use crate::errors::{MevzuatError, MevzuatResult};
use crate::types::{ContentOrigin, DocumentContent};
use htmd::HtmlToMarkdown;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Candidate containers for the legislation text, most specific first
const MAIN_REGION_SELECTORS: [&str; 5] = ["#mevzuat-metin", ".WordSection1", "main", "article", "body"];

/// Elements dropped before conversion
const BOILERPLATE_TAGS: [&str; 7] = ["script", "style", "nav", "header", "footer", "noscript", "iframe"];

static MAIN_REGIONS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    MAIN_REGION_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("BUG: hardcoded main region selector is invalid"))
        .collect()
});

fn converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .skip_tags(BOILERPLATE_TAGS.to_vec())
        .build()
}

/// Inner HTML of the first matching main region, or the whole input
fn main_region(html: &str) -> String {
    let document = Html::parse_document(html);
    for selector in MAIN_REGIONS.iter() {
        if let Some(el) = document.select(selector).next() {
            let inner = el.inner_html();
            if !inner.trim().is_empty() {
                return inner;
            }
        }
    }
    html.to_string()
}

/// Convert an HTML document body to Markdown
pub fn html_to_markdown(html: &str) -> MevzuatResult<String> {
    let region = main_region(html);
    converter()
        .convert(&region)
        .map_err(|e| MevzuatError::extraction("html_to_markdown", e.to_string()))
}

/// Build a [`DocumentContent`] from already converted Markdown
///
/// Fails with `ExtractionFailed` when nothing but whitespace is left.
pub fn build_document(
    document_id: &str,
    document_type: Option<DocumentType>,
    markdown: &str,
    origin: ContentOrigin,
) -> MevzuatResult<DocumentContent> {
    let (markdown, headings) = finalize(markdown);
    if markdown.trim().is_empty() {
        return Err(MevzuatError::extraction(
            "extract_document",
            "conversion produced no text",
        )
        .for_document(document_id));
    }

    tracing::debug!(
        document_id,
        ?origin,
        headings = headings.len(),
        bytes = markdown.len(),
        "Extracted document"
    );

    Ok(DocumentContent {
        document_id: document_id.to_string(),
        document_type,
        markdown,
        origin,
        headings,
    })
}

/// Extract a document served as HTML
pub fn extract_html_document(
    document_id: &str,
    document_type: Option<DocumentType>,
    html: &str,
) -> MevzuatResult<DocumentContent> {
    let markdown = html_to_markdown(html).map_err(|e| e.for_document(document_id))?;
    build_document(document_id, document_type, &markdown, ContentOrigin::Html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionLevel;

    #[test]
    fn keeps_only_the_main_region() {
        let html = r#"<html><body>
            <nav>Anasayfa | Mevzuat</nav>
            <div id="mevzuat-metin">
              <p><b>BİRİNCİ BÖLÜM</b></p>
              <p><b>Amaç</b></p>
              <p><b>MADDE 1 –</b> (1) Bu Kanunun amacı vergilendirmedir.</p>
            </div>
            <footer>Tüm hakları saklıdır</footer>
        </body></html>"#;

        let doc = extract_html_document("1.5.213", Some(DocumentType::Kanun), html).unwrap();
        assert!(!doc.markdown.contains("Anasayfa"));
        assert!(!doc.markdown.contains("hakları"));
        assert!(doc.markdown.contains("#### MADDE 1"));
        assert!(doc.markdown.contains("### BİRİNCİ BÖLÜM"));
        assert_eq!(doc.article_count(), 1);
        assert_eq!(doc.headings[0].level, SectionLevel::Chapter);
    }

    #[test]
    fn empty_body_fails_extraction() {
        let err = extract_html_document("1.5.1", None, "<html><body><script>x()</script></body></html>")
            .unwrap_err();
        assert!(matches!(err, MevzuatError::ExtractionFailed { .. }));
    }
}
