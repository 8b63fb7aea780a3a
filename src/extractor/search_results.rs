//! Search listing extraction for mevzuat.gov.tr
//!
//! A listing page holds one table row per matching document. Rows that lack
//! an identifier or a title are skipped with a warning; a page without the
//! results table at all is treated as an upstream format change.

use crate::document_types::{DEFAULT_TERTIP, DocumentId, DocumentType};
use crate::errors::{MevzuatError, MevzuatResult};
use crate::types::{GazetteInfo, SearchResultItem, SearchResultPage};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

// =============================================================================
// Selectors
// =============================================================================

/// Table holding the result rows
pub const RESULTS_TABLE_SELECTOR: &str = "table#mevzuat-results";

/// One row per document
pub const ROW_SELECTOR: &str = "tbody tr";

/// Title link; its query string carries `MevzuatNo`, `MevzuatTur`, `MevzuatTertip`
pub const LINK_SELECTOR: &str = "a[href]";

/// Official Gazette date cell
pub const GAZETTE_DATE_SELECTOR: &str = "td.rg-tarih";

/// Official Gazette issue number cell
pub const GAZETTE_NUMBER_SELECTOR: &str = "td.rg-sayi";

/// Element carrying the total match count as an attribute
pub const TOTAL_COUNT_SELECTOR: &str = "[data-total-count]";

static RESULTS_TABLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(RESULTS_TABLE_SELECTOR).expect("BUG: hardcoded results table selector is invalid")
});

static ROW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(ROW_SELECTOR).expect("BUG: hardcoded row selector is invalid")
});

static LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(LINK_SELECTOR).expect("BUG: hardcoded link selector is invalid")
});

static GAZETTE_DATE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(GAZETTE_DATE_SELECTOR).expect("BUG: hardcoded gazette date selector is invalid")
});

static GAZETTE_NUMBER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(GAZETTE_NUMBER_SELECTOR)
        .expect("BUG: hardcoded gazette number selector is invalid")
});

static TOTAL_COUNT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(TOTAL_COUNT_SELECTOR).expect("BUG: hardcoded total count selector is invalid")
});

/// `Toplam 1.234 kayıt`
static TOTAL_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Toplam\s*:?\s*([\d.,]+)").expect("BUG: hardcoded total count regex is invalid")
});

/// Context needed to turn a listing into a page
#[derive(Debug, Clone)]
pub struct ListingContext<'a> {
    pub doc_type: DocumentType,
    pub page_number: u32,
    pub page_size: u32,
    pub query_used: &'a str,
    /// Base used to resolve relative document links
    pub base_url: &'a Url,
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn parse_count(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Parse one listing row, returning the name of the missing field on failure
fn parse_row(
    row: ElementRef<'_>,
    ctx: &ListingContext<'_>,
) -> Result<SearchResultItem, &'static str> {
    let link = row.select(&LINK).next().ok_or("link")?;
    let title = non_empty(element_text(link)).ok_or("title")?;
    let href = link.value().attr("href").ok_or("link")?;
    let url = ctx.base_url.join(href).map_err(|_| "link")?;

    let mut mevzuat_no = None;
    let mut mevzuat_tur = None;
    let mut tertip = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "MevzuatNo" => mevzuat_no = non_empty(value.trim().to_string()),
            "MevzuatTur" => mevzuat_tur = value.trim().parse::<u32>().ok(),
            "MevzuatTertip" => tertip = value.trim().parse::<u32>().ok(),
            _ => {}
        }
    }
    let mevzuat_no = mevzuat_no.ok_or("MevzuatNo")?;
    let mevzuat_tur = mevzuat_tur.unwrap_or_else(|| ctx.doc_type.mevzuat_tur());
    let id = DocumentId::new(mevzuat_tur, tertip.unwrap_or(DEFAULT_TERTIP), mevzuat_no.clone());

    let document_type = DocumentType::from_mevzuat_tur(mevzuat_tur)
        .unwrap_or(ctx.doc_type)
        .display_name()
        .to_string();

    let gazette = GazetteInfo {
        number: row.select(&GAZETTE_NUMBER).next().map(element_text).and_then(non_empty),
        date: row.select(&GAZETTE_DATE).next().map(element_text).and_then(non_empty),
    };

    Ok(SearchResultItem {
        document_id: id.to_string(),
        mevzuat_no: Some(mevzuat_no),
        title,
        document_type,
        gazette,
        url: Some(url.to_string()),
    })
}

fn total_count(document: &Html) -> Option<u64> {
    if let Some(el) = document.select(&TOTAL_COUNT).next()
        && let Some(n) = el.value().attr("data-total-count").and_then(parse_count)
    {
        return Some(n);
    }

    let text = element_text(document.root_element());
    TOTAL_TEXT_RE
        .captures(&text)
        .and_then(|caps| parse_count(&caps[1]))
}

/// Extract one page of results from a mevzuat.gov.tr listing
pub fn extract_search_results(
    html: &str,
    ctx: &ListingContext<'_>,
) -> MevzuatResult<SearchResultPage> {
    let document = Html::parse_document(html);

    let table = document.select(&RESULTS_TABLE).next().ok_or_else(|| {
        MevzuatError::upstream(
            "search",
            format!("unexpected response shape: no '{RESULTS_TABLE_SELECTOR}' element"),
        )
    })?;

    let mut items = Vec::new();
    for (index, row) in table.select(&ROW).enumerate() {
        match parse_row(row, ctx) {
            Ok(item) => items.push(item),
            Err(missing) => {
                tracing::warn!(
                    row = index,
                    missing_field = missing,
                    document_type = ctx.doc_type.slug(),
                    "Skipping malformed search result row"
                );
            }
        }
    }

    // Upstream may render more rows than requested
    items.truncate(ctx.page_size as usize);

    let total = total_count(&document).unwrap_or(items.len() as u64);

    Ok(SearchResultPage::new(
        items,
        total,
        ctx.page_number,
        ctx.page_size,
        ctx.query_used.to_string(),
    ))
}
