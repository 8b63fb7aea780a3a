//! In-document keyword search
//!
//! Ranks the articles of an already extracted document against a keyword
//! expression. Nothing here touches the network.

pub mod scoring;
pub mod sections;

pub use scoring::{SectionScore, score_section, turkish_fold};
pub use sections::{PREAMBLE_LABEL, Section, WHOLE_DOCUMENT_LABEL, split_sections};

use crate::errors::MevzuatResult;
use crate::query::parse_keyword;
use crate::types::{ArticleMatch, DocumentContent, SearchWithinResult};
use std::cmp::Ordering;

/// Rank the sections of `document` that match `keyword`
///
/// Highest score first, ties in document order, at most `max_results`.
/// No match yields an empty result, not an error.
pub fn search_within(
    document: &DocumentContent,
    keyword: &str,
    case_sensitive: bool,
    max_results: usize,
) -> MevzuatResult<SearchWithinResult> {
    let query = parse_keyword(keyword)?;

    let mut scored: Vec<(Section, SectionScore)> = split_sections(&document.markdown)
        .into_iter()
        .filter_map(|section| {
            let score = score_section(&section, &query, case_sensitive)?;
            Some((section, score))
        })
        .collect();

    // sort_by is stable, so equal scores keep document order
    scored.sort_by(|(_, a), (_, b)| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let total_matches = scored.len();
    let matches = scored
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, (section, score))| ArticleMatch {
            rank: i + 1,
            section_label: section.label,
            article_number: section.article_number,
            title: section.title,
            score: score.score,
            match_count: score.match_count,
            snippet: score.snippet,
            content: section.text,
        })
        .collect();

    tracing::debug!(
        document_id = %document.document_id,
        keyword,
        total_matches,
        "In-document search complete"
    );

    Ok(SearchWithinResult {
        document_id: document.document_id.clone(),
        keyword: keyword.to_string(),
        total_matches,
        matches,
    })
}
