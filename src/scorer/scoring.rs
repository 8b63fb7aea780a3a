//! Keyword matching and relevance scoring over a single section

use super::sections::Section;
use crate::query::{BooleanExpr, Term};

/// Weight of a double-quoted phrase occurrence
pub const QUOTED_WEIGHT: usize = 2;

/// Weight of a bare term occurrence
pub const TERM_WEIGHT: usize = 1;

/// Characters of context on each side of a snippet
pub const SNIPPET_CONTEXT_CHARS: usize = 100;

/// Lowercase with Turkish dotted/dotless I rules, one char per char
///
/// Keeping the char count unchanged lets offsets found in the folded text
/// be used directly on the original.
#[must_use]
pub fn turkish_fold(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'I' => 'ı',
            'İ' => 'i',
            c => c.to_lowercase().next().unwrap_or(c),
        })
        .collect()
}

/// Section text prepared for repeated term lookups
pub struct PreparedText<'a> {
    original: &'a str,
    haystack: String,
    case_sensitive: bool,
}

impl<'a> PreparedText<'a> {
    #[must_use]
    pub fn new(original: &'a str, case_sensitive: bool) -> Self {
        let haystack = if case_sensitive {
            original.to_string()
        } else {
            turkish_fold(original)
        };
        Self {
            original,
            haystack,
            case_sensitive,
        }
    }

    fn needle(&self, term: &Term) -> String {
        if self.case_sensitive {
            term.text.clone()
        } else {
            turkish_fold(&term.text)
        }
    }

    #[must_use]
    pub fn contains(&self, term: &Term) -> bool {
        let needle = self.needle(term);
        !needle.is_empty() && self.haystack.contains(&needle)
    }

    /// Non-overlapping occurrences and the char offset of the first one
    #[must_use]
    pub fn occurrences(&self, term: &Term) -> (usize, Option<usize>) {
        let needle = self.needle(term);
        if needle.is_empty() {
            return (0, None);
        }
        let mut count = 0;
        let mut first = None;
        for (byte_idx, _) in self.haystack.match_indices(&needle) {
            if first.is_none() {
                first = Some(self.haystack[..byte_idx].chars().count());
            }
            count += 1;
        }
        (count, first)
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.haystack.chars().count()
    }

    /// Whitespace-collapsed excerpt of the original text around `offset`
    #[must_use]
    pub fn snippet(&self, offset: usize, match_chars: usize) -> String {
        let chars: Vec<char> = self.original.chars().collect();
        let start = offset.saturating_sub(SNIPPET_CONTEXT_CHARS);
        let end = (offset + match_chars + SNIPPET_CONTEXT_CHARS).min(chars.len());
        let body: String = chars[start.min(end)..end].iter().collect();
        let body = body.split_whitespace().collect::<Vec<_>>().join(" ");

        let mut out = String::with_capacity(body.len() + 6);
        if start > 0 {
            out.push_str("...");
        }
        out.push_str(&body);
        if end < chars.len() {
            out.push_str("...");
        }
        out
    }
}

/// Score of one matching section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionScore {
    pub score: f64,
    pub match_count: usize,
    pub snippet: String,
}

/// Evaluate `query` against a section and score it
///
/// Returns `None` when the section does not satisfy the expression. The
/// score is the weighted occurrence count of positive terms plus a position
/// bonus in `(0, 1)` that favours earlier first matches, so it is strictly
/// increasing in the occurrence count.
#[must_use]
pub fn score_section(section: &Section, query: &BooleanExpr, case_sensitive: bool) -> Option<SectionScore> {
    let text = PreparedText::new(&section.text, case_sensitive);
    if !query.evaluate(&|term: &Term| text.contains(term)) {
        return None;
    }

    let mut weighted = 0usize;
    let mut match_count = 0usize;
    let mut first: Option<(usize, usize)> = None;

    for term in query.positive_terms() {
        let (count, offset) = text.occurrences(term);
        if count == 0 {
            continue;
        }
        let weight = if term.quoted { QUOTED_WEIGHT } else { TERM_WEIGHT };
        weighted += count * weight;
        match_count += count;
        if let Some(offset) = offset
            && first.is_none_or(|(best, _)| offset < best)
        {
            first = Some((offset, term.text.chars().count()));
        }
    }

    let (offset, match_chars) = first?;
    let len = text.char_len();
    let position_bonus = 1.0 - (offset + 1) as f64 / (len + 1) as f64;

    Some(SectionScore {
        score: weighted as f64 + position_bonus,
        match_count,
        snippet: text.snippet(offset, match_chars),
    })
}
