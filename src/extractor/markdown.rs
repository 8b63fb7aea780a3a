//! Markdown post-processing for legislation text
//!
//! HTML conversion and PDF OCR both produce flat Markdown in which part,
//! chapter and article boundaries are at best bold text. These passes turn
//! those boundaries into real headings so that downstream consumers (and the
//! in-document scorer) can rely on them.

use crate::types::{HeadingMarker, SectionLevel};
use regex::Regex;
use std::sync::LazyLock;

/// Longest line still considered a part or chapter heading
const MAX_DIVISION_LINE_LEN: usize = 120;

/// Longest same-line text still read as an article title (`Madde 1- Amaç`)
const MAX_INLINE_TITLE_LEN: usize = 60;

/// `BİRİNCİ KISIM`, `İKİNCİ BÖLÜM - Genel Hükümler`
static DIVISION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\p{Lu}+\s+){0,3}(KISIM|BÖLÜM)(?:\s*[-–—:].*)?$")
        .expect("BUG: hardcoded division regex is invalid")
});

/// `MADDE 1 –`, `**Madde 12**-`, `Geçici Madde 3`, `EK MADDE 2/A`
///
/// The number must be followed by a dash or end the line, so running text
/// such as `Madde 5 uyarınca` is left alone.
static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<label>(?:(?:Ek|EK|Geçici|GEÇİCİ)\s+)?(?:MADDE|Madde)\s+(?P<num>\d+(?:/[A-Za-zÇĞİÖŞÜ])?))\s*(?:\*\*)?\s*(?:[-–—]\s*(?:\*\*)?\s*(?P<rest>.*)|$)",
    )
    .expect("BUG: hardcoded article regex is invalid")
});

static HEADING_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{1,6}\s+").expect("BUG: hardcoded heading prefix regex is invalid")
});

/// Recognised article heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleHeading {
    /// Normalised label, e.g. `MADDE 12`
    pub label: String,
    pub number: String,
    /// Text that followed the heading on the same line
    pub rest: String,
}

impl ArticleHeading {
    /// Same-line text when it is a short title rather than the article body
    ///
    /// A title starts with a capital letter and has no sentence punctuation
    /// or paragraph number, e.g. `Amaç` or `Vergiyi doğuran olay`.
    #[must_use]
    pub fn inline_title(&self) -> Option<&str> {
        let rest = strip_trailing_emphasis(self.rest.trim_start_matches("**")).trim();
        let first = rest.chars().next()?;
        if !first.is_uppercase()
            || rest.chars().count() > MAX_INLINE_TITLE_LEN
            || rest.contains(['.', ',', ';', ':', '(', ')'])
        {
            return None;
        }
        Some(rest)
    }
}

/// Remove leading ATX markers and wrapping emphasis from a line
fn strip_decoration(line: &str) -> &str {
    let line = line.trim();
    let line = match HEADING_PREFIX_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    let line = line.trim_start_matches("**").trim_start_matches("__");
    line.trim()
}

fn strip_trailing_emphasis(s: &str) -> &str {
    s.trim_end_matches("**").trim_end_matches("__").trim_end()
}

/// Check whether a line is a `KISIM` or `BÖLÜM` heading
pub fn parse_division(line: &str) -> Option<(SectionLevel, String)> {
    let text = strip_trailing_emphasis(strip_decoration(line));
    if text.is_empty() || text.chars().count() > MAX_DIVISION_LINE_LEN {
        return None;
    }
    let caps = DIVISION_RE.captures(text)?;
    let level = match &caps[1] {
        "KISIM" => SectionLevel::Part,
        _ => SectionLevel::Chapter,
    };
    Some((level, text.to_string()))
}

/// Check whether a line starts an article
pub fn parse_article_heading(line: &str) -> Option<ArticleHeading> {
    let text = strip_decoration(line);
    let caps = ARTICLE_RE.captures(text)?;
    let label = caps["label"].split_whitespace().collect::<Vec<_>>().join(" ");
    let rest = caps
        .name("rest")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(ArticleHeading {
        label,
        number: caps["num"].to_string(),
        rest,
    })
}

/// Text of a line consisting only of bold text, e.g. `**Amaç**`
#[must_use]
pub fn bold_only_text(line: &str) -> Option<&str> {
    let line = line.trim();
    let inner = line
        .strip_prefix("**")
        .and_then(|l| l.strip_suffix("**"))
        .or_else(|| line.strip_prefix("__").and_then(|l| l.strip_suffix("__")))?;
    let inner = inner.trim();
    if inner.is_empty() || inner.contains("**") {
        None
    } else {
        Some(inner)
    }
}

/// Promote part, chapter and article lines to `##`, `###` and `####`
///
/// Returns the rewritten Markdown and the markers found, in document order.
#[must_use]
pub fn promote_structure(markdown: &str) -> (String, Vec<HeadingMarker>) {
    let mut out: Vec<String> = Vec::with_capacity(markdown.lines().count());
    let mut headings = Vec::new();

    let mut push_heading =
        |out: &mut Vec<String>, level: SectionLevel, label: String, text: &str| {
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push(String::new());
            }
            out.push(format!("{} {text}", "#".repeat(level.heading_depth())));
            out.push(String::new());
            headings.push(HeadingMarker { level, label });
        };

    for line in markdown.lines() {
        // Table rows and list items are never structure
        let trimmed = line.trim_start();
        if trimmed.starts_with('|') || trimmed.starts_with("- ") || trimmed.starts_with("* ") {
            out.push(line.to_string());
            continue;
        }

        if let Some(article) = parse_article_heading(line) {
            match article.inline_title() {
                // Kept on the heading line so the title stays with its article
                Some(title) => {
                    let text = format!("{} - {title}", article.label);
                    push_heading(&mut out, SectionLevel::Article, article.label.clone(), &text);
                }
                None => {
                    let text = article.label.clone();
                    push_heading(&mut out, SectionLevel::Article, article.label.clone(), &text);
                    if !article.rest.is_empty() {
                        out.push(article.rest.clone());
                    }
                }
            }
        } else if let Some((level, label)) = parse_division(line) {
            let text = label.clone();
            push_heading(&mut out, level, label, &text);
        } else {
            out.push(line.to_string());
        }
    }

    (out.join("\n"), headings)
}

/// Trim trailing spaces and collapse blank-line runs to a single blank line
#[must_use]
pub fn normalize_whitespace(markdown: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut prev_blank = true;

    for line in markdown.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if !prev_blank {
                out.push("");
            }
            prev_blank = true;
        } else {
            out.push(line);
            prev_blank = false;
        }
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Full post-processing pass applied to every converted document
#[must_use]
pub fn finalize(markdown: &str) -> (String, Vec<HeadingMarker>) {
    let (promoted, headings) = promote_structure(markdown);
    (normalize_whitespace(&promoted), headings)
}
