//! Splitting a document into article sections

use crate::extractor::markdown::{bold_only_text, parse_article_heading, parse_division};

/// Label of the text before the first article
pub const PREAMBLE_LABEL: &str = "Giriş";

/// Label used when a document has no article boundaries at all
pub const WHOLE_DOCUMENT_LABEL: &str = "Tam Metin";

/// One searchable unit of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub article_number: Option<String>,
    pub title: Option<String>,
    pub text: String,
}

struct Builder {
    label: String,
    article_number: Option<String>,
    title: Option<String>,
    lines: Vec<String>,
}

impl Builder {
    fn preamble() -> Self {
        Self {
            label: PREAMBLE_LABEL.to_string(),
            article_number: None,
            title: None,
            lines: Vec::new(),
        }
    }

    fn pop_blank(&mut self) {
        while self.lines.last().is_some_and(|l| l.trim().is_empty()) {
            self.lines.pop();
        }
    }

    /// Remove a trailing bold-only line and any division headings above it
    ///
    /// In legislation the article title (`**Amaç**`) sits on its own line
    /// right before the `MADDE` line, so it belongs to the next article.
    fn take_next_title(&mut self) -> Option<String> {
        self.pop_blank();
        let title = match self.lines.last() {
            Some(line) if parse_division(line).is_none() => {
                bold_only_text(line).map(str::to_string)
            }
            _ => None,
        };
        if title.is_some() {
            self.lines.pop();
        }

        loop {
            self.pop_blank();
            match self.lines.last() {
                Some(line) if parse_division(line).is_some() => {
                    self.lines.pop();
                }
                _ => break,
            }
        }
        title
    }

    fn finish(mut self) -> Option<Section> {
        self.pop_blank();
        let text = self.lines.join("\n").trim().to_string();
        if text.is_empty() {
            return None;
        }

        // Some documents put the title on the line after the heading instead
        let title = self.title.or_else(|| {
            self.article_number.as_ref()?;
            self.lines
                .iter()
                .skip(1)
                .find(|l| !l.trim().is_empty())
                .and_then(|l| bold_only_text(l))
                .map(str::to_string)
        });

        Some(Section {
            label: self.label,
            article_number: self.article_number,
            title,
            text,
        })
    }
}

/// Split Markdown into sections at article headings
///
/// Text before the first article becomes a `Giriş` section when non-empty.
/// A document without any article heading is returned as a single section.
#[must_use]
pub fn split_sections(markdown: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Builder::preamble();
    let mut saw_article = false;

    for line in markdown.lines() {
        if let Some(heading) = parse_article_heading(line) {
            let title = current
                .take_next_title()
                .or_else(|| heading.inline_title().map(str::to_string));
            if let Some(section) = std::mem::replace(
                &mut current,
                Builder {
                    label: heading.label.clone(),
                    article_number: Some(heading.number.clone()),
                    title,
                    lines: vec![heading.label],
                },
            )
            .finish()
            {
                sections.push(section);
            }
            if !heading.rest.is_empty() {
                current.lines.push(heading.rest);
            }
            saw_article = true;
        } else {
            current.lines.push(line.to_string());
        }
    }

    if let Some(section) = current.finish() {
        sections.push(section);
    }

    if !saw_article && let Some(only) = sections.first_mut() {
        only.label = WHOLE_DOCUMENT_LABEL.to_string();
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_articles_with_preamble_and_titles() {
        let md = "TÜRK CEZA KANUNU\n\n### BİRİNCİ BÖLÜM\n\n**Amaç**\n\n#### MADDE 1\n\n(1) Amaç metni.\n\n**Tanımlar**\n\n#### MADDE 2\n\n(1) Tanım metni.";
        let sections = split_sections(md);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].label, PREAMBLE_LABEL);
        assert_eq!(sections[0].text, "TÜRK CEZA KANUNU");

        assert_eq!(sections[1].label, "MADDE 1");
        assert_eq!(sections[1].title.as_deref(), Some("Amaç"));
        assert!(!sections[1].text.contains("Tanımlar"));

        assert_eq!(sections[2].article_number.as_deref(), Some("2"));
        assert_eq!(sections[2].title.as_deref(), Some("Tanımlar"));
    }

    #[test]
    fn title_after_heading_is_used_as_fallback() {
        let md = "**MADDE 1 –**\n**Kapsam**\n(1) Bu Yönetmelik...";
        let sections = split_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title.as_deref(), Some("Kapsam"));
    }

    #[test]
    fn same_line_title_is_used() {
        let md = "Madde 1- Amaç\nBu Kanunun amacı vergidir.\n\n#### Madde 2 - Kapsam\n\nBu Kanun herkese uygulanır.\n\n**MADDE 3 –** (1) Tanımlar aşağıdadır.";
        let sections = split_sections(md);
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("Amaç"), Some("Kapsam"), None]);
        assert!(sections[0].text.contains("amacı vergidir"));
    }

    #[test]
    fn document_without_articles_is_one_section() {
        let sections = split_sections("Genelge metni.\n\nİkinci paragraf.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, WHOLE_DOCUMENT_LABEL);
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(split_sections("  \n\n").is_empty());
    }
}
