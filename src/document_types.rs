//! Legislation document types and their upstream descriptors
//!
//! The nine per-type tool pairs differ only in data: which `MevzuatTur` code
//! the upstream site uses, whether the full text is served as HTML or as a PDF,
//! and the slug used in tool names. That data lives here as a table so the
//! search, extraction and scoring pipeline stays a single code path.

use crate::errors::{MevzuatError, MevzuatResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tertip (series) used when an identifier omits it
pub const DEFAULT_TERTIP: u32 = 5;

/// How the full text of a document type is served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// HTML fragment rendered by the legislation site
    Html,
    /// Scanned or typeset PDF that needs OCR or a text-layer fallback
    Pdf,
}

/// Legislation document types exposed as dedicated tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Kanun,
    Khk,
    Tuzuk,
    KurumYonetmeligi,
    CbKararnamesi,
    CbKarari,
    CbYonetmeligi,
    CbGenelgesi,
    Teblig,
}

/// Static descriptor for one document type
#[derive(Debug, Clone, Copy)]
pub struct DocumentTypeDescriptor {
    pub doc_type: DocumentType,
    /// Suffix used in tool names (`search_<slug>`)
    pub slug: &'static str,
    /// Turkish name as shown on the legislation site
    pub display_name: &'static str,
    /// `MevzuatTur` query parameter on mevzuat.gov.tr
    pub mevzuat_tur: u32,
    /// Type code accepted by the bedesten search API
    pub bedesten_code: &'static str,
    pub content_source: ContentSource,
}

const DESCRIPTORS: [DocumentTypeDescriptor; 9] = [
    DocumentTypeDescriptor {
        doc_type: DocumentType::Kanun,
        slug: "kanun",
        display_name: "Kanun",
        mevzuat_tur: 1,
        bedesten_code: "KANUN",
        content_source: ContentSource::Html,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::Khk,
        slug: "khk",
        display_name: "Kanun Hükmünde Kararname",
        mevzuat_tur: 4,
        bedesten_code: "KHK",
        content_source: ContentSource::Html,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::Tuzuk,
        slug: "tuzuk",
        display_name: "Tüzük",
        mevzuat_tur: 2,
        bedesten_code: "TUZUK",
        content_source: ContentSource::Html,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::KurumYonetmeligi,
        slug: "kurum_yonetmeligi",
        display_name: "Kurum Yönetmeliği",
        mevzuat_tur: 7,
        bedesten_code: "KKY",
        content_source: ContentSource::Html,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::CbKararnamesi,
        slug: "cb_kararnamesi",
        display_name: "Cumhurbaşkanlığı Kararnamesi",
        mevzuat_tur: 19,
        bedesten_code: "CB_KARARNAME",
        content_source: ContentSource::Html,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::CbKarari,
        slug: "cb_karari",
        display_name: "Cumhurbaşkanı Kararı",
        mevzuat_tur: 20,
        bedesten_code: "CB_KARAR",
        content_source: ContentSource::Pdf,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::CbYonetmeligi,
        slug: "cb_yonetmeligi",
        display_name: "Cumhurbaşkanlığı Yönetmeliği",
        mevzuat_tur: 21,
        bedesten_code: "CB_YONETMELIK",
        content_source: ContentSource::Html,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::CbGenelgesi,
        slug: "cb_genelgesi",
        display_name: "Cumhurbaşkanlığı Genelgesi",
        mevzuat_tur: 22,
        bedesten_code: "CB_GENELGE",
        content_source: ContentSource::Pdf,
    },
    DocumentTypeDescriptor {
        doc_type: DocumentType::Teblig,
        slug: "teblig",
        display_name: "Tebliğ",
        mevzuat_tur: 9,
        bedesten_code: "TEBLIGLER",
        content_source: ContentSource::Html,
    },
];

/// Codes accepted by the bedesten `mevzuatTurList` filter
pub const BEDESTEN_TYPE_CODES: [&str; 12] = [
    "KANUN",
    "CB_KARARNAME",
    "YONETMELIK",
    "CB_YONETMELIK",
    "CB_KARAR",
    "CB_GENELGE",
    "KHK",
    "TUZUK",
    "KKY",
    "UY",
    "TEBLIGLER",
    "MULGA",
];

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::Kanun,
        DocumentType::Khk,
        DocumentType::Tuzuk,
        DocumentType::KurumYonetmeligi,
        DocumentType::CbKararnamesi,
        DocumentType::CbKarari,
        DocumentType::CbYonetmeligi,
        DocumentType::CbGenelgesi,
        DocumentType::Teblig,
    ];

    #[must_use]
    pub fn descriptor(self) -> &'static DocumentTypeDescriptor {
        // DESCRIPTORS is ordered like the enum
        &DESCRIPTORS[self as usize]
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        self.descriptor().slug
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    #[must_use]
    pub fn mevzuat_tur(self) -> u32 {
        self.descriptor().mevzuat_tur
    }

    #[must_use]
    pub fn content_source(self) -> ContentSource {
        self.descriptor().content_source
    }

    /// Look up a type by its tool slug
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Look up a type by its `MevzuatTur` code
    #[must_use]
    pub fn from_mevzuat_tur(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.mevzuat_tur() == code)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identifier of a document on mevzuat.gov.tr: `{tur}.{tertip}.{no}`
///
/// The same triple names the PDF under `/MevzuatMetin/`, so it round-trips
/// through search results, content fetches and PDF downloads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    pub mevzuat_tur: u32,
    pub tertip: u32,
    pub mevzuat_no: String,
}

impl DocumentId {
    #[must_use]
    pub fn new(mevzuat_tur: u32, tertip: u32, mevzuat_no: impl Into<String>) -> Self {
        Self {
            mevzuat_tur,
            tertip,
            mevzuat_no: mevzuat_no.into(),
        }
    }

    /// Parse an identifier for a document of `doc_type`
    ///
    /// Accepts the full `{tur}.{tertip}.{no}` form returned by search, or a
    /// bare legislation number (`5237`), in which case the type's code and the
    /// default tertip are assumed.
    pub fn parse(raw: &str, doc_type: DocumentType) -> MevzuatResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(MevzuatError::invalid_parameter(
                "document_id",
                "must not be empty",
            ));
        }

        let parts: Vec<&str> = raw.split('.').collect();
        let id = match parts.as_slice() {
            [no] => Self::new(doc_type.mevzuat_tur(), DEFAULT_TERTIP, *no),
            [tur, tertip, no] => {
                let tur = parse_code(tur)?;
                let tertip = parse_code(tertip)?;
                Self::new(tur, tertip, *no)
            }
            _ => {
                return Err(MevzuatError::invalid_parameter(
                    "document_id",
                    format!("'{raw}' is neither a legislation number nor '<tur>.<tertip>.<no>'"),
                ));
            }
        };

        if id.mevzuat_no.is_empty()
            || !id
                .mevzuat_no
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(MevzuatError::invalid_parameter(
                "document_id",
                format!("'{raw}' contains an invalid legislation number"),
            ));
        }

        if id.mevzuat_tur != doc_type.mevzuat_tur() {
            return Err(MevzuatError::invalid_parameter(
                "document_id",
                format!(
                    "'{raw}' belongs to MevzuatTur {}, not {} ({})",
                    id.mevzuat_tur,
                    doc_type.mevzuat_tur(),
                    doc_type.display_name()
                ),
            ));
        }

        Ok(id)
    }

    /// File name of the PDF rendition on mevzuat.gov.tr
    #[must_use]
    pub fn pdf_file_name(&self) -> String {
        format!("{self}.pdf")
    }
}

fn parse_code(part: &str) -> MevzuatResult<u32> {
    part.parse::<u32>().map_err(|_| {
        MevzuatError::invalid_parameter("document_id", format!("'{part}' is not a numeric code"))
    })
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.mevzuat_tur, self.tertip, self.mevzuat_no)
    }
}
