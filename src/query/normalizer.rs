//! Tool parameter validation and search query normalisation
//!
//! Produces a [`SearchQuery`] whose serialised form is the cache fingerprint,
//! plus the upstream query string or JSON payload derived from it. All
//! validation here happens before any network call.

use super::boolean::BooleanExpr;
use super::dates::{parse_optional_date, to_upstream_format};
use crate::document_types::{BEDESTEN_TYPE_CODES, DocumentType};
use crate::errors::{MevzuatError, MevzuatResult};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::ops::RangeInclusive;

/// Allowed page sizes for per-type searches on mevzuat.gov.tr
pub const SITE_PAGE_SIZE: RangeInclusive<u32> = 1..=100;

/// Allowed page sizes for the unified bedesten search
pub const BEDESTEN_PAGE_SIZE: RangeInclusive<u32> = 1..=10;

/// Allowed `max_results` for in-document keyword search
pub const MAX_RESULTS_RANGE: RangeInclusive<u32> = 1..=100;

pub const DEFAULT_MAX_RESULTS: u32 = 25;

/// Slop used by the proximity fallback (`"w1 w2"~10`)
const PROXIMITY_SLOP: u32 = 10;

fn default_page_number() -> u32 {
    1
}

fn default_site_page_size() -> u32 {
    10
}

fn default_bedesten_page_size() -> u32 {
    5
}

/// Parameters of the per-type `search_<type>` tools
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Turkish search phrase. Combine terms with uppercase AND, OR, NOT
    /// (applied left to right: `A AND B OR C` means `(A AND B) OR C`);
    /// wrap a run in double quotes to keep it together.
    pub phrase: String,
    /// Match the whole phrase exactly instead of tokenising it
    #[serde(default)]
    pub exact_phrase: bool,
    /// Earliest Official Gazette date, `YYYY-MM-DD`
    #[serde(default)]
    pub start_date: Option<String>,
    /// Latest Official Gazette date, `YYYY-MM-DD`
    #[serde(default)]
    pub end_date: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    /// Results per page (1-100)
    #[serde(default = "default_site_page_size")]
    pub page_size: u32,
}

/// Field used to sort unified search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortField {
    #[default]
    ResmiGazeteTarihi,
    KayitTarihi,
    MevzuatNumarasi,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Document type filter, as a list or as a JSON-encoded list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DocumentTypesArg {
    List(Vec<String>),
    Encoded(String),
}

/// Parameters of the unified `search_mevzuat` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnifiedSearchParams {
    /// Full-text search phrase (AND, OR, NOT and "quoted phrases" supported)
    #[serde(default)]
    pub phrase: Option<String>,
    /// Legislation number, e.g. `5237` for the Turkish Penal Code
    #[serde(default, alias = "mevzuat_no")]
    pub document_id: Option<String>,
    /// Official Gazette issue number
    #[serde(default, alias = "resmi_gazete_sayisi")]
    pub gazette_number: Option<String>,
    /// Legislation type codes (KANUN, CB_KARARNAME, YONETMELIK, CB_YONETMELIK,
    /// CB_KARAR, CB_GENELGE, KHK, TUZUK, KKY, UY, TEBLIGLER, MULGA).
    /// Defaults to all.
    #[serde(default, alias = "mevzuat_turleri")]
    pub document_types: Option<DocumentTypesArg>,
    /// 1-based page number
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    /// Results per page (1-10)
    #[serde(default = "default_bedesten_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub sort_field: SortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

/// Parameters of the per-type `search_within_<type>` tools
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchWithinParams {
    /// Document identifier from a search result (`1.5.5237`) or a bare
    /// legislation number (`5237`)
    pub document_id: String,
    /// Keyword expression. Supports AND, OR, NOT and "exact phrases";
    /// matches articles rather than whole documents.
    pub keyword: String,
    /// Match case exactly (Turkish case rules apply otherwise)
    #[serde(default)]
    pub case_sensitive: bool,
    /// Maximum number of articles to return (1-100, default 25)
    #[serde(default)]
    pub max_results: Option<u32>,
}

/// Upstream the query is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchTarget {
    /// mevzuat.gov.tr listing for one document type
    Site { document_type: DocumentType },
    /// bedesten search API across the given type codes
    Bedesten { document_types: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Normalised search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub target: SearchTarget,
    /// Phrase as supplied, whitespace-collapsed
    pub phrase: Option<String>,
    /// Expression sent upstream
    pub expression: Option<String>,
    pub exact_phrase: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub mevzuat_no: Option<String>,
    pub gazette_number: Option<String>,
    pub page_number: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
}

/// Cache key derived from a normalised request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Stable serialisation of `value` under `namespace`
    pub fn of<T: Serialize>(namespace: &str, value: &T) -> MevzuatResult<Self> {
        let body = serde_json::to_string(value)
            .map_err(|e| MevzuatError::invalid_parameter("query", e.to_string()))?;
        Ok(Self(format!("{namespace}:{body}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(collapse_whitespace)
        .filter(|v| !v.is_empty())
}

fn check_page(page_number: u32, page_size: u32, sizes: &RangeInclusive<u32>) -> MevzuatResult<()> {
    if page_number < 1 {
        return Err(MevzuatError::invalid_parameter(
            "page_number",
            "must be at least 1",
        ));
    }
    if !sizes.contains(&page_size) {
        return Err(MevzuatError::invalid_parameter(
            "page_size",
            format!(
                "{page_size} is outside the allowed range {}-{}",
                sizes.start(),
                sizes.end()
            ),
        ));
    }
    Ok(())
}

fn check_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> MevzuatResult<()> {
    if let (Some(s), Some(e)) = (start, end)
        && s > e
    {
        return Err(MevzuatError::invalid_parameter(
            "start_date",
            format!("{s} is after end_date {e}"),
        ));
    }
    Ok(())
}

/// Expression for an exact-phrase search: the whole phrase in quotes
fn quote_whole(phrase: &str) -> String {
    format!("\"{}\"", collapse_whitespace(phrase.trim_matches('"')))
}

/// Normalise the parameters of a per-type search
pub fn normalize(
    doc_type: DocumentType,
    params: &SearchParams,
) -> MevzuatResult<(SearchQuery, Fingerprint)> {
    check_page(params.page_number, params.page_size, &SITE_PAGE_SIZE)?;

    let start_date = parse_optional_date("start_date", params.start_date.as_deref())?;
    let end_date = parse_optional_date("end_date", params.end_date.as_deref())?;
    check_date_range(start_date, end_date)?;

    let phrase = non_blank(Some(&params.phrase)).ok_or_else(|| {
        MevzuatError::invalid_parameter("phrase", "must contain at least one search term")
    })?;

    let expression = if params.exact_phrase {
        quote_whole(&phrase)
    } else if BooleanExpr::has_explicit_operators(&phrase) {
        BooleanExpr::parse(&phrase)
            .map(|e| e.to_string())
            .unwrap_or_else(|| phrase.clone())
    } else {
        phrase.clone()
    };

    let query = SearchQuery {
        target: SearchTarget::Site {
            document_type: doc_type,
        },
        phrase: Some(phrase),
        expression: Some(expression),
        exact_phrase: params.exact_phrase,
        start_date,
        end_date,
        mevzuat_no: None,
        gazette_number: None,
        page_number: params.page_number,
        page_size: params.page_size,
        sort: None,
    };
    let fingerprint = Fingerprint::of("search", &query)?;
    Ok((query, fingerprint))
}

fn resolve_document_types(arg: Option<&DocumentTypesArg>) -> MevzuatResult<Vec<String>> {
    let requested = match arg {
        None => return Ok(BEDESTEN_TYPE_CODES.iter().map(|s| (*s).to_string()).collect()),
        Some(DocumentTypesArg::List(list)) => list.clone(),
        Some(DocumentTypesArg::Encoded(raw)) => {
            serde_json::from_str::<Vec<String>>(raw).map_err(|_| {
                MevzuatError::invalid_parameter(
                    "document_types",
                    format!("'{raw}' is not a JSON list of type codes"),
                )
            })?
        }
    };

    if requested.is_empty() {
        return Ok(BEDESTEN_TYPE_CODES.iter().map(|s| (*s).to_string()).collect());
    }

    let mut codes: Vec<String> = Vec::with_capacity(requested.len());
    for code in requested {
        let code = code.trim().to_uppercase();
        if !BEDESTEN_TYPE_CODES.contains(&code.as_str()) {
            return Err(MevzuatError::invalid_parameter(
                "document_types",
                format!("unknown type code '{code}'"),
            ));
        }
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    // Order-insensitive filter, so the fingerprint should be too
    codes.sort();
    Ok(codes)
}

/// Normalise the parameters of the unified `search_mevzuat` tool
pub fn normalize_unified(
    params: &UnifiedSearchParams,
) -> MevzuatResult<(SearchQuery, Fingerprint)> {
    check_page(params.page_number, params.page_size, &BEDESTEN_PAGE_SIZE)?;

    let phrase = non_blank(params.phrase.as_deref());
    let mevzuat_no = non_blank(params.document_id.as_deref());
    if phrase.is_none() && mevzuat_no.is_none() {
        return Err(MevzuatError::invalid_parameter(
            "phrase",
            "provide at least one of 'phrase' or 'document_id'",
        ));
    }

    let document_types = resolve_document_types(params.document_types.as_ref())?;

    let expression = phrase.as_deref().map(|p| {
        if BooleanExpr::has_explicit_operators(p) {
            BooleanExpr::parse(p)
                .map(|e| e.to_solr())
                .unwrap_or_else(|| p.to_string())
        } else {
            p.to_string()
        }
    });

    let query = SearchQuery {
        target: SearchTarget::Bedesten { document_types },
        phrase,
        expression,
        exact_phrase: false,
        start_date: None,
        end_date: None,
        mevzuat_no,
        gazette_number: non_blank(params.gazette_number.as_deref()),
        page_number: params.page_number,
        page_size: params.page_size,
        sort: Some(SortSpec {
            field: params.sort_field,
            direction: params.sort_direction,
        }),
    };
    let fingerprint = Fingerprint::of("search", &query)?;
    Ok((query, fingerprint))
}

impl SearchQuery {
    /// Copy of this query with a different upstream expression
    #[must_use]
    pub fn with_expression(&self, expression: String) -> Self {
        Self {
            expression: Some(expression),
            ..self.clone()
        }
    }

    /// Query-string pairs for the mevzuat.gov.tr search listing
    #[must_use]
    pub fn site_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(9);
        if let SearchTarget::Site { document_type } = &self.target {
            params.push(("MevzuatTur", document_type.mevzuat_tur().to_string()));
        }
        if let Some(expr) = &self.expression {
            params.push(("AranacakIfade", expr.clone()));
        }
        // 3 = search the full text
        params.push(("AranacakYer", "3".to_string()));
        params.push(("TamCumle", self.exact_phrase.to_string()));
        if let Some(d) = self.start_date {
            params.push(("BaslangicTarihi", to_upstream_format(d)));
        }
        if let Some(d) = self.end_date {
            params.push(("BitisTarihi", to_upstream_format(d)));
        }
        params.push(("Sayfa", self.page_number.to_string()));
        params.push(("SayfaBoyutu", self.page_size.to_string()));
        params
    }

    /// JSON body for the bedesten `searchDocuments` endpoint
    #[must_use]
    pub fn bedesten_payload(&self) -> Value {
        let types: Vec<String> = match &self.target {
            SearchTarget::Bedesten { document_types } => document_types.clone(),
            SearchTarget::Site { document_type } => {
                vec![document_type.descriptor().bedesten_code.to_string()]
            }
        };
        let sort = self.sort.unwrap_or(SortSpec {
            field: SortField::default(),
            direction: SortDirection::default(),
        });

        let mut data = json!({
            "pageSize": self.page_size,
            "pageNumber": self.page_number,
            "mevzuatTurList": types,
            "sortFields": [sort.field],
            "sortDirection": sort.direction,
        });
        if let Some(obj) = data.as_object_mut() {
            if let Some(expr) = &self.expression {
                obj.insert("phrase".into(), Value::String(expr.clone()));
            }
            if let Some(no) = &self.mevzuat_no {
                obj.insert("mevzuatNo".into(), Value::String(no.clone()));
            }
            if let Some(rg) = &self.gazette_number {
                obj.insert("resmiGazeteSayi".into(), Value::String(rg.clone()));
            }
        }

        json!({
            "data": data,
            "applicationName": "UyapMevzuat",
            "paging": true,
        })
    }

    /// Adjacent-word proximity queries tried when a multi-word phrase finds nothing
    #[must_use]
    pub fn proximity_fallbacks(&self) -> Vec<String> {
        let Some(phrase) = self.phrase.as_deref() else {
            return Vec::new();
        };
        let Some(expr) = BooleanExpr::parse(phrase) else {
            return Vec::new();
        };
        // Quoted phrases are already as tight as a proximity query
        if expr.terms().iter().any(|t| t.quoted) {
            return Vec::new();
        }
        let words: Vec<&str> = expr
            .positive_terms()
            .into_iter()
            .map(|t| t.text.as_str())
            .collect();

        words
            .windows(2)
            .map(|pair| format!("\"{} {}\"~{PROXIMITY_SLOP}", pair[0], pair[1]))
            .collect()
    }
}

/// Validate an in-document keyword query
pub fn parse_keyword(keyword: &str) -> MevzuatResult<BooleanExpr> {
    BooleanExpr::parse(keyword).ok_or_else(|| {
        MevzuatError::invalid_parameter("keyword", "must contain at least one search term")
    })
}

/// Validate `max_results`, applying the default when absent
pub fn resolve_max_results(max_results: Option<u32>) -> MevzuatResult<usize> {
    let value = max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if !MAX_RESULTS_RANGE.contains(&value) {
        return Err(MevzuatError::invalid_parameter(
            "max_results",
            format!(
                "{value} is outside the allowed range {}-{}",
                MAX_RESULTS_RANGE.start(),
                MAX_RESULTS_RANGE.end()
            ),
        ));
    }
    Ok(value as usize)
}
