//! Query normalisation
//!
//! Turns raw tool parameters into a validated [`SearchQuery`] plus the
//! fingerprint used as its cache key.

pub mod boolean;
pub mod dates;
pub mod normalizer;

pub use boolean::{BooleanExpr, Operator, Term};
pub use dates::{parse_iso_date, parse_optional_date, to_upstream_format};
pub use normalizer::{
    DEFAULT_MAX_RESULTS, DocumentTypesArg, Fingerprint, SearchParams, SearchQuery, SearchTarget,
    SearchWithinParams, SortDirection, SortField, SortSpec, UnifiedSearchParams, normalize,
    normalize_unified, parse_keyword, resolve_max_results,
};
