//! Date parameter validation

use crate::errors::{MevzuatError, MevzuatResult};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("BUG: hardcoded date regex is invalid")
});

/// Parse a `YYYY-MM-DD` date, rejecting other separators and impossible dates
pub fn parse_iso_date(field: &str, value: &str) -> MevzuatResult<NaiveDate> {
    let invalid = || MevzuatError::InvalidDateFormat {
        field: field.to_string(),
        value: value.to_string(),
    };

    if !ISO_DATE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parse an optional date, treating blank strings as absent
pub fn parse_optional_date(field: &str, value: Option<&str>) -> MevzuatResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_iso_date(field, v).map(Some),
    }
}

/// Date format used in mevzuat.gov.tr query strings
#[must_use]
pub fn to_upstream_format(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
