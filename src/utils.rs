//! Date helpers for the API's `dd-mm-YYYY` convention.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

const API_DATE_FORMAT: &str = "%d-%m-%Y";

/// Format a date the way the API expects it in query strings.
pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

/// Parse a date as returned by the API.
pub fn parse_api_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), API_DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected dd-mm-YYYY", value))
}

/// Parse a user supplied date, accepting either `dd-mm-YYYY` or ISO `YYYY-MM-DD`.
pub fn parse_user_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    parse_api_date(value)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(anyhow::Error::from))
        .with_context(|| format!("Invalid date '{}', expected dd-mm-YYYY or YYYY-MM-DD", value))
}

/// The given date, or today in local time.
pub fn resolve_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
