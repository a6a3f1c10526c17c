//! Record normalizer
//!
//! Maps tokenized CSV rows onto typed [`UsageRecord`]s via header-name
//! lookup. Corrupt input degrades instead of failing: rows without a
//! parseable date are skipped, bad numeric cells become zero.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::core::csv::tokenize;
use crate::utils::Timezone;

const COL_DATE: &str = "Date";
const COL_KIND: &str = "Kind";
const COL_MODEL: &str = "Model";
const COL_MAX_MODE: &str = "Max Mode";
const COL_INPUT_WITH_CACHE: &str = "Input (w/ Cache Write)";
const COL_INPUT_NO_CACHE: &str = "Input (w/o Cache Write)";
const COL_CACHE_READ: &str = "Cache Read";
const COL_OUTPUT_TOKENS: &str = "Output Tokens";
const COL_TOTAL_TOKENS: &str = "Total Tokens";
const COL_COST: &str = "Cost";

/// One normalized usage-CSV data row.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UsageRecord {
    pub(crate) date: DateTime<Utc>,
    pub(crate) kind: String,
    pub(crate) model: String,
    pub(crate) max_mode: String,
    pub(crate) input_with_cache: i64,
    pub(crate) input_no_cache: i64,
    pub(crate) cache_read: i64,
    pub(crate) output_tokens: i64,
    pub(crate) total_tokens: i64,
    pub(crate) cost: f64,
}

/// Column positions keyed by trimmed header name. Duplicate header names
/// resolve to the first occurrence.
struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    fn new(header_row: &[String]) -> Self {
        let mut columns = HashMap::new();
        for (idx, cell) in header_row.iter().enumerate() {
            columns.entry(cell.trim().to_string()).or_insert(idx);
        }
        HeaderIndex { columns }
    }

    /// Cell value for a named column; missing column or short row yields "".
    fn cell<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.columns
            .get(name)
            .and_then(|&idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Tokenize and normalize a whole usage CSV export.
///
/// Naive timestamps in the `Date` column are resolved in `tz`. The result
/// is sorted by date descending (most recent first), which downstream
/// views rely on.
pub(crate) fn parse_usage_csv(text: &str, tz: Timezone) -> Vec<UsageRecord> {
    let rows = tokenize(text);
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Vec::new();
    };
    let header = HeaderIndex::new(header_row);

    let mut records = Vec::new();
    for row in data_rows {
        // blank separator line
        if row.len() == 1 && row[0].trim().is_empty() {
            continue;
        }

        let date_raw = header.cell(row, COL_DATE);
        if date_raw.is_empty() {
            continue;
        }
        let Some(date) = parse_timestamp(&date_raw.replace('"', ""), tz) else {
            continue;
        };

        records.push(UsageRecord {
            date,
            kind: strip_outer_quotes(header.cell(row, COL_KIND)),
            model: strip_outer_quotes(header.cell(row, COL_MODEL)),
            max_mode: strip_outer_quotes(header.cell(row, COL_MAX_MODE)),
            input_with_cache: to_tokens(header.cell(row, COL_INPUT_WITH_CACHE)),
            input_no_cache: to_tokens(header.cell(row, COL_INPUT_NO_CACHE)),
            cache_read: to_tokens(header.cell(row, COL_CACHE_READ)),
            output_tokens: to_tokens(header.cell(row, COL_OUTPUT_TOKENS)),
            total_tokens: to_tokens(header.cell(row, COL_TOTAL_TOKENS)),
            cost: to_decimal(header.cell(row, COL_COST)),
        });
    }

    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

/// Strip quote runs anchored at the start/end of the value. Quotes in the
/// middle of a value are data, not framing.
fn strip_outer_quotes(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Decimal coercion: strip all quotes, trim, parse. Anything that is not a
/// finite number becomes 0.
fn to_decimal(value: &str) -> f64 {
    let cleaned = value.replace('"', "");
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn to_tokens(value: &str) -> i64 {
    to_decimal(value).round() as i64
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Permissive timestamp parsing for the `Date` cell: RFC 3339 first, then
/// common naive datetime and date shapes resolved in `tz`.
fn parse_timestamp(value: &str, tz: Timezone) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    // offset-carrying form with a space instead of 'T'
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(tz.resolve_local(naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(tz.resolve_local(date.and_time(NaiveTime::MIN)));
        }
    }

    None
}
