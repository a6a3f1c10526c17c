//! Filter engine
//!
//! Date-range and model filtering over normalized records, plus the quick
//! day/month range shortcuts derived from the data itself.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::core::record::UsageRecord;
use crate::utils::Timezone;

/// Inclusive date-range filter; either bound may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateRange {
    pub(crate) start: Option<DateTime<Utc>>,
    pub(crate) end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub(crate) fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub(crate) fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start
            && instant < start
        {
            return false;
        }
        if let Some(end) = self.end
            && instant > end
        {
            return false;
        }
        true
    }
}

/// Swap reversed bounds instead of rejecting them; manual entry is never
/// an error.
pub(crate) fn normalize_range(range: DateRange) -> DateRange {
    match (range.start, range.end) {
        (Some(start), Some(end)) if start > end => DateRange {
            start: Some(end),
            end: Some(start),
        },
        _ => range,
    }
}

/// Keep records inside the range, inclusive on both bounds. An unbounded
/// range is a no-op.
pub(crate) fn apply_date_range(records: Vec<UsageRecord>, range: &DateRange) -> Vec<UsageRecord> {
    if range.is_unbounded() {
        return records;
    }
    let mut records = records;
    records.retain(|record| range.contains(record.date));
    records
}

/// Keep records whose model is in the selection. An empty selection means
/// "no constraint", not "exclude all".
pub(crate) fn apply_model_filter(records: Vec<UsageRecord>, selected: &[String]) -> Vec<UsageRecord> {
    if selected.is_empty() {
        return records;
    }
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let mut records = records;
    records.retain(|record| selected.contains(record.model.as_str()));
    records
}

/// A precomputed date-range shortcut derived from the data's own day and
/// month boundaries.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuickRangeOption {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct QuickRanges {
    pub(crate) days: Vec<QuickRangeOption>,
    pub(crate) months: Vec<QuickRangeOption>,
}

/// UTC span of one local calendar day: midnight to one millisecond before
/// the next midnight.
pub(crate) fn day_span(date: NaiveDate, tz: Timezone) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = tz.resolve_local(date.and_time(NaiveTime::MIN));
    let next = date.succ_opt().unwrap_or(date);
    let end = tz.resolve_local(next.and_time(NaiveTime::MIN)) - Duration::milliseconds(1);
    (start, end)
}

/// UTC span of one local calendar month: the 1st at midnight to one
/// millisecond before the next month's 1st.
pub(crate) fn month_span(date: NaiveDate, tz: Timezone) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = date.with_day(1).unwrap_or(date);
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap_or(first);
    let start = tz.resolve_local(first.and_time(NaiveTime::MIN));
    let end = tz.resolve_local(next_first.and_time(NaiveTime::MIN)) - Duration::milliseconds(1);
    (start, end)
}

/// Derive the quick-range shortcuts from the full (unfiltered) record set.
/// Rebuilt from scratch on every call; nothing is cached across loads.
pub(crate) fn build_quick_ranges(records: &[UsageRecord], tz: Timezone) -> QuickRanges {
    let mut day_map: HashMap<String, QuickRangeOption> = HashMap::new();
    let mut month_map: HashMap<String, QuickRangeOption> = HashMap::new();

    for record in records {
        let local = tz.local_date(record.date);

        let day_label = tz.day_key(record.date);
        day_map.entry(format!("day-{day_label}")).or_insert_with(|| {
            let (start, end) = day_span(local, tz);
            QuickRangeOption {
                key: format!("day-{day_label}"),
                label: day_label.clone(),
                start,
                end,
            }
        });

        let month_label = tz.month_key(record.date);
        month_map
            .entry(format!("month-{month_label}"))
            .or_insert_with(|| {
                let (start, end) = month_span(local, tz);
                QuickRangeOption {
                    key: format!("month-{month_label}"),
                    label: month_label.clone(),
                    start,
                    end,
                }
            });
    }

    let mut days: Vec<QuickRangeOption> = day_map.into_values().collect();
    let mut months: Vec<QuickRangeOption> = month_map.into_values().collect();
    days.sort_by(|a, b| b.start.cmp(&a.start));
    months.sort_by(|a, b| b.start.cmp(&a.start));

    QuickRanges { days, months }
}
