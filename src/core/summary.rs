//! Aggregator
//!
//! Reduces a filtered record set into grand totals, per-day rollups, and
//! per-model metrics, each with percentage shares of the filtered set.
//! Every call builds its grouping maps from scratch and returns owned
//! values; there is no accumulation state between calls.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::record::UsageRecord;
use crate::utils::Timezone;

/// Grand totals over the filtered set.
#[derive(Debug, Default, Clone, Serialize)]
pub(crate) struct Totals {
    pub(crate) requests: i64,
    pub(crate) total_tokens: i64,
    pub(crate) input_with_cache: i64,
    pub(crate) input_no_cache: i64,
    pub(crate) cache_read: i64,
    pub(crate) output_tokens: i64,
    pub(crate) cost: f64,
}

/// One local calendar day of the filtered set, with each metric's share of
/// the set's grand total.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DailyRollup {
    pub(crate) day: String,
    pub(crate) requests: i64,
    pub(crate) tokens: i64,
    pub(crate) cost: f64,
    pub(crate) requests_pct: f64,
    pub(crate) tokens_pct: f64,
    pub(crate) cost_pct: f64,
}

/// One model group of the filtered set. The empty-string model is its own
/// group, displayed via [`model_label`].
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ModelMetric {
    pub(crate) model: String,
    pub(crate) requests: i64,
    pub(crate) tokens: i64,
    pub(crate) cost: f64,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct Summary {
    pub(crate) totals: Totals,
    pub(crate) daily: Vec<DailyRollup>,
    pub(crate) models: Vec<ModelMetric>,
}

#[derive(Default)]
struct GroupAcc {
    requests: i64,
    tokens: i64,
    cost: f64,
}

impl GroupAcc {
    fn add(&mut self, record: &UsageRecord) {
        self.requests += 1;
        self.tokens += record.total_tokens;
        self.cost += record.cost;
    }
}

/// Aggregate a (filtered) record set. Day keys are derived from each
/// record's calendar day in `tz`.
pub(crate) fn summarize(records: &[UsageRecord], tz: Timezone) -> Summary {
    let mut totals = Totals::default();
    let mut by_day: HashMap<String, GroupAcc> = HashMap::new();
    let mut by_model: HashMap<String, GroupAcc> = HashMap::new();

    for record in records {
        totals.requests += 1;
        totals.total_tokens += record.total_tokens;
        totals.input_with_cache += record.input_with_cache;
        totals.input_no_cache += record.input_no_cache;
        totals.cache_read += record.cache_read;
        totals.output_tokens += record.output_tokens;
        totals.cost += record.cost;

        by_day.entry(tz.day_key(record.date)).or_default().add(record);
        by_model.entry(record.model.clone()).or_default().add(record);
    }

    let mut daily: Vec<DailyRollup> = by_day
        .into_iter()
        .map(|(day, acc)| DailyRollup {
            requests_pct: percent_of(acc.requests as f64, totals.requests as f64),
            tokens_pct: percent_of(acc.tokens as f64, totals.total_tokens as f64),
            cost_pct: percent_of(acc.cost, totals.cost),
            day,
            requests: acc.requests,
            tokens: acc.tokens,
            cost: acc.cost,
        })
        .collect();
    daily.sort_by(|a, b| b.day.cmp(&a.day));

    let mut models: Vec<ModelMetric> = by_model
        .into_iter()
        .map(|(model, acc)| ModelMetric {
            model,
            requests: acc.requests,
            tokens: acc.tokens,
            cost: acc.cost,
        })
        .collect();
    // dominant model first; name breaks token ties so output is deterministic
    models.sort_by(|a, b| b.tokens.cmp(&a.tokens).then_with(|| a.model.cmp(&b.model)));

    Summary {
        totals,
        daily,
        models,
    }
}

/// Share of `value` in `total` as 0..=100; 0 when the total is not positive.
pub(crate) fn percent_of(value: f64, total: f64) -> f64 {
    if total > 0.0 { value / total * 100.0 } else { 0.0 }
}

/// Display rule for percentage values: clamp to "0%"/"100%", otherwise one
/// decimal place with a trailing ".0" dropped.
pub(crate) fn format_percent(value: f64) -> String {
    if value <= 0.0 {
        return "0%".to_string();
    }
    if value >= 100.0 {
        return "100%".to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == rounded.trunc() {
        format!("{}%", rounded as i64)
    } else {
        format!("{rounded:.1}%")
    }
}

/// Display label for a model group; the empty-string model renders as
/// "unlabeled".
pub(crate) fn model_label(model: &str) -> &str {
    if model.is_empty() { "unlabeled" } else { model }
}

/// Deterministic hue for a model name (31x rolling hash over UTF-16 units
/// with i32 wrapping), so a model keeps its color across reloads without a
/// persisted lookup table.
pub(crate) fn model_hue(model: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in model.encode_utf16() {
        hash = (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    hash.unsigned_abs() % 360
}

/// CSS color string for a model name.
pub(crate) fn model_color(model: &str) -> String {
    format!("hsl({}, 70%, 60%)", model_hue(model))
}
