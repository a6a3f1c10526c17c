//! JSON renditions of the same views the tables print.
//!
//! Rows carry raw values plus the percentage shares the chart layer needs;
//! model rows include the deterministic color assignment.

use crate::cli::SortOrder;
use crate::core::{QuickRanges, Summary, model_color, model_label, percent_of};

pub(crate) fn output_daily_json(summary: &Summary, order: SortOrder) -> String {
    let mut rows: Vec<serde_json::Value> = summary
        .daily
        .iter()
        .map(|day| {
            serde_json::json!({
                "date": day.day,
                "requests": day.requests,
                "requests_percent": day.requests_pct,
                "total_tokens": day.tokens,
                "tokens_percent": day.tokens_pct,
                "cost": day.cost,
                "cost_percent": day.cost_pct,
            })
        })
        .collect();
    if order == SortOrder::Asc {
        rows.reverse();
    }
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn output_models_json(summary: &Summary) -> String {
    let totals = &summary.totals;
    let rows: Vec<serde_json::Value> = summary
        .models
        .iter()
        .map(|metric| {
            serde_json::json!({
                "model": metric.model,
                "label": model_label(&metric.model),
                "color": model_color(&metric.model),
                "requests": metric.requests,
                "requests_percent": percent_of(metric.requests as f64, totals.requests as f64),
                "total_tokens": metric.tokens,
                "tokens_percent": percent_of(metric.tokens as f64, totals.total_tokens as f64),
                "cost": metric.cost,
                "cost_percent": percent_of(metric.cost, totals.cost),
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn output_summary_json(summary: &Summary) -> String {
    let totals = &summary.totals;
    let value = serde_json::json!({
        "requests": totals.requests,
        "total_tokens": totals.total_tokens,
        "input_with_cache": totals.input_with_cache,
        "input_no_cache": totals.input_no_cache,
        "cache_read": totals.cache_read,
        "output_tokens": totals.output_tokens,
        "cost": totals.cost,
        "days": summary.daily.len(),
        "models": summary.models.len(),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

pub(crate) fn output_ranges_json(ranges: &QuickRanges) -> String {
    let to_rows = |options: &[crate::core::QuickRangeOption]| -> Vec<serde_json::Value> {
        options
            .iter()
            .map(|option| {
                serde_json::json!({
                    "key": option.key,
                    "label": option.label,
                    "start": option.start.to_rfc3339(),
                    "end": option.end.to_rfc3339(),
                })
            })
            .collect()
    };
    let value = serde_json::json!({
        "days": to_rows(&ranges.days),
        "months": to_rows(&ranges.months),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}
