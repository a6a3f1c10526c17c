//! Core module - the pure CSV parsing and aggregation pipeline

mod csv;
mod filter;
mod record;
mod summary;

pub(crate) use filter::{
    DateRange, QuickRangeOption, QuickRanges, apply_date_range, apply_model_filter,
    build_quick_ranges, day_span, normalize_range,
};
pub(crate) use record::parse_usage_csv;
pub(crate) use summary::{
    DailyRollup, Summary, format_percent, model_color, model_label, percent_of, summarize,
};
