//! Terminal table rendering for summaries, model breakdowns, and quick ranges.

use comfy_table::Cell;

use crate::cli::SortOrder;
use crate::core::{DailyRollup, QuickRanges, Summary, format_percent, model_label, percent_of};
use crate::output::format::{
    NumberFormat, bold_cell, create_styled_table, format_compact, format_cost, format_number,
    header_cell, right_cell,
};
use crate::utils::Timezone;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
}

fn ordered_daily<'a>(summary: &'a Summary, order: SortOrder) -> Vec<&'a DailyRollup> {
    let mut rows: Vec<&DailyRollup> = summary.daily.iter().collect();
    // rollups arrive most-recent-first
    if order == SortOrder::Asc {
        rows.reverse();
    }
    rows
}

pub(crate) fn print_daily_table(summary: &Summary, opts: TableOptions) {
    let nf = opts.number_format;
    let mut table = create_styled_table();

    if opts.compact {
        table.set_header(vec![
            header_cell("Date", opts.use_color),
            header_cell("Reqs", opts.use_color),
            header_cell("Tokens", opts.use_color),
            header_cell("Cost", opts.use_color),
        ]);
        for day in ordered_daily(summary, opts.order) {
            table.add_row(vec![
                Cell::new(&day.day),
                right_cell(&format_compact(day.requests, nf), None, false),
                right_cell(&format_compact(day.tokens, nf), None, false),
                right_cell(&format_cost(day.cost), None, false),
            ]);
        }
        table.add_row(vec![
            bold_cell("Total"),
            right_cell(&format_compact(summary.totals.requests, nf), None, true),
            right_cell(&format_compact(summary.totals.total_tokens, nf), None, true),
            right_cell(&format_cost(summary.totals.cost), None, true),
        ]);
    } else {
        table.set_header(vec![
            header_cell("Date", opts.use_color),
            header_cell("Requests", opts.use_color),
            header_cell("Req %", opts.use_color),
            header_cell("Tokens", opts.use_color),
            header_cell("Tok %", opts.use_color),
            header_cell("Cost", opts.use_color),
            header_cell("Cost %", opts.use_color),
        ]);
        for day in ordered_daily(summary, opts.order) {
            table.add_row(vec![
                Cell::new(&day.day),
                right_cell(&format_number(day.requests, nf), None, false),
                right_cell(&format_percent(day.requests_pct), None, false),
                right_cell(&format_number(day.tokens, nf), None, false),
                right_cell(&format_percent(day.tokens_pct), None, false),
                right_cell(&format_cost(day.cost), None, false),
                right_cell(&format_percent(day.cost_pct), None, false),
            ]);
        }
        table.add_row(vec![
            bold_cell("Total"),
            right_cell(&format_number(summary.totals.requests, nf), None, true),
            right_cell("", None, false),
            right_cell(&format_number(summary.totals.total_tokens, nf), None, true),
            right_cell("", None, false),
            right_cell(&format_cost(summary.totals.cost), None, true),
            right_cell("", None, false),
        ]);
    }

    println!("{table}");
}

pub(crate) fn print_model_table(summary: &Summary, opts: TableOptions) {
    let nf = opts.number_format;
    let totals = &summary.totals;
    let mut table = create_styled_table();

    if opts.compact {
        table.set_header(vec![
            header_cell("Model", opts.use_color),
            header_cell("Reqs", opts.use_color),
            header_cell("Tokens", opts.use_color),
            header_cell("Cost", opts.use_color),
        ]);
        for metric in &summary.models {
            table.add_row(vec![
                Cell::new(model_label(&metric.model)),
                right_cell(&format_compact(metric.requests, nf), None, false),
                right_cell(&format_compact(metric.tokens, nf), None, false),
                right_cell(&format_cost(metric.cost), None, false),
            ]);
        }
    } else {
        table.set_header(vec![
            header_cell("Model", opts.use_color),
            header_cell("Requests", opts.use_color),
            header_cell("Req %", opts.use_color),
            header_cell("Tokens", opts.use_color),
            header_cell("Tok %", opts.use_color),
            header_cell("Cost", opts.use_color),
            header_cell("Cost %", opts.use_color),
        ]);
        for metric in &summary.models {
            table.add_row(vec![
                Cell::new(model_label(&metric.model)),
                right_cell(&format_number(metric.requests, nf), None, false),
                right_cell(
                    &format_percent(percent_of(metric.requests as f64, totals.requests as f64)),
                    None,
                    false,
                ),
                right_cell(&format_number(metric.tokens, nf), None, false),
                right_cell(
                    &format_percent(percent_of(metric.tokens as f64, totals.total_tokens as f64)),
                    None,
                    false,
                ),
                right_cell(&format_cost(metric.cost), None, false),
                right_cell(&format_percent(percent_of(metric.cost, totals.cost)), None, false),
            ]);
        }
        table.add_row(vec![
            bold_cell("Total"),
            right_cell(&format_number(totals.requests, nf), None, true),
            right_cell("", None, false),
            right_cell(&format_number(totals.total_tokens, nf), None, true),
            right_cell("", None, false),
            right_cell(&format_cost(totals.cost), None, true),
            right_cell("", None, false),
        ]);
    }

    println!("{table}");
}

pub(crate) fn print_totals(summary: &Summary, opts: TableOptions) {
    let nf = opts.number_format;
    let totals = &summary.totals;
    let avg_tokens = if totals.requests > 0 {
        (totals.total_tokens as f64 / totals.requests as f64).round() as i64
    } else {
        0
    };

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Metric", opts.use_color),
        header_cell("Value", opts.use_color),
    ]);
    let rows: Vec<(&str, String)> = vec![
        ("Requests", format_number(totals.requests, nf)),
        ("Total Tokens", format_number(totals.total_tokens, nf)),
        ("Avg Tokens / Request", format_number(avg_tokens, nf)),
        (
            "Input (w/ Cache Write)",
            format_number(totals.input_with_cache, nf),
        ),
        (
            "Input (w/o Cache Write)",
            format_number(totals.input_no_cache, nf),
        ),
        ("Cache Read", format_number(totals.cache_read, nf)),
        ("Output Tokens", format_number(totals.output_tokens, nf)),
        ("Cost", format_cost(totals.cost)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right_cell(&value, None, false)]);
    }
    println!("{table}");
}

pub(crate) fn print_ranges_table(ranges: &QuickRanges, timezone: Timezone, opts: TableOptions) {
    for (title, options) in [("Days", &ranges.days), ("Months", &ranges.months)] {
        let mut table = create_styled_table();
        table.set_header(vec![
            header_cell(title, opts.use_color),
            header_cell("From", opts.use_color),
            header_cell("To", opts.use_color),
        ]);
        for option in options {
            table.add_row(vec![
                Cell::new(&option.label),
                Cell::new(
                    timezone
                        .to_fixed_offset(option.start)
                        .format("%Y-%m-%d %H:%M:%S%.3f")
                        .to_string(),
                ),
                Cell::new(
                    timezone
                        .to_fixed_offset(option.end)
                        .format("%Y-%m-%d %H:%M:%S%.3f")
                        .to_string(),
                ),
            ]);
        }
        println!("{table}");
    }
}
