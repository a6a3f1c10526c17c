mod format;
mod json;
mod table;

pub(crate) use format::NumberFormat;
pub(crate) use json::{
    output_daily_json, output_models_json, output_ranges_json, output_summary_json,
};
pub(crate) use table::{
    TableOptions, print_daily_table, print_model_table, print_ranges_table, print_totals,
};
