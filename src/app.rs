use std::fs;

use chrono::Utc;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::core::{
    DateRange, apply_date_range, apply_model_filter, build_quick_ranges, day_span,
    normalize_range, parse_usage_csv, summarize,
};
use crate::error::AppError;
use crate::output::{
    NumberFormat, TableOptions, output_daily_json, output_models_json, output_ranges_json,
    output_summary_json, print_daily_table, print_model_table, print_ranges_table, print_totals,
};
use crate::utils::{Timezone, parse_date};

/// Expand the CLI date filter into a concrete UTC range: `--since` starts
/// at that day's local midnight, `--until` ends a millisecond before the
/// next. `today` pins both to the current local day.
fn build_range(cli: &Cli, command: Commands, tz: Timezone) -> Result<DateRange, AppError> {
    let (since, until) = if command.needs_today_filter() {
        let today = tz.local_date(Utc::now());
        (Some(today), Some(today))
    } else {
        let since = cli.since.as_deref().map(parse_date).transpose()?;
        let until = cli.until.as_deref().map(parse_date).transpose()?;
        (since, until)
    };

    Ok(DateRange {
        start: since.map(|day| day_span(day, tz).0),
        end: until.map(|day| day_span(day, tz).1),
    })
}

pub(crate) fn run(cli: Cli) -> Result<(), AppError> {
    let cli = cli.with_config(&Config::load());
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Daily);

    let path = cli.file.clone().ok_or(AppError::NoFile)?;
    let text = fs::read_to_string(&path).map_err(|source| AppError::FileRead {
        path: path.clone(),
        source,
    })?;

    let records = parse_usage_csv(&text, timezone);
    let loaded = records.len();

    let opts = TableOptions {
        order: cli.order,
        use_color: cli.use_color(),
        compact: cli.compact,
        number_format,
    };

    // quick ranges derive from the full unfiltered set
    if command == Commands::Ranges {
        let ranges = build_quick_ranges(&records, timezone);
        if cli.json {
            println!("{}", output_ranges_json(&ranges));
        } else if ranges.days.is_empty() {
            println!("No usage records in {}.", path.display());
        } else {
            print_ranges_table(&ranges, timezone, opts);
        }
        return Ok(());
    }

    let range = normalize_range(build_range(&cli, command, timezone)?);
    let filtered = apply_model_filter(apply_date_range(records, &range), &cli.models);

    if filtered.is_empty() {
        if loaded == 0 {
            println!("No usage records in {}.", path.display());
        } else {
            println!("No data for this selection.");
        }
        return Ok(());
    }

    let summary = summarize(&filtered, timezone);

    match command {
        Commands::Daily | Commands::Today => {
            if cli.json {
                println!("{}", output_daily_json(&summary, cli.order));
            } else {
                print_daily_table(&summary, opts);
            }
        }
        Commands::Models => {
            if cli.json {
                println!("{}", output_models_json(&summary));
            } else {
                print_model_table(&summary, opts);
            }
        }
        Commands::Summary => {
            if cli.json {
                println!("{}", output_summary_json(&summary));
            } else {
                print_totals(&summary, opts);
            }
        }
        // handled above
        Commands::Ranges => {}
    }

    Ok(())
}
