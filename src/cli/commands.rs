//! CLI subcommand definitions

use clap::Subcommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub(crate) enum Commands {
    /// Per-day usage table (default)
    Daily,
    /// Per-model breakdown with request/token/cost shares
    Models,
    /// Overall totals for the current selection
    Summary,
    /// Quick date ranges derived from the loaded data
    Ranges,
    /// Today's usage
    Today,
}

impl Commands {
    /// Replace `--since`/`--until` with today's local day.
    pub(crate) fn needs_today_filter(self) -> bool {
        matches!(self, Commands::Today)
    }
}
