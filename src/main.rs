mod app;
mod cli;
mod config;
mod core;
mod error;
mod output;
mod utils;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = app::run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
