//! ScentValue - perfume batch valuation from bottle weights
//!
//! A CLI tool that prices bottles by net weight, keeps a pending batch, and
//! exports it as text, CSV, Excel or PDF.

mod cli;
mod commands;
mod logging;
mod output;
mod shell;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = commands::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
