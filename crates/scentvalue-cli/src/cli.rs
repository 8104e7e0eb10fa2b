//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use scentvalue_types::{OutputFormat, ScannerMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scentvalue")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Perfume batch valuation by bottle weight")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Model name override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Ledger file override
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// What `copy` puts on the clipboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CopyTarget {
    /// Numbered batch summary with the total
    #[default]
    Text,
    /// CSV with header row
    Csv,
    /// One entry (the newest unless --id is given)
    Item,
}

/// Export file type
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Xlsx,
    Pdf,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a weight expression and show its price
    Resolve {
        /// Weight expression (e.g. "1kg136", "1.2kg", "500g+20g")
        expression: String,
    },

    /// Price a bottle and add it to the batch
    Add {
        /// Weight expression (e.g. "1kg136", "950")
        weight: String,

        /// Fragrance name (defaults to "Item N")
        #[arg(long, short = 'l')]
        label: Option<String>,
    },

    /// Show the pending batch, newest first
    List,

    /// Show the batch total
    Total,

    /// Remove every entry from the batch
    Clear,

    /// Copy the batch to the clipboard
    Copy {
        /// What to copy
        #[arg(value_enum, default_value_t = CopyTarget::Text)]
        target: CopyTarget,

        /// Entry id for `item`
        #[arg(long)]
        id: Option<String>,

        /// Print instead of using the clipboard
        #[arg(long)]
        stdout: bool,
    },

    /// Export the batch to a file
    Export {
        /// File type
        #[arg(value_enum)]
        kind: ExportKind,

        /// Output directory. Uses config value if not specified.
        #[arg(long, short = 'o')]
        dir: Option<PathBuf>,
    },

    /// Ask the fragrance assistant a question
    Ask {
        /// Question (defaults to the batch export help question)
        question: Vec<String>,
    },

    /// Take a photo with the configured camera command and read it
    Scan {
        /// Scale display (single) or document listing (batch)
        #[arg(long, short = 'm', value_enum, default_value_t = ScannerMode::Single)]
        mode: ScannerMode,
    },

    /// Read an image file or data URL
    Upload {
        /// Image path or data: URL
        source: String,

        /// Scale display (single) or document listing (batch)
        #[arg(long, short = 'm', value_enum, default_value_t = ScannerMode::Batch)]
        mode: ScannerMode,
    },

    /// Interactive session (ledger kept in memory unless --ledger is given)
    Shell,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set bottle tare in grams
        #[arg(long)]
        set_tare: Option<f64>,

        /// Set price per net gram
        #[arg(long)]
        set_rate: Option<f64>,

        /// Set currency code
        #[arg(long)]
        set_currency: Option<String>,

        /// Set model
        #[arg(long)]
        set_model: Option<String>,

        /// Set API base URL
        #[arg(long)]
        set_api_base_url: Option<String>,

        /// Set API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Set camera command ({output} {width} {height} {facing} placeholders)
        #[arg(long)]
        set_camera_command: Option<String>,

        /// Set preferred camera width
        #[arg(long)]
        set_camera_width: Option<u32>,

        /// Set preferred camera height
        #[arg(long)]
        set_camera_height: Option<u32>,

        /// Set clipboard command
        #[arg(long)]
        set_clipboard_command: Option<String>,

        /// Set export directory
        #[arg(long)]
        set_export_dir: Option<PathBuf>,

        /// Set ledger file path
        #[arg(long)]
        set_ledger_path: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
