//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Codebook Miner - find survey variables in codebook documents.
#[derive(Debug, Parser)]
#[command(name = "codebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CODEBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract, deduplicate and rank variables from codebook files
    Scan(ScanArgs),

    /// Print the active taxonomy and scoring rules
    Rules,

    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Files or directories to scan (directories are walked recursively)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Restrict CSV scans to these columns (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Show only the N highest-scoring variables
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Hide variables scoring below this value
    #[arg(long)]
    pub min_score: Option<u32>,

    /// Extract documents on parallel worker threads
    #[arg(long)]
    pub concurrent: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print per-category counts after the results
    #[arg(long)]
    pub summary: bool,

    /// Print keyword hits from text and CSV scans
    #[arg(long)]
    pub hits: bool,
}

/// Arguments for the init-config command.
#[derive(Debug, Parser)]
pub struct InitConfigArgs {
    /// Where to write the file (defaults to ~/.codebook/config.toml)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Csv => crate::config::OutputFormat::Csv,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
