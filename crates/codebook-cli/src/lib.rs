//! Codebook Miner CLI library.
//!
//! Configuration loading, the extract/aggregate/score pipeline, command
//! execution and output formatting for the `codebook` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Command};
pub use config::{MinerConfig, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use pipeline::{collect_documents, window, Pipeline, ScanReport};
