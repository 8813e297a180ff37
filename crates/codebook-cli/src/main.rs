//! Codebook Miner CLI - find and rank survey variables in codebook documents.

use clap::Parser;
use codebook_cli::commands;
use codebook_cli::{Cli, Command, Formatter, MinerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only results
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> codebook_cli::Result<()> {
    // init-config must work even when the existing file is broken
    if let Command::InitConfig(args) = cli.command {
        let formatter = Formatter::new(codebook_cli::OutputFormat::Table, !cli.no_color);
        return commands::execute_init_config(args, &formatter);
    }

    let config = MinerConfig::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Scan(args) => commands::execute_scan(args, &config, &formatter).await?,
        Command::Rules => commands::execute_rules(&config, &formatter)?,
        Command::InitConfig(_) => {}
    }

    Ok(())
}
