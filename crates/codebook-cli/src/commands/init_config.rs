//! Init-config command implementation.

use crate::cli::InitConfigArgs;
use crate::config::MinerConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::PathBuf;

/// Execute the init-config command.
pub fn execute_init_config(args: InitConfigArgs, formatter: &Formatter) -> Result<()> {
    let path = write_default_config(args.path, args.force)?;
    println!("{}", formatter.success(&format!("Wrote default configuration to {}", path.display())));
    Ok(())
}

/// Write the default configuration, refusing to clobber unless `force`.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => MinerConfig::default_path()?,
    };
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    MinerConfig::default().save(&path)?;
    Ok(path)
}
