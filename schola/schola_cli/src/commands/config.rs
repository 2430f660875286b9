//! Configuration checking.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

use schola_core::SimulationConfig;

/// Arguments for the check-config command
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Path to a TOML configuration file
    #[clap(long)]
    pub config: PathBuf,
}

/// Warn about a configuration that is valid but cannot be satisfied.
pub fn warn_if_unattainable(config: &SimulationConfig) {
    if !config.quota_attainable() {
        warn!(
            required_lessons = config.required_lessons,
            classrooms = config.classrooms,
            "students can never complete: more lessons are required than there are classrooms"
        );
    }
}

/// Implementation of the check-config command
pub fn execute(args: &CheckConfigArgs) -> Result<()> {
    let config = SimulationConfig::from_file(&args.config)
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;
    warn_if_unattainable(&config);

    println!("Configuration is valid: {}", args.config.display());
    print!("{}", config.to_toml_string()?);
    Ok(())
}
