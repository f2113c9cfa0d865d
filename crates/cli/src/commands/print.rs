//! Print command implementation.

use anyhow::{Context, Result};
use envlayer_config::{EnvProcessor, SystemEnvironment};

use crate::args::PrintFormat;
use crate::formatters::{format_dotenv, format_json};

pub fn run(processor: &EnvProcessor, format: PrintFormat) -> Result<()> {
    let values = processor
        .process(&SystemEnvironment)
        .with_context(|| format!("Failed to load env files from {}", processor.app_root().display()))?;

    tracing::debug!(keys = values.len(), "Merged env files");

    let output = match format {
        PrintFormat::Dotenv => format_dotenv(&values)?,
        PrintFormat::Json => format_json(&values)?,
    };
    print!("{output}");

    Ok(())
}
