//! Files command implementation.

use anyhow::{Context, Result};
use envlayer_config::{EnvLoader, SystemEnvironment};

use crate::args::FilesFormat;
use crate::formatters::{FileSummary, format_files_table, format_json};

pub fn run(loader: EnvLoader, format: FilesFormat) -> Result<()> {
    let files = loader
        .load(&SystemEnvironment)
        .with_context(|| format!("Failed to load env files from {}", loader.app_root().display()))?;

    let summaries: Vec<FileSummary> = files.iter().map(FileSummary::from).collect();
    let output = match format {
        FilesFormat::Table => format_files_table(&summaries),
        FilesFormat::Json => format_json(&summaries)?,
    };
    print!("{output}");

    Ok(())
}
