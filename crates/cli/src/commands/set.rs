//! Set command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use envlayer_config::{EnvEditor, SystemEnvironment};

pub fn run(app_root: &Path, key: &str, value: &str, empty_example: bool) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\n']) || key.trim() != key {
        bail!("Invalid variable name \"{key}\"");
    }

    let mut editor = EnvEditor::create(app_root, &SystemEnvironment)
        .with_context(|| format!("Failed to load env files from {}", app_root.display()))?;

    if editor.files().is_empty() {
        bail!(
            "No .env or .env.example file found in {}",
            app_root.display()
        );
    }

    editor.add(key, value, empty_example);
    editor.save().context("Failed to save env files")?;

    for file in editor.files() {
        eprintln!("Updated {}", file.path.display());
    }
    Ok(())
}
