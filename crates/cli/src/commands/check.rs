//! Check command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use envlayer_config::{Env, EnvProcessor, Rule, Schema, SystemEnvironment, ValidatedEnv};

use crate::formatters::format_json;

pub fn run(processor: &EnvProcessor, rules: Vec<(String, Rule)>) -> Result<()> {
    let schema: Schema = rules.into_iter().collect();

    let env = Env::create_with(processor, &schema, Arc::new(SystemEnvironment))
        .context("Environment check failed")?;

    // Only the checked keys are printed; the rest of the environment may hold secrets.
    let checked: ValidatedEnv = schema
        .iter()
        .filter_map(|(key, _)| env.values().get(key).map(|value| (key.to_string(), value.clone())))
        .collect();

    print!("{}", format_json(&checked)?);
    Ok(())
}
