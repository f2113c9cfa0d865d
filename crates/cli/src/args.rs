//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse `--rule KEY=SPEC` arguments into schema rules.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use envlayer_config::Rule;

#[derive(Parser)]
#[command(name = "envlayer")]
#[command(about = "Load, inspect, validate and edit layered dot-env files", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envlayer files --include-example\n  NODE_ENV=production envlayer print --output json\n  envlayer check --rule PORT=number --rule HOST=string:host --rule DEBUG=bool?\n  envlayer set APP_KEY s3cret --empty-example\n"
)]
pub struct Cli {
    /// Application root containing the dot-env files
    #[arg(long, global = true, env = "ENVLAYER_APP_ROOT", default_value = ".")]
    pub app_root: PathBuf,

    /// Treat a missing ENV_PATH directory as empty instead of failing
    #[arg(long, global = true)]
    pub lenient_env_path: bool,

    /// Resolve references from the same file before the process environment
    #[arg(long, global = true)]
    pub prefer_parsed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the candidate dot-env files, highest priority first
    Files {
        /// Include .env.example as the lowest priority candidate
        #[arg(long)]
        include_example: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FilesFormat::Table)]
        output: FilesFormat,
    },

    /// Print the merged environment
    Print {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = PrintFormat::Dotenv)]
        output: PrintFormat,
    },

    /// Validate the merged environment against rules
    Check {
        /// Validation rule as KEY=SPEC, where SPEC is number, string,
        /// string:email|host|url, boolean or enum:a,b,c (append `?` for optional)
        #[arg(short, long = "rule", value_name = "KEY=SPEC", value_parser = parse_rule_arg, required = true)]
        rules: Vec<(String, Rule)>,
    },

    /// Add or update a key in .env and .env.example
    Set {
        /// Variable name
        key: String,

        /// Variable value
        value: String,

        /// Write an empty value to .env.example
        #[arg(long)]
        empty_example: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilesFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrintFormat {
    Dotenv,
    Json,
}

/// Parse `KEY=SPEC` into a key and its rule.
fn parse_rule_arg(arg: &str) -> Result<(String, Rule), String> {
    let (key, spec) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=SPEC, got \"{arg}\""))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in \"{arg}\""));
    }

    let rule = spec.parse::<Rule>().map_err(|e| e.to_string())?;
    Ok((key.to_string(), rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rule_arg() {
        let (key, rule) = parse_rule_arg("PORT=number").unwrap();
        assert_eq!(key, "PORT");
        assert!(!rule.is_optional());

        let (key, rule) = parse_rule_arg("DEBUG=bool?").unwrap();
        assert_eq!(key, "DEBUG");
        assert!(rule.is_optional());
    }

    #[test]
    fn test_parse_rule_arg_rejects_malformed_input() {
        assert!(parse_rule_arg("PORT").is_err());
        assert!(parse_rule_arg("=number").is_err());
        assert!(parse_rule_arg("PORT=integer").is_err());
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "envlayer",
            "print",
            "--app-root",
            "/srv/app",
            "--prefer-parsed",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.app_root, PathBuf::from("/srv/app"));
        assert!(cli.prefer_parsed);
        assert!(matches!(
            cli.command,
            Commands::Print {
                output: PrintFormat::Json
            }
        ));
    }
}
