//! Command dispatch logic.
//!
//! Responsibilities:
//! - Build the loader and processor from global CLI options.
//! - Route parsed CLI arguments to the appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Exit code mapping (see `error` module).

use anyhow::Result;
use envlayer_config::{EnvLoader, EnvProcessor, OverridePathPolicy};

use crate::args::{Cli, Commands};
use crate::commands;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    let policy = if cli.lenient_env_path {
        OverridePathPolicy::Lenient
    } else {
        OverridePathPolicy::Strict
    };

    let mut processor = EnvProcessor::new(&cli.app_root).with_override_policy(policy);
    if cli.prefer_parsed {
        processor = processor.prefer_parsed();
    }

    match cli.command {
        Commands::Files {
            include_example,
            output,
        } => {
            let loader = EnvLoader::new(&cli.app_root)
                .include_example(include_example)
                .with_override_policy(policy);
            commands::files::run(loader, output)?;
        }
        Commands::Print { output } => {
            commands::print::run(&processor, output)?;
        }
        Commands::Check { rules } => {
            commands::check::run(&processor, rules)?;
        }
        Commands::Set {
            key,
            value,
            empty_example,
        } => {
            commands::set::run(&cli.app_root, &key, &value, empty_example)?;
        }
    }

    Ok(())
}
