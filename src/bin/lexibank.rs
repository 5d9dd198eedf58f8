//! Lexibank CLI - Wordbank Curation for Language-Therapy Exercises
//!
//! This binary drives the resolution engine over pre-fetched lexical signal:
//! it loads input bundles and configuration, resolves batches of words into
//! wordbank documents, and audits existing wordbanks against the distractor
//! selection rules.

use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Execute command
    match cli.command {
        Commands::Resolve(args) => {
            cli::resolve_command(args, cli.quiet)?;
        }
        Commands::Audit(args) => {
            cli::audit_command(args, cli.quiet)?;
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config()?;
        }
        Commands::InitConfig(args) => {
            cli::init_config(args)?;
        }
        Commands::ValidateConfig(args) => {
            cli::validate_config(args)?;
        }
    }

    Ok(())
}
