//! CLI Argument Structures and Configuration
//!
//! This module contains all CLI argument definitions and command structures
//! used by the Lexibank CLI binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexical wordbank curation for language-therapy exercises
#[derive(Parser)]
#[command(name = "lexibank")]
#[command(version = VERSION)]
#[command(about = "📚 Lexibank - Relationship & Distractor Resolution Engine")]
#[command(long_about = "
Resolve raw multi-source lexical signal into high-confidence wordbank entries:
validated synonym/antonym sets, ranked associations, merged categories, and
therapy-safe multiple-choice distractors.

Common Usage:

  # Resolve an input bundle into a wordbank
  lexibank resolve signals.json --out wordbank.json

  # Resolve with a custom configuration
  lexibank resolve signals.json --config lexibank.yml

  # Audit an existing wordbank's distractors against the selection rules
  lexibank audit wordbank.json

  # Write a starter configuration file
  lexibank init-config

Learn more: https://github.com/sibyllinesoft/lexibank
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress decorative output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an input bundle into a wordbank document
    Resolve(ResolveArgs),

    /// Audit an existing wordbank's distractors against the selection rules
    Audit(AuditArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a Lexibank configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Arguments for the resolve command
#[derive(Args)]
pub struct ResolveArgs {
    /// Input bundle JSON (targets, vocabulary, association norms)
    pub input: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output wordbank path
    #[arg(short, long, default_value = "wordbank.json")]
    pub out: PathBuf,

    /// Override the configured distractor count per word
    #[arg(long)]
    pub count: Option<usize>,
}

/// Arguments for the audit command
#[derive(Args)]
pub struct AuditArgs {
    /// Wordbank JSON document to audit
    pub wordbank: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also list distractors that passed every check
    #[arg(long)]
    pub show_valid: bool,
}

/// Arguments for the init-config command
#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the configuration file
    #[arg(default_value = "lexibank.yml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the validate-config command
#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub path: PathBuf,
}
