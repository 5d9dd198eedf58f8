//! Command Execution Logic and Resolution Operations
//!
//! This module contains the main command execution logic: loading input
//! bundles and configuration, driving the resolution engine, auditing
//! persisted wordbanks, and configuration file management.

use std::path::Path;

use anyhow::Context;
use console::style;
use tracing::info;

use lexibank_rs::core::pipeline::ResolvedCorpus;
use lexibank_rs::io::wordbank::{InputBundle, WordbankDocument};
use lexibank_rs::phonetics::sound::{SoundGroupDetector, SoundLanguage};
use lexibank_rs::resolvers::distractors::DistractorAuditor;
use lexibank_rs::{LexibankConfig, LexibankEngine};

use crate::cli::args::{AuditArgs, InitConfigArgs, ResolveArgs, ValidateConfigArgs};
use crate::cli::output;

/// Load configuration from an optional path, falling back to defaults.
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<LexibankConfig> {
    match path {
        Some(path) => LexibankConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(LexibankConfig::default()),
    }
}

/// Main resolve command implementation
pub fn resolve_command(args: ResolveArgs, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        output::print_header();
    }

    let mut config = load_configuration(args.config.as_deref())?;
    if let Some(count) = args.count {
        config.distractor.count = count;
    }

    let bundle = InputBundle::load(&args.input)
        .with_context(|| format!("failed to load input bundle {}", args.input.display()))?;

    let language = bundle.language.clone().unwrap_or_else(|| "en".to_string());
    config.sound_language = SoundLanguage::from_code(&language);

    if !quiet {
        println!(
            "  {} {} targets, {} vocabulary entries, {} association rows",
            style("📂").bold(),
            style(bundle.targets.len()).cyan(),
            style(bundle.vocabulary.len()).cyan(),
            style(bundle.associations.len()).cyan(),
        );
        println!();
    }

    let engine = LexibankEngine::new(
        config,
        bundle.vocabulary_pairs(),
        bundle.associations.clone(),
    )?;

    let spinner = (!quiet).then(|| output::resolution_spinner(bundle.targets.len()));
    let results = engine.resolve_batch(&bundle.targets)?;
    if let Some(spinner) = spinner {
        spinner.finish_with_message(format!("{} words resolved", results.len()));
    }

    if !quiet {
        println!();
        output::display_run_summary(&results);
    }

    let document = WordbankDocument::from_records(&results.entries, language);
    document
        .save(&args.out)
        .with_context(|| format!("failed to write wordbank {}", args.out.display()))?;

    info!(path = %args.out.display(), "wordbank written");
    println!(
        "{} {}",
        style("📄 Wordbank:").bold(),
        style(args.out.display()).cyan()
    );

    Ok(())
}

/// Audit command implementation: re-check persisted distractors.
pub fn audit_command(args: AuditArgs, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        output::print_header();
    }

    let config = load_configuration(args.config.as_deref())?;
    let document = WordbankDocument::load(&args.wordbank)
        .with_context(|| format!("failed to load wordbank {}", args.wordbank.display()))?;

    let detector = SoundGroupDetector::new(SoundLanguage::from_code(&document.language));
    let auditor = DistractorAuditor::new(config.distractor.clone(), detector)?;

    // The document itself supplies the peer data for symmetric checks.
    let mut corpus = ResolvedCorpus::new();
    for entry in &document.entries {
        corpus.insert(entry.to_record());
    }

    let mut invalid_total = 0_usize;
    for entry in &document.entries {
        let record = entry.to_record();
        let findings = auditor.audit(&record, &corpus, None);
        invalid_total += findings.iter().filter(|f| !f.is_valid()).count();
        output::display_audit_findings(&record.word, &findings, args.show_valid);
    }

    println!();
    if invalid_total == 0 {
        println!(
            "{} all distractors pass the selection rules",
            style("✅").green()
        );
    } else {
        println!(
            "{} {} distractor(s) violate the selection rules",
            style("❌").red(),
            style(invalid_total).red().bold()
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Print the default configuration as YAML.
pub fn print_default_config() -> anyhow::Result<()> {
    let config = LexibankConfig::default();
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

/// Write a starter configuration file.
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    LexibankConfig::default().to_yaml_file(&args.path)?;
    println!(
        "{} {}",
        style("✅ Configuration written:").green(),
        style(args.path.display()).cyan()
    );
    Ok(())
}

/// Validate a configuration file.
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    match LexibankConfig::from_yaml_file(&args.path).and_then(|config| config.validate()) {
        Ok(()) => {
            println!(
                "{} {} is valid",
                style("✅").green(),
                style(args.path.display()).cyan()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {}", style("❌ Invalid configuration:").red(), err);
            std::process::exit(1);
        }
    }
}
