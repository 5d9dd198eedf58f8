//! Summary Formatting and Display Functions
//!
//! This module contains the console output helpers used by the CLI commands:
//! headers, progress indication, run summaries, and audit finding display.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use lexibank_rs::resolvers::distractors::DistractorFinding;
use lexibank_rs::ResolutionResults;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the CLI banner.
pub fn print_header() {
    println!();
    println!(
        "{} {}",
        style("📚 Lexibank").bold().cyan(),
        style(format!("v{VERSION}")).dim()
    );
    println!("{}", style("Relationship & Distractor Resolution Engine").dim());
    println!();
}

/// Spinner shown while a batch resolves.
pub fn resolution_spinner(word_count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(format!("Resolving {word_count} words..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Display the run summary block.
pub fn display_run_summary(results: &ResolutionResults) {
    let summary = &results.summary;

    println!("{}", style("✅ Resolution Complete").green().bold());
    println!();
    println!(
        "  {} {}",
        style("🔤 Words resolved:").bold(),
        style(summary.words_resolved).cyan()
    );
    println!(
        "  {} {}",
        style("🎯 Distractors assigned:").bold(),
        style(summary.total_distractors).cyan()
    );
    println!(
        "  {} {}",
        style("📖 Vocabulary size:").bold(),
        style(summary.vocabulary_size).cyan()
    );

    if summary.needing_review == 0 {
        println!("  {} {}", style("🟢 Needing review:").bold(), style(0).green());
    } else {
        println!(
            "  {} {}",
            style("🟡 Needing review:").bold(),
            style(summary.needing_review).yellow()
        );
        for (reason, count) in &summary.review_distribution {
            println!("     {} {}: {}", style("•").dim(), reason, count);
        }
    }
    println!();
}

/// Display the audit findings for one word.
pub fn display_audit_findings(word: &str, findings: &[DistractorFinding], show_valid: bool) {
    let invalid: Vec<&DistractorFinding> =
        findings.iter().filter(|f| !f.is_valid()).collect();

    if invalid.is_empty() && !show_valid {
        return;
    }

    println!("{} {}", style("🔎").bold(), style(word).bold());
    for finding in findings {
        if finding.is_valid() {
            if show_valid {
                println!("   {} {}", style("✓").green(), finding.word);
            }
            continue;
        }
        for violation in &finding.violations {
            println!(
                "   {} {} — {}",
                style("✗").red(),
                style(&finding.word).red(),
                violation
            );
        }
    }
}
