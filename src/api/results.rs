//! Resolution results and run summary structures.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::record::{LexicalRecord, ReviewReason};

/// High-level results of one resolution run for public API consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResults {
    /// Summary of the run
    pub summary: RunSummary,

    /// Resolved records, in input order
    pub entries: Vec<LexicalRecord>,
}

/// Summary of a resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of words resolved
    pub words_resolved: usize,

    /// Number of records flagged for review
    pub needing_review: usize,

    /// Total distractors assigned across the run
    pub total_distractors: usize,

    /// Distribution of review reasons by label
    pub review_distribution: HashMap<String, usize>,

    /// Size of the run's frequency vocabulary
    pub vocabulary_size: usize,

    /// Timestamp when the summary was produced
    pub generated_at: DateTime<Utc>,
}

impl ResolutionResults {
    /// Build results and summary from resolved records.
    pub fn from_records(entries: Vec<LexicalRecord>, vocabulary_size: usize) -> Self {
        let needing_review = entries.iter().filter(|r| r.needs_review).count();
        let total_distractors = entries.iter().map(|r| r.distractors.len()).sum();

        let mut review_distribution: HashMap<String, usize> = HashMap::new();
        for record in &entries {
            for reason in &record.review_reasons {
                *review_distribution
                    .entry(reason_label(reason).to_string())
                    .or_insert(0) += 1;
            }
        }

        Self {
            summary: RunSummary {
                words_resolved: entries.len(),
                needing_review,
                total_distractors,
                review_distribution,
                vocabulary_size,
                generated_at: Utc::now(),
            },
            entries,
        }
    }

    /// Empty results for a run over no words.
    pub fn empty(vocabulary_size: usize) -> Self {
        Self::from_records(Vec::new(), vocabulary_size)
    }

    /// Number of resolved records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the run resolved no words.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records flagged for review, in input order.
    pub fn needing_review(&self) -> impl Iterator<Item = &LexicalRecord> {
        self.entries.iter().filter(|record| record.needs_review)
    }
}

fn reason_label(reason: &ReviewReason) -> &'static str {
    match reason {
        ReviewReason::NoRelationships => "no_relationships",
        ReviewReason::NoAssociations => "no_associations",
        ReviewReason::InsufficientDistractors { .. } => "insufficient_distractors",
    }
}
