//! Free-association ranking.
//!
//! Reduces raw cue→target association rows to a small, strength-ordered set
//! of associated words per target. Rows come from an external norms loader;
//! the ranker only matches, sanity-checks, sorts, and truncates.

use std::cmp::Ordering;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{LexibankError, Result};
use crate::core::record::AssociationRow;
use crate::core::tokens::{normalize, TokenFilter};

/// Configuration for association ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationConfig {
    /// Maximum associated words kept per target
    pub max_associated: usize,

    /// Minimum token length for an associated word
    pub min_token_length: usize,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            max_associated: 5,
            min_token_length: 3,
        }
    }
}

impl AssociationConfig {
    /// Validate configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_associated == 0 {
            return Err(LexibankError::config_field(
                "maximum associated words must be at least 1",
                "association.max_associated",
            ));
        }
        Ok(())
    }
}

/// Ranks raw association rows into an ordered associated-word list.
#[derive(Debug, Clone)]
pub struct AssociationRanker {
    config: AssociationConfig,
    filter: TokenFilter,
}

impl AssociationRanker {
    /// Create a ranker from configuration.
    pub fn new(config: AssociationConfig) -> Result<Self> {
        config.validate()?;
        let filter = TokenFilter::new(config.min_token_length, Vec::new());
        Ok(Self { config, filter })
    }

    /// Rank the rows whose cue matches the target word.
    ///
    /// Output is ordered by strength descending, ties broken by original row
    /// order; duplicates collapse to their highest-strength occurrence; the
    /// target itself never appears. Rows with a non-finite or negative
    /// strength, or a target token failing the sanity checks, are skipped
    /// individually. No matching rows is a valid, silent outcome.
    pub fn rank(&self, target: &str, rows: &[AssociationRow]) -> Vec<String> {
        let target_norm = normalize(target);
        if target_norm.is_empty() {
            return Vec::new();
        }

        let mut matched: Vec<(String, f64)> = rows
            .iter()
            .filter_map(|row| {
                if normalize(&row.cue) != target_norm {
                    return None;
                }
                if !row.strength.is_finite() || row.strength < 0.0 {
                    debug!(cue = %row.cue, target = %row.target, "skipping malformed association row");
                    return None;
                }
                let token = normalize(&row.target);
                if !self.filter.is_well_formed(&token) || token == target_norm {
                    return None;
                }
                Some((token, row.strength))
            })
            .collect();

        // Stable sort: equal strengths keep original file order.
        matched.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let mut ordered: IndexSet<String> = IndexSet::new();
        for (token, _) in matched {
            ordered.insert(token);
            if ordered.len() == self.config.max_associated {
                break;
            }
        }

        ordered.into_iter().collect()
    }
}
