//! Multi-source category tag resolution.
//!
//! Categories are semantically reliable only for concrete referents, so the
//! resolver is gated on an eligible part-of-speech set: outside it the result
//! is unconditionally empty, by design rather than post-hoc filtering. Within
//! it, tags from all sources are merged verbatim — no relabeling, synonym
//! merging, or priority reordering between sources.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::Result;
use crate::core::record::CategoryTag;
use crate::core::tokens::PartOfSpeech;

/// Configuration for category resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Parts of speech eligible to carry categories
    pub eligible_pos: IndexSet<PartOfSpeech>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        // Strict-category profile: only nouns receive categories.
        Self {
            eligible_pos: IndexSet::from([PartOfSpeech::Noun]),
        }
    }
}

impl CategoryConfig {
    /// Validate configuration settings.
    ///
    /// An empty eligible set is a valid (maximally strict) configuration.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Merges per-source category tags into the resolved category sequence.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    config: CategoryConfig,
}

impl CategoryResolver {
    /// Create a resolver from configuration.
    pub fn new(config: CategoryConfig) -> Self {
        Self { config }
    }

    /// Resolve the category sequence for one target word.
    ///
    /// Returns an empty sequence unconditionally when the part of speech is
    /// not eligible. Otherwise merges tags from all sources, deduplicating
    /// identical `(source, label)` pairs while preserving first-seen order;
    /// labels are reproduced exactly as the sources reported them. Tags with
    /// an empty source or label are malformed and skipped.
    pub fn resolve(
        &self,
        target: &str,
        part_of_speech: PartOfSpeech,
        raw_tags: &[CategoryTag],
    ) -> Vec<CategoryTag> {
        if !self.config.eligible_pos.contains(&part_of_speech) {
            debug!(word = %target, pos = %part_of_speech, "part of speech not category-eligible");
            return Vec::new();
        }

        let mut merged: IndexSet<CategoryTag> = IndexSet::new();
        for tag in raw_tags {
            if tag.source.trim().is_empty() || tag.label.trim().is_empty() {
                continue;
            }
            merged.insert(tag.clone());
        }

        merged.into_iter().collect()
    }
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new(CategoryConfig::default())
    }
}
