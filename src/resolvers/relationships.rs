//! Cross-source synonym/antonym validation.
//!
//! Raw candidates from independent thesaurus-style sources are filtered
//! through the shared quality predicate and accepted under a configurable
//! profile: agreement (multi-source corroboration required) or single-source
//! (any source suffices, better-corroborated candidates first). The policy is
//! a configuration choice of the surrounding generator — no word ever gets a
//! bespoke allow/deny list here.

use std::cmp::Reverse;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{LexibankError, Result};
use crate::core::record::{RawCandidate, RelationKind, ValidatedRelationshipSet};
use crate::core::tokens::{normalize, PartOfSpeech, TokenFilter};

/// Acceptance policy for raw relationship candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum AcceptanceProfile {
    /// Accept a candidate only when at least `min_sources` distinct sources
    /// reported it for the relation kind.
    Agreement {
        /// Minimum number of distinct corroborating sources (≥ 2)
        min_sources: usize,
    },

    /// Accept a candidate from any single source; candidates backed by more
    /// sources are ordered first.
    SingleSource,
}

impl Default for AcceptanceProfile {
    fn default() -> Self {
        Self::Agreement { min_sources: 2 }
    }
}

/// Configuration for relationship validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Acceptance profile applied uniformly to every word
    #[serde(default)]
    pub profile: AcceptanceProfile,

    /// Minimum candidate token length
    pub min_token_length: usize,

    /// Maximum accepted relationships per kind (bounds exercise complexity)
    pub max_relations: usize,

    /// Obscurity stoplist: rare/archaic tokens rejected outright
    #[serde(default)]
    pub stoplist: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            profile: AcceptanceProfile::default(),
            min_token_length: 3,
            max_relations: 6,
            stoplist: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Validate configuration settings.
    pub fn validate(&self) -> Result<()> {
        if let AcceptanceProfile::Agreement { min_sources } = self.profile {
            if min_sources < 2 {
                return Err(LexibankError::config_field(
                    "agreement profile requires at least 2 corroborating sources",
                    "validation.profile.min_sources",
                ));
            }
        }
        if self.min_token_length == 0 {
            return Err(LexibankError::config_field(
                "minimum token length must be at least 1",
                "validation.min_token_length",
            ));
        }
        if self.max_relations == 0 {
            return Err(LexibankError::config_field(
                "maximum relationships per kind must be at least 1",
                "validation.max_relations",
            ));
        }
        Ok(())
    }
}

/// Validates raw synonym/antonym candidates into accepted sets.
#[derive(Debug, Clone)]
pub struct RelationshipValidator {
    config: ValidationConfig,
    filter: TokenFilter,
}

impl RelationshipValidator {
    /// Create a validator from configuration.
    pub fn new(config: ValidationConfig) -> Result<Self> {
        config.validate()?;
        let filter = TokenFilter::new(config.min_token_length, config.stoplist.iter().cloned());
        Ok(Self { config, filter })
    }

    /// Validate raw candidates for one target word.
    ///
    /// Candidates failing the quality predicate are skipped individually;
    /// an empty result is a legitimate outcome and sets no flags — the
    /// caller decides review policy.
    pub fn validate(
        &self,
        target: &str,
        part_of_speech: PartOfSpeech,
        raw_synonyms: &[RawCandidate],
        raw_antonyms: &[RawCandidate],
    ) -> ValidatedRelationshipSet {
        let target_norm = normalize(target);

        let synonyms = self.accept(&target_norm, raw_synonyms, RelationKind::Synonym);
        let antonyms = self.accept(&target_norm, raw_antonyms, RelationKind::Antonym);

        debug!(
            word = %target_norm,
            pos = %part_of_speech,
            synonyms = synonyms.len(),
            antonyms = antonyms.len(),
            "relationship candidates validated"
        );

        ValidatedRelationshipSet { synonyms, antonyms }
    }

    /// Apply the quality predicate and the acceptance profile to one
    /// candidate list.
    fn accept(
        &self,
        target: &str,
        raw: &[RawCandidate],
        kind: RelationKind,
    ) -> IndexSet<String> {
        // Token → distinct reporting sources, in first-seen order.
        let mut backing: IndexMap<String, IndexSet<&str>> = IndexMap::new();
        for candidate in raw {
            let token = normalize(&candidate.word);
            if !self.filter.accepts(&token, target) {
                continue;
            }
            backing
                .entry(token)
                .or_default()
                .insert(candidate.source.as_str());
        }

        let accepted: Vec<String> = match self.config.profile {
            AcceptanceProfile::Agreement { min_sources } => backing
                .into_iter()
                .filter(|(_, sources)| sources.len() >= min_sources)
                .map(|(token, _)| token)
                .collect(),
            AcceptanceProfile::SingleSource => {
                let mut ranked: Vec<(String, usize)> = backing
                    .into_iter()
                    .map(|(token, sources)| (token, sources.len()))
                    .collect();
                // Stable sort keeps first-seen order among equally backed tokens.
                ranked.sort_by_key(|&(_, count)| Reverse(count));
                ranked.into_iter().map(|(token, _)| token).collect()
            }
        };

        if accepted.len() > self.config.max_relations {
            debug!(
                kind = kind.label(),
                accepted = accepted.len(),
                cap = self.config.max_relations,
                "capping accepted relationships"
            );
        }

        accepted
            .into_iter()
            .take(self.config.max_relations)
            .collect()
    }
}
