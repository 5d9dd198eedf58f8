//! Distractor selection under the eight therapy-safety constraints.
//!
//! A valid distractor for a target word must simultaneously be: not a
//! synonym or antonym (in either direction), not same-sounding, not rhyming,
//! not same-category, not semantically associated (in either direction), and
//! the same part of speech. Length matching is a ranked preference expressed
//! as successively widening tiers rather than a hard filter, and repetition
//! across the run is spread by ranking candidates least-used-first against
//! the shared [`GenerationState`] counters.

use smallvec::SmallVec;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{LexibankError, Result};
use crate::core::record::{CategoryTag, LexicalRecord, RelationKind, ValidatedRelationshipSet};
use crate::core::state::{GenerationState, VocabularyEntry};
use crate::core::tokens::normalize;
use crate::phonetics::sound::SoundGroupDetector;

/// Configuration for distractor selection and auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistractorConfig {
    /// Distractors requested per word
    pub count: usize,

    /// Length-window tolerances tried in order before the unbounded tier
    pub length_tolerances: Vec<usize>,

    /// Usage count at which the auditor reports a candidate as overused
    pub max_reuse: u32,
}

impl Default for DistractorConfig {
    fn default() -> Self {
        Self {
            count: 10,
            length_tolerances: vec![0, 1, 2],
            max_reuse: 3,
        }
    }
}

impl DistractorConfig {
    /// Validate configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(LexibankError::config_field(
                "requested distractor count must be at least 1",
                "distractor.count",
            ));
        }
        if self.max_reuse == 0 {
            return Err(LexibankError::config_field(
                "maximum reuse must be at least 1",
                "distractor.max_reuse",
            ));
        }
        Ok(())
    }
}

/// Access to other words' resolved data for the symmetric exclusion checks.
///
/// The selector consults this when deciding whether the target appears in a
/// candidate's own synonym/antonym or association lists, and whether the two
/// words share a category tag. Absent data trivially passes each check.
pub trait RelationLookup {
    /// Resolved relationship sets for a token, when available.
    fn relationships(&self, token: &str) -> Option<&ValidatedRelationshipSet>;

    /// Resolved association list for a token, when available.
    fn associations(&self, token: &str) -> Option<&[String]>;

    /// Resolved category tags for a token, when available.
    fn categories(&self, token: &str) -> Option<&[CategoryTag]>;
}

/// A [`RelationLookup`] with no peer data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPeerData;

impl RelationLookup for NoPeerData {
    fn relationships(&self, _token: &str) -> Option<&ValidatedRelationshipSet> {
        None
    }

    fn associations(&self, _token: &str) -> Option<&[String]> {
        None
    }

    fn categories(&self, _token: &str) -> Option<&[CategoryTag]> {
        None
    }
}

/// Selects safe distractors for a resolved record.
#[derive(Debug, Clone)]
pub struct DistractorSelector {
    config: DistractorConfig,
}

impl DistractorSelector {
    /// Create a selector from configuration.
    pub fn new(config: DistractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Select up to `count` distractors for the record, updating the run's
    /// usage counters for each chosen word.
    ///
    /// Tiers widen only until one yields at least `count` eligible
    /// candidates; within the chosen tier candidates are ranked by ascending
    /// usage count, then ascending frequency rank, then vocabulary order.
    /// Fewer eligible candidates than requested is not an error — the short
    /// list is returned and the caller decides review policy. A `count` of
    /// zero violates the engine's contract and fails loudly.
    pub fn select(
        &self,
        record: &LexicalRecord,
        state: &GenerationState,
        lookup: &dyn RelationLookup,
        count: usize,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Err(LexibankError::config_field(
                "requested distractor count must be at least 1",
                "distractor.count",
            ));
        }

        let vocabulary = state.vocabulary();
        let target_length = record.word_length();

        // Successive widening: configured windows first, then no constraint.
        let tiers = self
            .config
            .length_tolerances
            .iter()
            .map(|&tolerance| Some(tolerance))
            .chain(std::iter::once(None));

        let mut eligible: SmallVec<[&VocabularyEntry; 16]> = SmallVec::new();
        for tolerance in tiers {
            eligible = vocabulary
                .entries_in_window(target_length, tolerance)
                .filter(|entry| self.is_eligible(entry, record, lookup))
                .collect();

            if eligible.len() >= count {
                break;
            }
        }

        // Rank by current usage, then frequency rank, with the window index
        // (rank order) as the deterministic final tie-break.
        let mut ranked: Vec<(u32, u32, usize, &VocabularyEntry)> = eligible
            .into_iter()
            .enumerate()
            .map(|(index, entry)| (state.usage_of(&entry.token), entry.rank, index, entry))
            .collect();
        ranked.sort_by_key(|&(usage, rank, index, _)| (usage, rank, index));

        let chosen: Vec<String> = ranked
            .into_iter()
            .take(count)
            .map(|(_, _, _, entry)| entry.token.clone())
            .collect();

        if chosen.len() < count {
            debug!(
                word = %record.word,
                requested = count,
                found = chosen.len(),
                "fewer eligible distractors than requested"
            );
        }

        state.record_uses(chosen.iter().map(String::as_str));
        Ok(chosen)
    }

    /// The conjunction of exclusion rules a candidate must satisfy.
    fn is_eligible(
        &self,
        entry: &VocabularyEntry,
        record: &LexicalRecord,
        lookup: &dyn RelationLookup,
    ) -> bool {
        let token = entry.token.as_str();

        if token == record.word {
            return false;
        }

        // Same part of speech as the target.
        if entry.part_of_speech != record.part_of_speech {
            return false;
        }

        // Not a synonym or antonym of the target, in either direction.
        if record.relationships.contains(token) {
            return false;
        }
        if lookup
            .relationships(token)
            .is_some_and(|set| set.contains(&record.word))
        {
            return false;
        }

        // Not starting with the target's sound group (exact string equality).
        if entry.sound_group == record.sound_group {
            return false;
        }

        // Not in the target's rhyme list.
        if record.rhymes.contains(token) {
            return false;
        }

        // No shared (source, label) category tag; missing data passes.
        if lookup.categories(token).is_some_and(|peer_tags| {
            peer_tags.iter().any(|tag| record.categories.contains(tag))
        }) {
            return false;
        }

        // Not semantically associated, in either direction.
        if record.associated.iter().any(|word| word == token) {
            return false;
        }
        if lookup
            .associations(token)
            .is_some_and(|peer| peer.iter().any(|word| word == &record.word))
        {
            return false;
        }

        true
    }
}

/// A single rule violation reported by the auditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum RuleViolation {
    /// The distractor is a validated synonym or antonym of the target
    RelationshipConflict {
        /// Which relationship list it came from
        kind: RelationKind,
    },
    /// The distractor appears in the target's associated-word list
    AssociationConflict,
    /// The distractor starts with the target's sound group
    SharedSound {
        /// The common sound group
        group: String,
    },
    /// The distractor is in the target's rhyme list
    RhymeConflict,
    /// The distractor shares a 3–4 character ending with the target
    SharedEnding,
    /// The distractor shares a category tag with the target
    SharedCategory {
        /// The common tag
        tag: CategoryTag,
    },
    /// The distractor's length is outside the widest configured window
    LengthDeviation {
        /// Absolute character-length difference
        difference: usize,
    },
    /// The distractor has been emitted too many times this run
    Overused {
        /// Current usage count
        count: u32,
    },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelationshipConflict { kind } => {
                write!(f, "listed as a {} of the target", kind.label())
            }
            Self::AssociationConflict => write!(f, "associated with the target"),
            Self::SharedSound { group } => write!(f, "same starting sound ({group})"),
            Self::RhymeConflict => write!(f, "rhymes with the target"),
            Self::SharedEnding => write!(f, "shared ending suggests a rhyme"),
            Self::SharedCategory { tag } => {
                write!(f, "same category ({}: {})", tag.source, tag.label)
            }
            Self::LengthDeviation { difference } => {
                write!(f, "length differs by {difference}")
            }
            Self::Overused { count } => write!(f, "already used {count} times"),
        }
    }
}

/// Audit outcome for one distractor of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistractorFinding {
    /// The audited distractor word
    pub word: String,

    /// Violations found; empty means the distractor is valid
    pub violations: Vec<RuleViolation>,
}

impl DistractorFinding {
    /// Whether the distractor passed every check.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Re-checks an existing distractor list against the selection rules.
///
/// Used on persisted wordbanks to surface entries whose distractors were
/// hand-edited or generated under older rules. The auditor applies a
/// shared-ending rhyme heuristic on top of the explicit rhyme list; the
/// selector itself never uses the heuristic.
#[derive(Debug, Clone)]
pub struct DistractorAuditor {
    config: DistractorConfig,
    detector: SoundGroupDetector,
}

impl DistractorAuditor {
    /// Create an auditor from configuration and a sound detector.
    pub fn new(config: DistractorConfig, detector: SoundGroupDetector) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, detector })
    }

    /// Audit the record's distractor list.
    ///
    /// When `state` is provided, usage counts are checked against the
    /// configured reuse ceiling; the peer `lookup` supplies candidate-side
    /// category data for the shared-category check.
    pub fn audit(
        &self,
        record: &LexicalRecord,
        lookup: &dyn RelationLookup,
        state: Option<&GenerationState>,
    ) -> Vec<DistractorFinding> {
        let widest = self.config.length_tolerances.iter().copied().max();
        let target_length = record.word_length();

        record
            .distractors
            .iter()
            .map(|distractor| {
                let token = normalize(distractor);
                let mut violations = Vec::new();

                if record.relationships.synonyms.contains(&token) {
                    violations.push(RuleViolation::RelationshipConflict {
                        kind: RelationKind::Synonym,
                    });
                } else if record.relationships.antonyms.contains(&token) {
                    violations.push(RuleViolation::RelationshipConflict {
                        kind: RelationKind::Antonym,
                    });
                }

                if record.associated.iter().any(|word| *word == token) {
                    violations.push(RuleViolation::AssociationConflict);
                }

                let sound = self.detector.sound_group(&token);
                if !record.sound_group.is_empty() && sound == record.sound_group {
                    violations.push(RuleViolation::SharedSound { group: sound });
                }

                if record.rhymes.contains(&token) {
                    violations.push(RuleViolation::RhymeConflict);
                } else if shares_rhyme_ending(&token, &record.word) {
                    violations.push(RuleViolation::SharedEnding);
                }

                if let Some(peer_tags) = lookup.categories(&token) {
                    if let Some(tag) = peer_tags
                        .iter()
                        .find(|tag| record.categories.contains(tag))
                    {
                        violations.push(RuleViolation::SharedCategory { tag: tag.clone() });
                    }
                }

                if let Some(tolerance) = widest {
                    let difference = token.chars().count().abs_diff(target_length);
                    if difference > tolerance {
                        violations.push(RuleViolation::LengthDeviation { difference });
                    }
                }

                if let Some(state) = state {
                    let count = state.usage_of(&token);
                    if count >= self.config.max_reuse {
                        violations.push(RuleViolation::Overused { count });
                    }
                }

                DistractorFinding {
                    word: token,
                    violations,
                }
            })
            .collect()
    }
}

/// Whether two distinct words share a 3- or 4-character ending.
pub fn shares_rhyme_ending(first: &str, second: &str) -> bool {
    if first == second {
        return false;
    }
    let first_chars: Vec<char> = first.chars().collect();
    let second_chars: Vec<char> = second.chars().collect();
    for ending in [4, 3] {
        if first_chars.len() >= ending && second_chars.len() >= ending {
            if first_chars[first_chars.len() - ending..] == second_chars[second_chars.len() - ending..]
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{FrequencyIndex, VocabularyConfig};
    use crate::core::tokens::PartOfSpeech;

    fn index_of(words: &[(&str, PartOfSpeech)]) -> FrequencyIndex {
        FrequencyIndex::from_ranked_words(
            words.iter().map(|(w, p)| ((*w).to_string(), *p)),
            &VocabularyConfig::default(),
            &SoundGroupDetector::default(),
        )
    }

    fn selector() -> DistractorSelector {
        DistractorSelector::new(DistractorConfig::default()).unwrap()
    }

    fn record_for(word: &str, pos: PartOfSpeech, detector: &SoundGroupDetector) -> LexicalRecord {
        let mut record = LexicalRecord::new(word, pos);
        record.sound_group = detector.sound_group(word);
        record
    }

    #[test]
    fn test_pos_rule_excludes_candidates() {
        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("cat", PartOfSpeech::Noun),
            ("run", PartOfSpeech::Verb),
        ]))
        .unwrap();
        let record = record_for("dog", PartOfSpeech::Noun, &detector);

        let chosen = selector().select(&record, &state, &NoPeerData, 1).unwrap();
        assert_eq!(chosen, vec!["cat".to_string()]);
        assert_eq!(state.usage_of("cat"), 1);
    }

    #[test]
    fn test_relationship_and_association_rules() {
        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("hound", PartOfSpeech::Noun),
            ("bone", PartOfSpeech::Noun),
            ("lamp", PartOfSpeech::Noun),
        ]))
        .unwrap();

        let mut record = record_for("dog", PartOfSpeech::Noun, &detector);
        record.relationships.synonyms.insert("hound".to_string());
        record.associated.push("bone".to_string());

        let chosen = selector().select(&record, &state, &NoPeerData, 3).unwrap();
        assert_eq!(chosen, vec!["lamp".to_string()]);
    }

    #[test]
    fn test_sound_and_rhyme_rules() {
        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("dot", PartOfSpeech::Noun),  // same "d" onset as target
            ("frog", PartOfSpeech::Noun), // in the rhyme list
            ("lamp", PartOfSpeech::Noun),
        ]))
        .unwrap();

        let mut record = record_for("dog", PartOfSpeech::Noun, &detector);
        record.rhymes.insert("frog".to_string());

        let chosen = selector().select(&record, &state, &NoPeerData, 3).unwrap();
        assert_eq!(chosen, vec!["lamp".to_string()]);
    }

    #[test]
    fn test_category_rule_uses_peer_data() {
        struct PeerCategories;
        impl RelationLookup for PeerCategories {
            fn relationships(&self, _token: &str) -> Option<&ValidatedRelationshipSet> {
                None
            }
            fn associations(&self, _token: &str) -> Option<&[String]> {
                None
            }
            fn categories(&self, token: &str) -> Option<&[CategoryTag]> {
                static CAT_TAGS: once_cell::sync::Lazy<Vec<CategoryTag>> =
                    once_cell::sync::Lazy::new(|| vec![CategoryTag::new("hypernyms", "animal")]);
                (token == "wolf").then(|| CAT_TAGS.as_slice())
            }
        }

        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("wolf", PartOfSpeech::Noun),
            ("lamp", PartOfSpeech::Noun),
        ]))
        .unwrap();

        let mut record = record_for("dog", PartOfSpeech::Noun, &detector);
        record.categories.push(CategoryTag::new("hypernyms", "animal"));

        let chosen = selector()
            .select(&record, &state, &PeerCategories, 2)
            .unwrap();
        assert_eq!(chosen, vec!["lamp".to_string()]);
    }

    #[test]
    fn test_symmetric_relationship_check() {
        struct PeerRelations(ValidatedRelationshipSet);
        impl RelationLookup for PeerRelations {
            fn relationships(&self, token: &str) -> Option<&ValidatedRelationshipSet> {
                (token == "mutt").then_some(&self.0)
            }
            fn associations(&self, _token: &str) -> Option<&[String]> {
                None
            }
            fn categories(&self, _token: &str) -> Option<&[CategoryTag]> {
                None
            }
        }

        let mut peer_set = ValidatedRelationshipSet::default();
        peer_set.synonyms.insert("dog".to_string());

        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("mutt", PartOfSpeech::Noun),
            ("lamp", PartOfSpeech::Noun),
        ]))
        .unwrap();
        let record = record_for("dog", PartOfSpeech::Noun, &detector);

        let chosen = selector()
            .select(&record, &state, &PeerRelations(peer_set), 2)
            .unwrap();
        assert_eq!(chosen, vec!["lamp".to_string()]);
    }

    #[test]
    fn test_tier_widening_stops_at_satisfying_tier() {
        let detector = SoundGroupDetector::default();
        // Two exact-length candidates and one ±1 candidate that must not appear.
        let state = GenerationState::new(index_of(&[
            ("cat", PartOfSpeech::Noun),
            ("pig", PartOfSpeech::Noun),
            ("lamb", PartOfSpeech::Noun),
        ]))
        .unwrap();
        let record = record_for("fox", PartOfSpeech::Noun, &detector);

        let chosen = selector().select(&record, &state, &NoPeerData, 2).unwrap();
        assert_eq!(chosen, vec!["cat".to_string(), "pig".to_string()]);
        assert_eq!(state.usage_of("lamb"), 0);
    }

    #[test]
    fn test_tier_widens_when_needed() {
        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("cat", PartOfSpeech::Noun),
            ("lamb", PartOfSpeech::Noun),
        ]))
        .unwrap();
        let record = record_for("fox", PartOfSpeech::Noun, &detector);

        let chosen = selector().select(&record, &state, &NoPeerData, 2).unwrap();
        assert_eq!(chosen, vec!["cat".to_string(), "lamb".to_string()]);
    }

    #[test]
    fn test_least_used_candidates_rank_first() {
        let detector = SoundGroupDetector::default();
        let state = GenerationState::new(index_of(&[
            ("cat", PartOfSpeech::Noun),
            ("pig", PartOfSpeech::Noun),
        ]))
        .unwrap();
        state.record_uses(["cat"]);

        let record = record_for("fox", PartOfSpeech::Noun, &detector);
        let chosen = selector().select(&record, &state, &NoPeerData, 1).unwrap();
        // "cat" ranks better by frequency but has been used already.
        assert_eq!(chosen, vec!["pig".to_string()]);
    }

    #[test]
    fn test_short_result_instead_of_failure() {
        let detector = SoundGroupDetector::default();
        let state =
            GenerationState::new(index_of(&[("cat", PartOfSpeech::Noun)])).unwrap();
        let record = record_for("fox", PartOfSpeech::Noun, &detector);

        let chosen = selector().select(&record, &state, &NoPeerData, 5).unwrap();
        assert_eq!(chosen, vec!["cat".to_string()]);
    }

    #[test]
    fn test_zero_count_is_contract_violation() {
        let detector = SoundGroupDetector::default();
        let state =
            GenerationState::new(index_of(&[("cat", PartOfSpeech::Noun)])).unwrap();
        let record = record_for("fox", PartOfSpeech::Noun, &detector);

        let result = selector().select(&record, &state, &NoPeerData, 0);
        assert!(matches!(result, Err(LexibankError::Config { .. })));
    }

    #[test]
    fn test_shares_rhyme_ending() {
        assert!(shares_rhyme_ending("station", "nation"));
        assert!(shares_rhyme_ending("frog", "log")); // last 3 chars
        assert!(!shares_rhyme_ending("dog", "dog")); // identical words
        assert!(!shares_rhyme_ending("dog", "cat"));
        assert!(!shares_rhyme_ending("ox", "fox")); // too short
    }

    #[test]
    fn test_auditor_reports_violations() {
        let detector = SoundGroupDetector::default();
        let auditor =
            DistractorAuditor::new(DistractorConfig::default(), detector.clone()).unwrap();

        let mut record = record_for("dog", PartOfSpeech::Noun, &detector);
        record.relationships.synonyms.insert("hound".to_string());
        record.rhymes.insert("log".to_string());
        record.distractors = vec![
            "hound".to_string(),
            "dot".to_string(),
            "log".to_string(),
            "bulldog".to_string(),
            "catastrophe".to_string(),
            "lamp".to_string(),
        ];

        let findings = auditor.audit(&record, &NoPeerData, None);
        assert_eq!(findings.len(), 6);

        assert_eq!(
            findings[0].violations,
            vec![RuleViolation::RelationshipConflict {
                kind: RelationKind::Synonym
            }]
        );
        assert!(findings[1]
            .violations
            .contains(&RuleViolation::SharedSound {
                group: "d".to_string()
            }));
        assert!(findings[2].violations.contains(&RuleViolation::RhymeConflict));
        assert!(findings[3].violations.contains(&RuleViolation::SharedEnding));
        assert!(findings[4]
            .violations
            .iter()
            .any(|v| matches!(v, RuleViolation::LengthDeviation { .. })));
        assert!(findings[5].is_valid());
    }

    #[test]
    fn test_auditor_overuse_with_state() {
        let detector = SoundGroupDetector::default();
        let auditor =
            DistractorAuditor::new(DistractorConfig::default(), detector.clone()).unwrap();
        let state =
            GenerationState::new(index_of(&[("lamp", PartOfSpeech::Noun)])).unwrap();
        state.record_uses(["lamp", "lamp", "lamp"]);

        let mut record = record_for("dog", PartOfSpeech::Noun, &detector);
        record.distractors = vec!["lamp".to_string()];

        let findings = auditor.audit(&record, &NoPeerData, Some(&state));
        assert_eq!(
            findings[0].violations,
            vec![RuleViolation::Overused { count: 3 }]
        );
    }
}
