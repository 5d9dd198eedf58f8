//! Resolution pipeline that orchestrates the resolvers for each word.
//!
//! For every target word the relationship validator, association ranker, and
//! category resolver run independently (no ordering dependency) to populate a
//! resolved record; distractor selection then consumes the record plus the
//! shared [`GenerationState`]. Batch runs fan the independent phase out
//! across words and keep the distractor phase serialized in input order so
//! usage-counter increments stay linearized and runs stay deterministic.
//!
//! Review policy lives here, not in the resolvers: an empty relationship set,
//! an empty association list, or a short distractor list marks the record for
//! review with a structured reason.

use ahash::{AHashMap, AHashSet};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::config::LexibankConfig;
use crate::core::errors::{LexibankError, Result};
use crate::core::record::{
    AssociationRow, CategoryTag, LexicalRecord, ReviewReason, ValidatedRelationshipSet,
    WordSignals,
};
use crate::core::state::GenerationState;
use crate::core::tokens::normalize;
use crate::phonetics::sound::SoundGroupDetector;
use crate::resolvers::associations::AssociationRanker;
use crate::resolvers::categories::CategoryResolver;
use crate::resolvers::distractors::{DistractorSelector, RelationLookup};
use crate::resolvers::relationships::RelationshipValidator;

/// Peer data accumulated from the records resolved in a batch.
///
/// Implements [`RelationLookup`] so distractor selection can apply the
/// symmetric exclusion checks against every word the run has resolved.
#[derive(Debug, Default)]
pub struct ResolvedCorpus {
    records: AHashMap<String, LexicalRecord>,
}

impl ResolvedCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resolved record, keyed by its normalized word.
    pub fn insert(&mut self, record: LexicalRecord) {
        self.records.insert(record.word.clone(), record);
    }

    /// Look up a resolved record by normalized token.
    pub fn get(&self, token: &str) -> Option<&LexicalRecord> {
        self.records.get(token)
    }

    /// Number of records in the corpus.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RelationLookup for ResolvedCorpus {
    fn relationships(&self, token: &str) -> Option<&ValidatedRelationshipSet> {
        self.records.get(token).map(|record| &record.relationships)
    }

    fn associations(&self, token: &str) -> Option<&[String]> {
        self.records
            .get(token)
            .map(|record| record.associated.as_slice())
    }

    fn categories(&self, token: &str) -> Option<&[CategoryTag]> {
        self.records
            .get(token)
            .map(|record| record.categories.as_slice())
    }
}

/// Orchestrates resolution of words against a shared generation state.
#[derive(Debug)]
pub struct ResolutionPipeline {
    config: LexibankConfig,
    validator: RelationshipValidator,
    ranker: AssociationRanker,
    categories: CategoryResolver,
    selector: DistractorSelector,
    sound: SoundGroupDetector,
    associations_by_cue: AHashMap<String, Vec<AssociationRow>>,
}

impl ResolutionPipeline {
    /// Build a pipeline from configuration and the run's pre-loaded
    /// association rows.
    pub fn new(config: LexibankConfig, association_rows: Vec<AssociationRow>) -> Result<Self> {
        config.validate()?;

        let validator = RelationshipValidator::new(config.validation.clone())?;
        let ranker = AssociationRanker::new(config.association.clone())?;
        let categories = CategoryResolver::new(config.category.clone());
        let selector = DistractorSelector::new(config.distractor.clone())?;
        let sound = SoundGroupDetector::new(config.sound_language);

        let mut associations_by_cue: AHashMap<String, Vec<AssociationRow>> = AHashMap::new();
        for row in association_rows {
            let cue = normalize(&row.cue);
            if cue.is_empty() {
                continue;
            }
            associations_by_cue.entry(cue).or_default().push(row);
        }

        debug!(
            cues = associations_by_cue.len(),
            "association norms grouped by cue"
        );

        Ok(Self {
            config,
            validator,
            ranker,
            categories,
            selector,
            sound,
            associations_by_cue,
        })
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &LexibankConfig {
        &self.config
    }

    /// Association rows whose cue matches the given word.
    pub fn rows_for(&self, word: &str) -> &[AssociationRow] {
        self.associations_by_cue
            .get(&normalize(word))
            .map_or(&[], Vec::as_slice)
    }

    /// Run the three independent resolvers for one word.
    ///
    /// Produces a record with relationships, associations, categories, rhyme
    /// set, sound group, and frequency rank filled in; distractors are left
    /// for [`Self::finalize_record`]. An empty target word violates the
    /// engine contract.
    pub fn resolve_signals(
        &self,
        signals: &WordSignals,
        state: &GenerationState,
    ) -> Result<LexicalRecord> {
        let token = normalize(&signals.word);
        if token.is_empty() {
            return Err(LexibankError::validation_field(
                "target word must not be empty",
                "word",
            ));
        }

        let mut record = LexicalRecord::new(&token, signals.part_of_speech);

        record.relationships = self.validator.validate(
            &token,
            signals.part_of_speech,
            &signals.synonyms,
            &signals.antonyms,
        );
        record.associated = self.ranker.rank(&token, self.rows_for(&token));
        record.categories =
            self.categories
                .resolve(&token, signals.part_of_speech, &signals.categories);

        record.rhymes = signals
            .rhymes
            .iter()
            .map(|rhyme| normalize(rhyme))
            .filter(|rhyme| !rhyme.is_empty())
            .collect();

        // The precomputed group is opaque; only derive one when absent.
        record.sound_group = match signals.sound_group.as_deref().map(str::trim) {
            Some(group) if !group.is_empty() => group.to_string(),
            _ => self.sound.sound_group(&token),
        };

        record.frequency_rank = signals
            .frequency_rank
            .or_else(|| state.vocabulary().rank_of(&token));

        Ok(record)
    }

    /// Select distractors for a resolved record and compute review reasons.
    pub fn finalize_record(
        &self,
        mut record: LexicalRecord,
        state: &GenerationState,
        lookup: &dyn RelationLookup,
    ) -> Result<LexicalRecord> {
        let requested = self.config.distractor.count;
        record.distractors = self.selector.select(&record, state, lookup, requested)?;

        record.review_reasons = Self::review_reasons(&record, requested);
        record.needs_review = !record.review_reasons.is_empty();

        Ok(record)
    }

    /// Resolve one word end to end with no peer corpus.
    pub fn resolve_word(
        &self,
        signals: &WordSignals,
        state: &GenerationState,
    ) -> Result<LexicalRecord> {
        let record = self.resolve_signals(signals, state)?;
        self.finalize_record(record, state, &ResolvedCorpus::new())
    }

    /// Resolve a batch of words against shared state.
    ///
    /// Duplicate words (by normalized form) and empty words are skipped with
    /// a warning rather than aborting the run. The independent resolver phase
    /// fans out across words; distractor selection then runs serialized in
    /// input order with the full batch as peer data.
    pub fn run(
        &self,
        batch: &[WordSignals],
        state: &GenerationState,
    ) -> Result<Vec<LexicalRecord>> {
        let mut seen: AHashSet<String> = AHashSet::new();
        let unique: Vec<&WordSignals> = batch
            .iter()
            .filter(|signals| {
                let token = normalize(&signals.word);
                if token.is_empty() {
                    warn!("skipping signals with empty target word");
                    return false;
                }
                if !seen.insert(token.clone()) {
                    warn!(word = %token, "skipping duplicate target word");
                    return false;
                }
                true
            })
            .collect();

        info!(words = unique.len(), "starting resolution run");

        #[cfg(feature = "parallel")]
        let resolved: Result<Vec<LexicalRecord>> = unique
            .par_iter()
            .map(|signals| self.resolve_signals(signals, state))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let resolved: Result<Vec<LexicalRecord>> = unique
            .iter()
            .map(|signals| self.resolve_signals(signals, state))
            .collect();

        let resolved = resolved?;

        let mut corpus = ResolvedCorpus::new();
        for record in &resolved {
            corpus.insert(record.clone());
        }

        let mut finished = Vec::with_capacity(resolved.len());
        for record in resolved {
            let record = self.finalize_record(record, state, &corpus)?;
            finished.push(record);
        }

        info!(
            words = finished.len(),
            needing_review = finished.iter().filter(|r| r.needs_review).count(),
            "resolution run complete"
        );

        Ok(finished)
    }

    fn review_reasons(record: &LexicalRecord, requested: usize) -> Vec<ReviewReason> {
        let mut reasons = Vec::new();
        if record.relationships.is_empty() {
            reasons.push(ReviewReason::NoRelationships);
        }
        if record.associated.is_empty() {
            reasons.push(ReviewReason::NoAssociations);
        }
        if record.distractors.len() < requested {
            reasons.push(ReviewReason::InsufficientDistractors {
                requested,
                found: record.distractors.len(),
            });
        }
        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::RawCandidate;
    use crate::core::state::{FrequencyIndex, VocabularyConfig};
    use crate::core::tokens::PartOfSpeech;

    fn state_of(words: &[(&str, PartOfSpeech)]) -> GenerationState {
        let index = FrequencyIndex::from_ranked_words(
            words.iter().map(|(w, p)| ((*w).to_string(), *p)),
            &VocabularyConfig::default(),
            &SoundGroupDetector::default(),
        );
        GenerationState::new(index).unwrap()
    }

    fn small_config() -> LexibankConfig {
        let mut config = LexibankConfig::default();
        config.distractor.count = 2;
        config
    }

    #[test]
    fn test_resolve_word_fills_all_fields() {
        let rows = vec![
            AssociationRow::new("DOG", "BONE", 0.3),
            AssociationRow::new("DOG", "CAT", 0.5),
        ];
        let pipeline = ResolutionPipeline::new(small_config(), rows).unwrap();
        let state = state_of(&[
            ("lamp", PartOfSpeech::Noun),
            ("tree", PartOfSpeech::Noun),
            ("dog", PartOfSpeech::Noun),
        ]);

        let mut signals = WordSignals::new("Dog", PartOfSpeech::Noun);
        signals.synonyms.push(RawCandidate::new("hound", "source_a"));
        signals.synonyms.push(RawCandidate::new("hound", "source_b"));
        signals.rhymes.push("Log".to_string());

        let record = pipeline.resolve_word(&signals, &state).unwrap();
        assert_eq!(record.word, "dog");
        assert_eq!(record.sound_group, "d");
        assert!(record.relationships.synonyms.contains("hound"));
        assert_eq!(record.associated, vec!["cat".to_string(), "bone".to_string()]);
        assert!(record.rhymes.contains("log"));
        assert_eq!(record.frequency_rank, Some(3));
        assert_eq!(record.distractors, vec!["lamp".to_string(), "tree".to_string()]);
        assert!(!record.needs_review);
    }

    #[test]
    fn test_precomputed_sound_group_is_opaque() {
        let pipeline = ResolutionPipeline::new(small_config(), Vec::new()).unwrap();
        let state = state_of(&[("lamp", PartOfSpeech::Noun)]);

        let mut signals = WordSignals::new("dog", PartOfSpeech::Noun);
        signals.sound_group = Some("d-hard".to_string());

        let record = pipeline.resolve_signals(&signals, &state).unwrap();
        assert_eq!(record.sound_group, "d-hard");
    }

    #[test]
    fn test_review_reasons_for_sparse_word() {
        let pipeline = ResolutionPipeline::new(small_config(), Vec::new()).unwrap();
        let state = state_of(&[("lamp", PartOfSpeech::Noun)]);

        let signals = WordSignals::new("dog", PartOfSpeech::Noun);
        let record = pipeline.resolve_word(&signals, &state).unwrap();

        assert!(record.needs_review);
        assert!(record.review_reasons.contains(&ReviewReason::NoRelationships));
        assert!(record.review_reasons.contains(&ReviewReason::NoAssociations));
        assert!(record
            .review_reasons
            .contains(&ReviewReason::InsufficientDistractors {
                requested: 2,
                found: 1
            }));
    }

    #[test]
    fn test_empty_word_is_contract_violation() {
        let pipeline = ResolutionPipeline::new(small_config(), Vec::new()).unwrap();
        let state = state_of(&[("lamp", PartOfSpeech::Noun)]);

        let signals = WordSignals::new("   ", PartOfSpeech::Noun);
        let result = pipeline.resolve_word(&signals, &state);
        assert!(matches!(result, Err(LexibankError::Validation { .. })));
    }

    #[test]
    fn test_batch_skips_duplicates_and_empties() {
        let pipeline = ResolutionPipeline::new(small_config(), Vec::new()).unwrap();
        let state = state_of(&[
            ("lamp", PartOfSpeech::Noun),
            ("tree", PartOfSpeech::Noun),
            ("rock", PartOfSpeech::Noun),
        ]);

        let batch = vec![
            WordSignals::new("dog", PartOfSpeech::Noun),
            WordSignals::new("DOG", PartOfSpeech::Noun),
            WordSignals::new("", PartOfSpeech::Noun),
            WordSignals::new("cat", PartOfSpeech::Noun),
        ];

        let records = pipeline.run(&batch, &state).unwrap();
        let words: Vec<&str> = records.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["dog", "cat"]);
    }

    #[test]
    fn test_batch_applies_symmetric_exclusions() {
        // "lamp" is itself a batch word whose synonym list names "dog", so it
        // must not be offered as a distractor for "dog".
        let pipeline = ResolutionPipeline::new(small_config(), Vec::new()).unwrap();
        let state = state_of(&[
            ("lamp", PartOfSpeech::Noun),
            ("tree", PartOfSpeech::Noun),
            ("rock", PartOfSpeech::Noun),
        ]);

        let mut lamp = WordSignals::new("lamp", PartOfSpeech::Noun);
        lamp.synonyms.push(RawCandidate::new("dog", "source_a"));
        lamp.synonyms.push(RawCandidate::new("dog", "source_b"));

        let batch = vec![WordSignals::new("dog", PartOfSpeech::Noun), lamp];
        let records = pipeline.run(&batch, &state).unwrap();

        let dog = &records[0];
        assert_eq!(dog.word, "dog");
        assert!(!dog.distractors.contains(&"lamp".to_string()));
        assert_eq!(dog.distractors, vec!["tree".to_string(), "rock".to_string()]);
    }

    #[test]
    fn test_batch_spreads_usage_across_words() {
        let mut config = LexibankConfig::default();
        config.distractor.count = 1;
        let pipeline = ResolutionPipeline::new(config, Vec::new()).unwrap();
        let state = state_of(&[
            ("lamp", PartOfSpeech::Noun),
            ("tree", PartOfSpeech::Noun),
        ]);

        let batch = vec![
            WordSignals::new("dog", PartOfSpeech::Noun),
            WordSignals::new("cat", PartOfSpeech::Noun),
        ];
        let records = pipeline.run(&batch, &state).unwrap();

        // First word takes the most frequent candidate; the second gets the
        // least-used remaining one instead of repeating it.
        assert_eq!(records[0].distractors, vec!["lamp".to_string()]);
        assert_eq!(records[1].distractors, vec!["tree".to_string()]);
    }
}
