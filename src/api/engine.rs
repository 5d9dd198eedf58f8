//! Main resolution engine implementation.

use tracing::info;

use crate::api::results::ResolutionResults;
use crate::core::config::LexibankConfig;
use crate::core::errors::Result;
use crate::core::pipeline::ResolutionPipeline;
use crate::core::record::{AssociationRow, LexicalRecord, WordSignals};
use crate::core::state::{FrequencyIndex, GenerationState};
use crate::core::tokens::PartOfSpeech;
use crate::phonetics::sound::SoundGroupDetector;

/// Main lexibank resolution engine.
///
/// Owns the pipeline and the run-scoped [`GenerationState`]; the frequency
/// vocabulary and association norms are supplied once at construction, per
/// the engine's external-collaborator contract.
pub struct LexibankEngine {
    pipeline: ResolutionPipeline,
    state: GenerationState,
}

impl LexibankEngine {
    /// Create an engine for one generation run.
    ///
    /// `vocabulary` is the frequency-ranked word list (most frequent first,
    /// each word tagged with its part of speech); `association_rows` is the
    /// run's full cue→target norms corpus. The configuration is validated up
    /// front and an empty vocabulary fails loudly.
    pub fn new(
        config: LexibankConfig,
        vocabulary: Vec<(String, PartOfSpeech)>,
        association_rows: Vec<AssociationRow>,
    ) -> Result<Self> {
        info!("Initializing lexibank resolution engine");

        config.validate()?;

        let detector = SoundGroupDetector::new(config.sound_language);
        let index =
            FrequencyIndex::from_ranked_words(vocabulary, &config.vocabulary, &detector);
        let state = GenerationState::new(index)?;
        let pipeline = ResolutionPipeline::new(config, association_rows)?;

        info!(
            vocabulary = state.vocabulary().len(),
            "lexibank engine initialized"
        );

        Ok(Self { pipeline, state })
    }

    /// Build an engine from an already-constructed frequency index.
    pub fn with_index(
        config: LexibankConfig,
        index: FrequencyIndex,
        association_rows: Vec<AssociationRow>,
    ) -> Result<Self> {
        config.validate()?;
        let state = GenerationState::new(index)?;
        let pipeline = ResolutionPipeline::new(config, association_rows)?;
        Ok(Self { pipeline, state })
    }

    /// Resolve a single word end to end.
    pub fn resolve_word(&self, signals: &WordSignals) -> Result<LexicalRecord> {
        self.pipeline.resolve_word(signals, &self.state)
    }

    /// Resolve a batch of words and summarize the run.
    pub fn resolve_batch(&self, batch: &[WordSignals]) -> Result<ResolutionResults> {
        if batch.is_empty() {
            return Ok(ResolutionResults::empty(self.state.vocabulary().len()));
        }

        let records = self.pipeline.run(batch, &self.state)?;
        Ok(ResolutionResults::from_records(
            records,
            self.state.vocabulary().len(),
        ))
    }

    /// The engine's configuration.
    pub fn config(&self) -> &LexibankConfig {
        self.pipeline.config()
    }

    /// The run's shared generation state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Reset distractor usage counters for a fresh wordbank generation.
    pub fn reset_usage(&self) {
        self.state.reset_usage();
    }
}
