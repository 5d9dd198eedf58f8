//! Run-scoped vocabulary index and shared generation state.
//!
//! The frequency-ranked vocabulary is built once per generation run and is
//! immutable for its lifetime; the distractor usage counters are the only
//! mutable piece and live behind a mutex so parallel callers keep the
//! least-used-first ranking meaningful.

use ahash::{AHashMap, AHashSet};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{LexibankError, Result};
use crate::core::tokens::{normalize, PartOfSpeech, TokenFilter, FUNCTION_WORDS};
use crate::phonetics::sound::SoundGroupDetector;

/// Configuration for vocabulary loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Minimum token length for a vocabulary entry
    pub min_token_length: usize,

    /// Apply the built-in function-word stoplist at load time
    pub use_default_stoplist: bool,

    /// Additional words to exclude from the vocabulary
    #[serde(default)]
    pub excluded_words: Vec<String>,

    /// Rank threshold below which a word counts as frequent
    pub frequent_threshold: u32,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            min_token_length: 3,
            use_default_stoplist: true,
            excluded_words: Vec::new(),
            frequent_threshold: 5000,
        }
    }
}

impl VocabularyConfig {
    /// Validate configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.min_token_length == 0 {
            return Err(LexibankError::config_field(
                "minimum token length must be at least 1",
                "vocabulary.min_token_length",
            ));
        }
        if self.frequent_threshold == 0 {
            return Err(LexibankError::config_field(
                "frequent threshold must be at least 1",
                "vocabulary.frequent_threshold",
            ));
        }
        Ok(())
    }
}

/// One entry of the frequency-ranked vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Normalized word token
    pub token: String,

    /// Part of speech reported for the token
    pub part_of_speech: PartOfSpeech,

    /// 1-based frequency rank in the source list (smaller = more frequent)
    pub rank: u32,

    /// Character length of the token
    pub length: usize,

    /// Starting sound group of the token
    pub sound_group: String,
}

/// Frequency-ranked vocabulary with part-of-speech, length, and sound-group
/// indexes for candidate lookup.
///
/// Iteration order is rank order and is the deterministic final tie-break in
/// distractor ranking.
#[derive(Debug, Clone)]
pub struct FrequencyIndex {
    entries: Vec<VocabularyEntry>,
    token_index: AHashMap<String, usize>,
    by_length: AHashMap<usize, Vec<usize>>,
    by_pos: AHashMap<PartOfSpeech, Vec<usize>>,
    by_sound: AHashMap<String, Vec<usize>>,
    frequent_threshold: u32,
}

impl FrequencyIndex {
    /// Build the index from words in frequency order (most frequent first).
    ///
    /// The rank of each word is its 1-based position in the input sequence;
    /// entries that fail the well-formedness checks or sit in the stoplist
    /// are skipped but still consume their rank, matching the source lists'
    /// numbering. Duplicate tokens keep their first (best) rank.
    pub fn from_ranked_words<I>(
        words: I,
        config: &VocabularyConfig,
        detector: &SoundGroupDetector,
    ) -> Self
    where
        I: IntoIterator<Item = (String, PartOfSpeech)>,
    {
        let filter = TokenFilter::new(
            config.min_token_length,
            config.excluded_words.iter().cloned(),
        );

        let mut entries = Vec::new();
        let mut token_index: AHashMap<String, usize> = AHashMap::new();

        for (position, (word, part_of_speech)) in words.into_iter().enumerate() {
            let rank = u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1);
            let token = normalize(&word);

            if !filter.is_well_formed(&token) || filter.is_stoplisted(&token) {
                continue;
            }
            if config.use_default_stoplist && FUNCTION_WORDS.contains(token.as_str()) {
                continue;
            }
            if token_index.contains_key(&token) {
                continue;
            }

            let entry = VocabularyEntry {
                length: token.chars().count(),
                sound_group: detector.sound_group(&token),
                token: token.clone(),
                part_of_speech,
                rank,
            };
            token_index.insert(token, entries.len());
            entries.push(entry);
        }

        let mut by_length: AHashMap<usize, Vec<usize>> = AHashMap::new();
        let mut by_pos: AHashMap<PartOfSpeech, Vec<usize>> = AHashMap::new();
        let mut by_sound: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_length.entry(entry.length).or_default().push(idx);
            by_pos.entry(entry.part_of_speech).or_default().push(idx);
            by_sound.entry(entry.sound_group.clone()).or_default().push(idx);
        }

        debug!(entries = entries.len(), "frequency vocabulary indexed");

        Self {
            entries,
            token_index,
            by_length,
            by_pos,
            by_sound,
            frequent_threshold: config.frequent_threshold,
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in rank order.
    pub fn entries(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.iter()
    }

    /// Look up an entry by normalized token.
    pub fn get(&self, token: &str) -> Option<&VocabularyEntry> {
        self.token_index.get(token).map(|&idx| &self.entries[idx])
    }

    /// Frequency rank of a word, if it is in the vocabulary.
    pub fn rank_of(&self, word: &str) -> Option<u32> {
        self.get(&normalize(word)).map(|entry| entry.rank)
    }

    /// Whether a word ranks inside the configured frequent threshold.
    pub fn is_frequent(&self, word: &str) -> bool {
        self.rank_of(word)
            .is_some_and(|rank| rank <= self.frequent_threshold)
    }

    /// Top `n` words by frequency, skipping any in `exclude`.
    pub fn top_words(&self, n: usize, exclude: &AHashSet<String>) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| !exclude.contains(&entry.token))
            .take(n)
            .map(|entry| entry.token.as_str())
            .collect()
    }

    /// Entries within `tolerance` of the given character length, in rank
    /// order, up to `limit`. A `None` tolerance disables the length window.
    pub fn words_by_length(
        &self,
        length: usize,
        tolerance: Option<usize>,
        exclude: &AHashSet<String>,
        limit: usize,
    ) -> Vec<&VocabularyEntry> {
        self.entries_in_window(length, tolerance)
            .filter(|entry| !exclude.contains(&entry.token))
            .take(limit)
            .collect()
    }

    /// Iterate entries inside a length window in rank order; `None` widens to
    /// the full vocabulary.
    pub fn entries_in_window(
        &self,
        length: usize,
        tolerance: Option<usize>,
    ) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.iter().filter(move |entry| match tolerance {
            Some(tol) => entry.length.abs_diff(length) <= tol,
            None => true,
        })
    }

    /// Entries sharing a part of speech, in rank order.
    pub fn entries_with_pos(&self, pos: PartOfSpeech) -> impl Iterator<Item = &VocabularyEntry> {
        self.by_pos
            .get(&pos)
            .into_iter()
            .flatten()
            .map(|&idx| &self.entries[idx])
    }

    /// Entries sharing a starting sound group, in rank order.
    pub fn entries_with_sound(&self, group: &str) -> impl Iterator<Item = &VocabularyEntry> {
        self.by_sound
            .get(group)
            .into_iter()
            .flatten()
            .map(|&idx| &self.entries[idx])
    }

    /// Entries of exactly the given character length, in rank order.
    pub fn entries_with_length(&self, length: usize) -> impl Iterator<Item = &VocabularyEntry> {
        self.by_length
            .get(&length)
            .into_iter()
            .flatten()
            .map(|&idx| &self.entries[idx])
    }
}

/// Process-wide state for one generation run.
///
/// Holds the immutable frequency vocabulary and the mutable distractor usage
/// counters. Counter mutation is serialized behind a mutex so the
/// least-used-first ranking stays meaningful under parallel callers; a fresh
/// instance is created per run (or per test).
#[derive(Debug)]
pub struct GenerationState {
    vocabulary: FrequencyIndex,
    usage: Mutex<AHashMap<String, u32>>,
}

impl GenerationState {
    /// Create state for a run over the given vocabulary.
    ///
    /// Usage counters start at zero for every vocabulary entry. An empty
    /// vocabulary is a caller contract violation and fails loudly.
    pub fn new(vocabulary: FrequencyIndex) -> Result<Self> {
        if vocabulary.is_empty() {
            return Err(LexibankError::config_field(
                "frequency vocabulary must not be empty",
                "vocabulary",
            ));
        }

        let usage = vocabulary
            .entries()
            .map(|entry| (entry.token.clone(), 0_u32))
            .collect();

        Ok(Self {
            vocabulary,
            usage: Mutex::new(usage),
        })
    }

    /// The run's frequency vocabulary.
    pub fn vocabulary(&self) -> &FrequencyIndex {
        &self.vocabulary
    }

    /// How many times a token has been emitted as a distractor this run.
    pub fn usage_of(&self, token: &str) -> u32 {
        self.usage.lock().get(token).copied().unwrap_or(0)
    }

    /// Record one more use of each of the given tokens.
    pub fn record_uses<'a, I>(&self, tokens: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut usage = self.usage.lock();
        for token in tokens {
            *usage.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    /// Snapshot of the current usage counters.
    pub fn usage_counts(&self) -> AHashMap<String, u32> {
        self.usage.lock().clone()
    }

    /// Reset all usage counters to zero (between wordbank generations).
    pub fn reset_usage(&self) {
        let mut usage = self.usage.lock();
        for count in usage.values_mut() {
            *count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FrequencyIndex {
        let words = vec![
            ("time".to_string(), PartOfSpeech::Noun),
            ("the".to_string(), PartOfSpeech::Other), // stoplisted
            ("year".to_string(), PartOfSpeech::Noun),
            ("walk".to_string(), PartOfSpeech::Verb),
            ("ox".to_string(), PartOfSpeech::Noun), // too short
            ("year".to_string(), PartOfSpeech::Noun), // duplicate
            ("house".to_string(), PartOfSpeech::Noun),
        ];
        FrequencyIndex::from_ranked_words(
            words,
            &VocabularyConfig::default(),
            &SoundGroupDetector::default(),
        )
    }

    #[test]
    fn test_load_skips_stoplist_and_short_tokens() {
        let index = sample_index();
        assert_eq!(index.len(), 4);
        assert!(index.get("the").is_none());
        assert!(index.get("ox").is_none());
    }

    #[test]
    fn test_ranks_preserve_source_positions() {
        let index = sample_index();
        assert_eq!(index.rank_of("time"), Some(1));
        assert_eq!(index.rank_of("year"), Some(3));
        assert_eq!(index.rank_of("walk"), Some(4));
        assert_eq!(index.rank_of("house"), Some(7));
        assert_eq!(index.rank_of("missing"), None);
    }

    #[test]
    fn test_is_frequent() {
        let index = sample_index();
        assert!(index.is_frequent("time"));
        assert!(!index.is_frequent("missing"));
    }

    #[test]
    fn test_top_words_with_exclusions() {
        let index = sample_index();
        let exclude: AHashSet<String> = ["time".to_string()].into_iter().collect();
        let top = index.top_words(2, &exclude);
        assert_eq!(top, vec!["year", "walk"]);
    }

    #[test]
    fn test_words_by_length_window() {
        let index = sample_index();
        let exclude = AHashSet::new();

        let exact = index.words_by_length(4, Some(0), &exclude, 10);
        let tokens: Vec<&str> = exact.iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["time", "year", "walk"]);

        let widened = index.words_by_length(4, Some(1), &exclude, 10);
        assert_eq!(widened.len(), 4);

        let unbounded = index.words_by_length(4, None, &exclude, 2);
        assert_eq!(unbounded.len(), 2);
    }

    #[test]
    fn test_pos_and_sound_indexes() {
        let index = sample_index();
        let nouns: Vec<&str> = index
            .entries_with_pos(PartOfSpeech::Noun)
            .map(|e| e.token.as_str())
            .collect();
        assert_eq!(nouns, vec!["time", "year", "house"]);

        let th_words: Vec<&str> = index
            .entries_with_sound("h")
            .map(|e| e.token.as_str())
            .collect();
        assert_eq!(th_words, vec!["house"]);
    }

    #[test]
    fn test_state_rejects_empty_vocabulary() {
        let empty = FrequencyIndex::from_ranked_words(
            Vec::new(),
            &VocabularyConfig::default(),
            &SoundGroupDetector::default(),
        );
        let result = GenerationState::new(empty);
        assert!(matches!(result, Err(LexibankError::Config { .. })));
    }

    #[test]
    fn test_state_usage_counters() {
        let state = GenerationState::new(sample_index()).unwrap();
        assert_eq!(state.usage_of("time"), 0);

        state.record_uses(["time", "year"]);
        state.record_uses(["time"]);
        assert_eq!(state.usage_of("time"), 2);
        assert_eq!(state.usage_of("year"), 1);
        assert_eq!(state.usage_of("house"), 0);

        state.reset_usage();
        assert_eq!(state.usage_of("time"), 0);
        assert_eq!(state.usage_counts().values().sum::<u32>(), 0);
    }
}
