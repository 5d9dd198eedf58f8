//! Input-bundle loading and wordbank document persistence.
//!
//! The engine itself has no file surface; this module is the orchestrator's
//! side of the contract. An [`InputBundle`] carries everything the external
//! fetchers produced for a run — target signals, the frequency vocabulary,
//! and the association norms — and a [`WordbankDocument`] is the persisted
//! JSON shape consumed by the exercise front ends.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{LexibankError, Result};
use crate::core::record::{
    AssociationRow, CategoryTag, LexicalRecord, ReviewReason, ValidatedRelationshipSet,
    WordSignals,
};
use crate::core::tokens::{normalize, PartOfSpeech};

/// One vocabulary entry of the input bundle, in frequency order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularySeed {
    /// The word
    pub word: String,

    /// Its part of speech
    #[serde(default)]
    pub part_of_speech: PartOfSpeech,
}

/// Everything the external collaborators deliver for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBundle {
    /// Language code for the run (drives sound patterns when set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Per-word raw signal bundles
    #[serde(default)]
    pub targets: Vec<WordSignals>,

    /// Frequency-ranked vocabulary, most frequent first
    #[serde(default)]
    pub vocabulary: Vec<VocabularySeed>,

    /// Full cue→target association norms for the run
    #[serde(default)]
    pub associations: Vec<AssociationRow>,
}

impl InputBundle {
    /// Load a bundle from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LexibankError::io(format!("Failed to read input bundle: {}", path.display()), e)
        })?;
        let bundle: Self = serde_json::from_str(&content)?;

        debug!(
            targets = bundle.targets.len(),
            vocabulary = bundle.vocabulary.len(),
            associations = bundle.associations.len(),
            "input bundle loaded"
        );
        Ok(bundle)
    }

    /// Save the bundle to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            LexibankError::io(
                format!("Failed to write input bundle: {}", path.display()),
                e,
            )
        })
    }

    /// The vocabulary as `(word, part_of_speech)` pairs for engine construction.
    pub fn vocabulary_pairs(&self) -> Vec<(String, PartOfSpeech)> {
        self.vocabulary
            .iter()
            .map(|seed| (seed.word.clone(), seed.part_of_speech))
            .collect()
    }
}

/// Relationship block of a persisted wordbank entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipsSection {
    /// Accepted synonyms
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Accepted antonyms
    #[serde(default)]
    pub antonyms: Vec<String>,

    /// Associated words, strongest first
    #[serde(default)]
    pub associated: Vec<String>,

    /// Rhyming words
    #[serde(default)]
    pub rhymes: Vec<String>,
}

/// One persisted wordbank entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordbankEntry {
    /// Stable identifier (the normalized word)
    pub id: String,

    /// The word
    pub word: String,

    /// Part of speech
    pub part_of_speech: PartOfSpeech,

    /// Starting-sound group
    #[serde(default)]
    pub sound_group: String,

    /// Resolved category tags (array of per-source tags)
    #[serde(default)]
    pub category: Vec<CategoryTag>,

    /// Relationship block
    #[serde(default)]
    pub relationships: RelationshipsSection,

    /// Selected distractors
    #[serde(default)]
    pub distractors: Vec<String>,

    /// Frequency rank, absent when unranked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<u32>,

    /// Whether the entry needs human review
    #[serde(default)]
    pub needs_review: bool,

    /// Structured review reasons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_reasons: Vec<ReviewReason>,
}

impl From<&LexicalRecord> for WordbankEntry {
    fn from(record: &LexicalRecord) -> Self {
        Self {
            id: record.word.clone(),
            word: record.word.clone(),
            part_of_speech: record.part_of_speech,
            sound_group: record.sound_group.clone(),
            category: record.categories.clone(),
            relationships: RelationshipsSection {
                synonyms: record.relationships.synonyms.iter().cloned().collect(),
                antonyms: record.relationships.antonyms.iter().cloned().collect(),
                associated: record.associated.clone(),
                rhymes: record.rhymes.iter().cloned().collect(),
            },
            distractors: record.distractors.clone(),
            frequency_rank: record.frequency_rank,
            needs_review: record.needs_review,
            review_reasons: record.review_reasons.clone(),
        }
    }
}

impl WordbankEntry {
    /// Rebuild the in-memory record form of this entry (for auditing).
    pub fn to_record(&self) -> LexicalRecord {
        let mut relationships = ValidatedRelationshipSet::default();
        relationships.synonyms = self
            .relationships
            .synonyms
            .iter()
            .map(|w| normalize(w))
            .collect();
        relationships.antonyms = self
            .relationships
            .antonyms
            .iter()
            .map(|w| normalize(w))
            .collect();

        let rhymes: IndexSet<String> = self
            .relationships
            .rhymes
            .iter()
            .map(|w| normalize(w))
            .collect();

        LexicalRecord {
            word: normalize(&self.word),
            part_of_speech: self.part_of_speech,
            frequency_rank: self.frequency_rank,
            relationships,
            associated: self.relationships.associated.iter().map(|w| normalize(w)).collect(),
            categories: self.category.clone(),
            rhymes,
            sound_group: self.sound_group.clone(),
            distractors: self.distractors.clone(),
            needs_review: self.needs_review,
            review_reasons: self.review_reasons.clone(),
        }
    }
}

/// The persisted wordbank document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordbankDocument {
    /// Generator version that produced the document
    pub version: String,

    /// Language code of the wordbank
    pub language: String,

    /// When the document was generated
    pub generated_at: DateTime<Utc>,

    /// The entries
    pub entries: Vec<WordbankEntry>,
}

impl WordbankDocument {
    /// Build a document from resolved records.
    pub fn from_records(records: &[LexicalRecord], language: impl Into<String>) -> Self {
        Self {
            version: crate::VERSION.to_string(),
            language: language.into(),
            generated_at: Utc::now(),
            entries: records.iter().map(WordbankEntry::from).collect(),
        }
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LexibankError::io(format!("Failed to read wordbank: {}", path.display()), e)
        })?;
        serde_json::from_str(&content).map_err(Into::into)
    }

    /// Save the document to a JSON file (pretty-printed).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            LexibankError::io(format!("Failed to write wordbank: {}", path.display()), e)
        })
    }

    /// Number of entries flagged for review.
    pub fn needing_review(&self) -> usize {
        self.entries.iter().filter(|e| e.needs_review).count()
    }
}
