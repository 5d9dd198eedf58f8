//! Data carriers for raw lexical signal and resolved records.
//!
//! A [`WordSignals`] bundle is what the external fetchers deliver for one
//! target word; a [`LexicalRecord`] is the fully resolved aggregate the
//! engine hands back. Neither type contains logic beyond construction and
//! membership queries — resolution lives in the `resolvers` modules.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::tokens::{normalize, PartOfSpeech};

/// Which relationship list a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Same-meaning relationship
    Synonym,
    /// Opposite-meaning relationship
    Antonym,
}

impl RelationKind {
    /// Lowercase label for log and audit output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Synonym => "synonym",
            Self::Antonym => "antonym",
        }
    }
}

/// A raw synonym/antonym candidate as reported by one external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Candidate word as reported (normalized during validation)
    pub word: String,

    /// Identifier of the source that reported it
    pub source: String,

    /// Optional source-specific score; unused by the acceptance rules but
    /// preserved for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RawCandidate {
    /// Create a candidate without a score.
    pub fn new(word: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            source: source.into(),
            score: None,
        }
    }
}

/// One cue→target row from a free-association norms collection.
///
/// `strength` is the fraction (or count) of respondents who produced the
/// target in response to the cue; rows with non-finite or negative strength
/// are treated as malformed and skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRow {
    /// Cue word (matched case-insensitively against the target word)
    pub cue: String,

    /// Response word produced for the cue
    pub target: String,

    /// Association strength, non-negative
    pub strength: f64,
}

impl AssociationRow {
    /// Create a row.
    pub fn new(cue: impl Into<String>, target: impl Into<String>, strength: f64) -> Self {
        Self {
            cue: cue.into(),
            target: target.into(),
            strength,
        }
    }
}

/// A category tag as reported by one source.
///
/// Labels are source-specific, unnormalized strings; the resolver reproduces
/// them verbatim and deduplicates only on the full `(source, label)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryTag {
    /// Identifier of the reporting source
    pub source: String,

    /// Category label exactly as the source reported it
    pub label: String,
}

impl CategoryTag {
    /// Create a tag.
    pub fn new(source: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
        }
    }
}

/// Accepted synonym and antonym sets for one target word.
///
/// Both sets are ordered (first-seen/priority order), deduplicated on the
/// normalized token, and never contain the target word itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRelationshipSet {
    /// Accepted synonyms, in acceptance order
    pub synonyms: IndexSet<String>,

    /// Accepted antonyms, in acceptance order
    pub antonyms: IndexSet<String>,
}

impl ValidatedRelationshipSet {
    /// Whether the token appears in either relationship set.
    pub fn contains(&self, token: &str) -> bool {
        self.synonyms.contains(token) || self.antonyms.contains(token)
    }

    /// Whether both sets are empty.
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty() && self.antonyms.is_empty()
    }

    /// Total number of accepted relationships.
    pub fn len(&self) -> usize {
        self.synonyms.len() + self.antonyms.len()
    }
}

/// Raw per-word input bundle delivered by the external fetchers.
///
/// This is the deserialized form of what the out-of-scope dictionary,
/// thesaurus, category, and rhyme collaborators produce for one target word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSignals {
    /// Target word (normalized by the pipeline before resolution)
    pub word: String,

    /// Part of speech of the target word
    #[serde(default)]
    pub part_of_speech: PartOfSpeech,

    /// Raw synonym candidates, tagged per source
    #[serde(default)]
    pub synonyms: Vec<RawCandidate>,

    /// Raw antonym candidates, tagged per source
    #[serde(default)]
    pub antonyms: Vec<RawCandidate>,

    /// Raw category tags, one per reporting source
    #[serde(default)]
    pub categories: Vec<CategoryTag>,

    /// Rhyming words supplied by an external rhyme fetcher
    #[serde(default)]
    pub rhymes: Vec<String>,

    /// Precomputed starting-sound group; when absent the pipeline derives one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_group: Option<String>,

    /// Frequency rank supplied by the caller (smaller = more frequent);
    /// falls back to the run vocabulary when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<u32>,
}

impl WordSignals {
    /// Create an empty signal bundle for a word.
    pub fn new(word: impl Into<String>, part_of_speech: PartOfSpeech) -> Self {
        Self {
            word: word.into(),
            part_of_speech,
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            categories: Vec::new(),
            rhymes: Vec::new(),
            sound_group: None,
            frequency_rank: None,
        }
    }
}

/// A condition that marks a resolved record for human review.
///
/// Review reasons are computed by the pipeline (orchestrator role); the
/// individual resolvers only report empty results and never set flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReviewReason {
    /// Neither synonyms nor antonyms survived validation
    NoRelationships,
    /// No association rows matched the target word
    NoAssociations,
    /// Fewer distractors were eligible than were requested
    InsufficientDistractors {
        /// How many distractors the run asked for
        requested: usize,
        /// How many were actually eligible
        found: usize,
    },
}

/// The fully resolved aggregate for one target word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalRecord {
    /// Normalized target word token
    pub word: String,

    /// Part of speech of the target word
    pub part_of_speech: PartOfSpeech,

    /// Frequency rank (smaller = more frequent), if the word is ranked
    pub frequency_rank: Option<u32>,

    /// Validated synonym/antonym sets
    pub relationships: ValidatedRelationshipSet,

    /// Associated words, strongest first, at most the configured maximum
    pub associated: Vec<String>,

    /// Resolved category tags, first-seen order across sources
    pub categories: Vec<CategoryTag>,

    /// Rhyming words to exclude from distractors (normalized, ordered)
    pub rhymes: IndexSet<String>,

    /// Starting-sound group token
    pub sound_group: String,

    /// Selected distractor words, in selection order
    pub distractors: Vec<String>,

    /// Whether this record needs human review before clinical use
    pub needs_review: bool,

    /// Structured reasons behind `needs_review`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_reasons: Vec<ReviewReason>,
}

impl LexicalRecord {
    /// Create an empty record for a word about to be resolved.
    pub fn new(word: &str, part_of_speech: PartOfSpeech) -> Self {
        Self {
            word: normalize(word),
            part_of_speech,
            frequency_rank: None,
            relationships: ValidatedRelationshipSet::default(),
            associated: Vec::new(),
            categories: Vec::new(),
            rhymes: IndexSet::new(),
            sound_group: String::new(),
            distractors: Vec::new(),
            needs_review: false,
            review_reasons: Vec::new(),
        }
    }

    /// Character length of the target token.
    pub fn word_length(&self) -> usize {
        self.word.chars().count()
    }

    /// Whether the token appears anywhere in the record's exclusion data
    /// (relationships, associations, or rhymes).
    pub fn mentions(&self, token: &str) -> bool {
        self.relationships.contains(token)
            || self.associated.iter().any(|a| a == token)
            || self.rhymes.contains(token)
    }
}
