//! Word tokens, part-of-speech tags, and the candidate quality predicate.
//!
//! Every word entering the engine is reduced to a normalized token
//! (lowercased, trimmed); equality and uniqueness are defined on that form.
//! The [`TokenFilter`] implements the quality predicate shared by the
//! relationship validator and the association ranker.

use std::fmt;

use ahash::AHashSet;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Normalize a raw word into its canonical token form.
///
/// Tokens are lowercased and trimmed; all equality checks in the engine are
/// performed on normalized tokens.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Part of speech of a word entry.
///
/// A word entry carries exactly one tag; when a source reports several, the
/// first-listed tag wins (see [`PartOfSpeech::from_label`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    /// Concrete or abstract referent
    #[default]
    Noun,
    /// Action word
    Verb,
    /// Quality word
    Adjective,
    /// Manner word
    Adverb,
    /// Anything a source reports outside the four main classes
    Other,
}

impl PartOfSpeech {
    /// Map a source-reported tag label onto a part of speech.
    ///
    /// Unrecognized labels map to [`PartOfSpeech::Other`]; sources disagree on
    /// labels ("adj", "adjective"), so the common spellings are accepted.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "noun" | "n" => Self::Noun,
            "verb" | "v" => Self::Verb,
            "adjective" | "adj" => Self::Adjective,
            "adverb" | "adv" => Self::Adverb,
            _ => Self::Other,
        }
    }

    /// Canonical lowercase label for this part of speech.
    pub fn label(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Default function-word stoplist applied when loading frequency vocabularies.
///
/// Pronouns, auxiliaries, prepositions, conjunctions, determiners, and common
/// function adverbs/abstract words make poor exercise material and are kept
/// out of the candidate vocabulary.
pub static FUNCTION_WORDS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        // Pronouns
        "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him", "his",
        "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us", "our",
        "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "who", "whom",
        "whose", "which", "what", "that", "this", "these", "those",
        // Auxiliary/modal verbs
        "be", "am", "is", "are", "was", "were", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "done", "will", "would", "shall", "should", "can", "could",
        "may", "might", "must",
        // Prepositions
        "about", "above", "across", "after", "against", "along", "among", "around", "at",
        "before", "behind", "below", "beneath", "beside", "between", "beyond", "by", "down",
        "during", "except", "for", "from", "in", "inside", "into", "like", "near", "of", "off",
        "on", "onto", "out", "outside", "over", "past", "since", "through", "throughout", "till",
        "to", "toward", "towards", "under", "underneath", "until", "up", "upon", "with", "within",
        "without",
        // Conjunctions
        "and", "or", "but", "nor", "so", "yet", "if", "then", "else", "because", "although",
        "though", "unless", "while", "whereas", "whether",
        // Articles and determiners
        "the", "a", "an", "some", "any", "no", "every", "each", "either", "neither", "both",
        "few", "many", "much", "more", "most", "other", "another", "such", "all", "half",
        "several", "enough",
        // Common function adverbs
        "very", "too", "quite", "rather", "just", "only", "also", "even", "still", "already",
        "always", "never", "ever", "often", "sometimes", "usually", "again", "further", "once",
        "here", "there", "now", "well", "how", "when", "where", "why",
        // Common abstract/function words
        "get", "got", "make", "made", "go", "went", "gone", "know", "think", "see", "come",
        "take", "want", "use", "thing", "things", "way", "ways", "something", "anything",
        "nothing", "everything", "someone", "anyone", "everyone", "nobody", "back", "going",
    ]
    .into_iter()
    .collect()
});

/// Quality predicate for candidate tokens.
///
/// A candidate passes when it is a single whitespace-free token, composed of
/// alphabetic characters only, at least `min_length` characters long, not
/// equal (case-insensitively) to the target word, and not present in the
/// configured stoplist. The stoplist is supplied as configuration data; no
/// word ever receives bespoke logic.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    min_length: usize,
    stoplist: AHashSet<String>,
}

impl TokenFilter {
    /// Create a filter with the given minimum token length and stoplist.
    ///
    /// Stoplist entries are normalized on the way in.
    pub fn new(min_length: usize, stoplist: impl IntoIterator<Item = String>) -> Self {
        Self {
            min_length,
            stoplist: stoplist.into_iter().map(|w| normalize(&w)).collect(),
        }
    }

    /// Check structural sanity of a normalized token (single alphabetic token
    /// of sufficient length). Does not compare against a target word.
    pub fn is_well_formed(&self, token: &str) -> bool {
        if token.is_empty() || token.contains(char::is_whitespace) {
            return false;
        }
        if !token.chars().all(char::is_alphabetic) {
            return false;
        }
        token.chars().count() >= self.min_length
    }

    /// Apply the full quality predicate to a normalized candidate token for
    /// the given normalized target word.
    pub fn accepts(&self, token: &str, target: &str) -> bool {
        self.is_well_formed(token) && token != target && !self.stoplist.contains(token)
    }

    /// Whether a token is in the configured stoplist.
    pub fn is_stoplisted(&self, token: &str) -> bool {
        self.stoplist.contains(token)
    }
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self {
            min_length: 3,
            stoplist: AHashSet::new(),
        }
    }
}
