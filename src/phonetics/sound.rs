//! Starting-sound group detection for phonetic exclusion rules.
//!
//! Words are grouped by their initial written sound pattern so exercises can
//! avoid distractors that sound like the target. Handles digraphs (th, sh,
//! ch), silent-letter onsets (kn, wr), and consonant clusters (str, spr); the
//! group token is the matched written pattern, used as an opaque string by
//! the distractor rules.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::tokens::normalize;

/// Language whose onset patterns the detector applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoundLanguage {
    /// English onset patterns
    #[default]
    English,
    /// German onset patterns
    German,
}

impl SoundLanguage {
    /// Resolve a two-letter language code; unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "de" => Self::German,
            _ => Self::English,
        }
    }
}

/// English onset patterns, longest first so the longest prefix wins.
/// Format: (written pattern, phonetic representation).
const PATTERNS_EN: &[(&str, &str)] = &[
    // Three-letter patterns
    ("thr", "θr"),
    ("shr", "ʃr"),
    ("scr", "skr"),
    ("spr", "spr"),
    ("str", "str"),
    ("squ", "skw"),
    ("sch", "sk"),
    // Two-letter patterns
    ("th", "θ"),
    ("sh", "ʃ"),
    ("ch", "tʃ"),
    ("ph", "f"),
    ("wh", "w"),
    ("wr", "r"),
    ("kn", "n"),
    ("gn", "n"),
    ("qu", "kw"),
    ("ck", "k"),
    ("ng", "ŋ"),
];

/// German onset patterns, longest first.
const PATTERNS_DE: &[(&str, &str)] = &[
    ("sch", "ʃ"),
    ("chr", "kr"),
    ("chs", "ks"),
    ("ch", "x"),
    ("ph", "f"),
    ("qu", "kv"),
    ("sp", "ʃp"),
    ("st", "ʃt"),
    ("th", "t"),
    ("pf", "pf"),
    ("kn", "kn"),
    ("gn", "gn"),
    // Umlauts
    ("ä", "ɛ"),
    ("ö", "ø"),
    ("ü", "y"),
];

/// Detects the starting sound group of words.
#[derive(Debug, Clone)]
pub struct SoundGroupDetector {
    language: SoundLanguage,
    patterns: &'static [(&'static str, &'static str)],
}

impl SoundGroupDetector {
    /// Create a detector for the given language.
    pub fn new(language: SoundLanguage) -> Self {
        let patterns = match language {
            SoundLanguage::English => PATTERNS_EN,
            SoundLanguage::German => PATTERNS_DE,
        };
        Self { language, patterns }
    }

    /// Language this detector was built for.
    pub fn language(&self) -> SoundLanguage {
        self.language
    }

    /// Starting sound group for a word (e.g. "sh", "th", "a").
    ///
    /// The longest matching onset pattern wins; words with no multi-letter
    /// onset fall back to their first character. Empty input yields an empty
    /// group.
    pub fn sound_group(&self, word: &str) -> String {
        let token = normalize(word);
        if token.is_empty() {
            return String::new();
        }

        for (pattern, _) in self.patterns {
            if token.starts_with(pattern) {
                return (*pattern).to_string();
            }
        }

        token.chars().take(1).collect()
    }

    /// IPA-like phonetic representation of the starting sound.
    pub fn phonetic(&self, word: &str) -> String {
        let token = normalize(word);
        if token.is_empty() {
            return String::new();
        }

        for (pattern, phonetic) in self.patterns {
            if token.starts_with(pattern) {
                return (*phonetic).to_string();
            }
        }

        token.chars().take(1).collect()
    }

    /// Whether two words start with the same sound group.
    pub fn same_sound(&self, first: &str, second: &str) -> bool {
        self.sound_group(first) == self.sound_group(second)
    }

    /// Group words by their starting sound, preserving input order within
    /// each group.
    pub fn group_by_sound<'a, I>(&self, words: I) -> IndexMap<String, Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for word in words {
            let sound = self.sound_group(word);
            groups.entry(sound).or_default().push(normalize(word));
        }
        groups
    }
}

impl Default for SoundGroupDetector {
    fn default() -> Self {
        Self::new(SoundLanguage::English)
    }
}
