//! # Lexibank-RS: Lexical Relationship & Distractor Resolution Engine
//!
//! A Rust engine for curating structured lexical entries used in clinical
//! language-therapy exercises. Raw signal from independent lexical sources is
//! reconciled into high-confidence, pedagogically safe output:
//!
//! - **Relationship validation**: cross-source synonym/antonym acceptance under
//!   configurable quality profiles
//! - **Association ranking**: free-association norms reduced to a bounded,
//!   strength-ordered associated-word set
//! - **Category resolution**: multi-source category tags merged for eligible
//!   parts of speech
//! - **Distractor selection**: multiple-choice distractors chosen under eight
//!   simultaneous constraints with tiered length fallback and run-wide
//!   usage fairness
//!
//! The engine performs no network I/O, caching, or persistence of its own;
//! fetchers, norms loaders, and frequency lists are external collaborators
//! whose already-parsed output is handed in through narrow interfaces.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        API Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Core Engine   │  Resolvers      │  Phonetics │  I/O        │
//! │                │                 │            │             │
//! │ • Records      │ • Relationships │ • Sound    │ • Wordbank  │
//! │ • State        │ • Associations  │   groups   │   documents │
//! │ • Pipeline     │ • Categories    │            │ • Input     │
//! │ • Config       │ • Distractors   │            │   bundles   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lexibank_rs::{LexibankConfig, LexibankEngine};
//! use lexibank_rs::core::record::WordSignals;
//! use lexibank_rs::core::tokens::PartOfSpeech;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LexibankConfig::default();
//!     let vocabulary = vec![
//!         ("cat".to_string(), PartOfSpeech::Noun),
//!         ("house".to_string(), PartOfSpeech::Noun),
//!     ];
//!     let engine = LexibankEngine::new(config, vocabulary, Vec::new())?;
//!
//!     let signals = WordSignals::new("dog", PartOfSpeech::Noun);
//!     let record = engine.resolve_word(&signals)?;
//!     println!("distractors: {:?}", record.distractors);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core engine modules
pub mod core {
    //! Core data structures, configuration, and the resolution pipeline.

    pub mod config;
    pub mod errors;
    pub mod pipeline;
    pub mod record;
    pub mod state;
    pub mod tokens;
}

// Resolver components (one per resolution concern)
pub mod resolvers {
    //! Resolution components for relationships, associations, categories,
    //! and distractors.

    pub mod associations;
    pub mod categories;
    pub mod distractors;
    pub mod relationships;
}

// Phonetic helpers
pub mod phonetics {
    //! Starting-sound detection for phonetic exclusion rules.

    pub mod sound;
}

// I/O and persistence of resolved wordbanks
pub mod io {
    //! Input-bundle loading and wordbank document persistence.

    pub mod wordbank;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use api::engine::LexibankEngine;
pub use api::results::{ResolutionResults, RunSummary};
pub use core::config::LexibankConfig;
pub use core::errors::{LexibankError, Result, ResultExt};
pub use core::record::LexicalRecord;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build-time feature detection
pub mod features {
    //! Runtime feature detection.

    /// Check if parallel batch resolution is enabled
    pub const fn has_parallel() -> bool {
        cfg!(feature = "parallel")
    }
}
