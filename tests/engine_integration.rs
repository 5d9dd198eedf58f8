//! End-to-end integration tests for the resolution engine.

use lexibank_rs::core::record::{
    AssociationRow, CategoryTag, RawCandidate, ReviewReason, WordSignals,
};
use lexibank_rs::core::tokens::PartOfSpeech;
use lexibank_rs::io::wordbank::{WordbankDocument, WordbankEntry};
use lexibank_rs::resolvers::relationships::AcceptanceProfile;
use lexibank_rs::{LexibankConfig, LexibankEngine};

fn noun_vocabulary() -> Vec<(String, PartOfSpeech)> {
    ["lamp", "tree", "rock", "fish", "moon", "sand", "coin", "vase"]
        .iter()
        .map(|w| ((*w).to_string(), PartOfSpeech::Noun))
        .collect()
}

fn engine_with(config: LexibankConfig, rows: Vec<AssociationRow>) -> LexibankEngine {
    LexibankEngine::new(config, noun_vocabulary(), rows).unwrap()
}

#[test]
fn agreement_profile_accepts_only_corroborated_synonyms() {
    let mut config = LexibankConfig::default();
    config.validation.profile = AcceptanceProfile::Agreement { min_sources: 2 };
    config.distractor.count = 2;
    let engine = engine_with(config, Vec::new());

    let mut signals = WordSignals::new("best", PartOfSpeech::Adjective);
    signals.synonyms.push(RawCandidate::new("optimal", "source_a"));
    signals.synonyms.push(RawCandidate::new("optimal", "source_b"));
    signals.synonyms.push(RawCandidate::new("decent", "source_a"));

    let record = engine.resolve_word(&signals).unwrap();
    let synonyms: Vec<&str> = record
        .relationships
        .synonyms
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(synonyms, vec!["optimal"]);
}

#[test]
fn association_ranking_matches_norms_ordering() {
    let rows = vec![
        AssociationRow::new("ABDOMEN", "BODY", 0.072),
        AssociationRow::new("ABDOMEN", "MUSCLE", 0.046),
    ];
    let mut config = LexibankConfig::default();
    config.distractor.count = 2;
    let engine = engine_with(config, rows);

    let signals = WordSignals::new("abdomen", PartOfSpeech::Noun);
    let record = engine.resolve_word(&signals).unwrap();
    assert_eq!(
        record.associated,
        vec!["body".to_string(), "muscle".to_string()]
    );
}

#[test]
fn categories_only_for_eligible_parts_of_speech() {
    let mut config = LexibankConfig::default();
    config.distractor.count = 2;
    let engine = engine_with(config, Vec::new());

    let mut verb = WordSignals::new("run", PartOfSpeech::Verb);
    verb.categories.push(CategoryTag::new("hypernyms", "motion"));
    let record = engine.resolve_word(&verb).unwrap();
    assert!(record.categories.is_empty());

    let mut noun = WordSignals::new("dog", PartOfSpeech::Noun);
    noun.categories.push(CategoryTag::new("hypernyms", "animal"));
    noun.categories.push(CategoryTag::new("hypernyms", "animal"));
    let record = engine.resolve_word(&noun).unwrap();
    assert_eq!(record.categories.len(), 1);
}

#[test]
fn distractors_avoid_every_exclusion_class() {
    let rows = vec![AssociationRow::new("dog", "fish", 0.2)];
    let mut config = LexibankConfig::default();
    config.distractor.count = 8;
    let engine = engine_with(config, rows);

    let mut signals = WordSignals::new("dog", PartOfSpeech::Noun);
    signals.synonyms.push(RawCandidate::new("lamp", "source_a"));
    signals.synonyms.push(RawCandidate::new("lamp", "source_b"));
    signals.antonyms.push(RawCandidate::new("tree", "source_a"));
    signals.antonyms.push(RawCandidate::new("tree", "source_b"));
    signals.rhymes.push("rock".to_string());

    let record = engine.resolve_word(&signals).unwrap();

    for excluded in ["dog", "lamp", "tree", "rock", "fish"] {
        assert!(
            !record.distractors.contains(&excluded.to_string()),
            "{excluded} must not be a distractor"
        );
    }
    // The remaining vocabulary is shorter than requested, so the record is
    // flagged rather than the call failing.
    assert!(record.needs_review);
    assert!(record
        .review_reasons
        .iter()
        .any(|r| matches!(r, ReviewReason::InsufficientDistractors { .. })));
}

#[test]
fn distractors_share_the_target_part_of_speech() {
    let vocabulary = vec![
        ("lamp".to_string(), PartOfSpeech::Noun),
        ("jump".to_string(), PartOfSpeech::Verb),
        ("walk".to_string(), PartOfSpeech::Verb),
        ("tree".to_string(), PartOfSpeech::Noun),
    ];
    let mut config = LexibankConfig::default();
    config.distractor.count = 4;
    let engine = LexibankEngine::new(config, vocabulary, Vec::new()).unwrap();

    let record = engine
        .resolve_word(&WordSignals::new("sing", PartOfSpeech::Verb))
        .unwrap();
    assert_eq!(
        record.distractors,
        vec!["jump".to_string(), "walk".to_string()]
    );
}

#[test]
fn batch_results_serialize_to_wordbank_document() {
    let mut config = LexibankConfig::default();
    config.distractor.count = 2;
    let engine = engine_with(config, Vec::new());

    let batch = vec![
        WordSignals::new("dog", PartOfSpeech::Noun),
        WordSignals::new("cat", PartOfSpeech::Noun),
    ];
    let results = engine.resolve_batch(&batch).unwrap();
    assert_eq!(results.summary.words_resolved, 2);

    let document = WordbankDocument::from_records(&results.entries, "en");
    assert_eq!(document.entries.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordbank.json");
    document.save(&path).unwrap();

    let loaded = WordbankDocument::load(&path).unwrap();
    assert_eq!(loaded.entries[0].word, "dog");

    // Entries survive the record round trip used by the audit command.
    let reloaded: Vec<_> = loaded.entries.iter().map(WordbankEntry::to_record).collect();
    assert_eq!(reloaded[0].distractors, results.entries[0].distractors);
}

#[test]
fn rerunning_identical_batches_is_deterministic() {
    let rows = vec![
        AssociationRow::new("dog", "bone", 0.3),
        AssociationRow::new("dog", "tail", 0.3),
    ];

    let run = |rows: Vec<AssociationRow>| {
        let mut config = LexibankConfig::default();
        config.distractor.count = 3;
        let engine = engine_with(config, rows);
        let batch = vec![
            WordSignals::new("dog", PartOfSpeech::Noun),
            WordSignals::new("cat", PartOfSpeech::Noun),
        ];
        engine.resolve_batch(&batch).unwrap()
    };

    let first = run(rows.clone());
    let second = run(rows);

    for (a, b) in first.entries.iter().zip(second.entries.iter()) {
        assert_eq!(a.word, b.word);
        assert_eq!(a.associated, b.associated);
        assert_eq!(a.distractors, b.distractors);
        assert_eq!(a.review_reasons, b.review_reasons);
    }
}
