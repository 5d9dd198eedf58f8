//! Configuration types and management for lexibank-rs.
//!
//! Every behavioral knob of the engine lives here or in the per-resolver
//! config structs this aggregate composes. Policy is uniform across all
//! words: stoplists, agreement thresholds, and eligible part-of-speech sets
//! are configuration data, and no word receives bespoke logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{LexibankError, Result};
use crate::core::state::VocabularyConfig;
use crate::phonetics::sound::SoundLanguage;
use crate::resolvers::associations::AssociationConfig;
use crate::resolvers::categories::CategoryConfig;
use crate::resolvers::distractors::DistractorConfig;
use crate::resolvers::relationships::ValidationConfig;

/// Main configuration for the lexibank resolution engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexibankConfig {
    /// Relationship validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Association ranking settings
    #[serde(default)]
    pub association: AssociationConfig,

    /// Category resolution settings
    #[serde(default)]
    pub category: CategoryConfig,

    /// Distractor selection settings
    #[serde(default)]
    pub distractor: DistractorConfig,

    /// Vocabulary loading settings
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    /// Language whose sound patterns apply to this run
    #[serde(default)]
    pub sound_language: SoundLanguage,
}

impl LexibankConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            LexibankError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            LexibankError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validation.validate()?;
        self.association.validate()?;
        self.category.validate()?;
        self.distractor.validate()?;
        self.vocabulary.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolvers::relationships::AcceptanceProfile;

    #[test]
    fn test_default_config_is_valid() {
        let config = LexibankConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sections() {
        let mut config = LexibankConfig::default();
        config.distractor.count = 0;
        assert!(config.validate().is_err());

        let mut config = LexibankConfig::default();
        config.validation.profile = AcceptanceProfile::Agreement { min_sources: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = LexibankConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: LexibankConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.distractor.count, config.distractor.count);
        assert_eq!(back.association.max_associated, config.association.max_associated);
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexibank.yml");

        let config = LexibankConfig::default();
        config.to_yaml_file(&path).unwrap();

        let loaded = LexibankConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded.vocabulary.frequent_threshold, 5000);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "distractor:\n  count: 4\n  length_tolerances: [0, 1]\n  max_reuse: 2\n";
        let config: LexibankConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.distractor.count, 4);
        assert_eq!(config.association.max_associated, 5);
        assert!(config.validate().is_ok());
    }
}
