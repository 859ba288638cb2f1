//! Analysis configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object is
//! a complete configuration. Command-line options are applied on top by the
//! binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embedding::{ReferenceWords, VectorDimensions, VectorSource};
use crate::error::{GenderBiasError, Result};
use crate::nlp::cleaner::{EmptyCorrections, TextCleaner};
use crate::nlp::spelling::SpellChecker;
use crate::nlp::tagger::{PosTagger, TokenTagger};
use crate::pipeline::validation::{ValidationEngine, ValidationReport};
use crate::types::WordSource;

/// Environment variable consulted when no vector directory is configured
pub const GLOVE_PATH_ENV: &str = "GLOVE_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub vectors: VectorConfig,
    pub reference: ReferenceWords,
    pub cleaning: CleaningConfig,
    pub tagging: TaggingConfig,
    pub frequency: FrequencyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    /// Directory holding `glove.6B.<d>d.txt`
    pub dir: Option<PathBuf>,
    /// One of 50, 100, 200, 300
    pub dimensions: u32,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            dir: None,
            dimensions: VectorDimensions::default().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Replacement for runs of non-alphanumeric characters
    pub replace_char: String,
    pub empty_corrections: EmptyCorrections,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            replace_char: " ".to_string(),
            empty_corrections: EmptyCorrections::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Relabel PROPN tokens as NOUN
    pub convert_proper_nouns: bool,
    pub word_source: WordSource,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            convert_proper_nouns: true,
            word_source: WordSource::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Divide word frequencies by the frequency of the word's dominant POS
    pub normalize_by_pos: bool,
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GenderBiasError::json("parsing configuration", e))
    }

    /// Read a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GenderBiasError::io(format!("reading {}", path.display()), e))?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Configured vector directory, else `$GLOVE_PATH`
    pub fn vector_dir(&self) -> Option<PathBuf> {
        self.vectors
            .dir
            .clone()
            .or_else(|| std::env::var_os(GLOVE_PATH_ENV).map(PathBuf::from))
    }

    pub fn vector_dimensions(&self) -> Result<VectorDimensions> {
        VectorDimensions::try_from(self.vectors.dimensions).map_err(GenderBiasError::invalid_config)
    }

    /// Where to find the vectors; fails when no directory is known
    pub fn vector_source(&self) -> Result<VectorSource> {
        let dir = self.vector_dir().ok_or_else(|| {
            GenderBiasError::invalid_config(format!(
                "no vector directory configured and {GLOVE_PATH_ENV} is not set"
            ))
        })?;
        Ok(VectorSource::new(dir, self.vector_dimensions()?))
    }

    /// Run the default validation rules
    pub fn validate(&self) -> ValidationReport {
        ValidationEngine::with_defaults().validate(self)
    }

    /// Validate, log warnings, and turn errors into [`GenderBiasError::InvalidConfig`]
    pub fn ensure_valid(&self) -> Result<ValidationReport> {
        let report = self.validate();
        for warning in report.warnings() {
            tracing::warn!(path = %warning.path, "{}", warning.message);
        }
        if report.has_errors() {
            let message = report
                .errors()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GenderBiasError::invalid_config(message));
        }
        Ok(report)
    }

    /// A cleaner following the `cleaning` section
    pub fn text_cleaner<S: SpellChecker>(&self, spell_checker: S) -> TextCleaner<S> {
        TextCleaner::new(spell_checker)
            .with_replace_char(self.cleaning.replace_char.as_str())
            .with_empty_corrections(self.cleaning.empty_corrections)
    }

    /// A tagger following the `tagging` section
    pub fn token_tagger<T: PosTagger>(&self, backend: T) -> TokenTagger<T> {
        TokenTagger::new(backend).with_proper_noun_folding(self.tagging.convert_proper_nouns)
    }
}
