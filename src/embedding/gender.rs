//! Masculine-minus-feminine cosine similarity scores
//!
//! A word's gender score is its mean cosine similarity to a set of masculine
//! reference words minus its mean cosine similarity to a set of feminine
//! ones. Positive scores lean masculine, negative scores lean feminine.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::store::WordVectors;
use crate::error::{GenderBiasError, Result};

pub const DEFAULT_MASCULINE: [&str; 5] = ["man", "he", "his", "masculine", "male"];
pub const DEFAULT_FEMININE: [&str; 5] = ["woman", "she", "her", "feminine", "female"];

/// Masculine and feminine reference word lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceWords {
    pub masculine: Vec<String>,
    pub feminine: Vec<String>,
}

impl Default for ReferenceWords {
    fn default() -> Self {
        Self {
            masculine: DEFAULT_MASCULINE.iter().map(|w| w.to_string()).collect(),
            feminine: DEFAULT_FEMININE.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Result of scoring a word list
///
/// `NotFound` means none of the requested words is in the vocabulary. It is
/// "no data", never a score of zero.
#[derive(Debug, Clone, PartialEq)]
pub enum GenderScores {
    Found(FxHashMap<String, f64>),
    NotFound,
}

impl GenderScores {
    /// Score for one (lowercase) word
    pub fn get(&self, word: &str) -> Option<f64> {
        match self {
            Self::Found(scores) => scores.get(word).copied(),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Number of scored words
    pub fn len(&self) -> usize {
        match self {
            Self::Found(scores) => scores.len(),
            Self::NotFound => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_map(&self) -> Option<&FxHashMap<String, f64>> {
        match self {
            Self::Found(scores) => Some(scores),
            Self::NotFound => None,
        }
    }

    pub fn into_map(self) -> Option<FxHashMap<String, f64>> {
        match self {
            Self::Found(scores) => Some(scores),
            Self::NotFound => None,
        }
    }
}

/// Gender scorer over a loaded vector space
///
/// Built once and shared by reference across every pipeline stage that
/// needs scores.
#[derive(Debug, Clone)]
pub struct GloveDistances {
    vectors: WordVectors,
    reference: ReferenceWords,
}

impl GloveDistances {
    /// Create a scorer
    ///
    /// Both reference lists must be non-empty and every reference word must
    /// be in the vocabulary.
    pub fn new(vectors: WordVectors, reference: ReferenceWords) -> Result<Self> {
        for (name, words) in [
            ("masculine", &reference.masculine),
            ("feminine", &reference.feminine),
        ] {
            if words.is_empty() {
                return Err(GenderBiasError::invalid_config(format!(
                    "{name} reference word list is empty"
                )));
            }
        }
        if let Some(word) = reference
            .masculine
            .iter()
            .chain(&reference.feminine)
            .find(|w| !vectors.contains(w))
        {
            return Err(GenderBiasError::MissingReferenceWord { word: word.clone() });
        }
        Ok(Self { vectors, reference })
    }

    /// Create a scorer with the default reference words
    pub fn with_default_reference(vectors: WordVectors) -> Result<Self> {
        Self::new(vectors, ReferenceWords::default())
    }

    pub fn vectors(&self) -> &WordVectors {
        &self.vectors
    }

    pub fn reference(&self) -> &ReferenceWords {
        &self.reference
    }

    /// Score a single word
    pub fn gender_difference_word(&self, word: &str) -> GenderScores {
        self.gender_difference([word])
    }

    /// Score a list of words
    ///
    /// Words are lowercased and deduplicated; words missing from the
    /// vocabulary are dropped. Returns `NotFound` when nothing is left.
    pub fn gender_difference<I, S>(&self, words: I) -> GenderScores
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known: FxHashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .filter(|w| self.vectors.contains(w))
            .collect();

        if known.is_empty() {
            return GenderScores::NotFound;
        }

        let masculine = self.reference_vectors(&self.reference.masculine);
        let feminine = self.reference_vectors(&self.reference.feminine);

        let scores: FxHashMap<String, f64> = known
            .into_par_iter()
            .filter_map(|word| {
                let vector = self.vectors.get(&word)?;
                let score = mean_cosine(&masculine, vector) - mean_cosine(&feminine, vector);
                Some((word, score))
            })
            .collect();
        GenderScores::Found(scores)
    }

    fn reference_vectors(&self, words: &[String]) -> Vec<&[f32]> {
        words.iter().filter_map(|w| self.vectors.get(w)).collect()
    }
}

/// Mean cosine similarity of `target` to each reference vector
///
/// `references` is never empty; `GloveDistances::new` rejects empty lists.
fn mean_cosine(references: &[&[f32]], target: &[f32]) -> f64 {
    let total: f64 = references.iter().map(|r| cosine_similarity(r, target)).sum();
    total / references.len() as f64
}

/// Cosine similarity; zero vectors have similarity 0 with everything
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom > 0.0 {
        dot / denom
    } else {
        0.0
    }
}
