//! Mean gender difference per part-of-speech bucket
//!
//! Every row of a corpus table is scored with its word's gender score, then
//! rows are grouped into three buckets: nouns, adjectives/adverbs and verbs.
//! The mean runs over token occurrences, so frequent words weigh more.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::corpus::CorpusTable;
use crate::embedding::{GenderScores, GloveDistances};
use crate::error::{GenderBiasError, Result};
use crate::types::{MeanScore, PosTag};

/// The POS groups a summary reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosBucket {
    #[serde(rename = "Noun")]
    Noun,
    #[serde(rename = "Adj/Adv")]
    AdjAdv,
    #[serde(rename = "Verb")]
    Verb,
}

impl PosBucket {
    /// All buckets, in output order
    pub const ALL: [PosBucket; 3] = [PosBucket::Noun, PosBucket::AdjAdv, PosBucket::Verb];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Noun => "Noun",
            Self::AdjAdv => "Adj/Adv",
            Self::Verb => "Verb",
        }
    }

    pub fn contains(&self, pos: PosTag) -> bool {
        match self {
            Self::Noun => pos == PosTag::Noun,
            Self::AdjAdv => matches!(pos, PosTag::Adjective | PosTag::Adverb),
            Self::Verb => pos == PosTag::Verb,
        }
    }

    /// The bucket a tag falls into, if any
    pub fn of(pos: PosTag) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.contains(pos))
    }
}

impl fmt::Display for PosBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named set of words to leave out before scoring
///
/// Used to check whether subject-specific vocabulary drives the measured
/// gender association.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordRemoval {
    pub label: String,
    words: FxHashSet<String>,
}

impl WordRemoval {
    pub fn new<I, S>(label: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Read one word per line; blank lines and `#` comments are skipped
    pub fn from_reader(label: impl Into<String>, reader: impl BufRead) -> Result<Self> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| GenderBiasError::io("reading word list", e))?;
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            words.push(word.to_string());
        }
        Ok(Self::new(label, words))
    }

    /// Load a word list file; the file stem becomes the label
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| GenderBiasError::io(format!("opening {}", path.display()), e))?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let removal = Self::from_reader(label, std::io::BufReader::new(file))?;
        tracing::info!(path = %path.display(), words = removal.len(), "loaded word removal list");
        Ok(removal)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// One output row: the mean gender score of a POS bucket in one corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanGenderDifference {
    pub pos: PosBucket,
    pub mean_gender_diff: MeanScore,
    pub subject: String,
    pub data_source: String,
    pub words_removed: Option<String>,
}

/// Mean gender score per POS bucket for one corpus table
///
/// Always returns exactly one row per [`PosBucket`], in [`PosBucket::ALL`]
/// order. Rows whose word is excluded by `removal` or has no score are
/// dropped before averaging. A bucket with no scored rows is
/// [`MeanScore::NoData`].
pub fn mean_gender_difference_by_pos(
    table: &CorpusTable,
    scorer: &GloveDistances,
    data_source: &str,
    subject: &str,
    removal: Option<&WordRemoval>,
) -> Vec<MeanGenderDifference> {
    let kept: Vec<_> = table
        .records()
        .iter()
        .filter(|r| removal.map_or(true, |words| !words.contains(&r.word)))
        .collect();

    let scores = scorer.gender_difference(kept.iter().map(|r| r.word.as_str()));
    if let GenderScores::NotFound = scores {
        tracing::debug!(subject, data_source, "no scorable words in corpus");
    }

    PosBucket::ALL
        .into_iter()
        .map(|bucket| {
            let values = kept
                .iter()
                .filter(|r| bucket.contains(r.pos))
                .filter_map(|r| scores.get(&r.word));
            MeanGenderDifference {
                pos: bucket,
                mean_gender_diff: MeanScore::from_values(values),
                subject: subject.to_string(),
                data_source: data_source.to_string(),
                words_removed: removal.map(|r| r.label.clone()),
            }
        })
        .collect()
}
