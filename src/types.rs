//! Core data types shared across the analysis stages
//!
//! Tokens, part-of-speech tags, corpus rows and the "no data" aware
//! mean used by every aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Universal Dependencies part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    #[serde(rename = "ADJ")]
    Adjective,
    #[serde(rename = "ADP")]
    Adposition,
    #[serde(rename = "ADV")]
    Adverb,
    #[serde(rename = "AUX")]
    Auxiliary,
    #[serde(rename = "CCONJ")]
    CoordConj,
    #[serde(rename = "DET")]
    Determiner,
    #[serde(rename = "INTJ")]
    Interjection,
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "NUM")]
    Numeral,
    #[serde(rename = "PART")]
    Particle,
    #[serde(rename = "PRON")]
    Pronoun,
    #[serde(rename = "PROPN")]
    ProperNoun,
    #[serde(rename = "PUNCT")]
    Punctuation,
    #[serde(rename = "SCONJ")]
    SubordConj,
    #[serde(rename = "SYM")]
    Symbol,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "SPACE")]
    Space,
    #[serde(rename = "X")]
    Other,
}

impl PosTag {
    /// The UD tag string, e.g. `"NOUN"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adjective => "ADJ",
            Self::Adposition => "ADP",
            Self::Adverb => "ADV",
            Self::Auxiliary => "AUX",
            Self::CoordConj => "CCONJ",
            Self::Determiner => "DET",
            Self::Interjection => "INTJ",
            Self::Noun => "NOUN",
            Self::Numeral => "NUM",
            Self::Particle => "PART",
            Self::Pronoun => "PRON",
            Self::ProperNoun => "PROPN",
            Self::Punctuation => "PUNCT",
            Self::SubordConj => "SCONJ",
            Self::Symbol => "SYM",
            Self::Verb => "VERB",
            Self::Space => "SPACE",
            Self::Other => "X",
        }
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosTag {
    type Err = std::convert::Infallible;

    /// Unknown tags map to [`PosTag::Other`], mirroring UD's `X`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.to_ascii_uppercase().as_str() {
            "ADJ" => Self::Adjective,
            "ADP" => Self::Adposition,
            "ADV" => Self::Adverb,
            "AUX" => Self::Auxiliary,
            "CCONJ" | "CONJ" => Self::CoordConj,
            "DET" => Self::Determiner,
            "INTJ" => Self::Interjection,
            "NOUN" => Self::Noun,
            "NUM" => Self::Numeral,
            "PART" => Self::Particle,
            "PRON" => Self::Pronoun,
            "PROPN" => Self::ProperNoun,
            "PUNCT" => Self::Punctuation,
            "SCONJ" => Self::SubordConj,
            "SYM" => Self::Symbol,
            "VERB" => Self::Verb,
            "SPACE" => Self::Space,
            _ => Self::Other,
        })
    }
}

/// A raw document as handed over by the text-extraction side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// School or document identifier
    pub id: String,
    /// Unprocessed text
    pub text: String,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A tagged token: surface form, lemma and part of speech
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub lemma: String,
    pub pos: PosTag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, pos: PosTag) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
        }
    }

    /// The surface form or the lemma, depending on `source`
    pub fn form(&self, source: WordSource) -> &str {
        match source {
            WordSource::Word => &self.text,
            WordSource::Lemma => &self.lemma,
        }
    }
}

/// Whether corpus rows use the surface form or the lemma of each token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordSource {
    #[default]
    Word,
    Lemma,
}

/// One row of a corpus table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPosRecord {
    /// Lowercased word (or lemma)
    pub word: String,
    pub pos: PosTag,
    /// Label of the corpus this row belongs to, e.g. `"CS"`
    pub corpus: String,
}

impl WordPosRecord {
    pub fn new(word: impl Into<String>, pos: PosTag, corpus: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            pos,
            corpus: corpus.into(),
        }
    }
}

/// An arithmetic mean that distinguishes "no rows" from a real value.
///
/// Serialises as a number, or `null` when there was nothing to average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeanScore {
    Mean(f64),
    NoData,
}

impl MeanScore {
    /// Mean of the given values, `NoData` when the iterator is empty
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            Self::NoData
        } else {
            Self::Mean(sum / count as f64)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Mean(v) => Some(*v),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_tag_round_trips_through_ud_string() {
        for tag in [PosTag::Noun, PosTag::CoordConj, PosTag::ProperNoun, PosTag::Other] {
            assert_eq!(tag.as_str().parse::<PosTag>().unwrap(), tag);
        }
        assert_eq!("nonsense".parse::<PosTag>().unwrap(), PosTag::Other);
    }

    #[test]
    fn test_pos_tag_serializes_as_ud_string() {
        let json = serde_json::to_string(&PosTag::Adjective).unwrap();
        assert_eq!(json, "\"ADJ\"");
    }

    #[test]
    fn test_token_form() {
        let token = TaggedToken::new("Studying", "study", PosTag::Verb);
        assert_eq!(token.form(WordSource::Word), "Studying");
        assert_eq!(token.form(WordSource::Lemma), "study");
    }

    #[test]
    fn test_mean_score() {
        assert_eq!(MeanScore::from_values([1.0, 2.0, 3.0]), MeanScore::Mean(2.0));
        assert!(MeanScore::from_values(std::iter::empty()).is_no_data());
        assert_eq!(MeanScore::NoData.value(), None);
    }

    #[test]
    fn test_mean_score_serializes_no_data_as_null() {
        assert_eq!(serde_json::to_string(&MeanScore::NoData).unwrap(), "null");
        assert_eq!(serde_json::to_string(&MeanScore::Mean(0.5)).unwrap(), "0.5");
    }
}
