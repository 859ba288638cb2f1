//! Word frequencies and cross-corpus comparison
//!
//! Frequencies are relative to the number of rows in a table. A word's
//! dominant POS is the mode of the tags it carries across the table; ties go
//! to the lexicographically smallest UD tag string so the result does not
//! depend on row order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::table::CorpusTable;
use crate::types::{PosTag, WordPosRecord};

/// Relative frequency of each POS tag over all rows
pub fn pos_frequencies(records: &[WordPosRecord]) -> FxHashMap<PosTag, f64> {
    let mut counts: FxHashMap<PosTag, usize> = FxHashMap::default();
    for record in records {
        *counts.entry(record.pos).or_insert(0) += 1;
    }
    let total = records.len() as f64;
    counts
        .into_iter()
        .map(|(pos, count)| (pos, count as f64 / total))
        .collect()
}

/// Occurrence count of each word
pub fn word_counts(records: &[WordPosRecord]) -> FxHashMap<String, usize> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for record in records {
        *counts.entry(record.word.clone()).or_insert(0) += 1;
    }
    counts
}

/// Most common POS tag of each word
pub fn dominant_pos(records: &[WordPosRecord]) -> FxHashMap<String, PosTag> {
    let mut tallies: FxHashMap<&str, FxHashMap<PosTag, usize>> = FxHashMap::default();
    for record in records {
        *tallies
            .entry(record.word.as_str())
            .or_default()
            .entry(record.pos)
            .or_insert(0) += 1;
    }

    tallies
        .into_iter()
        .filter_map(|(word, by_pos)| {
            let (pos, _) = by_pos.into_iter().max_by(|(pos_a, count_a), (pos_b, count_b)| {
                count_a
                    .cmp(count_b)
                    .then_with(|| pos_b.as_str().cmp(pos_a.as_str()))
            })?;
            Some((word.to_string(), pos))
        })
        .collect()
}

/// Relative frequency of each word in one corpus
///
/// With `normalize_by_pos`, each frequency is divided by the corpus-wide
/// frequency of the word's dominant POS.
pub fn word_frequency(table: &CorpusTable, normalize_by_pos: bool) -> FxHashMap<String, f64> {
    relative_frequency(table.records(), normalize_by_pos)
}

fn relative_frequency(records: &[WordPosRecord], normalize_by_pos: bool) -> FxHashMap<String, f64> {
    let total = records.len() as f64;
    let mut frequencies: FxHashMap<String, f64> = word_counts(records)
        .into_iter()
        .map(|(word, count)| (word, count as f64 / total))
        .collect();

    if normalize_by_pos {
        let pos_freq = pos_frequencies(records);
        let modes = dominant_pos(records);
        for (word, freq) in frequencies.iter_mut() {
            // Every counted word has a mode and every mode has a frequency
            if let Some(pos_share) = modes.get(word).and_then(|pos| pos_freq.get(pos)) {
                *freq /= pos_share;
            }
        }
    }
    frequencies
}

/// Comparison of one word between two corpora
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossCorpusComparison {
    /// Frequency in the first corpus minus frequency in the second
    pub frequency_diff: f64,
    /// Dominant POS over both corpora combined
    pub pos: PosTag,
    /// Frequency in the combined corpus
    pub combined_frequency: f64,
    /// Occurrences in the combined corpus
    pub combined_count: usize,
}

/// Per-word comparison of two corpora, labelled `"A - B"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusComparison {
    pub label: String,
    pub words: FxHashMap<String, CrossCorpusComparison>,
}

impl CorpusComparison {
    pub fn get(&self, word: &str) -> Option<&CrossCorpusComparison> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Entries sorted by word, for stable output
    pub fn sorted(&self) -> Vec<(&str, &CrossCorpusComparison)> {
        let mut entries: Vec<_> = self.words.iter().map(|(w, c)| (w.as_str(), c)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Compare word usage of corpus `a` against corpus `b`
///
/// Covers the union of both vocabularies. A word missing from one corpus has
/// frequency 0 there. Frequencies used for the differential are raw, never
/// POS-normalized.
pub fn cross_corpus_comparison(a: &CorpusTable, b: &CorpusTable) -> CorpusComparison {
    let freq_a = word_frequency(a, false);
    let freq_b = word_frequency(b, false);

    let combined: Vec<WordPosRecord> = a.records().iter().chain(b.records()).cloned().collect();
    let combined_counts = word_counts(&combined);
    let combined_modes = dominant_pos(&combined);
    let combined_total = combined.len() as f64;

    let words = combined_counts
        .into_iter()
        .filter_map(|(word, count)| {
            let pos = *combined_modes.get(&word)?;
            let frequency_diff = freq_a.get(&word).copied().unwrap_or(0.0)
                - freq_b.get(&word).copied().unwrap_or(0.0);
            let comparison = CrossCorpusComparison {
                frequency_diff,
                pos,
                combined_frequency: count as f64 / combined_total,
                combined_count: count,
            };
            Some((word, comparison))
        })
        .collect();

    tracing::debug!(corpus_a = a.label(), corpus_b = b.label(), "compared corpora");

    CorpusComparison {
        label: format!("{} - {}", a.label(), b.label()),
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn and_the() -> CorpusTable {
        CorpusTable::from_pairs(
            "CS",
            [
                ("and", PosTag::Noun),
                ("and", PosTag::Adjective),
                ("and", PosTag::Noun),
                ("the", PosTag::Noun),
            ],
        )
    }

    #[test]
    fn test_raw_word_frequency() {
        let freq = word_frequency(&and_the(), false);
        assert!((freq["and"] - 0.75).abs() < EPS);
        assert!((freq["the"] - 0.25).abs() < EPS);
    }

    #[test]
    fn test_normalized_word_frequency() {
        let freq = word_frequency(&and_the(), true);
        assert!((freq["and"] - 1.0).abs() < EPS);
        assert!((freq["the"] - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_empty_table_has_no_frequencies() {
        assert!(word_frequency(&CorpusTable::new("CS"), true).is_empty());
    }

    #[test]
    fn test_dominant_pos_tie_is_lexicographic() {
        let table = CorpusTable::from_pairs(
            "CS",
            [
                ("run", PosTag::Verb),
                ("run", PosTag::Noun),
                ("fast", PosTag::Adverb),
                ("fast", PosTag::Adjective),
            ],
        );
        let modes = dominant_pos(table.records());
        assert_eq!(modes["run"], PosTag::Noun);
        assert_eq!(modes["fast"], PosTag::Adjective);
    }

    #[test]
    fn test_dominant_pos_prefers_count() {
        let table = CorpusTable::from_pairs(
            "CS",
            [("run", PosTag::Verb), ("run", PosTag::Noun), ("run", PosTag::Verb)],
        );
        assert_eq!(dominant_pos(table.records())["run"], PosTag::Verb);
    }

    #[test]
    fn test_cross_corpus_comparison() {
        let a = CorpusTable::from_pairs(
            "CS",
            [
                ("world", PosTag::Noun),
                ("world", PosTag::Noun),
                ("computer", PosTag::Noun),
            ],
        );
        let b = CorpusTable::from_pairs(
            "Geo",
            [
                ("computer", PosTag::Noun),
                ("computer", PosTag::Noun),
                ("world", PosTag::Noun),
            ],
        );
        let comparison = cross_corpus_comparison(&a, &b);
        assert_eq!(comparison.label, "CS - Geo");
        assert_eq!(comparison.len(), 2);

        let computer = comparison.get("computer").unwrap();
        assert!((computer.frequency_diff + 1.0 / 3.0).abs() < EPS);
        assert_eq!(computer.combined_count, 3);
        assert!((computer.combined_frequency - 0.5).abs() < EPS);
        assert_eq!(computer.pos, PosTag::Noun);

        let world = comparison.get("world").unwrap();
        assert!((world.frequency_diff - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_missing_words_count_as_zero() {
        let a = CorpusTable::from_pairs("CS", [("code", PosTag::Noun), ("code", PosTag::Verb)]);
        let b = CorpusTable::from_pairs("Geo", [("river", PosTag::Noun)]);
        let comparison = cross_corpus_comparison(&a, &b);

        let code = comparison.get("code").unwrap();
        assert!((code.frequency_diff - 1.0).abs() < EPS);
        assert_eq!(code.pos, PosTag::Noun);
        assert!((comparison.get("river").unwrap().frequency_diff + 1.0).abs() < EPS);

        let words: Vec<&str> = comparison.sorted().into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["code", "river"]);
    }
}
