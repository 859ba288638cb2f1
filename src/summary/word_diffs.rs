//! Words that set one corpus apart from another, with their gender scores

use serde::{Deserialize, Serialize};

use super::mean_diff::PosBucket;
use crate::corpus::{CorpusComparison, CrossCorpusComparison};
use crate::embedding::GloveDistances;

/// Default number of words reported per bucket
pub const DEFAULT_TOP_N: usize = 20;

/// A cross-corpus comparison joined with the word's gender score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredWordDifference {
    pub word: String,
    #[serde(flatten)]
    pub comparison: CrossCorpusComparison,
    /// `None` when the word is not in the vector vocabulary
    pub gender_diff: Option<f64>,
}

/// Top words of one bucket, most over-represented first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketWordDifferences {
    /// Comparison label, e.g. `"CS - Geo"`
    pub label: String,
    pub pos: PosBucket,
    pub words: Vec<ScoredWordDifference>,
}

/// Score every word of a comparison
///
/// Sorted by frequency differential, descending; ties by word.
pub fn score_word_differences(
    comparison: &CorpusComparison,
    scorer: &GloveDistances,
) -> Vec<ScoredWordDifference> {
    let scores = scorer.gender_difference(comparison.words.keys());

    let mut diffs: Vec<ScoredWordDifference> = comparison
        .words
        .iter()
        .map(|(word, comparison)| ScoredWordDifference {
            word: word.clone(),
            comparison: *comparison,
            gender_diff: scores.get(word),
        })
        .collect();

    diffs.sort_by(|a, b| {
        b.comparison
            .frequency_diff
            .total_cmp(&a.comparison.frequency_diff)
            .then_with(|| a.word.cmp(&b.word))
    });
    diffs
}

/// The `n` words with the largest frequency differential whose dominant POS
/// falls in `bucket`
///
/// `diffs` must already be sorted as by [`score_word_differences`].
pub fn top_words(diffs: &[ScoredWordDifference], bucket: PosBucket, n: usize) -> Vec<ScoredWordDifference> {
    diffs
        .iter()
        .filter(|d| bucket.contains(d.comparison.pos))
        .take(n)
        .cloned()
        .collect()
}

/// Top `n` words for every bucket of a comparison
pub fn top_words_by_bucket(
    comparison: &CorpusComparison,
    scorer: &GloveDistances,
    n: usize,
) -> Vec<BucketWordDifferences> {
    let diffs = score_word_differences(comparison, scorer);
    PosBucket::ALL
        .into_iter()
        .map(|bucket| BucketWordDifferences {
            label: comparison.label.clone(),
            pos: bucket,
            words: top_words(&diffs, bucket, n),
        })
        .collect()
}
