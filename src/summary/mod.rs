//! Gender-difference summaries
//!
//! Combines per-word gender scores with corpus tables: means per POS bucket,
//! per-document means, and the words that most distinguish two corpora.

pub mod document;
pub mod mean_diff;
pub mod word_diffs;

pub use document::{document_gender_scores, document_mean_gender_difference, DocumentGenderScore};
pub use mean_diff::{mean_gender_difference_by_pos, MeanGenderDifference, PosBucket, WordRemoval};
pub use word_diffs::{
    score_word_differences, top_words, top_words_by_bucket, BucketWordDifferences,
    ScoredWordDifference, DEFAULT_TOP_N,
};
