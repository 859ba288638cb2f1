//! Corpus assembly and frequency aggregation
//!
//! Turns raw documents into word/POS tables and compares word usage across
//! two corpora.

pub mod frequency;
pub mod table;

pub use frequency::{
    cross_corpus_comparison, dominant_pos, word_frequency, CorpusComparison, CrossCorpusComparison,
};
pub use table::{build_corpus_table, tag_document, CorpusTable};
