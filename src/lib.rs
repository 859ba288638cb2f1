//! # subject-gender-bias
//!
//! Measures gendered language in school subject descriptions.
//!
//! Documents are cleaned and spell-corrected, POS-tagged, and flattened into
//! per-subject corpus tables. Every word is scored by how much closer it sits
//! to masculine than to feminine reference words in a pretrained GloVe space,
//! and the scores are aggregated per part of speech, per document, or per
//! word across two subjects.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use subject_gender_bias::prelude::*;
//!
//! let config = AnalysisConfig::default();
//! let scorer = load_scorer(&config.vector_source()?, config.reference.clone(), &mut NoopObserver)?;
//! let cleaner = config.text_cleaner(AcceptAllSpellChecker);
//! let tagger = config.token_tagger(LexiconTagger::new());
//!
//! let pipeline = GenderBiasPipeline::new(&cleaner, &tagger, &scorer);
//! let rows = pipeline.mean_difference(&documents, "CS", "website", None, &mut NoopObserver)?;
//! ```

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod nlp;
pub mod pipeline;
pub mod summary;
pub mod types;

pub use config::AnalysisConfig;
pub use error::{GenderBiasError, Result};
pub use types::{MeanScore, PosTag, RawDocument, TaggedToken, WordPosRecord, WordSource};

/// Everything needed to run an analysis
pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::corpus::{
        build_corpus_table, cross_corpus_comparison, word_frequency, CorpusComparison,
        CorpusTable, CrossCorpusComparison,
    };
    pub use crate::embedding::{
        GenderScores, GloveDistances, ReferenceWords, VectorDimensions, VectorSource, WordVectors,
    };
    pub use crate::error::{GenderBiasError, Result};
    pub use crate::nlp::cleaner::{EmptyCorrections, TextCleaner};
    pub use crate::nlp::spelling::{AcceptAllSpellChecker, DictionarySpellChecker, SpellChecker};
    pub use crate::nlp::tagger::{LexiconTagger, PosTagger, TokenTagger};
    pub use crate::pipeline::{load_scorer, GenderBiasPipeline, NoopObserver, PipelineObserver};
    pub use crate::summary::{
        mean_gender_difference_by_pos, MeanGenderDifference, PosBucket, WordRemoval,
    };
    pub use crate::types::{MeanScore, PosTag, RawDocument, TaggedToken, WordPosRecord, WordSource};
}
