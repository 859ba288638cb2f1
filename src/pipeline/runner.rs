//! Pipeline runner, orchestrates the analysis stages.
//!
//! [`GenderBiasPipeline`] borrows the long-lived services (cleaner, tagger
//! and scorer), which are built once and shared by every run. Each public
//! method runs one analysis end to end, entering a tracing span per stage
//! and notifying a [`PipelineObserver`] at every stage boundary.

use rustc_hash::FxHashMap;

use crate::corpus::{build_corpus_table, cross_corpus_comparison, word_frequency, CorpusTable};
use crate::embedding::{GloveDistances, ReferenceWords, VectorSource};
use crate::error::Result;
use crate::nlp::cleaner::TextCleaner;
use crate::nlp::spelling::SpellChecker;
use crate::nlp::tagger::{PosTagger, TokenTagger};
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReport, STAGE_BUILD_CORPUS, STAGE_COMPARE,
    STAGE_DOCUMENTS, STAGE_FREQUENCY, STAGE_LOAD_VECTORS, STAGE_SUMMARIZE,
};
use crate::summary::{
    document_gender_scores, mean_gender_difference_by_pos, top_words_by_bucket,
    BucketWordDifferences, DocumentGenderScore, MeanGenderDifference, WordRemoval,
};
use crate::types::{RawDocument, WordSource};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Vector loading
// ============================================================================

/// Prepare and load the vector space, then build the scorer
///
/// Fails when the raw vector file is missing or a reference word is not in
/// the vocabulary.
pub fn load_scorer(
    source: &VectorSource,
    reference: ReferenceWords,
    observer: &mut impl PipelineObserver,
) -> Result<GloveDistances> {
    trace_stage!(STAGE_LOAD_VECTORS);
    observer.on_stage_start(STAGE_LOAD_VECTORS);
    let clock = StageClock::start();
    let vectors = source.load()?;
    let words = vectors.len();
    let scorer = GloveDistances::new(vectors, reference)?;
    observer.on_stage_end(
        STAGE_LOAD_VECTORS,
        &StageReport::new(clock.elapsed()).with_words(words),
    );
    Ok(scorer)
}

// ============================================================================
// GenderBiasPipeline
// ============================================================================

/// The analysis stages wired to one set of services
#[derive(Debug)]
pub struct GenderBiasPipeline<'a, S, T> {
    cleaner: &'a TextCleaner<S>,
    tagger: &'a TokenTagger<T>,
    scorer: &'a GloveDistances,
    word_source: WordSource,
    normalize_by_pos: bool,
}

impl<'a, S, T> GenderBiasPipeline<'a, S, T>
where
    S: SpellChecker,
    T: PosTagger,
{
    pub fn new(
        cleaner: &'a TextCleaner<S>,
        tagger: &'a TokenTagger<T>,
        scorer: &'a GloveDistances,
    ) -> Self {
        Self {
            cleaner,
            tagger,
            scorer,
            word_source: WordSource::default(),
            normalize_by_pos: false,
        }
    }

    /// Use surface forms or lemmas as corpus words
    pub fn with_word_source(mut self, source: WordSource) -> Self {
        self.word_source = source;
        self
    }

    /// Normalize word frequencies by POS frequency
    pub fn with_pos_normalization(mut self, normalize: bool) -> Self {
        self.normalize_by_pos = normalize;
        self
    }

    pub fn scorer(&self) -> &GloveDistances {
        self.scorer
    }

    /// Clean, tag and flatten the documents of one corpus
    pub fn build_corpus<D: AsRef<str>>(
        &self,
        documents: &[D],
        label: &str,
        observer: &mut impl PipelineObserver,
    ) -> Result<CorpusTable> {
        trace_stage!(STAGE_BUILD_CORPUS);
        observer.on_stage_start(STAGE_BUILD_CORPUS);
        let clock = StageClock::start();
        let table =
            build_corpus_table(documents, self.cleaner, self.tagger, label, self.word_source)?;
        observer.on_stage_end(
            STAGE_BUILD_CORPUS,
            &StageReport::new(clock.elapsed()).with_rows(table.len()),
        );
        observer.on_corpus(&table);
        Ok(table)
    }

    /// Relative word frequencies of a corpus
    pub fn word_frequency(
        &self,
        table: &CorpusTable,
        observer: &mut impl PipelineObserver,
    ) -> FxHashMap<String, f64> {
        trace_stage!(STAGE_FREQUENCY);
        observer.on_stage_start(STAGE_FREQUENCY);
        let clock = StageClock::start();
        let frequencies = word_frequency(table, self.normalize_by_pos);
        observer.on_stage_end(
            STAGE_FREQUENCY,
            &StageReport::new(clock.elapsed()).with_words(frequencies.len()),
        );
        frequencies
    }

    /// Three rows of mean gender difference per POS bucket for one corpus
    pub fn mean_difference<D: AsRef<str>>(
        &self,
        documents: &[D],
        subject: &str,
        data_source: &str,
        removal: Option<&WordRemoval>,
        observer: &mut impl PipelineObserver,
    ) -> Result<Vec<MeanGenderDifference>> {
        let table = self.build_corpus(documents, subject, observer)?;

        trace_stage!(STAGE_SUMMARIZE);
        observer.on_stage_start(STAGE_SUMMARIZE);
        let clock = StageClock::start();
        let rows = mean_gender_difference_by_pos(&table, self.scorer, data_source, subject, removal);
        observer.on_stage_end(
            STAGE_SUMMARIZE,
            &StageReport::new(clock.elapsed()).with_rows(rows.len()),
        );
        Ok(rows)
    }

    /// Words most over-represented in corpus `a` relative to corpus `b`,
    /// `top_n` per POS bucket
    pub fn compare<A: AsRef<str>, B: AsRef<str>>(
        &self,
        documents_a: &[A],
        label_a: &str,
        documents_b: &[B],
        label_b: &str,
        top_n: usize,
        observer: &mut impl PipelineObserver,
    ) -> Result<Vec<BucketWordDifferences>> {
        let table_a = self.build_corpus(documents_a, label_a, observer)?;
        let table_b = self.build_corpus(documents_b, label_b, observer)?;

        trace_stage!(STAGE_COMPARE);
        observer.on_stage_start(STAGE_COMPARE);
        let clock = StageClock::start();
        let comparison = cross_corpus_comparison(&table_a, &table_b);
        let buckets = top_words_by_bucket(&comparison, self.scorer, top_n);
        observer.on_stage_end(
            STAGE_COMPARE,
            &StageReport::new(clock.elapsed()).with_words(comparison.len()),
        );
        Ok(buckets)
    }

    /// Mean gender difference of every document
    pub fn document_scores(
        &self,
        documents: &[RawDocument],
        observer: &mut impl PipelineObserver,
    ) -> Result<Vec<DocumentGenderScore>> {
        trace_stage!(STAGE_DOCUMENTS);
        observer.on_stage_start(STAGE_DOCUMENTS);
        let clock = StageClock::start();
        let scores = document_gender_scores(
            documents,
            self.cleaner,
            self.tagger,
            self.scorer,
            self.word_source,
        )?;
        observer.on_stage_end(
            STAGE_DOCUMENTS,
            &StageReport::new(clock.elapsed()).with_rows(scores.len()),
        );
        Ok(scores)
    }
}

// ============================================================================
// Tests
// ============================================================================
