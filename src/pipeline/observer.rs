//! Pipeline observer, hooks for logging and timing.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic.

use std::time::{Duration, Instant};

use crate::corpus::CorpusTable;

pub const STAGE_LOAD_VECTORS: &str = "load_vectors";
pub const STAGE_BUILD_CORPUS: &str = "build_corpus";
pub const STAGE_FREQUENCY: &str = "word_frequency";
pub const STAGE_COMPARE: &str = "compare";
pub const STAGE_SUMMARIZE: &str = "summarize";
pub const STAGE_DOCUMENTS: &str = "documents";

// ============================================================================
// StageClock / StageReport
// ============================================================================

/// Wall-clock timer for one stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    start: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// What a stage reports when it finishes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    rows: Option<usize>,
    words: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    /// Number of table rows (or documents) the stage produced
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Number of distinct words the stage handled
    pub fn with_words(mut self, words: usize) -> Self {
        self.words = Some(words);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn rows(&self) -> Option<usize> {
        self.rows
    }

    pub fn words(&self) -> Option<usize> {
        self.words
    }
}

// ============================================================================
// Observer trait and implementations
// ============================================================================

/// Receives stage boundary notifications; every hook defaults to a no-op
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Called with every corpus table once it is built
    fn on_corpus(&mut self, _table: &CorpusTable) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Emits stage boundaries as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage_start(&mut self, stage: &'static str) {
        tracing::debug!(stage, "stage started");
    }

    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        tracing::info!(
            stage,
            elapsed_ms = report.elapsed_ms(),
            rows = report.rows(),
            words = report.words(),
            "stage finished"
        );
    }

    fn on_corpus(&mut self, table: &CorpusTable) {
        tracing::debug!(corpus = table.label(), rows = table.len(), "corpus ready");
    }
}

/// Collects every stage report in order
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    pub fn total(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}
