//! Stage orchestration, observers and configuration validation

pub mod observer;
pub mod runner;
pub mod validation;

pub use observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver, TracingObserver};
pub use runner::{load_scorer, GenderBiasPipeline};
pub use validation::{ValidationEngine, ValidationReport};
