use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenderBiasError>;

#[derive(Debug, Error)]
pub enum GenderBiasError {
    #[error("word vector file not found: {}", path.display())]
    MissingVectorFile { path: PathBuf },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed vector line {line}: {message}")]
    MalformedVectorLine { line: usize, message: String },
    #[error("vector on line {line} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("malformed affix rule on line {line}: {message}")]
    MalformedAffixRule { line: usize, message: String },
    #[error("reference word '{word}' is not in the vector vocabulary")]
    MissingReferenceWord { word: String },
    #[error("tagging failed: {message}")]
    Tagging { message: String },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl GenderBiasError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedVectorLine {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn affix(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedAffixRule {
            line,
            message: message.into(),
        }
    }

    pub fn tagging(err: impl std::fmt::Display) -> Self {
        Self::Tagging {
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
