//! Validation engine for analysis configurations.
//!
//! The engine runs every registered [`ValidationRule`] against an
//! [`AnalysisConfig`] and collects all diagnostics into a
//! [`ValidationReport`]. It never stops at the first error, so a bad config
//! file shows all of its problems at once.
//!
//! ```rust,ignore
//! use subject_gender_bias::pipeline::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&config);
//! for issue in report.errors() {
//!     eprintln!("{issue}");
//! }
//! ```

use std::fmt;

use serde::Serialize;

use crate::config::{AnalysisConfig, GLOVE_PATH_ENV};
use crate::embedding::VectorDimensions;

// ─── Issue ──────────────────────────────────────────────────────────────────

/// Machine-readable category of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    UnsupportedValue,
    EmptyList,
    Overlap,
    MissingPath,
}

/// A single finding, located by a JSON pointer into the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub code: IssueCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigIssue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub issue: ConfigIssue,
}

impl ValidationDiagnostic {
    pub fn error(issue: ConfigIssue) -> Self {
        Self {
            severity: Severity::Error,
            issue,
        }
    }

    pub fn warning(issue: ConfigIssue) -> Self {
        Self {
            severity: Severity::Warning,
            issue,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.by_severity(Severity::Warning)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &ConfigIssue> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.issue)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single check over an [`AnalysisConfig`].
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier, e.g. `"vector_dimensions"`
    fn name(&self) -> &str;

    fn validate(&self, config: &AnalysisConfig) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VectorDimensionsRule));
        engine.add_rule(Box::new(ReferenceListsRule));
        engine.add_rule(Box::new(ReferenceOverlapRule));
        engine.add_rule(Box::new(ReplaceCharRule));
        engine.add_rule(Box::new(VectorDirRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `config` and return the collected report.
    pub fn validate(&self, config: &AnalysisConfig) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(config));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Only the published GloVe 6B sizes exist ─────────────────────────────

struct VectorDimensionsRule;

impl ValidationRule for VectorDimensionsRule {
    fn name(&self) -> &str {
        "vector_dimensions"
    }

    fn validate(&self, config: &AnalysisConfig) -> Vec<ValidationDiagnostic> {
        match VectorDimensions::try_from(config.vectors.dimensions) {
            Ok(_) => vec![],
            Err(message) => vec![ValidationDiagnostic::error(
                ConfigIssue::new(IssueCode::UnsupportedValue, "/vectors/dimensions", message)
                    .with_hint("Use 50, 100, 200 or 300"),
            )],
        }
    }
}

// ─── 2. Both reference lists need at least one word ─────────────────────────

struct ReferenceListsRule;

impl ValidationRule for ReferenceListsRule {
    fn name(&self) -> &str {
        "reference_lists"
    }

    fn validate(&self, config: &AnalysisConfig) -> Vec<ValidationDiagnostic> {
        let lists = [
            ("masculine", &config.reference.masculine),
            ("feminine", &config.reference.feminine),
        ];
        lists
            .into_iter()
            .filter(|(_, words)| words.iter().all(|w| w.trim().is_empty()))
            .map(|(field, _)| {
                ValidationDiagnostic::error(
                    ConfigIssue::new(
                        IssueCode::EmptyList,
                        format!("/reference/{field}"),
                        format!("{field} reference list is empty"),
                    )
                    .with_hint("Remove the field to use the default reference words"),
                )
            })
            .collect()
    }
}

// ─── 3. A word on both sides cancels itself out ─────────────────────────────

struct ReferenceOverlapRule;

impl ValidationRule for ReferenceOverlapRule {
    fn name(&self) -> &str {
        "reference_overlap"
    }

    fn validate(&self, config: &AnalysisConfig) -> Vec<ValidationDiagnostic> {
        let reference = &config.reference;
        reference
            .masculine
            .iter()
            .filter(|w| reference.feminine.contains(*w))
            .map(|w| {
                ValidationDiagnostic::warning(ConfigIssue::new(
                    IssueCode::Overlap,
                    "/reference",
                    format!("\"{w}\" is both a masculine and a feminine reference word"),
                ))
            })
            .collect()
    }
}

// ─── 4. Replacement must not look like a word ───────────────────────────────

struct ReplaceCharRule;

impl ValidationRule for ReplaceCharRule {
    fn name(&self) -> &str {
        "replace_char"
    }

    fn validate(&self, config: &AnalysisConfig) -> Vec<ValidationDiagnostic> {
        if config
            .cleaning
            .replace_char
            .chars()
            .any(|c| c.is_ascii_alphanumeric())
        {
            vec![ValidationDiagnostic::error(
                ConfigIssue::new(
                    IssueCode::UnsupportedValue,
                    "/cleaning/replace_char",
                    "replacement contains letters or digits",
                )
                .with_hint("Use a space or punctuation"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 5. Vectors must be findable somewhere ──────────────────────────────────

struct VectorDirRule;

impl ValidationRule for VectorDirRule {
    fn name(&self) -> &str {
        "vector_dir"
    }

    fn validate(&self, config: &AnalysisConfig) -> Vec<ValidationDiagnostic> {
        if config.vector_dir().is_some() {
            return vec![];
        }
        vec![ValidationDiagnostic::warning(
            ConfigIssue::new(
                IssueCode::MissingPath,
                "/vectors/dir",
                "no vector directory configured",
            )
            .with_hint(format!("Set vectors.dir, pass --glove-dir or export {GLOVE_PATH_ENV}")),
        )]
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Config from JSON, with a vector dir so the path rule stays quiet
    fn config(json: &str) -> AnalysisConfig {
        let mut config = AnalysisConfig::from_json_str(json).unwrap();
        config.vectors.dir.get_or_insert_with(|| "/data/glove".into());
        config
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    #[test]
    fn test_default_config_is_valid() {
        let report = engine().validate(&config("{}"));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_unsupported_dimensions() {
        let report = engine().validate(&config(r#"{ "vectors": { "dimensions": 64 } }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, IssueCode::UnsupportedValue);
        assert_eq!(errs[0].path, "/vectors/dimensions");
    }

    #[test]
    fn test_empty_reference_lists_report_two_errors() {
        let report = engine().validate(&config(
            r#"{ "reference": { "masculine": [], "feminine": [" "] } }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.code == IssueCode::EmptyList));
    }

    #[test]
    fn test_overlapping_reference_words_warn() {
        let report = engine().validate(&config(
            r#"{ "reference": { "masculine": ["man", "person"], "feminine": ["woman", "person"] } }"#,
        ));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert!(warns[0].message.contains("person"));
    }

    #[test]
    fn test_alphanumeric_replace_char() {
        let report = engine().validate(&config(r#"{ "cleaning": { "replace_char": "x" } }"#));
        assert!(report.has_errors());
        assert_eq!(report.errors().next().unwrap().path, "/cleaning/replace_char");
    }

    #[test]
    fn test_rules_fire_independently() {
        let report = engine().validate(&config(
            r#"{
                "vectors": { "dimensions": 1 },
                "reference": { "masculine": [] },
                "cleaning": { "replace_char": "0" }
            }"#,
        ));
        assert_eq!(report.errors().count(), 3);
    }

    #[test]
    fn test_custom_rule() {
        struct AlwaysWarnRule;
        impl ValidationRule for AlwaysWarnRule {
            fn name(&self) -> &str {
                "always_warn"
            }
            fn validate(&self, _config: &AnalysisConfig) -> Vec<ValidationDiagnostic> {
                vec![ValidationDiagnostic::warning(ConfigIssue::new(
                    IssueCode::UnsupportedValue,
                    "",
                    "custom warning",
                ))]
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(AlwaysWarnRule));
        assert_eq!(engine.rule_names(), vec!["always_warn"]);
        let report = engine.validate(&config("{}"));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = engine().validate(&config(r#"{ "vectors": { "dimensions": 64 } }"#));
        let json = serde_json::to_value(&report).unwrap();
        let diags = json["diagnostics"].as_array().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0]["severity"], "error");
        assert_eq!(diags[0]["code"], "unsupported_value");
    }

    #[test]
    fn test_issue_display_includes_hint() {
        let issue = ConfigIssue::new(IssueCode::MissingPath, "/vectors/dir", "missing")
            .with_hint("set it");
        assert_eq!(issue.to_string(), "/vectors/dir: missing (set it)");
    }
}
