//! Hunspell affix rules
//!
//! Reads the `PFX`/`SFX` classes of a `.aff` file and expands `.dic` stems
//! into their inflected forms. Compounding, continuation classes and
//! morphological fields are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{GenderBiasError, Result};

/// How the flags after `/` in a `.dic` entry are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagMode {
    /// One character per flag (`FLAG UTF-8` or no `FLAG` line)
    #[default]
    Char,
    /// Two characters per flag (`FLAG long`)
    Long,
    /// Comma-separated numbers (`FLAG num`)
    Numeric,
}

impl FlagMode {
    /// Split a flag string into individual flags
    pub fn split(self, flags: &str) -> Vec<String> {
        match self {
            Self::Char => flags.chars().map(String::from).collect(),
            Self::Long => {
                let chars: Vec<char> = flags.chars().collect();
                chars.chunks(2).map(|pair| pair.iter().collect()).collect()
            }
            Self::Numeric => flags
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Debug, Clone)]
struct AffixRule {
    strip: String,
    add: String,
    /// Anchored at the word end for suffixes, the word start for prefixes
    condition: Option<Regex>,
}

impl AffixRule {
    fn apply(&self, kind: AffixKind, word: &str) -> Option<String> {
        if word.len() <= self.strip.len() {
            return None;
        }
        if self.condition.as_ref().is_some_and(|c| !c.is_match(word)) {
            return None;
        }
        match kind {
            AffixKind::Suffix => {
                let stem = word.strip_suffix(self.strip.as_str())?;
                Some(format!("{stem}{}", self.add))
            }
            AffixKind::Prefix => {
                let stem = word.strip_prefix(self.strip.as_str())?;
                Some(format!("{}{stem}", self.add))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct AffixClass {
    kind: AffixKind,
    cross_product: bool,
    rules: Vec<AffixRule>,
}

/// The affix classes of one `.aff` file, keyed by flag
#[derive(Debug, Clone, Default)]
pub struct AffixRules {
    flag_mode: FlagMode,
    classes: FxHashMap<String, AffixClass>,
}

impl AffixRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an affix file
    ///
    /// The first `PFX`/`SFX` line of a flag is its header
    /// (`SFX S Y 4`); the following lines for that flag are rules
    /// (`SFX S y ies [^aeiou]y`).
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut rules = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| GenderBiasError::io("reading affix file", e))?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                ["FLAG", mode, ..] => {
                    rules.flag_mode = match *mode {
                        "long" => FlagMode::Long,
                        "num" => FlagMode::Numeric,
                        _ => FlagMode::Char,
                    };
                }
                [kind @ ("PFX" | "SFX"), rest @ ..] => {
                    let kind = if *kind == "PFX" {
                        AffixKind::Prefix
                    } else {
                        AffixKind::Suffix
                    };
                    rules.read_affix_line(kind, rest, line_no)?;
                }
                _ => {}
            }
        }
        Ok(rules)
    }

    /// Load an affix file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| GenderBiasError::io(format!("opening {}", path.display()), e))?;
        let rules = Self::from_reader(BufReader::new(file))?;
        tracing::info!(classes = rules.len(), path = %path.display(), "loaded affix rules");
        Ok(rules)
    }

    fn read_affix_line(&mut self, kind: AffixKind, fields: &[&str], line: usize) -> Result<()> {
        let Some(&flag) = fields.first() else {
            return Err(GenderBiasError::affix(line, "missing flag"));
        };

        if !self.classes.contains_key(flag) {
            let [_, cross, count, ..] = fields else {
                return Err(GenderBiasError::affix(line, "header needs flag, cross product and count"));
            };
            if count.parse::<usize>().is_err() {
                return Err(GenderBiasError::affix(line, format!("bad rule count '{count}'")));
            }
            let class = AffixClass {
                kind,
                cross_product: *cross == "Y",
                rules: Vec::new(),
            };
            self.classes.insert(flag.to_string(), class);
            return Ok(());
        }

        let rule = parse_rule(kind, fields, line)?;
        match self.classes.get_mut(flag) {
            Some(class) if class.kind == kind => {
                class.rules.push(rule);
                Ok(())
            }
            _ => Err(GenderBiasError::affix(
                line,
                format!("flag '{flag}' is used for both prefixes and suffixes"),
            )),
        }
    }

    /// Number of affix classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn flag_mode(&self) -> FlagMode {
        self.flag_mode
    }

    /// Every form of `stem` generated by `flags`, the stem itself first
    ///
    /// Prefixes of cross-product classes also combine with the forms of
    /// cross-product suffix classes.
    pub fn expand(&self, stem: &str, flags: &str) -> Vec<String> {
        let classes: Vec<&AffixClass> = self
            .flag_mode
            .split(flags)
            .iter()
            .filter_map(|flag| self.classes.get(flag))
            .collect();

        let mut forms = vec![stem.to_string()];
        let mut crossable = Vec::new();
        for class in classes.iter().filter(|c| c.kind == AffixKind::Suffix) {
            for form in class.rules.iter().filter_map(|r| r.apply(AffixKind::Suffix, stem)) {
                if class.cross_product {
                    crossable.push(form.clone());
                }
                forms.push(form);
            }
        }
        for class in classes.iter().filter(|c| c.kind == AffixKind::Prefix) {
            for rule in &class.rules {
                forms.extend(rule.apply(AffixKind::Prefix, stem));
                if class.cross_product {
                    forms.extend(crossable.iter().filter_map(|f| rule.apply(AffixKind::Prefix, f)));
                }
            }
        }

        let mut seen = FxHashSet::default();
        forms.retain(|f| seen.insert(f.clone()));
        forms
    }
}

/// `<flag> <strip> <add>[/<flags>] [<condition>]`
fn parse_rule(kind: AffixKind, fields: &[&str], line: usize) -> Result<AffixRule> {
    let [_, strip, add, rest @ ..] = fields else {
        return Err(GenderBiasError::affix(line, "rule needs strip and add fields"));
    };
    let condition = match rest.first() {
        Some(&".") | None => None,
        Some(condition) => Some(condition_regex(kind, condition, line)?),
    };
    Ok(AffixRule {
        strip: zero_as_empty(strip).to_string(),
        add: zero_as_empty(add.split('/').next().unwrap_or_default()).to_string(),
        condition,
    })
}

fn zero_as_empty(field: &str) -> &str {
    if field == "0" {
        ""
    } else {
        field
    }
}

/// Translate a hunspell condition (`[^aeiou]y`, `.`, `e`) into an anchored
/// regex
fn condition_regex(kind: AffixKind, condition: &str, line: usize) -> Result<Regex> {
    let mut pattern = String::new();
    let mut chars = condition.chars();
    while let Some(c) = chars.next() {
        match c {
            '.' => pattern.push('.'),
            '[' => {
                pattern.push('[');
                let mut first = true;
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some('^') if first => pattern.push('^'),
                        Some(c) => {
                            if c.is_ascii_punctuation() {
                                pattern.push('\\');
                            }
                            pattern.push(c);
                        }
                        None => {
                            return Err(GenderBiasError::affix(
                                line,
                                format!("unterminated group in condition '{condition}'"),
                            ))
                        }
                    }
                    first = false;
                }
                pattern.push(']');
            }
            c => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    let anchored = match kind {
        AffixKind::Suffix => format!("(?:{pattern})$"),
        AffixKind::Prefix => format!("^(?:{pattern})"),
    };
    Regex::new(&anchored)
        .map_err(|e| GenderBiasError::affix(line, format!("condition '{condition}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "\
SET UTF-8
TRY esianrtolcdugmphbyfvkwzx

PFX U Y 1
PFX U 0 un .

SFX S Y 3
SFX S y ies [^aeiou]y
SFX S 0 s [aeiou]y
SFX S 0 s [^y]

SFX G Y 2
SFX G e ing e
SFX G 0 ing [^e]

SFX D Y 2
SFX D 0 d e
SFX D 0 ed [^e]
";

    fn rules() -> AffixRules {
        AffixRules::from_reader(AFF.as_bytes()).unwrap()
    }

    #[test]
    fn test_parses_classes() {
        let rules = rules();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules.flag_mode(), FlagMode::Char);
    }

    #[test]
    fn test_suffix_conditions() {
        let rules = rules();
        assert_eq!(rules.expand("study", "S"), vec!["study", "studies"]);
        assert_eq!(rules.expand("play", "S"), vec!["play", "plays"]);
        assert_eq!(rules.expand("student", "S"), vec!["student", "students"]);
        assert_eq!(
            rules.expand("create", "GD"),
            vec!["create", "creating", "created"]
        );
        assert_eq!(rules.expand("learn", "SGD"), vec!["learn", "learns", "learning", "learned"]);
    }

    #[test]
    fn test_cross_product_prefix() {
        let forms = rules().expand("lock", "US");
        assert_eq!(forms, vec!["lock", "locks", "unlock", "unlocks"]);
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        assert_eq!(rules().expand("cat", "Z"), vec!["cat"]);
        assert_eq!(rules().expand("cat", ""), vec!["cat"]);
    }

    #[test]
    fn test_long_and_numeric_flags() {
        let long = "FLAG long\nSFX Aa Y 1\nSFX Aa 0 s .\n";
        let rules = AffixRules::from_reader(long.as_bytes()).unwrap();
        assert_eq!(rules.flag_mode(), FlagMode::Long);
        assert_eq!(rules.expand("code", "AaBb"), vec!["code", "codes"]);

        let numeric = "FLAG num\nSFX 101 Y 1\nSFX 101 0 s .\n";
        let rules = AffixRules::from_reader(numeric.as_bytes()).unwrap();
        assert_eq!(rules.expand("code", "7,101"), vec!["code", "codes"]);
    }

    #[test]
    fn test_add_field_continuation_flags_are_dropped() {
        let aff = "SFX S Y 1\nSFX S 0 s/X .\n";
        let rules = AffixRules::from_reader(aff.as_bytes()).unwrap();
        assert_eq!(rules.expand("code", "S"), vec!["code", "codes"]);
    }

    #[test]
    fn test_malformed_rules_report_line() {
        let err = AffixRules::from_reader("SFX S Y\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GenderBiasError::MalformedAffixRule { line: 1, .. }));

        let err = AffixRules::from_reader("SFX S Y 1\nSFX S 0 s [ab\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GenderBiasError::MalformedAffixRule { line: 2, .. }));

        let err = AffixRules::from_reader("SFX S Y 1\nPFX S 0 re .\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GenderBiasError::MalformedAffixRule { line: 2, .. }));
    }
}
