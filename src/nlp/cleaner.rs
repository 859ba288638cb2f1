//! Text cleaning
//!
//! Collapses every run of non-alphanumeric characters into a separator and
//! spell-corrects what remains, token by token.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use super::spelling::SpellChecker;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^0-9a-zA-Z]+").expect("static pattern compiles"));

/// What to do with tokens whose correction came back empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCorrections {
    /// Keep the empty token; it shows up as a doubled separator
    #[default]
    Keep,
    /// Remove it before rejoining
    Drop,
}

/// Normalizes raw text and spell-corrects its tokens
#[derive(Debug, Clone)]
pub struct TextCleaner<S> {
    spell_checker: S,
    replace_char: String,
    empty_corrections: EmptyCorrections,
}

impl<S: SpellChecker> TextCleaner<S> {
    /// Create a cleaner replacing non-alphanumeric runs with a single space
    pub fn new(spell_checker: S) -> Self {
        Self {
            spell_checker,
            replace_char: " ".to_string(),
            empty_corrections: EmptyCorrections::default(),
        }
    }

    /// Set the replacement for non-alphanumeric runs
    pub fn with_replace_char(mut self, replace_char: impl Into<String>) -> Self {
        self.replace_char = replace_char.into();
        self
    }

    /// Set the policy for empty corrections
    pub fn with_empty_corrections(mut self, policy: EmptyCorrections) -> Self {
        self.empty_corrections = policy;
        self
    }

    /// Replace every run of characters outside `[0-9a-zA-Z]` with the
    /// replacement string
    pub fn strip_nonalphanumeric(&self, text: &str) -> String {
        NON_ALPHANUMERIC
            .replace_all(text, NoExpand(&self.replace_char))
            .into_owned()
    }

    /// Correct a single token
    ///
    /// Short tokens (three characters or fewer), all-uppercase tokens and
    /// valid words are returned unchanged. Anything else becomes the first
    /// suggestion, or an empty string when there is none.
    pub fn spell_check(&self, word: &str) -> String {
        if word.chars().count() <= 3 || is_upper(word) || self.spell_checker.is_valid(word) {
            return word.to_string();
        }
        self.spell_checker
            .suggest(word)
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Apply all cleaning steps to a text
    pub fn clean(&self, text: &str) -> String {
        let stripped = self.strip_nonalphanumeric(text);
        let corrected = stripped.split_whitespace().map(|word| self.spell_check(word));

        let tokens: Vec<String> = match self.empty_corrections {
            EmptyCorrections::Keep => corrected.collect(),
            EmptyCorrections::Drop => corrected.filter(|w| !w.is_empty()).collect(),
        };
        tokens.join(" ")
    }
}

/// At least one cased character and no lowercase ones
fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}
