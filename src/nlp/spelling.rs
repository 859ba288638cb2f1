//! Spell checking
//!
//! The cleaner depends on a [`SpellChecker`]; this module provides a
//! dictionary-backed implementation plus a pass-through one for corpora
//! that should not be corrected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;

use super::affix::AffixRules;
use crate::error::{GenderBiasError, Result};

/// A spell-checking service: validity test plus ranked suggestions
pub trait SpellChecker {
    /// Whether `word` is a valid dictionary word
    fn is_valid(&self, word: &str) -> bool;

    /// Ranked correction candidates for `word`, best first
    fn suggest(&self, word: &str) -> Vec<String>;
}

impl<S: SpellChecker + ?Sized> SpellChecker for Box<S> {
    fn is_valid(&self, word: &str) -> bool {
        (**self).is_valid(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        (**self).suggest(word)
    }
}

/// Accepts every word; never suggests anything
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllSpellChecker;

impl SpellChecker for AcceptAllSpellChecker {
    #[inline]
    fn is_valid(&self, _word: &str) -> bool {
        true
    }

    fn suggest(&self, _word: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Spell checker backed by a plain word list
///
/// Suggestions are dictionary words within `max_distance` edits
/// (insertion, deletion, substitution, adjacent transposition), ordered by
/// distance and then by position in the word list, so frequency-sorted
/// lists give frequency-ranked suggestions.
#[derive(Debug, Clone)]
pub struct DictionarySpellChecker {
    /// Lowercase word -> position in the source list
    words: FxHashMap<String, usize>,
    max_distance: usize,
}

impl DictionarySpellChecker {
    /// Build a checker from an in-memory list
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut checker = Self::empty();
        for (rank, word) in words.into_iter().enumerate() {
            checker.insert(word.as_ref(), rank);
        }
        checker
    }

    /// Read a word list, one entry per line
    ///
    /// Hunspell `.dic` files are accepted: a leading numeric count line is
    /// skipped, only the first field of each entry is kept and `/FLAGS`
    /// suffixes are dropped. Without affix rules inflected forms are not
    /// generated; use [`DictionarySpellChecker::from_hunspell`] for those.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        Self::read_dic(reader, None)
    }

    /// Read a hunspell `.dic` file, expanding every stem with `affixes`
    pub fn from_hunspell(dic: impl BufRead, affixes: &AffixRules) -> Result<Self> {
        Self::read_dic(dic, Some(affixes))
    }

    /// Load a word list from disk
    ///
    /// A `.dic` file with a sibling `.aff` file is read as a hunspell
    /// dictionary with its affixes expanded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let affix_path = path.with_extension("aff");
        let affixes = if path.extension().is_some_and(|ext| ext == "dic") && affix_path.is_file() {
            Some(AffixRules::from_path(&affix_path)?)
        } else {
            None
        };

        let file = File::open(path)
            .map_err(|e| GenderBiasError::io(format!("opening {}", path.display()), e))?;
        let checker = Self::read_dic(BufReader::new(file), affixes.as_ref())?;
        tracing::info!(words = checker.len(), path = %path.display(), "loaded spelling dictionary");
        Ok(checker)
    }

    fn empty() -> Self {
        Self {
            words: FxHashMap::default(),
            max_distance: 2,
        }
    }

    /// Keep the first (best) rank of a word
    fn insert(&mut self, word: &str, rank: usize) {
        let word = word.trim().to_lowercase();
        if !word.is_empty() {
            self.words.entry(word).or_insert(rank);
        }
    }

    fn read_dic(reader: impl BufRead, affixes: Option<&AffixRules>) -> Result<Self> {
        let mut checker = Self::empty();
        let mut unexpanded = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| GenderBiasError::io("reading dictionary", e))?;
            let line = line.trim();
            if idx == 0 && !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            // `word/FLAGS po:noun ...`: morphological fields follow whitespace
            let Some(entry) = line.split_whitespace().next() else {
                continue;
            };
            let (stem, flags) = entry.split_once('/').unwrap_or((entry, ""));
            match affixes {
                Some(affixes) => {
                    for form in affixes.expand(stem, flags) {
                        checker.insert(&form, idx);
                    }
                }
                None => {
                    if !flags.is_empty() {
                        unexpanded += 1;
                    }
                    checker.insert(stem, idx);
                }
            }
        }
        if unexpanded > 0 {
            tracing::warn!(
                entries = unexpanded,
                "dictionary entries carry affix flags but no affix file was given; inflected forms will be treated as misspellings"
            );
        }
        Ok(checker)
    }

    /// Number of distinct dictionary words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SpellChecker for DictionarySpellChecker {
    fn is_valid(&self, word: &str) -> bool {
        if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        self.words.contains_key(word) || self.words.contains_key(&word.to_lowercase())
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let target: Vec<char> = lower.chars().collect();

        let mut candidates: Vec<(usize, usize, &str)> = self
            .words
            .iter()
            .filter(|(w, _)| w.chars().count().abs_diff(target.len()) <= self.max_distance)
            .filter_map(|(w, &rank)| {
                let distance = edit_distance(&target, w, self.max_distance)?;
                Some((distance, rank, w.as_str()))
            })
            .collect();
        candidates.sort_unstable();

        let title_case = word.chars().next().is_some_and(char::is_uppercase);
        candidates
            .into_iter()
            .map(|(_, _, w)| if title_case { capitalize(w) } else { w.to_string() })
            .collect()
    }
}

/// Optimal string alignment distance, `None` if it exceeds `max`
fn edit_distance(a: &[char], b: &str, max: usize) -> Option<usize> {
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    let mut rows = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in rows.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        rows[0][j] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut d = (rows[i - 1][j] + 1)
                .min(rows[i][j - 1] + 1)
                .min(rows[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d = d.min(rows[i - 2][j - 2] + 1);
            }
            rows[i][j] = d;
        }
    }

    let distance = rows[n][m];
    (distance <= max).then_some(distance)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> DictionarySpellChecker {
        DictionarySpellChecker::from_words(["the", "this", "change", "but", "not", "his", "computer"])
    }

    #[test]
    fn test_valid_words() {
        let checker = dictionary();
        assert!(checker.is_valid("change"));
        assert!(checker.is_valid("Change"));
        assert!(checker.is_valid("2024"));
        assert!(!checker.is_valid("thsi"));
    }

    #[test]
    fn test_transposition_is_first_suggestion() {
        let checker = dictionary();
        assert_eq!(checker.suggest("thsi").first().map(String::as_str), Some("this"));
    }

    #[test]
    fn test_suggestions_ranked_by_distance() {
        let checker = dictionary();
        let suggestions = checker.suggest("computr");
        assert_eq!(suggestions, vec!["computer".to_string()]);
    }

    #[test]
    fn test_no_suggestion_for_distant_word() {
        let checker = dictionary();
        assert!(checker.suggest("zzzzzzzz").is_empty());
    }

    #[test]
    fn test_title_case_preserved() {
        let checker = dictionary();
        assert_eq!(checker.suggest("Chnage").first().map(String::as_str), Some("Change"));
    }

    #[test]
    fn test_reads_hunspell_dic_format() {
        let dic = "3\nthis/S\nchange/MGDS\ncomputer/SM\n";
        let checker = DictionarySpellChecker::from_reader(dic.as_bytes()).unwrap();
        assert_eq!(checker.len(), 3);
        assert!(checker.is_valid("computer"));
        assert!(checker.is_valid("change"));
        assert!(!checker.is_valid("mgds"));
    }

    const AFF: &str = "SFX S Y 2\nSFX S 0 s [^y]\nSFX S y ies [^aeiou]y\n\nSFX G Y 2\nSFX G 0 ing [^e]\nSFX G e ing e\n";

    #[test]
    fn test_hunspell_affixes_make_inflections_valid() {
        let affixes = AffixRules::from_reader(AFF.as_bytes()).unwrap();
        let dic = "3\nstudent/S\nlearn/SG\nstudy/SG\n";
        let checker = DictionarySpellChecker::from_hunspell(dic.as_bytes(), &affixes).unwrap();
        for word in ["student", "students", "learns", "learning", "studies", "studying"] {
            assert!(checker.is_valid(word), "{word}");
        }
        assert!(!checker.is_valid("studys"));
        assert_eq!(checker.suggest("studnets").first().map(String::as_str), Some("students"));
    }

    #[test]
    fn test_morphological_fields_are_ignored() {
        let dic = "2\nlearn/SG po:verb\ncomputer po:noun\n";
        let checker = DictionarySpellChecker::from_reader(dic.as_bytes()).unwrap();
        assert_eq!(checker.len(), 2);
        assert!(checker.is_valid("computer"));
        assert!(checker.is_valid("learn"));
        assert!(!checker.is_valid("computer po:noun"));
    }

    #[test]
    fn test_from_path_reads_sibling_affix_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en_GB.aff"), AFF).unwrap();
        std::fs::write(dir.path().join("en_GB.dic"), "1\ncomputer/S\n").unwrap();
        let checker = DictionarySpellChecker::from_path(dir.path().join("en_GB.dic")).unwrap();
        assert!(checker.is_valid("computers"));

        // A plain word list next to no affix file is read as is
        std::fs::write(dir.path().join("words.txt"), "computer\n").unwrap();
        let checker = DictionarySpellChecker::from_path(dir.path().join("words.txt")).unwrap();
        assert!(!checker.is_valid("computers"));
    }

    #[test]
    fn test_accept_all() {
        assert!(AcceptAllSpellChecker.is_valid("qwrtzp"));
        assert!(AcceptAllSpellChecker.suggest("qwrtzp").is_empty());
    }

    #[test]
    fn test_edit_distance_bounds() {
        let a: Vec<char> = "kitten".chars().collect();
        assert_eq!(edit_distance(&a, "sitting", 3), Some(3));
        assert_eq!(edit_distance(&a, "sitting", 2), None);
        assert_eq!(edit_distance(&a, "kitten", 0), Some(0));
    }
}
