//! Corpus tables
//!
//! A corpus table is the flat list of `(word, POS, corpus)` rows obtained by
//! cleaning and tagging every document of one subject.

use crate::error::Result;
use crate::nlp::cleaner::TextCleaner;
use crate::nlp::spelling::SpellChecker;
use crate::nlp::tagger::{PosTagger, TokenTagger};
use crate::types::{PosTag, TaggedToken, WordPosRecord, WordSource};

/// Word/POS rows of one corpus, in document and token order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusTable {
    label: String,
    records: Vec<WordPosRecord>,
}

impl CorpusTable {
    /// Create an empty table
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            records: Vec::new(),
        }
    }

    /// Create a table from `(word, POS)` pairs; words are lowercased
    pub fn from_pairs<I, S>(label: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, PosTag)>,
        S: AsRef<str>,
    {
        let mut table = Self::new(label);
        for (word, pos) in pairs {
            table.push(word.as_ref(), pos);
        }
        table
    }

    /// Append one row
    pub fn push(&mut self, word: &str, pos: PosTag) {
        self.records
            .push(WordPosRecord::new(word.to_lowercase(), pos, self.label.as_str()));
    }

    /// Append the rows for a tagged document
    pub fn extend_tokens(&mut self, tokens: &[TaggedToken], source: WordSource) {
        self.records.reserve(tokens.len());
        for token in tokens {
            self.push(token.form(source), token.pos);
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[WordPosRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Clean and tag one document
pub fn tag_document<S, T>(
    text: &str,
    cleaner: &TextCleaner<S>,
    tagger: &TokenTagger<T>,
) -> Result<Vec<TaggedToken>>
where
    S: SpellChecker,
    T: PosTagger,
{
    let cleaned = cleaner.clean(text);
    tagger.tag(&cleaned)
}

/// Clean and tag every document and flatten the tags into one table
///
/// Any tagging failure aborts the whole build.
pub fn build_corpus_table<I, D, S, T>(
    documents: I,
    cleaner: &TextCleaner<S>,
    tagger: &TokenTagger<T>,
    label: &str,
    source: WordSource,
) -> Result<CorpusTable>
where
    I: IntoIterator<Item = D>,
    D: AsRef<str>,
    S: SpellChecker,
    T: PosTagger,
{
    let mut table = CorpusTable::new(label);
    let mut documents_seen = 0usize;
    for document in documents {
        let tokens = tag_document(document.as_ref(), cleaner, tagger)?;
        table.extend_tokens(&tokens, source);
        documents_seen += 1;
    }
    tracing::debug!(
        corpus = label,
        documents = documents_seen,
        rows = table.len(),
        "built corpus table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenderBiasError;
    use crate::nlp::spelling::AcceptAllSpellChecker;
    use crate::nlp::tagger::LexiconTagger;

    fn services() -> (TextCleaner<AcceptAllSpellChecker>, TokenTagger<LexiconTagger>) {
        (
            TextCleaner::new(AcceptAllSpellChecker),
            TokenTagger::new(LexiconTagger::new()),
        )
    }

    #[test]
    fn test_rows_flatten_across_documents() {
        let (cleaner, tagger) = services();
        let docs = ["Students learn Python.", "Coding projects!"];
        let table = build_corpus_table(docs, &cleaner, &tagger, "CS", WordSource::Word).unwrap();

        let words: Vec<&str> = table.records().iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["students", "learn", "python", "coding", "projects"]);
        assert!(table.records().iter().all(|r| r.corpus == "CS"));
        // Proper nouns are folded by default
        assert_eq!(table.records()[2].pos, PosTag::Noun);
    }

    #[test]
    fn test_lemma_source() {
        let (cleaner, tagger) = services();
        let table =
            build_corpus_table(["students"], &cleaner, &tagger, "CS", WordSource::Lemma).unwrap();
        assert_eq!(table.records()[0].word, "student");
    }

    #[test]
    fn test_empty_corpus() {
        let (cleaner, tagger) = services();
        let table =
            build_corpus_table(Vec::<String>::new(), &cleaner, &tagger, "Geo", WordSource::Word)
                .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.label(), "Geo");
    }

    #[test]
    fn test_tagging_failure_aborts() {
        let cleaner = TextCleaner::new(AcceptAllSpellChecker);
        let tagger = TokenTagger::new(|_: &str| -> Result<Vec<TaggedToken>> {
            Err(GenderBiasError::tagging("boom"))
        });
        let err = build_corpus_table(["text"], &cleaner, &tagger, "CS", WordSource::Word);
        assert!(err.is_err());
    }

    #[test]
    fn test_from_pairs_lowercases() {
        let table = CorpusTable::from_pairs("CS", [("World", PosTag::Noun)]);
        assert_eq!(table.records()[0], WordPosRecord::new("world", PosTag::Noun, "CS"));
    }
}
