//! Mean gender difference of single documents

use serde::{Deserialize, Serialize};

use crate::corpus::tag_document;
use crate::embedding::GloveDistances;
use crate::error::Result;
use crate::nlp::cleaner::TextCleaner;
use crate::nlp::spelling::SpellChecker;
use crate::nlp::tagger::{PosTagger, TokenTagger};
use crate::types::{MeanScore, RawDocument, WordSource};

/// Mean gender difference of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentGenderScore {
    pub id: String,
    pub mean: MeanScore,
}

/// Mean gender score of the distinct scored words of one text
///
/// Every word counts once regardless of how often it occurs. Returns
/// [`MeanScore::NoData`] when no word of the text is in the vocabulary.
pub fn document_mean_gender_difference<S, T>(
    text: &str,
    cleaner: &TextCleaner<S>,
    tagger: &TokenTagger<T>,
    scorer: &GloveDistances,
    source: WordSource,
) -> Result<MeanScore>
where
    S: SpellChecker,
    T: PosTagger,
{
    let tokens = tag_document(text, cleaner, tagger)?;
    let scores = scorer.gender_difference(tokens.iter().map(|t| t.form(source)));
    Ok(match scores.as_map() {
        Some(map) => MeanScore::from_values(map.values().copied()),
        None => MeanScore::NoData,
    })
}

/// Score every document; the first tagging failure aborts the batch
pub fn document_gender_scores<S, T>(
    documents: &[RawDocument],
    cleaner: &TextCleaner<S>,
    tagger: &TokenTagger<T>,
    scorer: &GloveDistances,
    source: WordSource,
) -> Result<Vec<DocumentGenderScore>>
where
    S: SpellChecker,
    T: PosTagger,
{
    documents
        .iter()
        .map(|doc| {
            let mean = document_mean_gender_difference(&doc.text, cleaner, tagger, scorer, source)?;
            tracing::debug!(id = %doc.id, mean = ?mean.value(), "scored document");
            Ok(DocumentGenderScore {
                id: doc.id.clone(),
                mean,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::gender::tests::toy_scorer;
    use crate::error::GenderBiasError;
    use crate::nlp::spelling::AcceptAllSpellChecker;
    use crate::nlp::tagger::LexiconTagger;
    use crate::types::TaggedToken;

    const EPS: f64 = 1e-9;

    fn services() -> (TextCleaner<AcceptAllSpellChecker>, TokenTagger<LexiconTagger>) {
        (
            TextCleaner::new(AcceptAllSpellChecker),
            TokenTagger::new(LexiconTagger::new()),
        )
    }

    #[test]
    fn test_mean_over_distinct_words() {
        let (cleaner, tagger) = services();
        let scorer = toy_scorer();
        let mean = document_mean_gender_difference(
            "Computer computer COMPUTER drama, and qwzx!",
            &cleaner,
            &tagger,
            &scorer,
            WordSource::Word,
        )
        .unwrap();

        let computer = scorer.gender_difference_word("computer").get("computer").unwrap();
        let drama = scorer.gender_difference_word("drama").get("drama").unwrap();
        assert!((mean.value().unwrap() - (computer + drama) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_document_without_known_words() {
        let (cleaner, tagger) = services();
        let mean = document_mean_gender_difference(
            "qwzx vbnm",
            &cleaner,
            &tagger,
            &toy_scorer(),
            WordSource::Word,
        )
        .unwrap();
        assert_eq!(mean, MeanScore::NoData);
    }

    #[test]
    fn test_batch_keeps_document_order() {
        let (cleaner, tagger) = services();
        let docs = vec![
            RawDocument::new("100", "We perform drama"),
            RawDocument::new("200", ""),
            RawDocument::new("300", "logical code"),
        ];
        let scores =
            document_gender_scores(&docs, &cleaner, &tagger, &toy_scorer(), WordSource::Word)
                .unwrap();
        let ids: Vec<&str> = scores.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["100", "200", "300"]);
        assert!(scores[1].mean.is_no_data());
        assert!(scores[2].mean.value().unwrap() > scores[0].mean.value().unwrap());
    }

    #[test]
    fn test_batch_propagates_tagging_failure() {
        let cleaner = TextCleaner::new(AcceptAllSpellChecker);
        let tagger = TokenTagger::new(|_: &str| -> Result<Vec<TaggedToken>> {
            Err(GenderBiasError::tagging("model unavailable"))
        });
        let docs = vec![RawDocument::new("1", "text")];
        let result = document_gender_scores(&docs, &cleaner, &tagger, &toy_scorer(), WordSource::Word);
        assert!(matches!(result, Err(GenderBiasError::Tagging { .. })));
    }
}
