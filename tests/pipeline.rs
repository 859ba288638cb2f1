//! End-to-end runs over two hand-written corpora and a synthetic GloVe file

use std::fmt::Write as _;
use std::path::Path;

use subject_gender_bias::pipeline::observer::{StageTimingObserver, STAGE_LOAD_VECTORS};
use subject_gender_bias::prelude::*;

const DIM: usize = 50;

/// `(word, masculine axis, feminine axis, shared axis)`
const WORDS: &[(&str, f32, f32, f32)] = &[
    ("man", 1.0, 0.0, 0.1),
    ("he", 0.9, 0.1, 0.0),
    ("his", 0.8, 0.0, 0.2),
    ("masculine", 1.0, 0.1, 0.1),
    ("male", 0.9, 0.0, 0.0),
    ("woman", 0.0, 1.0, 0.1),
    ("she", 0.1, 0.9, 0.0),
    ("her", 0.0, 0.8, 0.2),
    ("feminine", 0.1, 1.0, 0.1),
    ("female", 0.0, 0.9, 0.0),
    ("computer", 0.6, 0.3, 0.7),
    ("code", 0.7, 0.2, 0.6),
    ("logical", 0.6, 0.3, 0.8),
    ("build", 0.6, 0.2, 0.9),
    ("drama", 0.3, 0.6, 0.7),
    ("dance", 0.2, 0.7, 0.6),
    ("creative", 0.3, 0.5, 0.8),
    ("perform", 0.2, 0.6, 0.9),
    ("students", 0.4, 0.4, 0.9),
];

const CS: [&str; 3] = [
    "Students build logical code on a computer.",
    "The computer course is logical!",
    "Students learn to code.",
];

const DRAMA: [&str; 3] = [
    "Students perform creative drama and dance.",
    "We perform drama.",
    "Students learn to dance.",
];

/// Write `glove.6B.50d.txt` into `dir`
fn write_glove(dir: &Path) {
    let mut text = String::new();
    for &(word, m, f, s) in WORDS {
        write!(text, "{word} {m} {f} {s}").unwrap();
        for _ in 3..DIM {
            text.push_str(" 0.0");
        }
        text.push('\n');
    }
    std::fs::write(dir.join("glove.6B.50d.txt"), text).unwrap();
}

fn scorer_in(dir: &Path) -> GloveDistances {
    let source = VectorSource::new(dir, VectorDimensions::D50);
    load_scorer(&source, ReferenceWords::default(), &mut NoopObserver).unwrap()
}

#[test]
fn test_vectors_are_converted_once_and_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write_glove(dir.path());

    let source = VectorSource::new(dir.path(), VectorDimensions::D50);
    let mut observer = StageTimingObserver::new();
    let scorer = load_scorer(&source, ReferenceWords::default(), &mut observer).unwrap();

    assert!(source.converted_file().exists());
    let header = std::fs::read_to_string(source.converted_file()).unwrap();
    assert_eq!(header.lines().next(), Some(format!("{} {DIM}", WORDS.len()).as_str()));
    assert_eq!(scorer.vectors().len(), WORDS.len());
    assert_eq!(observer.reports()[0].0, STAGE_LOAD_VECTORS);
    assert_eq!(observer.reports()[0].1.words(), Some(WORDS.len()));

    // Second load reuses the converted file even if the raw one is gone
    std::fs::remove_file(source.glove_file()).unwrap();
    assert_eq!(scorer_in(dir.path()).vectors().len(), WORDS.len());
}

#[test]
fn test_mean_difference_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_glove(dir.path());
    let scorer = scorer_in(dir.path());

    let config = AnalysisConfig::default();
    let cleaner = config.text_cleaner(AcceptAllSpellChecker);
    let tagger = config.token_tagger(LexiconTagger::new());
    let pipeline = GenderBiasPipeline::new(&cleaner, &tagger, &scorer);

    let cs = pipeline
        .mean_difference(&CS, "CS", "website", None, &mut NoopObserver)
        .unwrap();
    let drama = pipeline
        .mean_difference(&DRAMA, "Drama", "website", None, &mut NoopObserver)
        .unwrap();

    for rows in [&cs, &drama] {
        let buckets: Vec<PosBucket> = rows.iter().map(|r| r.pos).collect();
        assert_eq!(buckets, PosBucket::ALL.to_vec());
    }

    let noun = |rows: &[MeanGenderDifference]| rows[0].mean_gender_diff.value().unwrap();
    assert!(noun(&cs) > noun(&drama));

    // build/code against perform/dance
    let verb = |rows: &[MeanGenderDifference]| rows[2].mean_gender_diff.value().unwrap();
    assert_eq!(cs[2].pos, PosBucket::Verb);
    assert!(verb(&cs) > verb(&drama));
}

#[test]
fn test_word_removal_changes_the_mean() {
    let dir = tempfile::tempdir().unwrap();
    write_glove(dir.path());
    let scorer = scorer_in(dir.path());

    let cleaner = TextCleaner::new(AcceptAllSpellChecker);
    let tagger = TokenTagger::new(LexiconTagger::new());
    let pipeline = GenderBiasPipeline::new(&cleaner, &tagger, &scorer);

    let removal = WordRemoval::new("crucial", ["computer", "code"]);
    let all = pipeline
        .mean_difference(&CS, "CS", "website", None, &mut NoopObserver)
        .unwrap();
    let removed = pipeline
        .mean_difference(&CS, "CS", "website", Some(&removal), &mut NoopObserver)
        .unwrap();

    assert_ne!(all[0].mean_gender_diff, removed[0].mean_gender_diff);
    assert_eq!(removed[0].words_removed.as_deref(), Some("crucial"));
    assert_eq!(all[1].mean_gender_diff, removed[1].mean_gender_diff);
}

#[test]
fn test_compare_and_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_glove(dir.path());
    let scorer = scorer_in(dir.path());

    let cleaner = TextCleaner::new(AcceptAllSpellChecker);
    let tagger = TokenTagger::new(LexiconTagger::new());
    let pipeline = GenderBiasPipeline::new(&cleaner, &tagger, &scorer);

    let buckets = pipeline
        .compare(&CS, "CS", &DRAMA, "Drama", 5, &mut NoopObserver)
        .unwrap();
    assert_eq!(buckets.len(), 3);
    let top_noun = &buckets[0].words[0];
    assert_eq!(buckets[0].label, "CS - Drama");
    // "code" and "computer" tie on frequency; ties go alphabetically
    assert_eq!(top_noun.word, "code");
    assert_eq!(buckets[0].words[1].word, "computer");
    assert!(top_noun.gender_diff.unwrap() > 0.0);

    let documents: Vec<RawDocument> = CS
        .iter()
        .chain(&DRAMA)
        .enumerate()
        .map(|(i, text)| RawDocument::new(i.to_string(), *text))
        .collect();
    let scores = pipeline.document_scores(&documents, &mut NoopObserver).unwrap();
    assert_eq!(scores.len(), 6);
    assert!(scores.iter().all(|s| s.mean.value().is_some()));
}

#[test]
fn test_missing_reference_word_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("glove.6B.50d.txt"), format!("man{}\n", " 0.5".repeat(DIM))).unwrap();
    let source = VectorSource::new(dir.path(), VectorDimensions::D50);
    let err = load_scorer(&source, ReferenceWords::default(), &mut NoopObserver).unwrap_err();
    assert!(matches!(err, GenderBiasError::MissingReferenceWord { .. }));
}
