//! Checks against a real GloVe download
//!
//! Run with `GLOVE_PATH=/path/to/glove cargo test -- --ignored`.

use subject_gender_bias::prelude::*;

fn real_scorer() -> GloveDistances {
    let mut config = AnalysisConfig::default();
    config.vectors.dimensions = 100;
    let source = config
        .vector_source()
        .expect("GLOVE_PATH must point at a directory with glove.6B.100d.txt");
    load_scorer(&source, config.reference, &mut NoopObserver).unwrap()
}

#[test]
#[ignore = "needs GLOVE_PATH and the GloVe 6B vectors"]
fn test_mother_is_less_masculine_than_father() {
    let scorer = real_scorer();
    let mother = scorer.gender_difference_word("mother").get("mother").unwrap();
    let father = scorer.gender_difference_word("father").get("father").unwrap();
    assert!(mother < father);
}

#[test]
#[ignore = "needs GLOVE_PATH and the GloVe 6B vectors"]
fn test_unknown_word_has_no_score() {
    let scorer = real_scorer();
    assert_eq!(scorer.gender_difference_word("zzzznotaword"), GenderScores::NotFound);
}
