// ============================================================
// CLI commands and arguments
// ============================================================
// Four subcommands: `score`, `mean-diff`, `compare` and `documents`.
// Options shared by all of them live in `CommonArgs` and override the
// values read from `--config`.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use subject_gender_bias::summary::DEFAULT_TOP_N;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the gender score of individual words
    Score(ScoreArgs),

    /// Mean gender score per POS bucket for one corpus
    MeanDiff(MeanDiffArgs),

    /// Words that most distinguish one corpus from another
    Compare(CompareArgs),

    /// Mean gender score of every document in a corpus
    Documents(DocumentsArgs),
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding glove.6B.<d>d.txt
    #[arg(long, global = true, env = "GLOVE_PATH")]
    pub glove_dir: Option<PathBuf>,

    /// Vector dimensionality: 50, 100, 200 or 300
    #[arg(long, global = true)]
    pub dimensions: Option<u32>,

    /// Word list or hunspell .dic (a sibling .aff is used for affixes); without it no word is corrected
    #[arg(long, global = true)]
    pub dictionary: Option<PathBuf>,

    /// Extra tagger lexicon, tab-separated word, lemma and POS
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,

    /// Use lemmas instead of surface forms
    #[arg(long, global = true)]
    pub lemma: bool,

    /// Keep PROPN tags instead of folding them into NOUN
    #[arg(long, global = true)]
    pub keep_proper_nouns: bool,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Words to score
    #[arg(required = true)]
    pub words: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MeanDiffArgs {
    /// Directory of .txt documents
    #[arg(long)]
    pub corpus: PathBuf,

    /// Subject label, e.g. CS
    #[arg(long)]
    pub subject: String,

    /// Data source label, e.g. website
    #[arg(long, default_value = "website")]
    pub data_source: String,

    /// Word list to remove before scoring; its file name is the policy label
    #[arg(long)]
    pub remove: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First corpus directory
    #[arg(long)]
    pub corpus_a: PathBuf,

    /// Label of the first corpus
    #[arg(long)]
    pub label_a: String,

    /// Second corpus directory
    #[arg(long)]
    pub corpus_b: PathBuf,

    /// Label of the second corpus
    #[arg(long)]
    pub label_b: String,

    /// Words reported per POS bucket
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

#[derive(Args, Debug)]
pub struct DocumentsArgs {
    /// Directory of .txt documents; file stems become document ids
    #[arg(long)]
    pub corpus: PathBuf,
}
