// ============================================================
// CLI
// ============================================================
// Parses arguments with clap, builds the long-lived services once
// (vectors, spell checker, tagger) and hands them to the library
// pipeline. Results go to stdout as JSON; logs go to stderr.

pub mod commands;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use subject_gender_bias::embedding::GloveDistances;
use subject_gender_bias::nlp::cleaner::TextCleaner;
use subject_gender_bias::nlp::spelling::{AcceptAllSpellChecker, DictionarySpellChecker, SpellChecker};
use subject_gender_bias::nlp::tagger::{LexiconTagger, TokenTagger};
use subject_gender_bias::pipeline::{load_scorer, GenderBiasPipeline, TracingObserver};
use subject_gender_bias::summary::WordRemoval;
use subject_gender_bias::{AnalysisConfig, RawDocument, WordSource};

use commands::{Commands, CommonArgs, CompareArgs, DocumentsArgs, MeanDiffArgs, ScoreArgs};

#[derive(Parser, Debug)]
#[command(
    name = "subject-gender-bias",
    version,
    about = "Score gendered language in school subject descriptions with GloVe vectors."
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Services built once per run
struct Services {
    config: AnalysisConfig,
    cleaner: TextCleaner<Box<dyn SpellChecker>>,
    tagger: TokenTagger<LexiconTagger>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = resolve_config(&self.common)?;
        match self.command {
            Commands::Score(args) => run_score(config, args),
            Commands::MeanDiff(args) => run_mean_diff(config, &self.common, args),
            Commands::Compare(args) => run_compare(config, &self.common, args),
            Commands::Documents(args) => run_documents(config, &self.common, args),
        }
    }
}

/// Config file (or defaults) with command-line overrides applied
fn resolve_config(common: &CommonArgs) -> Result<AnalysisConfig> {
    let mut config = match &common.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = &common.glove_dir {
        config.vectors.dir = Some(dir.clone());
    }
    if let Some(dimensions) = common.dimensions {
        config.vectors.dimensions = dimensions;
    }
    if common.lemma {
        config.tagging.word_source = WordSource::Lemma;
    }
    if common.keep_proper_nouns {
        config.tagging.convert_proper_nouns = false;
    }
    config.ensure_valid()?;
    Ok(config)
}

fn build_services(config: AnalysisConfig, common: &CommonArgs) -> Result<Services> {
    let spell_checker: Box<dyn SpellChecker> = match &common.dictionary {
        Some(path) => Box::new(DictionarySpellChecker::from_path(path)?),
        None => Box::new(AcceptAllSpellChecker),
    };
    let backend = match &common.lexicon {
        Some(path) => LexiconTagger::from_path(path)?,
        None => LexiconTagger::new(),
    };
    Ok(Services {
        cleaner: config.text_cleaner(spell_checker),
        tagger: config.token_tagger(backend),
        config,
    })
}

fn run_score(config: AnalysisConfig, args: ScoreArgs) -> Result<()> {
    let scorer = load_scorer(&config.vector_source()?, config.reference.clone(), &mut TracingObserver)?;
    let scores = scorer.gender_difference(&args.words);
    let output: Vec<(String, Option<f64>)> = args
        .words
        .iter()
        .map(|w| {
            let word = w.to_lowercase();
            let score = scores.get(&word);
            (word, score)
        })
        .collect();
    print_json(&output)
}

fn run_mean_diff(config: AnalysisConfig, common: &CommonArgs, args: MeanDiffArgs) -> Result<()> {
    let scorer = load_scorer(&config.vector_source()?, config.reference.clone(), &mut TracingObserver)?;
    let services = build_services(config, common)?;
    let removal = args
        .remove
        .as_deref()
        .map(WordRemoval::from_path)
        .transpose()?;

    let documents = texts(read_corpus_dir(&args.corpus)?);
    let rows = pipeline(&services, &scorer).mean_difference(
        &documents,
        &args.subject,
        &args.data_source,
        removal.as_ref(),
        &mut TracingObserver,
    )?;
    print_json(&rows)
}

fn run_compare(config: AnalysisConfig, common: &CommonArgs, args: CompareArgs) -> Result<()> {
    let scorer = load_scorer(&config.vector_source()?, config.reference.clone(), &mut TracingObserver)?;
    let services = build_services(config, common)?;

    let documents_a = texts(read_corpus_dir(&args.corpus_a)?);
    let documents_b = texts(read_corpus_dir(&args.corpus_b)?);
    let buckets = pipeline(&services, &scorer).compare(
        &documents_a,
        &args.label_a,
        &documents_b,
        &args.label_b,
        args.top_n,
        &mut TracingObserver,
    )?;
    print_json(&buckets)
}

fn run_documents(config: AnalysisConfig, common: &CommonArgs, args: DocumentsArgs) -> Result<()> {
    let scorer = load_scorer(&config.vector_source()?, config.reference.clone(), &mut TracingObserver)?;
    let services = build_services(config, common)?;

    let documents = read_corpus_dir(&args.corpus)?;
    let scores = pipeline(&services, &scorer).document_scores(&documents, &mut TracingObserver)?;
    print_json(&scores)
}

fn pipeline<'a>(
    services: &'a Services,
    scorer: &'a GloveDistances,
) -> GenderBiasPipeline<'a, Box<dyn SpellChecker>, LexiconTagger> {
    GenderBiasPipeline::new(&services.cleaner, &services.tagger, scorer)
        .with_word_source(services.config.tagging.word_source)
        .with_pos_normalization(services.config.frequency.normalize_by_pos)
}

/// Read every `.txt` file of a directory, sorted by file name
///
/// Files that cannot be read as UTF-8 text are skipped with a warning.
fn read_corpus_dir(dir: &Path) -> Result<Vec<RawDocument>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("reading corpus directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read_to_string(&path) {
            Ok(text) => documents.push(RawDocument::new(id, text)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document"),
        }
    }
    if documents.is_empty() {
        bail!("no readable .txt documents in {}", dir.display());
    }
    tracing::info!(dir = %dir.display(), documents = documents.len(), "read corpus");
    Ok(documents)
}

fn texts(documents: Vec<RawDocument>) -> Vec<String> {
    documents.into_iter().map(|d| d.text).collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("writing JSON output")?;
    writeln!(out)?;
    Ok(())
}
