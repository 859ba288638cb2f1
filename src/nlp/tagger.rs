//! Part-of-speech tagging
//!
//! [`PosTagger`] is the seam to whatever NLP backend produces
//! `(text, lemma, POS)` triples. [`TokenTagger`] wraps a backend and applies
//! proper-noun folding. [`LexiconTagger`] is a dependency-free backend built
//! from a closed-class lexicon and ordered suffix rules.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{GenderBiasError, Result};
use crate::types::{PosTag, TaggedToken};

/// A tagging backend: one token per word, in input order
pub trait PosTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>>;
}

impl<F> PosTagger for F
where
    F: Fn(&str) -> Result<Vec<TaggedToken>>,
{
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        self(text)
    }
}

/// Tags sentences through a backend, folding proper nouns into nouns
#[derive(Debug, Clone)]
pub struct TokenTagger<T> {
    backend: T,
    convert_proper_nouns: bool,
}

impl<T: PosTagger> TokenTagger<T> {
    /// Wrap a backend; proper-noun folding is on
    pub fn new(backend: T) -> Self {
        Self {
            backend,
            convert_proper_nouns: true,
        }
    }

    /// Set the default proper-noun folding used by [`TokenTagger::tag`]
    pub fn with_proper_noun_folding(mut self, convert: bool) -> Self {
        self.convert_proper_nouns = convert;
        self
    }

    /// Tag a sentence with the configured folding
    pub fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        self.tag_with(sentence, self.convert_proper_nouns)
    }

    /// Tag a sentence, relabeling `PROPN` as `NOUN` when `convert_proper_nouns`
    pub fn tag_with(&self, sentence: &str, convert_proper_nouns: bool) -> Result<Vec<TaggedToken>> {
        let mut tokens = self.backend.tag(sentence)?;
        if convert_proper_nouns {
            for token in tokens.iter_mut().filter(|t| t.pos == PosTag::ProperNoun) {
                token.pos = PosTag::Noun;
            }
        }
        Ok(tokens)
    }

    pub fn backend(&self) -> &T {
        &self.backend
    }
}

// ============================================================================
// LexiconTagger
// ============================================================================

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z]+|[^\s0-9A-Za-z]").expect("static pattern compiles"));

/// Ordered suffix rules applied to the lowercase form. First match wins.
static SUFFIX_RULES: LazyLock<Vec<(Regex, PosTag)>> = LazyLock::new(|| {
    [
        (r"^[0-9]+([a-z]{0,2})$", PosTag::Numeral),
        (r"^[a-z]{3,}ly$", PosTag::Adverb),
        (r"^[a-z]{2,}ing$", PosTag::Verb),
        (r"^[a-z]{2,}ed$", PosTag::Verb),
        (r"^[a-z]{2,}(ise|ize|ify)s?$", PosTag::Verb),
        (
            r"^[a-z]{2,}(ous|ful|able|ible|ive|ical|less|ic|al|ish|ary)$",
            PosTag::Adjective,
        ),
    ]
    .into_iter()
    .map(|(pattern, tag)| {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("Failed to compile regex '{}': {}", pattern, e));
        (regex, tag)
    })
    .collect()
});

/// Closed-class words: (word, POS, lemma)
const CLOSED_CLASS: &[(&str, PosTag, &str)] = &[
    ("a", PosTag::Determiner, "a"),
    ("an", PosTag::Determiner, "a"),
    ("the", PosTag::Determiner, "the"),
    ("this", PosTag::Determiner, "this"),
    ("that", PosTag::Determiner, "that"),
    ("these", PosTag::Determiner, "this"),
    ("those", PosTag::Determiner, "that"),
    ("each", PosTag::Determiner, "each"),
    ("every", PosTag::Determiner, "every"),
    ("all", PosTag::Determiner, "all"),
    ("some", PosTag::Determiner, "some"),
    ("any", PosTag::Determiner, "any"),
    ("no", PosTag::Determiner, "no"),
    ("i", PosTag::Pronoun, "I"),
    ("you", PosTag::Pronoun, "you"),
    ("he", PosTag::Pronoun, "he"),
    ("she", PosTag::Pronoun, "she"),
    ("it", PosTag::Pronoun, "it"),
    ("we", PosTag::Pronoun, "we"),
    ("they", PosTag::Pronoun, "they"),
    ("me", PosTag::Pronoun, "I"),
    ("him", PosTag::Pronoun, "he"),
    ("her", PosTag::Pronoun, "she"),
    ("us", PosTag::Pronoun, "we"),
    ("them", PosTag::Pronoun, "they"),
    ("his", PosTag::Pronoun, "he"),
    ("its", PosTag::Pronoun, "it"),
    ("our", PosTag::Pronoun, "we"),
    ("their", PosTag::Pronoun, "they"),
    ("your", PosTag::Pronoun, "you"),
    ("my", PosTag::Pronoun, "I"),
    ("who", PosTag::Pronoun, "who"),
    ("which", PosTag::Pronoun, "which"),
    ("what", PosTag::Pronoun, "what"),
    ("in", PosTag::Adposition, "in"),
    ("on", PosTag::Adposition, "on"),
    ("at", PosTag::Adposition, "at"),
    ("of", PosTag::Adposition, "of"),
    ("for", PosTag::Adposition, "for"),
    ("with", PosTag::Adposition, "with"),
    ("from", PosTag::Adposition, "from"),
    ("by", PosTag::Adposition, "by"),
    ("about", PosTag::Adposition, "about"),
    ("into", PosTag::Adposition, "into"),
    ("through", PosTag::Adposition, "through"),
    ("across", PosTag::Adposition, "across"),
    ("during", PosTag::Adposition, "during"),
    ("including", PosTag::Adposition, "include"),
    ("between", PosTag::Adposition, "between"),
    ("and", PosTag::CoordConj, "and"),
    ("or", PosTag::CoordConj, "or"),
    ("but", PosTag::CoordConj, "but"),
    ("nor", PosTag::CoordConj, "nor"),
    ("if", PosTag::SubordConj, "if"),
    ("because", PosTag::SubordConj, "because"),
    ("while", PosTag::SubordConj, "while"),
    ("whether", PosTag::SubordConj, "whether"),
    ("although", PosTag::SubordConj, "although"),
    ("to", PosTag::Particle, "to"),
    ("not", PosTag::Particle, "not"),
    ("is", PosTag::Auxiliary, "be"),
    ("are", PosTag::Auxiliary, "be"),
    ("was", PosTag::Auxiliary, "be"),
    ("were", PosTag::Auxiliary, "be"),
    ("be", PosTag::Auxiliary, "be"),
    ("been", PosTag::Auxiliary, "be"),
    ("being", PosTag::Auxiliary, "be"),
    ("am", PosTag::Auxiliary, "be"),
    ("has", PosTag::Auxiliary, "have"),
    ("have", PosTag::Auxiliary, "have"),
    ("had", PosTag::Auxiliary, "have"),
    ("do", PosTag::Auxiliary, "do"),
    ("does", PosTag::Auxiliary, "do"),
    ("did", PosTag::Auxiliary, "do"),
    ("will", PosTag::Auxiliary, "will"),
    ("would", PosTag::Auxiliary, "would"),
    ("can", PosTag::Auxiliary, "can"),
    ("could", PosTag::Auxiliary, "could"),
    ("should", PosTag::Auxiliary, "should"),
    ("may", PosTag::Auxiliary, "may"),
    ("might", PosTag::Auxiliary, "might"),
    ("must", PosTag::Auxiliary, "must"),
    ("very", PosTag::Adverb, "very"),
    ("also", PosTag::Adverb, "also"),
    ("well", PosTag::Adverb, "well"),
    ("often", PosTag::Adverb, "often"),
    ("how", PosTag::Adverb, "how"),
];

static CLOSED_CLASS_LEXICON: LazyLock<FxHashMap<&'static str, (PosTag, &'static str)>> =
    LazyLock::new(|| {
        CLOSED_CLASS
            .iter()
            .map(|&(word, pos, lemma)| (word, (pos, lemma)))
            .collect()
    });

/// Open-class verbs in base form
const VERBS: &[&str] = &[
    "achieve", "adapt", "analyse", "analyze", "apply", "assess", "become", "begin", "build",
    "calculate", "choose", "collaborate", "collect", "communicate", "compare", "compete",
    "complete", "compose", "consider", "construct", "continue", "create", "debug", "decide",
    "deepen", "define", "demonstrate", "describe", "develop", "discover", "discuss", "encourage",
    "enable", "engage", "enhance", "enjoy", "ensure", "evaluate", "examine", "explain", "explore",
    "express", "find", "gain", "give", "grow", "help", "identify", "imagine", "improve", "include",
    "inspire", "interpret", "introduce", "investigate", "involve", "know", "learn", "make",
    "manage", "offer", "perform", "prepare", "produce", "provide", "pursue", "read", "reflect",
    "rehearse", "require", "see", "sing", "solve", "take", "teach", "think", "understand",
    "write",
];

/// Words that are commonly both nouns and verbs
///
/// These are nouns unless the previous token introduces a verb.
const NOUN_VERBS: &[&str] = &[
    "act", "answer", "challenge", "change", "code", "control", "dance", "design", "experience",
    "focus", "model", "paint", "plan", "play", "practice", "practise", "process", "program",
    "question", "record", "research", "sketch", "study", "support", "test", "use", "visit",
    "work",
];

/// Irregular past and participle forms: (form, lemma)
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("began", "begin"),
    ("begun", "begin"),
    ("became", "become"),
    ("built", "build"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("knew", "know"),
    ("known", "know"),
    ("learnt", "learn"),
    ("made", "make"),
    ("sang", "sing"),
    ("sung", "sing"),
    ("saw", "see"),
    ("seen", "see"),
    ("taken", "take"),
    ("took", "take"),
    ("taught", "teach"),
    ("thought", "think"),
    ("understood", "understand"),
    ("wrote", "write"),
    ("written", "write"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerbClass {
    Verb,
    NounOrVerb,
}

static VERB_LEXICON: LazyLock<FxHashMap<&'static str, VerbClass>> = LazyLock::new(|| {
    VERBS
        .iter()
        .map(|&w| (w, VerbClass::Verb))
        .chain(NOUN_VERBS.iter().map(|&w| (w, VerbClass::NounOrVerb)))
        .collect()
});

static IRREGULAR_LEXICON: LazyLock<FxHashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_VERBS.iter().copied().collect());

/// Base form and class of a known verb, undoing a third-person `-s`
fn lookup_verb(lower: &str) -> Option<(String, VerbClass)> {
    if let Some(&class) = VERB_LEXICON.get(lower) {
        return Some((lower.to_string(), class));
    }
    let candidates = [
        lower.strip_suffix("ies").map(|stem| format!("{stem}y")),
        lower.strip_suffix("es").map(String::from),
        lower.strip_suffix('s').map(String::from),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|base| VERB_LEXICON.get(base.as_str()).map(|&class| (base, class)))
}

/// Whether `previous` makes an ambiguous noun/verb word a verb:
/// infinitive `to`, an auxiliary or modal, or a subject pronoun
fn introduces_verb(previous: &TaggedToken) -> bool {
    match previous.pos {
        PosTag::Auxiliary => true,
        PosTag::Particle => previous.lemma == "to",
        PosTag::Pronoun => matches!(
            previous.text.to_lowercase().as_str(),
            "i" | "you" | "we" | "they" | "he" | "she" | "it" | "who"
        ),
        _ => false,
    }
}

/// A tagged word plus its verb reading when the word is a noun/verb
/// homograph
struct Candidate {
    token: TaggedToken,
    verb_lemma: Option<String>,
}

impl From<TaggedToken> for Candidate {
    fn from(token: TaggedToken) -> Self {
        Self {
            token,
            verb_lemma: None,
        }
    }
}

/// Rule-based tagger: lexicon lookup, verb lexicon, suffix rules,
/// capitalisation, then NOUN
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    /// User entries: lowercase word -> (lemma, POS). Checked before the
    /// closed-class lexicon.
    entries: FxHashMap<String, (String, PosTag)>,
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a lexicon entry
    pub fn with_entry(mut self, word: &str, lemma: &str, pos: PosTag) -> Self {
        self.entries
            .insert(word.to_lowercase(), (lemma.to_lowercase(), pos));
        self
    }

    /// Read tab-separated `word<TAB>lemma<TAB>POS` lines
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_tsv_reader(reader: impl BufRead) -> Result<Self> {
        let mut tagger = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| GenderBiasError::io("reading lexicon", e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let [word, lemma, pos] = fields.as_slice() else {
                return Err(GenderBiasError::tagging(format!(
                    "lexicon line {} has {} fields, expected 3",
                    idx + 1,
                    fields.len()
                )));
            };
            let pos: PosTag = pos.parse().unwrap_or(PosTag::Other);
            tagger = tagger.with_entry(word, lemma, pos);
        }
        Ok(tagger)
    }

    /// Load a tab-separated lexicon file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| GenderBiasError::io(format!("opening {}", path.display()), e))?;
        let tagger = Self::from_tsv_reader(BufReader::new(file))?;
        tracing::info!(entries = tagger.len(), path = %path.display(), "loaded tagger lexicon");
        Ok(tagger)
    }

    /// Number of user lexicon entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tag_word(&self, word: &str) -> Candidate {
        let lower = word.to_lowercase();

        if let Some((lemma, pos)) = self.entries.get(&lower) {
            return TaggedToken::new(word, lemma.clone(), *pos).into();
        }
        if let Some(&(pos, lemma)) = CLOSED_CLASS_LEXICON.get(lower.as_str()) {
            return TaggedToken::new(word, lemma, pos).into();
        }
        if !word.chars().any(|c| c.is_ascii_alphanumeric()) {
            return TaggedToken::new(word, word, PosTag::Punctuation).into();
        }
        if let Some(&lemma) = IRREGULAR_LEXICON.get(lower.as_str()) {
            return TaggedToken::new(word, lemma, PosTag::Verb).into();
        }
        match lookup_verb(&lower) {
            Some((lemma, VerbClass::Verb)) => {
                return TaggedToken::new(word, lemma, PosTag::Verb).into();
            }
            Some((lemma, VerbClass::NounOrVerb)) => {
                return Candidate {
                    token: TaggedToken::new(word, lemmatize(&lower, PosTag::Noun), PosTag::Noun),
                    verb_lemma: Some(lemma),
                };
            }
            None => {}
        }

        let suffix_tag = SUFFIX_RULES
            .iter()
            .find(|(regex, _)| regex.is_match(&lower))
            .map(|&(_, tag)| tag);

        let pos = match suffix_tag {
            Some(tag) => tag,
            None if word.chars().next().is_some_and(|c| c.is_ascii_uppercase()) => {
                PosTag::ProperNoun
            }
            None => PosTag::Noun,
        };
        let lemma = lemmatize(&lower, pos);
        TaggedToken::new(word, lemma, pos).into()
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let mut tokens: Vec<TaggedToken> = Vec::new();
        for m in TOKEN.find_iter(text) {
            let Candidate {
                mut token,
                verb_lemma,
            } = self.tag_word(m.as_str());
            if let Some(lemma) = verb_lemma {
                if tokens.last().is_some_and(introduces_verb) {
                    token.pos = PosTag::Verb;
                    token.lemma = lemma;
                }
            }
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Strip regular inflections from a lowercase word
fn lemmatize(lower: &str, pos: PosTag) -> String {
    let stem = match pos {
        PosTag::Noun => {
            if let Some(stem) = lower.strip_suffix("ies").filter(|s| s.len() > 1) {
                return format!("{stem}y");
            }
            if lower.ends_with("sses") {
                lower.strip_suffix("es")
            } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
                None
            } else {
                lower.strip_suffix('s').filter(|s| s.len() > 2)
            }
        }
        PosTag::Verb => {
            if let Some(stem) = lower.strip_suffix("ied").filter(|s| s.len() > 1) {
                return format!("{stem}y");
            }
            let stem = lower
                .strip_suffix("ing")
                .or_else(|| lower.strip_suffix("ed"))
                .filter(|s| s.len() > 2);
            if let Some(base) = stem.and_then(known_verb_base) {
                return base;
            }
            stem
        }
        _ => None,
    };
    stem.unwrap_or(lower).to_string()
}

/// Recover a lexicon base form from a stem left by `-ing`/`-ed` stripping:
/// `creat` -> `create`, `plann` -> `plan`
fn known_verb_base(stem: &str) -> Option<String> {
    let with_e = format!("{stem}e");
    let mut last = stem.chars().rev();
    let undoubled = match (last.next(), last.next()) {
        (Some(a), Some(b)) if a == b && stem.len() > 3 => {
            Some(stem[..stem.len() - a.len_utf8()].to_string())
        }
        _ => None,
    };
    [Some(stem.to_string()), Some(with_e), undoubled]
        .into_iter()
        .flatten()
        .find(|base| VERB_LEXICON.contains_key(base.as_str()))
}
