//! Pretrained word vectors
//!
//! GloVe ships as plain `word f1 f2 ... fN` lines. On first use the raw file
//! is converted once into word2vec text format (a `count dim` header followed
//! by the same lines) next to the original; later loads read the converted
//! file directly.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GenderBiasError, Result};

/// Supported GloVe 6B dimensionalities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum VectorDimensions {
    D50,
    #[default]
    D100,
    D200,
    D300,
}

impl VectorDimensions {
    pub fn get(&self) -> usize {
        match self {
            Self::D50 => 50,
            Self::D100 => 100,
            Self::D200 => 200,
            Self::D300 => 300,
        }
    }
}

impl TryFrom<u32> for VectorDimensions {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            50 => Ok(Self::D50),
            100 => Ok(Self::D100),
            200 => Ok(Self::D200),
            300 => Ok(Self::D300),
            other => Err(format!(
                "unsupported vector dimensionality {other}, expected 50, 100, 200 or 300"
            )),
        }
    }
}

impl From<VectorDimensions> for u32 {
    fn from(value: VectorDimensions) -> Self {
        value.get() as u32
    }
}

/// Location of a GloVe vector file and its converted counterpart
#[derive(Debug, Clone)]
pub struct VectorSource {
    dir: PathBuf,
    dimensions: VectorDimensions,
}

impl VectorSource {
    pub fn new(dir: impl Into<PathBuf>, dimensions: VectorDimensions) -> Self {
        Self {
            dir: dir.into(),
            dimensions,
        }
    }

    pub fn dimensions(&self) -> VectorDimensions {
        self.dimensions
    }

    /// `<dir>/glove.6B.<d>d.txt`
    pub fn glove_file(&self) -> PathBuf {
        self.dir
            .join(format!("glove.6B.{}d.txt", self.dimensions.get()))
    }

    /// `<dir>/gensim_glove.6B.<d>d.txt`
    pub fn converted_file(&self) -> PathBuf {
        self.dir
            .join(format!("gensim_glove.6B.{}d.txt", self.dimensions.get()))
    }

    /// Make sure the converted file exists, converting the raw file if needed
    ///
    /// Idempotent: an existing converted file is left untouched.
    pub fn prepare(&self) -> Result<PathBuf> {
        let converted = self.converted_file();
        if converted.exists() {
            tracing::debug!(path = %converted.display(), "converted vectors already present");
            return Ok(converted);
        }

        let raw = self.glove_file();
        if !raw.exists() {
            return Err(GenderBiasError::MissingVectorFile { path: raw });
        }

        tracing::info!(from = %raw.display(), to = %converted.display(), "converting GloVe vectors");
        let (count, dim) = convert_glove_to_word2vec(&raw, &converted)?;
        tracing::info!(words = count, dim, "conversion finished");
        Ok(converted)
    }

    /// Prepare (if needed) and load the vector space
    pub fn load(&self) -> Result<WordVectors> {
        let path = self.prepare()?;
        let file = File::open(&path)
            .map_err(|e| GenderBiasError::io(format!("opening {}", path.display()), e))?;
        let vectors = WordVectors::from_word2vec_reader(BufReader::new(file))?;

        if vectors.dim() != self.dimensions.get() {
            return Err(GenderBiasError::DimensionMismatch {
                expected: self.dimensions.get(),
                found: vectors.dim(),
                line: 1,
            });
        }
        tracing::info!(words = vectors.len(), dim = vectors.dim(), "loaded word vectors");
        Ok(vectors)
    }
}

/// Convert a GloVe text file into word2vec text format
///
/// Returns `(word count, dimensionality)`. The output is written to a
/// temporary sibling and renamed into place, so an interrupted conversion
/// never leaves a truncated file behind.
pub fn convert_glove_to_word2vec(input: &Path, output: &Path) -> Result<(usize, usize)> {
    let open = |path: &Path| {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| GenderBiasError::io(format!("opening {}", path.display()), e))
    };

    let mut count = 0usize;
    let mut dim = 0usize;
    for line in open(input)?.lines() {
        let line = line.map_err(|e| GenderBiasError::io("reading GloVe file", e))?;
        if line.trim().is_empty() {
            continue;
        }
        if count == 0 {
            dim = line.split_whitespace().count().saturating_sub(1);
        }
        count += 1;
    }

    let tmp = output.with_extension("partial");
    let write_err = |e: std::io::Error| GenderBiasError::io(format!("writing {}", tmp.display()), e);
    {
        let mut writer = BufWriter::new(File::create(&tmp).map_err(write_err)?);
        writeln!(writer, "{count} {dim}").map_err(write_err)?;
        for line in open(input)?.lines() {
            let line = line.map_err(|e| GenderBiasError::io("reading GloVe file", e))?;
            if line.trim().is_empty() {
                continue;
            }
            writeln!(writer, "{}", line.trim_end()).map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;
    }
    fs::rename(&tmp, output)
        .map_err(|e| GenderBiasError::io(format!("renaming into {}", output.display()), e))?;

    Ok((count, dim))
}

/// Pre-allocation bounds when reading a word2vec header
const MAX_RESERVED_WORDS: usize = 1 << 20;
const MAX_RESERVED_FLOATS: usize = 1 << 27;

/// An in-memory word -> vector store
///
/// Vectors live in one contiguous buffer; `index` maps each word to its row.
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dim: usize,
    index: FxHashMap<String, usize>,
    data: Vec<f32>,
}

impl WordVectors {
    /// Create an empty store of the given dimensionality
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            index: FxHashMap::default(),
            data: Vec::new(),
        }
    }

    /// Build a store from `(word, vector)` pairs
    pub fn from_entries<I, S>(dim: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut vectors = Self::new(dim);
        for (line, (word, vector)) in entries.into_iter().enumerate() {
            vectors.insert(word.into(), &vector, line + 1)?;
        }
        Ok(vectors)
    }

    /// Read word2vec text format: a `count dim` header, then one vector per line
    pub fn from_word2vec_reader(reader: impl BufRead) -> Result<Self> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line.map_err(|e| GenderBiasError::io("reading vector header", e))?,
            None => return Err(GenderBiasError::malformed(1, "missing header")),
        };
        let mut fields = header.split_whitespace().map(str::parse::<usize>);
        let (Some(Ok(count)), Some(Ok(dim))) = (fields.next(), fields.next()) else {
            return Err(GenderBiasError::malformed(1, format!("bad header '{header}'")));
        };

        let Some(floats) = count.checked_mul(dim) else {
            return Err(GenderBiasError::malformed(1, format!("header '{header}' is too large")));
        };

        // The header is untrusted; only pre-allocate up to a bound
        let mut vectors = Self::new(dim);
        vectors.index.reserve(count.min(MAX_RESERVED_WORDS));
        vectors.data.reserve(floats.min(MAX_RESERVED_FLOATS));
        vectors.read_lines(lines, 2)?;
        Ok(vectors)
    }

    fn read_lines(
        &mut self,
        lines: impl Iterator<Item = std::io::Result<String>>,
        first_line_no: usize,
    ) -> Result<()> {
        for (offset, line) in lines.enumerate() {
            let line_no = first_line_no + offset;
            let line = line.map_err(|e| GenderBiasError::io("reading vectors", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let (word, vector) = parse_vector_line(&line, self.dim, line_no)?;
            self.insert(word, &vector, line_no)?;
        }
        Ok(())
    }

    /// Insert a vector; the first occurrence of a word wins
    fn insert(&mut self, word: String, vector: &[f32], line: usize) -> Result<()> {
        if vector.len() != self.dim {
            return Err(GenderBiasError::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
                line,
            });
        }
        if self.index.contains_key(&word) {
            return Ok(());
        }
        self.index.insert(word, self.index.len());
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Vector for `word`, if it is in the vocabulary
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        Some(&self.data[row * self.dim..(row + 1) * self.dim])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Vocabulary size
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Split a line into its word and the trailing `dim` floats
///
/// Anything before the floats is the word, so tokens containing spaces
/// survive.
fn parse_vector_line(line: &str, dim: usize, line_no: usize) -> Result<(String, Vec<f32>)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < dim + 1 {
        return Err(GenderBiasError::DimensionMismatch {
            expected: dim,
            found: fields.len().saturating_sub(1),
            line: line_no,
        });
    }
    let split = fields.len() - dim;
    let vector = fields[split..]
        .iter()
        .map(|f| f.parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| GenderBiasError::malformed(line_no, e.to_string()))?;
    Ok((fields[..split].join(" "), vector))
}
