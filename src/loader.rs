//! Vocabulary sources.
//!
//! Reads `(token, id)` pairs from either a HuggingFace `tokenizer.json` (the
//! vocabulary object is located with a JSON pointer, `/model/vocab` by default)
//! or a BERT `vocab.txt` (one token per line, id = zero-based line number).
//!
//! Anything that prevents reading the source at all is a [`TokenizerError`].
//! Per-entry conflicts (duplicates, empty tokens) are left to
//! [`Vocabulary::load_entries`](crate::tokenizer::Vocabulary::load_entries).

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::TokenizerError;

/// JSON pointer of the vocabulary object in a HuggingFace `tokenizer.json`.
pub const DEFAULT_VOCAB_KEY: &str = "/model/vocab";

/// Where to read a vocabulary from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabSource {
    TokenizerJson { path: PathBuf, vocab_key: String },
    VocabText { path: PathBuf },
}

impl VocabSource {
    /// Pick a source from a file name: `*.txt` is a vocab list, anything else
    /// is treated as `tokenizer.json`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if is_txt {
            Self::VocabText { path }
        } else {
            Self::TokenizerJson {
                path,
                vocab_key: DEFAULT_VOCAB_KEY.to_string(),
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::TokenizerJson { path, .. } | Self::VocabText { path } => path,
        }
    }
}

/// Read every `(token, id)` pair from `source`.
pub fn read_vocab(source: &VocabSource) -> Result<Vec<(String, u32)>, TokenizerError> {
    let entries = match source {
        VocabSource::TokenizerJson { path, vocab_key } => {
            let root = read_json(path)?;
            parse_vocab_json(&root, vocab_key)?
        }
        VocabSource::VocabText { path } => {
            let text = std::fs::read_to_string(path)?;
            parse_vocab_text(&text)
        }
    };

    info!(
        path = %source.path().display(),
        entries = entries.len(),
        "Read vocabulary"
    );
    Ok(entries)
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, TokenizerError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Extract the vocabulary object at `vocab_key` from a parsed document.
///
/// The object must map token strings to non-negative integer ids that fit in
/// `u32`. Entries come out in the map's key order.
pub fn parse_vocab_json(
    root: &Value,
    vocab_key: &str,
) -> Result<Vec<(String, u32)>, TokenizerError> {
    let vocab = root
        .pointer(vocab_key)
        .ok_or_else(|| TokenizerError::VocabKeyNotFound(vocab_key.to_string()))?;

    let map = vocab.as_object().ok_or_else(|| {
        TokenizerError::InvalidVocab(format!("value at '{}' is not an object", vocab_key))
    })?;

    let mut entries = Vec::with_capacity(map.len());
    for (token, id) in map {
        let id = id
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                TokenizerError::InvalidVocab(format!("token '{}' has invalid id {}", token, id))
            })?;
        entries.push((token.clone(), id));
    }

    debug!(vocab_key, entries = entries.len(), "Parsed JSON vocabulary");
    Ok(entries)
}

/// Parse `vocab.txt` content. Line `n` gets id `n`; a trailing `\r` is dropped.
pub fn parse_vocab_text(text: &str) -> Vec<(String, u32)> {
    text.lines()
        .zip(0u32..)
        .map(|(line, id)| (line.trim_end_matches('\r').to_string(), id))
        .collect()
}
