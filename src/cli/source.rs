//! Tokenizer resolution from CLI `--tokenizer` argument.
//!
//! Accepts a `tokenizer.json`, a `vocab.txt`, or a model directory holding
//! one of them, and returns the matching [`VocabSource`].

use std::io;
use std::path::Path;

use crate::config::TokenizerConfig;
use crate::error::TokenizerError;
use crate::loader::VocabSource;
use crate::tokenizer::{create_tokenizer, Tokenizer, WordPieceTokenizer};

/// File names looked for inside a directory, in priority order.
const CANDIDATES: [&str; 2] = ["tokenizer.json", "vocab.txt"];

/// Resolve a `--tokenizer` argument to a vocabulary source.
///
/// Detection:
/// - Directory → `tokenizer.json` if present, else `vocab.txt`
/// - `*.txt` file → vocab list
/// - Any other file → `tokenizer.json`, vocabulary read at `vocab_key`
pub fn resolve_tokenizer(input: &str, vocab_key: &str) -> Result<VocabSource, TokenizerError> {
    let path = Path::new(input);

    if path.is_dir() {
        let found = CANDIDATES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                not_found(format!(
                    "No tokenizer.json or vocab.txt in directory: {}",
                    path.display()
                ))
            })?;
        return Ok(with_key(VocabSource::from_path(found), vocab_key));
    }

    if !path.exists() {
        return Err(not_found(format!(
            "Tokenizer file not found: {}",
            path.display()
        )));
    }

    Ok(with_key(VocabSource::from_path(path), vocab_key))
}

/// Build a tokenizer for a resolved source.
///
/// `tokenizer.json` goes through [`create_tokenizer`], so the model type is
/// checked whatever the vocabulary key.
pub fn build_tokenizer(
    source: &VocabSource,
    config: TokenizerConfig,
) -> Result<Box<dyn Tokenizer>, TokenizerError> {
    match source {
        VocabSource::TokenizerJson { path, vocab_key } => create_tokenizer(path, vocab_key, config),
        VocabSource::VocabText { .. } => {
            Ok(Box::new(WordPieceTokenizer::from_source(source, config)?))
        }
    }
}

fn with_key(source: VocabSource, vocab_key: &str) -> VocabSource {
    match source {
        VocabSource::TokenizerJson { path, .. } => VocabSource::TokenizerJson {
            path,
            vocab_key: vocab_key.to_string(),
        },
        other => other,
    }
}

fn not_found(msg: String) -> TokenizerError {
    TokenizerError::Io(io::Error::new(io::ErrorKind::NotFound, msg))
}
