//! Tokenizer trait, token types, and the tokenizer factory.
//!
//! This module defines the [`Tokenizer`] capability implemented by
//! [`WordPieceTokenizer`], along with the fixed-length [`TokenSequence`] handed
//! to the downstream encoder.
//!
//! The pipeline stages live in their own submodules:
//!
//! - [`vocab`]: bidirectional token/id store plus special-role bindings.
//! - [`normalizer`]: Unicode cleanup, lowercasing, accent stripping, CJK spacing.
//! - [`pretokenizer`]: whitespace/punctuation splitting.
//! - [`wordpiece`]: greedy longest-match-first segmentation.
//! - [`postprocess`]: truncation, special tokens, padding.

pub mod normalizer;
pub mod postprocess;
pub mod pretokenizer;
pub mod vocab;
pub mod wordpiece;

use std::path::Path;

use serde::Serialize;
use tracing::debug;

pub use normalizer::Normalizer;
pub use postprocess::SequenceAssembler;
pub use pretokenizer::{split_words, PreTokens};
pub use vocab::{SpecialTokenIds, Vocabulary};
pub use wordpiece::WordPieceTokenizer;

use crate::config::TokenizerConfig;
use crate::error::TokenizerError;
use crate::loader;

/// Meaning of a token within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenRole {
    /// An ordinary vocabulary subword.
    None,
    Padding,
    Unknown,
    Classification,
    Separator,
    Mask,
}

impl TokenRole {
    /// Roles that can be bound to a literal in the vocabulary.
    pub const SPECIAL: [TokenRole; 5] = [
        TokenRole::Padding,
        TokenRole::Unknown,
        TokenRole::Classification,
        TokenRole::Separator,
        TokenRole::Mask,
    ];

    /// Roles that must resolve to a vocabulary id before tokenization.
    pub const REQUIRED: [TokenRole; 4] = [
        TokenRole::Padding,
        TokenRole::Unknown,
        TokenRole::Classification,
        TokenRole::Separator,
    ];

    pub fn is_special(self) -> bool {
        Self::SPECIAL.contains(&self)
    }
}

/// A single position in a tokenized sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Vocabulary id fed to the model.
    pub id: u32,
    /// Matched subword (with `##` marker), the whole word for Unknown, or
    /// empty for synthesized special tokens.
    pub text: String,
    /// 1 for real content (including specials), 0 for padding.
    pub attention_mask: u8,
    /// Always 0: only single-segment input is produced.
    pub segment_id: u32,
    pub role: TokenRole,
}

impl Token {
    pub(crate) fn subword(id: u32, text: String) -> Self {
        Self {
            id,
            text,
            attention_mask: 1,
            segment_id: 0,
            role: TokenRole::None,
        }
    }

    pub(crate) fn unknown(id: u32, word: &str) -> Self {
        Self {
            id,
            text: word.to_string(),
            attention_mask: 1,
            segment_id: 0,
            role: TokenRole::Unknown,
        }
    }

    pub(crate) fn special(id: u32, role: TokenRole) -> Self {
        let attention_mask = if role == TokenRole::Padding { 0 } else { 1 };
        Self {
            id,
            text: String::new(),
            attention_mask,
            segment_id: 0,
            role,
        }
    }
}

/// Record of a truncation applied while assembling a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Number of content tokens produced before truncation.
    pub original_len: usize,
    /// Number of content tokens kept (`max_length - 2`).
    pub kept: usize,
}

/// Fixed-length output of [`Tokenizer::tokenize`].
///
/// Always holds exactly `max_length` tokens: `[CLS]`, content, `[SEP]`, then
/// padding. The accessors expose the three parallel arrays an encoder model
/// consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    truncation: Option<Truncation>,
}

impl TokenSequence {
    pub(crate) fn new(tokens: Vec<Token>, truncation: Option<Truncation>) -> Self {
        Self { tokens, truncation }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.tokens.iter().map(|t| t.id).collect()
    }

    pub fn attention_mask(&self) -> Vec<u8> {
        self.tokens.iter().map(|t| t.attention_mask).collect()
    }

    pub fn segment_ids(&self) -> Vec<u32> {
        self.tokens.iter().map(|t| t.segment_id).collect()
    }

    /// Token ids widened to `i64`, the input dtype of ONNX BERT exports.
    pub fn input_ids_i64(&self) -> Vec<i64> {
        self.tokens.iter().map(|t| i64::from(t.id)).collect()
    }

    pub fn attention_mask_i64(&self) -> Vec<i64> {
        self.tokens.iter().map(|t| i64::from(t.attention_mask)).collect()
    }

    pub fn segment_ids_i64(&self) -> Vec<i64> {
        self.tokens.iter().map(|t| i64::from(t.segment_id)).collect()
    }

    /// Number of positions with `attention_mask == 1`.
    pub fn real_len(&self) -> usize {
        self.tokens.iter().filter(|t| t.attention_mask == 1).count()
    }

    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// A tokenizer that converts text into a fixed-length token sequence.
///
/// Implementations hold only immutable state after construction, so a single
/// instance can be shared across threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize raw text into exactly `max_length` tokens.
    fn tokenize(&self, text: &str) -> TokenSequence;

    /// Number of distinct vocabulary entries.
    fn vocab_size(&self) -> usize;
}

/// Tokenize a batch of texts. Each text is tokenized independently.
pub fn tokenize_batch(tokenizer: &dyn Tokenizer, texts: &[&str]) -> Vec<TokenSequence> {
    texts.iter().map(|text| tokenizer.tokenize(text)).collect()
}

/// Build a tokenizer from a HuggingFace `tokenizer.json` file.
///
/// The `model.type` field selects the implementation. Only `WordPiece` is
/// supported; a missing type is treated as WordPiece. The vocabulary object is
/// read at JSON pointer `vocab_key` (usually
/// [`DEFAULT_VOCAB_KEY`](loader::DEFAULT_VOCAB_KEY)). Normalizer
/// and model settings found in the file are layered on top of `config`.
pub fn create_tokenizer(
    path: impl AsRef<Path>,
    vocab_key: &str,
    config: TokenizerConfig,
) -> Result<Box<dyn Tokenizer>, TokenizerError> {
    let path = path.as_ref();
    let value = loader::read_json(path)?;

    let model_type = value
        .pointer("/model/type")
        .and_then(|v| v.as_str())
        .unwrap_or("WordPiece");
    debug!(path = %path.display(), vocab_key, model_type, "Creating tokenizer");

    match model_type {
        "WordPiece" => {
            let config = config.with_tokenizer_json(&value);
            let entries = loader::parse_vocab_json(&value, vocab_key)?;
            Ok(Box::new(WordPieceTokenizer::new(config, entries)?))
        }
        "BPE" | "Unigram" | "WordLevel" => Err(TokenizerError::Unsupported(format!(
            "{} models are not implemented",
            model_type
        ))),
        other => Err(TokenizerError::Unsupported(other.to_string())),
    }
}
