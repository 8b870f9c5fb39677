//! WordPiece tokenizer for BERT-family models.
//!
//! Implements the WordPiece subword tokenization used by BERT, DistilBERT,
//! MiniLM, and similar encoders. The pipeline:
//!
//! 1. Normalizes text (see [`super::normalizer`]).
//! 2. Splits on whitespace and punctuation (see [`super::pretokenizer`]).
//! 3. For each word, greedily takes the longest prefix found in the vocabulary,
//!    then continues with the remainder using the `##` continuation prefix.
//! 4. If any position of a word has no match, the whole word becomes `[UNK]`.
//! 5. Truncates, wraps with `[CLS]`/`[SEP]`, and pads (see [`super::postprocess`]).

use std::path::Path;

use tracing::debug;

use super::{
    split_words, Normalizer, SequenceAssembler, SpecialTokenIds, Token, TokenRole, TokenSequence,
    Tokenizer, Vocabulary,
};
use crate::config::TokenizerConfig;
use crate::error::TokenizerError;
use crate::loader::{self, VocabSource};

/// The continuation prefix for WordPiece subwords.
pub const CONTINUATION_PREFIX: &str = "##";

/// WordPiece tokenizer compatible with BERT-family vocabularies.
///
/// # Construction
///
/// Use [`WordPieceTokenizer::new`] with any iterator of `(token, id)` pairs, or
/// one of the file constructors. Construction fails unless the padding,
/// unknown, classification and separator literals all resolve to vocabulary
/// ids, so every constructed tokenizer is ready to use.
#[derive(Debug, Clone)]
pub struct WordPieceTokenizer {
    config: TokenizerConfig,
    vocab: Vocabulary,
    special_ids: SpecialTokenIds,
    normalizer: Normalizer,
    assembler: SequenceAssembler,
}

impl WordPieceTokenizer {
    /// Create a tokenizer from vocabulary entries.
    ///
    /// Entries rejected by [`Vocabulary::set`] (empty, duplicate token,
    /// duplicate id) are skipped with a warning. A missing required special
    /// token or an invalid `config` is an error.
    pub fn new<I, S>(config: TokenizerConfig, entries: I) -> Result<Self, TokenizerError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        config.validate()?;

        let mut vocab = Vocabulary::new();
        for (role, literal) in config.special_literals() {
            vocab
                .assign_special(role, literal)
                .map_err(TokenizerError::SpecialBinding)?;
        }

        let skipped = vocab.load_entries(entries);
        let special_ids = vocab.special_ids()?;
        let normalizer = Normalizer::from_config(&config);
        let assembler = SequenceAssembler::new(config.max_length, special_ids)?;

        debug!(
            vocab_size = vocab.size(),
            skipped = skipped.len(),
            cls_id = special_ids.cls,
            sep_id = special_ids.sep,
            unk_id = special_ids.unk,
            pad_id = special_ids.pad,
            max_length = config.max_length,
            "WordPiece tokenizer initialized"
        );

        Ok(Self {
            config,
            vocab,
            special_ids,
            normalizer,
            assembler,
        })
    }

    /// Load the vocabulary from `source` and build a tokenizer.
    pub fn from_source(
        source: &VocabSource,
        config: TokenizerConfig,
    ) -> Result<Self, TokenizerError> {
        let entries = loader::read_vocab(source)?;
        Self::new(config, entries)
    }

    /// Build from a HuggingFace `tokenizer.json`, reading the vocabulary object
    /// at JSON pointer `vocab_key` (usually `/model/vocab`).
    pub fn from_tokenizer_json(
        path: impl AsRef<Path>,
        vocab_key: &str,
        config: TokenizerConfig,
    ) -> Result<Self, TokenizerError> {
        let source = VocabSource::TokenizerJson {
            path: path.as_ref().to_path_buf(),
            vocab_key: vocab_key.to_string(),
        };
        Self::from_source(&source, config)
    }

    /// Build from `vocab.txt` content: one token per line, id = line index.
    pub fn from_vocab_text(
        vocab_text: &str,
        config: TokenizerConfig,
    ) -> Result<Self, TokenizerError> {
        Self::new(config, loader::parse_vocab_text(vocab_text))
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn special_ids(&self) -> SpecialTokenIds {
        self.special_ids
    }

    /// Normalize text with the configured pipeline.
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Content tokens for `text`, before truncation and special tokens.
    pub fn encode_words(&self, text: &str) -> Vec<Token> {
        let normalized = self.normalizer.normalize(text);
        let mut tokens = Vec::new();
        for word in split_words(&normalized) {
            self.segment_into(word, &mut tokens);
        }
        tokens
    }

    /// Apply WordPiece segmentation to a single pre-token.
    pub fn segment_word(&self, word: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.segment_into(word, &mut tokens);
        tokens
    }

    /// Greedy longest-match-first segmentation of one word, appended to `output`.
    ///
    /// Emits either an ordered, gap-free cover of the word by vocabulary
    /// subwords, or exactly one Unknown token holding the whole word. Words
    /// with `max_input_chars_per_word` or more characters are Unknown without
    /// being searched.
    fn segment_into(&self, word: &str, output: &mut Vec<Token>) {
        if word.is_empty() {
            return;
        }

        // Byte offset of every char boundary, including the end of the word.
        let mut bounds: Vec<usize> = word.char_indices().map(|(i, _)| i).collect();
        let char_count = bounds.len();
        bounds.push(word.len());

        if char_count >= self.config.max_input_chars_per_word {
            output.push(Token::unknown(self.special_ids.unk, word));
            return;
        }

        let mark = output.len();
        let mut candidate = String::with_capacity(word.len() + CONTINUATION_PREFIX.len());
        let mut start = 0;

        while start < char_count {
            let mut end = char_count;
            let mut matched = None;

            while start < end {
                candidate.clear();
                if start > 0 {
                    candidate.push_str(CONTINUATION_PREFIX);
                }
                candidate.push_str(&word[bounds[start]..bounds[end]]);

                if let Some(id) = self.vocab.token_to_id(&candidate) {
                    matched = Some(id);
                    break;
                }
                end -= 1;
            }

            match matched {
                Some(id) => {
                    output.push(Token::subword(id, candidate.clone()));
                    start = end;
                }
                None => {
                    // No piece fits at this position: the whole word is unknown.
                    output.truncate(mark);
                    output.push(Token::unknown(self.special_ids.unk, word));
                    return;
                }
            }
        }
    }

    /// Decode ids back into text for inspection.
    ///
    /// Classification, separator and padding ids are skipped; `##` pieces are
    /// glued onto the previous word. Ids outside the vocabulary are dropped.
    pub fn decode(&self, ids: &[u32]) -> String {
        let mut pieces: Vec<String> = Vec::new();
        for &id in ids {
            if matches!(
                self.special_ids.role_of(id),
                Some(TokenRole::Classification | TokenRole::Separator | TokenRole::Padding)
            ) {
                continue;
            }
            let Some(token) = self.vocab.id_to_token(id) else {
                continue;
            };
            match (token.strip_prefix(CONTINUATION_PREFIX), pieces.last_mut()) {
                (Some(suffix), Some(last)) => last.push_str(suffix),
                (Some(suffix), None) => pieces.push(suffix.to_string()),
                (None, _) => pieces.push(token.to_string()),
            }
        }
        pieces.join(" ")
    }
}

impl Tokenizer for WordPieceTokenizer {
    fn tokenize(&self, text: &str) -> TokenSequence {
        self.assembler.assemble(self.encode_words(text))
    }

    fn vocab_size(&self) -> usize {
        self.vocab.size()
    }
}
