//! Tokenizer configuration.
//!
//! [`TokenizerConfig`] carries the normalization toggles, sequence limits, and
//! special-token literals. It deserializes from a partial JSON object (missing
//! keys take their defaults) and can absorb the settings recorded in a
//! HuggingFace `tokenizer.json`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::TokenizerError;
use crate::tokenizer::TokenRole;

pub const DEFAULT_MAX_LENGTH: usize = 128;
pub const DEFAULT_MAX_INPUT_CHARS_PER_WORD: usize = 100;

/// Configuration for a WordPiece tokenizer. Immutable once a tokenizer is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Output sequence length, special tokens included. At least 2.
    pub max_length: usize,
    /// Words with at least this many characters become a single `[UNK]`.
    pub max_input_chars_per_word: usize,
    pub clean_text: bool,
    pub to_lowercase: bool,
    pub strip_accents: bool,
    pub handle_chinese_chars: bool,
    pub padding_token: String,
    pub unknown_token: String,
    pub classification_token: String,
    pub separator_token: String,
    pub mask_token: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_input_chars_per_word: DEFAULT_MAX_INPUT_CHARS_PER_WORD,
            clean_text: true,
            to_lowercase: true,
            strip_accents: true,
            handle_chinese_chars: true,
            padding_token: "[PAD]".to_string(),
            unknown_token: "[UNK]".to_string(),
            classification_token: "[CLS]".to_string(),
            separator_token: "[SEP]".to_string(),
            mask_token: "[MASK]".to_string(),
        }
    }
}

impl TokenizerConfig {
    /// Parse a configuration from a JSON object. Missing keys use defaults.
    pub fn from_json(json: &str) -> Result<Self, TokenizerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the constraints a tokenizer relies on.
    pub fn validate(&self) -> Result<(), TokenizerError> {
        if self.max_length < 2 {
            return Err(TokenizerError::InvalidConfig(format!(
                "max_length must be at least 2 to hold [CLS] and [SEP], got {}",
                self.max_length
            )));
        }
        if self.max_input_chars_per_word == 0 {
            return Err(TokenizerError::InvalidConfig(
                "max_input_chars_per_word must be positive".to_string(),
            ));
        }
        for (role, literal) in self.special_literals() {
            if literal.is_empty() {
                return Err(TokenizerError::InvalidConfig(format!(
                    "empty literal for special role {:?}",
                    role
                )));
            }
        }
        Ok(())
    }

    /// Literal string configured for each special role.
    pub fn special_literals(&self) -> [(TokenRole, &str); 5] {
        [
            (TokenRole::Padding, self.padding_token.as_str()),
            (TokenRole::Unknown, self.unknown_token.as_str()),
            (TokenRole::Classification, self.classification_token.as_str()),
            (TokenRole::Separator, self.separator_token.as_str()),
            (TokenRole::Mask, self.mask_token.as_str()),
        ]
    }

    /// Overlay settings found in a parsed HuggingFace `tokenizer.json`.
    ///
    /// Reads the `BertNormalizer` flags from `normalizer` and
    /// `max_input_chars_per_word` / `unk_token` from `model`. Keys that are
    /// absent or of the wrong type leave the current value alone. A null
    /// `strip_accents` follows `lowercase`, as BERT does.
    pub fn with_tokenizer_json(mut self, root: &Value) -> Self {
        if let Some(norm) = root
            .get("normalizer")
            .filter(|n| n.is_object() && is_bert_normalizer(n))
        {
            let flag = |key: &str| norm.get(key).and_then(Value::as_bool);
            if let Some(v) = flag("clean_text") {
                self.clean_text = v;
            }
            if let Some(v) = flag("handle_chinese_chars") {
                self.handle_chinese_chars = v;
            }
            if let Some(v) = flag("lowercase") {
                self.to_lowercase = v;
            }
            match norm.get("strip_accents") {
                Some(Value::Bool(v)) => self.strip_accents = *v,
                Some(Value::Null) => self.strip_accents = self.to_lowercase,
                _ => {}
            }
        }

        if let Some(model) = root.get("model") {
            if let Some(n) = model
                .get("max_input_chars_per_word")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
            {
                self.max_input_chars_per_word = n;
            }
            if let Some(unk) = model.get("unk_token").and_then(Value::as_str) {
                self.unknown_token = unk.to_string();
            }
        }

        debug!(config = ?self, "Applied tokenizer.json settings");
        self
    }
}

fn is_bert_normalizer(norm: &Value) -> bool {
    matches!(
        norm.get("type").and_then(Value::as_str),
        Some("BertNormalizer") | None
    )
}
