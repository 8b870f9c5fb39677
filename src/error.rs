use thiserror::Error;

use crate::tokenizer::TokenRole;

/// Fatal errors. Any of these prevents a tokenizer from being constructed.
#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vocabulary key not found: {0}")]
    VocabKeyNotFound(String),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocab(String),

    #[error("Special token '{literal}' ({role:?}) not found in vocabulary")]
    MissingSpecialToken { role: TokenRole, literal: String },

    #[error("Special role {0:?} has no literal bound")]
    UnboundSpecialRole(TokenRole),

    #[error("Invalid special token binding: {0}")]
    SpecialBinding(#[source] VocabError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported tokenizer model: {0}")]
    Unsupported(String),

    #[error("No input text provided (use --prompt, --file, or --stdin)")]
    NoInput,
}

/// Recoverable vocabulary problems, reported per entry during bulk load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabError {
    #[error("empty token string (id {0})")]
    EmptyToken(u32),

    #[error("token '{token}' already bound to id {existing}, skipping id {id}")]
    DuplicateToken { token: String, id: u32, existing: u32 },

    #[error("id {id} already bound to '{existing}', skipping '{token}'")]
    DuplicateId {
        token: String,
        id: u32,
        existing: String,
    },

    #[error("special role {0:?} is already bound")]
    RoleAlreadyBound(TokenRole),

    #[error("empty literal for special role {0:?}")]
    EmptyLiteral(TokenRole),
}
