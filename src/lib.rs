pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod tokenizer;

pub use config::TokenizerConfig;
pub use error::{TokenizerError, VocabError};
pub use tokenizer::create_tokenizer;
pub use tokenizer::{Token, TokenRole, TokenSequence, Tokenizer, WordPieceTokenizer};
