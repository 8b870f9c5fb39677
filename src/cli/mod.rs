//! Shared CLI utilities for the strata-wordpiece binary.

pub mod source;

use std::io::{self, Read};
use std::path::Path;

use crate::error::TokenizerError;

/// Initialize tracing/logging to stderr.
///
/// If `disable` is true, no output is produced.
/// Otherwise respects `RUST_LOG` env var, defaulting to WARN so truncation and
/// skipped-vocabulary warnings are visible.
pub fn init_logging(disable: bool) {
    use tracing_subscriber::EnvFilter;

    if disable {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Where the text to tokenize comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource<'a> {
    Prompt(&'a str),
    File(&'a Path),
    Stdin,
}

impl<'a> InputSource<'a> {
    /// Pick the source from the CLI flags. A prompt wins over a file, and a
    /// file over stdin.
    pub fn select(
        prompt: Option<&'a str>,
        file: Option<&'a Path>,
        use_stdin: bool,
    ) -> Result<Self, TokenizerError> {
        match (prompt, file, use_stdin) {
            (Some(text), _, _) => Ok(Self::Prompt(text)),
            (None, Some(path), _) => Ok(Self::File(path)),
            (None, None, true) => Ok(Self::Stdin),
            (None, None, false) => Err(TokenizerError::NoInput),
        }
    }

    /// Read the whole input. File errors carry the offending path.
    pub fn read(self) -> Result<String, TokenizerError> {
        match self {
            Self::Prompt(text) => Ok(text.to_string()),
            Self::File(path) => std::fs::read_to_string(path).map_err(|e| {
                TokenizerError::Io(io::Error::new(
                    e.kind(),
                    format!("{}: {}", path.display(), e),
                ))
            }),
            Self::Stdin => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

/// Read input text from one of: prompt string, file path, or stdin.
pub fn read_input(
    prompt: Option<&str>,
    file: Option<&Path>,
    use_stdin: bool,
) -> Result<String, TokenizerError> {
    InputSource::select(prompt, file, use_stdin)?.read()
}
