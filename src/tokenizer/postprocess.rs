//! Sequence assembly: truncation, `[CLS]`/`[SEP]` insertion, and padding.

use tracing::warn;

use super::{SpecialTokenIds, Token, TokenRole, TokenSequence, Truncation};
use crate::error::TokenizerError;

/// Turns a flat list of content tokens into a fixed-length sequence.
#[derive(Debug, Clone)]
pub struct SequenceAssembler {
    max_length: usize,
    special_ids: SpecialTokenIds,
}

impl SequenceAssembler {
    /// Fails if `max_length` cannot hold `[CLS]` and `[SEP]`.
    pub fn new(max_length: usize, special_ids: SpecialTokenIds) -> Result<Self, TokenizerError> {
        if max_length < 2 {
            return Err(TokenizerError::InvalidConfig(format!(
                "max_length must be at least 2, got {}",
                max_length
            )));
        }
        Ok(Self {
            max_length,
            special_ids,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Content tokens that fit between `[CLS]` and `[SEP]`.
    pub fn capacity(&self) -> usize {
        self.max_length - 2
    }

    /// Produce exactly `max_length` tokens from `content`.
    ///
    /// Content beyond [`capacity`](Self::capacity) is dropped from the tail and
    /// recorded as a [`Truncation`].
    pub fn assemble(&self, mut content: Vec<Token>) -> TokenSequence {
        let capacity = self.capacity();
        let truncation = if content.len() > capacity {
            let original_len = content.len();
            content.truncate(capacity);
            warn!(
                original_len,
                kept = capacity,
                max_length = self.max_length,
                "Tokens truncated"
            );
            Some(Truncation {
                original_len,
                kept: capacity,
            })
        } else {
            None
        };

        let mut tokens = Vec::with_capacity(self.max_length);
        tokens.push(Token::special(
            self.special_ids.cls,
            TokenRole::Classification,
        ));
        tokens.append(&mut content);
        tokens.push(Token::special(self.special_ids.sep, TokenRole::Separator));
        tokens.resize(
            self.max_length,
            Token::special(self.special_ids.pad, TokenRole::Padding),
        );

        TokenSequence::new(tokens, truncation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const IDS: SpecialTokenIds = SpecialTokenIds {
        pad: 0,
        unk: 100,
        cls: 101,
        sep: 102,
        mask: Some(103),
    };

    fn content(n: usize) -> Vec<Token> {
        (0..n)
            .map(|i| Token::subword(1000 + i as u32, format!("w{}", i)))
            .collect()
    }

    #[test]
    fn test_rejects_max_length_below_two() {
        assert!(SequenceAssembler::new(0, IDS).is_err());
        assert!(SequenceAssembler::new(1, IDS).is_err());
        assert!(SequenceAssembler::new(2, IDS).is_ok());
    }

    #[test]
    fn test_empty_content_is_cls_sep_padding() {
        let asm = SequenceAssembler::new(6, IDS).unwrap();
        let seq = asm.assemble(Vec::new());
        assert_eq!(seq.ids(), vec![101, 102, 0, 0, 0, 0]);
        assert_eq!(seq.attention_mask(), vec![1, 1, 0, 0, 0, 0]);
        assert_eq!(seq.segment_ids(), vec![0; 6]);
        assert_eq!(seq.tokens()[0].role, TokenRole::Classification);
        assert_eq!(seq.tokens()[1].role, TokenRole::Separator);
        assert!(seq.tokens()[2..].iter().all(|t| t.role == TokenRole::Padding));
        assert!(!seq.is_truncated());
    }

    #[test]
    fn test_pads_to_max_length() {
        let asm = SequenceAssembler::new(8, IDS).unwrap();
        let seq = asm.assemble(content(3));
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.ids(), vec![101, 1000, 1001, 1002, 102, 0, 0, 0]);
        assert_eq!(seq.attention_mask(), vec![1, 1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(seq.real_len(), 5);
    }

    #[test]
    fn test_exact_fit_no_padding_no_truncation() {
        let asm = SequenceAssembler::new(5, IDS).unwrap();
        let seq = asm.assemble(content(3));
        assert_eq!(seq.ids(), vec![101, 1000, 1001, 1002, 102]);
        assert!(!seq.is_truncated());
    }

    #[test]
    fn test_truncates_keeping_earliest() {
        let asm = SequenceAssembler::new(5, IDS).unwrap();
        let seq = asm.assemble(content(4));
        assert_eq!(seq.ids(), vec![101, 1000, 1001, 1002, 102]);
        assert_eq!(
            seq.truncation(),
            Some(Truncation {
                original_len: 4,
                kept: 3
            })
        );
    }

    #[test]
    fn test_truncates_large_input() {
        let asm = SequenceAssembler::new(4, IDS).unwrap();
        let seq = asm.assemble(content(1000));
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.ids(), vec![101, 1000, 1001, 102]);
        assert_eq!(seq.truncation().unwrap().original_len, 1000);
    }

    #[test]
    fn test_minimum_length_drops_all_content() {
        let asm = SequenceAssembler::new(2, IDS).unwrap();
        assert_eq!(asm.capacity(), 0);
        let seq = asm.assemble(content(2));
        assert_eq!(seq.ids(), vec![101, 102]);
        assert!(seq.is_truncated());

        let seq = asm.assemble(Vec::new());
        assert_eq!(seq.ids(), vec![101, 102]);
        assert!(!seq.is_truncated());
    }

    // -----------------------------------------------------------------------
    // Truncation warning
    // -----------------------------------------------------------------------

    /// Shared in-memory sink for formatted log lines.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn assemble_with_logs(asm: &SequenceAssembler, n: usize) -> (TokenSequence, String) {
        let buf = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buf.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let seq = tracing::subscriber::with_default(subscriber, || asm.assemble(content(n)));
        let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        (seq, logs)
    }

    #[test]
    fn test_truncation_emits_warning() {
        let asm = SequenceAssembler::new(5, IDS).unwrap();
        let (seq, logs) = assemble_with_logs(&asm, 4);
        assert!(seq.is_truncated());
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("Tokens truncated"), "logs: {}", logs);
        assert!(logs.contains("original_len=4"), "logs: {}", logs);
        assert!(logs.contains("kept=3"), "logs: {}", logs);
    }

    #[test]
    fn test_no_warning_when_content_fits() {
        let asm = SequenceAssembler::new(5, IDS).unwrap();
        let (seq, logs) = assemble_with_logs(&asm, 3);
        assert!(!seq.is_truncated());
        assert!(logs.is_empty(), "logs: {}", logs);
    }
}
