//! Property-based tests for WordPiece tokenization.
//!
//! These tests use proptest to check the structural guarantees of every
//! tokenized sequence: fixed length, special token placement, attention mask
//! shape, and the all-or-nothing behaviour of word segmentation.

use proptest::prelude::*;
use strata_wordpiece::{TokenRole, Tokenizer, TokenizerConfig, WordPieceTokenizer};

const SPECIALS: [&str; 5] = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]"];

/// Specials, every lowercase letter, and every `##` letter continuation.
fn letter_vocab(with_continuations: bool) -> Vec<String> {
    let mut tokens: Vec<String> = SPECIALS.iter().map(|s| s.to_string()).collect();
    tokens.extend(('a'..='z').map(|c| c.to_string()));
    if with_continuations {
        tokens.extend(('a'..='z').map(|c| format!("##{}", c)));
    }
    tokens
}

fn tokenizer_with(config: TokenizerConfig, with_continuations: bool) -> WordPieceTokenizer {
    let entries = letter_vocab(with_continuations).into_iter().zip(0u32..);
    WordPieceTokenizer::new(config, entries).unwrap()
}

fn config_with_length(max_length: usize) -> TokenizerConfig {
    TokenizerConfig {
        max_length,
        ..TokenizerConfig::default()
    }
}

/// Strategy for lowercase ASCII words
fn word_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('a', 'z'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every output has exactly max_length tokens, for any input text
    #[test]
    fn test_output_length_is_max_length(text in any::<String>(), max_length in 2usize..64) {
        let tokenizer = tokenizer_with(config_with_length(max_length), true);
        let seq = tokenizer.tokenize(&text);
        prop_assert_eq!(seq.len(), max_length);
        prop_assert_eq!(seq.ids().len(), max_length);
        prop_assert_eq!(seq.attention_mask().len(), max_length);
        prop_assert_eq!(seq.segment_ids().len(), max_length);
    }

    /// [CLS] opens the sequence and no padding precedes [SEP]
    #[test]
    fn test_special_token_placement(text in any::<String>(), max_length in 2usize..64) {
        let tokenizer = tokenizer_with(config_with_length(max_length), true);
        let seq = tokenizer.tokenize(&text);
        let tokens = seq.tokens();

        prop_assert_eq!(tokens[0].role, TokenRole::Classification);

        let sep = tokens
            .iter()
            .position(|t| t.role == TokenRole::Separator)
            .expect("sequence must contain [SEP]");
        prop_assert!(tokens[..sep].iter().all(|t| t.role != TokenRole::Padding));
        prop_assert!(tokens[sep + 1..].iter().all(|t| t.role == TokenRole::Padding));
    }

    /// Mask is 1 up to and including [SEP], 0 afterwards
    #[test]
    fn test_attention_mask_shape(text in "[a-z ,.!]{0,200}", max_length in 2usize..32) {
        let tokenizer = tokenizer_with(config_with_length(max_length), true);
        let seq = tokenizer.tokenize(&text);
        let real = seq.real_len();

        prop_assert!(real >= 2);
        prop_assert_eq!(seq.tokens()[real - 1].role, TokenRole::Separator);
        for (i, &m) in seq.attention_mask().iter().enumerate() {
            prop_assert_eq!(m, u8::from(i < real));
        }
        prop_assert!(seq.segment_ids().iter().all(|&s| s == 0));
    }

    /// Non-unknown pieces of a word concatenate back to the word
    #[test]
    fn test_subwords_reconstruct_word(word in word_strategy(1..40)) {
        let tokenizer = tokenizer_with(TokenizerConfig::default(), true);
        let pieces = tokenizer.segment_word(&word);

        prop_assert!(pieces.iter().all(|t| t.role == TokenRole::None));
        let rebuilt: String = pieces
            .iter()
            .map(|t| t.text.trim_start_matches("##"))
            .collect();
        prop_assert_eq!(rebuilt, word);
        prop_assert!(!pieces[0].text.starts_with("##"));
        prop_assert!(pieces[1..].iter().all(|t| t.text.starts_with("##")));
    }

    /// Words at or above the character limit become a single [UNK]
    #[test]
    fn test_long_word_is_single_unknown(len in 100usize..300) {
        let tokenizer = tokenizer_with(TokenizerConfig::default(), true);
        let word = "a".repeat(len);
        let pieces = tokenizer.segment_word(&word);

        prop_assert_eq!(pieces.len(), 1);
        prop_assert_eq!(pieces[0].role, TokenRole::Unknown);
        prop_assert_eq!(pieces[0].id, 1);
    }

    /// Without continuation entries, multi-character words are unknown
    #[test]
    fn test_no_continuations_means_unknown(word in word_strategy(2..20)) {
        let tokenizer = tokenizer_with(TokenizerConfig::default(), false);
        let pieces = tokenizer.segment_word(&word);

        prop_assert_eq!(pieces.len(), 1);
        prop_assert_eq!(pieces[0].role, TokenRole::Unknown);
        prop_assert_eq!(&pieces[0].text, &word);
    }

    /// Content of max_length - 1 or more tokens is truncated to max_length - 2
    #[test]
    fn test_truncation_keeps_capacity(max_length in 2usize..32, extra in 0usize..20) {
        let tokenizer = tokenizer_with(config_with_length(max_length), true);
        let n = max_length - 1 + extra;
        let text = vec!["a"; n].join(" ");
        let seq = tokenizer.tokenize(&text);

        let truncation = seq.truncation().expect("input must be truncated");
        prop_assert_eq!(truncation.original_len, n);
        prop_assert_eq!(truncation.kept, max_length - 2);
        prop_assert_eq!(seq.len(), max_length);
        prop_assert_eq!(seq.tokens()[max_length - 1].role, TokenRole::Separator);
    }

    /// Content that fits is never flagged as truncated
    #[test]
    fn test_fitting_input_not_truncated(max_length in 3usize..32, seed in 0usize..1000) {
        let tokenizer = tokenizer_with(config_with_length(max_length), true);
        let n = seed % (max_length - 1);
        let text = vec!["b"; n].join(" ");
        let seq = tokenizer.tokenize(&text);

        prop_assert!(!seq.is_truncated());
        prop_assert_eq!(seq.real_len(), n + 2);
    }

    /// Tokenization is deterministic
    #[test]
    fn test_tokenize_is_deterministic(text in any::<String>()) {
        let tokenizer = tokenizer_with(config_with_length(48), true);
        prop_assert_eq!(tokenizer.tokenize(&text), tokenizer.tokenize(&text));
    }
}

#[test]
fn test_unaffable_scenario() {
    let entries = [
        "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "un", "##aff", "##able",
    ]
    .into_iter()
    .zip(0u32..);
    let tokenizer = WordPieceTokenizer::new(config_with_length(8), entries).unwrap();

    let seq = tokenizer.tokenize("unaffable");
    assert_eq!(seq.ids(), vec![2, 5, 6, 7, 3, 0, 0, 0]);
    assert_eq!(seq.attention_mask(), vec![1, 1, 1, 1, 1, 0, 0, 0]);
    let texts: Vec<&str> = seq.tokens()[1..4].iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["un", "##aff", "##able"]);
}

#[test]
fn test_empty_input_scenario() {
    let tokenizer = tokenizer_with(config_with_length(6), true);
    let seq = tokenizer.tokenize("");
    assert_eq!(seq.ids(), vec![2, 3, 0, 0, 0, 0]);
    assert_eq!(seq.attention_mask(), vec![1, 1, 0, 0, 0, 0]);
}
