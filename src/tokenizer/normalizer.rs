//! Text normalization applied before pre-tokenization.
//!
//! Four stages run in a fixed order, each enabled by its own config flag:
//!
//! 1. [`clean_text`]: drop NUL, U+FFFD, control and format characters; collapse
//!    whitespace runs to a single ASCII space.
//! 2. [`lowercase`]: per-codepoint Unicode lowercase mapping.
//! 3. [`strip_accents`]: NFD, remove combining marks, NFC.
//! 4. [`pad_cjk_chars`]: put spaces around CJK ideographs.
//!
//! Every stage works on `char`s, never on bytes.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::TokenizerConfig;

/// Configured normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    pub clean_text: bool,
    pub lowercase: bool,
    pub strip_accents: bool,
    pub handle_chinese_chars: bool,
}

impl Normalizer {
    pub fn from_config(config: &TokenizerConfig) -> Self {
        Self {
            clean_text: config.clean_text,
            lowercase: config.to_lowercase,
            strip_accents: config.strip_accents,
            handle_chinese_chars: config.handle_chinese_chars,
        }
    }

    /// Run the enabled stages over `text`.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = text.to_string();
        if self.clean_text {
            out = clean_text(&out);
        }
        if self.lowercase {
            out = lowercase(&out);
        }
        if self.strip_accents {
            out = strip_accents(&out);
        }
        if self.handle_chinese_chars {
            out = pad_cjk_chars(&out);
        }
        out
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&TokenizerConfig::default())
    }
}

/// Remove invalid and control characters and collapse whitespace.
///
/// Whitespace is checked before control characters, so `\t`, `\n`, `\r` and
/// U+0085 become spaces rather than being dropped: `"hello\nworld"` cleans to
/// `"hello world"`, not `"helloworld"` as a control-first filter would give.
/// A removed character between two whitespace characters does not break their
/// run.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut last_was_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
                last_was_space = true;
            }
        } else if ch == '\0' || ch == char::REPLACEMENT_CHARACTER || is_control(ch) {
            continue;
        } else {
            cleaned.push(ch);
            last_was_space = false;
        }
    }

    cleaned
}

/// Lowercase every codepoint independently.
pub fn lowercase(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Decompose, drop combining marks (General Category M), recompose.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Surround each CJK ideograph with spaces so it becomes its own pre-token.
pub fn pad_cjk_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if is_cjk_char(ch) {
            out.push(' ');
            out.push(ch);
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Character classification helpers
// ---------------------------------------------------------------------------

/// Control (Cc) or format (Cf) character.
pub(crate) fn is_control(ch: char) -> bool {
    ch.is_control() || is_format(ch)
}

/// Unicode General Category "Cf" (Format).
fn is_format(ch: char) -> bool {
    use std::ops::RangeInclusive;

    const FORMAT_RANGES: &[RangeInclusive<u32>] = &[
        0x00AD..=0x00AD, // Soft hyphen
        0x0600..=0x0605, // Arabic number signs
        0x061C..=0x061C, // Arabic letter mark
        0x06DD..=0x06DD,
        0x070F..=0x070F, // Syriac abbreviation mark
        0x0890..=0x0891,
        0x08E2..=0x08E2,
        0x180E..=0x180E, // Mongolian vowel separator
        0x200B..=0x200F, // Zero-width space, ZWNJ, ZWJ, LRM, RLM
        0x202A..=0x202E, // Bidi embeddings and overrides
        0x2060..=0x2064, // Word joiner, invisible operators
        0x2066..=0x206F, // Bidi isolates, deprecated format chars
        0xFEFF..=0xFEFF, // Byte order mark
        0xFFF9..=0xFFFB, // Interlinear annotation
        0x110BD..=0x110BD,
        0x110CD..=0x110CD,
        0x13430..=0x1343F, // Egyptian hieroglyph format controls
        0x1BCA0..=0x1BCA3, // Shorthand format controls
        0x1D173..=0x1D17A, // Musical symbol format controls
        0xE0001..=0xE0001, // Language tag
        0xE0020..=0xE007F, // Tag characters
    ];

    let cp = ch as u32;
    FORMAT_RANGES.iter().any(|range| range.contains(&cp))
}

/// CJK Unified Ideographs, as BERT defines them.
///
/// Hangul, Hiragana and Katakana are deliberately excluded; they are written
/// with spaces and are handled like any other script.
pub(crate) fn is_cjk_char(ch: char) -> bool {
    let cp = ch as u32;
    (0x4E00..=0x9FFF).contains(&cp)
        || (0x3400..=0x4DBF).contains(&cp)
        || (0x20000..=0x2A6DF).contains(&cp)
        || (0x2A700..=0x2B73F).contains(&cp)
        || (0x2B740..=0x2B81F).contains(&cp)
        || (0x2B820..=0x2CEAF).contains(&cp)
        || (0xF900..=0xFAFF).contains(&cp)
        || (0x2F800..=0x2FA1F).contains(&cp)
}
