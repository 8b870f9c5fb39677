//! Whitespace and punctuation pre-tokenization.
//!
//! Whitespace separates pre-tokens and is discarded. Every punctuation
//! character is emitted as its own pre-token, so `"!!"` yields `"!"`, `"!"`.
//! Any other maximal run of characters is one word.

use std::iter::FusedIterator;

/// Iterator over the pre-tokens of a normalized string.
///
/// Yields borrowed slices of the input in order. Holds no state beyond its
/// position, so calling [`split_words`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct PreTokens<'a> {
    text: &'a str,
    pos: usize,
}

/// Split `text` on whitespace and punctuation.
pub fn split_words(text: &str) -> PreTokens<'_> {
    PreTokens { text, pos: 0 }
}

impl<'a> Iterator for PreTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = &self.text[self.pos..];
        let skipped = rest.len() - rest.trim_start_matches(char::is_whitespace).len();
        self.pos += skipped;

        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;
        let start = self.pos;

        if is_punctuation(first) {
            self.pos += first.len_utf8();
            return Some(&self.text[start..self.pos]);
        }

        let len = rest
            .char_indices()
            .find(|&(_, ch)| ch.is_whitespace() || is_punctuation(ch))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        Some(&self.text[start..self.pos])
    }
}

impl FusedIterator for PreTokens<'_> {}

/// Check if a character is punctuation.
///
/// All ASCII non-alphanumeric printable characters count, matching BERT (so
/// `$`, `+`, `^` are split off even though Unicode calls them symbols), plus
/// the Unicode punctuation categories (Pc, Pd, Ps, Pe, Pi, Pf, Po) in the
/// blocks that occur in practice.
pub fn is_punctuation(ch: char) -> bool {
    let cp = ch as u32;
    if (0x21..=0x2F).contains(&cp)       // ! " # $ % & ' ( ) * + , - . /
        || (0x3A..=0x40).contains(&cp)    // : ; < = > ? @
        || (0x5B..=0x60).contains(&cp)    // [ \ ] ^ _ `
        || (0x7B..=0x7E).contains(&cp)    // { | } ~
    {
        return true;
    }

    if ch.is_ascii() {
        return false;
    }

    unicode_general_category_p(cp)
}

/// Unicode General Category "P" (Punctuation) for non-ASCII chars.
fn unicode_general_category_p(cp: u32) -> bool {
    use std::ops::RangeInclusive;

    const PUNCTUATION_RANGES: &[RangeInclusive<u32>] = &[
        0x00A1..=0x00A1, // ¡
        0x00A7..=0x00A7, // §
        0x00AB..=0x00AB, // «
        0x00B6..=0x00B7, // ¶ ·
        0x00BB..=0x00BB, // »
        0x00BF..=0x00BF, // ¿
        0x037E..=0x037E, // Greek question mark
        0x0387..=0x0387, // Greek ano teleia
        0x055A..=0x055F, // Armenian
        0x0589..=0x058A,
        0x05BE..=0x05BE, // Hebrew
        0x05C0..=0x05C0,
        0x05C3..=0x05C3,
        0x05C6..=0x05C6,
        0x05F3..=0x05F4,
        0x0609..=0x060A, // Arabic
        0x060C..=0x060D,
        0x061B..=0x061B,
        0x061D..=0x061F,
        0x066A..=0x066D,
        0x06D4..=0x06D4,
        0x0964..=0x0965, // Devanagari danda
        0x0970..=0x0970,
        0x0E4F..=0x0E4F, // Thai
        0x0E5A..=0x0E5B,
        0x0F04..=0x0F12, // Tibetan
        0x0F14..=0x0F14,
        0x0F3A..=0x0F3D,
        0x104A..=0x104F, // Myanmar
        0x10FB..=0x10FB, // Georgian
        0x1360..=0x1368, // Ethiopic
        0x166E..=0x166E, // Canadian syllabics
        0x169B..=0x169C, // Ogham
        0x16EB..=0x16ED, // Runic
        0x17D4..=0x17D6, // Khmer
        0x17D8..=0x17DA,
        0x1800..=0x180A, // Mongolian
        0x2010..=0x2027, // General Punctuation: dashes, quotes, bullets
        0x2030..=0x2043,
        0x2045..=0x2051,
        0x2053..=0x205E,
        0x207D..=0x207E, // Superscript parentheses
        0x208D..=0x208E, // Subscript parentheses
        0x2308..=0x230B, // Ceilings and floors
        0x2329..=0x232A, // Angle brackets
        0x2768..=0x2775, // Ornamental brackets
        0x27C5..=0x27C6,
        0x27E6..=0x27EF, // Mathematical brackets
        0x2983..=0x2998,
        0x29D8..=0x29DB,
        0x29FC..=0x29FD,
        0x2CF9..=0x2CFC, // Coptic
        0x2CFE..=0x2CFF,
        0x2E00..=0x2E2E, // Supplemental Punctuation
        0x2E30..=0x2E4F,
        0x2E52..=0x2E5D,
        0x3001..=0x3003, // CJK Symbols and Punctuation
        0x3008..=0x3011,
        0x3014..=0x301F,
        0x3030..=0x3030,
        0x303D..=0x303D,
        0x30A0..=0x30A0, // Katakana double hyphen
        0x30FB..=0x30FB, // Katakana middle dot
        0xA4FE..=0xA4FF, // Lisu
        0xA60D..=0xA60F, // Vai
        0xA673..=0xA673,
        0xA67E..=0xA67E,
        0xA6F2..=0xA6F7, // Bamum
        0xA874..=0xA877, // Phags-pa
        0xA8CE..=0xA8CF, // Saurashtra
        0xA8F8..=0xA8FA,
        0xA8FC..=0xA8FC,
        0xA92E..=0xA92F,
        0xA95F..=0xA95F,
        0xA9C1..=0xA9CD, // Javanese
        0xA9DE..=0xA9DF,
        0xAA5C..=0xAA5F, // Cham
        0xAADE..=0xAADF,
        0xAAF0..=0xAAF1,
        0xABEB..=0xABEB,
        0xFD3E..=0xFD3F, // Ornate parentheses
        0xFE10..=0xFE19, // Vertical forms
        0xFE30..=0xFE52, // CJK Compatibility Forms
        0xFE54..=0xFE61, // Small Form Variants
        0xFE63..=0xFE63,
        0xFE68..=0xFE68,
        0xFE6A..=0xFE6B,
        0xFF01..=0xFF03, // Fullwidth punctuation
        0xFF05..=0xFF0A,
        0xFF0C..=0xFF0F,
        0xFF1A..=0xFF1B,
        0xFF1F..=0xFF20,
        0xFF3B..=0xFF3D,
        0xFF3F..=0xFF3F,
        0xFF5B..=0xFF5B,
        0xFF5D..=0xFF5D,
        0xFF5F..=0xFF65,
    ];

    PUNCTUATION_RANGES.iter().any(|range| range.contains(&cp))
}
