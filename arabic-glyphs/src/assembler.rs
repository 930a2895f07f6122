//! Line assembly
//!
//! Splits a line into space-delimited words, shapes the Arabic spans of each
//! word, reverses the word order so the line reads right to left when drawn
//! left to right, and swaps Western digits for Arabic-Indic ones.

use crate::error::Result;
use crate::segmenter::find_runs;
use crate::shaper::shape;
use crate::table::ShapingTable;
use log::debug;

const ARABIC_INDIC_ZERO: u32 = 0x0660;

/// Full pipeline for one line: shape, reorder words, localize digits.
pub fn process(table: &ShapingTable, text: &str) -> Result<String> {
    Ok(localize_digits(&reorder(table, text)?))
}

/// [`process`] without the digit substitution.
pub fn reorder(table: &ShapingTable, text: &str) -> Result<String> {
    let mut words = text
        .split(' ')
        .map(|word| shape_word(table, word))
        .collect::<Result<Vec<_>>>()?;
    debug!("reorder: {} words", words.len());
    words.reverse();
    Ok(words.join(" "))
}

/// Apply [`process`] to every `\n`-separated line, keeping line order.
pub fn process_lines(table: &ShapingTable, text: &str) -> Result<String> {
    let lines = text
        .split('\n')
        .map(|line| process(table, line))
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Rebuild one word from its alternating Arabic and non-Arabic spans.
fn shape_word(table: &ShapingTable, word: &str) -> Result<String> {
    let offsets = find_runs(word);
    if offsets.is_empty() {
        return Ok(word.to_string());
    }

    let mut out = String::with_capacity(word.len() * 2);
    let mut cursor = 0;
    for pair in offsets.chunks_exact(2) {
        out.push_str(&word[cursor..pair[0]]);
        out.push_str(&shape(table, &word[pair[0]..pair[1]])?);
        cursor = pair[1];
    }
    out.push_str(&word[cursor..]);
    Ok(out)
}

/// Replace ASCII digits with Arabic-Indic digits.
pub fn localize_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) if ch.is_ascii_digit() => char::from_u32(ARABIC_INDIC_ZERO + d).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}
