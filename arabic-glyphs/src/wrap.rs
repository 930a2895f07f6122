//! Space-aware soft wrapping
//!
//! Lengths are counted in extended grapheme clusters, so a letter and the
//! marks stacked on it count as one character.

use log::warn;
use unicode_segmentation::UnicodeSegmentation;

/// Split `text` into lines of at most `max_chars_per_line` characters,
/// breaking at the last space that fits. A window without any space is cut
/// hard at the limit.
pub fn wrap(text: &str, max_chars_per_line: usize) -> Vec<String> {
    let max = max_chars_per_line.max(1);
    let clusters: Vec<&str> = text.graphemes(true).collect();
    let mut lines = Vec::new();
    let mut start = 0;

    loop {
        while start < clusters.len() && clusters[start].trim().is_empty() {
            start += 1;
        }
        if clusters.len() - start <= max {
            break;
        }

        let cut = match soft_break(&clusters[start..], max) {
            Some(pos) => pos,
            None => {
                warn!("wrap: no space within {} characters, cutting a word", max);
                max
            }
        };

        let line = clusters[start..start + cut].concat();
        lines.push(line.trim().to_string());
        start += cut;
    }

    let last = clusters[start..].concat();
    let last = last.trim();
    if !last.is_empty() || lines.is_empty() {
        lines.push(last.to_string());
    }
    lines
}

// Clusters that fit before a space, for a line of at most `max` clusters.
// A space right after a full window also counts.
fn soft_break(clusters: &[&str], max: usize) -> Option<usize> {
    if clusters.get(max) == Some(&" ") {
        return Some(max);
    }
    clusters[..max].iter().rposition(|g| *g == " ")
}
