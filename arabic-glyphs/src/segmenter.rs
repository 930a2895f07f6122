//! Arabic run segmentation
//!
//! Finds the byte ranges of Arabic script inside mixed text. Markup between
//! `<` and `>` is skipped, the ASCII band `!`..`:` (punctuation and digits)
//! is neutral, trailing whitespace is kept out of a run and an opening
//! parenthesis right before the first Arabic character is pulled into it.

use crate::error::{Result, ShapeError};
use log::trace;

/// One maximal Arabic span, as a half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end: usize,
}

impl Run {
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Whether `ch` belongs to one of the Arabic blocks: Arabic, Arabic
/// Supplement, Arabic Extended-A and Arabic Presentation Forms A and B.
pub fn is_arabic(ch: char) -> bool {
    matches!(
        ch as u32,
        0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF
    )
}

/// Whether `ch` is an already shaped glyph from Arabic Presentation Forms A
/// or B.
pub fn is_presentation_form(ch: char) -> bool {
    matches!(ch as u32, 0xFB50..=0xFDFF | 0xFE70..=0xFEFF)
}

fn is_neutral(ch: char) -> bool {
    ('!'..=':').contains(&ch)
}

/// Offsets of all Arabic runs, alternating start and end, ascending.
pub fn find_runs(text: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut in_tag = false;
    let mut in_run = false;

    let mut chars = text.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if ch == '<' && chars.peek().map_or(true, |&(_, next)| next != ' ') {
            in_tag = true;
        } else if in_tag && ch == '>' {
            in_tag = false;
        } else if in_tag {
            continue;
        }

        if is_neutral(ch) {
            continue;
        }

        if is_arabic(ch) {
            if !in_run {
                in_run = true;
                positions.push(run_start(text, offset));
            }
            continue;
        }

        if in_run && !ch.is_ascii_whitespace() {
            in_run = false;
            positions.push(trimmed_end(text, offset));
        }
    }

    if in_run {
        positions.push(text.len());
    }

    trace!("find_runs: {} runs in {} bytes", positions.len() / 2, text.len());
    positions
}

/// Same as [`find_runs`] over raw bytes, rejecting anything that is not UTF-8.
pub fn find_runs_bytes(bytes: &[u8]) -> Result<Vec<usize>> {
    let text = std::str::from_utf8(bytes).map_err(|e| ShapeError::MalformedInput {
        offset: e.valid_up_to(),
        reason: match e.error_len() {
            None => "truncated multi-byte sequence".to_string(),
            Some(len) => format!("invalid {}-byte UTF-8 sequence", len),
        },
    })?;
    Ok(find_runs(text))
}

/// Pair up the flat offsets of [`find_runs`].
pub fn runs(text: &str) -> Vec<Run> {
    find_runs(text)
        .chunks_exact(2)
        .map(|pair| Run {
            start: pair[0],
            end: pair[1],
        })
        .collect()
}

// Start of a run whose first Arabic character sits at `offset`, widened to an
// opening parenthesis separated from it only by whitespace.
fn run_start(text: &str, offset: usize) -> usize {
    let before = text[..offset].trim_end_matches(|c: char| c.is_ascii_whitespace());
    if before.ends_with('(') {
        before.len() - 1
    } else {
        offset
    }
}

fn trimmed_end(text: &str, offset: usize) -> usize {
    text[..offset]
        .trim_end_matches(|c: char| c.is_ascii_whitespace())
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_arabic_sentence_is_one_run() {
        let text = "هذا النص العربي هنا 2022";
        assert_eq!(find_runs(text), vec![0, 40]);
    }

    #[test]
    fn latin_word_splits_runs() {
        let text = "هذا النص  text العربي هنا 2022";
        let offsets = find_runs(text);
        assert_eq!(offsets, vec![0, 15, 22, 46]);
        assert_eq!(&text[0..15], "هذا النص");
        assert_eq!(&text[22..46], "العربي هنا 2022");
    }

    #[test]
    fn opening_parenthesis_joins_the_run() {
        let text = "text (عربي) text";
        let found = runs(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_str(text), "(عربي)");

        let spaced = "see (  عربي";
        assert_eq!(runs(spaced)[0].as_str(spaced), "(  عربي");
    }

    #[test]
    fn markup_is_skipped() {
        let text = "<b class=\"x\">عربي</b>";
        let found = runs(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_str(text), "عربي");
    }

    #[test]
    fn less_than_followed_by_space_is_not_a_tag() {
        let text = "a < عربي";
        assert_eq!(runs(text)[0].as_str(text), "عربي");
    }

    #[test]
    fn presentation_forms_are_arabic() {
        assert!(is_presentation_form('\u{FEF3}'));
        assert!(is_presentation_form('\u{FC60}'));
        assert!(!is_presentation_form('\u{064A}'));
        assert_eq!(find_runs("x \u{FEF0}\u{FE9F} y"), vec![2, 8]);
    }

    #[test]
    fn trailing_spaces_are_trimmed_before_latin() {
        let text = "عربي   latin";
        assert_eq!(find_runs(text), vec![0, 8]);
    }

    #[test]
    fn neutral_punctuation_stays_inside() {
        let text = "عربي - عربي, 12 x";
        let found = runs(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_str(text), "عربي - عربي, 12");
    }

    #[test]
    fn no_arabic_no_runs() {
        assert!(find_runs("plain ascii text").is_empty());
        assert!(find_runs("").is_empty());
    }

    #[test]
    fn presentation_forms_count_as_arabic() {
        let text = "x \u{FEFB}\u{FE8F} y";
        assert_eq!(runs(text)[0].as_str(text), "\u{FEFB}\u{FE8F}");
        assert!(is_arabic('\u{06CC}'));
        assert!(!is_arabic('é'));
    }

    #[test]
    fn truncated_utf8_is_rejected() {
        let mut bytes = "عربي".as_bytes().to_vec();
        bytes.pop();
        let err = find_runs_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ShapeError::MalformedInput { offset: 6, .. }));

        assert_eq!(find_runs_bytes("عربي".as_bytes()).unwrap(), vec![0, 8]);
    }
}
