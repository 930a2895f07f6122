//! Contextual shaping of one Arabic run
//!
//! Converts a run in logical order into presentation-form codepoints in
//! visual order. The run is walked from its last character to its first;
//! each letter picks its form from the letters around it in logical order,
//! looking past combining marks.

use crate::entity;
use crate::error::{Result, ShapeError};
use crate::segmenter::is_presentation_form;
use crate::table::{GlyphForm, ShapingTable};
use log::trace;

/// How many combining marks may sit between two letters that still join.
const MAX_STACKED_MARKS: usize = 3;

const MIRRORED: [(char, char); 8] = [
    (')', '('),
    (']', '['),
    ('>', '<'),
    ('}', '{'),
    ('(', ')'),
    ('[', ']'),
    ('<', '>'),
    ('{', '}'),
];

fn mirror(ch: char) -> Option<char> {
    MIRRORED
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|&(_, to)| to)
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '\u{0660}'..='\u{0669}' | '\u{06F0}'..='\u{06F9}')
}

/// Logical neighbours of a position, skipping combining marks.
struct Neighbours<'a> {
    table: &'a ShapingTable,
    chars: &'a [char],
}

impl Neighbours<'_> {
    fn prev_base(&self, i: usize) -> Option<char> {
        self.chars[..i]
            .iter()
            .rev()
            .take(MAX_STACKED_MARKS + 1)
            .copied()
            .find(|&c| !self.table.is_diacritic(c))
    }

    fn next_base(&self, i: usize) -> Option<char> {
        self.chars[i + 1..]
            .iter()
            .take(MAX_STACKED_MARKS + 1)
            .copied()
            .find(|&c| !self.table.is_diacritic(c))
    }

    /// The letter before `i` reaches forward and joins onto it.
    fn joined_from_prev(&self, i: usize) -> bool {
        self.prev_base(i)
            .map_or(false, |prev| self.table.links_to_prev(prev))
    }

    /// The letter after `i` accepts a join from it.
    fn joins_next(&self, i: usize) -> bool {
        self.next_base(i)
            .map_or(false, |next| self.table.links_to_next(next))
    }
}

fn push_glyph(out: &mut String, ch: char) {
    if ch.is_ascii() {
        out.push(ch);
    } else {
        entity::push_reference(out, ch);
    }
}

fn flush_numeral(out: &mut String, numeral: &mut Vec<char>) {
    // Collected backwards, written back in reading order.
    for &digit in numeral.iter().rev() {
        push_glyph(out, digit);
    }
    numeral.clear();
}

/// Shape one run of Arabic text into its visual-order glyph stream.
pub fn shape(table: &ShapingTable, run: &str) -> Result<String> {
    let chars: Vec<char> = run.chars().collect();
    let around = Neighbours {
        table,
        chars: &chars,
    };

    let mut glyphs = String::with_capacity(run.len() * 4);
    let mut numeral = Vec::new();

    for i in (0..chars.len()).rev() {
        let ch = chars[i];

        if is_digit(ch) {
            numeral.push(ch);
            continue;
        }
        flush_numeral(&mut glyphs, &mut numeral);

        if let Some(mirrored) = mirror(ch) {
            glyphs.push(mirrored);
            continue;
        }

        if ch.is_ascii() {
            glyphs.push(ch);
            continue;
        }

        // Already shaped: kept as is, and never joins its neighbours.
        if is_presentation_form(ch) {
            push_glyph(&mut glyphs, ch);
            continue;
        }

        if table.is_diacritic(ch) {
            shape_mark(&around, i, &mut glyphs);
            continue;
        }

        // Second half of a ligature: emitted together with the first half.
        if around
            .prev_base(i)
            .map_or(false, |prev| table.ligature(prev, ch).is_some())
        {
            continue;
        }

        if let Some(ligature) = around
            .next_base(i)
            .and_then(|next| table.ligature(ch, next))
        {
            let glyph = if around.joined_from_prev(i) {
                ligature.linked
            } else {
                ligature.plain
            };
            push_glyph(&mut glyphs, glyph);
            continue;
        }

        let entry = table
            .entry(ch)
            .ok_or(ShapeError::MissingShapingEntry { letter: ch, offset: i })?;
        let form = GlyphForm::from_links(around.joined_from_prev(i), around.joins_next(i));
        push_glyph(&mut glyphs, entry.form(form));
    }
    flush_numeral(&mut glyphs, &mut numeral);

    trace!("shaped run of {} chars", chars.len());
    entity::decode(&glyphs, &["&"])
}

/// Index of the mark a SHADDA at `i` merges with: the mark after it, or
/// failing that a mark right before it that no other SHADDA has claimed.
fn shadda_partner(around: &Neighbours<'_>, i: usize) -> Option<usize> {
    let table = around.table;
    let chars = around.chars;
    let mergeable = |j: usize| table.shadda_ligature(chars[j]).is_some();

    if i + 1 < chars.len() && mergeable(i + 1) {
        return Some(i + 1);
    }
    let claimed_before = i >= 2 && table.is_shadda(chars[i - 2]);
    if i > 0 && mergeable(i - 1) && !claimed_before {
        return Some(i - 1);
    }
    None
}

fn shape_mark(around: &Neighbours<'_>, i: usize, glyphs: &mut String) {
    let table = around.table;
    let chars = around.chars;
    let ch = chars[i];

    if table.is_shadda(ch) {
        let merged = shadda_partner(around, i).and_then(|j| table.shadda_ligature(chars[j]));
        match merged {
            Some(ligature) => {
                let medial = around.joined_from_prev(i) && around.joins_next(i);
                let glyph = match ligature.medial {
                    Some(medial_form) if medial => medial_form,
                    _ => ligature.plain,
                };
                push_glyph(glyphs, glyph);
            }
            None => push_glyph(glyphs, ch),
        }
        return;
    }

    // Folded into the neighbouring shadda ligature.
    let claimed_by = |s: usize| table.is_shadda(chars[s]) && shadda_partner(around, s) == Some(i);
    if (i > 0 && claimed_by(i - 1)) || (i + 1 < chars.len() && claimed_by(i + 1)) {
        return;
    }
    push_glyph(glyphs, ch);
}
