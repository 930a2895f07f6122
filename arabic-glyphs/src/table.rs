//! Shaping table resource
//!
//! Maps every Arabic letter the shaper knows to its four presentation forms
//! and joining flags, plus the lam-alef ligatures, the set of combining marks
//! and the shadda+mark ligatures. The table is read once from JSON and is
//! immutable afterwards.

use crate::error::{Result, ShapeError};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Builtin table data, shipped with the crate.
const BUILTIN_JSON: &str = include_str!("../data/ar_glyphs.json");

/// Contextual form of a letter. The discriminant is the index into
/// [`ShapingEntry::forms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphForm {
    Isolated = 0,
    Final = 1,
    Initial = 2,
    Medial = 3,
}

impl GlyphForm {
    /// Form of a letter given whether its previous neighbour joins onto it
    /// and whether its next neighbour accepts a join from it.
    pub fn from_links(joined_from_prev: bool, joins_next: bool) -> Self {
        match (joined_from_prev, joins_next) {
            (false, false) => GlyphForm::Isolated,
            (true, false) => GlyphForm::Final,
            (false, true) => GlyphForm::Initial,
            (true, true) => GlyphForm::Medial,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Presentation forms and joining behaviour of one letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapingEntry {
    /// Isolated, final, initial, medial.
    pub forms: [char; 4],
    /// A letter placed after this one joins back to it.
    pub links_to_prev: bool,
    /// This letter accepts a join from the letter before it.
    pub links_to_next: bool,
}

impl ShapingEntry {
    pub fn form(&self, form: GlyphForm) -> char {
        self.forms[form.index()]
    }
}

/// Two-letter ligature, e.g. LAM + ALEF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LigatureEntry {
    /// Used when the letter before the pair does not join onto it.
    pub plain: char,
    /// Used when the letter before the pair joins onto it.
    pub linked: char,
}

/// SHADDA merged with the mark that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaddaLigature {
    pub plain: char,
    /// Variant for a position where both surrounding letters connect.
    pub medial: Option<char>,
}

/// Ordered set of combining marks that attach to the preceding base letter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiacriticSet {
    marks: Vec<char>,
    lookup: HashSet<char>,
}

impl DiacriticSet {
    pub fn new(marks: impl IntoIterator<Item = char>) -> Self {
        let mut set = DiacriticSet::default();
        for mark in marks {
            if set.lookup.insert(mark) {
                set.marks.push(mark);
            }
        }
        set
    }

    pub fn contains(&self, ch: char) -> bool {
        self.lookup.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// The full shaping resource consumed by the shaper.
#[derive(Debug, Clone)]
pub struct ShapingTable {
    letters: HashMap<char, ShapingEntry>,
    ligatures: HashMap<(char, char), LigatureEntry>,
    diacritics: DiacriticSet,
    shadda: char,
    shadda_ligatures: HashMap<char, ShaddaLigature>,
}

/// SHADDA, the consonant doubling mark.
pub const SHADDA: char = '\u{0651}';

// On-disk layout. Codepoints are hexadecimal strings.
#[derive(Deserialize)]
struct RawTable {
    letters: BTreeMap<String, RawEntry>,
    #[serde(default)]
    ligatures: BTreeMap<String, [String; 2]>,
    #[serde(default)]
    diacritics: Vec<String>,
    #[serde(default)]
    shadda: BTreeMap<String, RawShadda>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    forms: [String; 4],
    prev_link: bool,
    next_link: bool,
}

#[derive(Deserialize)]
struct RawShadda {
    plain: String,
    #[serde(default)]
    medial: Option<String>,
}

impl ShapingTable {
    /// Parse a table from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(json)
            .map_err(|e| ShapeError::resource(format!("invalid table JSON: {}", e)))?;

        let mut letters = HashMap::with_capacity(raw.letters.len());
        for (key, entry) in &raw.letters {
            let letter = single_char(key)?;
            let mut forms = [letter; 4];
            for (slot, hex) in forms.iter_mut().zip(entry.forms.iter()) {
                *slot = parse_codepoint(hex)?;
            }
            letters.insert(
                letter,
                ShapingEntry {
                    forms,
                    links_to_prev: entry.prev_link,
                    links_to_next: entry.next_link,
                },
            );
        }

        let mut ligatures = HashMap::with_capacity(raw.ligatures.len());
        for (key, [plain, linked]) in &raw.ligatures {
            let mut chars = key.chars();
            let pair = match (chars.next(), chars.next(), chars.next()) {
                (Some(first), Some(second), None) => (first, second),
                _ => {
                    return Err(ShapeError::resource(format!(
                        "ligature key {:?} must be exactly two letters",
                        key
                    )))
                }
            };
            ligatures.insert(
                pair,
                LigatureEntry {
                    plain: parse_codepoint(plain)?,
                    linked: parse_codepoint(linked)?,
                },
            );
        }

        let marks = raw
            .diacritics
            .iter()
            .map(|hex| parse_codepoint(hex))
            .collect::<Result<Vec<_>>>()?;
        let diacritics = DiacriticSet::new(marks);
        if diacritics.is_empty() {
            warn!("Shaping table lists no diacritics, every mark will need a letter entry");
        }

        let mut shadda_ligatures = HashMap::with_capacity(raw.shadda.len());
        for (key, lig) in &raw.shadda {
            let follower = parse_codepoint(key)?;
            let medial = match &lig.medial {
                Some(hex) => Some(parse_codepoint(hex)?),
                None => None,
            };
            shadda_ligatures.insert(
                follower,
                ShaddaLigature {
                    plain: parse_codepoint(&lig.plain)?,
                    medial,
                },
            );
        }

        debug!(
            "Loaded shaping table: {} letters, {} ligatures, {} diacritics, {} shadda ligatures",
            letters.len(),
            ligatures.len(),
            diacritics.len(),
            shadda_ligatures.len()
        );

        Ok(Self {
            letters,
            ligatures,
            diacritics,
            shadda: SHADDA,
            shadda_ligatures,
        })
    }

    /// Load a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading shaping table from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|e| {
            ShapeError::resource(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Parse the table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Process-wide, read-only copy of the builtin table.
    pub fn shared() -> Result<Arc<ShapingTable>> {
        static SHARED: OnceLock<Result<Arc<ShapingTable>>> = OnceLock::new();
        SHARED
            .get_or_init(|| Self::builtin().map(Arc::new))
            .clone()
    }

    pub fn entry(&self, letter: char) -> Option<&ShapingEntry> {
        self.letters.get(&letter)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains_key(&letter)
    }

    pub fn ligature(&self, first: char, second: char) -> Option<&LigatureEntry> {
        self.ligatures.get(&(first, second))
    }

    pub fn is_diacritic(&self, ch: char) -> bool {
        self.diacritics.contains(ch)
    }

    pub fn is_shadda(&self, ch: char) -> bool {
        ch == self.shadda
    }

    pub fn shadda_ligature(&self, follower: char) -> Option<&ShaddaLigature> {
        self.shadda_ligatures.get(&follower)
    }

    /// A letter placed after `ch` joins back to it.
    pub fn links_to_prev(&self, ch: char) -> bool {
        self.entry(ch).map_or(false, |e| e.links_to_prev)
    }

    /// `ch` accepts a join from the letter before it.
    pub fn links_to_next(&self, ch: char) -> bool {
        self.entry(ch).map_or(false, |e| e.links_to_next)
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

fn single_char(key: &str) -> Result<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ShapeError::resource(format!(
            "letter key {:?} must be a single character",
            key
        ))),
    }
}

fn parse_codepoint(hex: &str) -> Result<char> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| ShapeError::resource(format!("{:?} is not a hexadecimal codepoint", hex)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads() {
        let table = ShapingTable::builtin().unwrap();
        let beh = table.entry('ب').unwrap();
        assert_eq!(beh.forms, ['\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}']);
        assert!(beh.links_to_prev && beh.links_to_next);

        let reh = table.entry('ر').unwrap();
        assert!(!reh.links_to_prev);
        assert_eq!(reh.form(GlyphForm::Medial), '\u{FEAE}');
    }

    #[test]
    fn all_arabic_base_letters_present() {
        let table = ShapingTable::builtin().unwrap();
        for cp in (0x0621..=0x063A).chain(0x0641..=0x064A) {
            let ch = char::from_u32(cp).unwrap();
            assert!(table.contains(ch), "missing U+{:04X}", cp);
        }
    }

    #[test]
    fn ligatures_and_marks() {
        let table = ShapingTable::builtin().unwrap();
        let lam_alef = table.ligature('ل', 'ا').unwrap();
        assert_eq!((lam_alef.plain, lam_alef.linked), ('\u{FEFB}', '\u{FEFC}'));
        assert!(table.ligature('ا', 'ل').is_none());

        assert!(table.is_diacritic('\u{064E}'));
        assert!(table.is_diacritic(SHADDA));
        assert!(!table.is_diacritic('ب'));

        let kasra = table.shadda_ligature('\u{0650}').unwrap();
        assert_eq!(kasra.plain, '\u{FC62}');
        assert_eq!(kasra.medial, Some('\u{FCF4}'));
        assert!(table.shadda_ligature('\u{0652}').is_none());
    }

    #[test]
    fn form_from_links() {
        assert_eq!(GlyphForm::from_links(false, false), GlyphForm::Isolated);
        assert_eq!(GlyphForm::from_links(true, false), GlyphForm::Final);
        assert_eq!(GlyphForm::from_links(false, true), GlyphForm::Initial);
        assert_eq!(GlyphForm::from_links(true, true).index(), 3);
    }

    #[test]
    fn corrupt_tables_are_rejected() {
        assert!(matches!(
            ShapingTable::from_json("{"),
            Err(ShapeError::ResourceLoadFailure(_))
        ));

        let bad_hex = r#"{"letters": {"ب": {"forms": ["ZZZZ","FE90","FE91","FE92"], "prevLink": true, "nextLink": true}}}"#;
        assert!(matches!(
            ShapingTable::from_json(bad_hex),
            Err(ShapeError::ResourceLoadFailure(_))
        ));

        let long_key = r#"{"letters": {"بب": {"forms": ["FE8F","FE90","FE91","FE92"], "prevLink": true, "nextLink": true}}}"#;
        assert!(ShapingTable::from_json(long_key).is_err());

        let bad_ligature = r#"{"letters": {}, "ligatures": {"ل": ["FEFB","FEFC"]}}"#;
        assert!(ShapingTable::from_json(bad_ligature).is_err());
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let err = ShapingTable::from_path("/nonexistent/ar_glyphs.json").unwrap_err();
        assert!(matches!(err, ShapeError::ResourceLoadFailure(_)));
    }

    #[test]
    fn shared_table_is_cached() {
        let a = ShapingTable::shared().unwrap();
        let b = ShapingTable::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
