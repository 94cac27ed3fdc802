//! Data model for the fretboard: tuning, scales, rendered note glyphs and
//! bend requests.
//!
//! These structures are shared by the renderer, the highlighter and the
//! bend animator, and most of them cross the host boundary as JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FretError;

// ═══════════════════════════════════════════════════════════════════════
// Pitch classes
// ═══════════════════════════════════════════════════════════════════════

/// One of the twelve pitch classes, sharps only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Position in the 12-tone cycle, C = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class at `index` modulo 12.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = FretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PitchClass::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| FretError::UnknownPitch(s.to_string()))
    }
}

impl Serialize for PitchClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PitchClass {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Scale degrees
// ═══════════════════════════════════════════════════════════════════════

/// Scale-degree tag attached to each member of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Degree {
    Root,
    Second,
    MinorThird,
    Third,
    Fourth,
    Fifth,
    Sixth,
    MinorSeventh,
    Seventh,
}

impl Degree {
    /// Class name emitted on the rendered glyph.
    pub fn as_str(self) -> &'static str {
        match self {
            Degree::Root => "root",
            Degree::Second => "second",
            Degree::MinorThird => "minorThird",
            Degree::Third => "third",
            Degree::Fourth => "fourth",
            Degree::Fifth => "fifth",
            Degree::Sixth => "sixth",
            Degree::MinorSeventh => "minorSeventh",
            Degree::Seventh => "seventh",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tuning
// ═══════════════════════════════════════════════════════════════════════

/// One guitar string: its label, open pitch and drawing style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringSpec {
    /// Display label; case-sensitive so high `e` and low `E` differ
    pub label: String,
    /// Pitch class of the open string
    pub open: PitchClass,
    /// MIDI note number of the open string
    pub open_midi: u8,
    /// Stroke width of the drawn string in SVG units
    pub stroke_width: f64,
    /// Stroke colour of the drawn string
    pub color: String,
}

/// Six strings, highest pitch first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tuning {
    strings: Vec<StringSpec>,
}

impl Tuning {
    pub const STRING_COUNT: usize = 6;

    /// Build a tuning, checking there are exactly six uniquely-labelled strings.
    pub fn new(strings: Vec<StringSpec>) -> Result<Self, FretError> {
        if strings.len() != Self::STRING_COUNT {
            return Err(FretError::InvalidTuning(format!(
                "expected {} strings, got {}",
                Self::STRING_COUNT,
                strings.len()
            )));
        }
        let labels: BTreeSet<&str> = strings.iter().map(|s| s.label.as_str()).collect();
        if labels.len() != strings.len() {
            return Err(FretError::InvalidTuning("duplicate string labels".into()));
        }
        Ok(Self { strings })
    }

    /// For static tables already known to hold six unique labels.
    pub(crate) fn from_table(strings: Vec<StringSpec>) -> Self {
        debug_assert_eq!(strings.len(), Self::STRING_COUNT);
        Self { strings }
    }

    pub fn strings(&self) -> &[StringSpec] {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StringSpec> {
        self.strings.get(index)
    }

    /// Index of the string with the given label (exact match).
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.strings.iter().position(|s| s.label == label)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.label.as_str())
    }
}

impl<'de> Deserialize<'de> for Tuning {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let strings = Vec::<StringSpec>::deserialize(deserializer)?;
        Tuning::new(strings).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Scales
// ═══════════════════════════════════════════════════════════════════════

/// A named playable fragment of a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub frets: BTreeSet<u8>,
    /// Restrict the position to these string labels; `None` means all strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strings: Option<Vec<String>>,
}

impl Position {
    pub fn frets(frets: &[u8]) -> Self {
        Self {
            frets: frets.iter().copied().collect(),
            strings: None,
        }
    }

    pub fn frets_on(frets: &[u8], strings: &[&str]) -> Self {
        Self {
            frets: frets.iter().copied().collect(),
            strings: Some(strings.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Whether a note on `label` at `fret` belongs to this position.
    pub fn contains(&self, label: &str, fret: u8) -> bool {
        self.frets.contains(&fret)
            && self
                .strings
                .as_ref()
                .map_or(true, |strings| strings.iter().any(|s| s == label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    pub name: String,
    pub members: BTreeMap<PitchClass, Degree>,
    #[serde(default)]
    pub positions: BTreeMap<String, Position>,
}

impl ScaleDefinition {
    pub fn degree_of(&self, pitch: PitchClass) -> Option<Degree> {
        self.members.get(&pitch).copied()
    }

    pub fn position(&self, name: &str) -> Option<&Position> {
        self.positions.get(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rendered glyphs
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphState {
    Active,
    /// Faded
    #[default]
    Inactive,
}

/// A note drawn on the board at one (string, fret) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteGlyph {
    pub string_index: usize,
    /// 0 = open string
    pub fret: u8,
    pub pitch: PitchClass,
    /// Sounding MIDI note, when the tuning provides one
    pub midi: Option<u8>,
    /// Scale degree, when the glyph was rendered from a scale
    pub degree: Option<Degree>,
    pub state: GlyphState,
    /// Pattern metadata for the host's own use; not interpreted here
    pub duration_ms: Option<u64>,
    /// Extra class emitted on the glyph (display-notes payloads)
    pub highlight_class: Option<String>,
}

impl NoteGlyph {
    pub fn new(string_index: usize, fret: u8, pitch: PitchClass) -> Self {
        Self {
            string_index,
            fret,
            pitch,
            midi: None,
            degree: None,
            state: GlyphState::Inactive,
            duration_ms: None,
            highlight_class: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == GlyphState::Active
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Host payloads
// ═══════════════════════════════════════════════════════════════════════

/// One entry of a serialized scale pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternEntry {
    pub string_name: String,
    /// Kept signed so a negative fret is a per-entry skip, not a decode failure
    pub fret: i64,
    #[serde(default)]
    pub duration: u64,
}

/// A (string, fret) reference used by highlight payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRef {
    pub string_name: String,
    pub fret: i64,
}

impl NoteRef {
    pub fn new(string_name: &str, fret: i64) -> Self {
        Self {
            string_name: string_name.to_string(),
            fret,
        }
    }
}

/// A note to display with an optional highlight class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNote {
    pub string_name: String,
    pub fret: i64,
    #[serde(default)]
    pub highlight: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Bends
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BendMagnitude {
    HalfTone,
    WholeTone,
}

impl BendMagnitude {
    pub fn from_halftones(halftones: i64) -> Option<Self> {
        match halftones {
            1 => Some(BendMagnitude::HalfTone),
            2 => Some(BendMagnitude::WholeTone),
            _ => None,
        }
    }

    /// Displacement of the bent string, in string-spacings.
    pub fn spacings(self) -> usize {
        match self {
            BendMagnitude::HalfTone => 1,
            BendMagnitude::WholeTone => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BendRequest {
    pub string_index: usize,
    pub fret: u8,
    pub magnitude: BendMagnitude,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::standard_tuning;

    #[test]
    fn pitch_names_round_trip_sharps_only() {
        for p in PitchClass::ALL {
            assert_eq!(p.name().parse::<PitchClass>().unwrap(), p);
        }
        assert!("Bb".parse::<PitchClass>().is_err());
        assert!("H".parse::<PitchClass>().is_err());
    }

    #[test]
    fn tuning_labels_are_case_sensitive() {
        let tuning = standard_tuning();
        assert_eq!(tuning.index_of("e"), Some(0));
        assert_eq!(tuning.index_of("E"), Some(5));
        assert_eq!(tuning.index_of("x"), None);
    }

    #[test]
    fn tuning_rejects_wrong_string_count() {
        let mut strings = standard_tuning().strings().to_vec();
        strings.pop();
        assert!(matches!(Tuning::new(strings), Err(FretError::InvalidTuning(_))));
    }

    #[test]
    fn tuning_rejects_duplicate_labels() {
        let mut strings = standard_tuning().strings().to_vec();
        strings[0].label = "E".into();
        assert!(Tuning::new(strings).is_err());
    }

    #[test]
    fn position_without_strings_matches_any_string() {
        let pos = Position::frets(&[2, 3, 4, 5]);
        assert!(pos.contains("e", 3));
        assert!(pos.contains("E", 5));
        assert!(!pos.contains("E", 6));
    }

    #[test]
    fn position_with_strings_restricts_labels() {
        let pos = Position::frets_on(&[5, 6, 7, 8], &["E", "A", "D", "G"]);
        assert!(!pos.contains("e", 6));
        assert!(pos.contains("G", 7));
    }

    #[test]
    fn scale_deserializes_from_json() {
        let json = r#"{
            "name": "E Minor Triad",
            "members": {"E": "root", "G": "minorThird", "B": "fifth"},
            "positions": {"open": {"frets": [0, 1, 2, 3], "strings": ["e", "B"]}}
        }"#;
        let scale: ScaleDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(scale.degree_of(PitchClass::G), Some(Degree::MinorThird));
        assert!(scale.position("open").unwrap().contains("B", 0));
    }

    #[test]
    fn bend_magnitude_from_halftones() {
        assert_eq!(BendMagnitude::from_halftones(1), Some(BendMagnitude::HalfTone));
        assert_eq!(BendMagnitude::from_halftones(2), Some(BendMagnitude::WholeTone));
        assert_eq!(BendMagnitude::from_halftones(3), None);
    }
}
