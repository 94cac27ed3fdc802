//! Static tuning and scale tables.

use std::collections::BTreeMap;

use crate::error::FretError;
use crate::model::{Degree, PitchClass, Position, ScaleDefinition, StringSpec, Tuning};

const STRING_COLOR: &str = "#a9a9a9";

/// (label, open pitch, open MIDI note, stroke width), highest string first.
const STANDARD_STRINGS: [(&str, PitchClass, u8, f64); 6] = [
    ("e", PitchClass::E, 64, 2.1),
    ("B", PitchClass::B, 59, 2.4),
    ("G", PitchClass::G, 55, 2.7),
    ("D", PitchClass::D, 50, 3.0),
    ("A", PitchClass::A, 45, 3.3),
    ("E", PitchClass::E, 40, 3.6),
];

/// Standard E tuning: e B G D A E.
pub fn standard_tuning() -> Tuning {
    let strings = STANDARD_STRINGS
        .iter()
        .map(|&(label, open, open_midi, stroke_width)| StringSpec {
            label: label.to_string(),
            open,
            open_midi,
            stroke_width,
            color: STRING_COLOR.to_string(),
        })
        .collect();
    Tuning::from_table(strings)
}

impl Default for Tuning {
    fn default() -> Self {
        standard_tuning()
    }
}

fn scale(name: &str, members: &[(PitchClass, Degree)], positions: &[(&str, Position)]) -> ScaleDefinition {
    ScaleDefinition {
        name: name.to_string(),
        members: members.iter().copied().collect(),
        positions: positions
            .iter()
            .map(|(n, p)| (n.to_string(), p.clone()))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn g_major_pentatonic() -> ScaleDefinition {
    use Degree::*;
    use PitchClass as P;
    scale(
        "G Major Pentatonic",
        &[(P::G, Root), (P::A, Second), (P::B, Third), (P::D, Fifth), (P::E, Sixth)],
        &[
            ("pos1", Position::frets(&[2, 3, 4, 5])),
            ("pos2", Position::frets(&[4, 5, 6, 7, 8])),
            ("pos3", Position::frets(&[7, 8, 9, 10])),
            ("pos4", Position::frets(&[9, 10, 11, 12])),
            ("pos5", Position::frets(&[0, 1, 2, 3, 12, 13, 14, 15])),
        ],
    )
}

pub fn a_minor_pentatonic() -> ScaleDefinition {
    use Degree::*;
    use PitchClass as P;
    scale(
        "A Minor Pentatonic",
        &[
            (P::A, Root),
            (P::C, MinorThird),
            (P::D, Fourth),
            (P::E, Fifth),
            (P::G, MinorSeventh),
        ],
        &[],
    )
}

pub fn c_major_pentatonic() -> ScaleDefinition {
    use Degree::*;
    use PitchClass as P;
    scale(
        "C Major Pentatonic",
        &[(P::C, Root), (P::D, Second), (P::E, Third), (P::G, Fifth), (P::A, Sixth)],
        &[
            // CAGED shapes
            ("pos1", Position::frets(&[7, 8, 9, 10])),
            ("pos2", Position::frets(&[10, 11, 12])),
            ("pos3", Position::frets(&[0, 1, 2, 3])),
            ("pos4", Position::frets(&[2, 3, 4, 5])),
            ("pos5", Position::frets(&[5, 6, 7, 8])),
            // house of blues
            ("pos_custom1", Position::frets_on(&[8, 9, 10], &["G", "B", "e"])),
            ("p5a", Position::frets_on(&[5, 6, 7, 8], &["E", "A", "D", "G"])),
            ("p1a", Position::frets_on(&[8, 9, 10], &["G", "B", "e"])),
        ],
    )
}

pub fn c_major() -> ScaleDefinition {
    use Degree::*;
    use PitchClass as P;
    scale(
        "C Major",
        &[
            (P::C, Root),
            (P::D, Second),
            (P::E, Third),
            (P::F, Fourth),
            (P::G, Fifth),
            (P::A, Sixth),
            (P::B, Seventh),
        ],
        &[],
    )
}

/// All built-in scales.
pub fn builtin_scales() -> Vec<ScaleDefinition> {
    vec![
        g_major_pentatonic(),
        a_minor_pentatonic(),
        c_major_pentatonic(),
        c_major(),
    ]
}

/// Look up a built-in scale by its display name, ignoring case.
pub fn scale_by_name(name: &str) -> Result<ScaleDefinition, FretError> {
    builtin_scales()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| FretError::UnknownScale(name.to_string()))
}
