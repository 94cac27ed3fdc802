//! Highlighting decides which rendered glyphs are active.
//!
//! Every pass is a total reset: all glyphs go inactive first, then the ones
//! matching the selector are activated. Applying the same selector twice
//! gives the same result as applying it once.

use log::warn;

use crate::board::{resolve_note, GlyphTable};
use crate::model::{GlyphState, NoteRef, Position, ScaleDefinition, Tuning};

/// What to highlight.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// One named position of the current scale
    Position(String),
    /// Several named positions; a glyph in any of them is activated
    Positions(Vec<String>),
    /// Explicit (string label, fret) pairs
    Notes(Vec<NoteRef>),
}

/// Outcome of a highlight pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightReport {
    /// Glyphs now active
    pub activated: usize,
    /// Position names or note references that could not be resolved
    pub skipped: Vec<String>,
}

pub fn apply_highlight(
    glyphs: &mut GlyphTable,
    tuning: &Tuning,
    scale: Option<&ScaleDefinition>,
    selector: &Selector,
) -> HighlightReport {
    glyphs.set_all_inactive();

    let mut report = HighlightReport::default();
    match selector {
        Selector::Position(name) => {
            activate_positions(glyphs, tuning, scale, std::slice::from_ref(name), &mut report)
        }
        Selector::Positions(names) => activate_positions(glyphs, tuning, scale, names, &mut report),
        Selector::Notes(notes) => activate_notes(glyphs, tuning, notes, &mut report),
    }
    report.activated = glyphs.iter().filter(|g| g.is_active()).count();
    report
}

fn activate_positions(
    glyphs: &mut GlyphTable,
    tuning: &Tuning,
    scale: Option<&ScaleDefinition>,
    names: &[String],
    report: &mut HighlightReport,
) {
    let Some(scale) = scale else {
        warn!("No scale loaded; cannot highlight positions {names:?}");
        report.skipped.extend(names.iter().cloned());
        return;
    };

    let positions: Vec<&Position> = names
        .iter()
        .filter_map(|name| match scale.position(name) {
            Some(p) => Some(p),
            None => {
                warn!("Position \"{name}\" not found on scale \"{}\".", scale.name);
                report.skipped.push(name.clone());
                None
            }
        })
        .collect();
    if positions.is_empty() {
        warn!("No valid positions to highlight.");
        return;
    }

    for glyph in glyphs.iter_mut() {
        let Some(label) = tuning.label(glyph.string_index) else {
            continue;
        };
        if positions.iter().any(|p| p.contains(label, glyph.fret)) {
            glyph.state = GlyphState::Active;
        }
    }
}

fn activate_notes(glyphs: &mut GlyphTable, tuning: &Tuning, notes: &[NoteRef], report: &mut HighlightReport) {
    let num_frets = glyphs.num_frets();
    for note in notes {
        match resolve_note(tuning, num_frets, &note.string_name, note.fret) {
            Ok((string_index, fret)) => match glyphs.get_mut(string_index, fret) {
                Some(glyph) => glyph.state = GlyphState::Active,
                None => {
                    warn!("No note drawn at {} fret {}", note.string_name, note.fret);
                    report.skipped.push(format!("{}:{}", note.string_name, note.fret));
                }
            },
            Err(e) => {
                warn!("Skipping highlight: {e}");
                report.skipped.push(format!("{}:{}", note.string_name, note.fret));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteGlyph, PitchClass};
    use crate::pitch::pitch_at;
    use crate::tuning::{c_major_pentatonic, standard_tuning};
    use pretty_assertions::assert_eq;

    /// Every cell of the board filled with a glyph.
    fn full_table() -> GlyphTable {
        let tuning = standard_tuning();
        let mut table = GlyphTable::new(6, 15);
        for (s, spec) in tuning.strings().iter().enumerate() {
            for f in 0..=15u8 {
                table.insert(NoteGlyph::new(s, f, pitch_at(spec.open, f)));
            }
        }
        table
    }

    #[test]
    fn position_with_string_subset() {
        let tuning = standard_tuning();
        let scale = c_major_pentatonic();
        let mut table = full_table();
        apply_highlight(&mut table, &tuning, Some(&scale), &Selector::Position("p5a".into()));

        // e is excluded from p5a
        assert!(!table.get(0, 6).unwrap().is_active());
        assert!(table.get(2, 7).unwrap().is_active());
        assert!(!table.get(2, 9).unwrap().is_active());
    }

    #[test]
    fn highlight_is_a_total_reset() {
        let tuning = standard_tuning();
        let scale = c_major_pentatonic();
        let mut table = full_table();
        apply_highlight(&mut table, &tuning, Some(&scale), &Selector::Position("pos3".into()));
        assert!(table.get(5, 1).unwrap().is_active());

        apply_highlight(&mut table, &tuning, Some(&scale), &Selector::Position("pos1".into()));
        assert!(!table.get(5, 1).unwrap().is_active());
        assert!(table.get(5, 8).unwrap().is_active());
    }

    #[test]
    fn highlight_is_idempotent() {
        let tuning = standard_tuning();
        let scale = c_major_pentatonic();
        let selector = Selector::Positions(vec!["p5a".into(), "p1a".into()]);
        let mut table = full_table();
        apply_highlight(&mut table, &tuning, Some(&scale), &selector);
        let once = table.active();
        apply_highlight(&mut table, &tuning, Some(&scale), &selector);
        assert_eq!(table.active(), once);
        assert!(!once.is_empty());
    }

    #[test]
    fn unknown_positions_are_skipped() {
        let tuning = standard_tuning();
        let scale = c_major_pentatonic();
        let mut table = full_table();
        let report = apply_highlight(
            &mut table,
            &tuning,
            Some(&scale),
            &Selector::Positions(vec!["nope".into(), "pos2".into()]),
        );
        assert_eq!(report.skipped, vec!["nope".to_string()]);
        assert!(table.get(3, 11).unwrap().is_active());
    }

    #[test]
    fn positions_without_scale_reset_everything() {
        let tuning = standard_tuning();
        let mut table = full_table();
        table.get_mut(0, 0).unwrap().state = GlyphState::Active;
        let report = apply_highlight(&mut table, &tuning, None, &Selector::Position("pos1".into()));
        assert_eq!(report.activated, 0);
        assert!(table.active().is_empty());
    }

    #[test]
    fn explicit_notes() {
        let tuning = standard_tuning();
        let mut table = full_table();
        let report = apply_highlight(
            &mut table,
            &tuning,
            None,
            &Selector::Notes(vec![
                NoteRef::new("A", 3),
                NoteRef::new("Q", 3),
                NoteRef::new("D", 40),
            ]),
        );
        assert_eq!(table.active(), vec![(4, 3)]);
        assert_eq!(table.get(4, 3).unwrap().pitch, PitchClass::C);
        assert_eq!(report.activated, 1);
        assert_eq!(report.skipped.len(), 2);
    }
}
