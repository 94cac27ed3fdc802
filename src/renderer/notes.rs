//! Note glyph construction and rendering.

use log::warn;

use crate::board::{resolve_note, GlyphTable, PlacedGlyph};
use crate::model::{Degree, DisplayNote, NoteGlyph, PatternEntry, ScaleDefinition, Tuning};
use crate::pitch::PitchTable;
use super::constants::*;
use super::geometry::FretboardGeometry;
use super::svg_builder::SvgBuilder;

// ═══════════════════════════════════════════════════════════════════════
// Glyph construction
// ═══════════════════════════════════════════════════════════════════════

/// Every cell sounding a member of `scale`, tagged with its degree.
pub(crate) fn scale_glyphs(
    pitches: &PitchTable,
    num_strings: usize,
    num_frets: u8,
    scale: &ScaleDefinition,
) -> GlyphTable {
    let mut table = GlyphTable::new(num_strings, num_frets);
    for string_index in 0..num_strings {
        for fret in 0..=num_frets {
            let Some(mut glyph) = glyph_at(pitches, string_index, fret) else {
                continue;
            };
            if let Some(degree) = scale.degree_of(glyph.pitch) {
                glyph.degree = Some(degree);
                table.insert(glyph);
            }
        }
    }
    table
}

pub(crate) fn pattern_glyphs(
    tuning: &Tuning,
    pitches: &PitchTable,
    num_frets: u8,
    entries: &[PatternEntry],
) -> GlyphTable {
    let mut table = GlyphTable::new(tuning.len(), num_frets);
    for entry in entries {
        if let Some(mut glyph) = glyph_for(tuning, pitches, num_frets, &entry.string_name, entry.fret) {
            glyph.duration_ms = Some(entry.duration);
            table.insert(glyph);
        }
    }
    table
}

pub(crate) fn display_glyphs(
    tuning: &Tuning,
    pitches: &PitchTable,
    num_frets: u8,
    notes: &[DisplayNote],
) -> GlyphTable {
    let mut table = GlyphTable::new(tuning.len(), num_frets);
    for note in notes {
        if let Some(mut glyph) = glyph_for(tuning, pitches, num_frets, &note.string_name, note.fret) {
            glyph.highlight_class = note.highlight.clone();
            table.insert(glyph);
        }
    }
    table
}

fn glyph_at(pitches: &PitchTable, string_index: usize, fret: u8) -> Option<NoteGlyph> {
    let mut glyph = NoteGlyph::new(string_index, fret, pitches.pitch(string_index, fret)?);
    glyph.midi = pitches.midi(string_index, fret);
    Some(glyph)
}

fn glyph_for(tuning: &Tuning, pitches: &PitchTable, num_frets: u8, label: &str, fret: i64) -> Option<NoteGlyph> {
    match resolve_note(tuning, num_frets, label, fret) {
        Ok((string_index, fret)) => glyph_at(pitches, string_index, fret),
        Err(e) => {
            warn!("Skipping note: {e}");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Glyph rendering
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn degree_color(degree: Option<Degree>) -> &'static str {
    match degree {
        Some(Degree::Root) => ROOT_COLOR,
        Some(Degree::Third) | Some(Degree::MinorThird) => THIRD_COLOR,
        Some(Degree::Fifth) => FIFTH_COLOR,
        _ => DEFAULT_NOTE_COLOR,
    }
}

/// Class list emitted on a glyph's `<g>`.
pub(super) fn glyph_classes(glyph: &NoteGlyph) -> String {
    let mut classes = vec![if glyph.fret == 0 { "open-string-note" } else { "note" }];
    if let Some(degree) = glyph.degree {
        classes.push(degree.as_str());
    }
    if let Some(ref h) = glyph.highlight_class {
        classes.push(h.as_str());
    }
    if !glyph.is_active() {
        classes.push("faded-note");
    }
    classes.join(" ")
}

/// Draw all glyphs; elevated (moving) glyphs are drawn last so they sit on top.
pub(super) fn render_notes(svg: &mut SvgBuilder, glyphs: &GlyphTable, geometry: &FretboardGeometry, tuning: &Tuning) {
    let (moving, resting): (Vec<&PlacedGlyph>, Vec<&PlacedGlyph>) =
        glyphs.iter_placed().partition(|p| p.elevated);
    for placed in resting.into_iter().chain(moving) {
        render_glyph(svg, placed, geometry, tuning);
    }
}

fn render_glyph(svg: &mut SvgBuilder, placed: &PlacedGlyph, geometry: &FretboardGeometry, tuning: &Tuning) {
    let glyph = &placed.glyph;
    let Some(center) = geometry.note_center(glyph.string_index, glyph.fret) else {
        return;
    };
    let radius = geometry.layout.row_height * NOTE_RADIUS_RATIO;

    let (fill, text_fill) = if glyph.is_active() {
        let fill = if glyph.highlight_class.is_some() {
            HIGHLIGHT_CLASS_COLOR
        } else {
            degree_color(glyph.degree)
        };
        (fill, NOTE_TEXT_COLOR)
    } else {
        (FADED_NOTE_COLOR, FADED_TEXT_COLOR)
    };

    // Open-string notes show the string label, fretted notes the pitch.
    let label = if glyph.fret == 0 {
        tuning.label(glyph.string_index).unwrap_or_default().to_string()
    } else {
        glyph.pitch.name().to_string()
    };

    let mut attrs = vec![
        ("data-string", glyph.string_index.to_string()),
        ("data-fret", glyph.fret.to_string()),
    ];
    if let Some(midi) = glyph.midi {
        attrs.push(("data-midi", midi.to_string()));
    }
    if let Some(ms) = glyph.duration_ms {
        attrs.push(("data-duration", ms.to_string()));
    }
    if placed.offset_y != 0.0 {
        attrs.push(("transform", format!("translate(0,{:.2})", placed.offset_y)));
    }

    let id = format!("note-{}-{}", glyph.string_index, glyph.fret);
    svg.begin_group(Some(&id), Some(&glyph_classes(glyph)), &attrs);
    svg.circle(center.x, center.y, radius, fill, NOTE_OUTLINE_COLOR, if glyph.is_active() { NOTE_OUTLINE_WIDTH } else { 0.0 });
    svg.text(center.x, center.y, &label, NOTE_FONT_SIZE, "bold", text_fill, "middle");
    svg.end_group();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GlyphState, PitchClass};
    use crate::tuning::{c_major_pentatonic, standard_tuning};
    use pretty_assertions::assert_eq;

    #[test]
    fn scale_glyphs_cover_every_member_cell() {
        let tuning = standard_tuning();
        let pitches = PitchTable::for_tuning(&tuning, 15);
        let scale = c_major_pentatonic();
        let table = scale_glyphs(&pitches, 6, 15, &scale);

        for s in 0..6 {
            for f in 0..=15u8 {
                let pitch = pitches.pitch(s, f).unwrap();
                assert_eq!(table.get(s, f).is_some(), scale.members.contains_key(&pitch));
            }
        }
        let root = table.get(1, 1).unwrap();
        assert_eq!(root.pitch, PitchClass::C);
        assert_eq!(root.degree, Some(Degree::Root));
        assert_eq!(root.state, GlyphState::Inactive);
        // B string fret 1 is middle C
        assert_eq!(root.midi, Some(60));
    }

    #[test]
    fn pattern_skips_bad_entries_and_keeps_duration() {
        let tuning = standard_tuning();
        let pitches = PitchTable::for_tuning(&tuning, 15);
        let entries = vec![
            PatternEntry { string_name: "A".into(), fret: 3, duration: 500 },
            PatternEntry { string_name: "Z".into(), fret: 3, duration: 500 },
            PatternEntry { string_name: "D".into(), fret: 99, duration: 500 },
            PatternEntry { string_name: "D".into(), fret: -2, duration: 500 },
            PatternEntry { string_name: "e".into(), fret: 0, duration: 250 },
        ];
        let table = pattern_glyphs(&tuning, &pitches, 15, &entries);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(4, 3).unwrap().duration_ms, Some(500));
        assert_eq!(table.get(0, 0).unwrap().duration_ms, Some(250));
        assert_eq!(table.get(4, 3).unwrap().midi, Some(48));
    }

    #[test]
    fn display_notes_carry_highlight_class() {
        let tuning = standard_tuning();
        let pitches = PitchTable::for_tuning(&tuning, 15);
        let notes = vec![
            DisplayNote { string_name: "B".into(), fret: 1, highlight: Some("highlight1".into()) },
            DisplayNote { string_name: "G".into(), fret: 0, highlight: None },
        ];
        let table = display_glyphs(&tuning, &pitches, 15, &notes);
        let c = table.get(1, 1).unwrap();
        assert_eq!(glyph_classes(c), "note highlight1 faded-note");
        assert_eq!(glyph_classes(table.get(2, 0).unwrap()), "open-string-note faded-note");
    }

    #[test]
    fn active_glyph_classes_drop_faded() {
        let mut glyph = NoteGlyph::new(3, 5, PitchClass::G);
        glyph.degree = Some(Degree::Fifth);
        glyph.state = GlyphState::Active;
        assert_eq!(glyph_classes(&glyph), "note fifth");
        assert_eq!(degree_color(glyph.degree), FIFTH_COLOR);
    }
}
