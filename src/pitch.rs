//! Pitch lookup: which pitch sounds at a given string and fret.

use crate::model::{PitchClass, Tuning};

/// Sounded pitch class for an open pitch raised by `fret` semitones.
pub fn pitch_at(open: PitchClass, fret: u8) -> PitchClass {
    PitchClass::from_index(open.index() + fret as usize)
}

/// MIDI note number sounded at `fret` on a string whose open note is `open_midi`.
pub fn midi_note_at(open_midi: u8, fret: u8) -> u8 {
    open_midi.saturating_add(fret)
}

/// Precomputed pitch per (string, fret), frets `0..=num_frets`.
#[derive(Debug, Clone)]
pub struct PitchTable {
    rows: Vec<Vec<PitchClass>>,
    midi: Vec<Vec<u8>>,
}

impl PitchTable {
    pub fn for_tuning(tuning: &Tuning, num_frets: u8) -> Self {
        let rows = tuning
            .strings()
            .iter()
            .map(|s| (0..=num_frets).map(|f| pitch_at(s.open, f)).collect())
            .collect();
        let midi = tuning
            .strings()
            .iter()
            .map(|s| (0..=num_frets).map(|f| midi_note_at(s.open_midi, f)).collect())
            .collect();
        Self { rows, midi }
    }

    pub fn pitch(&self, string_index: usize, fret: u8) -> Option<PitchClass> {
        self.rows.get(string_index)?.get(fret as usize).copied()
    }

    pub fn midi(&self, string_index: usize, fret: u8) -> Option<u8> {
        self.midi.get(string_index)?.get(fret as usize).copied()
    }
}
