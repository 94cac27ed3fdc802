//! The board: the single owned object holding everything that is drawn,
//! grid structure, geometry, note glyphs and the current string paths.
//!
//! Glyphs are kept in a table indexed directly by (string, fret), built once
//! per render pass, so lookups never search the rendered document.

use log::{debug, warn};

use crate::config::FretboardConfig;
use crate::error::{FretError, Result};
use crate::highlight::{self, HighlightReport, Selector};
use crate::model::{DisplayNote, GlyphState, NoteGlyph, PatternEntry, ScaleDefinition, Tuning};
use crate::pitch::PitchTable;
use crate::renderer::geometry::{compute_string_geometry, FretboardGeometry, GridLayout, Point};
use crate::renderer::{self, Grid};

// ═══════════════════════════════════════════════════════════════════════
// Glyph table
// ═══════════════════════════════════════════════════════════════════════

/// A glyph plus its transient animation state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub glyph: NoteGlyph,
    /// Vertical displacement applied by an in-flight bend
    pub offset_y: f64,
    /// Drawn above the other glyphs while it moves
    pub elevated: bool,
}

/// Note glyphs indexed by string × fret (fret 0 = open string).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTable {
    num_strings: usize,
    num_frets: u8,
    cells: Vec<Option<PlacedGlyph>>,
}

impl GlyphTable {
    pub fn new(num_strings: usize, num_frets: u8) -> Self {
        Self {
            num_strings,
            num_frets,
            cells: vec![None; num_strings * (num_frets as usize + 1)],
        }
    }

    pub fn num_strings(&self) -> usize {
        self.num_strings
    }

    pub fn num_frets(&self) -> u8 {
        self.num_frets
    }

    fn slot(&self, string_index: usize, fret: u8) -> Option<usize> {
        if string_index >= self.num_strings || fret > self.num_frets {
            return None;
        }
        Some(string_index * (self.num_frets as usize + 1) + fret as usize)
    }

    /// Place a glyph at its own (string, fret); returns false outside the grid.
    pub fn insert(&mut self, glyph: NoteGlyph) -> bool {
        match self.slot(glyph.string_index, glyph.fret) {
            Some(i) => {
                self.cells[i] = Some(PlacedGlyph {
                    glyph,
                    offset_y: 0.0,
                    elevated: false,
                });
                true
            }
            None => false,
        }
    }

    pub fn get(&self, string_index: usize, fret: u8) -> Option<&NoteGlyph> {
        self.placed(string_index, fret).map(|p| &p.glyph)
    }

    pub fn get_mut(&mut self, string_index: usize, fret: u8) -> Option<&mut NoteGlyph> {
        self.placed_mut(string_index, fret).map(|p| &mut p.glyph)
    }

    pub fn placed(&self, string_index: usize, fret: u8) -> Option<&PlacedGlyph> {
        let i = self.slot(string_index, fret)?;
        self.cells[i].as_ref()
    }

    pub(crate) fn placed_mut(&mut self, string_index: usize, fret: u8) -> Option<&mut PlacedGlyph> {
        let i = self.slot(string_index, fret)?;
        self.cells[i].as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteGlyph> {
        self.cells.iter().flatten().map(|p| &p.glyph)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NoteGlyph> {
        self.cells.iter_mut().flatten().map(|p| &mut p.glyph)
    }

    pub fn iter_placed(&self) -> impl Iterator<Item = &PlacedGlyph> {
        self.cells.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn set_all_inactive(&mut self) {
        for glyph in self.iter_mut() {
            glyph.state = GlyphState::Inactive;
        }
    }

    /// (string, fret) of every active glyph, in table order.
    pub fn active(&self) -> Vec<(usize, u8)> {
        self.iter()
            .filter(|g| g.is_active())
            .map(|g| (g.string_index, g.fret))
            .collect()
    }
}

/// Resolve a host (label, fret) pair to a grid address.
pub fn resolve_note(tuning: &Tuning, num_frets: u8, label: &str, fret: i64) -> Result<(usize, u8)> {
    let string_index = tuning
        .index_of(label)
        .ok_or_else(|| FretError::UnknownString(label.to_string()))?;
    if fret < 0 || fret > num_frets as i64 {
        return Err(FretError::FretOutOfRange { fret, max: num_frets });
    }
    Ok((string_index, fret as u8))
}

// ═══════════════════════════════════════════════════════════════════════
// Board state
// ═══════════════════════════════════════════════════════════════════════

pub struct BoardState {
    config: FretboardConfig,
    grid: Grid,
    geometry: FretboardGeometry,
    pitches: PitchTable,
    glyphs: GlyphTable,
    string_paths: Vec<Vec<Point>>,
    scale: Option<ScaleDefinition>,
}

impl BoardState {
    pub fn new(config: FretboardConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::build(&config);
        let geometry = compute_string_geometry(&grid.layout, config.virtual_saddle_distance);
        let pitches = PitchTable::for_tuning(&config.tuning, config.num_frets);
        let glyphs = GlyphTable::new(config.tuning.len(), config.num_frets);
        let mut board = Self {
            config,
            grid,
            geometry,
            pitches,
            glyphs,
            string_paths: Vec::new(),
            scale: None,
        };
        board.reset_all_string_paths();
        Ok(board)
    }

    /// Rebuild the whole structure for a new configuration. Notes are cleared.
    pub fn reconfigure(&mut self, config: FretboardConfig) -> Result<()> {
        *self = Self::new(config)?;
        debug!("board rebuilt: {} frets", self.config.num_frets);
        Ok(())
    }

    /// Recompute geometry from a realized layout, e.g. after the host resized
    /// the view. Glyphs are kept.
    pub fn relayout(&mut self, layout: GridLayout) -> Result<()> {
        if layout.row_tops.len() != self.config.tuning.len() {
            return Err(FretError::Layout(format!(
                "expected {} string rows, found {}",
                self.config.tuning.len(),
                layout.row_tops.len()
            )));
        }
        if layout.num_frets() != self.config.num_frets as usize {
            return Err(FretError::Layout(format!(
                "expected {} fret cells, found {}",
                self.config.num_frets,
                layout.num_frets()
            )));
        }
        if !(layout.row_height > 0.0) {
            return Err(FretError::Layout(format!(
                "row height must be positive, got {}",
                layout.row_height
            )));
        }
        if layout.row_tops.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(FretError::Layout("string rows must run top to bottom".into()));
        }
        self.geometry = compute_string_geometry(&layout, self.config.virtual_saddle_distance);
        self.grid = Grid::from_layout(layout, self.grid.header_height);
        for placed in self.glyphs.cells.iter_mut().flatten() {
            placed.offset_y = 0.0;
            placed.elevated = false;
        }
        self.reset_all_string_paths();
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &FretboardConfig {
        &self.config
    }

    pub fn tuning(&self) -> &Tuning {
        &self.config.tuning
    }

    pub fn num_frets(&self) -> u8 {
        self.config.num_frets
    }

    pub fn geometry(&self) -> &FretboardGeometry {
        &self.geometry
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn pitches(&self) -> &PitchTable {
        &self.pitches
    }

    /// Scale most recently drawn with `render_scale`.
    pub fn scale(&self) -> Option<&ScaleDefinition> {
        self.scale.as_ref()
    }

    pub fn string_path(&self, string_index: usize) -> Option<&[Point]> {
        self.string_paths.get(string_index).map(Vec::as_slice)
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.config.title = title;
        self.rebuild_header();
    }

    pub fn set_subtitle(&mut self, subtitle: Option<String>) {
        self.config.subtitle = subtitle;
        self.rebuild_header();
    }

    /// Header height changes move every row, so the grid is rebuilt; glyphs stay.
    fn rebuild_header(&mut self) {
        self.grid = Grid::build(&self.config);
        self.geometry = compute_string_geometry(&self.grid.layout, self.config.virtual_saddle_distance);
        self.reset_all_string_paths();
    }

    pub fn resolve(&self, label: &str, fret: i64) -> Result<(usize, u8)> {
        resolve_note(&self.config.tuning, self.config.num_frets, label, fret)
    }

    // ── Rendering ──────────────────────────────────────────────────────

    /// Draw every note of `scale` on the board, all faded.
    pub fn render_scale(&mut self, scale: &ScaleDefinition) {
        self.glyphs = renderer::scale_glyphs(&self.pitches, self.tuning().len(), self.num_frets(), scale);
        self.scale = Some(scale.clone());
        self.reset_all_string_paths();
        debug!("rendered scale '{}': {} notes", scale.name, self.glyphs.len());
    }

    /// Draw only the listed notes, all faded. Returns how many were drawn.
    pub fn render_pattern(&mut self, entries: &[PatternEntry]) -> usize {
        self.glyphs = renderer::pattern_glyphs(&self.config.tuning, &self.pitches, self.num_frets(), entries);
        self.scale = None;
        self.reset_all_string_paths();
        debug!("rendered pattern: {} of {} notes", self.glyphs.len(), entries.len());
        self.glyphs.len()
    }

    /// Like `render_pattern`, with an optional highlight class per note.
    pub fn display_notes(&mut self, notes: &[DisplayNote]) -> usize {
        self.glyphs = renderer::display_glyphs(&self.config.tuning, &self.pitches, self.num_frets(), notes);
        self.scale = None;
        self.reset_all_string_paths();
        debug!("displayed {} of {} notes", self.glyphs.len(), notes.len());
        self.glyphs.len()
    }

    /// Serialize the board as it currently looks.
    pub fn to_svg(&self) -> String {
        renderer::render_board_to_svg(self)
    }

    // ── Highlighting ───────────────────────────────────────────────────

    pub fn apply_highlight(&mut self, selector: &Selector) -> HighlightReport {
        highlight::apply_highlight(&mut self.glyphs, &self.config.tuning, self.scale.as_ref(), selector)
    }

    pub fn clear_highlights(&mut self) {
        self.glyphs.set_all_inactive();
    }

    // ── Animation targets ──────────────────────────────────────────────

    /// Straight nut → saddle segment for `string_index`.
    pub fn rest_path(&self, string_index: usize) -> Option<Vec<Point>> {
        self.geometry
            .strings
            .get(string_index)
            .map(|line| vec![line.nut, line.saddle])
    }

    pub(crate) fn reset_string_path(&mut self, string_index: usize) {
        if let Some(rest) = self.rest_path(string_index) {
            if let Some(path) = self.string_paths.get_mut(string_index) {
                *path = rest;
            }
        }
    }

    fn reset_all_string_paths(&mut self) {
        self.string_paths = (0..self.geometry.num_strings())
            .filter_map(|i| self.rest_path(i))
            .collect();
    }

    /// Bend `string_index` through `push`: nut → push → saddle.
    pub(crate) fn set_push_point(&mut self, string_index: usize, push: Point) {
        let Some(line) = self.geometry.strings.get(string_index).copied() else {
            warn!("no geometry for string {string_index}");
            return;
        };
        if let Some(path) = self.string_paths.get_mut(string_index) {
            *path = vec![line.nut, push, line.saddle];
        }
    }

    pub(crate) fn set_glyph_motion(&mut self, string_index: usize, fret: u8, offset_y: f64, elevated: bool) {
        if let Some(placed) = self.glyphs.placed_mut(string_index, fret) {
            placed.offset_y = offset_y;
            placed.elevated = elevated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PitchClass, Position};
    use crate::tuning::{c_major_pentatonic, standard_tuning};
    use pretty_assertions::assert_eq;

    fn board() -> BoardState {
        BoardState::new(FretboardConfig::default()).unwrap()
    }

    #[test]
    fn table_is_direct_indexed() {
        let mut table = GlyphTable::new(6, 15);
        assert!(table.insert(NoteGlyph::new(2, 7, PitchClass::D)));
        assert!(!table.insert(NoteGlyph::new(6, 0, PitchClass::E)));
        assert!(!table.insert(NoteGlyph::new(0, 16, PitchClass::G)));
        assert_eq!(table.get(2, 7).map(|g| g.pitch), Some(PitchClass::D));
        assert!(table.get(2, 8).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn resolve_checks_label_and_fret() {
        let tuning = standard_tuning();
        assert_eq!(resolve_note(&tuning, 15, "G", 7), Ok((2, 7)));
        assert_eq!(resolve_note(&tuning, 15, "e", 0), Ok((0, 0)));
        assert_eq!(
            resolve_note(&tuning, 15, "X", 3),
            Err(FretError::UnknownString("X".into()))
        );
        assert_eq!(
            resolve_note(&tuning, 15, "A", 16),
            Err(FretError::FretOutOfRange { fret: 16, max: 15 })
        );
        assert!(resolve_note(&tuning, 15, "A", -1).is_err());
    }

    #[test]
    fn render_scale_replaces_previous_notes() {
        let mut board = board();
        board.render_pattern(&[PatternEntry {
            string_name: "B".into(),
            fret: 2,
            duration: 500,
        }]);
        assert!(board.glyphs().get(1, 2).is_some());

        board.render_scale(&c_major_pentatonic());
        // C# is not in C major pentatonic
        assert!(board.glyphs().get(1, 2).is_none());
        assert!(board.glyphs().iter().all(|g| !g.is_active()));
        assert!(board.scale().is_some());
    }

    #[test]
    fn string_paths_start_straight() {
        let board = board();
        for i in 0..6 {
            let path = board.string_path(i).unwrap();
            assert_eq!(path.len(), 2);
            assert_eq!(path[0].y, path[1].y);
            assert!(path[1].x - path[0].x > 10_000.0);
        }
    }

    #[test]
    fn relayout_rejects_mismatched_grid() {
        let mut board = board();
        let mut layout = board.geometry().layout.clone();
        layout.fret_cells.pop();
        assert!(matches!(board.relayout(layout), Err(FretError::Layout(_))));
    }

    #[test]
    fn relayout_rejects_degenerate_rows() {
        let mut board = board();
        let before = board.geometry().string_y.clone();

        let mut flat = board.geometry().layout.clone();
        flat.row_height = 0.0;
        assert!(matches!(board.relayout(flat), Err(FretError::Layout(_))));

        let mut swapped = board.geometry().layout.clone();
        swapped.row_tops.swap(1, 2);
        assert!(matches!(board.relayout(swapped), Err(FretError::Layout(_))));

        let mut stacked = board.geometry().layout.clone();
        stacked.row_tops[4] = stacked.row_tops[3];
        assert!(matches!(board.relayout(stacked), Err(FretError::Layout(_))));
        assert_eq!(board.geometry().string_y, before);
    }

    #[test]
    fn relayout_moves_strings() {
        let mut board = board();
        let mut layout = board.geometry().layout.clone();
        for top in layout.row_tops.iter_mut() {
            *top += 100.0;
        }
        let before = board.geometry().string_y[0];
        board.relayout(layout).unwrap();
        assert_eq!(board.geometry().string_y[0], before + 100.0);
        assert_eq!(board.string_path(0).unwrap()[0].y, before + 100.0);
    }

    #[test]
    fn title_moves_rows_down_but_keeps_notes() {
        let mut board = board();
        board.render_scale(&c_major_pentatonic());
        let notes = board.glyphs().len();
        let y = board.geometry().string_y[0];
        board.set_title(Some("C Major Pentatonic".into()));
        assert!(board.geometry().string_y[0] > y);
        assert_eq!(board.glyphs().len(), notes);
    }

    #[test]
    fn highlight_through_board_uses_current_scale() {
        let mut board = board();
        let mut scale = c_major_pentatonic();
        scale.positions.insert("low".into(), Position::frets(&[0]));
        board.render_scale(&scale);
        let report = board.apply_highlight(&Selector::Position("low".into()));
        assert!(report.activated > 0);
        assert!(board.glyphs().iter().filter(|g| g.is_active()).all(|g| g.fret == 0));
        board.clear_highlights();
        assert!(board.glyphs().active().is_empty());
    }
}
