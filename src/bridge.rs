//! Host bridge: the entry points an embedding application calls.
//!
//! [`HostBridge`] mirrors what a playback controller sends while a lesson
//! runs: load a pattern, light notes up, clear them, bend a string. None of
//! these return errors; bad input is logged and ignored so playback never
//! stops on a malformed message. [`FretboardController`] implements the
//! trait on top of the board and the bend animator, and exposes `try_*`
//! variants for callers that want the error instead of a log line.

use log::{debug, error, warn};

use crate::animation::{plan_bend, Animator};
use crate::board::BoardState;
use crate::config::FretboardConfig;
use crate::error::{FretError, Result};
use crate::highlight::{HighlightReport, Selector};
use crate::model::{DisplayNote, NoteRef, PatternEntry};
use crate::renderer::geometry::GridLayout;
use crate::tuning::scale_by_name;

/// The five messages a playback controller sends to the fretboard.
pub trait HostBridge {
    /// Replace the board contents with a serialized pattern
    /// (`[{"stringName", "fret", "duration"}]`). All notes start faded.
    fn load_scale_pattern(&mut self, json: &str);

    /// Make exactly one note active.
    fn highlight_note(&mut self, string_name: &str, fret: i64);

    /// Make exactly the listed notes active (`[{"stringName", "fret"}]`).
    fn highlight_notes(&mut self, json: &str);

    fn clear_note_highlights(&mut self);

    /// Bend `string_index` (0 = high e) at `fret` by 1 or 2 halftones.
    fn handle_bend_request(&mut self, string_index: i64, fret: i64, halftones: i64);
}

fn decode<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Owns the board, the animator and the host clock.
pub struct FretboardController {
    board: BoardState,
    animator: Animator,
    clock_ms: f64,
}

impl FretboardController {
    pub fn new(config: FretboardConfig) -> Result<Self> {
        Ok(Self {
            board: BoardState::new(config)?,
            animator: Animator::new(),
            clock_ms: 0.0,
        })
    }

    pub fn from_json(config_json: &str) -> Result<Self> {
        Self::new(FretboardConfig::from_json(config_json)?)
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Time of the most recent `tick`. Stale once the animator goes idle.
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    // ── Drawing ────────────────────────────────────────────────────────

    /// Full redraws invalidate every glyph a running bend points at.
    fn before_redraw(&mut self) {
        self.animator.cancel_all(&mut self.board);
    }

    pub fn try_load_scale_pattern(&mut self, json: &str) -> Result<usize> {
        let entries: Vec<PatternEntry> = decode(json)?;
        self.before_redraw();
        Ok(self.board.render_pattern(&entries))
    }

    /// Draw a built-in scale by name.
    pub fn load_scale(&mut self, name: &str) -> Result<()> {
        let scale = scale_by_name(name)?;
        self.before_redraw();
        self.board.render_scale(&scale);
        Ok(())
    }

    pub fn try_display_notes(&mut self, json: &str) -> Result<usize> {
        let notes: Vec<DisplayNote> = decode(json)?;
        self.before_redraw();
        Ok(self.board.display_notes(&notes))
    }

    pub fn display_notes(&mut self, json: &str) {
        if let Err(e) = self.try_display_notes(json) {
            error!("display_notes ignored: {e}");
        }
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.before_redraw();
        self.board.set_title(title);
    }

    pub fn set_subtitle(&mut self, subtitle: Option<String>) {
        self.before_redraw();
        self.board.set_subtitle(subtitle);
    }

    pub fn reconfigure(&mut self, config: FretboardConfig) -> Result<()> {
        config.validate()?;
        self.before_redraw();
        self.board.reconfigure(config)
    }

    /// Adopt the grid positions the host actually laid out.
    pub fn relayout(&mut self, layout: GridLayout) -> Result<()> {
        self.before_redraw();
        self.board.relayout(layout)
    }

    pub fn relayout_from_svg(&mut self, svg: &str) -> Result<()> {
        let layout = GridLayout::from_svg(svg)?;
        self.relayout(layout)
    }

    pub fn render_svg(&self) -> String {
        self.board.to_svg()
    }

    // ── Highlighting ───────────────────────────────────────────────────

    pub fn try_highlight_note(&mut self, string_name: &str, fret: i64) -> Result<HighlightReport> {
        self.board.resolve(string_name, fret)?;
        Ok(self
            .board
            .apply_highlight(&Selector::Notes(vec![NoteRef::new(string_name, fret)])))
    }

    pub fn try_highlight_notes(&mut self, json: &str) -> Result<HighlightReport> {
        let notes: Vec<NoteRef> = decode(json)?;
        Ok(self.board.apply_highlight(&Selector::Notes(notes)))
    }

    /// Activate one named position of the current scale.
    pub fn try_highlight_position(&mut self, name: &str) -> Result<HighlightReport> {
        let scale = self.board.scale().ok_or_else(|| FretError::UnknownPosition {
            scale: String::new(),
            position: name.to_string(),
        })?;
        if scale.position(name).is_none() {
            return Err(FretError::UnknownPosition {
                scale: scale.name.clone(),
                position: name.to_string(),
            });
        }
        Ok(self.board.apply_highlight(&Selector::Position(name.to_string())))
    }

    /// Activate every note in any of the named positions; unknown names are skipped.
    pub fn highlight_positions<S: AsRef<str>>(&mut self, names: &[S]) -> HighlightReport {
        let names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self.board.apply_highlight(&Selector::Positions(names))
    }

    // ── Bends ──────────────────────────────────────────────────────────

    pub fn try_handle_bend_request(&mut self, string_index: i64, fret: i64, halftones: i64) -> Result<()> {
        let plan = plan_bend(&self.board, string_index, fret, halftones)?;
        if self.board.glyphs().get(plan.primary.string_index, plan.primary.fret).is_none() {
            debug!("bending string {string_index} at fret {fret} with no note drawn there");
        }
        // An idle host stops ticking, so the clock is only current while
        // something is already moving.
        if self.animator.is_idle() {
            self.animator.start_on_next_tick(plan, &mut self.board);
        } else {
            self.animator.start(plan, self.clock_ms, &mut self.board);
        }
        Ok(())
    }

    /// Advance the clock and every running bend. Returns true while a bend
    /// is still moving, so the host knows to keep requesting frames.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.clock_ms = now_ms;
        self.animator.tick(now_ms, &mut self.board)
    }
}

impl HostBridge for FretboardController {
    fn load_scale_pattern(&mut self, json: &str) {
        if let Err(e) = self.try_load_scale_pattern(json) {
            error!("load_scale_pattern ignored: {e}");
        }
    }

    fn highlight_note(&mut self, string_name: &str, fret: i64) {
        if let Err(e) = self.try_highlight_note(string_name, fret) {
            warn!("highlight_note ignored: {e}");
        }
    }

    fn highlight_notes(&mut self, json: &str) {
        if let Err(e) = self.try_highlight_notes(json) {
            error!("highlight_notes ignored: {e}");
        }
    }

    fn clear_note_highlights(&mut self) {
        self.board.clear_highlights();
    }

    fn handle_bend_request(&mut self, string_index: i64, fret: i64, halftones: i64) {
        if let Err(e) = self.try_handle_bend_request(string_index, fret, halftones) {
            error!("Bend request rejected: {e}");
        }
    }
}
