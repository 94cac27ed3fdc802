//! Shared constants for the fretboard renderer (all in SVG user units).

// ── Page & margins ──────────────────────────────────────────────────
pub(super) const PAGE_MARGIN_LEFT: f64 = 16.0;
pub(super) const PAGE_MARGIN_RIGHT: f64 = 16.0;
pub(super) const PAGE_MARGIN_TOP: f64 = 16.0;
pub(super) const PAGE_MARGIN_BOTTOM: f64 = 12.0;

// ── Header ──────────────────────────────────────────────────────────
pub(super) const TITLE_HEIGHT: f64 = 30.0;
pub(super) const SUBTITLE_HEIGHT: f64 = 20.0;
pub(super) const TITLE_FONT_SIZE: f64 = 20.0;
pub(super) const SUBTITLE_FONT_SIZE: f64 = 13.0;

// ── Grid ────────────────────────────────────────────────────────────
pub(super) const FOOTER_HEIGHT: f64 = 24.0; // fret-number row
pub(super) const FRET_WIRE_WIDTH: f64 = 2.0;
pub(super) const NUT_WIDTH: f64 = 6.0;
pub(super) const INLAY_RADIUS: f64 = 6.0;
pub(super) const LABEL_FONT_SIZE: f64 = 14.0;
pub(super) const FRET_NUMBER_FONT_SIZE: f64 = 11.0;

// ── Notes ───────────────────────────────────────────────────────────
pub(super) const NOTE_RADIUS_RATIO: f64 = 0.38; // of the row height
pub(super) const NOTE_FONT_SIZE: f64 = 12.0;
pub(super) const NOTE_OUTLINE_WIDTH: f64 = 1.0;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const BACKGROUND_COLOR: &str = "#ffffff";
pub(super) const BOARD_COLOR: &str = "#f4e4c8";
pub(super) const LABEL_CELL_COLOR: &str = "#ffffff";
pub(super) const FRET_WIRE_COLOR: &str = "#9a9a9a";
pub(super) const NUT_COLOR: &str = "#3a3a3a";
pub(super) const INLAY_COLOR: &str = "#c9b38f";
pub(super) const TEXT_COLOR: &str = "#1a1a1a";
pub(super) const FRET_NUMBER_COLOR: &str = "#666666";
pub(super) const NOTE_TEXT_COLOR: &str = "#ffffff";
pub(super) const NOTE_OUTLINE_COLOR: &str = "#222222";
pub(super) const FADED_NOTE_COLOR: &str = "#d5d5d5";
pub(super) const FADED_TEXT_COLOR: &str = "#8a8a8a";

// Degree colours
pub(super) const ROOT_COLOR: &str = "#e74c3c";
pub(super) const THIRD_COLOR: &str = "#ff8c00";
pub(super) const FIFTH_COLOR: &str = "#ffd700";
pub(super) const DEFAULT_NOTE_COLOR: &str = "#444444";
pub(super) const HIGHLIGHT_CLASS_COLOR: &str = "#2e86de";
