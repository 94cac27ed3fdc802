//! Fretboard renderer — turns the board state into SVG output.
//!
//! The renderer lays out a label column plus one cell per fret and string,
//! draws inlays, fret wires and the nut, then the strings as animatable
//! paths and the note glyphs on top. Every grid cell carries its
//! `data-string`/`data-fret` address so the realized layout can be read
//! back with [`geometry::GridLayout::from_svg`].

mod constants;
mod svg_builder;
mod grid;
mod neck;
mod notes;
pub mod geometry;

use crate::board::BoardState;
use constants::*;
use svg_builder::{SvgBuilder, empty_svg};
use neck::*;
use notes::render_notes;

pub(crate) use grid::Grid;
pub use grid::{inlay_frets, Inlay, InlayKind};
pub(crate) use notes::{display_glyphs, pattern_glyphs, scale_glyphs};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render the board, including any in-flight bend, into a complete SVG string.
pub fn render_board_to_svg(board: &BoardState) -> String {
    let grid = board.grid();
    if grid.layout.row_tops.is_empty() {
        return empty_svg("No strings to draw");
    }

    let mut svg = SvgBuilder::new(grid.width, grid.height);

    // Background
    svg.rect(0.0, 0.0, grid.width, grid.height, BACKGROUND_COLOR);

    render_header(&mut svg, board.config(), grid.width);

    svg.begin_group(Some("fretboard"), None, &[]);
    render_cells(&mut svg, grid);
    render_inlays(&mut svg, grid);
    render_frets(&mut svg, grid);
    render_labels(&mut svg, grid, board.tuning());
    svg.end_group();

    let paths: Vec<&[geometry::Point]> = (0..board.tuning().len())
        .filter_map(|i| board.string_path(i))
        .collect();
    svg.begin_group(Some("strings"), None, &[]);
    render_strings(&mut svg, board.tuning(), &paths);
    svg.end_group();

    svg.begin_group(Some("notes"), None, &[]);
    render_notes(&mut svg, board.glyphs(), board.geometry(), board.tuning());
    svg.end_group();

    render_footer(&mut svg, grid);

    svg.build()
}
