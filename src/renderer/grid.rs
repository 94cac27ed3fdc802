//! Grid computation: where the label column, fret cells, string rows and
//! inlays sit for a given configuration.

use crate::config::FretboardConfig;
use super::constants::*;
use super::geometry::{compute_fret_widths, GridLayout};

/// Static structure of the board: cells and inlays. Rebuilt only when the
/// fret count or tuning changes.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    pub(crate) layout: GridLayout,
    pub(crate) header_height: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) inlays: Vec<Inlay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlayKind {
    Single,
    Double,
}

/// A fret-marker dot (or pair of dots).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inlay {
    pub fret: u8,
    pub kind: InlayKind,
}

const SINGLE_DOT_FRETS: [u8; 4] = [3, 5, 7, 9];
const DOUBLE_DOT_FRET: u8 = 12;

/// Inlay markers for frets `1..=num_frets`, repeating every octave.
pub fn inlay_frets(num_frets: u8) -> Vec<Inlay> {
    (1..=num_frets)
        .filter_map(|fret| {
            let in_pattern = (fret - 1) % 12 + 1;
            if SINGLE_DOT_FRETS.contains(&in_pattern) {
                Some(Inlay { fret, kind: InlayKind::Single })
            } else if in_pattern == DOUBLE_DOT_FRET {
                Some(Inlay { fret, kind: InlayKind::Double })
            } else {
                None
            }
        })
        .collect()
}

pub(super) fn header_height(config: &FretboardConfig) -> f64 {
    let mut h = PAGE_MARGIN_TOP;
    if config.title.is_some() {
        h += TITLE_HEIGHT;
    }
    if config.subtitle.is_some() {
        h += SUBTITLE_HEIGHT;
    }
    h
}

impl Grid {
    pub(crate) fn build(config: &FretboardConfig) -> Self {
        let widths = compute_fret_widths(
            config.fret_width_base,
            config.fret_width_multiplier,
            config.num_frets as usize,
        );

        let label_left = PAGE_MARGIN_LEFT;
        let label_right = label_left + config.label_width;
        let mut x = label_right;
        let fret_cells = widths
            .iter()
            .map(|w| {
                let cell = (x, x + w);
                x += w;
                cell
            })
            .collect();

        let top = header_height(config);
        let row_tops = (0..config.tuning.len())
            .map(|i| top + i as f64 * config.row_height)
            .collect();

        let layout = GridLayout {
            label_column: (label_left, label_right),
            fret_cells,
            row_tops,
            row_height: config.row_height,
        };
        Self::from_layout(layout, top)
    }

    /// Wrap an already-realized layout, deriving the page extents from it.
    pub(crate) fn from_layout(layout: GridLayout, header_height: f64) -> Self {
        let width = layout.last_fret_right() + PAGE_MARGIN_RIGHT;
        let height = rows_bottom_of(&layout) + FOOTER_HEIGHT + PAGE_MARGIN_BOTTOM;
        let inlays = inlay_frets(layout.num_frets() as u8);
        Self {
            layout,
            header_height,
            width,
            height,
            inlays,
        }
    }

    pub(crate) fn rows_bottom(&self) -> f64 {
        rows_bottom_of(&self.layout)
    }
}

fn rows_bottom_of(layout: &GridLayout) -> f64 {
    layout
        .row_tops
        .last()
        .map_or(0.0, |top| top + layout.row_height)
}
