//! Board geometry: fret widths, string rows, nut and saddle anchor points.
//!
//! The coordinate set produced here is what both the SVG renderer and the
//! bend animator work from. It can be derived either from the renderer's own
//! grid or from an SVG document the host has already laid out.

use serde::Serialize;

use crate::error::{FretError, Result};

/// A point in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width of each fret, `widths[i] = base_width * decay_ratio^i`.
pub fn compute_fret_widths(base_width: f64, decay_ratio: f64, fret_count: usize) -> Vec<f64> {
    (0..fret_count)
        .map(|i| base_width * decay_ratio.powi(i as i32))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Realized grid layout
// ═══════════════════════════════════════════════════════════════════════

/// Realized positions of the rendered grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    /// Left and right x of the open-string label column
    pub label_column: (f64, f64),
    /// Left and right x of frets 1..=N, in fret order
    pub fret_cells: Vec<(f64, f64)>,
    /// Top y of each string row, in string order
    pub row_tops: Vec<f64>,
    pub row_height: f64,
}

impl GridLayout {
    pub fn num_frets(&self) -> usize {
        self.fret_cells.len()
    }

    pub fn first_fret_left(&self) -> f64 {
        self.fret_cells.first().map_or(self.label_column.1, |c| c.0)
    }

    pub fn last_fret_right(&self) -> f64 {
        self.fret_cells.last().map_or(self.label_column.1, |c| c.1)
    }

    pub fn row_center(&self, string_index: usize) -> Option<f64> {
        self.row_tops
            .get(string_index)
            .map(|top| top + self.row_height / 2.0)
    }

    /// Centre x of a fret cell; fret 0 is the label column.
    pub fn fret_center_x(&self, fret: u8) -> Option<f64> {
        if fret == 0 {
            let (l, r) = self.label_column;
            return Some((l + r) / 2.0);
        }
        self.fret_cells
            .get(fret as usize - 1)
            .map(|(l, r)| (l + r) / 2.0)
    }

    /// Read the grid back from a rendered SVG document.
    ///
    /// Looks for `<rect>` cells tagged `data-string`/`data-fret`; fret 0 cells
    /// are the label column.
    pub fn from_svg(svg: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(svg)
            .map_err(|e| FretError::Layout(format!("Failed to parse SVG: {e}")))?;

        let mut label_column: Option<(f64, f64)> = None;
        let mut rows: Vec<(usize, f64, f64)> = Vec::new();
        let mut cells: Vec<(usize, f64, f64)> = Vec::new();

        for node in doc.descendants().filter(|n| n.has_tag_name("rect")) {
            let (Some(string), Some(fret)) = (node.attribute("data-string"), node.attribute("data-fret"))
            else {
                continue;
            };
            let string: usize = parse_attr(string, "data-string")?;
            let fret: usize = parse_attr(fret, "data-fret")?;
            let x: f64 = parse_attr(node.attribute("x").unwrap_or("0"), "x")?;
            let y: f64 = parse_attr(node.attribute("y").unwrap_or("0"), "y")?;
            let width: f64 = parse_attr(node.attribute("width").unwrap_or("0"), "width")?;
            let height: f64 = parse_attr(node.attribute("height").unwrap_or("0"), "height")?;

            if fret == 0 {
                label_column.get_or_insert((x, x + width));
                rows.push((string, y, height));
            } else if string == 0 {
                cells.push((fret, x, x + width));
            }
        }

        let label_column =
            label_column.ok_or_else(|| FretError::Layout("no label column cells found".into()))?;
        if cells.is_empty() {
            return Err(FretError::Layout("no fret cells found".into()));
        }

        rows.sort_by_key(|r| r.0);
        cells.sort_by_key(|c| c.0);
        for (expected, cell) in cells.iter().enumerate() {
            if cell.0 != expected + 1 {
                return Err(FretError::Layout(format!("missing cell for fret {}", expected + 1)));
            }
        }

        let row_height = rows.first().map_or(0.0, |r| r.2);
        Ok(Self {
            label_column,
            fret_cells: cells.into_iter().map(|(_, l, r)| (l, r)).collect(),
            row_tops: rows.into_iter().map(|(_, top, _)| top).collect(),
            row_height,
        })
    }
}

fn parse_attr<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FretError::Layout(format!("bad {name} attribute '{value}'")))
}

// ═══════════════════════════════════════════════════════════════════════
// String geometry
// ═══════════════════════════════════════════════════════════════════════

/// Straight rest position of one string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StringLine {
    pub nut: Point,
    /// Virtual saddle, far to the right of the last fret
    pub saddle: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FretboardGeometry {
    pub fret_widths: Vec<f64>,
    /// Vertical centre of each string row
    pub string_y: Vec<f64>,
    pub strings: Vec<StringLine>,
    pub layout: GridLayout,
}

/// Derive per-string nut and saddle points from a realized layout.
///
/// The saddle is placed `virtual_saddle_distance` past the last fret so a
/// bent string, drawn nut → push point → saddle, keeps a long, stable
/// baseline on the right-hand side.
pub fn compute_string_geometry(layout: &GridLayout, virtual_saddle_distance: f64) -> FretboardGeometry {
    let nut_x = layout.first_fret_left();
    let saddle_x = layout.last_fret_right() + virtual_saddle_distance;

    let string_y: Vec<f64> = (0..layout.row_tops.len())
        .filter_map(|i| layout.row_center(i))
        .collect();
    let strings = string_y
        .iter()
        .map(|&y| StringLine {
            nut: Point::new(nut_x, y),
            saddle: Point::new(saddle_x, y),
        })
        .collect();

    FretboardGeometry {
        fret_widths: layout.fret_cells.iter().map(|(l, r)| r - l).collect(),
        string_y,
        strings,
        layout: layout.clone(),
    }
}

impl FretboardGeometry {
    pub fn num_strings(&self) -> usize {
        self.string_y.len()
    }

    /// Distance from `string_index` down to the string `spacings` rows below it.
    pub fn displacement(&self, string_index: usize, spacings: usize) -> Option<f64> {
        let from = self.string_y.get(string_index)?;
        let to = self.string_y.get(string_index + spacings)?;
        Some(to - from)
    }

    /// Centre of the glyph drawn at (string, fret).
    pub fn note_center(&self, string_index: usize, fret: u8) -> Option<Point> {
        let y = *self.string_y.get(string_index)?;
        let x = self.layout.fret_center_x(fret)?;
        Some(Point::new(x, y))
    }
}
