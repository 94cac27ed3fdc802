//! Neck rendering: header, grid cells, inlays, fret wires, nut, strings and
//! the fret-number footer.

use crate::config::FretboardConfig;
use crate::model::Tuning;
use super::constants::*;
use super::geometry::Point;
use super::grid::{Grid, InlayKind};
use super::svg_builder::SvgBuilder;

pub(super) fn render_header(svg: &mut SvgBuilder, config: &FretboardConfig, page_width: f64) {
    let center_x = page_width / 2.0;
    let mut y = PAGE_MARGIN_TOP;

    if let Some(ref title) = config.title {
        svg.text(center_x, y + TITLE_HEIGHT / 2.0, title, TITLE_FONT_SIZE, "bold", TEXT_COLOR, "middle");
        y += TITLE_HEIGHT;
    }
    if let Some(ref subtitle) = config.subtitle {
        svg.text(center_x, y + SUBTITLE_HEIGHT / 2.0, subtitle, SUBTITLE_FONT_SIZE, "normal", FRET_NUMBER_COLOR, "middle");
    }
}

/// One addressable cell per (string, fret), label column included.
pub(super) fn render_cells(svg: &mut SvgBuilder, grid: &Grid) {
    let layout = &grid.layout;
    let (label_left, label_right) = layout.label_column;
    for (s, &top) in layout.row_tops.iter().enumerate() {
        svg.cell("string-label", s, 0, label_left, top, label_right - label_left, layout.row_height, LABEL_CELL_COLOR);
        for (i, &(left, right)) in layout.fret_cells.iter().enumerate() {
            svg.cell("fret-cell", s, i as u8 + 1, left, top, right - left, layout.row_height, BOARD_COLOR);
        }
    }
}

/// Single dots sit on the G|D row boundary, doubles on B|G and D|A.
pub(super) fn render_inlays(svg: &mut SvgBuilder, grid: &Grid) {
    let layout = &grid.layout;
    let rows = layout.row_tops.len();
    if rows < 2 {
        return;
    }
    let boundary = |row: usize| layout.row_tops.get(row).copied();
    let middle = rows / 2;

    for inlay in &grid.inlays {
        let Some(x) = layout.fret_center_x(inlay.fret) else {
            continue;
        };
        let ys: Vec<f64> = match inlay.kind {
            InlayKind::Single => boundary(middle).into_iter().collect(),
            InlayKind::Double => [boundary(middle - 1), boundary(middle + 1)]
                .into_iter()
                .flatten()
                .collect(),
        };
        for y in ys {
            svg.circle(x, y, INLAY_RADIUS, INLAY_COLOR, "none", 0.0);
        }
    }
}

pub(super) fn render_frets(svg: &mut SvgBuilder, grid: &Grid) {
    let layout = &grid.layout;
    let Some(&top) = layout.row_tops.first() else {
        return;
    };
    let bottom = grid.rows_bottom();

    for &(_, right) in &layout.fret_cells {
        svg.line(right, top, right, bottom, FRET_WIRE_COLOR, FRET_WIRE_WIDTH);
    }
    let nut_x = layout.first_fret_left();
    svg.line(nut_x, top, nut_x, bottom, NUT_COLOR, NUT_WIDTH);
}

pub(super) fn render_strings(svg: &mut SvgBuilder, tuning: &Tuning, paths: &[&[Point]]) {
    for (i, (spec, points)) in tuning.strings().iter().zip(paths).enumerate() {
        svg.polyline_path(&format!("string-{i}"), points, &spec.color, spec.stroke_width);
    }
}

pub(super) fn render_labels(svg: &mut SvgBuilder, grid: &Grid, tuning: &Tuning) {
    let layout = &grid.layout;
    let Some(x) = layout.fret_center_x(0) else {
        return;
    };
    for (s, spec) in tuning.strings().iter().enumerate() {
        if let Some(y) = layout.row_center(s) {
            svg.text(x, y, &spec.label, LABEL_FONT_SIZE, "bold", TEXT_COLOR, "middle");
        }
    }
}

/// Fret numbers 0..=N under the grid; 0 sits under the label column.
pub(super) fn render_footer(svg: &mut SvgBuilder, grid: &Grid) {
    let layout = &grid.layout;
    let y = grid.rows_bottom() + FOOTER_HEIGHT / 2.0;
    svg.begin_group(None, Some("fret-numbers"), &[]);
    for fret in 0..=layout.num_frets() as u8 {
        if let Some(x) = layout.fret_center_x(fret) {
            svg.text(x, y, &fret.to_string(), FRET_NUMBER_FONT_SIZE, "normal", FRET_NUMBER_COLOR, "middle");
        }
    }
    svg.end_group();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(f: impl FnOnce(&mut SvgBuilder, &Grid)) -> String {
        let grid = Grid::build(&FretboardConfig::default());
        let mut svg = SvgBuilder::new(grid.width, grid.height);
        f(&mut svg, &grid);
        svg.build()
    }

    #[test]
    fn every_cell_is_addressable() {
        let out = rendered(render_cells);
        assert_eq!(out.matches(r#"class="string-label""#).count(), 6);
        assert_eq!(out.matches(r#"class="fret-cell""#).count(), 6 * 15);
        assert!(out.contains(r#"data-string="5" data-fret="15""#));
    }

    #[test]
    fn inlay_dot_count() {
        // 3, 5, 7, 9, 15 single + 12 double
        let out = rendered(render_inlays);
        assert_eq!(out.matches("<circle").count(), 5 + 2);
    }

    #[test]
    fn single_inlay_sits_on_middle_boundary() {
        let grid = Grid::build(&FretboardConfig::default());
        let mut svg = SvgBuilder::new(grid.width, grid.height);
        render_inlays(&mut svg, &grid);
        let x = grid.layout.fret_center_x(3).unwrap();
        let y = grid.layout.row_tops[3];
        let expected = format!(r#"<circle cx="{:.1}" cy="{:.1}""#, x, y);
        assert!(svg.elements.iter().any(|e| e.contains(&expected)));
    }

    #[test]
    fn footer_numbers_run_from_zero() {
        let out = rendered(render_footer);
        assert!(out.contains(">0</text>"));
        assert!(out.contains(">15</text>"));
        assert!(!out.contains(">16</text>"));
    }

    #[test]
    fn wires_and_nut() {
        let out = rendered(render_frets);
        assert_eq!(out.matches("<line").count(), 15 + 1);
        assert!(out.contains(NUT_COLOR));
    }
}
