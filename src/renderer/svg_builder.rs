//! SVG builder — accumulates SVG elements and produces the final string.

use super::geometry::Point;

pub(super) struct SvgBuilder {
    pub(super) elements: Vec<String>,
    width: f64,
    height: f64,
    depth: usize,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            depth: 0,
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="fretboard-diagram" viewBox="0 0 {:.1} {:.1}" width="{:.1}" height="{:.1}" style="font-family: 'Helvetica Neue', Arial, sans-serif;">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn push(&mut self, element: String) {
        let indent = "  ".repeat(self.depth + 1);
        self.elements.push(format!("{indent}{element}"));
    }

    /// Open a `<g>` element; every call must be paired with `end_group`.
    pub(super) fn begin_group(&mut self, id: Option<&str>, class: Option<&str>, attrs: &[(&str, String)]) {
        let mut tag = String::from("<g");
        if let Some(id) = id {
            tag.push_str(&format!(r#" id="{}""#, escape(id)));
        }
        if let Some(class) = class {
            tag.push_str(&format!(r#" class="{}""#, escape(class)));
        }
        for (name, value) in attrs {
            tag.push_str(&format!(r#" {}="{}""#, name, escape(value)));
        }
        tag.push('>');
        self.push(tag);
        self.depth += 1;
    }

    pub(super) fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push("</g>".to_string());
    }

    pub(super) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, fill
        ));
    }

    /// A grid cell carrying its (string, fret) address so the layout can be
    /// read back from the document.
    pub(super) fn cell(&mut self, class: &str, string_index: usize, fret: u8, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.push(format!(
            r#"<rect class="{}" data-string="{}" data-fret="{}" x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="{}"/>"#,
            class, string_index, fret, x, y, w, h, fill
        ));
    }

    pub(super) fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: &str, stroke_width: f64) {
        if stroke_width > 0.0 {
            self.push(format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
                cx, cy, r, fill, stroke, stroke_width
            ));
        } else {
            self.push(format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                cx, cy, r, fill
            ));
        }
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, size: f64, weight: &str, fill: &str, anchor: &str) {
        self.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" font-weight="{}" fill="{}" text-anchor="{}" dominant-baseline="central">{}</text>"#,
            x, y, size, weight, fill, anchor, escape(content)
        ));
    }

    /// An open polyline with an id, used for the animatable strings.
    pub(super) fn polyline_path(&mut self, id: &str, points: &[Point], stroke: &str, stroke_width: f64) {
        self.push(format!(
            r#"<path id="{}" d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            escape(id),
            path_data(points),
            stroke,
            stroke_width
        ));
    }
}

/// `M x,y L x,y ...` path data through `points`.
pub(crate) fn path_data(points: &[Point]) -> String {
    let mut d = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{:.1},{:.1}", p.x, p.y));
    }
    d
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ═══════════════════════════════════════════════════════════════════════
// Empty SVG fallback
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn empty_svg(message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 100\">\
         <text x=\"200\" y=\"50\" text-anchor=\"middle\" font-size=\"14\" fill=\"gray\">{}</text>\
         </svg>",
        escape(message)
    )
}
