use std::fmt::Write as _;

/// Fill/stroke styling for a single SVG element.
#[derive(Debug, Clone, Default)]
pub struct Paint {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub opacity: f32,
    pub dash: Option<String>,
    pub round_cap: bool,
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            opacity: 1.0,
            ..Self::default()
        }
    }

    pub fn stroke(color: impl Into<String>, width: f32) -> Self {
        Self {
            stroke: Some(color.into()),
            stroke_width: width,
            opacity: 1.0,
            ..Self::default()
        }
    }

    pub fn outlined(self, color: impl Into<String>, width: f32) -> Self {
        Self {
            stroke: Some(color.into()),
            stroke_width: width,
            ..self
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn dashed(mut self, pattern: impl Into<String>) -> Self {
        self.dash = Some(pattern.into());
        self
    }

    pub fn rounded(mut self) -> Self {
        self.round_cap = true;
        self
    }

    fn attrs(&self) -> String {
        let mut out = String::new();
        match &self.fill {
            Some(color) => {
                let _ = write!(out, " fill=\"{color}\"");
            }
            None => out.push_str(" fill=\"none\""),
        }
        if let Some(color) = &self.stroke {
            let _ = write!(
                out,
                " stroke=\"{color}\" stroke-width=\"{:.2}\"",
                self.stroke_width
            );
        }
        if let Some(dash) = &self.dash {
            let _ = write!(out, " stroke-dasharray=\"{dash}\"");
        }
        if self.round_cap {
            out.push_str(" stroke-linecap=\"round\"");
        }
        if self.opacity < 1.0 {
            let _ = write!(out, " opacity=\"{:.3}\"", self.opacity);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f32,
    pub color: String,
    pub anchor: Anchor,
    pub bold: bool,
    pub italic: bool,
    /// Rotation in degrees around the text anchor point.
    pub rotate: Option<f32>,
}

impl TextStyle {
    pub fn new(size: f32, color: impl Into<String>) -> Self {
        Self {
            size,
            color: color.into(),
            anchor: Anchor::Start,
            bold: false,
            italic: false,
            rotate: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn centered(self) -> Self {
        self.anchored(Anchor::Middle)
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// Angle convention shared by the polar charts: 0 at twelve o'clock,
/// increasing clockwise, in radians.
pub fn polar_point(cx: f32, cy: f32, r: f32, angle: f32) -> (f32, f32) {
    (cx + r * angle.sin(), cy - r * angle.cos())
}

/// A rectangular target area. Panel draw functions are written against a
/// region, so the same code renders standalone exports and composite panels.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn cx(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn cy(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn inset(&self, margin: f32) -> Self {
        self.inset_xy(margin, margin)
    }

    pub fn inset_xy(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - dx * 2.0).max(0.0),
            height: (self.height - dy * 2.0).max(0.0),
        }
    }

    /// Row-major equal-cell grid with fixed gaps.
    pub fn grid(&self, rows: usize, cols: usize, hgap: f32, vgap: f32) -> Vec<Self> {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let cell_w = (self.width - hgap * (cols - 1) as f32) / cols as f32;
        let cell_h = (self.height - vgap * (rows - 1) as f32) / rows as f32;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Self {
                    x: self.x + col as f32 * (cell_w + hgap),
                    y: self.y + row as f32 * (cell_h + vgap),
                    width: cell_w,
                    height: cell_h,
                });
            }
        }
        cells
    }

    /// Horizontal split into weighted columns.
    pub fn split_h(&self, weights: &[f32], gap: f32) -> Vec<Self> {
        let total: f32 = weights.iter().sum();
        let avail = self.width - gap * (weights.len().saturating_sub(1)) as f32;
        let mut x = self.x;
        weights
            .iter()
            .map(|w| {
                let width = avail * w / total;
                let cell = Self {
                    x,
                    y: self.y,
                    width,
                    height: self.height,
                };
                x += width + gap;
                cell
            })
            .collect()
    }

    /// Vertical split into weighted rows.
    pub fn split_v(&self, weights: &[f32], gap: f32) -> Vec<Self> {
        let total: f32 = weights.iter().sum();
        let avail = self.height - gap * (weights.len().saturating_sub(1)) as f32;
        let mut y = self.y;
        weights
            .iter()
            .map(|w| {
                let height = avail * w / total;
                let cell = Self {
                    x: self.x,
                    y,
                    width: self.width,
                    height,
                };
                y += height + gap;
                cell
            })
            .collect()
    }
}

/// String-assembled SVG document, one element per primitive call.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f32,
    height: f32,
    font_family: String,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f32, height: f32, background: &str, font_family: &str) -> Self {
        let mut canvas = Self {
            width: width.max(1.0),
            height: height.max(1.0),
            font_family: font_family.to_string(),
            body: String::new(),
        };
        canvas.rect(
            0.0,
            0.0,
            canvas.width,
            canvas.height,
            &Paint::fill(background),
        );
        canvas
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn frame(&self) -> Region {
        Region::new(0.0, 0.0, self.width, self.height)
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        let _ = write!(
            self.body,
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\"{}/>",
            w.max(0.0),
            h.max(0.0),
            paint.attrs()
        );
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, paint: &Paint) {
        let _ = write!(
            self.body,
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius:.2}\" ry=\"{radius:.2}\"{}/>",
            w.max(0.0),
            h.max(0.0),
            paint.attrs()
        );
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: &Paint) {
        let _ = write!(
            self.body,
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\"{}/>",
            r.max(0.0),
            paint.attrs()
        );
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, paint: &Paint) {
        let _ = write!(
            self.body,
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\"{}/>",
            paint.attrs()
        );
    }

    pub fn polyline(&mut self, points: &[(f32, f32)], paint: &Paint) {
        if points.len() < 2 {
            return;
        }
        let _ = write!(
            self.body,
            "<polyline points=\"{}\"{}/>",
            points_attr(points),
            paint.attrs()
        );
    }

    pub fn polygon(&mut self, points: &[(f32, f32)], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let _ = write!(
            self.body,
            "<polygon points=\"{}\"{}/>",
            points_attr(points),
            paint.attrs()
        );
    }

    pub fn path(&mut self, d: &str, paint: &Paint) {
        let _ = write!(self.body, "<path d=\"{d}\"{}/>", paint.attrs());
    }

    /// Donut/pie wedge between two clockwise-from-north angles (radians).
    /// `r_inner == 0` degenerates to a plain pie wedge.
    pub fn annular_sector(
        &mut self,
        cx: f32,
        cy: f32,
        r_outer: f32,
        r_inner: f32,
        start: f32,
        end: f32,
        paint: &Paint,
    ) {
        let span = (end - start).abs();
        if span <= f32::EPSILON || r_outer <= 0.0 {
            return;
        }
        // A full circle has coincident endpoints; split it into two arcs.
        if span >= std::f32::consts::TAU - 1e-4 {
            let mid = start + span / 2.0;
            self.annular_sector(cx, cy, r_outer, r_inner, start, mid, paint);
            self.annular_sector(cx, cy, r_outer, r_inner, mid, end, paint);
            return;
        }
        let large = if span > std::f32::consts::PI { 1 } else { 0 };
        let (ox0, oy0) = polar_point(cx, cy, r_outer, start);
        let (ox1, oy1) = polar_point(cx, cy, r_outer, end);
        let mut d = format!(
            "M {ox0:.2} {oy0:.2} A {r:.2} {r:.2} 0 {large} 1 {ox1:.2} {oy1:.2}",
            r = r_outer
        );
        if r_inner > 0.0 {
            let (ix0, iy0) = polar_point(cx, cy, r_inner, start);
            let (ix1, iy1) = polar_point(cx, cy, r_inner, end);
            let _ = write!(
                d,
                " L {ix1:.2} {iy1:.2} A {r:.2} {r:.2} 0 {large} 0 {ix0:.2} {iy0:.2} Z",
                r = r_inner
            );
        } else {
            let _ = write!(d, " L {cx:.2} {cy:.2} Z");
        }
        self.path(&d, paint);
    }

    pub fn text(&mut self, x: f32, y: f32, content: &str, style: &TextStyle) {
        let mut attrs = format!(
            " font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\" text-anchor=\"{}\"",
            escape_xml(&self.font_family),
            style.size,
            style.color,
            style.anchor.as_svg()
        );
        if style.bold {
            attrs.push_str(" font-weight=\"bold\"");
        }
        if style.italic {
            attrs.push_str(" font-style=\"italic\"");
        }
        if let Some(degrees) = style.rotate {
            let _ = write!(attrs, " transform=\"rotate({degrees:.1} {x:.2} {y:.2})\"");
        }
        let _ = write!(
            self.body,
            "<text x=\"{x:.2}\" y=\"{y:.2}\"{attrs}>{}</text>",
            escape_xml(content)
        );
    }

    pub fn into_svg(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">{}</svg>",
            self.body,
            w = self.width,
            h = self.height,
        )
    }
}

fn points_attr(points: &[(f32, f32)]) -> String {
    let mut out = String::with_capacity(points.len() * 12);
    for (idx, (x, y)) in points.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{x:.2},{y:.2}");
    }
    out
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_produces_well_formed_document() {
        let mut canvas = SvgCanvas::new(320.0, 200.0, "#FFFFFF", "Arial");
        canvas.circle(10.0, 10.0, 4.0, &Paint::fill("#123456"));
        canvas.text(20.0, 20.0, "a < b", &TextStyle::new(12.0, "#333333"));
        let svg = canvas.into_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("a &lt; b"));
        assert!(svg.contains("viewBox=\"0 0 320 200\""));
    }

    #[test]
    fn grid_tiles_the_region_exactly() {
        let region = Region::new(0.0, 0.0, 110.0, 50.0);
        let cells = region.grid(1, 2, 10.0, 0.0);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].width, 50.0);
        assert_eq!(cells[1].x, 60.0);
        assert_eq!(cells[1].right(), 110.0);
    }

    #[test]
    fn weighted_split_respects_ratios() {
        let region = Region::new(0.0, 0.0, 100.0, 40.0);
        let cols = region.split_h(&[3.0, 1.0], 0.0);
        assert_eq!(cols[0].width, 75.0);
        assert_eq!(cols[1].width, 25.0);
    }

    #[test]
    fn full_circle_sector_is_split_into_two_arcs() {
        let mut canvas = SvgCanvas::new(100.0, 100.0, "#FFFFFF", "Arial");
        canvas.annular_sector(
            50.0,
            50.0,
            40.0,
            20.0,
            0.0,
            std::f32::consts::TAU,
            &Paint::fill("#B6B3D6"),
        );
        let svg = canvas.into_svg();
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn polar_zero_points_north() {
        let (x, y) = polar_point(0.0, 0.0, 10.0, 0.0);
        assert!((x - 0.0).abs() < 1e-4);
        assert!((y + 10.0).abs() < 1e-4);
    }
}
