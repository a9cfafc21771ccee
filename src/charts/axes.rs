use crate::canvas::{Anchor, Paint, Region, TextStyle};
use crate::figure::Figure;

/// A category/value plot area: categorical x positions, linear y scale.
/// Spines are drawn matplotlib-despined (left + bottom only).
#[derive(Debug, Clone, Copy)]
pub struct Cartesian {
    pub plot: Region,
    pub y_min: f64,
    pub y_max: f64,
}

impl Cartesian {
    pub fn new(plot: Region, y_min: f64, y_max: f64) -> Self {
        let (y_min, y_max) = if (y_max - y_min).abs() < f64::EPSILON {
            (y_min, y_min + 1.0)
        } else {
            (y_min, y_max)
        };
        Self { plot, y_min, y_max }
    }

    /// Scale that starts at zero and leaves headroom for value labels.
    pub fn for_counts(plot: Region, max_count: f64) -> Self {
        Self::new(plot, 0.0, (max_count * 1.15).max(1.0))
    }

    pub fn y(&self, value: f64) -> f32 {
        let t = (value - self.y_min) / (self.y_max - self.y_min);
        self.plot.bottom() - (t as f32) * self.plot.height
    }

    /// Inverse direction, for horizontal bar charts mapping value -> x.
    pub fn x(&self, value: f64) -> f32 {
        let t = (value - self.y_min) / (self.y_max - self.y_min);
        self.plot.x + (t as f32) * self.plot.width
    }

    pub fn slot_width(&self, n: usize) -> f32 {
        self.plot.width / n.max(1) as f32
    }

    pub fn slot_center(&self, idx: usize, n: usize) -> f32 {
        self.plot.x + (idx as f32 + 0.5) * self.slot_width(n)
    }

    /// Horizontal layout: row center for the idx-th of n rows.
    pub fn row_center(&self, idx: usize, n: usize) -> f32 {
        let slot = self.plot.height / n.max(1) as f32;
        self.plot.y + (idx as f32 + 0.5) * slot
    }

    pub fn draw_frame(&self, fig: &mut Figure<'_>) {
        let axis = Paint::stroke(&fig.cfg.theme.axis_color, 1.2);
        fig.canvas.line(
            self.plot.x,
            self.plot.y,
            self.plot.x,
            self.plot.bottom(),
            &axis,
        );
        fig.canvas.line(
            self.plot.x,
            self.plot.bottom(),
            self.plot.right(),
            self.plot.bottom(),
            &axis,
        );
    }

    /// Baseline only, for despined horizontal charts.
    pub fn draw_baseline(&self, fig: &mut Figure<'_>) {
        let axis = Paint::stroke(&fig.cfg.theme.axis_color, 1.2);
        fig.canvas.line(
            self.plot.x,
            self.plot.bottom(),
            self.plot.right(),
            self.plot.bottom(),
            &axis,
        );
    }

    pub fn draw_y_ticks(&self, fig: &mut Figure<'_>, count: usize) {
        let style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color)
            .anchored(Anchor::End);
        let grid = Paint::stroke(&fig.cfg.theme.grid_color, 0.7)
            .dashed("4 3")
            .with_opacity(0.5);
        for i in 0..=count {
            let value = self.y_min + (self.y_max - self.y_min) * i as f64 / count as f64;
            let y = self.y(value);
            if i > 0 {
                fig.canvas.line(self.plot.x, y, self.plot.right(), y, &grid);
            }
            fig.canvas.text(
                self.plot.x - 6.0,
                y + style.size * 0.35,
                &format_tick(value),
                &style,
            );
        }
    }

    /// Vertical dashed gridlines + tick labels along the bottom, for
    /// horizontal bar charts.
    pub fn draw_x_ticks(&self, fig: &mut Figure<'_>, count: usize) {
        let style =
            TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color).centered();
        let grid = Paint::stroke(&fig.cfg.theme.grid_color, 0.7)
            .dashed("4 3")
            .with_opacity(0.5);
        for i in 0..=count {
            let value = self.y_min + (self.y_max - self.y_min) * i as f64 / count as f64;
            let x = self.x(value);
            if i > 0 {
                fig.canvas.line(x, self.plot.y, x, self.plot.bottom(), &grid);
            }
            fig.canvas.text(
                x,
                self.plot.bottom() + style.size + 4.0,
                &format_tick(value),
                &style,
            );
        }
    }

    pub fn draw_category_labels(&self, fig: &mut Figure<'_>, labels: &[&str], rotate: bool) {
        let base = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color);
        for (idx, label) in labels.iter().enumerate() {
            let x = self.slot_center(idx, labels.len());
            let y = self.plot.bottom() + base.size + 6.0;
            let style = if rotate {
                base.clone().anchored(Anchor::End).rotated(-30.0)
            } else {
                base.clone().centered()
            };
            fig.canvas.text(x, y, label, &style);
        }
    }

    pub fn draw_row_labels(&self, fig: &mut Figure<'_>, labels: &[&str]) {
        let style = TextStyle::new(fig.cfg.theme.label_size + 1.0, &fig.cfg.theme.text_color)
            .anchored(Anchor::End);
        for (idx, label) in labels.iter().enumerate() {
            let y = self.row_center(idx, labels.len());
            fig.canvas
                .text(self.plot.x - 8.0, y + style.size * 0.35, label, &style);
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 10.0 || value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Axis title below the plot.
pub fn x_axis_title(fig: &mut Figure<'_>, plot: Region, text: &str) {
    let style = TextStyle::new(fig.cfg.theme.font_size, &fig.cfg.theme.text_color)
        .bold()
        .centered();
    fig.canvas
        .text(plot.cx(), plot.bottom() + 36.0, text, &style);
}

/// Axis title rotated along the left edge.
pub fn y_axis_title(fig: &mut Figure<'_>, plot: Region, text: &str) {
    let style = TextStyle::new(fig.cfg.theme.font_size, &fig.cfg.theme.text_color)
        .bold()
        .centered()
        .rotated(-90.0);
    fig.canvas.text(plot.x - 38.0, plot.cy(), text, &style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_maps_range_onto_plot() {
        let plot = Region::new(0.0, 0.0, 100.0, 200.0);
        let axes = Cartesian::new(plot, 0.0, 10.0);
        assert_eq!(axes.y(0.0), 200.0);
        assert_eq!(axes.y(10.0), 0.0);
        assert_eq!(axes.y(5.0), 100.0);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let plot = Region::new(0.0, 0.0, 100.0, 100.0);
        let axes = Cartesian::new(plot, 3.0, 3.0);
        assert!(axes.y_max > axes.y_min);
    }

    #[test]
    fn slots_partition_the_width() {
        let plot = Region::new(10.0, 0.0, 90.0, 50.0);
        let axes = Cartesian::new(plot, 0.0, 1.0);
        assert_eq!(axes.slot_center(0, 3), 25.0);
        assert_eq!(axes.slot_center(2, 3), 85.0);
    }
}
