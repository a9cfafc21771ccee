pub mod axes;
pub mod channels;
pub mod comparison;
pub mod demographics;
pub mod distributions;
pub mod flows;
pub mod heatmap;
pub mod knowledge;
pub mod overview;
pub mod paths;
pub mod pca;
pub mod recognition;
pub mod regression;
pub mod relations;
pub mod risk;
pub mod suite;
pub mod trust;
pub mod vehicle;

use crate::canvas::{polar_point, Anchor, Paint, Region, TextStyle};
use crate::figure::Figure;
use axes::Cartesian;
use std::f32::consts::TAU;

/// One labelled, colored quantity - the unit all categorical idioms share.
#[derive(Debug, Clone)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

impl Slice {
    pub fn new(label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: color.into(),
        }
    }
}

pub(crate) fn fmt_count_pct(count: f64, total: f64, decimals: usize) -> String {
    let pct = if total > 0.0 {
        count / total * 100.0
    } else {
        0.0
    };
    format!("{count:.0} ({pct:.decimals$}%)")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DonutLabels {
    /// Leader lines to boxed labels outside the ring.
    Callout,
    /// Bold white percentage inside each sufficiently large slice.
    PercentInside,
    None,
}

/// Donut chart with optional center statistic, clockwise from north.
pub(crate) fn draw_donut(
    fig: &mut Figure<'_>,
    region: Region,
    slices: &[Slice],
    center: Option<(&str, &str)>,
    labels: DonutLabels,
) {
    let donut = fig.cfg.layout.donut.clone();
    let total: f64 = slices.iter().map(|s| s.value.max(0.0)).sum();
    if total <= 0.0 {
        fig.placeholder(region, "No responses");
        return;
    }
    let cx = region.cx();
    let cy = region.cy();
    let reserve = if labels == DonutLabels::Callout {
        0.62
    } else {
        0.82
    };
    let r_outer = region.width.min(region.height) / 2.0 * reserve;
    let r_inner = r_outer * (1.0 - donut.ring_fraction);

    let mut angle = 0.0f32;
    for slice in slices {
        let span = (slice.value.max(0.0) / total) as f32 * TAU;
        if span <= 0.0 {
            continue;
        }
        let paint = Paint::fill(&slice.color)
            .outlined(&donut.slice_stroke, donut.slice_stroke_width);
        fig.canvas
            .annular_sector(cx, cy, r_outer, r_inner, angle, angle + span, &paint);
        let mid = angle + span / 2.0;
        let pct = slice.value / total * 100.0;
        match labels {
            DonutLabels::PercentInside => {
                if pct >= 4.0 {
                    let (tx, ty) = polar_point(cx, cy, (r_outer + r_inner) / 2.0, mid);
                    fig.canvas.text(
                        tx,
                        ty + 3.0,
                        &format!("{pct:.1}%"),
                        &TextStyle::new(fig.cfg.theme.label_size, "#FFFFFF")
                            .bold()
                            .centered(),
                    );
                }
            }
            DonutLabels::Callout => {
                let (ex, ey) = polar_point(cx, cy, r_outer * 0.98, mid);
                let (lx, ly) = polar_point(cx, cy, r_outer * donut.callout_offset, mid);
                fig.canvas
                    .line(ex, ey, lx, ly, &Paint::stroke("#CCCCCC", 1.0));
                let on_right = lx >= cx;
                let anchor = if on_right { Anchor::Start } else { Anchor::End };
                let tx = lx + if on_right { 3.0 } else { -3.0 };
                let style =
                    TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color)
                        .anchored(anchor);
                fig.canvas.text(tx, ly - 2.0, &slice.label, &style);
                fig.canvas.text(
                    tx,
                    ly + style.size,
                    &fmt_count_pct(slice.value, total, 1),
                    &style,
                );
            }
            DonutLabels::None => {}
        }
        angle += span;
    }

    if let Some((big, small)) = center {
        fig.canvas.text(
            cx,
            cy - 2.0,
            big,
            &TextStyle::new(fig.cfg.theme.title_size + 6.0, &fig.cfg.theme.text_color)
                .bold()
                .centered(),
        );
        fig.canvas.text(
            cx,
            cy + fig.cfg.theme.font_size + 2.0,
            small,
            &TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_muted).centered(),
        );
    }
}

/// Horizontal lollipop: stem + dot per row, count and share to the right.
pub(crate) fn draw_lollipop(fig: &mut Figure<'_>, region: Region, slices: &[Slice], total: f64) {
    let plot = Region::new(
        region.x + region.width * 0.30,
        region.y,
        region.width * 0.52,
        region.height,
    );
    let max = slices.iter().map(|s| s.value).fold(0.0f64, f64::max);
    let axes = Cartesian::new(plot, 0.0, (max * 1.05).max(1.0));
    let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
    axes.draw_row_labels(fig, &labels);
    let value_style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color).bold();
    for (idx, slice) in slices.iter().enumerate() {
        let y = axes.row_center(idx, slices.len());
        let x_end = axes.x(slice.value);
        fig.canvas.line(
            plot.x,
            y,
            x_end,
            y,
            &Paint::stroke(&slice.color, 3.0).with_opacity(0.8).rounded(),
        );
        fig.canvas.circle(
            x_end,
            y,
            6.0,
            &Paint::fill(&slice.color).outlined("#FFFFFF", 2.0),
        );
        fig.canvas.text(
            x_end + 10.0,
            y + value_style.size * 0.35,
            &fmt_count_pct(slice.value, total, 1),
            &value_style,
        );
    }
}

/// Horizontal bars with count/share labels past the bar end.
pub(crate) fn draw_hbars(fig: &mut Figure<'_>, region: Region, slices: &[Slice], total: f64) {
    let plot = Region::new(
        region.x + region.width * 0.30,
        region.y,
        region.width * 0.52,
        region.height,
    );
    let max = slices.iter().map(|s| s.value).fold(0.0f64, f64::max);
    let axes = Cartesian::new(plot, 0.0, (max * 1.05).max(1.0));
    let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
    axes.draw_row_labels(fig, &labels);
    let value_style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color).bold();
    let slot = plot.height / slices.len().max(1) as f32;
    let bar_h = slot * 0.62;
    for (idx, slice) in slices.iter().enumerate() {
        let y = axes.row_center(idx, slices.len());
        fig.canvas.rect(
            plot.x,
            y - bar_h / 2.0,
            axes.x(slice.value) - plot.x,
            bar_h,
            &Paint::fill(&slice.color).outlined("#FFFFFF", 2.0),
        );
        fig.canvas.text(
            axes.x(slice.value) + 6.0,
            y + value_style.size * 0.35,
            &fmt_count_pct(slice.value, total, 1),
            &value_style,
        );
    }
}

/// Vertical bars with bold count labels above each bar.
pub(crate) fn draw_vbars(fig: &mut Figure<'_>, region: Region, slices: &[Slice], rotate: bool) {
    let plot = region.inset_xy(10.0, 0.0);
    let plot = Region::new(plot.x, plot.y, plot.width, plot.height - 34.0);
    let max = slices.iter().map(|s| s.value).fold(0.0f64, f64::max);
    let axes = Cartesian::for_counts(plot, max);
    axes.draw_frame(fig);
    let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
    axes.draw_category_labels(fig, &labels, rotate);
    let value_style = TextStyle::new(fig.cfg.theme.label_size, "#2C3E50").bold().centered();
    let slot = axes.slot_width(slices.len());
    let bar_w = slot * 0.62;
    for (idx, slice) in slices.iter().enumerate() {
        let x = axes.slot_center(idx, slices.len());
        let top = axes.y(slice.value);
        fig.canvas.rect(
            x - bar_w / 2.0,
            top,
            bar_w,
            plot.bottom() - top,
            &Paint::fill(&slice.color).outlined("#FFFFFF", 2.0),
        );
        fig.canvas
            .text(x, top - 5.0, &format!("{:.0}", slice.value), &value_style);
    }
}

/// Grouped vertical bars; one legend row along the top-right.
pub(crate) fn draw_grouped_vbars(
    fig: &mut Figure<'_>,
    region: Region,
    categories: &[&str],
    series: &[(String, String, Vec<f64>)],
    rotate_labels: bool,
) {
    let plot = Region::new(
        region.x + 34.0,
        region.y + 8.0,
        region.width - 44.0,
        region.height - 46.0,
    );
    let max = series
        .iter()
        .flat_map(|(_, _, values)| values.iter().copied())
        .fold(0.0f64, f64::max);
    let axes = Cartesian::for_counts(plot, max);
    axes.draw_frame(fig);
    axes.draw_y_ticks(fig, 4);
    axes.draw_category_labels(fig, categories, rotate_labels);
    let value_style = TextStyle::new(fig.cfg.theme.label_size, "#2C3E50").bold().centered();
    let slot = axes.slot_width(categories.len());
    let group_w = slot * 0.72;
    let bar_w = group_w / series.len().max(1) as f32;
    for (series_idx, (_, color, values)) in series.iter().enumerate() {
        for (cat_idx, value) in values.iter().enumerate() {
            let center = axes.slot_center(cat_idx, categories.len());
            let x = center - group_w / 2.0 + series_idx as f32 * bar_w;
            let top = axes.y(*value);
            fig.canvas.rect(
                x,
                top,
                bar_w * 0.92,
                plot.bottom() - top,
                &Paint::fill(color).outlined("#FFFFFF", 1.5),
            );
            if *value > 0.0 {
                fig.canvas.text(
                    x + bar_w * 0.46,
                    top - 4.0,
                    &trim_number(*value),
                    &value_style,
                );
            }
        }
    }
    let entries: Vec<(String, String)> = series
        .iter()
        .map(|(label, color, _)| (label.clone(), color.clone()))
        .collect();
    legend_v(fig, plot.right() - 130.0, plot.y + 4.0, &entries);
}

fn trim_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Polar radar chart: ring grid, spokes, one polygon per series.
pub(crate) fn draw_radar(
    fig: &mut Figure<'_>,
    region: Region,
    axis_labels: &[&str],
    series: &[(String, String, Vec<f64>)],
    annotate: bool,
) {
    let radar = fig.cfg.layout.radar.clone();
    let cx = region.cx();
    let cy = region.cy();
    let r_max = region.width.min(region.height) / 2.0 * 0.68;
    let n = axis_labels.len().max(1);

    let grid = Paint::stroke(&fig.cfg.theme.grid_color, 0.8).with_opacity(0.6);
    for ring in 1..=radar.rings {
        let r = r_max * ring as f32 / radar.rings as f32;
        fig.canvas.circle(cx, cy, r, &grid);
    }
    let tick_style = TextStyle::new(fig.cfg.theme.label_size - 1.0, &fig.cfg.theme.text_muted);
    for ring in 1..=radar.rings {
        let value = radar.r_max * ring as f32 / radar.rings as f32;
        fig.canvas.text(
            cx + 4.0,
            cy - r_max * ring as f32 / radar.rings as f32 - 2.0,
            &format!("{value:.0}"),
            &tick_style,
        );
    }
    let label_style = TextStyle::new(fig.cfg.theme.label_size + 1.0, &fig.cfg.theme.text_color)
        .bold()
        .centered();
    for (idx, label) in axis_labels.iter().enumerate() {
        let angle = idx as f32 / n as f32 * TAU;
        let (sx, sy) = polar_point(cx, cy, r_max, angle);
        fig.canvas.line(cx, cy, sx, sy, &grid);
        let (lx, ly) = polar_point(cx, cy, r_max + 18.0, angle);
        for (line_idx, line) in label.split('\n').enumerate() {
            fig.canvas.text(
                lx,
                ly + line_idx as f32 * (label_style.size + 1.0),
                line,
                &label_style,
            );
        }
    }

    for (_, color, values) in series {
        let points: Vec<(f32, f32)> = values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let angle = idx as f32 / n as f32 * TAU;
                let r = r_max * (*value as f32 / radar.r_max).clamp(0.0, 1.1);
                polar_point(cx, cy, r, angle)
            })
            .collect();
        fig.canvas.polygon(
            &points,
            &Paint::fill(color).with_opacity(radar.fill_opacity),
        );
        let mut ring_points = points.clone();
        if let Some(first) = points.first() {
            ring_points.push(*first);
        }
        fig.canvas
            .polyline(&ring_points, &Paint::stroke(color, 2.5));
        for point in &points {
            fig.canvas.circle(
                point.0,
                point.1,
                radar.marker_radius,
                &Paint::fill("#FFFFFF").outlined(color, 2.0),
            );
        }
        if annotate {
            let annotation = TextStyle::new(fig.cfg.theme.label_size, color.as_str())
                .bold()
                .centered();
            for (idx, value) in values.iter().enumerate() {
                let angle = idx as f32 / n as f32 * TAU;
                let r = r_max * (*value as f32 / radar.r_max).clamp(0.0, 1.1) + 13.0;
                let (tx, ty) = polar_point(cx, cy, r, angle);
                fig.canvas
                    .text(tx, ty, &format!("{value:.2}"), &annotation);
            }
        }
    }
}

/// Vertical swatch legend.
pub(crate) fn legend_v(fig: &mut Figure<'_>, x: f32, y: f32, entries: &[(String, String)]) {
    let style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color);
    let row_h = style.size + 7.0;
    for (idx, (label, color)) in entries.iter().enumerate() {
        let row_y = y + idx as f32 * row_h;
        fig.canvas.rect(
            x,
            row_y,
            11.0,
            11.0,
            &Paint::fill(color).outlined(&fig.cfg.theme.grid_color, 0.5),
        );
        fig.canvas
            .text(x + 16.0, row_y + 9.5, label, &style);
    }
}

/// Single-row legend centered under a region.
pub(crate) fn legend_h(fig: &mut Figure<'_>, region: Region, entries: &[(String, String)]) {
    let style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color);
    let item_w = |label: &str| 16.0 + label.chars().count() as f32 * style.size * 0.56 + 14.0;
    let total: f32 = entries.iter().map(|(label, _)| item_w(label)).sum();
    let mut x = region.cx() - total / 2.0;
    let y = region.bottom() - style.size;
    for (label, color) in entries {
        fig.canvas.rect(
            x,
            y - 9.0,
            11.0,
            11.0,
            &Paint::fill(color).outlined(&fig.cfg.theme.grid_color, 0.5),
        );
        fig.canvas.text(x + 16.0, y, label, &style);
        x += item_w(label);
    }
}
