use crate::canvas::{polar_point, Anchor, Paint, TextStyle};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::stats;
use crate::theme::PaletteFamily;
use anyhow::Result;
use ndarray::Array2;
use std::f32::consts::TAU;
use std::path::Path;
use tracing::debug;

/// Circular correlation network: nodes on a ring, one edge per pair with
/// |r| at or above the configured threshold.
pub fn render_network(
    corr: &Array2<f64>,
    labels: &[&str],
    cfg: &Config,
    path: &Path,
    title: &str,
) -> Result<()> {
    let network = cfg.layout.network.clone();
    debug!(k = labels.len(), threshold = network.threshold, "correlation network");

    let mut fig = Figure::new(860.0, 860.0, cfg);
    fig.suptitle(title);
    let content = fig.content();
    let cx = content.cx();
    let cy = content.cy();
    let ring = content.width.min(content.height) / 2.0 * 0.62;
    let k = labels.len();

    let positions: Vec<(f32, f32)> = (0..k)
        .map(|idx| polar_point(cx, cy, ring, idx as f32 / k as f32 * TAU))
        .collect();

    let label_box = Paint::fill("#FFFFFF")
        .outlined("#CCCCCC", 0.8)
        .with_opacity(0.9);
    for i in 0..k {
        for j in (i + 1)..k {
            let r = corr[(i, j)];
            if r.abs() < network.threshold {
                continue;
            }
            let color = if r > 0.0 {
                &cfg.palette.positive
            } else {
                &cfg.palette.negative
            };
            let width = (r.abs() as f32) * network.max_edge_width;
            let opacity = 0.3 + r.abs() as f32 * 0.5;
            let (x1, y1) = positions[i];
            let (x2, y2) = positions[j];
            fig.canvas.line(
                x1,
                y1,
                x2,
                y2,
                &Paint::stroke(color, width).with_opacity(opacity).rounded(),
            );
            let mx = (x1 + x2) / 2.0;
            let my = (y1 + y2) / 2.0;
            fig.canvas.rounded_rect(mx - 17.0, my - 9.0, 34.0, 18.0, 5.0, &label_box);
            fig.canvas.text(
                mx,
                my + 4.0,
                &format!("{r:.2}"),
                &TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).centered(),
            );
        }
    }

    for (idx, label) in labels.iter().enumerate() {
        let (x, y) = positions[idx];
        // Node size follows how strongly the variable correlates overall.
        let mean_abs = (0..k)
            .filter(|other| *other != idx)
            .map(|other| corr[(idx, other)].abs())
            .sum::<f64>()
            / (k.max(2) - 1) as f64;
        let radius = network.node_radius * (0.75 + mean_abs as f32 * 0.6);
        fig.canvas.circle(
            x,
            y,
            radius,
            &Paint::fill(&cfg.palette.primary).outlined("#FFFFFF", 3.0),
        );
        let angle = idx as f32 / k as f32 * TAU;
        let (lx, ly) = polar_point(cx, cy, ring + radius + 22.0, angle);
        let anchor = if lx >= cx + 1.0 {
            Anchor::Start
        } else if lx <= cx - 1.0 {
            Anchor::End
        } else {
            Anchor::Middle
        };
        fig.canvas.text(
            lx,
            ly + 4.0,
            label,
            &TextStyle::new(cfg.theme.font_size, &cfg.theme.text_color)
                .bold()
                .anchored(anchor),
        );
    }

    super::legend_v(
        &mut fig,
        content.right() - 170.0,
        content.bottom() - 44.0,
        &[
            ("Positive Correlation".to_string(), cfg.palette.positive.clone()),
            ("Negative Correlation".to_string(), cfg.palette.negative.clone()),
        ],
    );
    fig.footnote(
        content,
        &format!(
            "Only |r| >= {:.1} shown; line width tracks strength",
            network.threshold
        ),
    );

    fig.save(path)
}

/// Polar chord diagram over the core composite variables. Fewer than three
/// usable variables degrades to the placeholder panel.
pub fn render_chord(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let columns = data.core_columns();
    let mut fig = Figure::new(880.0, 880.0, cfg);
    fig.suptitle("Core Variable Correlation Chord Diagram");
    let content = fig.content();
    if columns.len() < 3 {
        fig.placeholder(content, "Insufficient data to generate chord diagram");
        return fig.save(path);
    }

    let labels: Vec<&str> = columns.iter().map(|(label, _)| *label).collect();
    let values: Vec<Vec<f64>> = columns.into_iter().map(|(_, column)| column).collect();
    let corr = stats::correlation_matrix(&values);
    let threshold = cfg.layout.network.threshold;
    debug!(k = labels.len(), threshold, "chord diagram");

    let cx = content.cx();
    let cy = content.cy();
    let r_outer = content.width.min(content.height) / 2.0 * 0.78;
    let r_inner = r_outer * 0.88;
    let k = labels.len();
    let node_colors = cfg.palette.colors(k, PaletteFamily::Categorical);
    let slot = TAU / k as f32;

    for (idx, label) in labels.iter().enumerate() {
        let center = idx as f32 * slot;
        let half = slot * 0.4;
        fig.canvas.annular_sector(
            cx,
            cy,
            r_outer,
            r_inner,
            center - half,
            center + half,
            &Paint::fill(&node_colors[idx])
                .outlined("#FFFFFF", 2.0)
                .with_opacity(0.9),
        );
        let (lx, ly) = polar_point(cx, cy, r_outer + 22.0, center);
        let mut degrees = center.to_degrees();
        if degrees > 90.0 && degrees < 270.0 {
            degrees += 180.0;
        }
        fig.canvas.text(
            lx,
            ly,
            label,
            &TextStyle::new(cfg.theme.font_size, &cfg.theme.text_color)
                .bold()
                .centered()
                .rotated(degrees),
        );
    }

    for i in 0..k {
        for j in (i + 1)..k {
            let r = corr[(i, j)];
            if r.abs() < threshold {
                continue;
            }
            let color = if r > 0.0 {
                &cfg.palette.positive
            } else {
                &cfg.palette.negative
            };
            let a1 = i as f32 * slot;
            let a2 = j as f32 * slot;
            let (x1, y1) = polar_point(cx, cy, r_inner, a1);
            let (x2, y2) = polar_point(cx, cy, r_inner, a2);
            // Quadratic chord bowed towards the center.
            let ctrl_x = (x1 + x2) / 2.0 * 0.25 + cx * 0.75;
            let ctrl_y = (y1 + y2) / 2.0 * 0.25 + cy * 0.75;
            let d = format!("M {x1:.2} {y1:.2} Q {ctrl_x:.2} {ctrl_y:.2} {x2:.2} {y2:.2}");
            fig.canvas.path(
                &d,
                &Paint::stroke(color, r.abs() as f32 * 8.0)
                    .with_opacity(0.6)
                    .rounded(),
            );
            let mid_x = 0.25 * x1 + 0.25 * x2 + 0.5 * ctrl_x;
            let mid_y = 0.25 * y1 + 0.25 * y2 + 0.5 * ctrl_y;
            fig.canvas.rounded_rect(
                mid_x - 16.0,
                mid_y - 9.0,
                32.0,
                18.0,
                5.0,
                &Paint::fill("#FFFFFF").with_opacity(0.8),
            );
            fig.canvas.text(
                mid_x,
                mid_y + 4.0,
                &format!("{r:.2}"),
                &TextStyle::new(cfg.theme.label_size - 1.0, color.as_str())
                    .bold()
                    .centered(),
            );
        }
    }

    super::legend_v(
        &mut fig,
        content.right() - 150.0,
        content.bottom() - 34.0,
        &[
            ("Positive Corr".to_string(), cfg.palette.positive.clone()),
            ("Negative Corr".to_string(), cfg.palette.negative.clone()),
        ],
    );
    fig.footnote(content, &format!("Relationships with |r| > {threshold:.1}"));

    fig.save(path)
}
