use super::axes::{x_axis_title, y_axis_title, Cartesian};
use crate::canvas::{Anchor, Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::{Dataset, SurveyRecord};
use crate::figure::Figure;
use crate::stats;
use crate::theme::PaletteFamily;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::debug;

/// Jitter seed: renders must be reproducible run to run.
const JITTER_SEED: u64 = 0x5eed;

/// Raincloud plot: per group, a jittered point cloud on the left, the box
/// in the middle and a half-violin on the right.
pub fn render_raincloud(
    data: &Dataset,
    cfg: &Config,
    path: &Path,
    value: fn(&SurveyRecord) -> f64,
    value_label: &str,
    group: fn(&SurveyRecord) -> u8,
    groups: &[(u8, &str)],
    group_label: &str,
    title: &str,
) -> Result<()> {
    debug!(title, groups = groups.len(), "raincloud");
    let mut fig = Figure::new(980.0, 720.0, cfg);
    fig.suptitle(title);
    let content = fig.content();
    let plot = Region::new(
        content.x + 64.0,
        content.y + 10.0,
        content.width - 84.0,
        content.height - 86.0,
    );
    let axes = Cartesian::new(plot, 0.5, 5.5);
    axes.draw_frame(&mut fig);
    axes.draw_y_ticks(&mut fig, 5);

    let colors = cfg.palette.colors(groups.len(), PaletteFamily::Categorical);
    let mut rng = StdRng::seed_from_u64(JITTER_SEED);
    let slot = axes.slot_width(groups.len());
    let mut tick_labels: Vec<String> = Vec::with_capacity(groups.len());

    for (idx, (code, label)) in groups.iter().enumerate() {
        let values = data.group_values(group, *code, value);
        tick_labels.push(format!("{label} (n={})", values.len()));
        if values.len() < 2 {
            continue;
        }
        let center = axes.slot_center(idx, groups.len());
        let color = &colors[idx];

        // 1. point cloud, left of center
        let cloud_x = center - slot * 0.22;
        for v in &values {
            let jitter = rng.gen_range(-0.06f32..0.06) * slot;
            fig.canvas.circle(
                cloud_x + jitter,
                axes.y(*v),
                3.2,
                &Paint::fill(color).outlined("#FFFFFF", 0.5).with_opacity(0.6),
            );
        }

        // 2. half violin, right of center
        draw_half_violin(&mut fig, &axes, center + slot * 0.14, slot * 0.26, &values, color);

        // 3. box with mean diamond on top
        draw_box(&mut fig, &axes, center, slot * 0.10, &values, color);
    }
    let refs: Vec<&str> = tick_labels.iter().map(String::as_str).collect();
    axes.draw_category_labels(&mut fig, &refs, false);
    x_axis_title(&mut fig, plot, group_label);
    y_axis_title(&mut fig, plot, value_label);

    super::legend_v(
        &mut fig,
        plot.right() - 190.0,
        plot.y + 6.0,
        &[
            ("Density (right)".to_string(), cfg.palette.quaternary.clone()),
            ("Boxplot / IQR (center)".to_string(), cfg.palette.border.clone()),
            ("Individual points (left)".to_string(), cfg.palette.neutral.clone()),
        ],
    );
    fig.footnote(
        content,
        "Box collapsed to a line indicates IQR = 0 (highly concentrated)",
    );

    fig.save(path)
}

fn draw_half_violin(
    fig: &mut Figure<'_>,
    axes: &Cartesian,
    x_base: f32,
    width: f32,
    values: &[f64],
    color: &str,
) {
    let grid: Vec<f64> = (0..=60)
        .map(|i| axes.y_min + (axes.y_max - axes.y_min) * i as f64 / 60.0)
        .collect();
    let density = stats::gaussian_kde(values, 0.3, &grid);
    let peak = density.iter().copied().fold(0.0f64, f64::max);
    if peak <= 0.0 {
        return;
    }
    let mut outline = vec![(x_base, axes.y(axes.y_min))];
    for (g, d) in grid.iter().zip(&density) {
        outline.push((x_base + (d / peak) as f32 * width, axes.y(*g)));
    }
    outline.push((x_base, axes.y(axes.y_max)));
    fig.canvas.polygon(
        &outline,
        &Paint::fill(color).outlined("#FFFFFF", 1.5).with_opacity(0.5),
    );
}

fn draw_box(
    fig: &mut Figure<'_>,
    axes: &Cartesian,
    center: f32,
    half_width: f32,
    values: &[f64],
    color: &str,
) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = stats::quantile(&sorted, 0.25);
    let q2 = stats::quantile(&sorted, 0.50);
    let q3 = stats::quantile(&sorted, 0.75);
    let lo = sorted[0];
    let hi = sorted[sorted.len() - 1];
    let whisker = Paint::stroke(color, 2.5);
    fig.canvas.line(center, axes.y(lo), center, axes.y(q1), &whisker);
    fig.canvas.line(center, axes.y(q3), center, axes.y(hi), &whisker);
    fig.canvas.rect(
        center - half_width,
        axes.y(q3),
        half_width * 2.0,
        (axes.y(q1) - axes.y(q3)).max(1.0),
        &Paint::fill("#FFFFFF").outlined(color, 3.0),
    );
    fig.canvas.line(
        center - half_width,
        axes.y(q2),
        center + half_width,
        axes.y(q2),
        &Paint::stroke(color, 3.0),
    );
    let mean = stats::mean(values);
    // Mean diamond above the median line.
    let (mx, my) = (center, axes.y(mean));
    fig.canvas.polygon(
        &[
            (mx, my - 6.0),
            (mx + 6.0, my),
            (mx, my + 6.0),
            (mx - 6.0, my),
        ],
        &Paint::fill(color).outlined("#FFFFFF", 2.0),
    );
}

/// Ridgeline panel of the core composite indices: one KDE silhouette per
/// variable on a shared score axis.
pub fn render_ridgeline(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let variables: [(&str, fn(&SurveyRecord) -> f64); 4] = [
        ("Knowledge Index", |r| r.knowledge_index),
        ("Responsibility Index", |r| r.responsibility_index),
        ("Trust Index", |r| r.trust_index),
        ("Policy Support Index", |r| r.policy_index),
    ];
    debug!(n = data.len(), "ridgeline");

    let mut fig = Figure::new(980.0, 180.0 * variables.len() as f32 + 120.0, cfg);
    fig.suptitle("Ridgeline Plot of Core Variables");
    let content = fig.content();
    let lanes = content
        .inset_xy(150.0, 8.0)
        .split_v(&vec![1.0; variables.len()], 10.0);
    let colors = cfg.palette.colors(variables.len(), PaletteFamily::Categorical);

    let x_min = 0.5f64;
    let x_max = 5.5f64;
    let grid: Vec<f64> = (0..=160)
        .map(|i| x_min + (x_max - x_min) * i as f64 / 160.0)
        .collect();

    for (idx, (label, get)) in variables.iter().enumerate() {
        let lane = lanes[idx];
        let values = data.column(*get);
        let density = stats::gaussian_kde(&values, 0.3, &grid);
        let peak = density.iter().copied().fold(0.0f64, f64::max).max(1e-12);
        let x_of = |v: f64| lane.x + ((v - x_min) / (x_max - x_min)) as f32 * lane.width;
        let y_of = |d: f64| lane.bottom() - (d / peak * 0.8) as f32 * lane.height;

        let mut outline = vec![(lane.x, lane.bottom())];
        for (g, d) in grid.iter().zip(&density) {
            outline.push((x_of(*g), y_of(*d)));
        }
        outline.push((lane.right(), lane.bottom()));
        fig.canvas.polygon(
            &outline,
            &Paint::fill(&colors[idx]).outlined("#FFFFFF", 2.0).with_opacity(0.7),
        );

        let mean = stats::mean(&values);
        fig.canvas.line(
            x_of(mean),
            lane.y + lane.height * 0.15,
            x_of(mean),
            lane.bottom(),
            &Paint::stroke("#333333", 1.5).dashed("5 3").with_opacity(0.7),
        );
        fig.canvas.text(
            x_of(mean) + 5.0,
            lane.y + lane.height * 0.3,
            &format!("M={mean:.2}"),
            &TextStyle::new(cfg.theme.label_size - 1.0, "#333333").bold(),
        );
        fig.canvas.text(
            lane.x - 10.0,
            lane.cy(),
            label,
            &TextStyle::new(cfg.theme.font_size, colors[idx].as_str())
                .bold()
                .anchored(Anchor::End),
        );
    }

    // Shared score axis under the last lane.
    let last = lanes[lanes.len() - 1];
    let axis = Cartesian::new(
        Region::new(last.x, last.y, last.width, last.height),
        x_min,
        x_max,
    );
    let tick_style = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).centered();
    for score in 1..=5 {
        fig.canvas.text(
            axis.x(score as f64),
            last.bottom() + 16.0,
            &score.to_string(),
            &tick_style,
        );
    }
    x_axis_title(&mut fig, last, "Score");

    fig.save(path)
}
