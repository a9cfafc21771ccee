use super::axes::{x_axis_title, y_axis_title, Cartesian};
use super::draw_grouped_vbars;
use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::stats;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

const LEVELS: [&str; 5] = [
    "Very Familiar",
    "Familiar",
    "Neutral",
    "Unfamiliar",
    "Very Unfamiliar",
];
const EDUCATION: [&str; 3] = ["Undergraduate", "Master", "PhD"];

/// Figure 2: knowledge-level comparison - grouped bars over the five
/// familiarity levels plus education-split violins for both items.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let energy = data.counts_for(|r| r.transition_knowledge, &[1, 2, 3, 4, 5]);
    let carbon = data.counts_for(|r| r.dual_carbon_knowledge, &[1, 2, 3, 4, 5]);
    debug!(?energy, ?carbon, "knowledge level counts");

    let mut fig = Figure::new(1080.0, 860.0, cfg);
    fig.suptitle("Figure 2: Comprehensive Analysis of Energy Knowledge Levels");
    let rows = fig.content().split_v(&[1.3, 1.0], cfg.layout.panel_gap);

    let bar_region = rows[0].inset_xy(14.0, 6.0);
    fig.panel_label(bar_region, 'A');
    fig.panel_title(
        bar_region,
        "Comparison of Knowledge on Energy Transition and Dual Carbon Goals",
    );
    let bar_body = Region::new(
        bar_region.x,
        bar_region.y + 30.0,
        bar_region.width,
        bar_region.height - 40.0,
    );
    draw_grouped_vbars(
        &mut fig,
        bar_body,
        &LEVELS,
        &[
            (
                "Energy Transition".to_string(),
                cfg.palette.primary.clone(),
                energy.iter().map(|c| *c as f64).collect(),
            ),
            (
                "Dual Carbon Goals".to_string(),
                cfg.palette.secondary.clone(),
                carbon.iter().map(|c| *c as f64).collect(),
            ),
        ],
        false,
    );

    let bottom = rows[1].grid(1, 2, cfg.layout.panel_gap, 0.0);
    let panels = [
        (
            bottom[0],
            'B',
            "Energy Transition Familiarity x Education",
            cfg.palette.gradient_cool.clone(),
        ),
        (
            bottom[1],
            'C',
            "Dual Carbon Goals Familiarity x Education",
            cfg.palette.gradient_warm.clone(),
        ),
    ];
    for (panel_idx, (region, letter, title, colors)) in panels.iter().enumerate() {
        fig.panel_label(*region, *letter);
        fig.panel_title(*region, title);
        let plot = Region::new(
            region.x + 52.0,
            region.y + 34.0,
            region.width - 66.0,
            region.height - 78.0,
        );
        let axes = Cartesian::new(plot, 0.5, 5.5);
        axes.draw_frame(&mut fig);
        axes.draw_y_ticks(&mut fig, 5);
        axes.draw_category_labels(&mut fig, &EDUCATION, false);
        for (group_idx, code) in [1u8, 2, 3].into_iter().enumerate() {
            let values = if panel_idx == 0 {
                data.group_values(|r| r.education, code, |r| r.transition_knowledge as f64)
            } else {
                data.group_values(|r| r.education, code, |r| r.dual_carbon_knowledge as f64)
            };
            draw_violin(
                &mut fig,
                &axes,
                axes.slot_center(group_idx, 3),
                axes.slot_width(3) * 0.36,
                &values,
                &colors[group_idx],
            );
        }
        x_axis_title(&mut fig, plot, "Education Level");
        y_axis_title(&mut fig, plot, "Familiarity (1 = Very Familiar)");
    }

    fig.save(path)
}

/// Symmetric KDE violin with an inner quartile box and median tick.
pub(super) fn draw_violin(
    fig: &mut Figure<'_>,
    axes: &Cartesian,
    x_center: f32,
    half_width: f32,
    values: &[f64],
    color: &str,
) {
    if values.len() < 2 {
        return;
    }
    let grid: Vec<f64> = (0..=60)
        .map(|i| axes.y_min + (axes.y_max - axes.y_min) * i as f64 / 60.0)
        .collect();
    let density = stats::gaussian_kde(values, 0.3, &grid);
    let peak = density.iter().copied().fold(0.0f64, f64::max);
    if peak <= 0.0 {
        return;
    }
    let mut outline = Vec::with_capacity(grid.len() * 2);
    for (g, d) in grid.iter().zip(&density) {
        let w = (d / peak) as f32 * half_width;
        outline.push((x_center + w, axes.y(*g)));
    }
    for (g, d) in grid.iter().zip(&density).rev() {
        let w = (d / peak) as f32 * half_width;
        outline.push((x_center - w, axes.y(*g)));
    }
    fig.canvas.polygon(
        &outline,
        &Paint::fill(color)
            .outlined("#FFFFFF", 1.5)
            .with_opacity(0.85),
    );

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = stats::quantile(&sorted, 0.25);
    let q2 = stats::quantile(&sorted, 0.50);
    let q3 = stats::quantile(&sorted, 0.75);
    let box_w = half_width * 0.22;
    fig.canvas.rect(
        x_center - box_w / 2.0,
        axes.y(q3),
        box_w,
        (axes.y(q1) - axes.y(q3)).max(1.0),
        &Paint::fill("#FFFFFF").with_opacity(0.9),
    );
    fig.canvas.line(
        x_center - box_w / 2.0,
        axes.y(q2),
        x_center + box_w / 2.0,
        axes.y(q2),
        &Paint::stroke("#333333", 2.0),
    );
    let mean = stats::mean(values);
    let label = TextStyle::new(fig.cfg.theme.label_size - 1.0, "#2C3E50")
        .bold()
        .centered();
    fig.canvas.text(
        x_center,
        axes.y(axes.y_max) - 4.0,
        &format!("M={mean:.2}"),
        &label,
    );
}
