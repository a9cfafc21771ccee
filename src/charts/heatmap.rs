use crate::canvas::{Anchor, Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::stats;
use crate::theme::diverging_color;
use anyhow::Result;
use ndarray::Array2;
use std::path::Path;
use tracing::debug;

/// Lower-triangle correlation heatmap over a precomputed matrix.
pub fn render_correlation(
    corr: &Array2<f64>,
    labels: &[&str],
    cfg: &Config,
    path: &Path,
    title: &str,
) -> Result<()> {
    debug!(k = labels.len(), "correlation heatmap");
    let mut fig = Figure::new(900.0, 760.0, cfg);
    fig.suptitle(title);
    let content = fig.content();
    let columns = content.split_h(&[1.0, 0.06], 14.0);
    let body = columns[0].inset_xy(90.0, 20.0);

    let k = labels.len();
    let cell = (body.width.min(body.height)) / k as f32;
    let gap = cfg.layout.heatmap.cell_gap;
    let origin_x = body.x;
    let origin_y = body.y;

    let annot = TextStyle::new(cfg.theme.label_size - 1.0, &cfg.theme.text_color)
        .bold()
        .centered();
    // Mask: draw the lower triangle and diagonal only.
    for row in 0..k {
        for col in 0..=row {
            let value = corr[(row, col)];
            let x = origin_x + col as f32 * cell;
            let y = origin_y + row as f32 * cell;
            fig.canvas.rect(
                x + gap / 2.0,
                y + gap / 2.0,
                cell - gap,
                cell - gap,
                &Paint::fill(diverging_color(&cfg.palette, value)),
            );
            if cfg.layout.heatmap.annotate {
                let ink = if value.abs() > 0.6 { "#FFFFFF" } else { "#333333" };
                let style = TextStyle { color: ink.to_string(), ..annot.clone() };
                fig.canvas.text(
                    x + cell / 2.0,
                    y + cell / 2.0 + 3.0,
                    &format!("{value:.2}"),
                    &style,
                );
            }
        }
    }
    let tick = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).anchored(Anchor::End);
    for (idx, label) in labels.iter().enumerate() {
        fig.canvas.text(
            origin_x - 8.0,
            origin_y + (idx as f32 + 0.5) * cell + 4.0,
            label,
            &tick,
        );
        fig.canvas.text(
            origin_x + (idx as f32 + 0.5) * cell,
            origin_y + k as f32 * cell + 16.0,
            label,
            &TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color)
                .anchored(Anchor::End)
                .rotated(-45.0),
        );
    }

    let bar = Region::new(
        columns[1].x,
        origin_y,
        cfg.layout.heatmap.colorbar_width,
        k as f32 * cell,
    );
    draw_colorbar(&mut fig, bar, -1.0, 1.0, "Correlation Coefficient");

    fig.save(path)
}

/// Respondent x item heatmap with rows and columns in hierarchical
/// cluster order. Falls back to a placeholder below 10 usable rows.
pub fn render_clustermap(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let items: [(&str, fn(&crate::dataset::SurveyRecord) -> f64); 8] = [
        ("Tech Trust", |r| r.trust_technology as f64),
        ("NEV Trust", |r| r.trust_nev_technology as f64),
        ("Policy Exec", |r| r.trust_policy_execution as f64),
        ("Incentive Approval", |r| r.incentive_policy_approval as f64),
        ("Fuel-Limit Support", |r| r.fuel_limit_support as f64),
        ("NEV Impression", |r| r.nev_impression as f64),
        ("Attitude", |r| r.attitude),
        ("Trust Index", |r| r.trust_index),
    ];

    let mut fig = Figure::new(860.0, 940.0, cfg);
    fig.suptitle("Respondent Response Pattern Cluster Heatmap");
    let content = fig.content();
    if data.len() < 10 {
        fig.placeholder(content, "Insufficient valid data");
        return fig.save(path);
    }
    debug!(rows = data.len(), items = items.len(), "clustermap input");

    let rows: Vec<Vec<f64>> = data
        .records()
        .iter()
        .map(|record| items.iter().map(|(_, get)| get(record)).collect())
        .collect();
    let row_order = stats::cluster_order(&rows);
    // Column ordering clusters the transposed matrix.
    let cols: Vec<Vec<f64>> = (0..items.len())
        .map(|item| rows.iter().map(|row| row[item]).collect())
        .collect();
    let col_order = stats::cluster_order(&cols);

    let body = content.inset_xy(60.0, 30.0);
    let plot = Region::new(body.x, body.y, body.width - 60.0, body.height - 70.0);
    let cell_w = plot.width / items.len() as f32;
    let cell_h = plot.height / rows.len() as f32;
    for (screen_row, data_row) in row_order.iter().enumerate() {
        for (screen_col, data_col) in col_order.iter().enumerate() {
            // Scores sit on 1..=5; center at 3 for the diverging ramp.
            let value = (rows[*data_row][*data_col] - 3.0) / 2.0;
            fig.canvas.rect(
                plot.x + screen_col as f32 * cell_w,
                plot.y + screen_row as f32 * cell_h,
                cell_w,
                (cell_h + 0.5).max(1.0),
                &Paint::fill(diverging_color(&cfg.palette, value)),
            );
        }
    }
    for (screen_col, data_col) in col_order.iter().enumerate() {
        fig.canvas.text(
            plot.x + (screen_col as f32 + 0.5) * cell_w,
            plot.bottom() + 14.0,
            items[*data_col].0,
            &TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color)
                .anchored(Anchor::End)
                .rotated(-40.0),
        );
    }
    let bar = Region::new(plot.right() + 18.0, plot.y, 16.0, plot.height * 0.4);
    draw_colorbar(&mut fig, bar, 1.0, 5.0, "Score (1-5)");
    fig.footnote(content, "Row = Respondent, Col = Item; ordered by average-linkage clustering");

    fig.save(path)
}

/// Vertical gradient legend, max at the top.
fn draw_colorbar(fig: &mut Figure<'_>, bar: Region, min: f64, max: f64, label: &str) {
    const STEPS: usize = 24;
    let step_h = bar.height / STEPS as f32;
    let mid = (min + max) / 2.0;
    let half = (max - min) / 2.0;
    for i in 0..STEPS {
        // Top step carries the maximum value.
        let value = max - (i as f64 + 0.5) / STEPS as f64 * (max - min);
        fig.canvas.rect(
            bar.x,
            bar.y + i as f32 * step_h,
            bar.width,
            step_h + 0.5,
            &Paint::fill(diverging_color(&fig.cfg.palette, (value - mid) / half)),
        );
    }
    let tick = TextStyle::new(fig.cfg.theme.label_size - 1.0, &fig.cfg.theme.text_color);
    fig.canvas
        .text(bar.x + bar.width + 4.0, bar.y + 8.0, &format!("{max:.0}"), &tick);
    fig.canvas.text(
        bar.x + bar.width + 4.0,
        bar.bottom(),
        &format!("{min:.0}"),
        &tick,
    );
    fig.canvas.text(
        bar.x + bar.width / 2.0,
        bar.y - 8.0,
        label,
        &TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color).centered(),
    );
}
