use crate::canvas::{Anchor, Paint, TextStyle};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::stats::{self, Tertile};
use crate::theme::PaletteFamily;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Two-column Sankey: knowledge level flowing into purchase intention.
pub fn render_sankey(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    const SOURCE_LABELS: [&str; 5] = [
        "Very Familiar",
        "Familiar",
        "Neutral",
        "Unfamiliar",
        "Very Unfamiliar",
    ];
    const TARGET_LABELS: [&str; 5] = [
        "Very Likely",
        "Likely",
        "Uncertain",
        "Unlikely",
        "Very Unlikely",
    ];
    let codes = [1u8, 2, 3, 4, 5];
    let table = data.crosstab(
        |r| r.transition_knowledge,
        |r| r.purchase_intention,
        &codes,
        &codes,
    );
    debug!(?table, "knowledge -> intention flow matrix");

    let mut fig = Figure::new(980.0, 720.0, cfg);
    fig.suptitle("Flow Analysis: Knowledge Level to Purchase Intention");
    let content = fig.content().inset_xy(130.0, 16.0);
    let flow_cfg = cfg.layout.flow.clone();

    let source_totals: Vec<f64> = table
        .iter()
        .map(|row| row.iter().sum::<usize>() as f64)
        .collect();
    let target_totals: Vec<f64> = (0..codes.len())
        .map(|j| table.iter().map(|row| row[j]).sum::<usize>() as f64)
        .collect();
    let n = data.len() as f64;

    let usable_h = content.height - flow_cfg.node_gap * (codes.len() - 1) as f32;
    let height_of = |count: f64| (count / n) as f32 * usable_h;
    let source_colors = cfg.palette.colors(codes.len(), PaletteFamily::Cool);
    let target_colors = cfg.palette.colors(codes.len(), PaletteFamily::Warm);

    // Node columns with their running flow offsets.
    let left_x = content.x;
    let right_x = content.right() - flow_cfg.node_width;
    let mut source_tops = Vec::with_capacity(codes.len());
    let mut y = content.y;
    for (idx, total) in source_totals.iter().enumerate() {
        let h = height_of(*total);
        fig.canvas.rect(
            left_x,
            y,
            flow_cfg.node_width,
            h,
            &Paint::fill(&source_colors[idx]).outlined("#FFFFFF", 2.0),
        );
        let style = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color)
            .bold()
            .anchored(Anchor::End);
        fig.canvas
            .text(left_x - 8.0, y + h / 2.0, SOURCE_LABELS[idx], &style);
        fig.canvas.text(
            left_x - 8.0,
            y + h / 2.0 + style.size + 1.0,
            &format!("({total:.0})"),
            &style,
        );
        source_tops.push(y);
        y += h + flow_cfg.node_gap;
    }
    let mut target_tops = Vec::with_capacity(codes.len());
    let mut y = content.y;
    for (idx, total) in target_totals.iter().enumerate() {
        let h = height_of(*total);
        fig.canvas.rect(
            right_x,
            y,
            flow_cfg.node_width,
            h,
            &Paint::fill(&target_colors[idx]).outlined("#FFFFFF", 2.0),
        );
        let style = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).bold();
        fig.canvas.text(
            right_x + flow_cfg.node_width + 8.0,
            y + h / 2.0,
            TARGET_LABELS[idx],
            &style,
        );
        fig.canvas.text(
            right_x + flow_cfg.node_width + 8.0,
            y + h / 2.0 + style.size + 1.0,
            &format!("({total:.0})"),
            &style,
        );
        target_tops.push(y);
        y += h + flow_cfg.node_gap;
    }

    let mut source_offsets = source_tops.clone();
    let mut target_offsets = target_tops.clone();
    for (i, row) in table.iter().enumerate() {
        for (j, count) in row.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let thickness = height_of(*count as f64);
            let y0 = source_offsets[i];
            let y1 = target_offsets[j];
            source_offsets[i] += thickness;
            target_offsets[j] += thickness;
            draw_ribbon(
                &mut fig,
                left_x + flow_cfg.node_width,
                y0,
                right_x,
                y1,
                thickness,
                &source_colors[i],
                flow_cfg.curve_tension,
                flow_cfg.link_opacity,
            );
        }
    }

    let axis_style = TextStyle::new(cfg.theme.font_size, &cfg.theme.text_color)
        .bold()
        .centered();
    fig.canvas.text(
        left_x + 10.0,
        content.bottom() + 26.0,
        "Knowledge Level",
        &axis_style,
    );
    fig.canvas.text(
        right_x,
        content.bottom() + 26.0,
        "Purchase Intention",
        &axis_style,
    );

    fig.save(path)
}

/// Cubic-bezier flow ribbon between two node edges.
#[allow(clippy::too_many_arguments)]
fn draw_ribbon(
    fig: &mut Figure<'_>,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    thickness: f32,
    color: &str,
    tension: f32,
    opacity: f32,
) {
    let ctrl = (x1 - x0) * tension;
    let d = format!(
        "M {x0:.2} {y0:.2} C {c0:.2} {y0:.2} {c1:.2} {y1:.2} {x1:.2} {y1:.2} \
         L {x1:.2} {y1b:.2} C {c1:.2} {y1b:.2} {c0:.2} {y0b:.2} {x0:.2} {y0b:.2} Z",
        c0 = x0 + ctrl,
        c1 = x1 - ctrl,
        y0b = y0 + thickness,
        y1b = y1 + thickness,
    );
    fig.canvas.path(
        &d,
        &Paint::fill(color).outlined("#FFFFFF", 0.5).with_opacity(opacity),
    );
}

/// Multi-stage alluvial over tertile-binned composites:
/// knowledge -> trust -> attitude -> intention.
pub fn render_alluvial(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let mut fig = Figure::new(1180.0, 760.0, cfg);
    fig.suptitle("Knowledge - Trust - Attitude - Intention Multi-stage Flow");
    let content = fig.content();
    if data.len() < 3 {
        fig.placeholder(
            content,
            "Insufficient data to generate multi-stage alluvial plot",
        );
        return fig.save(path);
    }

    // Stage assignments: level index 0 = High, 1 = Medium, 2 = Low, so the
    // strong end renders at the top of every column.
    let tertile_level = |t: Tertile| match t {
        Tertile::High => 0usize,
        Tertile::Medium => 1,
        Tertile::Low => 2,
    };
    let mut stages: Vec<(String, Vec<usize>)> = Vec::new();
    for (label, column) in [
        ("Knowledge Level", data.column(|r| r.knowledge_index)),
        ("Trust Level", data.column(|r| r.trust_index)),
        ("Attitude Level", data.column(|r| r.attitude)),
    ] {
        let levels = stats::tertile_bins(&column)
            .into_iter()
            .map(tertile_level)
            .collect();
        stages.push((label.to_string(), levels));
    }
    // Intention folds the five-point item into three tiers.
    let intention_levels: Vec<usize> = data
        .records()
        .iter()
        .map(|r| match r.purchase_intention {
            1 | 2 => 0,
            3 => 1,
            _ => 2,
        })
        .collect();
    stages.push(("Purchase Intention".to_string(), intention_levels));
    debug!(stages = stages.len(), "alluvial stages");

    let level_colors = [
        cfg.palette.positive.clone(),
        cfg.palette.neutral.clone(),
        cfg.palette.negative.clone(),
    ];
    let level_names = ["High", "Medium", "Low"];
    let n = data.len() as f64;
    let flow_cfg = cfg.layout.flow.clone();
    let body = content.inset_xy(40.0, 34.0);
    let node_w = flow_cfg.node_width * 2.0;
    let gap = flow_cfg.node_gap;
    let usable_h = body.height - gap * 2.0;
    let n_stages = stages.len();
    let stage_x: Vec<f32> = (0..n_stages)
        .map(|idx| body.x + idx as f32 * (body.width - node_w) / (n_stages - 1) as f32)
        .collect();

    // Per stage: counts per level and node tops.
    let mut node_tops: Vec<[f32; 3]> = Vec::with_capacity(n_stages);
    let label_style = TextStyle::new(cfg.theme.label_size, "#FFFFFF").bold().centered();
    let stage_style = TextStyle::new(cfg.theme.font_size, "#2C3E50").bold().centered();
    for (stage_idx, (label, levels)) in stages.iter().enumerate() {
        let mut counts = [0usize; 3];
        for level in levels {
            counts[*level] += 1;
        }
        let x = stage_x[stage_idx];
        let mut tops = [0.0f32; 3];
        let mut y = body.y;
        for level in 0..3 {
            let h = (counts[level] as f64 / n) as f32 * usable_h;
            tops[level] = y;
            if counts[level] > 0 {
                fig.canvas.rect(
                    x,
                    y,
                    node_w,
                    h,
                    &Paint::fill(&level_colors[level])
                        .outlined("#FFFFFF", 2.0)
                        .with_opacity(0.85),
                );
                if h > 26.0 {
                    fig.canvas.text(
                        x + node_w / 2.0,
                        y + h / 2.0,
                        level_names[level],
                        &label_style,
                    );
                    fig.canvas.text(
                        x + node_w / 2.0,
                        y + h / 2.0 + label_style.size + 1.0,
                        &format!("({})", counts[level]),
                        &label_style,
                    );
                }
            }
            y += h + gap;
        }
        node_tops.push(tops);
        fig.canvas.text(
            x + node_w / 2.0,
            body.bottom() + 24.0,
            label,
            &stage_style,
        );
    }

    // Ribbons between consecutive stages, offsets accumulated per node.
    for stage_idx in 0..n_stages - 1 {
        let left_levels = &stages[stage_idx].1;
        let right_levels = &stages[stage_idx + 1].1;
        let mut counts = [[0usize; 3]; 3];
        for (l, r) in left_levels.iter().zip(right_levels) {
            counts[*l][*r] += 1;
        }
        let mut left_offsets = node_tops[stage_idx];
        let mut right_offsets = node_tops[stage_idx + 1];
        for l in 0..3 {
            for r in 0..3 {
                let count = counts[l][r];
                if count == 0 {
                    continue;
                }
                let thickness = (count as f64 / n) as f32 * usable_h;
                let y0 = left_offsets[l];
                let y1 = right_offsets[r];
                left_offsets[l] += thickness;
                right_offsets[r] += thickness;
                draw_ribbon(
                    &mut fig,
                    stage_x[stage_idx] + node_w,
                    y0,
                    stage_x[stage_idx + 1],
                    y1,
                    thickness,
                    &level_colors[l],
                    flow_cfg.curve_tension,
                    flow_cfg.link_opacity + 0.1,
                );
            }
        }
    }

    super::legend_v(
        &mut fig,
        content.x + 6.0,
        content.y + 4.0,
        &[
            ("High Level".to_string(), level_colors[0].clone()),
            ("Medium Level".to_string(), level_colors[1].clone()),
            ("Low Level".to_string(), level_colors[2].clone()),
        ],
    );
    fig.footnote(content, "Mediation path visualization over tertile groups");

    fig.save(path)
}
