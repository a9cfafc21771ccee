use super::axes::Cartesian;
use super::trust::{TRUST_AXES, TRUST_ITEMS};
use super::{draw_radar, legend_h};
use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::{reverse_likert, Dataset, SurveyRecord};
use crate::figure::Figure;
use crate::theme::PaletteFamily;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

const CORE_VARS: [(&str, fn(&SurveyRecord) -> f64); 4] = [
    ("Knowledge Index", |r| r.knowledge_index),
    ("Responsibility Index", |r| r.responsibility_index),
    ("Trust Index", |r| r.trust_index),
    ("Policy Support Index", |r| r.policy_index),
];

const EDUCATION_GROUPS: [(u8, &str); 3] = [(1, "Undergraduate"), (2, "Master"), (3, "PhD")];

/// Dumbbell chart of the core indices across education groups: one grey
/// connector per variable, one dot per group.
pub fn render_dumbbell(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let mut fig = Figure::new(980.0, 640.0, cfg);
    fig.suptitle("Core Variables Comparison by Education");
    let content = fig.content();
    let plot = Region::new(
        content.x + 170.0,
        content.y + 34.0,
        content.width - 210.0,
        content.height - 100.0,
    );

    let means: Vec<Vec<f64>> = CORE_VARS
        .iter()
        .map(|(_, get)| {
            EDUCATION_GROUPS
                .iter()
                .map(|(code, _)| {
                    data.group_mean(|r| r.education, *code, *get).unwrap_or(0.0)
                })
                .collect()
        })
        .collect();
    debug!(?means, "dumbbell group means");

    let flat: Vec<f64> = means.iter().flatten().copied().collect();
    let lo = flat.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = flat.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).max(0.2);
    let axes = Cartesian::new(plot, lo - span * 0.25, hi + span * 0.25);
    axes.draw_x_ticks(&mut fig, 5);
    let labels: Vec<&str> = CORE_VARS.iter().map(|(label, _)| *label).collect();
    axes.draw_row_labels(&mut fig, &labels);

    let colors = cfg.palette.colors(EDUCATION_GROUPS.len(), PaletteFamily::Categorical);
    let value_style = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).bold();
    for (row, row_means) in means.iter().enumerate() {
        let y = axes.row_center(row, means.len());
        let x_lo = axes.x(row_means.iter().copied().fold(f64::INFINITY, f64::min));
        let x_hi = axes.x(row_means.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        fig.canvas
            .line(x_lo, y, x_hi, y, &Paint::stroke("#DDDDDD", 4.0).rounded());

        let min_idx = row_means
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let max_idx = row_means
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        for (group, mean) in row_means.iter().enumerate() {
            let x = axes.x(*mean);
            fig.canvas.circle(
                x,
                y,
                8.0,
                &Paint::fill(&colors[group]).outlined("#FFFFFF", 3.0),
            );
            let text = format!("{mean:.2}");
            let mut style = TextStyle {
                color: colors[group].clone(),
                ..value_style.clone()
            };
            if group == min_idx {
                style.anchor = crate::canvas::Anchor::End;
                fig.canvas.text(x - 14.0, y + 4.0, &text, &style);
            } else if group == max_idx {
                fig.canvas.text(x + 14.0, y + 4.0, &text, &style);
            } else {
                style.anchor = crate::canvas::Anchor::Middle;
                fig.canvas.text(x, y - 14.0, &text, &style);
            }
        }
    }

    legend_h(
        &mut fig,
        Region::new(plot.x, content.y, plot.width, 24.0),
        &EDUCATION_GROUPS
            .iter()
            .zip(&colors)
            .map(|((_, label), color)| (label.to_string(), color.clone()))
            .collect::<Vec<_>>(),
    );
    super::axes::x_axis_title(&mut fig, plot, "Mean Score");
    fig.footnote(content, "Line length indicates magnitude of group difference");

    fig.save(path)
}

/// One radar panel per subgroup, shared axes and scale, reverse-coded
/// trust profile per group.
pub fn render_radar_comparison(
    data: &Dataset,
    cfg: &Config,
    path: &Path,
    group: fn(&SurveyRecord) -> u8,
    groups: &[(u8, &str)],
    title: &str,
) -> Result<()> {
    debug!(title, groups = groups.len(), "radar comparison");
    let mut fig = Figure::new(440.0 * groups.len() as f32, 480.0, cfg);
    fig.suptitle(title);
    let cells = fig
        .content()
        .grid(1, groups.len(), cfg.layout.panel_gap, 0.0);
    let colors = cfg.palette.colors(groups.len(), PaletteFamily::Categorical);

    for (idx, (code, label)) in groups.iter().enumerate() {
        let cell = cells[idx];
        let n = data.group_len(group, *code);
        fig.panel_label(cell, char::from(b'A' + idx as u8));
        fig.panel_title(cell, &format!("{label} (n={n})"));
        let profile: Vec<f64> = TRUST_ITEMS
            .iter()
            .map(|get| {
                data.group_mean(group, *code, move |r| get(r) as f64)
                    .map(reverse_likert)
                    .unwrap_or(0.0)
            })
            .collect();
        draw_radar(
            &mut fig,
            Region::new(cell.x, cell.y + 22.0, cell.width, cell.height - 22.0),
            &TRUST_AXES,
            &[(label.to_string(), colors[idx].clone(), profile)],
            true,
        );
    }

    fig.save(path)
}
