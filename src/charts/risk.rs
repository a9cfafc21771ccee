use super::axes::Cartesian;
use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::{reverse_likert, Dataset, SurveyRecord};
use crate::figure::Figure;
use crate::stats;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

type Getter = fn(&SurveyRecord) -> u8;

const PROBLEMS: [(&str, Getter); 5] = [
    ("Range Anxiety", |r| r.concern_range),
    ("Charging Inconv.", |r| r.concern_charging),
    ("Battery Safety", |r| r.concern_battery),
    ("High Price", |r| r.concern_price),
    ("Overall Safety", |r| r.concern_safety),
];

struct RiskRow {
    label: &'static str,
    worry_pct: f64,
    diff: f64,
    se: f64,
}

/// Concern share vs intention difference on twin horizontal scales:
/// bars for how many worry, diamonds for how much intention differs
/// between the worried and unworried groups.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let mut fig = Figure::new(980.0, 720.0, cfg);
    fig.suptitle("NEV Concerns vs Purchase Intention");
    let content = fig.content();
    if data.is_empty() {
        fig.placeholder(content, "Insufficient data");
        return fig.save(path);
    }

    let mut rows: Vec<RiskRow> = PROBLEMS
        .iter()
        .map(|&(label, get)| {
            let worried: Vec<f64> = data
                .records()
                .iter()
                .filter(|r| get(r) == 1)
                .map(|r| reverse_likert(r.purchase_intention as f64))
                .collect();
            let unworried: Vec<f64> = data
                .records()
                .iter()
                .filter(|r| get(r) == 0)
                .map(|r| reverse_likert(r.purchase_intention as f64))
                .collect();
            RiskRow {
                label,
                worry_pct: data.share(worried.len()),
                diff: stats::mean(&unworried) - stats::mean(&worried),
                se: stats::standard_error(&worried),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.worry_pct
            .partial_cmp(&a.worry_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debug!(
        rows = ?rows.iter().map(|r| (r.label, r.worry_pct, r.diff)).collect::<Vec<_>>(),
        "risk vs intention"
    );

    let plot = Region::new(
        content.x + 150.0,
        content.y + 30.0,
        content.width - 190.0,
        content.height - 120.0,
    );
    let max_pct = rows.iter().map(|r| r.worry_pct).fold(1.0f64, f64::max);
    let pct_axis = Cartesian::new(plot, 0.0, max_pct * 1.3);
    pct_axis.draw_x_ticks(&mut fig, 5);
    let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
    pct_axis.draw_row_labels(&mut fig, &labels);

    let max_diff = rows.iter().map(|r| r.diff.abs() + r.se).fold(0.2f64, f64::max) * 1.5;
    let diff_x = |v: f64| plot.cx() + (v / max_diff) as f32 * plot.width / 2.0;

    // Zero reference for the difference scale.
    fig.canvas.line(
        diff_x(0.0),
        plot.y,
        diff_x(0.0),
        plot.bottom(),
        &Paint::stroke(&cfg.theme.grid_color, 1.5).dashed("6 4").with_opacity(0.7),
    );

    let slot = plot.height / rows.len() as f32;
    let bar_h = slot * 0.45;
    let pct_style = TextStyle::new(cfg.theme.label_size, &cfg.palette.primary).bold();
    for (idx, row) in rows.iter().enumerate() {
        let y = pct_axis.row_center(idx, rows.len());
        fig.canvas.rect(
            plot.x,
            y - bar_h / 2.0,
            pct_axis.x(row.worry_pct) - plot.x,
            bar_h,
            &Paint::fill(&cfg.palette.primary)
                .outlined("#FFFFFF", 2.0)
                .with_opacity(0.7),
        );
        fig.canvas.text(
            pct_axis.x(row.worry_pct) + 6.0,
            y + 4.0,
            &format!("{:.0}%", row.worry_pct),
            &pct_style,
        );
    }

    // Intention-difference markers ride on the centered twin scale.
    for (idx, row) in rows.iter().enumerate() {
        let y = pct_axis.row_center(idx, rows.len());
        let color = if row.diff > 0.0 {
            cfg.palette.positive.clone()
        } else {
            cfg.palette.negative.clone()
        };
        let x = diff_x(row.diff);
        fig.canvas.line(
            diff_x(row.diff - row.se),
            y,
            diff_x(row.diff + row.se),
            y,
            &Paint::stroke("#666666", 1.5),
        );
        for cap in [row.diff - row.se, row.diff + row.se] {
            fig.canvas
                .line(diff_x(cap), y - 4.0, diff_x(cap), y + 4.0, &Paint::stroke("#666666", 1.5));
        }
        fig.canvas.polygon(
            &[
                (x, y - 8.0),
                (x + 8.0, y),
                (x, y + 8.0),
                (x - 8.0, y),
            ],
            &Paint::fill(&color).outlined("#FFFFFF", 2.0),
        );
        fig.canvas.text(
            x,
            y - 14.0,
            &format!("{:+.2}", row.diff),
            &TextStyle::new(cfg.theme.label_size, &color).bold().centered(),
        );
    }

    fig.canvas.text(
        plot.cx(),
        plot.bottom() + 36.0,
        "Worry Percentage (%)",
        &TextStyle::new(cfg.theme.font_size, &cfg.palette.primary).bold().centered(),
    );
    fig.canvas.text(
        plot.cx(),
        plot.y - 10.0,
        "Intention Difference (Not Worried - Worried)",
        &TextStyle::new(cfg.theme.font_size, "#666666").bold().centered(),
    );

    super::legend_v(
        &mut fig,
        plot.right() - 250.0,
        plot.bottom() - 64.0,
        &[
            ("Worry %".to_string(), cfg.palette.primary.clone()),
            ("Positive diff (worry lowers intention)".to_string(), cfg.palette.positive.clone()),
            ("Negative diff".to_string(), cfg.palette.negative.clone()),
        ],
    );
    fig.footnote(
        content,
        "Positive difference: respondents worried about the issue report lower intention",
    );
    fig.save(path)
}
