use super::{draw_lollipop, legend_v, Slice};
use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::{Dataset, SurveyRecord};
use crate::figure::Figure;
use anyhow::Result;
use std::f32::consts::TAU;
use std::path::Path;
use tracing::debug;

/// Figure 3: renewable-energy recognition - classified lollipop plus a
/// double-ring accuracy donut.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    type Getter = fn(&SurveyRecord) -> u8;
    let correct: [(&str, Getter); 4] = [
        ("Solar", |r| r.renewable_solar),
        ("Wind", |r| r.renewable_wind),
        ("Hydro", |r| r.renewable_hydro),
        ("Biomass", |r| r.renewable_biomass),
    ];
    let incorrect: [(&str, Getter); 3] = [
        ("Oil", |r| r.renewable_oil),
        ("Coal", |r| r.renewable_coal),
        ("Natural Gas", |r| r.renewable_gas),
    ];

    let n = data.len() as f64;
    let mut slices: Vec<Slice> = Vec::new();
    for (label, get) in correct {
        slices.push(Slice::new(label, data.flag_sum(get) as f64, &cfg.palette.primary));
    }
    for (label, get) in incorrect {
        slices.push(Slice::new(label, data.flag_sum(get) as f64, &cfg.palette.negative));
    }
    slices.push(Slice::new(
        "Nuclear",
        data.flag_sum(|r| r.renewable_nuclear) as f64,
        &cfg.palette.neutral,
    ));
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    debug!(counts = ?slices.iter().map(|s| (s.label.clone(), s.value)).collect::<Vec<_>>(),
        "energy recognition counts");

    // Share of respondents marking each renewable item, and of those
    // correctly leaving each non-renewable item unmarked.
    let correct_renewable = correct
        .iter()
        .map(|(_, get)| data.flag_sum(*get) as f64)
        .sum::<f64>()
        / (correct.len() as f64 * n)
        * 100.0;
    let correct_nonrenewable = incorrect
        .iter()
        .map(|(_, get)| n - data.flag_sum(*get) as f64)
        .sum::<f64>()
        / (incorrect.len() as f64 * n)
        * 100.0;

    let mut fig = Figure::new(1080.0, 600.0, cfg);
    fig.suptitle("Figure 3: Renewable Energy Recognition Accuracy Analysis");
    let columns = fig.content().split_h(&[1.5, 1.0], cfg.layout.panel_gap);

    let left = columns[0];
    fig.panel_label(left, 'A');
    fig.panel_title(left, "Recognition of Energy Types");
    draw_lollipop(&mut fig, left.inset_xy(4.0, 44.0), &slices, n);
    legend_v(
        &mut fig,
        left.x + left.width * 0.55,
        left.bottom() - 58.0,
        &[
            ("Correct (Renewable)".to_string(), cfg.palette.primary.clone()),
            ("Incorrect (Non-Renewable)".to_string(), cfg.palette.negative.clone()),
            ("Controversial (Nuclear)".to_string(), cfg.palette.neutral.clone()),
        ],
    );

    let right = columns[1];
    fig.panel_label(right, 'B');
    fig.panel_title(right, "Recognition Accuracy Statistics");
    let body = Region::new(right.x, right.y + 30.0, right.width, right.height - 90.0);
    let cx = body.cx();
    let cy = body.cy();
    let r_outer = body.width.min(body.height) / 2.0 * 0.85;
    let ring = r_outer * 0.25;
    draw_accuracy_ring(
        &mut fig,
        cx,
        cy,
        r_outer,
        ring,
        correct_renewable,
        &cfg.palette.primary.clone(),
    );
    draw_accuracy_ring(
        &mut fig,
        cx,
        cy,
        r_outer * 0.7,
        ring,
        correct_nonrenewable,
        &cfg.palette.quaternary.clone(),
    );
    let overall = (correct_renewable + correct_nonrenewable) / 2.0;
    fig.canvas.text(
        cx,
        cy,
        &format!("{overall:.1}%"),
        &TextStyle::new(fig.cfg.theme.title_size + 6.0, &fig.cfg.theme.text_color.clone())
            .bold()
            .centered(),
    );
    fig.canvas.text(
        cx,
        cy + fig.cfg.theme.font_size + 4.0,
        "Overall Accuracy",
        &TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_muted.clone()).centered(),
    );
    legend_v(
        &mut fig,
        right.x + right.width * 0.18,
        right.bottom() - 44.0,
        &[
            (
                format!("Renewable Recog: {correct_renewable:.1}%"),
                cfg.palette.primary.clone(),
            ),
            (
                format!("Non-Renewable Recog: {correct_nonrenewable:.1}%"),
                cfg.palette.quaternary.clone(),
            ),
        ],
    );

    fig.save(path)
}

/// One accuracy ring: the filled arc spans `pct` of the circle, the
/// remainder is the border grey.
fn draw_accuracy_ring(
    fig: &mut Figure<'_>,
    cx: f32,
    cy: f32,
    r_outer: f32,
    ring: f32,
    pct: f64,
    color: &str,
) {
    let split = (pct / 100.0).clamp(0.0, 1.0) as f32 * TAU;
    let stroke = fig.cfg.layout.donut.slice_stroke.clone();
    let remainder = fig.cfg.palette.border.clone();
    let r_inner = (r_outer - ring).max(0.0);
    fig.canvas.annular_sector(
        cx,
        cy,
        r_outer,
        r_inner,
        0.0,
        split,
        &Paint::fill(color).outlined(&stroke, 2.0),
    );
    fig.canvas.annular_sector(
        cx,
        cy,
        r_outer,
        r_inner,
        split,
        TAU,
        &Paint::fill(remainder).outlined(&stroke, 2.0),
    );
}
