use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::model::MediationEffects;
use crate::stats::{pearson_with_p, sig_stars};
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Mediation path diagram: X -> M -> Y triangle with the direct path
/// dashed underneath and the indirect-effect card below.
pub fn render_mediation(effects: &MediationEffects, cfg: &Config, path: &Path) -> Result<()> {
    debug!(indirect = effects.indirect, "mediation diagram");
    let mut fig = Figure::new(980.0, 640.0, cfg);
    fig.suptitle("Mediation Effect Path Diagram");
    let content = fig.content();
    let stage = Region::new(content.x, content.y, content.width, content.height * 0.62);

    let x_pos = (stage.x + stage.width * 0.14, stage.y + stage.height * 0.62);
    let m_pos = (stage.cx(), stage.y + stage.height * 0.16);
    let y_pos = (stage.right() - stage.width * 0.14, stage.y + stage.height * 0.62);

    draw_variable_box(&mut fig, x_pos, &effects.x_label, &cfg.palette.primary.clone());
    draw_variable_box(&mut fig, m_pos, &effects.m_label, &cfg.palette.primary.clone());
    draw_variable_box(&mut fig, y_pos, &effects.y_label, &cfg.palette.primary.clone());

    let primary = cfg.palette.primary.clone();
    draw_arrow(&mut fig, x_pos, m_pos, &primary, 2.5, false, 70.0);
    draw_arrow(&mut fig, m_pos, y_pos, &primary, 2.5, false, 70.0);
    draw_arrow(&mut fig, x_pos, y_pos, "#999999", 2.0, true, 80.0);

    // Magnitude-based stars: the bundle carries no per-path p values.
    let magnitude_stars = |coef: f64| {
        if coef.abs() > 0.3 {
            "***"
        } else if coef.abs() > 0.2 {
            "**"
        } else {
            "*"
        }
    };
    let path_style = TextStyle::new(cfg.theme.font_size, &primary).bold().centered();
    fig.canvas.text(
        (x_pos.0 + m_pos.0) / 2.0 - 30.0,
        (x_pos.1 + m_pos.1) / 2.0 - 12.0,
        &format!("a = {:.3}{}", effects.a, magnitude_stars(effects.a)),
        &path_style,
    );
    fig.canvas.text(
        (m_pos.0 + y_pos.0) / 2.0 + 30.0,
        (m_pos.1 + y_pos.1) / 2.0 - 12.0,
        &format!("b = {:.3}{}", effects.b, magnitude_stars(effects.b)),
        &path_style,
    );
    fig.canvas.text(
        stage.cx(),
        x_pos.1 + 30.0,
        &format!("c' = {:.3}", effects.c_prime),
        &TextStyle::new(cfg.theme.font_size, "#666666").bold().centered(),
    );

    let significant = effects.indirect_significant();
    let verdict = if significant { "Significant" } else { "Not Significant" };
    let border = if significant {
        cfg.palette.positive.clone()
    } else {
        cfg.palette.negative.clone()
    };
    let card = Region::new(
        content.x + content.width * 0.26,
        stage.bottom() + 10.0,
        content.width * 0.48,
        content.height * 0.32,
    );
    fig.info_card(
        card,
        &[
            "Indirect Effect Analysis".to_string(),
            format!("Indirect Effect (a x b): {:.4}", effects.indirect),
            format!("95% CI: [{:.4}, {:.4}]", effects.ci_low, effects.ci_high),
            format!("Conclusion: {verdict}"),
            format!("Total Effect (c): {:.4}", effects.c),
            format!("Direct Effect (c'): {:.4}", effects.c_prime),
        ],
        &border,
    );

    fig.save(path)
}

/// SEM-style path model over the six core variables, path coefficients
/// proxied by Pearson r with significance stars.
pub fn render_sem(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let columns = data.core_columns();
    let mut fig = Figure::new(1120.0, 820.0, cfg);
    fig.suptitle("NEV Purchase Intention Influence Path Model");
    let content = fig.content();
    if data.len() < 10 {
        fig.placeholder(content, "Insufficient data");
        return fig.save(path);
    }

    // (label, relative position); x grows left to right along the causal
    // ordering, dependents at the right edge.
    let nodes: [(&str, (f32, f32)); 6] = [
        ("Knowledge", (0.13, 0.50)),
        ("Trust", (0.40, 0.22)),
        ("Responsibility", (0.40, 0.78)),
        ("Policy", (0.64, 0.36)),
        ("Attitude", (0.64, 0.64)),
        ("Intention", (0.88, 0.50)),
    ];
    let paths: [(usize, usize); 10] = [
        (0, 1),
        (0, 2),
        (0, 4),
        (1, 4),
        (1, 3),
        (2, 4),
        (3, 4),
        (4, 5),
        (1, 5),
        (3, 5),
    ];
    let node_colors = [
        cfg.palette.primary.clone(),
        cfg.palette.tertiary.clone(),
        cfg.palette.secondary.clone(),
        cfg.palette.quaternary.clone(),
        cfg.palette.neutral.clone(),
        cfg.palette.positive.clone(),
    ];

    let stage = content.inset_xy(20.0, 26.0);
    let at = |(fx, fy): (f32, f32)| (stage.x + fx * stage.width, stage.y + fy * stage.height);

    let column_of = |label: &str| {
        columns
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, column)| column)
    };
    for (from, to) in paths {
        let (Some(series_a), Some(series_b)) =
            (column_of(nodes[from].0), column_of(nodes[to].0))
        else {
            continue;
        };
        let Some((r, p)) = pearson_with_p(series_a, series_b) else {
            continue;
        };
        debug!(from = nodes[from].0, to = nodes[to].0, r, p, "sem path");
        let color = if r > 0.0 {
            cfg.palette.positive.clone()
        } else {
            cfg.palette.negative.clone()
        };
        let significant = p < 0.05;
        let width = if significant {
            (r.abs() as f32 * 5.0).max(1.5)
        } else {
            1.5
        };
        let start = at(nodes[from].1);
        let end = at(nodes[to].1);
        draw_arrow(&mut fig, start, end, &color, width, !significant, 64.0);

        let mid_x = (start.0 + end.0) / 2.0;
        let mid_y = (start.1 + end.1) / 2.0;
        fig.canvas.rounded_rect(
            mid_x - 34.0,
            mid_y - 10.0,
            68.0,
            20.0,
            5.0,
            &Paint::fill("#FFFFFF").with_opacity(0.9),
        );
        fig.canvas.text(
            mid_x,
            mid_y + 4.0,
            &format!("β={:.2}{}", r, sig_stars(p)),
            &TextStyle::new(cfg.theme.label_size, &color).bold().centered(),
        );
    }

    for (idx, (label, pos)) in nodes.iter().enumerate() {
        let (x, y) = at(*pos);
        fig.canvas.rounded_rect(
            x - 62.0,
            y - 21.0,
            124.0,
            42.0,
            9.0,
            &Paint::fill(&node_colors[idx]).outlined("#FFFFFF", 3.0).with_opacity(0.92),
        );
        fig.canvas.text(
            x,
            y + 4.5,
            label,
            &TextStyle::new(cfg.theme.font_size, "#FFFFFF").bold().centered(),
        );
    }

    super::legend_v(
        &mut fig,
        content.x + 6.0,
        content.bottom() - 56.0,
        &[
            ("Positive Effect".to_string(), cfg.palette.positive.clone()),
            ("Negative Effect".to_string(), cfg.palette.negative.clone()),
            ("Not Significant (dashed)".to_string(), "#999999".to_string()),
        ],
    );
    fig.footnote(content, "*** p<0.001  ** p<0.01  * p<0.05; coefficients are Pearson r");

    fig.save(path)
}

fn draw_variable_box(fig: &mut Figure<'_>, center: (f32, f32), label: &str, border: &str) {
    let w = 150.0;
    let h = 46.0;
    fig.canvas.rounded_rect(
        center.0 - w / 2.0,
        center.1 - h / 2.0,
        w,
        h,
        9.0,
        &Paint::fill("#F8F9FA").outlined(border, 2.5),
    );
    fig.canvas.text(
        center.0,
        center.1 + 4.5,
        label,
        &TextStyle::new(fig.cfg.theme.font_size + 1.0, &fig.cfg.theme.text_color)
            .bold()
            .centered(),
    );
}

/// Straight arrow shortened at both ends so it clears the node boxes, with
/// a filled triangular head.
fn draw_arrow(
    fig: &mut Figure<'_>,
    from: (f32, f32),
    to: (f32, f32),
    color: &str,
    width: f32,
    dashed: bool,
    clearance: f32,
) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let dist = (dx * dx + dy * dy).sqrt().max(1.0);
    let (ux, uy) = (dx / dist, dy / dist);
    let clear = clearance.min(dist * 0.35);
    let start = (from.0 + ux * clear, from.1 + uy * clear);
    let end = (to.0 - ux * clear, to.1 - uy * clear);

    let mut paint = Paint::stroke(color, width).rounded();
    let mut opacity = 0.85;
    if dashed {
        paint = paint.dashed("7 5");
        opacity = 0.45;
    }
    fig.canvas
        .line(start.0, start.1, end.0, end.1, &paint.with_opacity(opacity));

    let head = 9.0 + width;
    let (px, py) = (-uy, ux);
    fig.canvas.polygon(
        &[
            (end.0 + ux * head, end.1 + uy * head),
            (end.0 + px * head * 0.45, end.1 + py * head * 0.45),
            (end.0 - px * head * 0.45, end.1 - py * head * 0.45),
        ],
        &Paint::fill(color).with_opacity(opacity),
    );
}
