use super::axes::{x_axis_title, y_axis_title, Cartesian};
use super::legend_v;
use crate::canvas::{Anchor, Paint, Region, TextStyle};
use crate::config::Config;
use crate::figure::Figure;
use crate::model::{ModerationModel, RegressionSummary};
use crate::stats::sig_stars;
use crate::theme::PaletteFamily;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

fn tier_color(cfg: &Config, p: f64) -> String {
    if p < 0.001 {
        cfg.palette.positive.clone()
    } else if p < 0.01 {
        cfg.palette.primary.clone()
    } else if p < 0.05 {
        cfg.palette.secondary.clone()
    } else {
        cfg.palette.border.clone()
    }
}

/// Forest plot of standardized coefficients with the model summary card.
pub fn render_forest(results: &RegressionSummary, cfg: &Config, path: &Path) -> Result<()> {
    let mut rows: Vec<&crate::model::Coefficient> = results
        .coefficients
        .iter()
        .filter(|c| !c.name.eq_ignore_ascii_case("const") && !c.name.eq_ignore_ascii_case("intercept"))
        .collect();
    rows.sort_by(|a, b| a.beta.partial_cmp(&b.beta).unwrap_or(std::cmp::Ordering::Equal));
    debug!(rows = rows.len(), title = %results.title, "regression forest");

    let mut fig = Figure::new(1040.0, 680.0, cfg);
    fig.suptitle(&results.title);
    let columns = fig.content().split_h(&[1.5, 1.0], cfg.layout.panel_gap);

    let left = columns[0];
    fig.panel_label(left, 'A');
    let plot = Region::new(
        left.x + 170.0,
        left.y + 20.0,
        left.width - 190.0,
        left.height - 90.0,
    );
    let spread = rows
        .iter()
        .map(|c| c.beta.abs() + 1.96 * c.se.unwrap_or(c.beta.abs() * 0.2))
        .fold(0.1f64, f64::max);
    let axes = Cartesian::new(plot, -spread * 1.2, spread * 1.2);
    axes.draw_x_ticks(&mut fig, 6);
    let labels: Vec<&str> = rows.iter().map(|c| c.name.as_str()).collect();
    axes.draw_row_labels(&mut fig, &labels);
    fig.canvas.line(
        axes.x(0.0),
        plot.y,
        axes.x(0.0),
        plot.bottom(),
        &Paint::stroke("#333333", 1.5).with_opacity(0.7),
    );

    for (idx, coef) in rows.iter().enumerate() {
        let y = axes.row_center(idx, rows.len());
        let color = tier_color(cfg, coef.p);
        let se = coef.se.unwrap_or(if coef.beta == 0.0 {
            0.1
        } else {
            coef.beta.abs() * 0.2
        });
        fig.canvas.line(
            axes.x(coef.beta - 1.96 * se),
            y,
            axes.x(coef.beta + 1.96 * se),
            y,
            &Paint::stroke(&color, 2.5).with_opacity(0.7),
        );
        fig.canvas.circle(
            axes.x(coef.beta),
            y,
            7.0,
            &Paint::fill(&color).outlined("#FFFFFF", 2.0),
        );
        let text = format!("{:.3}{}", coef.beta, sig_stars(coef.p));
        let style = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).bold();
        if coef.beta >= 0.0 {
            fig.canvas
                .text(axes.x(coef.beta + 1.96 * se) + 8.0, y + 4.0, &text, &style);
        } else {
            fig.canvas.text(
                axes.x(coef.beta - 1.96 * se) - 8.0,
                y + 4.0,
                &text,
                &style.anchored(Anchor::End),
            );
        }
    }
    x_axis_title(&mut fig, plot, "Standardized Regression Coefficient");
    legend_v(
        &mut fig,
        plot.right() - 150.0,
        plot.bottom() - 72.0,
        &[
            ("p < 0.001 ***".to_string(), cfg.palette.positive.clone()),
            ("p < 0.01 **".to_string(), cfg.palette.primary.clone()),
            ("p < 0.05 *".to_string(), cfg.palette.secondary.clone()),
            ("Not Significant".to_string(), cfg.palette.border.clone()),
        ],
    );

    let right = columns[1];
    fig.panel_label(right, 'B');
    fig.panel_title(right, "Model Summary");
    let big = TextStyle::new(cfg.theme.title_size + 4.0, &cfg.palette.primary)
        .bold()
        .centered();
    fig.canvas.text(
        right.cx(),
        right.y + 56.0,
        &format!("R² = {:.4}", results.r_squared),
        &big,
    );
    fig.canvas.text(
        right.cx(),
        right.y + 84.0,
        &format!("Adj R² = {:.4}", results.adj_r_squared),
        &TextStyle::new(cfg.theme.font_size + 2.0, &cfg.theme.text_muted).centered(),
    );
    let card = Region::new(
        right.x + 20.0,
        right.y + 110.0,
        right.width - 40.0,
        right.height - 150.0,
    );
    fig.info_card(
        card,
        &[
            "Model Fit Statistics".to_string(),
            String::new(),
            format!("R-squared:   {:.4}", results.r_squared),
            format!("Adj R-sq:    {:.4}", results.adj_r_squared),
            format!("F-statistic: {:.2}", results.f_statistic),
            format!("F p-value:   {:.4}", results.f_pvalue),
            format!("N(obs):      {}", results.n_observations),
            String::new(),
            "Significance: *** p<0.001  ** p<0.01  * p<0.05".to_string(),
        ],
        "#DEE2E6",
    );

    fig.save(path)
}

/// Moderation figure: simple-slopes lines on the left, the probe table on
/// the right.
pub fn render_simple_slopes(model: &ModerationModel, cfg: &Config, path: &Path) -> Result<()> {
    debug!(slopes = model.slopes.len(), title = %model.title, "simple slopes");
    let mut fig = Figure::new(1040.0, 680.0, cfg);
    fig.suptitle(&format!("{} - Moderation Effect Analysis", model.title));
    let columns = fig.content().split_h(&[1.5, 1.0], cfg.layout.panel_gap);

    let left = columns[0];
    fig.panel_label(left, 'A');
    fig.panel_title(left, "Simple Slope Analysis");
    let plot = Region::new(
        left.x + 64.0,
        left.y + 34.0,
        left.width - 84.0,
        left.height - 104.0,
    );

    let x_lo = model.x_mean - 1.5 * model.x_sd;
    let x_hi = model.x_mean + 1.5 * model.x_sd;
    let predict = |x: f64, w: f64| -> f64 {
        let xc = x - model.x_mean;
        model.intercept + model.x_coef * xc + model.w_coef * w + model.xw_coef * xc * w
            + model.y_mean
            - model.intercept
    };
    let mut y_lo = f64::INFINITY;
    let mut y_hi = f64::NEG_INFINITY;
    for slope in &model.slopes {
        for x in [x_lo, x_hi] {
            let y = predict(x, slope.level);
            y_lo = y_lo.min(y);
            y_hi = y_hi.max(y);
        }
    }
    let margin = ((y_hi - y_lo) * 0.25).max(0.2);
    let axes = Cartesian::new(plot, y_lo - margin, y_hi + margin);
    axes.draw_frame(&mut fig);
    axes.draw_y_ticks(&mut fig, 5);

    let colors = cfg.palette.colors(model.slopes.len().max(3), PaletteFamily::Categorical);
    let dashes = [None, Some("8 5"), Some("2 4")];
    let x_of =
        |x: f64| plot.x + ((x - x_lo) / (x_hi - x_lo)) as f32 * plot.width;
    let mut legend_entries = Vec::new();
    for (idx, slope) in model.slopes.iter().enumerate() {
        const STEPS: usize = 48;
        let points: Vec<(f32, f32)> = (0..=STEPS)
            .map(|step| {
                let x = x_lo + (x_hi - x_lo) * step as f64 / STEPS as f64;
                (x_of(x), axes.y(predict(x, slope.level)))
            })
            .collect();
        // Simplified confidence band around the fitted line.
        let band = (slope.slope.abs() * 0.15).max(0.02);
        let mut ribbon: Vec<(f32, f32)> = (0..=STEPS)
            .map(|step| {
                let x = x_lo + (x_hi - x_lo) * step as f64 / STEPS as f64;
                (x_of(x), axes.y(predict(x, slope.level) + band))
            })
            .collect();
        ribbon.extend((0..=STEPS).rev().map(|step| {
            let x = x_lo + (x_hi - x_lo) * step as f64 / STEPS as f64;
            (x_of(x), axes.y(predict(x, slope.level) - band))
        }));
        fig.canvas
            .polygon(&ribbon, &Paint::fill(&colors[idx]).with_opacity(0.1));
        let mut paint = Paint::stroke(&colors[idx], 3.0).rounded();
        if let Some(dash) = dashes[idx % dashes.len()] {
            paint = paint.dashed(dash);
        }
        fig.canvas.polyline(&points, &paint);
        for point in points.iter().step_by(STEPS / 4) {
            fig.canvas.circle(
                point.0,
                point.1,
                4.5,
                &Paint::fill(&colors[idx]).outlined("#FFFFFF", 1.5),
            );
        }
        legend_entries.push((
            format!(
                "{} = {} (β={:.3}{})",
                model.w_label,
                slope.level_label,
                slope.slope,
                sig_stars(slope.p)
            ),
            colors[idx].clone(),
        ));
    }
    legend_v(&mut fig, plot.x + 10.0, plot.y + 8.0, &legend_entries);
    x_axis_title(&mut fig, plot, &model.x_label);
    y_axis_title(&mut fig, plot, &model.y_label);

    let right = columns[1];
    fig.panel_label(right, 'B');
    fig.panel_title(right, "Simple Slope Statistics");
    draw_slope_table(&mut fig, right.inset_xy(10.0, 44.0), model, cfg);

    fig.save(path)
}

fn draw_slope_table(fig: &mut Figure<'_>, region: Region, model: &ModerationModel, cfg: &Config) {
    const HEADERS: [&str; 6] = ["Level", "β", "SE", "t", "p", "Sig"];
    let rows = model.slopes.len() + 1;
    let row_h = (region.height / rows as f32).min(40.0);
    let widths = [0.26f32, 0.15, 0.15, 0.15, 0.16, 0.13];
    let header_style = TextStyle::new(cfg.theme.label_size, "#FFFFFF").bold().centered();
    let cell_style = TextStyle::new(cfg.theme.label_size, &cfg.theme.text_color).centered();

    let mut x = region.x;
    for (idx, header) in HEADERS.iter().enumerate() {
        let w = region.width * widths[idx];
        fig.canvas.rect(
            x,
            region.y,
            w,
            row_h,
            &Paint::fill(&cfg.palette.primary).outlined("#DEE2E6", 1.0),
        );
        fig.canvas
            .text(x + w / 2.0, region.y + row_h / 2.0 + 4.0, header, &header_style);
        x += w;
    }
    for (row_idx, slope) in model.slopes.iter().enumerate() {
        let stars = sig_stars(slope.p);
        let cells = [
            slope.level_label.clone(),
            format!("{:.3}", slope.slope),
            format!("{:.3}", slope.se),
            format!("{:.3}", slope.t),
            format!("{:.4}", slope.p),
            if stars.is_empty() { "ns".to_string() } else { stars.to_string() },
        ];
        let y = region.y + (row_idx + 1) as f32 * row_h;
        let mut x = region.x;
        for (col_idx, cell) in cells.iter().enumerate() {
            let w = region.width * widths[col_idx];
            let fill = if col_idx == 5 && stars == "***" {
                "#D4EDDA"
            } else if col_idx == 5 && !stars.is_empty() {
                "#FFF3CD"
            } else {
                "#FFFFFF"
            };
            fig.canvas
                .rect(x, y, w, row_h, &Paint::fill(fill).outlined("#DEE2E6", 1.0));
            fig.canvas
                .text(x + w / 2.0, y + row_h / 2.0 + 4.0, cell, &cell_style);
            x += w;
        }
    }
}
