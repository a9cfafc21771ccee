use super::{draw_lollipop, draw_vbars, Slice};
use crate::canvas::{polar_point, Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::{Dataset, SurveyRecord};
use crate::figure::Figure;
use crate::output::{panel_path, FigureFormat};
use crate::theme::PaletteFamily;
use anyhow::Result;
use std::f32::consts::TAU;
use std::path::Path;
use tracing::debug;

type Getter = fn(&SurveyRecord) -> u8;

const CHANNELS: [(&str, Getter); 5] = [
    ("School Courses", |r| r.channel_courses),
    ("News Media", |r| r.channel_news),
    ("Social Media", |r| r.channel_social),
    ("Academic Lit", |r| r.channel_academic),
    ("Friends/Family", |r| r.channel_friends),
];

const GOALS: [(&str, Getter); 5] = [
    ("Energy Security", |r| r.goal_security),
    ("Reduce Pollution", |r| r.goal_pollution),
    ("Reduce Dependency", |r| r.goal_dependency),
    ("Tech Innovation", |r| r.goal_innovation),
    ("Green Transition", |r| r.goal_green),
];

const FOCUS: [(&str, Getter); 5] = [
    ("R&D", |r| r.focus_rnd),
    ("Infrastructure", |r| r.focus_infrastructure),
    ("Education", |r| r.focus_education),
    ("Incentives", |r| r.focus_incentives),
    ("Retrofitting", |r| r.focus_retrofit),
];

/// Figure 6: information channels and public attitudes. The four panels are
/// drawn once per destination: standalone files in the sibling panel
/// directory, then the combined 2x2 figure.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    debug!(
        channels = ?CHANNELS.map(|(label, get)| (label, data.flag_sum(get))),
        goals = ?GOALS.map(|(label, get)| (label, data.flag_sum(get))),
        "info channel aggregates"
    );
    let format = FigureFormat::from_path(path);
    let panels: [(char, &str, PanelFn); 4] = [
        ('A', "Information Channels", draw_channels),
        ('B', "Core Goals of Energy Transition", draw_goals),
        ('C', "Social Responsibility", draw_duty),
        ('D', "Expected Gov Focus Areas", draw_focus),
    ];

    for (letter, title, draw) in panels {
        let mut fig = Figure::new(640.0, 480.0, cfg);
        let region = fig.content();
        fig.panel_title(region, title);
        draw(&mut fig, region.inset_xy(6.0, 30.0), data);
        fig.save(&panel_path(path, letter, title, format)?)?;
    }

    let mut fig = Figure::new(1180.0, 820.0, cfg);
    fig.suptitle("Figure 6: Comprehensive Analysis of Information Channels and Public Attitudes");
    let cells = fig
        .content()
        .grid(2, 2, cfg.layout.panel_gap, cfg.layout.panel_gap);
    for (cell, (letter, title, draw)) in cells.iter().zip(panels) {
        fig.panel_label(*cell, letter);
        fig.panel_title(*cell, title);
        draw(&mut fig, cell.inset_xy(6.0, 30.0), data);
    }
    fig.save(path)
}

type PanelFn = fn(&mut Figure<'_>, Region, &Dataset);

fn draw_channels(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let colors = fig.cfg.palette.colors(CHANNELS.len(), PaletteFamily::Categorical);
    let mut slices: Vec<Slice> = CHANNELS
        .iter()
        .zip(&colors)
        .map(|((label, get), color)| Slice::new(*label, data.flag_sum(*get) as f64, color))
        .collect();
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    draw_lollipop(fig, region, &slices, data.len() as f64);
}

/// Polar bar panel: one wedge per goal, radius by count.
fn draw_goals(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let colors = fig.cfg.palette.colors(GOALS.len(), PaletteFamily::Categorical);
    let counts: Vec<f64> = GOALS.iter().map(|(_, get)| data.flag_sum(*get) as f64).collect();
    let max = counts.iter().copied().fold(0.0f64, f64::max).max(1.0);
    let cx = region.cx();
    let cy = region.cy();
    let r_max = region.width.min(region.height) / 2.0 * 0.66;

    let grid = Paint::stroke(&fig.cfg.theme.grid_color, 0.7).with_opacity(0.5);
    for ring in 1..=4 {
        fig.canvas.circle(cx, cy, r_max * ring as f32 / 4.0, &grid);
    }
    let slot = TAU / GOALS.len() as f32;
    let label_style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_color)
        .bold()
        .centered();
    for (idx, ((label, _), count)) in GOALS.iter().zip(&counts).enumerate() {
        let center = idx as f32 * slot;
        let half = slot * 0.4;
        let r = r_max * (*count as f32) / max as f32;
        fig.canvas.annular_sector(
            cx,
            cy,
            r,
            0.0,
            center - half,
            center + half,
            &Paint::fill(&colors[idx])
                .outlined("#FFFFFF", 2.0)
                .with_opacity(0.85),
        );
        let (lx, ly) = polar_point(cx, cy, r_max + 16.0, center);
        fig.canvas.text(lx, ly, label, &label_style);
        let (vx, vy) = polar_point(cx, cy, (r + 14.0).min(r_max), center);
        fig.canvas.text(
            vx,
            vy,
            &format!("{count:.0}"),
            &TextStyle::new(fig.cfg.theme.label_size - 1.0, "#2C3E50").bold().centered(),
        );
    }
}

fn draw_duty(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let counts = data.counts_for(|r| r.duty_awareness, &[1, 2, 3]);
    let palette = fig.cfg.palette.clone();
    let slices = vec![
        Slice::new("Yes", counts[0] as f64, palette.positive),
        Slice::new("No", counts[1] as f64, palette.negative),
        Slice::new("Uncertain", counts[2] as f64, palette.neutral),
    ];
    draw_vbars(fig, region, &slices, false);
    let style = TextStyle::new(fig.cfg.theme.label_size, &fig.cfg.theme.text_muted).centered();
    fig.canvas.text(
        region.cx(),
        region.bottom() - 2.0,
        "Obligation to understand the energy transition",
        &style,
    );
}

fn draw_focus(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let colors = fig.cfg.palette.colors(FOCUS.len(), PaletteFamily::Sequential);
    let mut slices: Vec<Slice> = FOCUS
        .iter()
        .zip(&colors)
        .map(|((label, get), color)| Slice::new(*label, data.flag_sum(*get) as f64, color))
        .collect();
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    draw_vbars(fig, region, &slices, true);
}
