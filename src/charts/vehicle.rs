use super::{
    draw_donut, draw_hbars, draw_lollipop, legend_h, legend_v, DonutLabels, Slice,
};
use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::{Dataset, SurveyRecord};
use crate::figure::Figure;
use crate::theme::PaletteFamily;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

type Getter = fn(&SurveyRecord) -> u8;

pub(super) const FACTORS: [(&str, Getter); 8] = [
    ("Cost", |r| r.factor_cost),
    ("Environmental", |r| r.factor_environment),
    ("Tech Reliability", |r| r.factor_technology),
    ("Range", |r| r.factor_range),
    ("Charging Convenience", |r| r.factor_charging),
    ("Performance", |r| r.factor_performance),
    ("Policy Support", |r| r.factor_policy),
    ("Brand Reputation", |r| r.factor_brand),
];

pub(super) const CONCERNS: [(&str, Getter); 6] = [
    ("Insufficient Range", |r| r.concern_range),
    ("Charging Facilities", |r| r.concern_charging),
    ("Battery Issues", |r| r.concern_battery),
    ("High Price", |r| r.concern_price),
    ("Safety Concerns", |r| r.concern_safety),
    ("Maintenance Cost", |r| r.concern_maintenance),
];

pub(super) const INTENTION_LABELS: [&str; 5] = [
    "Very Likely",
    "Likely",
    "Uncertain",
    "Unlikely",
    "Very Unlikely",
];

pub(super) fn likert_colors(cfg: &Config) -> [String; 5] {
    [
        cfg.palette.positive.clone(),
        cfg.palette.quaternary.clone(),
        cfg.palette.neutral.clone(),
        cfg.palette.secondary.clone(),
        cfg.palette.negative.clone(),
    ]
}

/// Figure 5: NEV market potential - intention donut, preference bars,
/// impression stack, factor lollipop and ranked concern bars.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let intention = data.counts_for(|r| r.purchase_intention, &[1, 2, 3, 4, 5]);
    let preference = data.counts_for(|r| r.vehicle_preference, &[1, 2, 3, 4, 5]);
    let impression = data.counts_for(|r| r.nev_impression, &[1, 2, 3, 4, 5]);
    debug!(?intention, ?preference, ?impression, "vehicle aggregates");

    let n = data.len() as f64;
    let mut fig = Figure::new(1180.0, 820.0, cfg);
    fig.suptitle("Figure 5: Comprehensive Analysis of NEV Market Potential and Consumer Insights");
    let rows = fig.content().split_v(&[1.0, 1.2], cfg.layout.panel_gap);
    let top = rows[0].grid(1, 3, cfg.layout.panel_gap, 0.0);

    // A: purchase intention donut, positive share in the center.
    let region = top[0];
    fig.panel_label(region, 'A');
    fig.panel_title(region, "Purchase Intention in 5 Years");
    let colors = likert_colors(cfg);
    let slices: Vec<Slice> = INTENTION_LABELS
        .iter()
        .zip(&intention)
        .zip(&colors)
        .map(|((label, count), color)| Slice::new(*label, *count as f64, color))
        .collect();
    let positive = data.share(intention[0] + intention[1]);
    draw_donut(
        &mut fig,
        Region::new(region.x, region.y + 26.0, region.width * 0.72, region.height - 30.0),
        &slices,
        Some((&format!("{positive:.0}%"), "Intend to Buy")),
        DonutLabels::PercentInside,
    );
    legend_v(
        &mut fig,
        region.right() - 104.0,
        region.y + region.height * 0.3,
        &slices
            .iter()
            .map(|s| (s.label.clone(), s.color.clone()))
            .collect::<Vec<_>>(),
    );

    // B: car type preference.
    let region = top[1];
    fig.panel_label(region, 'B');
    fig.panel_title(region, "Car Type Preference Distribution");
    let pref_colors = cfg.palette.colors(5, PaletteFamily::Categorical);
    let pref_labels = ["BEV", "PHEV", "ICEV", "FCEV", "No Plan"];
    let pref_slices: Vec<Slice> = pref_labels
        .iter()
        .zip(&preference)
        .zip(&pref_colors)
        .map(|((label, count), color)| Slice::new(*label, *count as f64, color))
        .collect();
    draw_hbars(&mut fig, region.inset_xy(4.0, 36.0), &pref_slices, n);

    // C: overall impression as one stacked percentage bar.
    let region = top[2];
    fig.panel_label(region, 'C');
    fig.panel_title(region, "Overall Impression of NEVs");
    let labels = [
        "Very Positive",
        "Positive",
        "Neutral",
        "Negative",
        "Very Negative",
    ];
    let body = region.inset_xy(14.0, 40.0);
    let bar = Region::new(body.x, body.cy() - 24.0, body.width, 48.0);
    let mut x = bar.x;
    let pct_style = TextStyle::new(fig.cfg.theme.label_size, "#FFFFFF").bold().centered();
    for (idx, count) in impression.iter().enumerate() {
        let pct = data.share(*count);
        let w = bar.width * (pct as f32) / 100.0;
        fig.canvas.rect(
            x,
            bar.y,
            w,
            bar.height,
            &Paint::fill(&colors[idx]).outlined("#FFFFFF", 1.0),
        );
        if pct > 8.0 {
            fig.canvas.text(
                x + w / 2.0,
                bar.cy() + 4.0,
                &format!("{pct:.0}%"),
                &pct_style,
            );
        }
        x += w;
    }
    legend_h(
        &mut fig,
        Region::new(body.x, bar.bottom(), body.width, 40.0),
        &labels
            .iter()
            .zip(&colors)
            .map(|(label, color)| (label.to_string(), color.clone()))
            .collect::<Vec<_>>(),
    );

    let bottom = rows[1].split_h(&[1.0, 2.0], cfg.layout.panel_gap);

    // D: influencing factors, busiest first.
    let region = bottom[0];
    fig.panel_label(region, 'D');
    fig.panel_title(region, "Key Factors Influencing Purchase Decision");
    let factor_colors = cfg.palette.colors(FACTORS.len(), PaletteFamily::Sequential);
    let mut factor_slices: Vec<Slice> = FACTORS
        .iter()
        .zip(&factor_colors)
        .map(|((label, get), color)| Slice::new(*label, data.flag_sum(*get) as f64, color))
        .collect();
    factor_slices
        .sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    draw_lollipop(&mut fig, region.inset_xy(4.0, 38.0), &factor_slices, n);

    // E: concern ranking with in-bar rank markers.
    let region = bottom[1];
    fig.panel_label(region, 'E');
    fig.panel_title(region, "Analysis of Major NEV Pain Points (Sorted by Severity)");
    let mut concerns: Vec<(String, f64)> = CONCERNS
        .iter()
        .map(|(label, get)| (label.to_string(), data.flag_sum(*get) as f64))
        .collect();
    concerns.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let concern_colors = cfg.palette.colors(concerns.len(), PaletteFamily::Warm);
    let plot = Region::new(
        region.x + 30.0,
        region.y + 36.0,
        region.width - 44.0,
        region.height - 82.0,
    );
    let max = concerns.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let axes = super::axes::Cartesian::for_counts(plot, max);
    axes.draw_frame(&mut fig);
    let cat_labels: Vec<&str> = concerns.iter().map(|(label, _)| label.as_str()).collect();
    axes.draw_category_labels(&mut fig, &cat_labels, false);
    let slot = axes.slot_width(concerns.len());
    let value_style = TextStyle::new(fig.cfg.theme.label_size, "#2C3E50").bold().centered();
    let rank_style = TextStyle::new(fig.cfg.theme.title_size, "#FFFFFF")
        .bold()
        .centered();
    for (idx, (_, value)) in concerns.iter().enumerate() {
        let cx = axes.slot_center(idx, concerns.len());
        let top_y = axes.y(*value);
        fig.canvas.rect(
            cx - slot * 0.35,
            top_y,
            slot * 0.7,
            plot.bottom() - top_y,
            &Paint::fill(&concern_colors[idx]).outlined("#FFFFFF", 2.0),
        );
        fig.canvas.text(
            cx,
            top_y - 14.0,
            &format!("{value:.0}"),
            &value_style,
        );
        fig.canvas.text(
            cx,
            top_y - 3.0,
            &format!("({:.0}%)", data.share(*value as usize)),
            &value_style,
        );
        fig.canvas.text(
            cx,
            (top_y + plot.bottom()) / 2.0 + 5.0,
            &format!("#{}", idx + 1),
            &rank_style,
        );
    }

    fig.save(path)
}
