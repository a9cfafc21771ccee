use super::trust::trust_profile;
use super::vehicle::{likert_colors, INTENTION_LABELS};
use super::{
    draw_donut, draw_grouped_vbars, draw_hbars, draw_radar, draw_vbars, legend_v, DonutLabels,
    Slice,
};
use crate::canvas::Region;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::output::{panel_path, FigureFormat};
use crate::theme::PaletteFamily;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

type PanelFn = fn(&mut Figure<'_>, Region, &Dataset);

const PANELS: [(char, &str, PanelFn); 9] = [
    ('A', "Gender Distribution", draw_gender),
    ('B', "Education Distribution", draw_education),
    ('C', "Knowledge Level Distribution", draw_cognition),
    ('D', "Renewable Energy Recognition", draw_renewable),
    ('E', "Trust Analysis", draw_trust),
    ('F', "Purchase Intention", draw_intention),
    ('G', "Key Purchase Factors", draw_factors),
    ('H', "Major NEV Issues", draw_problems),
    ('I', "Research Summary", draw_summary),
];

/// The combined overview figure. Every panel function is written against a
/// region and invoked twice: once into its own standalone figure (exported
/// to the sibling panel directory) and once into the composite grid.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    debug!(n = data.len(), "overview figure");
    let format = FigureFormat::from_path(path);

    for (letter, title, draw) in PANELS {
        let mut fig = Figure::new(640.0, 500.0, cfg);
        let region = fig.content();
        fig.panel_title(region, title);
        draw(&mut fig, region.inset_xy(8.0, 30.0), data);
        fig.save(&panel_path(path, letter, title, format)?)?;
    }

    let mut fig = Figure::new(1640.0, 1280.0, cfg);
    fig.suptitle(
        "Comprehensive Analysis of College Students' Energy Transition Awareness and NEV Purchase Intention",
    );
    let cells = fig
        .content()
        .grid(3, 3, cfg.layout.panel_gap, cfg.layout.panel_gap);
    for (cell, (letter, title, draw)) in cells.iter().zip(PANELS) {
        fig.panel_label(*cell, letter);
        fig.panel_title(*cell, title);
        draw(&mut fig, cell.inset_xy(8.0, 30.0), data);
    }
    fig.save(path)
}

fn draw_gender(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let counts = data.counts_for(|r| r.gender, &[1, 2]);
    let palette = fig.cfg.palette.clone();
    draw_donut(
        fig,
        region,
        &[
            Slice::new("Male", counts[0] as f64, palette.male),
            Slice::new("Female", counts[1] as f64, palette.female),
        ],
        Some((&format!("N={}", data.len()), "")),
        DonutLabels::Callout,
    );
}

fn draw_education(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let counts = data.counts_for(|r| r.education, &[1, 2, 3]);
    let education = fig.cfg.palette.education.clone();
    let slices = vec![
        Slice::new("Undergraduate", counts[0] as f64, &education[0]),
        Slice::new("Master", counts[1] as f64, &education[1]),
        Slice::new("PhD", counts[2] as f64, &education[2]),
    ];
    draw_vbars(fig, region, &slices, false);
}

fn draw_cognition(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let energy = data.counts_for(|r| r.transition_knowledge, &[1, 2, 3, 4, 5]);
    let carbon = data.counts_for(|r| r.dual_carbon_knowledge, &[1, 2, 3, 4, 5]);
    draw_grouped_vbars(
        fig,
        region,
        &["Very Fam.", "Familiar", "Neutral", "Unfam.", "Very Unfam."],
        &[
            (
                "Energy Transition".to_string(),
                fig.cfg.palette.primary.clone(),
                energy.iter().map(|c| *c as f64).collect(),
            ),
            (
                "Dual Carbon Goals".to_string(),
                fig.cfg.palette.secondary.clone(),
                carbon.iter().map(|c| *c as f64).collect(),
            ),
        ],
        true,
    );
}

fn draw_renewable(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let palette = fig.cfg.palette.clone();
    let slices = vec![
        Slice::new("Solar", data.flag_sum(|r| r.renewable_solar) as f64, &palette.positive),
        Slice::new("Wind", data.flag_sum(|r| r.renewable_wind) as f64, &palette.positive),
        Slice::new("Hydro", data.flag_sum(|r| r.renewable_hydro) as f64, &palette.positive),
        Slice::new(
            "Biomass",
            data.flag_sum(|r| r.renewable_biomass) as f64,
            &palette.positive,
        ),
        Slice::new("Oil", data.flag_sum(|r| r.renewable_oil) as f64, &palette.negative),
        Slice::new("Coal", data.flag_sum(|r| r.renewable_coal) as f64, &palette.negative),
        Slice::new(
            "Natural Gas",
            data.flag_sum(|r| r.renewable_gas) as f64,
            &palette.negative,
        ),
        Slice::new(
            "Nuclear",
            data.flag_sum(|r| r.renewable_nuclear) as f64,
            &palette.neutral,
        ),
    ];
    draw_hbars(fig, region, &slices, data.len() as f64);
}

fn draw_trust(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let profile = trust_profile(data);
    let primary = fig.cfg.palette.primary.clone();
    draw_radar(
        fig,
        region,
        &["Tech Trust", "NEV Tech", "Policy Exec", "Incentives", "Fuel Limit"],
        &[("Sample".to_string(), primary, profile)],
        false,
    );
}

fn draw_intention(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let counts = data.counts_for(|r| r.purchase_intention, &[1, 2, 3, 4, 5]);
    let colors = likert_colors(fig.cfg);
    let slices: Vec<Slice> = INTENTION_LABELS
        .iter()
        .zip(&counts)
        .zip(&colors)
        .map(|((label, count), color)| Slice::new(*label, *count as f64, color))
        .collect();
    let body = Region::new(region.x, region.y, region.width * 0.74, region.height);
    draw_donut(fig, body, &slices, None, DonutLabels::PercentInside);
    legend_v(
        fig,
        region.right() - 108.0,
        region.y + region.height * 0.28,
        &slices
            .iter()
            .map(|s| (s.label.clone(), s.color.clone()))
            .collect::<Vec<_>>(),
    );
}

fn draw_factors(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let colors = fig.cfg.palette.colors(5, PaletteFamily::Categorical);
    let mut slices = vec![
        Slice::new("Cost", data.flag_sum(|r| r.factor_cost) as f64, &colors[0]),
        Slice::new("Range", data.flag_sum(|r| r.factor_range) as f64, &colors[1]),
        Slice::new("Charging", data.flag_sum(|r| r.factor_charging) as f64, &colors[2]),
        Slice::new("Tech", data.flag_sum(|r| r.factor_technology) as f64, &colors[3]),
        Slice::new("Env", data.flag_sum(|r| r.factor_environment) as f64, &colors[4]),
    ];
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    draw_hbars(fig, region, &slices, data.len() as f64);
}

fn draw_problems(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let colors = fig.cfg.palette.colors(5, PaletteFamily::Categorical);
    let slices = vec![
        Slice::new("Range", data.flag_sum(|r| r.concern_range) as f64, &colors[0]),
        Slice::new("Charging", data.flag_sum(|r| r.concern_charging) as f64, &colors[1]),
        Slice::new("Battery", data.flag_sum(|r| r.concern_battery) as f64, &colors[2]),
        Slice::new("Price", data.flag_sum(|r| r.concern_price) as f64, &colors[3]),
        Slice::new("Safety", data.flag_sum(|r| r.concern_safety) as f64, &colors[4]),
    ];
    draw_vbars(fig, region, &slices, false);
}

fn draw_summary(fig: &mut Figure<'_>, region: Region, data: &Dataset) {
    let n = data.len();
    let positive = data.share(
        data.records()
            .iter()
            .filter(|r| r.purchase_intention <= 2)
            .count(),
    );
    let knowledge = data.positive_mean(|r| r.transition_knowledge);
    let recognition = data.share(
        data.flag_sum(|r| r.renewable_solar) + data.flag_sum(|r| r.renewable_wind),
    ) / 2.0;
    let card = region.inset_xy(14.0, 16.0);
    let primary = fig.cfg.palette.primary.clone();
    fig.info_card(
        card,
        &[
            "Key Research Findings".to_string(),
            String::new(),
            format!("Sample size: {n} college students"),
            format!("Energy transition familiarity: {knowledge:.2}/5"),
            format!("Renewable recognition rate: {recognition:.1}%"),
            format!("Intend to buy an NEV: {positive:.1}%"),
            String::new(),
            "Major concerns: range, charging facilities".to_string(),
            "Recommendations: education, infrastructure,".to_string(),
            "and technology trust building".to_string(),
        ],
        &primary,
    );
}
