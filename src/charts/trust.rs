use super::{draw_grouped_vbars, draw_radar};
use crate::canvas::Region;
use crate::config::Config;
use crate::dataset::{reverse_likert, Dataset, SurveyRecord};
use crate::figure::Figure;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

pub(super) const TRUST_AXES: [&str; 5] = [
    "Tech Maturity\nTrust",
    "NEV Tech\nTrust",
    "Policy Exec\nTrust",
    "Incentive Policy\nAgreement",
    "Limit Oil\nSupport",
];

pub(super) type TrustGetter = fn(&SurveyRecord) -> u8;

pub(super) const TRUST_ITEMS: [TrustGetter; 5] = [
    |r| r.trust_technology,
    |r| r.trust_nev_technology,
    |r| r.trust_policy_execution,
    |r| r.incentive_policy_approval,
    |r| r.fuel_limit_support,
];

/// Reverse-coded per-item means, the radar's spoke values.
pub(super) fn trust_profile(data: &Dataset) -> Vec<f64> {
    TRUST_ITEMS
        .iter()
        .map(|get| data.positive_mean(*get))
        .collect()
}

/// Figure 4: public trust and policy agreement - five-axis radar plus the
/// education-group comparison bars.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let profile = trust_profile(data);
    debug!(?profile, "trust profile (reverse-coded means)");

    let mut fig = Figure::new(1080.0, 600.0, cfg);
    fig.suptitle("Figure 4: Analysis of Public Trust and Policy Agreement Dimensions");
    let columns = fig.content().split_h(&[1.2, 1.0], cfg.layout.panel_gap);

    let left = columns[0];
    fig.panel_label(left, 'A');
    fig.panel_title(left, "Public Trust and Policy Agreement Dimensions");
    draw_radar(
        &mut fig,
        Region::new(left.x, left.y + 24.0, left.width, left.height - 24.0),
        &TRUST_AXES,
        &[("Sample".to_string(), cfg.palette.primary.clone(), profile)],
        true,
    );

    // Trust = first three items, policy agreement = last two.
    let mut tech_by_edu = Vec::new();
    let mut policy_by_edu = Vec::new();
    for code in [1u8, 2, 3] {
        let mean_of = |getters: &[TrustGetter]| -> f64 {
            let per_item: Vec<f64> = getters
                .iter()
                .filter_map(|get| {
                    data.group_mean(|r| r.education, code, move |r| get(r) as f64)
                        .map(reverse_likert)
                })
                .collect();
            if per_item.is_empty() {
                0.0
            } else {
                per_item.iter().sum::<f64>() / per_item.len() as f64
            }
        };
        tech_by_edu.push(mean_of(&TRUST_ITEMS[..3]));
        policy_by_edu.push(mean_of(&TRUST_ITEMS[3..]));
    }
    debug!(?tech_by_edu, ?policy_by_edu, "trust by education");

    let right = columns[1];
    fig.panel_label(right, 'B');
    fig.panel_title(right, "Trust Level Comparison by Education");
    draw_grouped_vbars(
        &mut fig,
        Region::new(right.x, right.y + 30.0, right.width, right.height - 40.0),
        &["Undergraduate", "Master", "PhD"],
        &[
            (
                "Tech Trust".to_string(),
                cfg.palette.primary.clone(),
                tech_by_edu,
            ),
            (
                "Policy Agreement".to_string(),
                cfg.palette.secondary.clone(),
                policy_by_edu,
            ),
        ],
        false,
    );

    fig.save(path)
}
