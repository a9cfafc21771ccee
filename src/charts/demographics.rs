use super::{draw_donut, draw_hbars, DonutLabels, Slice};
use crate::canvas::Region;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Figure 1: sample demographics - three donuts, an experience bar panel
/// and a summary band.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let gender = data.counts_for(|r| r.gender, &[1, 2]);
    let education = data.counts_for(|r| r.education, &[1, 2, 3]);
    let majors = [
        data.flag_sum(|r| r.major_stem),
        data.flag_sum(|r| r.major_econ),
        data.flag_sum(|r| r.major_humanities),
    ];
    let experience = data.counts_for(|r| r.energy_experience, &[1, 2]);
    debug!(?gender, ?education, ?majors, ?experience, "demographics aggregates");

    let mut fig = Figure::new(1180.0, 640.0, cfg);
    fig.suptitle("Figure 1: Sample Demographics Overview");
    let rows = fig.content().split_v(&[3.0, 1.0], cfg.layout.panel_gap);
    let panels = rows[0].grid(1, 4, cfg.layout.panel_gap, 0.0);

    let palette = &cfg.palette;
    let n = data.len() as f64;

    let donut_panels: [(&str, char, Vec<Slice>); 3] = [
        (
            "Gender Distribution",
            'A',
            vec![
                Slice::new("Male", gender[0] as f64, &palette.male),
                Slice::new("Female", gender[1] as f64, &palette.female),
            ],
        ),
        (
            "Education Distribution",
            'B',
            vec![
                Slice::new("Undergraduate", education[0] as f64, &palette.education[0]),
                Slice::new("Master", education[1] as f64, &palette.education[1]),
                Slice::new("PhD", education[2] as f64, &palette.education[2]),
            ],
        ),
        (
            "Major Distribution",
            'C',
            vec![
                Slice::new("STEM", majors[0] as f64, &palette.primary),
                Slice::new("Econ & Mgmt", majors[1] as f64, &palette.secondary),
                Slice::new("Humanities", majors[2] as f64, &palette.tertiary),
            ],
        ),
    ];
    for (idx, (title, letter, slices)) in donut_panels.iter().enumerate() {
        let region = panels[idx];
        fig.panel_title(region, title);
        fig.panel_label(region, *letter);
        let body = Region::new(
            region.x,
            region.y + 30.0,
            region.width,
            region.height - 30.0,
        );
        let total: f64 = slices.iter().map(|s| s.value).sum();
        draw_donut(
            &mut fig,
            body,
            slices,
            Some((&format!("{total:.0}"), "Sample")),
            DonutLabels::Callout,
        );
    }

    let exp_region = panels[3];
    fig.panel_title(exp_region, "Energy Related Experience");
    fig.panel_label(exp_region, 'D');
    let body = exp_region.inset_xy(4.0, 40.0);
    draw_hbars(
        &mut fig,
        body,
        &[
            Slice::new("With Exp", experience[0] as f64, &palette.primary),
            Slice::new("No Exp", experience[1] as f64, &palette.border),
        ],
        n,
    );

    let male_pct = data.share(gender[0]);
    let graduate_pct = data.share(education[1] + education[2]);
    let stem_pct = data.share(majors[0]);
    let summary = format!(
        "Sample Overview: {} respondents  |  Male {male_pct:.1}%  |  Graduate {graduate_pct:.1}%  |  STEM background {stem_pct:.1}%",
        data.len()
    );
    let card = Region::new(
        rows[1].x + rows[1].width * 0.12,
        rows[1].y + 8.0,
        rows[1].width * 0.76,
        rows[1].height - 16.0,
    );
    fig.info_card(card, &[summary], "#DEE2E6");

    fig.save(path)
}
