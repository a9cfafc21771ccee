use crate::config::Config;
use crate::dataset::Dataset;
use crate::model::ModelBundle;
use crate::stats;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{
    channels, comparison, demographics, distributions, flows, heatmap, knowledge, overview,
    paths, pca, recognition, regression, relations, risk, trust, vehicle,
};

/// Everything one batch run needs. Renderers stay independently invokable;
/// the suite only sequences them and owns the file naming scheme.
pub struct Suite<'a> {
    pub data: &'a Dataset,
    pub models: &'a ModelBundle,
    pub cfg: &'a Config,
    pub out_dir: &'a Path,
    /// "svg" or "png".
    pub extension: &'a str,
}

type SuiteFn = fn(&Suite<'_>) -> Result<()>;

/// Stable figure names, usable with the CLI's `--only` filter.
pub const FIGURES: [(&str, SuiteFn); 24] = [
    ("demographics", |s| {
        demographics::render(s.data, s.cfg, &s.path("figure01_demographics"))
    }),
    ("knowledge", |s| {
        knowledge::render(s.data, s.cfg, &s.path("figure02_knowledge"))
    }),
    ("recognition", |s| {
        recognition::render(s.data, s.cfg, &s.path("figure03_recognition"))
    }),
    ("trust", |s| {
        trust::render(s.data, s.cfg, &s.path("figure04_trust"))
    }),
    ("vehicle", |s| {
        vehicle::render(s.data, s.cfg, &s.path("figure05_vehicle"))
    }),
    ("channels", |s| {
        channels::render(s.data, s.cfg, &s.path("figure06_channels"))
    }),
    ("overview", |s| {
        overview::render(s.data, s.cfg, &s.path("figure07_overview"))
    }),
    ("correlation", |s| {
        let columns = s.data.core_columns();
        let labels: Vec<&str> = columns.iter().map(|(label, _)| *label).collect();
        let values: Vec<Vec<f64>> = columns.iter().map(|(_, col)| col.clone()).collect();
        let corr = stats::correlation_matrix(&values);
        heatmap::render_correlation(
            &corr,
            &labels,
            s.cfg,
            &s.path("correlation_heatmap"),
            "Variable Correlation Heatmap",
        )
    }),
    ("network", |s| {
        let columns = s.data.core_columns();
        let labels: Vec<&str> = columns.iter().map(|(label, _)| *label).collect();
        let values: Vec<Vec<f64>> = columns.iter().map(|(_, col)| col.clone()).collect();
        let corr = stats::correlation_matrix(&values);
        relations::render_network(
            &corr,
            &labels,
            s.cfg,
            &s.path("correlation_network"),
            "Correlation Network Diagram",
        )
    }),
    ("chord", |s| {
        relations::render_chord(s.data, s.cfg, &s.path("advanced_chord"))
    }),
    ("raincloud", |s| {
        distributions::render_raincloud(
            s.data,
            s.cfg,
            &s.path("advanced_raincloud_attitude_by_education"),
            |r| r.attitude,
            "Attitude Score",
            |r| r.education,
            &[(1, "Undergraduate"), (2, "Master"), (3, "PhD")],
            "Education Level",
            "Attitude Distribution by Education Level",
        )
    }),
    ("ridgeline", |s| {
        distributions::render_ridgeline(s.data, s.cfg, &s.path("advanced_ridgeline_core_indices"))
    }),
    ("dumbbell", |s| {
        comparison::render_dumbbell(s.data, s.cfg, &s.path("advanced_dumbbell_education"))
    }),
    ("radar-experience", |s| {
        comparison::render_radar_comparison(
            s.data,
            s.cfg,
            &s.path("advanced_radar_energy_experience"),
            |r| r.energy_experience,
            &[(1, "Experienced"), (2, "No Experience")],
            "Impact of Energy Experience on Trust",
        )
    }),
    ("radar-gender", |s| {
        comparison::render_radar_comparison(
            s.data,
            s.cfg,
            &s.path("advanced_radar_gender"),
            |r| r.gender,
            &[(1, "Male"), (2, "Female")],
            "Impact of Gender on Trust and Policy Support",
        )
    }),
    ("sankey", |s| {
        flows::render_sankey(s.data, s.cfg, &s.path("advanced_sankey_knowledge_to_intention"))
    }),
    ("alluvial", |s| {
        flows::render_alluvial(s.data, s.cfg, &s.path("advanced_multi_stage_alluvial"))
    }),
    ("clustermap", |s| {
        heatmap::render_clustermap(s.data, s.cfg, &s.path("advanced_respondent_cluster"))
    }),
    ("pca", |s| {
        pca::render(s.data, s.cfg, &s.path("advanced_awareness_pca"))
    }),
    ("sem", |s| {
        paths::render_sem(s.data, s.cfg, &s.path("advanced_sem_path"))
    }),
    ("risk", |s| {
        risk::render(s.data, s.cfg, &s.path("advanced_risk_intention"))
    }),
    ("forest", |s| {
        let Some(results) = &s.models.regression else {
            info!("skipping forest plot: no regression results in the model bundle");
            return Ok(());
        };
        regression::render_forest(results, s.cfg, &s.path("model_regression_forest"))
    }),
    ("slopes", |s| {
        let Some(model) = &s.models.moderation else {
            info!("skipping simple slopes: no moderation model in the bundle");
            return Ok(());
        };
        regression::render_simple_slopes(model, s.cfg, &s.path("model_simple_slopes"))
    }),
    ("mediation", |s| {
        let Some(effects) = &s.models.mediation else {
            info!("skipping mediation diagram: no mediation effects in the bundle");
            return Ok(());
        };
        paths::render_mediation(effects, s.cfg, &s.path("model_mediation_path"))
    }),
];

impl Suite<'_> {
    fn path(&self, stem: &str) -> PathBuf {
        self.out_dir.join(format!("{stem}.{}", self.extension))
    }

    /// Renders the full figure set in order.
    pub fn run_all(&self) -> Result<usize> {
        let mut rendered = 0;
        for (name, render) in FIGURES {
            info!(figure = name, "rendering");
            render(self)?;
            rendered += 1;
        }
        Ok(rendered)
    }

    /// Renders a single named figure; `false` if the name is unknown.
    pub fn run_one(&self, name: &str) -> Result<bool> {
        for (candidate, render) in FIGURES {
            if candidate == name {
                info!(figure = name, "rendering");
                render(self)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn figure_names() -> Vec<&'static str> {
        FIGURES.iter().map(|(name, _)| *name).collect()
    }
}
