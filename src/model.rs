//! Model results computed outside this crate (regression, moderation,
//! mediation) arrive as a JSON bundle and are only visualized here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Coefficient {
    pub name: String,
    /// Standardized beta.
    pub beta: f64,
    #[serde(default)]
    pub se: Option<f64>,
    #[serde(default)]
    pub t: Option<f64>,
    pub p: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionSummary {
    pub title: String,
    pub coefficients: Vec<Coefficient>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub n_observations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleSlope {
    /// Display name of the moderator level, e.g. "Low (-1 SD)".
    pub level_label: String,
    /// Moderator value the slope was probed at.
    pub level: f64,
    pub slope: f64,
    pub se: f64,
    pub t: f64,
    pub p: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationModel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub w_label: String,
    pub intercept: f64,
    pub x_coef: f64,
    pub w_coef: f64,
    pub xw_coef: f64,
    /// Predictor range to sweep, in raw units.
    pub x_mean: f64,
    pub x_sd: f64,
    pub y_mean: f64,
    pub slopes: Vec<SimpleSlope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediationEffects {
    pub x_label: String,
    pub m_label: String,
    pub y_label: String,
    /// X -> M path.
    pub a: f64,
    /// M -> Y path.
    pub b: f64,
    /// Total effect.
    pub c: f64,
    /// Direct effect with the mediator in the model.
    pub c_prime: f64,
    pub indirect: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl MediationEffects {
    /// Bootstrap CI excluding zero is the significance criterion.
    pub fn indirect_significant(&self) -> bool {
        self.ci_low * self.ci_high > 0.0
    }
}

/// Everything the model-driven figures need, in one optional bundle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelBundle {
    pub regression: Option<RegressionSummary>,
    pub moderation: Option<ModerationModel>,
    pub mediation: Option<MediationEffects>,
}

impl ModelBundle {
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model bundle {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse model bundle {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_parses_with_missing_sections() {
        let bundle: ModelBundle = serde_json::from_str(
            r#"{
                "mediation": {
                    "x_label": "Knowledge", "m_label": "Trust", "y_label": "Intention",
                    "a": 0.42, "b": 0.35, "c": 0.31, "c_prime": 0.16,
                    "indirect": 0.147, "ci_low": 0.08, "ci_high": 0.22
                }
            }"#,
        )
        .unwrap();
        assert!(bundle.regression.is_none());
        let mediation = bundle.mediation.unwrap();
        assert!(mediation.indirect_significant());
    }

    #[test]
    fn ci_straddling_zero_is_not_significant() {
        let mediation = MediationEffects {
            x_label: String::new(),
            m_label: String::new(),
            y_label: String::new(),
            a: 0.1,
            b: 0.1,
            c: 0.1,
            c_prime: 0.05,
            indirect: 0.01,
            ci_low: -0.02,
            ci_high: 0.05,
        };
        assert!(!mediation.indirect_significant());
    }
}
