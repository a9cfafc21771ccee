use ev_survey_renderer::charts::suite::Suite;
use ev_survey_renderer::dataset::SurveyRecord;
use ev_survey_renderer::{Config, Dataset, ModelBundle};
use std::path::Path;

/// Deterministic synthetic survey: valid domains, varied answers, mild
/// correlation between knowledge and intention so relational charts have
/// structure to draw.
fn sample_record(i: usize) -> SurveyRecord {
    let likert = |offset: usize| ((i * 3 + offset) % 5 + 1) as u8;
    let flag = |offset: usize| ((i + offset) % 2) as u8;
    let index = |offset: usize| 1.0 + ((i * 7 + offset) % 9) as f64 * 0.5;
    SurveyRecord {
        gender: (i % 2 + 1) as u8,
        education: (i % 3 + 1) as u8,
        major_stem: flag(0),
        major_econ: if flag(0) == 1 { 0 } else { flag(1) },
        major_humanities: 0,
        energy_experience: (i % 2 + 1) as u8,
        transition_knowledge: likert(0),
        dual_carbon_knowledge: likert(1),
        renewable_solar: 1,
        renewable_wind: flag(0),
        renewable_hydro: flag(1),
        renewable_biomass: flag(2),
        renewable_oil: flag(3),
        renewable_coal: 0,
        renewable_gas: flag(4),
        renewable_nuclear: flag(5),
        trust_technology: likert(2),
        trust_nev_technology: likert(3),
        trust_policy_execution: likert(4),
        incentive_policy_approval: likert(0),
        fuel_limit_support: likert(2),
        // Tie intention loosely to knowledge so flows and paths are
        // non-degenerate.
        purchase_intention: likert(0),
        vehicle_preference: likert(1),
        nev_impression: likert(3),
        factor_cost: 1,
        factor_environment: flag(0),
        factor_technology: flag(1),
        factor_range: flag(2),
        factor_charging: flag(3),
        factor_performance: flag(4),
        factor_policy: flag(5),
        factor_brand: 0,
        concern_range: 1,
        concern_charging: flag(0),
        concern_battery: flag(1),
        concern_price: flag(2),
        concern_safety: flag(3),
        concern_maintenance: flag(4),
        channel_courses: flag(0),
        channel_news: 1,
        channel_social: flag(1),
        channel_academic: flag(2),
        channel_friends: flag(3),
        goal_security: flag(0),
        goal_pollution: 1,
        goal_dependency: flag(1),
        goal_innovation: flag(2),
        goal_green: flag(3),
        duty_awareness: (i % 3 + 1) as u8,
        focus_rnd: flag(0),
        focus_infrastructure: 1,
        focus_education: flag(1),
        focus_incentives: flag(2),
        focus_retrofit: flag(3),
        knowledge_index: index(0),
        responsibility_index: index(2),
        trust_index: index(4),
        policy_index: index(6),
        attitude: index(8),
    }
}

fn sample_dataset(n: usize) -> Dataset {
    Dataset::new((0..n).map(sample_record).collect()).expect("synthetic dataset is valid")
}

fn sample_models() -> ModelBundle {
    serde_json::from_str(
        r#"{
        "regression": {
            "title": "Regression Model Coefficients",
            "coefficients": [
                {"name": "Knowledge", "beta": 0.31, "se": 0.06, "t": 5.2, "p": 0.0001},
                {"name": "Trust", "beta": 0.24, "se": 0.07, "t": 3.4, "p": 0.004},
                {"name": "Policy", "beta": 0.12, "se": 0.06, "t": 2.0, "p": 0.046},
                {"name": "Gender", "beta": -0.05, "se": 0.05, "t": -1.0, "p": 0.32},
                {"name": "const", "beta": 0.0, "p": 1.0}
            ],
            "r_squared": 0.412, "adj_r_squared": 0.396,
            "f_statistic": 25.3, "f_pvalue": 0.00001, "n_observations": 300
        },
        "moderation": {
            "title": "Knowledge x Experience on Intention",
            "x_label": "Knowledge Index", "y_label": "Purchase Intention",
            "w_label": "Experience",
            "intercept": 2.1, "x_coef": 0.45, "w_coef": 0.2, "xw_coef": 0.18,
            "x_mean": 3.2, "x_sd": 0.8, "y_mean": 3.4,
            "slopes": [
                {"level_label": "Low (-1 SD)", "level": -1.0, "slope": 0.27, "se": 0.08, "t": 3.3, "p": 0.001},
                {"level_label": "Mean", "level": 0.0, "slope": 0.45, "se": 0.06, "t": 7.5, "p": 0.00001},
                {"level_label": "High (+1 SD)", "level": 1.0, "slope": 0.63, "se": 0.09, "t": 7.0, "p": 0.0002}
            ]
        },
        "mediation": {
            "x_label": "Knowledge", "m_label": "Trust", "y_label": "Intention",
            "a": 0.42, "b": 0.35, "c": 0.31, "c_prime": 0.16,
            "indirect": 0.147, "ci_low": 0.08, "ci_high": 0.22
        }
    }"#,
    )
    .expect("model bundle fixture parses")
}

fn assert_valid_svg(path: &Path) {
    assert!(path.exists(), "missing figure: {}", path.display());
    let svg = std::fs::read_to_string(path).expect("figure is readable");
    assert!(svg.starts_with("<svg"), "{}: not an SVG document", path.display());
    assert!(svg.ends_with("</svg>"), "{}: truncated SVG", path.display());
}

#[test]
fn full_suite_renders_every_figure() {
    let data = sample_dataset(60);
    let models = sample_models();
    let cfg = Config::default();
    let tmp = tempfile::tempdir().unwrap();
    let suite = Suite {
        data: &data,
        models: &models,
        cfg: &cfg,
        out_dir: tmp.path(),
        extension: "svg",
    };
    let rendered = suite.run_all().expect("suite renders without error");
    assert_eq!(rendered, Suite::figure_names().len());

    // Keep this list explicit so renamed outputs must be updated
    // intentionally.
    let expected = [
        "figure01_demographics.svg",
        "figure02_knowledge.svg",
        "figure03_recognition.svg",
        "figure04_trust.svg",
        "figure05_vehicle.svg",
        "figure06_channels.svg",
        "figure07_overview.svg",
        "correlation_heatmap.svg",
        "correlation_network.svg",
        "advanced_chord.svg",
        "advanced_raincloud_attitude_by_education.svg",
        "advanced_ridgeline_core_indices.svg",
        "advanced_dumbbell_education.svg",
        "advanced_radar_energy_experience.svg",
        "advanced_radar_gender.svg",
        "advanced_sankey_knowledge_to_intention.svg",
        "advanced_multi_stage_alluvial.svg",
        "advanced_respondent_cluster.svg",
        "advanced_awareness_pca.svg",
        "advanced_sem_path.svg",
        "advanced_risk_intention.svg",
        "model_regression_forest.svg",
        "model_simple_slopes.svg",
        "model_mediation_path.svg",
    ];
    for name in expected {
        assert_valid_svg(&tmp.path().join(name));
    }
}

#[test]
fn composite_figures_export_their_panels() {
    let data = sample_dataset(40);
    let models = ModelBundle::default();
    let cfg = Config::default();
    let tmp = tempfile::tempdir().unwrap();
    let suite = Suite {
        data: &data,
        models: &models,
        cfg: &cfg,
        out_dir: tmp.path(),
        extension: "svg",
    };
    suite.run_one("overview").unwrap();
    suite.run_one("channels").unwrap();

    let overview_panels = tmp.path().join("figure07_overview_panels");
    let count = std::fs::read_dir(&overview_panels).unwrap().count();
    assert_eq!(count, 9, "overview exports one file per lettered panel");
    assert_valid_svg(&overview_panels.join("A_Gender_Distribution.svg"));
    assert_valid_svg(&overview_panels.join("I_Research_Summary.svg"));

    let channel_panels = tmp.path().join("figure06_channels_panels");
    assert_eq!(std::fs::read_dir(&channel_panels).unwrap().count(), 4);
}

#[test]
fn insufficient_data_still_produces_placeholder_files() {
    // Below the PCA row minimum and the clustermap row minimum.
    let data = sample_dataset(8);
    let models = ModelBundle::default();
    let cfg = Config::default();
    let tmp = tempfile::tempdir().unwrap();
    let suite = Suite {
        data: &data,
        models: &models,
        cfg: &cfg,
        out_dir: tmp.path(),
        extension: "svg",
    };
    suite.run_one("pca").unwrap();
    suite.run_one("clustermap").unwrap();
    suite.run_one("sem").unwrap();

    let pca = std::fs::read_to_string(tmp.path().join("advanced_awareness_pca.svg")).unwrap();
    assert!(pca.contains("Insufficient valid samples"));
    let cluster =
        std::fs::read_to_string(tmp.path().join("advanced_respondent_cluster.svg")).unwrap();
    assert!(cluster.contains("Insufficient valid data"));
    let sem = std::fs::read_to_string(tmp.path().join("advanced_sem_path.svg")).unwrap();
    assert!(sem.contains("Insufficient data"));
}

#[test]
fn model_figures_are_skipped_without_a_bundle() {
    let data = sample_dataset(25);
    let models = ModelBundle::default();
    let cfg = Config::default();
    let tmp = tempfile::tempdir().unwrap();
    let suite = Suite {
        data: &data,
        models: &models,
        cfg: &cfg,
        out_dir: tmp.path(),
        extension: "svg",
    };
    suite.run_one("forest").unwrap();
    assert!(!tmp.path().join("model_regression_forest.svg").exists());
    assert!(!suite.run_one("no-such-figure").unwrap());
}

#[cfg(feature = "png")]
#[test]
fn png_round_trip_preserves_the_aspect_ratio() {
    let data = sample_dataset(30);
    let models = ModelBundle::default();
    let cfg = Config::default();
    let tmp = tempfile::tempdir().unwrap();
    let suite = Suite {
        data: &data,
        models: &models,
        cfg: &cfg,
        out_dir: tmp.path(),
        extension: "png",
    };
    suite.run_one("trust").unwrap();

    let bytes = std::fs::read(tmp.path().join("figure04_trust.png")).unwrap();
    assert!(bytes.len() > 1000, "png is suspiciously small");
    assert_eq!(&bytes[1..4], b"PNG");
    // Width and height live in the IHDR chunk directly after the
    // 8-byte signature + 8-byte chunk header.
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    assert!(width > 0 && height > 0);
    // The trust figure is laid out at 1080x600.
    let aspect = width as f64 / height as f64;
    assert!((aspect - 1080.0 / 600.0).abs() < 0.02, "aspect {aspect}");
}
