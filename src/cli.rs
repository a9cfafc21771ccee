use crate::charts::suite::Suite;
use crate::config::load_config;
use crate::dataset::Dataset;
use crate::model::ModelBundle;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "evsr",
    version,
    about = "Publication-style survey figure renderer (SVG/PNG)"
)]
pub struct Args {
    /// Survey table (CSV, one row per respondent)
    #[arg(short = 'd', long = "data")]
    pub data: PathBuf,

    /// Directory the figures are written into
    #[arg(short = 'o', long = "out-dir", default_value = "figures")]
    pub out_dir: PathBuf,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "png")]
    pub output_format: OutputFormat,

    /// Precomputed model results (JSON bundle) for the model-driven figures
    #[arg(short = 'm', long = "models")]
    pub models: Option<PathBuf>,

    /// Config JSON overriding theme/palette/layout defaults
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Render a single figure by name instead of the full suite
    #[arg(long = "only")]
    pub only: Option<String>,

    /// List figure names and exit
    #[arg(long = "list")]
    pub list: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.list {
        for name in Suite::figure_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let data = Dataset::from_csv_path(&args.data)
        .with_context(|| format!("failed to load survey table {}", args.data.display()))?;
    info!(respondents = data.len(), "survey table loaded");
    let models = match &args.models {
        Some(path) => ModelBundle::from_json_path(path)?,
        None => ModelBundle::default(),
    };
    std::fs::create_dir_all(&args.out_dir).with_context(|| {
        format!("failed to create output directory {}", args.out_dir.display())
    })?;

    let suite = Suite {
        data: &data,
        models: &models,
        cfg: &config,
        out_dir: &args.out_dir,
        extension: args.output_format.extension(),
    };
    match &args.only {
        Some(name) => {
            if !suite.run_one(name)? {
                anyhow::bail!(
                    "unknown figure `{name}`; use --list to see available names"
                );
            }
        }
        None => {
            let rendered = suite.run_all()?;
            info!(rendered, out_dir = %args.out_dir.display(), "figure suite complete");
        }
    }
    Ok(())
}

/// Installs a default subscriber when the `telemetry` feature is enabled.
/// Embedders wire their own subscriber otherwise.
fn init_tracing() {
    #[cfg(feature = "telemetry")]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact()
            .try_init();
    }
}
