pub mod canvas;
pub mod charts;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod figure;
pub mod model;
pub mod output;
pub mod stats;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use charts::suite::Suite;
pub use config::{load_config, Config, FIGURE_DPI};
pub use dataset::{Dataset, SurveyRecord};
pub use model::ModelBundle;
pub use theme::{Palette, PaletteFamily, Theme};
