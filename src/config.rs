use crate::theme::{Palette, Theme};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Export resolution used when rasterizing to PNG. SVG geometry is laid out
/// in CSS pixels (96/in); the scale factor below maps between the two.
pub const FIGURE_DPI: f32 = 300.0;

const BASE_DPI: f32 = 96.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub dpi: f32,
    /// Uniform padding applied around the finished figure, in px.
    pub pad: f32,
    pub background: String,
}

impl RenderConfig {
    pub fn scale(&self) -> f32 {
        (self.dpi / BASE_DPI).max(0.1)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: FIGURE_DPI,
            pad: 16.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DonutConfig {
    /// Ring thickness as a fraction of the outer radius.
    pub ring_fraction: f32,
    pub start_angle_deg: f32,
    pub slice_stroke: String,
    pub slice_stroke_width: f32,
    pub callout_offset: f32,
}

impl Default for DonutConfig {
    fn default() -> Self {
        Self {
            ring_fraction: 0.5,
            start_angle_deg: 90.0,
            slice_stroke: "#FFFFFF".to_string(),
            slice_stroke_width: 2.5,
            callout_offset: 1.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub rings: usize,
    pub r_max: f32,
    pub fill_opacity: f32,
    pub marker_radius: f32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            rings: 5,
            r_max: 5.0,
            fill_opacity: 0.25,
            marker_radius: 4.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub cell_gap: f32,
    pub annotate: bool,
    pub colorbar_width: f32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            cell_gap: 1.5,
            annotate: true,
            colorbar_width: 18.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub node_width: f32,
    pub node_gap: f32,
    /// Fraction of the horizontal span used for curve control points.
    pub curve_tension: f32,
    pub link_opacity: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            node_width: 14.0,
            node_gap: 10.0,
            curve_tension: 0.4,
            link_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Edges with |r| below this are not drawn.
    pub threshold: f64,
    pub node_radius: f32,
    pub max_edge_width: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            node_radius: 26.0,
            max_edge_width: 9.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub label_line_height: f32,
    pub panel_gap: f32,
    pub donut: DonutConfig,
    pub radar: RadarConfig,
    pub heatmap: HeatmapConfig,
    pub flow: FlowConfig,
    pub network: NetworkConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_line_height: 1.25,
            panel_gap: 26.0,
            donut: DonutConfig::default(),
            radar: RadarConfig::default(),
            heatmap: HeatmapConfig::default(),
            flow: FlowConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub palette: Palette,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Loads a JSON config file; any omitted field keeps its default, and no
/// path at all yields the full default configuration.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.render.dpi, FIGURE_DPI);
        assert_eq!(config.layout.network.threshold, 0.3);
    }

    #[test]
    fn partial_json_keeps_defaults_for_the_rest() {
        let config: Config =
            serde_json::from_str(r#"{"render": {"dpi": 150.0}}"#).unwrap();
        assert_eq!(config.render.dpi, 150.0);
        assert_eq!(config.render.pad, 16.0);
        assert_eq!(config.layout.donut.ring_fraction, 0.5);
    }

    #[test]
    fn scale_tracks_dpi() {
        let render = RenderConfig {
            dpi: 192.0,
            ..RenderConfig::default()
        };
        assert!((render.scale() - 2.0).abs() < 1e-6);
    }
}
