use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_size: f32,
    pub title_size: f32,
    pub suptitle_size: f32,
    pub background: String,
    pub text_color: String,
    pub text_muted: String,
    pub axis_color: String,
    pub grid_color: String,
}

impl Theme {
    /// White-background journal style: Arial-first stack, dark grey text,
    /// dashed light grids.
    pub fn publication() -> Self {
        Self {
            font_family: "Arial, Helvetica, \"DejaVu Sans\", sans-serif".to_string(),
            font_size: 12.0,
            label_size: 10.0,
            title_size: 15.0,
            suptitle_size: 20.0,
            background: "#FFFFFF".to_string(),
            text_color: "#333333".to_string(),
            text_muted: "#888888".to_string(),
            axis_color: "#333333".to_string(),
            grid_color: "#BDC3C7".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::publication()
    }
}

/// Semantic role -> color table. Built once and shared read-only by every
/// renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
    pub quaternary: String,
    pub positive: String,
    pub negative: String,
    pub neutral: String,
    pub highlight: String,
    pub male: String,
    pub female: String,
    pub border: String,
    pub text: String,
    pub text_light: String,
    pub education: [String; 3],
    pub categorical: Vec<String>,
    pub gradient_cool: [String; 3],
    pub gradient_warm: [String; 3],
}

impl Palette {
    /// The unified academic scheme: cool purple-grey primaries against warm
    /// coral accents.
    pub fn unified() -> Self {
        let c1_primary = "#B6B3D6";
        let n1_mid = "#D5D3DE";
        let n2_mid = "#D5D1D1";
        let w1_light = "#F6DFD6";
        let w2_warm = "#F8B2A2";
        let w3_deep = "#F1837A";
        let w4_accent = "#E9687A";
        Self {
            primary: c1_primary.to_string(),
            secondary: w2_warm.to_string(),
            tertiary: w4_accent.to_string(),
            quaternary: n1_mid.to_string(),
            positive: w3_deep.to_string(),
            negative: c1_primary.to_string(),
            neutral: n2_mid.to_string(),
            highlight: w4_accent.to_string(),
            male: c1_primary.to_string(),
            female: w3_deep.to_string(),
            border: n2_mid.to_string(),
            text: "#333333".to_string(),
            text_light: "#888888".to_string(),
            education: [
                w1_light.to_string(),
                n1_mid.to_string(),
                c1_primary.to_string(),
            ],
            categorical: vec![
                c1_primary.to_string(),
                w4_accent.to_string(),
                w2_warm.to_string(),
                n1_mid.to_string(),
                "#555555".to_string(),
                "#AAAAAA".to_string(),
            ],
            gradient_cool: [
                n1_mid.to_string(),
                c1_primary.to_string(),
                "#696499".to_string(),
            ],
            gradient_warm: [
                w1_light.to_string(),
                w3_deep.to_string(),
                w4_accent.to_string(),
            ],
        }
    }

    /// Returns exactly `n` colors from the requested family. Counts beyond
    /// the categorical base cycle it; ramp families interpolate their stops.
    pub fn colors(&self, n: usize, family: PaletteFamily) -> Vec<String> {
        if n == 0 {
            return Vec::new();
        }
        match family {
            PaletteFamily::Categorical => {
                if n <= self.categorical.len() {
                    self.categorical[..n].to_vec()
                } else {
                    (0..n)
                        .map(|i| self.categorical[i % self.categorical.len()].clone())
                        .collect()
                }
            }
            PaletteFamily::Sequential => {
                let light = mix_hex("#FFFFFF", &self.primary, 0.18);
                (0..n)
                    .map(|i| {
                        let t = (i + 1) as f32 / n as f32;
                        mix_hex(&light, &self.primary, t)
                    })
                    .collect()
            }
            PaletteFamily::Warm => {
                let stops = [
                    self.gradient_warm[0].as_str(),
                    self.secondary.as_str(),
                    self.highlight.as_str(),
                ];
                ramp(&stops, n)
            }
            PaletteFamily::Cool => {
                let stops = [
                    self.gradient_cool[0].as_str(),
                    self.tertiary.as_str(),
                    self.gradient_cool[2].as_str(),
                ];
                ramp(&stops, n)
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::unified()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteFamily {
    Categorical,
    Sequential,
    Warm,
    Cool,
}

impl PaletteFamily {
    /// Unrecognized names fall back to the full categorical family.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sequential" => Self::Sequential,
            "warm" => Self::Warm,
            "cool" => Self::Cool,
            _ => Self::Categorical,
        }
    }
}

fn parse_hex(color: &str) -> (f32, f32, f32) {
    let raw = color.trim_start_matches('#');
    if raw.len() != 6 {
        return (0.0, 0.0, 0.0);
    }
    let channel = |range| u8::from_str_radix(&raw[range], 16).unwrap_or(0) as f32;
    (channel(0..2), channel(2..4), channel(4..6))
}

/// Linear RGB interpolation between two hex colors, `t` in [0, 1].
pub fn mix_hex(from: &str, to: &str, t: f32) -> String {
    let (r1, g1, b1) = parse_hex(from);
    let (r2, g2, b2) = parse_hex(to);
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f32, b: f32| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        lerp(r1, r2),
        lerp(g1, g2),
        lerp(b1, b2)
    )
}

/// Samples `n` evenly spaced colors along a piecewise-linear multi-stop
/// gradient. A single sample lands on the middle of the ramp.
pub fn ramp(stops: &[&str], n: usize) -> Vec<String> {
    if n == 0 || stops.is_empty() {
        return Vec::new();
    }
    if stops.len() == 1 {
        return vec![stops[0].to_string(); n];
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 {
                0.5
            } else {
                i as f32 / (n - 1) as f32
            };
            let scaled = t * (stops.len() - 1) as f32;
            let seg = (scaled.floor() as usize).min(stops.len() - 2);
            mix_hex(stops[seg], stops[seg + 1], scaled - seg as f32)
        })
        .collect()
}

/// Diverging sample for correlation cells: cool side for negative values,
/// warm side for positive, white center. `value` in [-1, 1].
pub fn diverging_color(palette: &Palette, value: f64) -> String {
    let v = value.clamp(-1.0, 1.0) as f32;
    if v >= 0.0 {
        mix_hex("#FFFFFF", &palette.positive, v)
    } else {
        mix_hex("#FFFFFF", &palette.gradient_cool[2], -v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_returns_requested_count_for_every_family() {
        let palette = Palette::unified();
        for family in [
            PaletteFamily::Categorical,
            PaletteFamily::Sequential,
            PaletteFamily::Warm,
            PaletteFamily::Cool,
        ] {
            for n in [1usize, 3, 6, 10] {
                let colors = palette.colors(n, family);
                assert_eq!(colors.len(), n, "{family:?} n={n}");
                for color in &colors {
                    assert!(color.starts_with('#') && color.len() == 7, "{color}");
                }
            }
        }
    }

    #[test]
    fn counts_beyond_base_cycle_the_categorical_table() {
        let palette = Palette::unified();
        let colors = palette.colors(10, PaletteFamily::Categorical);
        assert_eq!(colors[6], colors[0]);
        assert_eq!(colors[9], colors[3]);
    }

    #[test]
    fn unknown_family_name_falls_back_to_categorical() {
        assert_eq!(
            PaletteFamily::parse("viridis-ish"),
            PaletteFamily::Categorical
        );
        assert_eq!(PaletteFamily::parse("WARM"), PaletteFamily::Warm);
    }

    #[test]
    fn mix_hits_both_endpoints() {
        assert_eq!(mix_hex("#000000", "#FFFFFF", 0.0), "#000000");
        assert_eq!(mix_hex("#000000", "#FFFFFF", 1.0), "#FFFFFF");
    }

    #[test]
    fn diverging_center_is_white() {
        let palette = Palette::unified();
        assert_eq!(diverging_color(&palette, 0.0), "#FFFFFF");
        assert_eq!(diverging_color(&palette, 1.0), palette.positive);
    }
}
