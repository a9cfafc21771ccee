use crate::canvas::SvgCanvas;
use crate::config::RenderConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Svg,
    Png,
}

impl FigureFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Svg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Single persistence choke point: every finished figure goes through here.
/// SVG is written verbatim; PNG is rasterized at the configured DPI scale
/// over an opaque white background.
pub fn save_figure(canvas: SvgCanvas, path: &Path, render: &RenderConfig) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let svg = canvas.into_svg();
    match FigureFormat::from_path(path) {
        FigureFormat::Svg => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        FigureFormat::Png => {
            write_png(&svg, path, render)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, render: &RenderConfig) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt).context("failed to re-parse generated SVG")?;
    let scale = render.scale();
    let size = tree.size();
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("failed to allocate {width}x{height} pixmap"))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);
    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap
        .save_png(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, path: &Path, _render: &RenderConfig) -> Result<()> {
    anyhow::bail!(
        "PNG output requested for {} but the `png` feature is disabled",
        path.display()
    )
}

/// Sibling directory for the per-panel exports of a composite figure,
/// derived deterministically from the figure's file name.
pub fn panel_dir(figure_path: &Path) -> PathBuf {
    let stem = figure_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("figure");
    let parent = figure_path.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}_panels"))
}

/// Creates the panel directory if needed and returns the path for one
/// panel image, e.g. `A_Gender_Distribution.png`.
pub fn panel_path(
    figure_path: &Path,
    letter: char,
    title: &str,
    format: FigureFormat,
) -> Result<PathBuf> {
    let dir = panel_dir(figure_path);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create panel directory {}", dir.display()))?;
    let slug: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    Ok(dir.join(format!("{letter}_{slug}.{}", format.extension())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_dir_is_a_sibling_named_after_the_stem() {
        let dir = panel_dir(Path::new("/tmp/out/figure07_overview.png"));
        assert_eq!(dir, PathBuf::from("/tmp/out/figure07_overview_panels"));
    }

    #[test]
    fn format_follows_the_extension() {
        assert_eq!(
            FigureFormat::from_path(Path::new("x/plot.PNG")),
            FigureFormat::Png
        );
        assert_eq!(
            FigureFormat::from_path(Path::new("x/plot.svg")),
            FigureFormat::Svg
        );
        // Unknown extensions stay SVG, the lossless default.
        assert_eq!(
            FigureFormat::from_path(Path::new("x/plot.out")),
            FigureFormat::Svg
        );
    }

    #[test]
    fn panel_titles_are_slugged() {
        let tmp = tempfile::tempdir().unwrap();
        let figure = tmp.path().join("overview.svg");
        let path = panel_path(&figure, 'B', "Education Distribution", FigureFormat::Svg).unwrap();
        assert!(path.ends_with("overview_panels/B_Education_Distribution.svg"));
        assert!(panel_dir(&figure).is_dir());
    }
}
