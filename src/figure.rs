use crate::canvas::{Anchor, Paint, Region, SvgCanvas, TextStyle};
use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// One figure under construction: a canvas plus the remaining content
/// region. Suptitles are carved off the top as they are added.
pub struct Figure<'a> {
    pub canvas: SvgCanvas,
    pub cfg: &'a Config,
    content: Region,
}

impl<'a> Figure<'a> {
    pub fn new(width: f32, height: f32, cfg: &'a Config) -> Self {
        let canvas = SvgCanvas::new(
            width,
            height,
            &cfg.theme.background,
            &cfg.theme.font_family,
        );
        let content = canvas.frame().inset(cfg.render.pad);
        Self {
            canvas,
            cfg,
            content,
        }
    }

    /// Region still available for panels.
    pub fn content(&self) -> Region {
        self.content
    }

    /// Bold figure-level title across the top; shrinks the content region.
    pub fn suptitle(&mut self, text: &str) {
        let theme = &self.cfg.theme;
        let size = theme.suptitle_size;
        self.canvas.text(
            self.content.cx(),
            self.content.y + size,
            text,
            &TextStyle::new(size, "#1A1A1A").bold().centered(),
        );
        let used = size * 1.8;
        self.content = Region::new(
            self.content.x,
            self.content.y + used,
            self.content.width,
            (self.content.height - used).max(0.0),
        );
    }

    /// Panel letter (A, B, C, ...) at the top-left corner of a region.
    pub fn panel_label(&mut self, region: Region, letter: char) {
        let theme = &self.cfg.theme;
        self.canvas.text(
            region.x + 2.0,
            region.y + theme.title_size,
            &letter.to_string(),
            &TextStyle::new(theme.title_size + 1.0, &theme.text_color).bold(),
        );
    }

    /// Bold panel title centered over a region.
    pub fn panel_title(&mut self, region: Region, text: &str) {
        let theme = &self.cfg.theme;
        self.canvas.text(
            region.cx(),
            region.y + theme.title_size,
            text,
            &TextStyle::new(theme.title_size - 1.0, &theme.text_color)
                .bold()
                .centered(),
        );
    }

    /// Expected-insufficiency path: the chart cannot be computed, so the
    /// panel carries explanatory text instead of raising.
    pub fn placeholder(&mut self, region: Region, message: &str) {
        let theme = &self.cfg.theme;
        self.canvas.text(
            region.cx(),
            region.cy(),
            message,
            &TextStyle::new(theme.title_size - 1.0, &theme.text_muted).centered(),
        );
    }

    /// Footnote in the bottom-right corner of a region.
    pub fn footnote(&mut self, region: Region, text: &str) {
        let theme = &self.cfg.theme;
        self.canvas.text(
            region.right() - 2.0,
            region.bottom() - 4.0,
            text,
            &TextStyle::new(theme.label_size - 1.0, &theme.text_muted)
                .italic()
                .anchored(Anchor::End),
        );
    }

    /// Rounded summary card with left-aligned text lines.
    pub fn info_card(&mut self, region: Region, lines: &[String], border: &str) {
        let theme = &self.cfg.theme;
        self.canvas.rounded_rect(
            region.x,
            region.y,
            region.width,
            region.height,
            8.0,
            &Paint::fill("#F8F9FA").outlined(border, 1.5),
        );
        let style = TextStyle::new(theme.font_size - 1.0, &theme.text_color);
        let line_height = self.cfg.layout.label_line_height + 0.25;
        let mut y = region.y + theme.font_size * 1.6;
        for line in lines {
            self.canvas.text(region.x + 12.0, y, line, &style);
            y += style.size * line_height;
        }
    }

    pub fn save(self, path: &Path) -> Result<()> {
        crate::output::save_figure(self.canvas, path, &self.cfg.render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suptitle_shrinks_the_content_region() {
        let cfg = Config::default();
        let mut figure = Figure::new(400.0, 300.0, &cfg);
        let before = figure.content();
        figure.suptitle("Figure 1: Overview");
        let after = figure.content();
        assert!(after.y > before.y);
        assert!(after.height < before.height);
        assert_eq!(after.width, before.width);
    }

    #[test]
    fn placeholder_renders_the_message() {
        let cfg = Config::default();
        let mut figure = Figure::new(200.0, 100.0, &cfg);
        let region = figure.content();
        figure.placeholder(region, "Insufficient data");
        assert!(figure.canvas.into_svg().contains("Insufficient data"));
    }
}
