use super::axes::{x_axis_title, y_axis_title};
use crate::canvas::{Paint, Region, TextStyle};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::stats;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

const MIN_ROWS: usize = 20;

/// Awareness-space map: respondents projected onto the first two principal
/// components of the composite indices, colored by intention tier and
/// marked by energy experience.
pub fn render(data: &Dataset, cfg: &Config, path: &Path) -> Result<()> {
    let mut fig = Figure::new(980.0, 880.0, cfg);
    fig.suptitle("University Student NEV Awareness Space (PCA)");
    let content = fig.content();

    if data.len() < MIN_ROWS {
        fig.placeholder(content, "Insufficient valid samples");
        return fig.save(path);
    }
    let columns = [
        data.column(|r| r.knowledge_index),
        data.column(|r| r.responsibility_index),
        data.column(|r| r.trust_index),
        data.column(|r| r.policy_index),
    ];
    let Some(pca) = stats::pca2(&columns) else {
        fig.placeholder(content, "Insufficient data for PCA analysis");
        return fig.save(path);
    };
    debug!(explained = ?pca.explained, "pca variance");

    let plot = Region::new(
        content.x + 64.0,
        content.y + 10.0,
        content.width - 90.0,
        content.height - 96.0,
    );
    let extent = pca
        .scores
        .iter()
        .flat_map(|(a, b)| [a.abs(), b.abs()])
        .fold(1.0f64, f64::max)
        * 1.15;
    let x_of = |v: f64| plot.cx() + (v / extent) as f32 * plot.width / 2.0;
    let y_of = |v: f64| plot.cy() - (v / extent) as f32 * plot.height / 2.0;

    // Quadrant cross.
    let quadrant = Paint::stroke(&cfg.theme.grid_color, 1.0).dashed("6 4").with_opacity(0.7);
    fig.canvas
        .line(plot.x, plot.cy(), plot.right(), plot.cy(), &quadrant);
    fig.canvas
        .line(plot.cx(), plot.y, plot.cx(), plot.bottom(), &quadrant);

    let tier_color = |intention: u8| match intention {
        1 | 2 => cfg.palette.positive.clone(),
        3 => cfg.palette.neutral.clone(),
        _ => cfg.palette.negative.clone(),
    };
    for (record, (pc1, pc2)) in data.records().iter().zip(&pca.scores) {
        let color = tier_color(record.purchase_intention);
        let x = x_of(*pc1);
        let y = y_of(*pc2);
        let paint = Paint::fill(&color).outlined("#FFFFFF", 1.5).with_opacity(0.7);
        if record.energy_experience == 1 {
            fig.canvas.circle(x, y, 6.0, &paint);
        } else {
            fig.canvas.rect(x - 5.0, y - 5.0, 10.0, 10.0, &paint);
        }
    }

    // Loading vectors, stretched for legibility.
    let arrow = Paint::stroke("#2C3E50", 2.0);
    let loading_style = TextStyle::new(cfg.theme.label_size + 1.0, "#2C3E50").bold();
    let names = ["Know.", "Resp.", "Trust", "Policy"];
    for (idx, (lx, ly)) in pca.loadings.iter().enumerate() {
        let tip = (x_of(lx * 3.0), y_of(ly * 3.0));
        fig.canvas.line(plot.cx(), plot.cy(), tip.0, tip.1, &arrow);
        fig.canvas.text(
            x_of(lx * 3.3),
            y_of(ly * 3.3),
            names[idx],
            &loading_style,
        );
    }

    // Quadrant annotations.
    let corner = TextStyle::new(cfg.theme.label_size + 1.0, &cfg.theme.text_muted).bold();
    fig.canvas.text(
        plot.right() - 150.0,
        plot.y + 22.0,
        "High Trust / High Resp.",
        &corner,
    );
    fig.canvas
        .text(plot.x + 10.0, plot.y + 22.0, "Low Trust / High Resp.", &corner);
    fig.canvas.text(
        plot.x + 10.0,
        plot.bottom() - 12.0,
        "Low Trust / Low Resp.",
        &corner,
    );
    fig.canvas.text(
        plot.right() - 150.0,
        plot.bottom() - 12.0,
        "High Trust / Low Resp.",
        &corner,
    );

    x_axis_title(
        &mut fig,
        plot,
        &format!("PC1 ({:.1}% Var Explained)", pca.explained[0] * 100.0),
    );
    y_axis_title(
        &mut fig,
        plot,
        &format!("PC2 ({:.1}% Var Explained)", pca.explained[1] * 100.0),
    );

    super::legend_v(
        &mut fig,
        plot.x + 10.0,
        plot.y + 40.0,
        &[
            ("High Intention".to_string(), cfg.palette.positive.clone()),
            ("Medium Intention".to_string(), cfg.palette.neutral.clone()),
            ("Low Intention".to_string(), cfg.palette.negative.clone()),
        ],
    );
    fig.canvas.text(
        plot.x + 12.0,
        plot.y + 110.0,
        "Circle = experienced, square = no experience",
        &TextStyle::new(cfg.theme.label_size - 1.0, &cfg.theme.text_muted).italic(),
    );
    fig.footnote(
        content,
        &format!(
            "Total variance explained: {:.1}%",
            (pca.explained[0] + pca.explained[1]) * 100.0
        ),
    );

    fig.save(path)
}
