use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ev_survey_renderer::canvas::{Paint, SvgCanvas};
use ev_survey_renderer::stats;
use std::hint::black_box;

fn synthetic_columns(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..cols)
        .map(|c| {
            (0..rows)
                .map(|r| 1.0 + ((r * 7 + c * 3) % 9) as f64 * 0.5)
                .collect()
        })
        .collect()
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix");
    for rows in [50usize, 300, 1000] {
        let columns = synthetic_columns(rows, 6);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &columns, |b, columns| {
            b.iter(|| stats::correlation_matrix(black_box(columns)));
        });
    }
    group.finish();
}

fn bench_pca(c: &mut Criterion) {
    let columns = synthetic_columns(300, 4);
    c.bench_function("pca2_300x4", |b| {
        b.iter(|| stats::pca2(black_box(&columns)));
    });
}

fn bench_cluster_order(c: &mut Criterion) {
    let rows: Vec<Vec<f64>> = (0..80)
        .map(|r| (0..8).map(|c| ((r * 5 + c) % 11) as f64).collect())
        .collect();
    c.bench_function("cluster_order_80x8", |b| {
        b.iter(|| stats::cluster_order(black_box(&rows)));
    });
}

fn bench_donut_svg(c: &mut Criterion) {
    c.bench_function("svg_canvas_500_sectors", |b| {
        b.iter(|| {
            let mut canvas = SvgCanvas::new(800.0, 800.0, "#FFFFFF", "Arial");
            for i in 0..500u32 {
                let start = i as f32 * 0.012;
                canvas.annular_sector(
                    400.0,
                    400.0,
                    300.0,
                    150.0,
                    start,
                    start + 0.011,
                    &Paint::fill("#B6B3D6"),
                );
            }
            black_box(canvas.into_svg())
        });
    });
}

criterion_group!(
    benches,
    bench_correlation,
    bench_pca,
    bench_cluster_order,
    bench_donut_svg
);
criterion_main!(benches);
