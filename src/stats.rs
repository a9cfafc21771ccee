use ndarray::Array2;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

pub fn standard_error(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    std_dev(values) / (values.len() as f64).sqrt()
}

/// Pearson correlation; `None` when a series is constant or too short.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pearson r with a two-sided p value. The t statistic is mapped through
/// the standard normal; at survey sample sizes the approximation error is
/// far below the significance thresholds it feeds.
pub fn pearson_with_p(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len().min(y.len());
    if n < 3 {
        return None;
    }
    let r = pearson(x, y)?;
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return Some((r, 0.0));
    }
    let t = r * ((n - 2) as f64 / denom).sqrt();
    let p = 2.0 * (1.0 - normal_cdf(t.abs()));
    Some((r, p.clamp(0.0, 1.0)))
}

/// Standard normal CDF via the Abramowitz–Stegun erf polynomial (7.1.26).
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Fixed significance ladder. Strict comparisons: a boundary value earns
/// the conservative (fewer-star) tier.
pub fn sig_stars(p: f64) -> &'static str {
    if p < 0.001 {
        "***"
    } else if p < 0.01 {
        "**"
    } else if p < 0.05 {
        "*"
    } else {
        ""
    }
}

/// Pairwise Pearson matrix over equally long columns; constant columns
/// correlate as zero off the diagonal.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Array2<f64> {
    let k = columns.len();
    let mut matrix = Array2::zeros((k, k));
    for i in 0..k {
        matrix[(i, i)] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(&columns[i], &columns[j]).unwrap_or(0.0);
            matrix[(i, j)] = r;
            matrix[(j, i)] = r;
        }
    }
    matrix
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tertile {
    Low,
    Medium,
    High,
}

impl Tertile {
    pub const ALL: [Tertile; 3] = [Tertile::Low, Tertile::Medium, Tertile::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Interpolated quantile of an already sorted slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

/// Quantile-based Low/Medium/High discretization. When ties collapse the
/// quantile edges the split falls back to equal-width bins over the
/// observed range; a fully constant series lands in Medium.
pub fn tertile_bins(values: &[f64]) -> Vec<Tertile> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    if (max - min).abs() <= f64::EPSILON {
        return vec![Tertile::Medium; values.len()];
    }
    let q1 = quantile(&sorted, 1.0 / 3.0);
    let q2 = quantile(&sorted, 2.0 / 3.0);
    let (lo_edge, hi_edge) = if q1 < q2 && q1 > min && q2 < max {
        (q1, q2)
    } else {
        let width = (max - min) / 3.0;
        (min + width, min + 2.0 * width)
    };
    values
        .iter()
        .map(|v| {
            if *v <= lo_edge {
                Tertile::Low
            } else if *v <= hi_edge {
                Tertile::Medium
            } else {
                Tertile::High
            }
        })
        .collect()
}

pub fn standardize(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    if sd <= f64::EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - m) / sd).collect()
}

/// Gaussian kernel density over an explicit grid. `factor` scales the data
/// standard deviation into the bandwidth, matching the usual
/// covariance-factor convention.
pub fn gaussian_kde(data: &[f64], factor: f64, grid: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return vec![0.0; grid.len()];
    }
    let sd = std_dev(data);
    let bandwidth = if sd > f64::EPSILON {
        factor * sd
    } else {
        factor.max(1e-3)
    };
    let norm = 1.0 / (data.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|g| {
            data.iter()
                .map(|d| {
                    let z = (g - d) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Pca2 {
    /// Per-row (PC1, PC2) scores.
    pub scores: Vec<(f64, f64)>,
    /// Fraction of total variance carried by each component.
    pub explained: [f64; 2],
    /// Per-variable loadings scaled by sqrt(eigenvalue).
    pub loadings: Vec<(f64, f64)>,
}

/// First two principal components of standardized columns. `None` below
/// two usable variables or rows.
pub fn pca2(columns: &[Vec<f64>]) -> Option<Pca2> {
    let k = columns.len();
    if k < 2 {
        return None;
    }
    let n = columns[0].len();
    if n < 3 || columns.iter().any(|c| c.len() != n) {
        return None;
    }
    let standardized: Vec<Vec<f64>> = columns.iter().map(|c| standardize(c)).collect();
    let mut cov = Array2::zeros((k, k));
    for i in 0..k {
        for j in i..k {
            let s: f64 = (0..n)
                .map(|row| standardized[i][row] * standardized[j][row])
                .sum();
            let value = s / (n - 1) as f64;
            cov[(i, j)] = value;
            cov[(j, i)] = value;
        }
    }
    let (eigenvalues, eigenvectors) = symmetric_eigen(&cov);
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|a, b| {
        eigenvalues[*b]
            .partial_cmp(&eigenvalues[*a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let (first, second) = (order[0], order[1]);
    let total: f64 = eigenvalues.iter().map(|v| v.max(0.0)).sum();
    if total <= f64::EPSILON {
        return None;
    }
    let scores = (0..n)
        .map(|row| {
            let mut pc1 = 0.0;
            let mut pc2 = 0.0;
            for var in 0..k {
                pc1 += standardized[var][row] * eigenvectors[(var, first)];
                pc2 += standardized[var][row] * eigenvectors[(var, second)];
            }
            (pc1, pc2)
        })
        .collect();
    let loadings = (0..k)
        .map(|var| {
            (
                eigenvectors[(var, first)] * eigenvalues[first].max(0.0).sqrt(),
                eigenvectors[(var, second)] * eigenvalues[second].max(0.0).sqrt(),
            )
        })
        .collect();
    Some(Pca2 {
        scores,
        explained: [
            eigenvalues[first].max(0.0) / total,
            eigenvalues[second].max(0.0) / total,
        ],
        loadings,
    })
}

/// Cyclic Jacobi eigendecomposition for small symmetric matrices. Returns
/// eigenvalues and a matrix whose columns are the matching eigenvectors.
fn symmetric_eigen(matrix: &Array2<f64>) -> (Vec<f64>, Array2<f64>) {
    let k = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::eye(k);
    for _ in 0..64 {
        let mut off = 0.0;
        for p in 0..k {
            for q in (p + 1)..k {
                off += a[(p, q)] * a[(p, q)];
            }
        }
        if off < 1e-18 {
            break;
        }
        for p in 0..k {
            for q in (p + 1)..k {
                if a[(p, q)].abs() < 1e-15 {
                    continue;
                }
                let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * a[(p, q)]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for i in 0..k {
                    let aip = a[(i, p)];
                    let aiq = a[(i, q)];
                    a[(i, p)] = c * aip - s * aiq;
                    a[(i, q)] = s * aip + c * aiq;
                }
                for j in 0..k {
                    let apj = a[(p, j)];
                    let aqj = a[(q, j)];
                    a[(p, j)] = c * apj - s * aqj;
                    a[(q, j)] = s * apj + c * aqj;
                }
                for i in 0..k {
                    let vip = v[(i, p)];
                    let viq = v[(i, q)];
                    v[(i, p)] = c * vip - s * viq;
                    v[(i, q)] = s * vip + c * viq;
                }
            }
        }
    }
    ((0..k).map(|i| a[(i, i)]).collect(), v)
}

/// Average-linkage agglomerative leaf order over row vectors, used to order
/// the clustered heatmap. Returns the permutation of row indices.
pub fn cluster_order(rows: &[Vec<f64>]) -> Vec<usize> {
    let n = rows.len();
    if n <= 2 {
        return (0..n).collect();
    }
    let mut dist = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&rows[i], &rows[j]);
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }
    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    while clusters.len() > 1 {
        let mut best = (0usize, 1usize);
        let mut best_dist = f64::INFINITY;
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let d = average_linkage(&clusters[i], &clusters[j], &dist);
                if d < best_dist {
                    best_dist = d;
                    best = (i, j);
                }
            }
        }
        let merged = clusters.remove(best.1);
        clusters[best.0].extend(merged);
    }
    clusters.pop().unwrap_or_default()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn average_linkage(a: &[usize], b: &[usize], dist: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    for i in a {
        for j in b {
            sum += dist[*i][*j];
        }
    }
    sum / (a.len() * b.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pearson_recovers_perfect_linear_relation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let inc: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let dec: Vec<f64> = x.iter().map(|v| -v).collect();
        assert_relative_eq!(pearson(&x, &inc).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &dec).unwrap(), -1.0, epsilon = 1e-12);
        assert!(pearson(&x, &[3.0; 5]).is_none());
    }

    #[test]
    fn star_ladder_is_monotonic_and_conservative_at_boundaries() {
        assert_eq!(sig_stars(0.0009), "***");
        assert_eq!(sig_stars(0.009), "**");
        assert_eq!(sig_stars(0.04), "*");
        assert_eq!(sig_stars(0.5), "");
        // Boundary values resolve to the conservative tier.
        assert_eq!(sig_stars(0.001), "**");
        assert_eq!(sig_stars(0.01), "*");
        assert_eq!(sig_stars(0.05), "");
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let columns = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 1.0, 4.0, 3.0],
            vec![1.0, 1.0, 1.0, 1.0],
        ];
        let m = correlation_matrix(&columns);
        assert_relative_eq!(m[(0, 0)], 1.0);
        assert_relative_eq!(m[(2, 2)], 1.0);
        assert_relative_eq!(m[(0, 1)], m[(1, 0)]);
        // Constant column correlates as zero, not NaN.
        assert_relative_eq!(m[(0, 2)], 0.0);
    }

    #[test]
    fn tertiles_split_a_spread_series() {
        let values: Vec<f64> = (1..=9).map(|v| v as f64).collect();
        let bins = tertile_bins(&values);
        assert_eq!(bins.iter().filter(|t| **t == Tertile::Low).count(), 3);
        assert_eq!(bins.iter().filter(|t| **t == Tertile::High).count(), 3);
    }

    #[test]
    fn tied_tertiles_fall_back_to_equal_width() {
        // Heavy ties collapse the 1/3 and 2/3 quantiles onto one value.
        let values = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 5.0];
        let bins = tertile_bins(&values);
        assert_eq!(bins[7], Tertile::High);
        assert!(bins[..7].iter().all(|t| *t == Tertile::Low));
    }

    #[test]
    fn constant_series_lands_in_medium() {
        let bins = tertile_bins(&[2.0, 2.0, 2.0]);
        assert!(bins.iter().all(|t| *t == Tertile::Medium));
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let data = vec![1.0, 2.0, 2.5, 3.0, 4.0, 2.2, 1.8, 3.3];
        let grid: Vec<f64> = (0..400).map(|i| -5.0 + i as f64 * 0.05).collect();
        let density = gaussian_kde(&data, 0.5, &grid);
        let integral: f64 = density.iter().sum::<f64>() * 0.05;
        assert!((integral - 1.0).abs() < 0.05, "integral {integral}");
    }

    #[test]
    fn pca_finds_the_dominant_direction() {
        // Two strongly correlated columns plus noise: PC1 carries most
        // variance.
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 0.9 + ((v * 7.0).sin())).collect();
        let pca = pca2(&[x, y]).unwrap();
        assert!(pca.explained[0] > 0.9);
        assert_eq!(pca.scores.len(), 30);
        assert!(pca.explained[0] + pca.explained[1] <= 1.0 + 1e-9);
    }

    #[test]
    fn cluster_order_is_a_permutation_grouping_neighbors() {
        let rows = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.1, 0.1],
            vec![10.1, 9.9],
        ];
        let order = cluster_order(&rows);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        // The two near pairs end up adjacent.
        let pos = |idx: usize| order.iter().position(|o| *o == idx).unwrap();
        assert_eq!(pos(0).abs_diff(pos(2)), 1);
        assert_eq!(pos(1).abs_diff(pos(3)), 1);
    }

    #[test]
    fn normal_cdf_brackets_known_points() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-9);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
    }
}
