//! Composite score reduction
//!
//! A single principal component is fitted over the scaled features of every
//! project combined. The projection onto it (`eng_raw`) is then min-max
//! rescaled within each project to give `engagement_score`.
//!
//! ## Orientation
//!
//! An eigenvector is only defined up to sign. The component is flipped so its
//! weights sum to a positive value, which makes more activity across the
//! features read as a higher raw score. If the weights sum to exactly zero,
//! the largest-magnitude weight is made positive instead.

use common::models::{
    FeatureVector, ScaledAggregate, ScoredAggregate, FEATURE_COUNT, FEATURE_NAMES,
};
use tracing::info;

use crate::scaling::{project_groups, MinMaxScaler};

type Matrix = [[f64; FEATURE_COUNT]; FEATURE_COUNT];

const MAX_SWEEPS: usize = 64;

/// One-component principal component analysis over the five features
#[derive(Debug, Clone, PartialEq)]
pub struct Pca {
    /// Column means subtracted before projecting
    pub mean: [f64; FEATURE_COUNT],
    /// Unit-length weights of the first component
    pub weights: [f64; FEATURE_COUNT],
    /// Variance captured by the component
    pub explained_variance: f64,
    /// Share of total variance captured, 0 when the data has no variance
    pub explained_variance_ratio: f64,
}

impl Pca {
    /// Fit on all rows. Returns `None` for an empty input.
    pub fn fit(rows: &[FeatureVector]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let data: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(|r| r.to_array()).collect();
        let n = data.len() as f64;

        let mut mean = [0.0; FEATURE_COUNT];
        for row in &data {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }

        let denom = (n - 1.0).max(1.0);
        let mut cov: Matrix = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
        for row in &data {
            for i in 0..FEATURE_COUNT {
                for j in 0..FEATURE_COUNT {
                    cov[i][j] += (row[i] - mean[i]) * (row[j] - mean[j]) / denom;
                }
            }
        }

        let total_variance: f64 = (0..FEATURE_COUNT).map(|i| cov[i][i]).sum();
        if total_variance < f64::EPSILON {
            let w = 1.0 / (FEATURE_COUNT as f64).sqrt();
            return Some(Self {
                mean,
                weights: [w; FEATURE_COUNT],
                explained_variance: 0.0,
                explained_variance_ratio: 0.0,
            });
        }

        let (eigenvalues, eigenvectors) = jacobi_eigen(cov);
        let top = (0..FEATURE_COUNT).fold(0, |best, i| {
            if eigenvalues[i] > eigenvalues[best] {
                i
            } else {
                best
            }
        });

        let mut weights = [0.0; FEATURE_COUNT];
        for (k, w) in weights.iter_mut().enumerate() {
            *w = eigenvectors[k][top];
        }
        orient(&mut weights);

        let explained_variance = eigenvalues[top].max(0.0);
        Some(Self {
            mean,
            weights,
            explained_variance,
            explained_variance_ratio: explained_variance / total_variance,
        })
    }

    /// Project one row onto the component
    pub fn project(&self, row: FeatureVector) -> f64 {
        row.to_array()
            .iter()
            .zip(&self.mean)
            .zip(&self.weights)
            .map(|((v, m), w)| (v - m) * w)
            .sum()
    }

    /// Log the per-feature weights
    pub fn report(&self) {
        info!(
            "PCA component 1 explains {:.4} of variance",
            self.explained_variance_ratio
        );
        for (name, weight) in FEATURE_NAMES.iter().zip(&self.weights) {
            info!("  {}", weight_line(name, *weight));
        }
    }
}

/// One aligned, signed line of the weight report
pub(crate) fn weight_line(name: &str, weight: f64) -> String {
    format!("{:15}: {:+.4}", name, weight)
}

/// Flip the sign so the weights sum positive (ties: largest magnitude positive)
fn orient(weights: &mut [f64; FEATURE_COUNT]) {
    let sum: f64 = weights.iter().sum();
    let flip = if sum.abs() > 1e-12 {
        sum < 0.0
    } else {
        let largest = weights
            .iter()
            .copied()
            .fold(0.0_f64, |acc, w| if w.abs() > acc.abs() { w } else { acc });
        largest < 0.0
    };
    if flip {
        for w in weights.iter_mut() {
            *w = -*w;
        }
    }
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns eigenvalues and a matrix whose column `i` is the unit eigenvector
/// of eigenvalue `i`.
fn jacobi_eigen(mut a: Matrix) -> ([f64; FEATURE_COUNT], Matrix) {
    let mut v: Matrix = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    let norm: f64 = a.iter().flatten().map(|x| x * x).sum::<f64>().sqrt();

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..FEATURE_COUNT)
            .flat_map(|p| ((p + 1)..FEATURE_COUNT).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum::<f64>()
            .sqrt();
        if off <= 1e-15 * norm {
            break;
        }

        for p in 0..FEATURE_COUNT {
            for q in (p + 1)..FEATURE_COUNT {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..FEATURE_COUNT {
                    let (akp, akq) = (a[k][p], a[k][q]);
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..FEATURE_COUNT {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut eigenvalues = [0.0; FEATURE_COUNT];
    for (i, e) in eigenvalues.iter_mut().enumerate() {
        *e = a[i][i];
    }
    (eigenvalues, v)
}

/// Fit the component over all rows, project each row, and rescale per project.
///
/// Returns `None` for an empty input.
pub fn score(rows: Vec<ScaledAggregate>) -> Option<(Vec<ScoredAggregate>, Pca)> {
    let features: Vec<FeatureVector> = rows.iter().map(|r| r.features).collect();
    let pca = Pca::fit(&features)?;

    let raw: Vec<f64> = features.iter().map(|f| pca.project(*f)).collect();
    let mut normalized = vec![0.0; raw.len()];
    for indices in project_groups(&rows, |r| r.project_url.as_str()).values() {
        let group: Vec<f64> = indices.iter().map(|&i| raw[i]).collect();
        let scaler = MinMaxScaler::fit(&group);
        for &i in indices {
            normalized[i] = scaler.transform(raw[i]);
        }
    }

    let scored = rows
        .into_iter()
        .zip(raw.into_iter().zip(normalized))
        .map(|(row, (eng_raw, engagement_score))| ScoredAggregate::new(row, eng_raw, engagement_score))
        .collect();

    Some((scored, pca))
}
