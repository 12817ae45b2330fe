//! Mean-shift mode seeking over standardized feature matrices.
//!
//! Density-based: the number of clusters comes out of the bandwidth and the
//! data, never from a fixed k. Bin seeding starts the search from occupied
//! grid cells instead of every point, which keeps the iteration count sane
//! on a few thousand records.

use std::collections::HashMap;

use ndarray::{Array2, ArrayView1};
use rand::seq::index::sample;

/// Pairwise-distance quantile used for bandwidth estimation
pub const BANDWIDTH_QUANTILE: f64 = 0.2;

/// Bandwidth estimation sample bound
pub const BANDWIDTH_MAX_SAMPLES: usize = 500;

/// Shift-iteration cap per seed
const MAX_ITERATIONS: usize = 300;

fn euclidean(a: ArrayView1<f32>, b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

fn euclidean_rows(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Estimate the kernel bandwidth from a bounded random sample.
///
/// Takes at most `max_samples` rows, computes all pairwise distances among
/// them and returns the `quantile` quantile. Falls back to 1.0 when the
/// estimate is degenerate (identical points, single row).
pub fn estimate_bandwidth(x: &Array2<f32>, quantile: f64, max_samples: usize) -> f32 {
    let n = x.nrows();
    if n < 2 {
        return 1.0;
    }

    let picked: Vec<usize> = if n > max_samples {
        sample(&mut rand::thread_rng(), n, max_samples).into_iter().collect()
    } else {
        (0..n).collect()
    };

    let mut distances = Vec::with_capacity(picked.len() * (picked.len() - 1) / 2);
    for (i, &a) in picked.iter().enumerate() {
        for &b in picked.iter().skip(i + 1) {
            distances.push(euclidean_rows(x.row(a), x.row(b)));
        }
    }

    if distances.is_empty() {
        return 1.0;
    }
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((distances.len() - 1) as f64 * quantile).round() as usize;
    let bandwidth = distances[idx.min(distances.len() - 1)];
    if bandwidth > 0.0 && bandwidth.is_finite() {
        bandwidth
    } else {
        1.0
    }
}

/// Result of one mean-shift fit
#[derive(Debug, Clone)]
pub struct MeanShiftFit {
    /// Converged cluster centers (in the standardized space)
    pub centers: Vec<Vec<f32>>,
    /// Nearest-center label per input row
    pub labels: Vec<u32>,
}

/// Bin seeding: bucket points on a grid of side `bandwidth`, seed from each
/// occupied bucket's mean.
fn bin_seeds(x: &Array2<f32>, bandwidth: f32) -> Vec<Vec<f32>> {
    let mut bins: HashMap<Vec<i64>, (Vec<f32>, usize)> = HashMap::new();
    for row in x.rows() {
        let key: Vec<i64> = row.iter().map(|v| (v / bandwidth).floor() as i64).collect();
        let entry = bins
            .entry(key)
            .or_insert_with(|| (vec![0.0; x.ncols()], 0));
        for (acc, v) in entry.0.iter_mut().zip(row.iter()) {
            *acc += v;
        }
        entry.1 += 1;
    }

    let mut seeds: Vec<Vec<f32>> = bins
        .into_values()
        .map(|(sum, count)| sum.into_iter().map(|s| s / count as f32).collect())
        .collect();
    // HashMap order is unstable; sort for deterministic center numbering
    seeds.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    seeds
}

/// Run mean-shift with bin seeding.
pub fn mean_shift(x: &Array2<f32>, bandwidth: f32) -> MeanShiftFit {
    let n = x.nrows();
    if n == 0 {
        return MeanShiftFit {
            centers: Vec::new(),
            labels: Vec::new(),
        };
    }
    let bandwidth = if bandwidth > 0.0 && bandwidth.is_finite() {
        bandwidth
    } else {
        1.0
    };
    let tol = 1e-3 * bandwidth;

    // Converge each seed onto its density mode
    let mut modes: Vec<(Vec<f32>, usize)> = Vec::new();
    for seed in bin_seeds(x, bandwidth) {
        let mut center = seed;
        let mut support = 0usize;

        for _ in 0..MAX_ITERATIONS {
            let mut sum = vec![0.0f32; x.ncols()];
            let mut count = 0usize;
            for row in x.rows() {
                if euclidean(row, &center) <= bandwidth {
                    for (acc, v) in sum.iter_mut().zip(row.iter()) {
                        *acc += v;
                    }
                    count += 1;
                }
            }
            if count == 0 {
                break;
            }
            let next: Vec<f32> = sum.into_iter().map(|s| s / count as f32).collect();
            let shift = next
                .iter()
                .zip(center.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f32>()
                .sqrt();
            center = next;
            support = count;
            if shift < tol {
                break;
            }
        }

        if support > 0 {
            modes.push((center, support));
        }
    }

    // Merge modes closer than one bandwidth; larger support wins
    modes.sort_by(|a, b| b.1.cmp(&a.1));
    let mut centers: Vec<Vec<f32>> = Vec::new();
    for (mode, _) in modes {
        let distinct = centers
            .iter()
            .all(|kept| {
                kept.iter()
                    .zip(mode.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f32>()
                    .sqrt()
                    > bandwidth
            });
        if distinct {
            centers.push(mode);
        }
    }

    if centers.is_empty() {
        // Degenerate input: single cluster at the data mean
        let mean: Vec<f32> = (0..x.ncols())
            .map(|j| x.column(j).iter().sum::<f32>() / n as f32)
            .collect();
        centers.push(mean);
    }

    let labels = assign_to_centers(x, &centers);
    MeanShiftFit { centers, labels }
}

/// Nearest-center label for every row
pub fn assign_to_centers(x: &Array2<f32>, centers: &[Vec<f32>]) -> Vec<u32> {
    x.rows()
        .into_iter()
        .map(|row| {
            let mut best = 0u32;
            let mut best_dist = f32::INFINITY;
            for (i, center) in centers.iter().enumerate() {
                let d = euclidean(row, center);
                if d < best_dist {
                    best_dist = d;
                    best = i as u32;
                }
            }
            best
        })
        .collect()
}
