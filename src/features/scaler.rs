//! Standard scaler (zero mean, unit variance per column)
//!
//! Persisted as a JSON artifact next to the classifier it was fit with.
//! Population standard deviation with an epsilon floor so constant columns
//! transform to 0 instead of dividing by zero.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

const STD_FLOOR: f32 = 1e-8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f32>,
    pub stds: Vec<f32>,
}

impl StandardScaler {
    /// Fit per-column mean and standard deviation
    pub fn fit(x: &Array2<f32>) -> Self {
        let n = x.nrows().max(1) as f32;
        let means: Vec<f32> = x
            .mean_axis(Axis(0))
            .map(|m| m.to_vec())
            .unwrap_or_else(|| vec![0.0; x.ncols()]);

        let mut stds = vec![0.0f32; x.ncols()];
        for (j, std) in stds.iter_mut().enumerate() {
            let mean = means[j];
            let var: f32 = x.column(j).iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
            *std = var.sqrt().max(STD_FLOOR);
        }

        Self { means, stds }
    }

    /// Fit on a single row (degenerate: transforms that row to zeros)
    pub fn fit_row(row: &[f32]) -> Self {
        Self {
            means: row.to_vec(),
            stds: vec![STD_FLOOR.max(1.0); row.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Transform one row; length must match the fit
    pub fn transform_row(&self, row: &[f32]) -> Option<Vec<f32>> {
        if row.len() != self.means.len() {
            return None;
        }
        Some(
            row.iter()
                .enumerate()
                .map(|(j, v)| (v - self.means[j]) / self.stds[j])
                .collect(),
        )
    }

    /// Transform a full matrix in place
    pub fn transform(&self, x: &Array2<f32>) -> Option<Array2<f32>> {
        if x.ncols() != self.means.len() {
            return None;
        }
        let mut out = x.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|v| (v - self.means[j]) / self.stds[j]);
        }
        Some(out)
    }
}
