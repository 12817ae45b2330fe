//! Cluster Engine - load-or-train lifecycle for the mean-shift model.
//!
//! A persisted model is reused only when its stored feature signature
//! matches the current dataset's numeric columns; anything wrong with the
//! stored artifact (absent, corrupt, stale) silently falls back to a
//! retrain. Training failures are the only errors surfaced to the caller.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::artifacts::{read_json, write_json, ArtifactError, ArtifactStore};
use crate::constants::MEANSHIFT_MODEL_KEY;
use crate::dataset::Dataset;
use crate::features::layout::validate_signature;
use crate::features::{FeatureSignature, StandardScaler};

use super::meanshift::{
    estimate_bandwidth, mean_shift, BANDWIDTH_MAX_SAMPLES, BANDWIDTH_QUANTILE,
};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum ClusterError {
    NoNumericColumns,
    MissingColumn(String),
    Artifact(ArtifactError),
    StaleModel(String),
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterError::NoNumericColumns => {
                write!(f, "Dataset has no numeric columns to cluster")
            }
            ClusterError::MissingColumn(name) => {
                write!(f, "Dataset is missing model column: {}", name)
            }
            ClusterError::Artifact(e) => write!(f, "Cluster artifact error: {}", e),
            ClusterError::StaleModel(msg) => write!(f, "Stored cluster model unusable: {}", msg),
        }
    }
}

impl std::error::Error for ClusterError {}

impl From<ArtifactError> for ClusterError {
    fn from(err: ArtifactError) -> Self {
        ClusterError::Artifact(err)
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// Persisted mean-shift model with its feature signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanShiftModel {
    pub id: String,
    pub trained_at: i64, // Unix timestamp
    pub signature: FeatureSignature,
    pub feature_names: Vec<String>,
    pub bandwidth: f32,
    pub scaler: StandardScaler,
    pub centers: Vec<Vec<f32>>,
}

impl MeanShiftModel {
    pub fn n_clusters(&self) -> usize {
        self.centers.len()
    }

    /// Validate the stored signature against a dataset's numeric columns
    fn validate_for(&self, names: &[String]) -> Result<(), ClusterError> {
        validate_signature(FeatureSignature::of(names), self.signature)
            .map_err(|e| ClusterError::StaleModel(e.to_string()))?;
        if self.feature_names != names {
            return Err(ClusterError::StaleModel(format!(
                "feature set changed ({} columns stored, {} current)",
                self.feature_names.len(),
                names.len()
            )));
        }
        Ok(())
    }

    /// Assign every dataset row to its nearest cluster center
    pub fn assign(&self, data: &Dataset) -> Result<Vec<u32>, ClusterError> {
        for name in &self.feature_names {
            if !data.has_column(name) {
                return Err(ClusterError::MissingColumn(name.clone()));
            }
        }
        let x = data
            .numeric_matrix(&self.feature_names)
            .ok_or(ClusterError::NoNumericColumns)?;
        let scaled = self
            .scaler
            .transform(&x)
            .ok_or(ClusterError::NoNumericColumns)?;
        Ok(super::meanshift::assign_to_centers(&scaled, &self.centers))
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct ClusterEngine<'a> {
    store: &'a dyn ArtifactStore,
}

impl<'a> ClusterEngine<'a> {
    pub fn new(store: &'a dyn ArtifactStore) -> Self {
        Self { store }
    }

    /// Reuse the persisted model when it matches the dataset, retrain
    /// otherwise. Load problems never surface; only a failed retrain does.
    pub fn fit_or_load(&self, data: &Dataset) -> Result<MeanShiftModel, ClusterError> {
        match self.load_for(data) {
            Ok(model) => {
                log::info!(
                    "Reusing persisted mean-shift model ({} clusters)",
                    model.n_clusters()
                );
                return Ok(model);
            }
            Err(e) => {
                log::debug!("Persisted cluster model not reused ({}), retraining", e);
            }
        }
        self.train(data)
    }

    fn load_for(&self, data: &Dataset) -> Result<MeanShiftModel, ClusterError> {
        let model: MeanShiftModel = read_json(self.store, MEANSHIFT_MODEL_KEY)?;
        model.validate_for(&data.numeric_column_names())?;
        Ok(model)
    }

    /// Train a fresh model and persist it.
    pub fn train(&self, data: &Dataset) -> Result<MeanShiftModel, ClusterError> {
        let names = data.numeric_column_names();
        let x = data
            .numeric_matrix(&names)
            .ok_or(ClusterError::NoNumericColumns)?;

        let scaler = StandardScaler::fit(&x);
        let scaled = scaler.transform(&x).ok_or(ClusterError::NoNumericColumns)?;

        let bandwidth = estimate_bandwidth(&scaled, BANDWIDTH_QUANTILE, BANDWIDTH_MAX_SAMPLES);
        let fit = mean_shift(&scaled, bandwidth);
        log::info!(
            "Trained mean-shift model: {} clusters over {} rows ({} features, bandwidth {:.3})",
            fit.centers.len(),
            scaled.nrows(),
            names.len(),
            bandwidth
        );

        let model = MeanShiftModel {
            id: uuid::Uuid::new_v4().to_string(),
            trained_at: Utc::now().timestamp(),
            signature: FeatureSignature::of(&names),
            feature_names: names,
            bandwidth,
            scaler,
            centers: fit.centers,
        };

        // Persistence is best-effort; the freshly trained model is still usable
        if let Err(e) = write_json(self.store, MEANSHIFT_MODEL_KEY, &model) {
            log::warn!("Failed to persist mean-shift model: {}", e);
        }

        Ok(model)
    }
}
