//! ONNX risk classifier - trained-model stage of the prediction pipeline.
//!
//! Loads the serialized classifier from the artifact store: primary (SVM
//! export) first, secondary (random forest export) as fallback. A missing or
//! undeserializable artifact is the same condition: model unavailable. The
//! session is loaded once and cached behind a lock; artifacts are immutable
//! once written.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::RwLock;

use crate::artifacts::ArtifactStore;
use crate::constants::{PRIMARY_MODEL_KEY, SECONDARY_MODEL_KEY};
use crate::features::FEATURE_COUNT;
use crate::schema::{RiskTier, TIER_ORDER};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Output of one model call
#[derive(Debug, Clone)]
pub struct ModelPrediction {
    pub tier: RiskTier,
    /// Class probabilities in `TIER_ORDER`, when the model emits them
    pub probabilities: Option<Vec<f32>>,
}

struct LoadedModel {
    session: Session,
    key: &'static str,
    loaded_at: DateTime<Utc>,
}

/// Model availability/identity for status surfaces
#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub available: bool,
    pub artifact_key: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct OnnxClassifier<'a> {
    store: &'a dyn ArtifactStore,
    loaded: RwLock<Option<LoadedModel>>,
}

impl<'a> OnnxClassifier<'a> {
    pub fn new(store: &'a dyn ArtifactStore) -> Self {
        Self {
            store,
            loaded: RwLock::new(None),
        }
    }

    /// Try to have a session loaded; true when the model stage is usable.
    ///
    /// Missing artifact and load failure are treated identically: the
    /// classifier is simply unavailable, never a user-facing error.
    pub fn ensure_loaded(&self) -> bool {
        if self.loaded.read().is_some() {
            return true;
        }

        for key in [PRIMARY_MODEL_KEY, SECONDARY_MODEL_KEY] {
            match self.try_load(key) {
                Ok(session) => {
                    log::info!("Loaded risk classifier from artifact '{}'", key);
                    *self.loaded.write() = Some(LoadedModel {
                        session,
                        key,
                        loaded_at: Utc::now(),
                    });
                    return true;
                }
                Err(e) => {
                    log::debug!("Classifier artifact '{}' unusable: {}", key, e);
                }
            }
        }
        false
    }

    fn try_load(&self, key: &str) -> Result<Session, InferenceError> {
        let bytes = self
            .store
            .read(key)
            .map_err(|e| InferenceError(e.to_string()))?;

        Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(&bytes)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))
    }

    pub fn status(&self) -> ModelStatus {
        let loaded = self.loaded.read();
        match loaded.as_ref() {
            Some(model) => ModelStatus {
                available: true,
                artifact_key: Some(model.key.to_string()),
                loaded_at: Some(model.loaded_at),
            },
            None => ModelStatus {
                available: false,
                artifact_key: None,
                loaded_at: None,
            },
        }
    }

    /// Run the classifier on one scaled feature row.
    ///
    /// Class scores are read in `TIER_ORDER` (the alphabetical label order
    /// the model was trained with) and softmaxed when they do not already
    /// form a probability simplex.
    pub fn predict(&self, scaled: &[f32]) -> Result<ModelPrediction, InferenceError> {
        if scaled.len() != FEATURE_COUNT {
            return Err(InferenceError(format!(
                "Expected {} features, got {}",
                FEATURE_COUNT,
                scaled.len()
            )));
        }

        let mut loaded = self.loaded.write();
        let model = loaded
            .as_mut()
            .ok_or_else(|| InferenceError("Model not loaded".to_string()))?;

        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), scaled.to_vec())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let output_name = model
            .session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError("No output defined".to_string()))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let outputs = model
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        let data = output_tensor.1;
        if data.len() < TIER_ORDER.len() {
            return Err(InferenceError(format!(
                "Expected {} class scores, got {}",
                TIER_ORDER.len(),
                data.len()
            )));
        }

        let scores: Vec<f32> = data[..TIER_ORDER.len()].to_vec();
        let probabilities = to_probabilities(&scores);

        let (best, _) = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| InferenceError("Empty class scores".to_string()))?;

        Ok(ModelPrediction {
            tier: TIER_ORDER[best],
            probabilities: Some(probabilities),
        })
    }
}

/// Scores → probabilities: pass through a valid simplex, softmax anything else
fn to_probabilities(scores: &[f32]) -> Vec<f32> {
    let sum: f32 = scores.iter().sum();
    let in_range = scores.iter().all(|s| (0.0..=1.0).contains(s));
    if in_range && (sum - 1.0).abs() < 1e-3 {
        return scores.to_vec();
    }

    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}
