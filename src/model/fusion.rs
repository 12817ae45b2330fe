//! Risk Classifier - model/rule fusion for one-student predictions.
//!
//! The trained model and the rule scorer both run; the fusion policy decides
//! which label survives. The model loses whenever it is unavailable, fails,
//! or predicts exactly Medium - an under-discriminative model would
//! otherwise collapse almost everything into the middle tier.

use serde::{Deserialize, Serialize};

use crate::artifacts::{read_json, ArtifactStore};
use crate::constants::SCALER_KEY;
use crate::explain;
use crate::features::{FeatureVector, StandardScaler, FEATURE_COUNT};
use crate::schema::{normalize_record, RiskTier, StudentRecord};

use super::classifier::{ModelPrediction, ModelStatus, OnnxClassifier};
use super::rules::{self, RuleScore};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Where the final label came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionSource {
    Model,
    Rules,
}

/// Tagged model-stage outcome; the fallback trigger is never a blanket catch
#[derive(Debug)]
pub enum ModelOutcome {
    Predicted(ModelPrediction),
    /// Model answered exactly Medium - treated as under-discriminative
    Ambiguous(ModelPrediction),
    Unavailable,
    Failed(String),
}

/// Final prediction for one student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub risk_level: RiskTier,
    /// [0, 100] model-based, [60, 95] rule-based
    pub confidence: f32,
    pub key_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub source: PredictionSource,
}

/// Structured prediction failure - public operations never panic or leak a
/// raw error value
#[derive(Debug)]
pub enum PredictionError {
    Computation(String),
}

impl std::fmt::Display for PredictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionError::Computation(msg) => write!(f, "Error making prediction: {}", msg),
        }
    }
}

impl std::error::Error for PredictionError {}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct RiskClassifier<'a> {
    store: &'a dyn ArtifactStore,
    model: OnnxClassifier<'a>,
}

impl<'a> RiskClassifier<'a> {
    pub fn new(store: &'a dyn ArtifactStore) -> Self {
        Self {
            store,
            model: OnnxClassifier::new(store),
        }
    }

    pub fn model_status(&self) -> ModelStatus {
        self.model.status()
    }

    /// Classify one student record into a risk tier.
    ///
    /// Input stage: normalize fields, recompute derived features, build the
    /// model vector (missing features fill with 0). Model and rule stages
    /// both run; `fuse` picks the label. The only hard failure is a record
    /// with no usable fields at all.
    pub fn predict_risk_level(
        &self,
        input: &StudentRecord,
    ) -> Result<RiskPrediction, PredictionError> {
        if input.is_empty() {
            return Err(PredictionError::Computation(
                "input record has no fields".to_string(),
            ));
        }

        let mut record = input.clone();
        normalize_record(&mut record);
        crate::features::derived::attach_derived(&mut record);

        let rule = rules::evaluate(&record);
        let outcome = self.model_stage(&record);
        let (risk_level, confidence, source) = fuse(&outcome, &rule);

        Ok(RiskPrediction {
            risk_level,
            confidence,
            key_factors: explain::key_factors(&record, risk_level),
            recommendations: explain::get_recommendations(risk_level),
            source,
        })
    }

    /// Model stage: vector → scale → predict, every failure mode tagged.
    fn model_stage(&self, record: &StudentRecord) -> ModelOutcome {
        if !self.model.ensure_loaded() {
            return ModelOutcome::Unavailable;
        }

        let vector = FeatureVector::from_record(record);
        let scaler = self.load_scaler(&vector);
        let Some(scaled) = scaler.transform_row(&vector.values) else {
            return ModelOutcome::Failed(format!(
                "persisted scaler width {} does not match {} features",
                scaler.len(),
                FEATURE_COUNT
            ));
        };

        match self.model.predict(&scaled) {
            Ok(prediction) if prediction.tier == RiskTier::Medium => {
                ModelOutcome::Ambiguous(prediction)
            }
            Ok(prediction) => ModelOutcome::Predicted(prediction),
            Err(e) => ModelOutcome::Failed(e.to_string()),
        }
    }

    /// Persisted scaler, or one freshly fit on the input when absent.
    ///
    /// The fresh fit is degenerate (a single row transforms to zeros); kept
    /// for compatibility with the historical pipeline.
    fn load_scaler(&self, vector: &FeatureVector) -> StandardScaler {
        match read_json::<StandardScaler>(self.store, SCALER_KEY) {
            Ok(scaler) => scaler,
            Err(e) => {
                log::debug!("Feature scaler not loaded ({}), fitting on input", e);
                StandardScaler::fit_row(&vector.values)
            }
        }
    }
}

/// Fusion policy: final tier, confidence and source.
///
/// Unavailable, failed or Medium-predicting model → rule tier. Confidence
/// comes from the model's class probabilities when it produced any,
/// otherwise from the rule transform.
pub fn fuse(outcome: &ModelOutcome, rule: &RuleScore) -> (RiskTier, f32, PredictionSource) {
    let model_confidence = |prediction: &ModelPrediction| {
        prediction
            .probabilities
            .as_ref()
            .and_then(|probs| {
                probs
                    .iter()
                    .cloned()
                    .fold(None::<f32>, |acc, p| Some(acc.map_or(p, |a| a.max(p))))
            })
            .map(|p| p * 100.0)
    };

    match outcome {
        ModelOutcome::Predicted(prediction) => {
            let confidence = model_confidence(prediction).unwrap_or(rule.confidence);
            (prediction.tier, confidence, PredictionSource::Model)
        }
        ModelOutcome::Ambiguous(prediction) => {
            // Rule label wins, but a calibrated model still prices the confidence
            let confidence = model_confidence(prediction).unwrap_or(rule.confidence);
            (rule.tier, confidence, PredictionSource::Rules)
        }
        ModelOutcome::Unavailable => {
            log::debug!("Classifier unavailable, using rule-based tier");
            (rule.tier, rule.confidence, PredictionSource::Rules)
        }
        ModelOutcome::Failed(reason) => {
            log::warn!("Classifier failed ({}), using rule-based tier", reason);
            (rule.tier, rule.confidence, PredictionSource::Rules)
        }
    }
}
