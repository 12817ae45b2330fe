//! Model Module - risk classification engine
//!
//! Trained-model inference, the deterministic rule scorer, and the fusion
//! policy that combines them into one label.

pub mod classifier;
pub mod fusion;
pub mod rules;

#[cfg(test)]
mod tests;

// Re-export common types
pub use classifier::{InferenceError, ModelPrediction, ModelStatus, OnnxClassifier};
pub use fusion::{
    fuse, ModelOutcome, PredictionError, PredictionSource, RiskClassifier, RiskPrediction,
};
pub use rules::{rule_confidence, rule_score, rule_tier, RuleScore};
