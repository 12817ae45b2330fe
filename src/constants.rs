//! Central Configuration Constants
//!
//! Single source of truth for artifact keys and default locations.
//! To relocate the artifact directory, only edit this file.

use std::path::PathBuf;

/// App name (used for the platform data directory)
pub const APP_NAME: &str = "student-risk";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Artifact keys
// ============================================

/// Persisted mean-shift clustering model
pub const MEANSHIFT_MODEL_KEY: &str = "meanshift_model.json";

/// Primary risk classifier (SVM export)
pub const PRIMARY_MODEL_KEY: &str = "svm_risk_category_model.onnx";

/// Secondary risk classifier (random forest export), tried when the primary is absent
pub const SECONDARY_MODEL_KEY: &str = "rf_risk_category_model.onnx";

/// Persisted feature scaler for the risk classifier
pub const SCALER_KEY: &str = "risk_category_scaler.json";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the artifact directory from environment or use the platform default
pub fn get_artifact_dir() -> PathBuf {
    match std::env::var("STUDENT_RISK_ARTIFACT_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME),
    }
}
