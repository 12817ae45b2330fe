//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the model feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! ## Why versioning matters:
//! - Persisted classifier/scaler compatibility
//! - Cluster-model staleness detection
//! - Cross-version artifact migrations

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FIELD NAMES
// ============================================================================

pub const AGE_AT_ENROLLMENT: &str = "Age_at_enrollment";
pub const GENDER: &str = "Gender";
pub const MARITAL_STATUS: &str = "Marital_status";
pub const PREVIOUS_QUALIFICATION_GRADE: &str = "Previous_qualification_grade";
pub const ADMISSION_GRADE: &str = "Admission_grade";
pub const UNITS_ENROLLED: &str = "Curricular_units_1st_sem_enrolled";
pub const UNITS_APPROVED: &str = "Curricular_units_1st_sem_approved";
pub const PASSING_RATIO: &str = "Passing_ratio_1st_sem";
pub const SCHOLARSHIP_HOLDER: &str = "Scholarship_holder";
pub const DEBTOR: &str = "Debtor";
pub const TUITION_UP_TO_DATE: &str = "Tuition_fees_up_to_date";
pub const INTERNATIONAL: &str = "International";

/// Derived: admission grade minus previous qualification grade
pub const GRADE_DIFFERENCE: &str = "Grade_difference";

/// Labeled-dataset columns consumed by the cluster interpreter
pub const RISK_CATEGORY: &str = "Risk_Category";
pub const CLUSTER: &str = "Cluster";

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Model feature names in exact vector order
/// This is the SINGLE SOURCE OF TRUTH for classifier input layout
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Demographic (0-2) ===
    AGE_AT_ENROLLMENT,            // 0
    GENDER,                       // 1: Male=1, Female=0
    MARITAL_STATUS,               // 2: categorical code 1-6

    // === Academic history (3-4) ===
    PREVIOUS_QUALIFICATION_GRADE, // 3
    ADMISSION_GRADE,              // 4

    // === First semester (5-7) ===
    UNITS_ENROLLED,               // 5
    UNITS_APPROVED,               // 6
    PASSING_RATIO,                // 7: derived, approved/enrolled

    // === Socio-economic (8-11) ===
    SCHOLARSHIP_HOLDER,           // 8: Yes=1, No=0
    DEBTOR,                       // 9
    TUITION_UP_TO_DATE,           // 10
    INTERNATIONAL,                // 11
];

/// Total number of model features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 12;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 hash over an ordered feature-name list
///
/// Shared by the classifier layout and persisted cluster models to detect
/// feature-set drift before reuse.
pub fn names_hash(names: &[impl AsRef<str>]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

static LAYOUT_HASH: Lazy<u32> = Lazy::new(|| names_hash(FEATURE_LAYOUT));

/// Hash of the current classifier feature layout (cached)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// FEATURE SIGNATURE
// ============================================================================

/// Versioned signature of a feature set, stored alongside every persisted
/// model so stale artifacts are detected instead of silently reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSignature {
    pub version: u8,
    pub hash: u32,
}

impl FeatureSignature {
    /// Signature of the current classifier layout
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
        }
    }

    /// Signature of an arbitrary ordered feature list
    pub fn of(names: &[impl AsRef<str>]) -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: names_hash(names),
        }
    }
}

/// Signature mismatch details
#[derive(Debug, Clone)]
pub struct SignatureMismatch {
    pub expected: FeatureSignature,
    pub actual: FeatureSignature,
}

impl std::fmt::Display for SignatureMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature signature mismatch: expected v{} ({:x}), got v{} ({:x})",
            self.expected.version, self.expected.hash, self.actual.version, self.actual.hash
        )
    }
}

impl std::error::Error for SignatureMismatch {}

/// Validate a stored signature against an expected one
pub fn validate_signature(
    expected: FeatureSignature,
    actual: FeatureSignature,
) -> Result<(), SignatureMismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(SignatureMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_count_matches() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(layout_hash(), names_hash(FEATURE_LAYOUT));
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        let mut reversed: Vec<&str> = FEATURE_LAYOUT.to_vec();
        reversed.reverse();
        assert_ne!(names_hash(&reversed), layout_hash());
    }

    #[test]
    fn test_signature_validation() {
        let current = FeatureSignature::current();
        assert!(validate_signature(current, current).is_ok());

        let stale = FeatureSignature {
            version: FEATURE_VERSION,
            hash: !current.hash,
        };
        let err = validate_signature(current, stale).unwrap_err();
        assert_eq!(err.actual.hash, !current.hash);
    }
}
