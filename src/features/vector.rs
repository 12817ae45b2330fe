//! Feature Vector - classifier input contract
//!
//! Versioned vector with layout metadata, built from a normalized record.
//! Never hand raw `Vec<f32>` to the model; the version and hash travel with
//! the values so artifact mismatches are detectable.

use serde::{Deserialize, Serialize};

use crate::schema::{num_field, StudentRecord};

use super::layout::{layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

/// Versioned feature vector in `FEATURE_LAYOUT` order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    pub version: u8,
    pub layout_hash: u32,
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Build from a normalized record.
    ///
    /// Model features the record does not carry are filled with 0; missing
    /// input is never fatal at this stage.
    pub fn from_record(record: &StudentRecord) -> Self {
        let mut values = [0.0f32; FEATURE_COUNT];
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            values[i] = num_field(record, name).unwrap_or(0.0);
        }
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}
