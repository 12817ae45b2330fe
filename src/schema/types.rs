//! Core value types shared across the scoring pipeline.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw field value as supplied by the data-loading collaborator.
///
/// Variant order matters for untagged deserialization: booleans must be
/// tried before numbers so JSON `true`/`false` stay `Flag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Num(f32),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value. Flags read as 1/0; text never parses.
    pub fn as_num(&self) -> Option<f32> {
        match self {
            FieldValue::Num(v) => Some(*v),
            FieldValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Num(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Flag(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// One student record: named fields, arbitrary subset of the schema.
pub type StudentRecord = HashMap<String, FieldValue>;

/// Numeric view of a record field.
pub fn num_field(record: &StudentRecord, name: &str) -> Option<f32> {
    record.get(name).and_then(FieldValue::as_num)
}

/// Dropout-risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

/// Deterministic tier iteration order for cross-tabulation tie-breaks
/// (alphabetical, matching the labeled dataset's column order).
pub const TIER_ORDER: [RiskTier; 3] = [RiskTier::High, RiskTier::Low, RiskTier::Medium];

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "High",
            RiskTier::Medium => "Medium",
            RiskTier::Low => "Low",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "High" => Some(RiskTier::High),
            "Medium" => Some(RiskTier::Medium),
            "Low" => Some(RiskTier::Low),
            _ => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
