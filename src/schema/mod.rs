//! Schema Module - declared field semantics and the Feature Normalizer
//!
//! Canonicalizes heterogeneous raw encodings before any scoring runs.
//! Declared schema first; value-set sniffing only as a compatibility shim.

pub mod normalize;
pub mod types;


// Re-export common types
pub use normalize::{field_kind, normalize_dataset, normalize_record, FieldKind, SniffConfig};
pub use types::{num_field, FieldValue, RiskTier, StudentRecord, TIER_ORDER};
