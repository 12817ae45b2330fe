//! Features Module - model feature layout, derivation and scaling
//!
//! Single place where the classifier input schema lives. Adding or
//! reordering a feature goes through `layout.rs` and bumps the version.

pub mod derived;
pub mod layout;
pub mod scaler;
pub mod vector;


// Re-export common types
pub use layout::{layout_hash, FeatureSignature, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use scaler::StandardScaler;
pub use vector::FeatureVector;
