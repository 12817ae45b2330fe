//! Cluster Module - grouping students and interpreting the groups
//!
//! Mean-shift over standardized numeric features, with a persisted model
//! that is revalidated against the dataset's feature signature before reuse.

pub mod engine;
pub mod interpret;
pub mod meanshift;


// Re-export common types
pub use engine::{ClusterEngine, ClusterError, MeanShiftModel};
pub use interpret::{fill_missing_tier_profiles, interpret_clusters, ClusterProfile};
pub use meanshift::{estimate_bandwidth, mean_shift, MeanShiftFit};
