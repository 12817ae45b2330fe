//! Student Risk Core - dropout-risk scoring engine
//!
//! Takes student records from the dashboard collaborators, groups them with
//! density-based clustering, and classifies individuals into Low/Medium/High
//! risk tiers with explanations and recommendations. All model artifacts
//! are local files behind the artifact store; there is no network surface
//! and no UI here.

pub mod artifacts;
pub mod cluster;
pub mod constants;
pub mod dataset;
pub mod explain;
pub mod features;
pub mod model;
pub mod schema;

// Top-level surface for collaborators
pub use artifacts::{ArtifactStore, FsArtifactStore};
pub use cluster::{interpret_clusters, ClusterEngine, ClusterProfile, MeanShiftModel};
pub use dataset::Dataset;
pub use explain::get_recommendations;
pub use model::{PredictionError, RiskClassifier, RiskPrediction};
pub use schema::{FieldValue, RiskTier, StudentRecord};
