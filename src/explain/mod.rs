//! Explain Module - human-readable factors and recommendations
//!
//! Turns a final tier plus the normalized input into the sentences the
//! dashboard renders. No scoring logic lives here.

pub mod engine;
pub mod recommend;

#[cfg(test)]
mod tests;

// Re-export common types
pub use engine::key_factors;
pub use recommend::get_recommendations;
