//! Static, tier-keyed recommendation lists.
//!
//! Domain-authored content, not computed; five items per tier.

use crate::schema::RiskTier;

const HIGH_RECOMMENDATIONS: [&str; 5] = [
    "Schedule regular meetings with an academic advisor",
    "Seek tutoring for challenging courses",
    "Join study groups or peer support networks",
    "Explore financial aid or scholarship options",
    "Consider reducing course load if necessary",
];

const MEDIUM_RECOMMENDATIONS: [&str; 5] = [
    "Monitor academic progress closely",
    "Attend office hours for courses where improvement is needed",
    "Develop better time management and study skills",
    "Balance academic commitments with other activities",
    "Seek help proactively when challenges arise",
];

const LOW_RECOMMENDATIONS: [&str; 5] = [
    "Continue with current academic strategies",
    "Consider additional academic challenges like research projects",
    "Mentor other students who may benefit from your experience",
    "Plan ahead for advanced coursework and career opportunities",
    "Maintain good communication with instructors and advisors",
];

/// Recommendations for a predicted risk tier
pub fn get_recommendations(tier: RiskTier) -> Vec<String> {
    let items: &[&str; 5] = match tier {
        RiskTier::High => &HIGH_RECOMMENDATIONS,
        RiskTier::Medium => &MEDIUM_RECOMMENDATIONS,
        RiskTier::Low => &LOW_RECOMMENDATIONS,
    };
    items.iter().map(|s| s.to_string()).collect()
}
