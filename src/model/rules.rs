//! Rule-based risk scorer - deterministic point accumulation.
//!
//! Independent of any trained model; always computed so the fusion stage can
//! fall back to it. Points accumulate 0-100 across four signals, then map to
//! a tier with fixed cutoffs.

use crate::features::layout::{
    ADMISSION_GRADE, PASSING_RATIO, SCHOLARSHIP_HOLDER, TUITION_UP_TO_DATE,
};
use crate::schema::{num_field, RiskTier, StudentRecord};

/// Score at or above which the rule tier is High
pub const HIGH_CUTOFF: u32 = 50;

/// Score at or below which the rule tier is Low
pub const LOW_CUTOFF: u32 = 25;

/// Rule-stage output
#[derive(Debug, Clone, Copy)]
pub struct RuleScore {
    pub score: u32,
    pub tier: RiskTier,
    pub confidence: f32,
}

/// Accumulate risk points from a normalized record.
///
/// Missing fields read as their riskiest default (ratio/grade 0, flags No),
/// matching the tolerant input contract.
pub fn rule_score(record: &StudentRecord) -> u32 {
    let passing_ratio = num_field(record, PASSING_RATIO).unwrap_or(0.0);
    let admission_grade = num_field(record, ADMISSION_GRADE).unwrap_or(0.0);
    let scholarship = num_field(record, SCHOLARSHIP_HOLDER).unwrap_or(0.0);
    let tuition_up_to_date = num_field(record, TUITION_UP_TO_DATE).unwrap_or(0.0);

    let mut score = 0u32;

    // Passing ratio impact (0-40 points)
    if passing_ratio < 0.5 {
        score += 40;
    } else if passing_ratio < 0.7 {
        score += 20;
    } else if passing_ratio < 0.85 {
        score += 10;
    }

    // Admission grade impact (0-20 points)
    if admission_grade < 120.0 {
        score += 20;
    } else if admission_grade < 140.0 {
        score += 10;
    }

    // Scholarship impact (0-15 points)
    if scholarship < 0.5 {
        score += 15;
    }

    // Tuition payment impact (0-15 points)
    if tuition_up_to_date < 0.5 {
        score += 15;
    }

    score
}

/// Map a rule score to a tier
pub fn rule_tier(score: u32) -> RiskTier {
    if score >= HIGH_CUTOFF {
        RiskTier::High
    } else if score <= LOW_CUTOFF {
        RiskTier::Low
    } else {
        RiskTier::Medium
    }
}

/// Deterministic confidence transform, clamped to [60, 95].
///
/// Scores near the High cutoff are the least certain.
pub fn rule_confidence(score: u32) -> f32 {
    let raw = 100.0 - 1.5 * (score as f32 - 50.0).abs();
    raw.clamp(60.0, 95.0)
}

/// Full rule-stage evaluation
pub fn evaluate(record: &StudentRecord) -> RuleScore {
    let score = rule_score(record);
    RuleScore {
        score,
        tier: rule_tier(score),
        confidence: rule_confidence(score),
    }
}
