//! Key-factor selection for a final risk tier.
//!
//! Each factor sentence is gated by its own literal threshold on the
//! normalized input. The Medium path checks both directions and steps down
//! to coarser statements so the list is never empty.

use crate::features::layout::{
    ADMISSION_GRADE, PASSING_RATIO, SCHOLARSHIP_HOLDER, TUITION_UP_TO_DATE, UNITS_APPROVED,
};
use crate::schema::{num_field, RiskTier, StudentRecord};

// High-risk indicator phrasing
const LOW_PASSING_RATIO: &str = "Low passing ratio (below 0.7)";
const LOW_ADMISSION_GRADE: &str = "Low admission grade (below 130)";
const NOT_SCHOLARSHIP: &str = "Not a scholarship holder";
const TUITION_NOT_UP_TO_DATE: &str = "Tuition fees not up to date";
const LOW_UNITS_APPROVED: &str = "Few approved units (below 4)";

// Low-risk indicator phrasing
const HIGH_PASSING_RATIO: &str = "High passing ratio (above 0.8)";
const HIGH_ADMISSION_GRADE: &str = "High admission grade (above 150)";
const SCHOLARSHIP: &str = "Scholarship holder";
const TUITION_UP_TO_DATE_FACTOR: &str = "Tuition fees up to date";
const HIGH_UNITS_APPROVED: &str = "Many approved units (above 5)";

// Medium fallbacks
const AVERAGE_ADMISSION_GRADE: &str = "Average admission grade (between 130-150)";
const MIXED_INDICATORS: &str = "Mixed performance indicators";

/// Select the contributing factors for a classified record.
///
/// Only fields present on the record are checked; the result is never empty.
pub fn key_factors(record: &StudentRecord, tier: RiskTier) -> Vec<String> {
    let mut factors: Vec<&str> = Vec::new();

    let ratio = num_field(record, PASSING_RATIO);
    let grade = num_field(record, ADMISSION_GRADE);
    let scholarship = num_field(record, SCHOLARSHIP_HOLDER);
    let tuition = num_field(record, TUITION_UP_TO_DATE);
    let approved = num_field(record, UNITS_APPROVED);

    match tier {
        RiskTier::High => {
            if matches!(ratio, Some(r) if r < 0.7) {
                factors.push(LOW_PASSING_RATIO);
            }
            if matches!(grade, Some(g) if g < 130.0) {
                factors.push(LOW_ADMISSION_GRADE);
            }
            if matches!(scholarship, Some(s) if s < 0.5) {
                factors.push(NOT_SCHOLARSHIP);
            }
            if matches!(tuition, Some(t) if t < 0.5) {
                factors.push(TUITION_NOT_UP_TO_DATE);
            }
            if matches!(approved, Some(a) if a < 4.0) {
                factors.push(LOW_UNITS_APPROVED);
            }
        }
        RiskTier::Low => {
            if matches!(ratio, Some(r) if r > 0.8) {
                factors.push(HIGH_PASSING_RATIO);
            }
            if matches!(grade, Some(g) if g > 150.0) {
                factors.push(HIGH_ADMISSION_GRADE);
            }
            if matches!(scholarship, Some(s) if s >= 0.5) {
                factors.push(SCHOLARSHIP);
            }
            if matches!(tuition, Some(t) if t >= 0.5) {
                factors.push(TUITION_UP_TO_DATE_FACTOR);
            }
            if matches!(approved, Some(a) if a > 5.0) {
                factors.push(HIGH_UNITS_APPROVED);
            }
        }
        RiskTier::Medium => {
            // Both directions qualify for a mixed profile
            if matches!(ratio, Some(r) if r < 0.7) {
                factors.push(LOW_PASSING_RATIO);
            } else if matches!(ratio, Some(r) if r > 0.8) {
                factors.push(HIGH_PASSING_RATIO);
            }

            if factors.is_empty() {
                if let Some(g) = grade {
                    if g < 130.0 {
                        factors.push(LOW_ADMISSION_GRADE);
                    } else if g > 150.0 {
                        factors.push(HIGH_ADMISSION_GRADE);
                    } else {
                        factors.push(AVERAGE_ADMISSION_GRADE);
                    }
                }
            }

            if factors.is_empty() {
                factors.push(MIXED_INDICATORS);
            }
        }
    }

    // High/Low can come up empty when the gated fields are absent
    if factors.is_empty() {
        factors.push(MIXED_INDICATORS);
    }

    factors.into_iter().map(str::to_string).collect()
}
