//! Derived Feature Calculator
//!
//! Ratios and differences not present in the raw record. Pure functions of
//! the fields that are present; recomputed on every prediction request and
//! never cached across requests.

use crate::schema::{num_field, FieldValue, StudentRecord};

use super::layout::{
    ADMISSION_GRADE, GRADE_DIFFERENCE, PASSING_RATIO, PREVIOUS_QUALIFICATION_GRADE,
    UNITS_APPROVED, UNITS_ENROLLED,
};

/// First-semester passing ratio.
///
/// Exactly 0 when nothing was enrolled; never NaN.
pub fn passing_ratio(approved: f32, enrolled: f32) -> f32 {
    if enrolled == 0.0 {
        0.0
    } else {
        approved / enrolled
    }
}

/// Admission grade minus previous qualification grade.
///
/// Absent (not 0) unless both grades are present.
pub fn grade_difference(record: &StudentRecord) -> Option<f32> {
    let admission = num_field(record, ADMISSION_GRADE)?;
    let previous = num_field(record, PREVIOUS_QUALIFICATION_GRADE)?;
    Some(admission - previous)
}

/// Recompute derived features on a record, overwriting stale values.
pub fn attach_derived(record: &mut StudentRecord) {
    let enrolled = num_field(record, UNITS_ENROLLED);
    let approved = num_field(record, UNITS_APPROVED);
    if let (Some(enrolled), Some(approved)) = (enrolled, approved) {
        record.insert(
            PASSING_RATIO.to_string(),
            FieldValue::Num(passing_ratio(approved, enrolled)),
        );
    }

    if let Some(diff) = grade_difference(record) {
        record.insert(GRADE_DIFFERENCE.to_string(), FieldValue::Num(diff));
    }
}
