use crate::explain::{get_recommendations, key_factors};
use crate::features::layout::{
    ADMISSION_GRADE, PASSING_RATIO, SCHOLARSHIP_HOLDER, TUITION_UP_TO_DATE, UNITS_APPROVED,
};
use crate::schema::{FieldValue, RiskTier, StudentRecord};

fn record(fields: &[(&str, f32)]) -> StudentRecord {
    fields
        .iter()
        .map(|(name, v)| (name.to_string(), FieldValue::Num(*v)))
        .collect()
}

#[test]
fn test_high_tier_factors() {
    let r = record(&[
        (PASSING_RATIO, 0.5),
        (ADMISSION_GRADE, 110.0),
        (SCHOLARSHIP_HOLDER, 0.0),
        (TUITION_UP_TO_DATE, 0.0),
        (UNITS_APPROVED, 2.0),
    ]);
    let factors = key_factors(&r, RiskTier::High);

    assert_eq!(factors.len(), 5);
    assert!(factors.contains(&"Low passing ratio (below 0.7)".to_string()));
    assert!(factors.contains(&"Tuition fees not up to date".to_string()));
    assert!(factors.contains(&"Few approved units (below 4)".to_string()));
}

#[test]
fn test_high_tier_thresholds_are_strict() {
    // Exactly at the gates: nothing qualifies, generic fallback kicks in
    let r = record(&[
        (PASSING_RATIO, 0.7),
        (ADMISSION_GRADE, 130.0),
        (SCHOLARSHIP_HOLDER, 1.0),
        (TUITION_UP_TO_DATE, 1.0),
        (UNITS_APPROVED, 4.0),
    ]);
    let factors = key_factors(&r, RiskTier::High);
    assert_eq!(factors, vec!["Mixed performance indicators".to_string()]);
}

#[test]
fn test_low_tier_factors() {
    let r = record(&[
        (PASSING_RATIO, 0.9),
        (ADMISSION_GRADE, 160.0),
        (SCHOLARSHIP_HOLDER, 1.0),
        (TUITION_UP_TO_DATE, 1.0),
        (UNITS_APPROVED, 6.0),
    ]);
    let factors = key_factors(&r, RiskTier::Low);

    assert_eq!(factors.len(), 5);
    assert!(factors.contains(&"High passing ratio (above 0.8)".to_string()));
    assert!(factors.contains(&"Scholarship holder".to_string()));
}

#[test]
fn test_medium_prefers_ratio_direction() {
    let low_side = record(&[(PASSING_RATIO, 0.6), (ADMISSION_GRADE, 140.0)]);
    assert_eq!(
        key_factors(&low_side, RiskTier::Medium),
        vec!["Low passing ratio (below 0.7)".to_string()]
    );

    let high_side = record(&[(PASSING_RATIO, 0.85), (ADMISSION_GRADE, 140.0)]);
    assert_eq!(
        key_factors(&high_side, RiskTier::Medium),
        vec!["High passing ratio (above 0.8)".to_string()]
    );
}

#[test]
fn test_medium_grade_band_fallback() {
    // Ratio in the quiet zone: falls through to the admission-grade band
    let r = record(&[(PASSING_RATIO, 0.75), (ADMISSION_GRADE, 140.0)]);
    assert_eq!(
        key_factors(&r, RiskTier::Medium),
        vec!["Average admission grade (between 130-150)".to_string()]
    );
}

#[test]
fn test_factors_never_empty() {
    let empty = StudentRecord::new();
    for tier in [RiskTier::High, RiskTier::Medium, RiskTier::Low] {
        assert!(!key_factors(&empty, tier).is_empty());
    }
}

#[test]
fn test_recommendations_are_tier_specific_five_items() {
    for tier in [RiskTier::High, RiskTier::Medium, RiskTier::Low] {
        assert_eq!(get_recommendations(tier).len(), 5);
    }
    assert_ne!(
        get_recommendations(RiskTier::High),
        get_recommendations(RiskTier::Low)
    );
    assert_eq!(
        get_recommendations(RiskTier::High)[0],
        "Schedule regular meetings with an academic advisor"
    );
}
