//! Rule scorer and fusion-policy tests, including the documented scoring
//! scenarios and tier boundaries.

use crate::artifacts::{write_json, FsArtifactStore};
use crate::constants::SCALER_KEY;
use crate::features::layout::{
    ADMISSION_GRADE, SCHOLARSHIP_HOLDER, TUITION_UP_TO_DATE, UNITS_APPROVED, UNITS_ENROLLED,
};
use crate::features::{StandardScaler, FEATURE_COUNT};
use crate::model::classifier::ModelPrediction;
use crate::model::fusion::{fuse, ModelOutcome, PredictionSource, RiskClassifier};
use crate::model::rules::{self, rule_confidence, rule_score, rule_tier};
use crate::schema::{FieldValue, RiskTier, StudentRecord};

fn student(
    enrolled: f32,
    approved: f32,
    admission_grade: f32,
    scholarship: &str,
    tuition: &str,
) -> StudentRecord {
    let mut r = StudentRecord::new();
    r.insert(UNITS_ENROLLED.into(), FieldValue::Num(enrolled));
    r.insert(UNITS_APPROVED.into(), FieldValue::Num(approved));
    r.insert(ADMISSION_GRADE.into(), FieldValue::Num(admission_grade));
    r.insert(SCHOLARSHIP_HOLDER.into(), FieldValue::Text(scholarship.into()));
    r.insert(TUITION_UP_TO_DATE.into(), FieldValue::Text(tuition.into()));
    r
}

fn scored(record: &StudentRecord) -> u32 {
    let mut normalized = record.clone();
    crate::schema::normalize_record(&mut normalized);
    crate::features::derived::attach_derived(&mut normalized);
    rule_score(&normalized)
}

// ============================================================================
// RULE SCORER
// ============================================================================

#[test]
fn test_tier_boundaries() {
    assert_eq!(rule_tier(24), RiskTier::Low);
    assert_eq!(rule_tier(25), RiskTier::Low);
    assert_eq!(rule_tier(26), RiskTier::Medium);
    assert_eq!(rule_tier(49), RiskTier::Medium);
    assert_eq!(rule_tier(50), RiskTier::High);
    assert_eq!(rule_tier(51), RiskTier::High);
    assert_eq!(rule_tier(0), RiskTier::Low);
    assert_eq!(rule_tier(100), RiskTier::High);
}

#[test]
fn test_scenario_struggling_student_scores_60_high() {
    // ratio 0.667 → 20, grade 130 → 10, no scholarship → 15, tuition behind → 15
    let r = student(6.0, 4.0, 130.0, "No", "No");
    assert_eq!(scored(&r), 60);
    assert_eq!(rule_tier(60), RiskTier::High);
}

#[test]
fn test_scenario_strong_student_scores_10_low() {
    // ratio 0.833 → 10, grade 160 → 0, scholarship and tuition fine → 0
    let r = student(6.0, 5.0, 160.0, "Yes", "Yes");
    assert_eq!(scored(&r), 10);
    assert_eq!(rule_tier(10), RiskTier::Low);
}

#[test]
fn test_scenario_zero_enrollment_takes_full_ratio_points() {
    // passing_ratio is exactly 0 → the 40-point band, whatever else is set
    let r = student(0.0, 0.0, 160.0, "Yes", "Yes");
    assert_eq!(scored(&r), 40);
}

#[test]
fn test_score_monotone_in_passing_ratio() {
    // Ratios 0.9, 0.8, 0.6, 0.4: score must not decrease as the ratio falls
    let mut previous = 0u32;
    for approved in [9.0, 8.0, 6.0, 4.0] {
        let score = scored(&student(10.0, approved, 160.0, "Yes", "Yes"));
        assert!(score >= previous, "score dropped as ratio fell");
        previous = score;
    }
}

#[test]
fn test_score_monotone_in_grade_and_flags() {
    let base = scored(&student(10.0, 9.0, 160.0, "Yes", "Yes"));

    let worse_grade = scored(&student(10.0, 9.0, 130.0, "Yes", "Yes"));
    assert!(worse_grade >= base);
    let worst_grade = scored(&student(10.0, 9.0, 100.0, "Yes", "Yes"));
    assert!(worst_grade >= worse_grade);

    let no_scholarship = scored(&student(10.0, 9.0, 160.0, "No", "Yes"));
    assert_eq!(no_scholarship, base + 15);
    let tuition_behind = scored(&student(10.0, 9.0, 160.0, "Yes", "No"));
    assert_eq!(tuition_behind, base + 15);
}

#[test]
fn test_rule_confidence_clamped_to_60_95() {
    for score in 0..=100 {
        let confidence = rule_confidence(score);
        assert!((60.0..=95.0).contains(&confidence), "score {}", score);
    }
    // At the High cutoff the transform peaks and clamps to 95
    assert_eq!(rule_confidence(50), 95.0);
    // Far from the cutoff it floors at 60
    assert_eq!(rule_confidence(0), 60.0);
    assert_eq!(rule_confidence(100), 60.0);
}

// ============================================================================
// FUSION POLICY
// ============================================================================

fn rule_for(score: u32) -> rules::RuleScore {
    rules::RuleScore {
        score,
        tier: rule_tier(score),
        confidence: rule_confidence(score),
    }
}

#[test]
fn test_fusion_model_medium_defers_to_rules() {
    let prediction = ModelPrediction {
        tier: RiskTier::Medium,
        probabilities: Some(vec![0.1, 0.1, 0.8]),
    };
    let rule = rule_for(60); // rule says High

    let (tier, confidence, source) = fuse(&ModelOutcome::Ambiguous(prediction), &rule);
    assert_eq!(tier, RiskTier::High);
    assert_eq!(source, PredictionSource::Rules);
    // Calibrated model still prices the confidence
    assert!((confidence - 80.0).abs() < 1e-4);
}

#[test]
fn test_fusion_confident_model_wins() {
    let prediction = ModelPrediction {
        tier: RiskTier::High,
        probabilities: Some(vec![0.7, 0.2, 0.1]),
    };
    let rule = rule_for(10); // rule disagrees: Low

    let (tier, confidence, source) = fuse(&ModelOutcome::Predicted(prediction), &rule);
    assert_eq!(tier, RiskTier::High);
    assert_eq!(source, PredictionSource::Model);
    assert!((confidence - 70.0).abs() < 1e-4);
    assert!((0.0..=100.0).contains(&confidence));
}

#[test]
fn test_fusion_unavailable_and_failed_use_rule_confidence() {
    let rule = rule_for(60);

    let (tier, confidence, source) = fuse(&ModelOutcome::Unavailable, &rule);
    assert_eq!(tier, RiskTier::High);
    assert_eq!(source, PredictionSource::Rules);
    assert!((60.0..=95.0).contains(&confidence));

    let (tier, _, source) = fuse(&ModelOutcome::Failed("boom".into()), &rule);
    assert_eq!(tier, RiskTier::High);
    assert_eq!(source, PredictionSource::Rules);
}

#[test]
fn test_fusion_model_without_probabilities_uses_rule_confidence() {
    let prediction = ModelPrediction {
        tier: RiskTier::Low,
        probabilities: None,
    };
    let rule = rule_for(10);

    let (tier, confidence, source) = fuse(&ModelOutcome::Predicted(prediction), &rule);
    assert_eq!(tier, RiskTier::Low);
    assert_eq!(source, PredictionSource::Model);
    assert_eq!(confidence, rule_confidence(10));
}

// ============================================================================
// END-TO-END (no model artifacts: rule path)
// ============================================================================

#[test]
fn test_predict_without_model_uses_rules() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::new(dir.path());
    let classifier = RiskClassifier::new(&store);

    let prediction = classifier
        .predict_risk_level(&student(6.0, 4.0, 130.0, "No", "No"))
        .unwrap();

    assert_eq!(prediction.risk_level, RiskTier::High);
    assert_eq!(prediction.source, PredictionSource::Rules);
    assert!((60.0..=95.0).contains(&prediction.confidence));
    assert!(!prediction.key_factors.is_empty());
    assert_eq!(prediction.recommendations.len(), 5);
}

#[test]
fn test_predict_low_risk_student() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::new(dir.path());
    let classifier = RiskClassifier::new(&store);

    let prediction = classifier
        .predict_risk_level(&student(6.0, 5.0, 160.0, "Yes", "Yes"))
        .unwrap();

    assert_eq!(prediction.risk_level, RiskTier::Low);
    assert!(prediction
        .key_factors
        .contains(&"High admission grade (above 150)".to_string()));
}

#[test]
fn test_predict_empty_record_is_structured_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::new(dir.path());
    let classifier = RiskClassifier::new(&store);

    let result = classifier.predict_risk_level(&StudentRecord::new());
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Error making prediction"));
}

#[test]
fn test_predict_ignores_unusable_scaler_artifact() {
    // A persisted scaler of the wrong width must not break the rule path
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::new(dir.path());
    let bad = StandardScaler {
        means: vec![0.0; FEATURE_COUNT + 3],
        stds: vec![1.0; FEATURE_COUNT + 3],
    };
    write_json(&store, SCALER_KEY, &bad).unwrap();

    let classifier = RiskClassifier::new(&store);
    let prediction = classifier
        .predict_risk_level(&student(6.0, 4.0, 130.0, "No", "No"))
        .unwrap();
    // No model artifact exists, so the scaler is never even consulted
    assert_eq!(prediction.source, PredictionSource::Rules);
}
