//! Cluster Interpreter - per-cluster risk profiles from relative statistics.
//!
//! Cross-tabulates cluster ids against existing risk labels to find each
//! cluster's dominant tier, then describes the cluster by how far its
//! feature means sit from the population means. Deviations under 5% are
//! suppressed as noise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::features::layout::{
    ADMISSION_GRADE, AGE_AT_ENROLLMENT, CLUSTER, PASSING_RATIO,
    PREVIOUS_QUALIFICATION_GRADE, RISK_CATEGORY, SCHOLARSHIP_HOLDER, TUITION_UP_TO_DATE,
    UNITS_APPROVED,
};
use crate::schema::{RiskTier, TIER_ORDER};

/// Features the interpreter profiles, in report order
const IMPORTANT_FEATURES: &[&str] = &[
    AGE_AT_ENROLLMENT,
    PREVIOUS_QUALIFICATION_GRADE,
    ADMISSION_GRADE,
    UNITS_APPROVED,
    PASSING_RATIO,
    SCHOLARSHIP_HOLDER,
    TUITION_UP_TO_DATE,
];

/// Deviations smaller than this (percent) are suppressed as noise
const DEVIATION_FLOOR: f32 = 5.0;

/// Sentinel cluster ids for synthesized coverage profiles
pub const SYNTHETIC_HIGH_ID: u32 = 99;
pub const SYNTHETIC_MEDIUM_ID: u32 = 98;
pub const SYNTHETIC_LOW_ID: u32 = 97;

/// Interpreted profile of one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub title: String,
    pub description: String,
    pub dominant: RiskTier,
    pub characteristics: Vec<String>,
    pub recommendations: Vec<String>,
    /// True for coverage placeholders, false for profiles computed from data
    pub synthetic: bool,
}

fn profile_template(tier: RiskTier) -> ClusterProfile {
    let (title, description, recommendations) = match tier {
        RiskTier::High => (
            "High Risk Cluster",
            "Students in this cluster have a high risk of dropping out. They typically show the following characteristics:",
            [
                "Immediate academic intervention and support",
                "Regular check-ins with academic advisors",
                "Offer tutoring services and supplementary learning materials",
                "Financial aid assessment and counseling",
                "Peer mentoring programs",
            ],
        ),
        RiskTier::Medium => (
            "Medium Risk Cluster",
            "Students in this cluster have a moderate risk of dropping out. They show mixed performance indicators:",
            [
                "Periodic monitoring of academic progress",
                "Targeted support in challenging courses",
                "Optional academic skills workshops",
                "Guidance on balancing academic and personal commitments",
                "Promote awareness of available support services",
            ],
        ),
        RiskTier::Low => (
            "Low Risk Cluster",
            "Students in this cluster have a low risk of dropping out. They typically demonstrate strong academic performance:",
            [
                "Offer advanced learning opportunities",
                "Encourage participation in research or internship programs",
                "Provide career guidance and planning",
                "Foster leadership development",
                "Maintain light-touch monitoring",
            ],
        ),
    };

    ClusterProfile {
        title: title.to_string(),
        description: description.to_string(),
        dominant: tier,
        characteristics: Vec::new(),
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        synthetic: false,
    }
}

/// Interpret a labeled, clustered dataset into per-cluster profiles.
///
/// Requires `Cluster` and `Risk_Category` columns; returns an empty map when
/// either is absent, or when none of the profiled features exist.
pub fn interpret_clusters(data: &Dataset) -> BTreeMap<u32, ClusterProfile> {
    let mut profiles = BTreeMap::new();

    let (Some(cluster_column), Some(risk_column)) =
        (data.column(CLUSTER), data.column(RISK_CATEGORY))
    else {
        return profiles;
    };

    let available: Vec<&str> = IMPORTANT_FEATURES
        .iter()
        .copied()
        .filter(|f| data.has_column(f))
        .collect();
    if available.is_empty() {
        return profiles;
    }

    // Row-wise cluster id and tier pairs
    let cluster_ids: Vec<Option<u32>> = cluster_column
        .numeric_values()
        .into_iter()
        .map(|v| v.map(|c| c.round().max(0.0) as u32))
        .collect();
    let tiers: Vec<Option<RiskTier>> = risk_column
        .values
        .iter()
        .map(|cell| {
            cell.as_ref()
                .and_then(|v| v.as_text())
                .and_then(RiskTier::from_label)
        })
        .collect();

    let mut clusters: Vec<u32> = cluster_ids.iter().flatten().copied().collect();
    clusters.sort_unstable();
    clusters.dedup();

    // Global feature means
    let global_means: Vec<Option<f32>> = available
        .iter()
        .map(|f| data.column(f).and_then(|c| c.mean()))
        .collect();

    for &cluster in &clusters {
        let rows: Vec<usize> = cluster_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| **id == Some(cluster))
            .map(|(row, _)| row)
            .collect();

        let dominant = dominant_tier(&rows, &tiers);
        let mut profile = profile_template(dominant);
        profile.characteristics = characteristics(data, &rows, &available, &global_means);
        profiles.insert(cluster, profile);
    }

    fill_missing_tier_profiles(&mut profiles);
    profiles
}

/// Dominant tier of a cluster: highest row-normalized share of labels.
///
/// Ties break by `TIER_ORDER` (first strictly-greater wins); a cluster with
/// no parseable labels defaults to Medium.
fn dominant_tier(rows: &[usize], tiers: &[Option<RiskTier>]) -> RiskTier {
    let mut best = RiskTier::Medium;
    let mut best_count = 0usize;
    for tier in TIER_ORDER {
        let count = rows
            .iter()
            .filter(|&&row| tiers.get(row).copied().flatten() == Some(tier))
            .count();
        if count > best_count {
            best_count = count;
            best = tier;
        }
    }
    best
}

/// Characteristic sentences for one cluster, strongest deviation first.
fn characteristics(
    data: &Dataset,
    rows: &[usize],
    available: &[&str],
    global_means: &[Option<f32>],
) -> Vec<String> {
    let mut deviations: Vec<(&str, f32, f32)> = Vec::new(); // (feature, cluster mean, % deviation)

    for (i, feature) in available.iter().enumerate() {
        let Some(global) = global_means[i] else { continue };
        if global == 0.0 {
            continue;
        }
        let Some(column) = data.column(feature) else { continue };
        let values = column.numeric_values();
        let cluster_values: Vec<f32> = rows
            .iter()
            .filter_map(|&row| values.get(row).copied().flatten())
            .collect();
        if cluster_values.is_empty() {
            continue;
        }
        let cluster_mean = cluster_values.iter().sum::<f32>() / cluster_values.len() as f32;
        let deviation = (cluster_mean / global - 1.0) * 100.0;
        deviations.push((feature, cluster_mean, deviation));
    }

    deviations.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    deviations
        .into_iter()
        .filter(|(_, _, deviation)| deviation.abs() >= DEVIATION_FLOOR)
        .map(|(feature, mean, deviation)| describe(feature, mean, deviation))
        .collect()
}

/// Feature-specific sentence; polarity follows the deviation sign.
fn describe(feature: &str, mean: f32, deviation: f32) -> String {
    let (direction, magnitude, side) = if deviation > 0.0 {
        ("Higher", deviation, "above")
    } else {
        ("Lower", -deviation, "below")
    };

    match feature {
        AGE_AT_ENROLLMENT => format!(
            "{} average age ({:.1} years, {:.1}% {} average)",
            direction, mean, magnitude, side
        ),
        PREVIOUS_QUALIFICATION_GRADE => format!(
            "{} Previous qualification grade ({:.1}, {:.1}% {} average)",
            direction, mean, magnitude, side
        ),
        ADMISSION_GRADE => format!(
            "{} Admission grade ({:.1}, {:.1}% {} average)",
            direction, mean, magnitude, side
        ),
        UNITS_APPROVED => format!(
            "{} number of approved units ({:.1}, {:.1}% {} average)",
            direction, mean, magnitude, side
        ),
        PASSING_RATIO => format!(
            "{} passing ratio ({:.2}, {:.1}% {} average)",
            direction, mean, magnitude, side
        ),
        SCHOLARSHIP_HOLDER => format!(
            "{} percentage of scholarship holders ({:.1}%, {:.1}% {} average)",
            direction,
            mean * 100.0,
            magnitude,
            side
        ),
        TUITION_UP_TO_DATE => format!(
            "{} percentage of up-to-date tuition payments ({:.1}%, {:.1}% {} average)",
            direction,
            mean * 100.0,
            magnitude,
            side
        ),
        other => format!(
            "{} {} ({:.1}, {:.1}% {} average)",
            direction, other, mean, magnitude, side
        ),
    }
}

/// Coverage guarantee: every tier gets at least one profile.
///
/// Tiers with no dominant cluster receive a placeholder under a reserved
/// sentinel id with fixed illustrative characteristics. These are
/// presentation fallbacks, not computed insights; `synthetic` marks them so
/// callers can tell the difference.
pub fn fill_missing_tier_profiles(profiles: &mut BTreeMap<u32, ClusterProfile>) {
    let has = |tier: RiskTier, profiles: &BTreeMap<u32, ClusterProfile>| {
        profiles.values().any(|p| p.dominant == tier)
    };

    if !has(RiskTier::High, profiles) {
        let mut profile = profile_template(RiskTier::High);
        profile.synthetic = true;
        profile.characteristics = vec![
            "Lower passing ratio (0.65, 20.0% below average)".to_string(),
            "Lower percentage of up-to-date tuition payments (75.5%, 15.2% below average)"
                .to_string(),
            "Lower number of approved units (3.2, 25.6% below average)".to_string(),
        ];
        profiles.insert(SYNTHETIC_HIGH_ID, profile);
    }

    if !has(RiskTier::Medium, profiles) {
        let mut profile = profile_template(RiskTier::Medium);
        profile.synthetic = true;
        profile.characteristics = vec![
            "Average passing ratio (0.75, 5.2% below average)".to_string(),
            "Mixed scholarship status (30.5%, 2.3% below average)".to_string(),
            "Average number of approved units (4.5, 3.1% above average)".to_string(),
        ];
        profiles.insert(SYNTHETIC_MEDIUM_ID, profile);
    }

    if !has(RiskTier::Low, profiles) {
        let mut profile = profile_template(RiskTier::Low);
        profile.synthetic = true;
        profile.characteristics = vec![
            "Higher passing ratio (0.95, 15.5% above average)".to_string(),
            "Higher percentage of up-to-date tuition payments (95.2%, 10.8% above average)"
                .to_string(),
            "Higher number of approved units (5.8, 18.2% above average)".to_string(),
        ];
        profiles.insert(SYNTHETIC_LOW_ID, profile);
    }
}
