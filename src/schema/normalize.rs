//! Feature Normalizer - canonical field encodings
//!
//! Raw exports encode the same boolean fields as "True"/"False" strings,
//! Yes/No answers, native booleans, or 0/1 integers depending on which tool
//! produced the file. Everything downstream works on a canonical 0/1 numeric
//! form, declared field-by-field in `FIELD_SCHEMA`.
//!
//! The historical value-set sniffing (treat any column whose values fit in
//! {True, False} or {0, 1} as boolean) survives as an opt-in shim for
//! undeclared columns. It is a heuristic, not a schema: a genuinely numeric
//! column that happens to hold only 0s and 1s will be reclassified.

use crate::dataset::Dataset;
use crate::features::layout::{
    ADMISSION_GRADE, AGE_AT_ENROLLMENT, DEBTOR, GENDER, INTERNATIONAL, MARITAL_STATUS,
    PASSING_RATIO, PREVIOUS_QUALIFICATION_GRADE, SCHOLARSHIP_HOLDER, TUITION_UP_TO_DATE,
    UNITS_APPROVED, UNITS_ENROLLED,
};

use super::types::{FieldValue, StudentRecord};

// ============================================================================
// DECLARED SCHEMA
// ============================================================================

/// Semantic kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Binary,
    Categorical,
}

/// Declared field semantics (field name → kind)
///
/// Authoritative for every field the core reads. Undeclared columns are left
/// untouched unless the sniffing shim is enabled.
pub const FIELD_SCHEMA: &[(&str, FieldKind)] = &[
    (AGE_AT_ENROLLMENT, FieldKind::Numeric),
    (GENDER, FieldKind::Binary),
    (MARITAL_STATUS, FieldKind::Categorical),
    (PREVIOUS_QUALIFICATION_GRADE, FieldKind::Numeric),
    (ADMISSION_GRADE, FieldKind::Numeric),
    (UNITS_ENROLLED, FieldKind::Numeric),
    (UNITS_APPROVED, FieldKind::Numeric),
    (PASSING_RATIO, FieldKind::Numeric),
    (SCHOLARSHIP_HOLDER, FieldKind::Binary),
    (DEBTOR, FieldKind::Binary),
    (TUITION_UP_TO_DATE, FieldKind::Binary),
    (INTERNATIONAL, FieldKind::Binary),
    ("Educational_special_needs", FieldKind::Binary),
    ("Displaced", FieldKind::Binary),
    ("Daytime_evening_attendance", FieldKind::Binary),
    ("Application_order", FieldKind::Numeric),
    ("Application_mode", FieldKind::Categorical),
    ("Curricular_units_1st_sem_grade", FieldKind::Numeric),
    ("Mothers_qualification", FieldKind::Categorical),
    ("Fathers_qualification", FieldKind::Categorical),
];

/// Look up the declared kind of a field
pub fn field_kind(name: &str) -> Option<FieldKind> {
    FIELD_SCHEMA
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, k)| *k)
}

// ============================================================================
// VALUE COERCION
// ============================================================================

/// Coerce one binary-semantic value to canonical 0/1
///
/// Unmapped spellings pass through unchanged; coercion never errors.
fn coerce_binary(name: &str, value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Flag(b) => Some(FieldValue::Num(if *b { 1.0 } else { 0.0 })),
        FieldValue::Text(s) => {
            let mapped = if name == GENDER {
                match s.as_str() {
                    "Male" => Some(1.0),
                    "Female" => Some(0.0),
                    _ => None,
                }
            } else {
                match s.as_str() {
                    "Yes" | "True" => Some(1.0),
                    "No" | "False" => Some(0.0),
                    _ => None,
                }
            };
            mapped.map(FieldValue::Num)
        }
        FieldValue::Num(_) => None, // already canonical
    }
}

/// Normalize every declared binary field of a record in place
pub fn normalize_record(record: &mut StudentRecord) {
    for (name, kind) in FIELD_SCHEMA {
        if *kind != FieldKind::Binary {
            continue;
        }
        if let Some(value) = record.get(*name) {
            if let Some(coerced) = coerce_binary(name, value) {
                record.insert((*name).to_string(), coerced);
            }
        }
    }
}

// ============================================================================
// DATASET NORMALIZATION
// ============================================================================

/// Compatibility shim controlling value-set sniffing of undeclared columns
#[derive(Debug, Clone, Copy)]
pub struct SniffConfig {
    pub enabled: bool,
}

impl Default for SniffConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Normalize a dataset: declared binary columns are coerced, then (when the
/// shim is enabled) undeclared text columns whose value set fits in
/// {"True", "False"} are coerced too.
pub fn normalize_dataset(data: &mut Dataset, sniff: SniffConfig) {
    let names: Vec<String> = data.column_names().map(str::to_string).collect();

    for name in &names {
        match field_kind(name) {
            Some(FieldKind::Binary) => {
                data.map_column(name, |v| coerce_binary(name, v));
            }
            Some(_) => {}
            None if sniff.enabled => {
                if column_is_true_false(data, name) {
                    log::debug!("sniffing shim coerced undeclared column '{}' to 0/1", name);
                    data.map_column(name, |v| match v {
                        FieldValue::Text(s) if s == "True" => Some(FieldValue::Num(1.0)),
                        FieldValue::Text(s) if s == "False" => Some(FieldValue::Num(0.0)),
                        FieldValue::Flag(b) => {
                            Some(FieldValue::Num(if *b { 1.0 } else { 0.0 }))
                        }
                        _ => None,
                    });
                }
            }
            None => {}
        }
    }
}

/// Value-set heuristic: non-missing values all "True"/"False" (or flags)
fn column_is_true_false(data: &Dataset, name: &str) -> bool {
    let Some(column) = data.column(name) else {
        return false;
    };
    let mut any = false;
    for value in column.values.iter().flatten() {
        match value {
            FieldValue::Text(s) if s == "True" || s == "False" => any = true,
            FieldValue::Flag(_) => any = true,
            _ => return false,
        }
    }
    any
}
