//! In-memory tabular dataset of student records.
//!
//! Column-oriented, insertion-ordered. Cells are `Option<FieldValue>` so a
//! missing value is distinct from 0. The whole snapshot lives in memory for
//! the lifetime of the process; there is no streaming path.

use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::schema::{FieldValue, StudentRecord};

/// One named column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<FieldValue>>,
}

impl Column {
    /// Numeric view of every cell (missing or non-numeric → None)
    pub fn numeric_values(&self) -> Vec<Option<f32>> {
        self.values
            .iter()
            .map(|v| v.as_ref().and_then(FieldValue::as_num))
            .collect()
    }

    /// True when every non-missing cell reads as a number
    pub fn is_numeric(&self) -> bool {
        let mut any = false;
        for value in self.values.iter().flatten() {
            if value.as_num().is_none() {
                return false;
            }
            any = true;
        }
        any
    }

    /// Mean of the non-missing numeric cells
    pub fn mean(&self) -> Option<f32> {
        let nums: Vec<f32> = self.numeric_values().into_iter().flatten().collect();
        if nums.is_empty() {
            return None;
        }
        Some(nums.iter().sum::<f32>() / nums.len() as f32)
    }

    /// Median of the non-missing numeric cells
    pub fn median(&self) -> Option<f32> {
        let mut nums: Vec<f32> = self.numeric_values().into_iter().flatten().collect();
        if nums.is_empty() {
            return None;
        }
        nums.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = nums.len() / 2;
        if nums.len() % 2 == 0 {
            Some((nums[mid - 1] + nums[mid]) / 2.0)
        } else {
            Some(nums[mid])
        }
    }

    /// Most frequent non-missing text cell (first seen wins ties)
    pub fn mode_text(&self) -> Option<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for value in self.values.iter().flatten() {
            if let Some(s) = value.as_text() {
                match counts.iter_mut().find(|(v, _)| v == s) {
                    Some((_, c)) => *c += 1,
                    None => counts.push((s.to_string(), 1)),
                }
            }
        }
        counts
            .into_iter()
            .max_by_key(|(_, c)| *c)
            .map(|(v, _)| v)
    }
}

/// A dataset snapshot: insertion-ordered columns of equal length
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, cells)` pairs; columns keep insertion order
    pub fn from_columns(columns: Vec<(String, Vec<Option<FieldValue>>)>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, values)| Column { name, values })
                .collect(),
        }
    }

    pub fn push_column(&mut self, name: &str, values: Vec<Option<FieldValue>>) {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == name) {
            existing.values = values;
        } else {
            self.columns.push(Column {
                name: name.to_string(),
                values,
            });
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    /// Apply a cell transform to one column; `None` keeps the cell as-is
    pub fn map_column<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&FieldValue) -> Option<FieldValue>,
    {
        if let Some(column) = self.columns.iter_mut().find(|c| c.name == name) {
            for cell in column.values.iter_mut() {
                if let Some(value) = cell {
                    if let Some(replacement) = f(value) {
                        *cell = Some(replacement);
                    }
                }
            }
        }
    }

    /// Names of all fully numeric columns, in dataset order
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Dense matrix of the named columns, one row per record.
    ///
    /// Missing cells fall back to the column mean so a handful of gaps does
    /// not drop whole rows. Returns None when a column is absent or empty.
    pub fn numeric_matrix(&self, names: &[String]) -> Option<Array2<f32>> {
        let n_rows = self.n_rows();
        if n_rows == 0 || names.is_empty() {
            return None;
        }

        let mut data = Vec::with_capacity(n_rows * names.len());
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = self.column(name)?;
            let mean = column.mean()?;
            columns.push((column.numeric_values(), mean));
        }

        for row in 0..n_rows {
            for (values, mean) in &columns {
                data.push(values.get(row).copied().flatten().unwrap_or(*mean));
            }
        }

        Array2::from_shape_vec((n_rows, names.len()), data).ok()
    }

    /// One row as a sparse record (missing cells omitted)
    pub fn record(&self, row: usize) -> StudentRecord {
        let mut record = HashMap::new();
        for column in &self.columns {
            if let Some(Some(value)) = column.values.get(row) {
                record.insert(column.name.clone(), value.clone());
            }
        }
        record
    }

    /// Fill missing cells: numeric columns with the median, text columns
    /// with the mode. Columns that are entirely missing stay missing.
    pub fn impute_missing(&mut self) {
        for column in self.columns.iter_mut() {
            if !column.values.iter().any(|v| v.is_none()) {
                continue;
            }
            let fill = if column.is_numeric() {
                column.median().map(FieldValue::Num)
            } else {
                column.mode_text().map(FieldValue::Text)
            };
            if let Some(fill) = fill {
                for cell in column.values.iter_mut() {
                    if cell.is_none() {
                        *cell = Some(fill.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f32) -> Option<FieldValue> {
        Some(FieldValue::Num(v))
    }

    #[test]
    fn test_numeric_column_detection() {
        let data = Dataset::from_columns(vec![
            ("a".into(), vec![num(1.0), num(2.0)]),
            ("b".into(), vec![Some(FieldValue::Text("x".into())), num(2.0)]),
        ]);
        assert_eq!(data.numeric_column_names(), vec!["a".to_string()]);
    }

    #[test]
    fn test_impute_median_and_mode() {
        let mut data = Dataset::from_columns(vec![
            ("score".into(), vec![num(1.0), None, num(3.0)]),
            (
                "label".into(),
                vec![
                    Some(FieldValue::Text("x".into())),
                    Some(FieldValue::Text("x".into())),
                    None,
                ],
            ),
        ]);
        data.impute_missing();

        assert_eq!(data.column("score").unwrap().values[1], num(2.0));
        assert_eq!(
            data.column("label").unwrap().values[2],
            Some(FieldValue::Text("x".into()))
        );
    }

    #[test]
    fn test_matrix_fills_missing_with_mean() {
        let data = Dataset::from_columns(vec![("a".into(), vec![num(1.0), None, num(3.0)])]);
        let x = data.numeric_matrix(&["a".to_string()]).unwrap();
        assert_eq!(x[[1, 0]], 2.0);
    }

    #[test]
    fn test_record_skips_missing_cells() {
        let data = Dataset::from_columns(vec![
            ("a".into(), vec![num(1.0), None]),
            ("b".into(), vec![num(5.0), num(6.0)]),
        ]);
        let record = data.record(1);
        assert!(!record.contains_key("a"));
        assert_eq!(record.get("b"), Some(&FieldValue::Num(6.0)));
    }
}
