//! Dataset and label containers handed to the dispatcher

use crate::error::{Result, VizError};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// An immutable `samples x attributes` matrix with attribute names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    values: Array2<f64>,
    attribute_names: Vec<String>,
}

impl Dataset {
    /// Wrap a matrix, naming attributes `Attribute_1 .. Attribute_n`.
    pub fn new(values: Array2<f64>) -> Result<Self> {
        let names = (1..=values.ncols())
            .map(|i| format!("Attribute_{}", i))
            .collect();
        Self::with_attribute_names(values, names)
    }

    /// Wrap a matrix with explicit attribute names.
    pub fn with_attribute_names(values: Array2<f64>, attribute_names: Vec<String>) -> Result<Self> {
        let (samples, attributes) = values.dim();
        if samples == 0 || attributes == 0 {
            return Err(VizError::DataError(format!(
                "dataset must have at least one sample and one attribute, got {}x{}",
                samples, attributes
            )));
        }
        if attribute_names.len() != attributes {
            return Err(VizError::ShapeError {
                expected: format!("{} attribute names", attributes),
                actual: format!("{} attribute names", attribute_names.len()),
            });
        }
        if let Some(((row, col), value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(VizError::DataError(format!(
                "non-finite value {} at row {}, column {}",
                value, row, col
            )));
        }
        Ok(Self {
            values,
            attribute_names,
        })
    }

    /// Build from row vectors; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != n_cols) {
            return Err(VizError::ShapeError {
                expected: format!("{} columns per row", n_cols),
                actual: format!("a row with {} columns", bad.len()),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(Array2::from_shape_vec((n_rows, n_cols), flat)?)
    }

    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_attributes(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Per-attribute `(min, max)`
    pub fn column_ranges(&self) -> Vec<(f64, f64)> {
        self.values
            .axis_iter(Axis(1))
            .map(|col| {
                col.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
            })
            .collect()
    }
}

/// One label per sample, either class names or numeric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum Labels {
    Categorical(Vec<String>),
    Numeric(Vec<f64>),
}

/// Samples grouped by distinct label value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelGroups {
    /// Distinct labels in order of first appearance
    pub names: Vec<String>,
    /// Group index for every sample
    pub assignments: Vec<usize>,
}

impl LabelGroups {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sample indices belonging to `group`
    pub fn members(&self, group: usize) -> impl Iterator<Item = usize> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .filter(move |(_, g)| **g == group)
            .map(|(i, _)| i)
    }
}

impl Labels {
    pub fn len(&self) -> usize {
        match self {
            Labels::Categorical(v) => v.len(),
            Labels::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Labels::Numeric(_))
    }

    /// Label of sample `index` as display text
    pub fn display(&self, index: usize) -> String {
        match self {
            Labels::Categorical(v) => v[index].clone(),
            Labels::Numeric(v) => format_number(v[index]),
        }
    }

    /// Group samples by distinct label.
    pub fn groups(&self) -> LabelGroups {
        let mut names: Vec<String> = Vec::new();
        let mut assignments = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            let name = self.display(i);
            let group = match names.iter().position(|n| *n == name) {
                Some(g) => g,
                None => {
                    names.push(name);
                    names.len() - 1
                }
            };
            assignments.push(group);
        }
        LabelGroups { names, assignments }
    }
}

/// Integers print without a trailing `.0`
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

impl From<Vec<String>> for Labels {
    fn from(values: Vec<String>) -> Self {
        Labels::Categorical(values)
    }
}

impl From<Vec<&str>> for Labels {
    fn from(values: Vec<&str>) -> Self {
        Labels::Categorical(values.into_iter().map(String::from).collect())
    }
}

impl From<Vec<f64>> for Labels {
    fn from(values: Vec<f64>) -> Self {
        Labels::Numeric(values)
    }
}

impl From<Vec<i64>> for Labels {
    fn from(values: Vec<i64>) -> Self {
        Labels::Numeric(values.into_iter().map(|v| v as f64).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_default_attribute_names() {
        let ds = Dataset::new(array![[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(
            ds.attribute_names(),
            &["Attribute_1", "Attribute_2", "Attribute_3"]
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(Dataset::new(empty), Err(VizError::DataError(_))));
        let no_cols = Array2::<f64>::zeros((4, 0));
        assert!(Dataset::new(no_cols).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = Dataset::new(array![[1.0, f64::NAN]]).unwrap_err();
        assert!(err.to_string().contains("row 0, column 1"));
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            Dataset::from_rows(&rows),
            Err(VizError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_column_ranges() {
        let ds = Dataset::from_rows(&[vec![1.0, -2.0], vec![3.0, 5.0]]).unwrap();
        assert_eq!(ds.column_ranges(), vec![(1.0, 3.0), (-2.0, 5.0)]);
    }

    #[test]
    fn test_groups_first_appearance_order() {
        let labels = Labels::from(vec!["dog", "cat", "dog", "bird"]);
        let groups = labels.groups();
        assert_eq!(groups.names, vec!["dog", "cat", "bird"]);
        assert_eq!(groups.assignments, vec![0, 1, 0, 2]);
        assert_eq!(groups.members(0).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_numeric_labels_display() {
        let labels = Labels::from(vec![3.0, 1.5, 3.0]);
        assert!(labels.is_numeric());
        assert_eq!(labels.display(0), "3");
        assert_eq!(labels.display(1), "1.5");
        assert_eq!(labels.groups().len(), 2);
    }
}
