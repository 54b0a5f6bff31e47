//! Data loading utilities

use crate::error::{Result, VizError};
use crate::visualization::{Dataset, Labels};
use ndarray::Array2;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Loads CSV files into datasets and labels
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows scanned to infer column types
    infer_schema_length: usize,
    /// Field separator
    delimiter: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
            delimiter: b',',
        }
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path)?;

        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| VizError::DataError(e.to_string()))?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded CSV"
        );
        Ok(df)
    }

    /// Load a CSV and split it into attributes and labels.
    ///
    /// Every column except `label_column` becomes an attribute.
    pub fn load_labeled(
        &self,
        path: impl AsRef<Path>,
        label_column: Option<&str>,
    ) -> Result<(Dataset, Option<Labels>)> {
        let df = self.load_csv(path)?;
        frame_to_dataset(&df, label_column)
    }
}

/// Split a frame into a dataset and, when named, its label column.
pub fn frame_to_dataset(df: &DataFrame, label_column: Option<&str>) -> Result<(Dataset, Option<Labels>)> {
    let labels = match label_column {
        Some(name) => Some(extract_labels(df, name)?),
        None => None,
    };

    let attribute_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| Some(name.as_str()) != label_column)
        .map(|s| s.to_string())
        .collect();
    if attribute_names.is_empty() {
        return Err(VizError::DataError(
            "no attribute columns left after removing the label column".to_string(),
        ));
    }

    let values = columns_to_array2(df, &attribute_names)?;
    let dataset = Dataset::with_attribute_names(values, attribute_names)?;
    Ok((dataset, labels))
}

/// Numeric columns become numeric labels, everything else categorical
pub fn extract_labels(df: &DataFrame, name: &str) -> Result<Labels> {
    let column = df
        .column(name)
        .map_err(|_| VizError::DataError(format!("label column '{}' not found", name)))?;
    if column.null_count() > 0 {
        return Err(VizError::DataError(format!(
            "label column '{}' has {} missing values",
            name,
            column.null_count()
        )));
    }

    match column.dtype() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 |
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 |
        DataType::Float32 | DataType::Float64 => {
            let cast = column
                .cast(&DataType::Float64)
                .map_err(|e| VizError::DataError(e.to_string()))?;
            let values = cast
                .f64()
                .map_err(|e| VizError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            Ok(Labels::Numeric(values))
        }
        _ => {
            let cast = column
                .cast(&DataType::String)
                .map_err(|e| VizError::DataError(e.to_string()))?;
            let values = cast
                .str()
                .map_err(|e| VizError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect();
            Ok(Labels::Categorical(values))
        }
    }
}

/// Extract named columns into a row-major `Array2<f64>`, rejecting nulls
/// and anything that does not cast to a number.
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df
                .column(col_name)
                .map_err(|e| VizError::DataError(e.to_string()))?;
            let cast = column
                .cast(&DataType::Float64)
                .map_err(|e| VizError::DataError(e.to_string()))?;
            if cast.null_count() > 0 {
                return Err(VizError::DataError(format!(
                    "column '{}' has {} missing or non-numeric values",
                    col_name,
                    cast.null_count()
                )));
            }
            let values: Vec<f64> = cast
                .f64()
                .map_err(|e| VizError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, col_names.len()), |(r, c)| col_refs[c][r]))
}
