//! Error types for kolosal-viz

use thiserror::Error;

/// Result type alias for visualization operations
pub type Result<T> = std::result::Result<T, VizError>;

/// Main error type for the visualization crate
#[derive(Error, Debug)]
pub enum VizError {
    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported chart kind '{0}', expected one of: scatter, heatmap, pca, tsne, umap, splom, parallel_coordinates, histogram, andrews_curves, radviz")]
    UnsupportedChartKind(String),

    #[error("Label count mismatch: dataset has {samples} samples but {labels} labels were given")]
    LabelLengthMismatch { samples: usize, labels: usize },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl VizError {
    /// Shorthand for an `InvalidParameter` error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        VizError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap a plotting backend failure
    pub fn render<E: std::fmt::Display>(err: E) -> Self {
        VizError::RenderError(err.to_string())
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for VizError {
    fn from(err: ndarray::ShapeError) -> Self {
        VizError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
