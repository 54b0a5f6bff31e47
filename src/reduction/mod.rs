//! Dimensionality reduction for embedding-based charts.
//!
//! Every reducer maps an `n_samples x n_attributes` matrix to an
//! `n_samples x n_components` embedding.

pub mod pca;
pub mod tsne;
pub mod umap;

pub use pca::{Pca, PcaConfig, PcaResult};
pub use tsne::{Tsne, TsneConfig};
pub use umap::{Umap, UmapConfig};

use crate::error::{Result, VizError};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// A dimensionality-reduction backend
pub trait Reducer: Send + Sync {
    /// Short algorithm name used in logs
    fn name(&self) -> &'static str;

    /// Reduce `data` to exactly `n_components` columns
    fn reduce(&self, data: ArrayView2<'_, f64>, n_components: usize) -> Result<Array2<f64>>;
}

/// The reduction algorithms the dispatcher knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMethod {
    Pca,
    Tsne,
    Umap,
}

impl ReductionMethod {
    /// Prefix used for embedding axis titles
    pub fn axis_prefix(&self) -> &'static str {
        match self {
            ReductionMethod::Pca => "Principal Component",
            ReductionMethod::Tsne => "t-SNE Component",
            ReductionMethod::Umap => "UMAP Component",
        }
    }

    /// Display name used in chart titles
    pub fn display_name(&self) -> &'static str {
        match self {
            ReductionMethod::Pca => "PCA",
            ReductionMethod::Tsne => "t-SNE",
            ReductionMethod::Umap => "UMAP",
        }
    }
}

/// Common input checks shared by all reducers.
pub(crate) fn check_input(
    name: &str,
    data: &ArrayView2<'_, f64>,
    n_components: usize,
    min_samples: usize,
) -> Result<()> {
    if data.nrows() < min_samples {
        return Err(VizError::DataError(format!(
            "{} requires at least {} samples, got {}",
            name,
            min_samples,
            data.nrows()
        )));
    }
    if data.ncols() == 0 {
        return Err(VizError::DataError(format!(
            "{} requires at least 1 attribute",
            name
        )));
    }
    if n_components == 0 {
        return Err(VizError::invalid_parameter(
            "n_components",
            n_components,
            "must be at least 1",
        ));
    }
    Ok(())
}

/// Copy matrix rows into contiguous vectors for the slice-based kernels.
pub(crate) fn to_rows(data: &ArrayView2<'_, f64>) -> Vec<Vec<f64>> {
    data.outer_iter().map(|row| row.to_vec()).collect()
}
