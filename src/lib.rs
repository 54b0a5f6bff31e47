//! kolosal-viz - Exploratory visualization of labeled datasets
//!
//! This crate turns a numeric matrix plus one label per row into charts:
//! - Scatter plots of raw columns, or of a PCA projection when the data is
//!   wider than the plot
//! - PCA, t-SNE and UMAP embeddings in 2 or 3 dimensions
//! - Heatmap, scatter plot matrix, parallel coordinates, histogram,
//!   Andrews curves and RadViz
//!
//! # Modules
//!
//! - [`visualization`] - Dataset, labels, chart kinds and the dispatcher
//! - [`reduction`] - PCA, t-SNE and UMAP behind the [`reduction::Reducer`] trait
//! - [`render`] - SVG, JSON and in-memory rendering surfaces
//! - [`config`] - Serializable visualizer configuration
//! - [`utils`] - CSV loading and SIMD kernels
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use kolosal_viz::prelude::*;
//! use ndarray::array;
//!
//! let data = Dataset::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]])?;
//! let labels = vec!["a", "b", "a"];
//! let mut viz = VisualizationDispatcher::new(data, labels, SvgRenderer::new("plots"))?;
//! viz.visualize(ChartKind::Pca, 2)?;
//! # Ok::<(), kolosal_viz::error::VizError>(())
//! ```

// Core error handling
pub mod error;
pub mod config;

// Charts and embeddings
pub mod visualization;
pub mod reduction;
pub mod render;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{Result, VizError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{RenderConfig, VisualizerConfig};
    pub use crate::error::{Result, VizError};
    pub use crate::reduction::{
        Pca, PcaConfig, Reducer, ReductionMethod, Tsne, TsneConfig, Umap, UmapConfig,
    };
    pub use crate::render::{JsonRenderer, MemoryRenderer, Renderer, SvgRenderer, Theme};
    pub use crate::visualization::{
        ChartKind, Dataset, Dimensions, Figure, FigureBody, Labels, VisualizationDispatcher,
    };
}
