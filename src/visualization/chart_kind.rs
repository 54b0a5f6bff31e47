//! Chart selectors and target dimensionality

use crate::error::{Result, VizError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The ten supported visualizations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Heatmap,
    Pca,
    Tsne,
    Umap,
    Splom,
    ParallelCoordinates,
    Histogram,
    AndrewsCurves,
    #[serde(rename = "radviz")]
    RadViz,
}

impl ChartKind {
    pub const ALL: [ChartKind; 10] = [
        ChartKind::Scatter,
        ChartKind::Heatmap,
        ChartKind::Pca,
        ChartKind::Tsne,
        ChartKind::Umap,
        ChartKind::Splom,
        ChartKind::ParallelCoordinates,
        ChartKind::Histogram,
        ChartKind::AndrewsCurves,
        ChartKind::RadViz,
    ];

    /// Selector string accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Pca => "pca",
            ChartKind::Tsne => "tsne",
            ChartKind::Umap => "umap",
            ChartKind::Splom => "splom",
            ChartKind::ParallelCoordinates => "parallel_coordinates",
            ChartKind::Histogram => "histogram",
            ChartKind::AndrewsCurves => "andrews_curves",
            ChartKind::RadViz => "radviz",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter plot of raw columns, PCA-reduced when wider than the target",
            ChartKind::Heatmap => "Color-mapped grid of the raw matrix",
            ChartKind::Pca => "Principal component embedding",
            ChartKind::Tsne => "t-SNE embedding",
            ChartKind::Umap => "UMAP embedding",
            ChartKind::Splom => "Pairwise scatter of every attribute",
            ChartKind::ParallelCoordinates => "One polyline per sample across attributes",
            ChartKind::Histogram => "Overlaid 20-bin histogram per attribute",
            ChartKind::AndrewsCurves => "Fourier-series curve per sample",
            ChartKind::RadViz => "Samples pulled toward attribute anchors on a circle",
        }
    }

    /// Whether this kind plots coordinates and therefore needs 2 or 3 dimensions
    pub fn uses_dimensions(&self) -> bool {
        matches!(
            self,
            ChartKind::Scatter | ChartKind::Pca | ChartKind::Tsne | ChartKind::Umap
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        ChartKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| VizError::UnsupportedChartKind(s.to_string()))
    }
}

/// Target dimensionality for coordinate charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensions {
    Two,
    Three,
}

impl Dimensions {
    pub fn count(&self) -> usize {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }
}

impl TryFrom<usize> for Dimensions {
    type Error = VizError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            2 => Ok(Dimensions::Two),
            3 => Ok(Dimensions::Three),
            other => Err(VizError::invalid_parameter(
                "dimensions",
                other,
                "for visualization, dimensions must be 2 or 3",
            )),
        }
    }
}
