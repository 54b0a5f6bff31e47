//! Render-ready chart descriptions.
//!
//! A `Figure` carries everything a renderer needs and nothing it has to
//! compute; the chart builders do all of the numeric work up front.

use super::chart_kind::ChartKind;
use super::dataset::LabelGroups;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A fully computed chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub body: FigureBody,
}

/// Chart payload, one variant per chart family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FigureBody {
    Scatter(ScatterPlot),
    Heatmap(HeatmapGrid),
    ScatterMatrix(ScatterMatrix),
    Curves(CurvePlot),
    RadViz(RadVizPlot),
    Histogram(HistogramPlot),
}

/// How points are colored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Coloring {
    /// Discrete colors, one per label group
    Groups(LabelGroups),
    /// Continuous colorscale over numeric labels
    Continuous { values: Vec<f64>, min: f64, max: f64 },
}

/// Points in 1 to 3 coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterPlot {
    /// `n_samples x n_coordinates`
    pub points: Array2<f64>,
    /// One title per coordinate column
    pub axis_titles: Vec<String>,
    pub coloring: Coloring,
}

impl ScatterPlot {
    pub fn n_coordinates(&self) -> usize {
        self.points.ncols()
    }
}

/// The raw matrix as a color grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub values: Array2<f64>,
    pub min: f64,
    pub max: f64,
    pub row_label: String,
    pub column_labels: Vec<String>,
}

/// Pairwise attribute scatter with per-attribute histograms on the diagonal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterMatrix {
    pub attributes: Vec<String>,
    pub values: Array2<f64>,
    pub groups: LabelGroups,
    pub diagonal: Vec<HistogramSeries>,
}

/// One curve per sample over a shared x grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvePlot {
    pub x: Vec<f64>,
    /// Tick labels for categorical x positions (parallel coordinates)
    pub x_tick_labels: Option<Vec<String>>,
    pub x_title: String,
    pub y_title: String,
    pub curves: Vec<Curve>,
    pub groups: LabelGroups,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curve {
    pub sample: usize,
    pub group: usize,
    pub y: Vec<f64>,
}

/// Attribute anchors on the unit circle and the projected samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadVizPlot {
    pub anchors: Vec<Anchor>,
    pub points: Vec<[f64; 2]>,
    pub groups: LabelGroups,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub position: [f64; 2],
}

/// Overlaid histograms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramPlot {
    pub series: Vec<HistogramSeries>,
    /// Fill opacity for every series
    pub alpha: f64,
    pub x_title: String,
    pub y_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub name: String,
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramSeries {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
