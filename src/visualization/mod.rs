//! Chart construction and dispatch.
//!
//! [`VisualizationDispatcher`] is the entry point. It turns a
//! [`Dataset`] plus [`Labels`] into a [`Figure`] for a chosen
//! [`ChartKind`] and hands the figure to a renderer.

pub mod chart_kind;
pub mod charts;
pub mod dataset;
pub mod dispatcher;
pub mod figure;

pub use chart_kind::{ChartKind, Dimensions};
pub use dataset::{Dataset, LabelGroups, Labels};
pub use dispatcher::VisualizationDispatcher;
pub use figure::{
    Anchor, Coloring, Curve, CurvePlot, Figure, FigureBody, HeatmapGrid, HistogramPlot,
    HistogramSeries, RadVizPlot, ScatterMatrix, ScatterPlot,
};
