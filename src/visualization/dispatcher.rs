//! Chart dispatch
//!
//! A [`VisualizationDispatcher`] owns one dataset, its labels and a rendering
//! surface. Every call validates its arguments, computes the figure and only
//! then renders, so a failed call never produces output.

use super::chart_kind::{ChartKind, Dimensions};
use super::charts;
use super::dataset::{Dataset, Labels};
use super::figure::{Figure, FigureBody, ScatterPlot};
use crate::config::VisualizerConfig;
use crate::error::{Result, VizError};
use crate::reduction::{Pca, Reducer, ReductionMethod, Tsne, Umap};
use crate::render::Renderer;
use ndarray::Array2;
use std::time::Instant;
use tracing::{debug, info};

/// Pairs a dataset with its labels and renders charts of it
pub struct VisualizationDispatcher<R: Renderer> {
    dataset: Dataset,
    labels: Labels,
    renderer: R,
    config: VisualizerConfig,
    pca: Box<dyn Reducer>,
    tsne: Box<dyn Reducer>,
    umap: Box<dyn Reducer>,
}

impl<R: Renderer> VisualizationDispatcher<R> {
    /// Create a dispatcher with the default configuration.
    ///
    /// Fails with [`VizError::LabelLengthMismatch`] unless there is exactly
    /// one label per sample.
    pub fn new(dataset: Dataset, labels: impl Into<Labels>, renderer: R) -> Result<Self> {
        Self::with_config(dataset, labels, renderer, VisualizerConfig::default())
    }

    pub fn with_config(
        dataset: Dataset,
        labels: impl Into<Labels>,
        renderer: R,
        config: VisualizerConfig,
    ) -> Result<Self> {
        let labels = labels.into();
        if labels.len() != dataset.n_samples() {
            return Err(VizError::LabelLengthMismatch {
                samples: dataset.n_samples(),
                labels: labels.len(),
            });
        }

        Ok(Self {
            pca: Box::new(Pca::new(config.pca.clone())),
            tsne: Box::new(Tsne::new(config.tsne.clone())),
            umap: Box::new(Umap::new(config.umap.clone())),
            dataset,
            labels,
            renderer,
            config,
        })
    }

    /// Swap the backend used for one reduction method
    pub fn with_reducer(mut self, method: ReductionMethod, reducer: Box<dyn Reducer>) -> Self {
        match method {
            ReductionMethod::Pca => self.pca = reducer,
            ReductionMethod::Tsne => self.tsne = reducer,
            ReductionMethod::Umap => self.umap = reducer,
        }
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Build and render one chart.
    ///
    /// `dimensions` must be 2 or 3 for scatter, PCA, t-SNE and UMAP; other
    /// chart kinds ignore it.
    pub fn visualize(&mut self, kind: ChartKind, dimensions: usize) -> Result<()> {
        let figure = self.build_figure(kind, dimensions)?;
        info!(chart = %kind, title = %figure.title, "Rendering chart");
        self.renderer.render(&figure, &self.config.theme)
    }

    /// Like [`visualize`](Self::visualize), selecting the chart by name
    pub fn visualize_selector(&mut self, selector: &str, dimensions: usize) -> Result<()> {
        let kind: ChartKind = selector.parse()?;
        self.visualize(kind, dimensions)
    }

    /// Compute a figure without rendering it
    pub fn build_figure(&self, kind: ChartKind, dimensions: usize) -> Result<Figure> {
        let (title, body) = match kind {
            ChartKind::Scatter => self.scatter(Dimensions::try_from(dimensions)?)?,
            ChartKind::Pca => self.embedding(ReductionMethod::Pca, dimensions.try_into()?)?,
            ChartKind::Tsne => self.embedding(ReductionMethod::Tsne, dimensions.try_into()?)?,
            ChartKind::Umap => self.embedding(ReductionMethod::Umap, dimensions.try_into()?)?,
            ChartKind::Heatmap => (
                "Heatmap".to_string(),
                FigureBody::Heatmap(charts::heatmap(&self.dataset)),
            ),
            ChartKind::Splom => (
                "Scatter Plot Matrix (SPLOM)".to_string(),
                FigureBody::ScatterMatrix(charts::scatter_matrix(&self.dataset, &self.labels)),
            ),
            ChartKind::ParallelCoordinates => (
                "Parallel Coordinates Plot".to_string(),
                FigureBody::Curves(charts::parallel_coordinates(&self.dataset, &self.labels)),
            ),
            ChartKind::Histogram => (
                "Histogram".to_string(),
                FigureBody::Histogram(charts::histogram(&self.dataset)),
            ),
            ChartKind::AndrewsCurves => (
                "Andrews Curves".to_string(),
                FigureBody::Curves(charts::andrews_curves(&self.dataset, &self.labels)),
            ),
            ChartKind::RadViz => (
                "RadViz".to_string(),
                FigureBody::RadViz(charts::radviz(&self.dataset, &self.labels)),
            ),
        };

        Ok(Figure { kind, title, body })
    }

    /// Raw columns when they fit, a PCA projection otherwise
    fn scatter(&self, dims: Dimensions) -> Result<(String, FigureBody)> {
        let d = dims.count();
        let n_attributes = self.dataset.n_attributes();

        let (points, axis_titles) = if n_attributes > d {
            let points = self.reduce(ReductionMethod::Pca, d)?;
            let titles = (1..=d).map(|c| format!("Component {}", c)).collect();
            (points, titles)
        } else if n_attributes == 1 {
            let n = self.dataset.n_samples();
            let column = self.dataset.column(0);
            let points = Array2::from_shape_fn((n, 2), |(i, c)| {
                if c == 0 {
                    i as f64
                } else {
                    column[i]
                }
            });
            let titles = vec![
                "Sample Index".to_string(),
                self.dataset.attribute_names()[0].clone(),
            ];
            (points, titles)
        } else {
            (
                self.dataset.values().to_owned(),
                self.dataset.attribute_names().to_vec(),
            )
        };

        let title = format!("{}D Scatter Plot", points.ncols());
        let body = FigureBody::Scatter(ScatterPlot {
            points,
            axis_titles,
            coloring: charts::label_coloring(&self.labels),
        });
        Ok((title, body))
    }

    fn embedding(&self, method: ReductionMethod, dims: Dimensions) -> Result<(String, FigureBody)> {
        let d = dims.count();
        let points = self.reduce(method, d)?;
        let axis_titles = (1..=d)
            .map(|c| format!("{} {}", method.axis_prefix(), c))
            .collect();

        let title = format!("{}D {} Visualization", d, method.display_name());
        let body = FigureBody::Scatter(ScatterPlot {
            points,
            axis_titles,
            coloring: charts::label_coloring(&self.labels),
        });
        Ok((title, body))
    }

    fn reduce(&self, method: ReductionMethod, n_components: usize) -> Result<Array2<f64>> {
        let reducer = match method {
            ReductionMethod::Pca => &self.pca,
            ReductionMethod::Tsne => &self.tsne,
            ReductionMethod::Umap => &self.umap,
        };

        let start = Instant::now();
        let embedding = reducer.reduce(self.dataset.values(), n_components)?;
        let expected = (self.dataset.n_samples(), n_components);
        if embedding.dim() != expected {
            return Err(VizError::ShapeError {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", embedding.dim()),
            });
        }

        debug!(
            reducer = reducer.name(),
            components = n_components,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Reduction finished"
        );
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemoryRenderer;
    use ndarray::array;

    fn iris_like() -> (Dataset, Vec<&'static str>) {
        let values = array![
            [5.1, 3.5, 1.4, 0.2],
            [4.9, 3.0, 1.4, 0.2],
            [4.7, 3.2, 1.3, 0.2],
            [7.0, 3.2, 4.7, 1.4],
            [6.4, 3.2, 4.5, 1.5],
            [6.9, 3.1, 4.9, 1.5],
            [6.3, 3.3, 6.0, 2.5],
            [5.8, 2.7, 5.1, 1.9],
            [7.1, 3.0, 5.9, 2.1],
        ];
        let labels = vec![
            "setosa", "setosa", "setosa",
            "versicolor", "versicolor", "versicolor",
            "virginica", "virginica", "virginica",
        ];
        (Dataset::new(values).unwrap(), labels)
    }

    #[test]
    fn test_label_mismatch() {
        let (dataset, mut labels) = iris_like();
        labels.pop();
        let err = VisualizationDispatcher::new(dataset, labels, MemoryRenderer::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            VizError::LabelLengthMismatch { samples: 9, labels: 8 }
        ));
    }

    #[test]
    fn test_scatter_reduces_wide_data() {
        let (dataset, labels) = iris_like();
        let viz = VisualizationDispatcher::new(dataset, labels, MemoryRenderer::new()).unwrap();
        let figure = viz.build_figure(ChartKind::Scatter, 2).unwrap();
        assert_eq!(figure.title, "2D Scatter Plot");
        match figure.body {
            FigureBody::Scatter(plot) => {
                assert_eq!(plot.points.dim(), (9, 2));
                assert_eq!(plot.axis_titles, vec!["Component 1", "Component 2"]);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_embedding_titles() {
        let (dataset, labels) = iris_like();
        let viz = VisualizationDispatcher::new(dataset, labels, MemoryRenderer::new()).unwrap();
        let figure = viz.build_figure(ChartKind::Pca, 3).unwrap();
        assert_eq!(figure.title, "3D PCA Visualization");
        match figure.body {
            FigureBody::Scatter(plot) => {
                assert_eq!(plot.axis_titles[2], "Principal Component 3");
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_dimensions_ignored_for_multivariate() {
        let (dataset, labels) = iris_like();
        let viz = VisualizationDispatcher::new(dataset, labels, MemoryRenderer::new()).unwrap();
        assert!(viz.build_figure(ChartKind::Heatmap, 7).is_ok());
        assert!(matches!(
            viz.build_figure(ChartKind::Scatter, 7),
            Err(VizError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_visualize_renders_once() {
        let (dataset, labels) = iris_like();
        let mut viz = VisualizationDispatcher::new(dataset, labels, MemoryRenderer::new()).unwrap();
        viz.visualize(ChartKind::RadViz, 2).unwrap();
        assert!(viz.visualize_selector("pie", 2).is_err());
        let renderer = viz.into_renderer();
        assert_eq!(renderer.len(), 1);
        assert_eq!(renderer.figures()[0].title, "RadViz");
    }
}
