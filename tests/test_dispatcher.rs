//! Integration test: chart dispatch contract

use kolosal_viz::prelude::*;
use kolosal_viz::visualization::Coloring;
use ndarray::{Array2, ArrayView2};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Delegates to PCA and counts calls
struct CountingReducer {
    calls: Arc<AtomicUsize>,
    inner: Pca,
}

impl CountingReducer {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
                inner: Pca::default(),
            },
            calls,
        )
    }
}

impl Reducer for CountingReducer {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn reduce(&self, data: ArrayView2<'_, f64>, n_components: usize) -> Result<Array2<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.reduce(data, n_components)
    }
}

fn sample_data(n_samples: usize, n_attributes: usize) -> (Dataset, Vec<String>) {
    let values = Array2::from_shape_fn((n_samples, n_attributes), |(i, j)| {
        let cluster = (i % 3) as f64 * 4.0;
        cluster + ((i * 7 + j * 13) % 11) as f64 * 0.1 + j as f64
    });
    let labels = (0..n_samples).map(|i| format!("class_{}", i % 3)).collect();
    (Dataset::new(values).unwrap(), labels)
}

fn fast_config() -> VisualizerConfig {
    VisualizerConfig::default()
        .with_tsne(TsneConfig {
            perplexity: 5.0,
            n_iter: 250,
            exaggeration_iter: 100,
            ..Default::default()
        })
        .with_umap(UmapConfig {
            n_neighbors: 5,
            n_epochs: 50,
            ..Default::default()
        })
}

fn dispatcher(n_samples: usize, n_attributes: usize) -> VisualizationDispatcher<MemoryRenderer> {
    let (data, labels) = sample_data(n_samples, n_attributes);
    VisualizationDispatcher::with_config(data, labels, MemoryRenderer::new(), fast_config()).unwrap()
}

#[test]
fn test_every_chart_renders_in_two_and_three_dimensions() {
    let mut viz = dispatcher(30, 5);
    for dims in [2, 3] {
        for kind in ChartKind::ALL {
            let result = viz.visualize(kind, dims);
            assert!(result.is_ok(), "{} with {} dims failed: {:?}", kind, dims, result);
        }
    }
    assert_eq!(viz.renderer().len(), 20);
}

#[test]
fn test_bad_dimensions_fail_before_reduction() {
    for kind in [ChartKind::Scatter, ChartKind::Pca, ChartKind::Tsne, ChartKind::Umap] {
        let (counter, calls) = CountingReducer::new();
        let mut viz = dispatcher(12, 5)
            .with_reducer(ReductionMethod::Pca, Box::new(counter));
        for dims in [0, 1, 4, 10] {
            let err = viz.visualize(kind, dims).unwrap_err();
            assert!(matches!(err, VizError::InvalidParameter { .. }), "{:?}", err);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(viz.renderer().is_empty());
    }
}

#[test]
fn test_unknown_selector() {
    let mut viz = dispatcher(10, 3);
    for selector in ["pie", "", "Scatter", "t-sne"] {
        let err = viz.visualize_selector(selector, 2).unwrap_err();
        assert!(matches!(err, VizError::UnsupportedChartKind(_)));
    }
    assert!(viz.renderer().is_empty());
}

#[test]
fn test_scatter_narrow_data_skips_reduction() {
    let (counter, calls) = CountingReducer::new();
    let (data, labels) = sample_data(10, 2);
    let raw = data.values().to_owned();
    let mut viz = VisualizationDispatcher::new(data, labels, MemoryRenderer::new())
        .unwrap()
        .with_reducer(ReductionMethod::Pca, Box::new(counter));

    viz.visualize(ChartKind::Scatter, 2).unwrap();
    viz.visualize(ChartKind::Scatter, 3).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    for figure in viz.renderer().figures() {
        match &figure.body {
            FigureBody::Scatter(plot) => assert_eq!(plot.points, raw),
            other => panic!("unexpected body {:?}", other),
        }
    }
}

#[test]
fn test_scatter_wide_data_reduces_once() {
    let (counter, calls) = CountingReducer::new();
    let mut viz = dispatcher(15, 6).with_reducer(ReductionMethod::Pca, Box::new(counter));

    viz.visualize(ChartKind::Scatter, 3).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    match &viz.renderer().figures()[0].body {
        FigureBody::Scatter(plot) => {
            assert_eq!(plot.points.ncols(), 3);
            assert_eq!(plot.axis_titles, vec!["Component 1", "Component 2", "Component 3"]);
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_scatter_single_attribute_strip() {
    let mut viz = dispatcher(8, 1);
    viz.visualize(ChartKind::Scatter, 2).unwrap();
    match &viz.renderer().figures()[0].body {
        FigureBody::Scatter(plot) => {
            assert_eq!(plot.points.ncols(), 2);
            assert_eq!(plot.points[[5, 0]], 5.0);
            assert_eq!(plot.axis_titles[0], "Sample Index");
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_pca_chart_always_reduces() {
    let (counter, calls) = CountingReducer::new();
    let mut viz = dispatcher(10, 2).with_reducer(ReductionMethod::Pca, Box::new(counter));

    viz.visualize(ChartKind::Pca, 3).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let figure = &viz.renderer().figures()[0];
    assert_eq!(figure.title, "3D PCA Visualization");
    match &figure.body {
        FigureBody::Scatter(plot) => {
            assert_eq!(plot.points.dim(), (10, 3));
            // Only two independent directions exist
            assert!(plot.points.column(2).iter().all(|v| v.abs() < 1e-9));
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_embedding_axis_titles() {
    let viz = dispatcher(20, 4);
    let cases = [
        (ChartKind::Tsne, "2D t-SNE Visualization", "t-SNE Component 1"),
        (ChartKind::Umap, "2D UMAP Visualization", "UMAP Component 1"),
    ];
    for (kind, title, axis) in cases {
        let figure = viz.build_figure(kind, 2).unwrap();
        assert_eq!(figure.title, title);
        match figure.body {
            FigureBody::Scatter(plot) => {
                assert_eq!(plot.points.dim(), (20, 2));
                assert_eq!(plot.axis_titles[0], axis);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }
}

#[test]
fn test_histogram_series_per_attribute() {
    let viz = dispatcher(25, 4);
    match viz.build_figure(ChartKind::Histogram, 2).unwrap().body {
        FigureBody::Histogram(plot) => {
            assert_eq!(plot.series.len(), 4);
            assert!(plot.series.iter().all(|s| s.n_bins() == 20));
            assert!(plot.series.iter().all(|s| s.counts.iter().sum::<usize>() == 25));
            assert_eq!(plot.alpha, 0.5);
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_label_length_mismatch() {
    let (data, mut labels) = sample_data(10, 3);
    labels.push("extra".to_string());
    let err = VisualizationDispatcher::new(data, labels, MemoryRenderer::new())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        VizError::LabelLengthMismatch { samples: 10, labels: 11 }
    ));
}

#[test]
fn test_numeric_labels_color_continuously() {
    let (data, _) = sample_data(9, 3);
    let labels: Vec<f64> = (0..9).map(|i| i as f64 * 0.5).collect();
    let viz = VisualizationDispatcher::new(data, labels, MemoryRenderer::new()).unwrap();
    match viz.build_figure(ChartKind::Scatter, 2).unwrap().body {
        FigureBody::Scatter(plot) => match plot.coloring {
            Coloring::Continuous { min, max, .. } => {
                assert_eq!(min, 0.0);
                assert_eq!(max, 4.0);
            }
            other => panic!("unexpected coloring {:?}", other),
        },
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_theme_is_passed_to_renderer() {
    let (data, labels) = sample_data(6, 2);
    let config = VisualizerConfig::default().with_theme(Theme::Classic);
    let mut viz =
        VisualizationDispatcher::with_config(data, labels, MemoryRenderer::new(), config).unwrap();
    viz.visualize(ChartKind::Heatmap, 2).unwrap();
    assert_eq!(viz.renderer().themes(), &[Theme::Classic]);
}

#[test]
fn test_dispatchers_run_on_separate_threads() {
    let handles: Vec<_> = (0..3)
        .map(|t| {
            std::thread::spawn(move || {
                let mut viz = dispatcher(10 + t, 3);
                viz.visualize(ChartKind::Pca, 2).unwrap();
                viz.into_renderer().len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
