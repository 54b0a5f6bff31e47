//! Integration test: SVG and JSON output

use kolosal_viz::prelude::*;
use ndarray::Array2;
use tempfile::TempDir;

fn sample() -> (Dataset, Vec<&'static str>) {
    let values = Array2::from_shape_fn((24, 4), |(i, j)| {
        (i % 3) as f64 * 3.0 + ((i * 5 + j * 3) % 7) as f64 * 0.2 + j as f64 * 0.5
    });
    let labels = (0..24)
        .map(|i| ["red", "green", "blue"][i % 3])
        .collect();
    (Dataset::new(values).unwrap(), labels)
}

fn fast_config(dir: &std::path::Path) -> VisualizerConfig {
    VisualizerConfig::default()
        .with_output_dir(dir)
        .with_size(640, 480)
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

#[test]
fn test_svg_every_chart() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("charts");
    let config = fast_config(&out);
    let (data, labels) = sample();
    let renderer = SvgRenderer::from_config(&config.render);
    let mut viz = VisualizationDispatcher::with_config(data, labels, renderer, config).unwrap();

    for kind in ChartKind::ALL {
        viz.visualize(kind, 2).unwrap();
    }
    viz.visualize(ChartKind::Pca, 3).unwrap();

    let written = viz.renderer().written();
    assert_eq!(written.len(), 11);
    assert!(written[0].ends_with("01-scatter.svg"));
    assert!(written[9].ends_with("10-radviz.svg"));
    assert!(written[10].ends_with("11-pca.svg"));
    for path in written {
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("<svg"), "{} is not an SVG", path.display());
    }
}

#[test]
fn test_svg_failed_call_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let (data, labels) = sample();
    let mut viz =
        VisualizationDispatcher::new(data, labels, SvgRenderer::new(tmp.path().join("out"))).unwrap();

    assert!(viz.visualize(ChartKind::Umap, 4).is_err());
    assert!(viz.renderer().written().is_empty());
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_svg_numeric_labels() {
    let tmp = TempDir::new().unwrap();
    let (data, _) = sample();
    let labels: Vec<f64> = (0..24).map(|i| i as f64).collect();
    let mut viz = VisualizationDispatcher::new(data, labels, SvgRenderer::new(tmp.path())).unwrap();
    viz.visualize(ChartKind::Scatter, 3).unwrap();
    viz.visualize(ChartKind::ParallelCoordinates, 2).unwrap();
    assert_eq!(viz.renderer().written().len(), 2);
}

#[test]
fn test_json_document() {
    let tmp = TempDir::new().unwrap();
    let (data, labels) = sample();
    let config = VisualizerConfig::default().with_theme(Theme::Classic);
    let mut viz = VisualizationDispatcher::with_config(
        data,
        labels,
        JsonRenderer::new(tmp.path()),
        config,
    )
    .unwrap();

    viz.visualize(ChartKind::Histogram, 2).unwrap();
    let path = viz.renderer().written()[0].clone();
    assert!(path.ends_with("01-histogram.json"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["theme"], "classic");
    assert_eq!(value["figure"]["kind"], "histogram");
    assert_eq!(value["figure"]["title"], "Histogram");
    assert_eq!(value["figure"]["body"]["type"], "histogram");
    assert_eq!(value["figure"]["body"]["series"].as_array().unwrap().len(), 4);
}

#[test]
fn test_json_figure_round_trip() {
    let tmp = TempDir::new().unwrap();
    let (data, labels) = sample();
    let mut viz =
        VisualizationDispatcher::new(data, labels, JsonRenderer::new(tmp.path())).unwrap();
    viz.visualize(ChartKind::RadViz, 2).unwrap();

    let text = std::fs::read_to_string(&viz.renderer().written()[0]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let figure: Figure = serde_json::from_value(value["figure"].clone()).unwrap();
    assert_eq!(figure.kind, ChartKind::RadViz);
    match figure.body {
        FigureBody::RadViz(plot) => {
            assert_eq!(plot.anchors.len(), 4);
            assert_eq!(plot.points.len(), 24);
            assert_eq!(plot.groups.names, vec!["red", "green", "blue"]);
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_svg_histogram_legend_lists_every_attribute() {
    let tmp = TempDir::new().unwrap();
    let names: Vec<String> = (0..14).map(|j| format!("attr_{:02}", j)).collect();
    let values = Array2::from_shape_fn((20, 14), |(i, j)| (i * (j + 1)) as f64 * 0.1);
    let data = Dataset::with_attribute_names(values, names.clone()).unwrap();
    let labels: Vec<&str> = (0..20).map(|i| if i % 2 == 0 { "a" } else { "b" }).collect();
    let mut viz = VisualizationDispatcher::new(data, labels, SvgRenderer::new(tmp.path())).unwrap();

    viz.visualize(ChartKind::Histogram, 2).unwrap();
    let text = std::fs::read_to_string(&viz.renderer().written()[0]).unwrap();
    for name in &names {
        assert!(text.contains(name.as_str()), "legend is missing {}", name);
    }
}
