//! Chart builders: pure functions from a dataset and its labels to figure bodies.

use super::dataset::{Dataset, Labels};
use super::figure::{
    Anchor, Coloring, Curve, CurvePlot, HeatmapGrid, HistogramPlot, HistogramSeries, RadVizPlot,
    ScatterMatrix,
};
use ndarray::{ArrayView1, Axis};
use std::f64::consts::{PI, SQRT_2};

/// Bin count for the histogram chart
pub const HISTOGRAM_BINS: usize = 20;
/// Opacity of each overlaid histogram
pub const HISTOGRAM_ALPHA: f64 = 0.5;
/// Bin count for the diagonal cells of the scatter matrix
pub const SPLOM_DIAGONAL_BINS: usize = 10;
/// Points per Andrews curve
pub const ANDREWS_SAMPLES: usize = 200;

/// Discrete groups for categorical labels, a continuous scale for numeric ones.
pub fn label_coloring(labels: &Labels) -> Coloring {
    match labels {
        Labels::Categorical(_) => Coloring::Groups(labels.groups()),
        Labels::Numeric(values) => {
            let (min, max) = values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            Coloring::Continuous {
                values: values.clone(),
                min,
                max,
            }
        }
    }
}

/// Equal-width histogram over the column's own range.
///
/// A constant column gets a unit-wide range centred on its value; the
/// maximum lands in the last bin.
pub fn histogram_series(name: &str, values: ArrayView1<'_, f64>, bins: usize) -> HistogramSeries {
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1.0;
    } else if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values.iter() {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

    HistogramSeries {
        name: name.to_string(),
        edges,
        counts,
    }
}

pub fn histogram(dataset: &Dataset) -> HistogramPlot {
    let series = dataset
        .attribute_names()
        .iter()
        .enumerate()
        .map(|(i, name)| histogram_series(name, dataset.column(i), HISTOGRAM_BINS))
        .collect();
    HistogramPlot {
        series,
        alpha: HISTOGRAM_ALPHA,
        x_title: "Attribute Value".to_string(),
        y_title: "Frequency".to_string(),
    }
}

pub fn heatmap(dataset: &Dataset) -> HeatmapGrid {
    let values = dataset.values().to_owned();
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    HeatmapGrid {
        values,
        min,
        max,
        row_label: "Sample".to_string(),
        column_labels: dataset.attribute_names().to_vec(),
    }
}

pub fn scatter_matrix(dataset: &Dataset, labels: &Labels) -> ScatterMatrix {
    let diagonal = dataset
        .attribute_names()
        .iter()
        .enumerate()
        .map(|(i, name)| histogram_series(name, dataset.column(i), SPLOM_DIAGONAL_BINS))
        .collect();
    ScatterMatrix {
        attributes: dataset.attribute_names().to_vec(),
        values: dataset.values().to_owned(),
        groups: labels.groups(),
        diagonal,
    }
}

pub fn parallel_coordinates(dataset: &Dataset, labels: &Labels) -> CurvePlot {
    let groups = labels.groups();
    let curves = dataset
        .values()
        .axis_iter(Axis(0))
        .enumerate()
        .map(|(sample, row)| Curve {
            sample,
            group: groups.assignments[sample],
            y: row.to_vec(),
        })
        .collect();
    CurvePlot {
        x: (0..dataset.n_attributes()).map(|i| i as f64).collect(),
        x_tick_labels: Some(dataset.attribute_names().to_vec()),
        x_title: "Attribute".to_string(),
        y_title: "Value".to_string(),
        curves,
        groups,
    }
}

/// Evaluate the Andrews Fourier series of `x` at `t`:
/// `x1/√2 + x2 sin t + x3 cos t + x4 sin 2t + x5 cos 2t + ...`
pub fn andrews_value(x: &[f64], t: f64) -> f64 {
    let Some((&first, rest)) = x.split_first() else {
        return 0.0;
    };
    let mut value = first / SQRT_2;
    for (i, &coeff) in rest.iter().enumerate() {
        let harmonic = (i / 2 + 1) as f64;
        value += if i % 2 == 0 {
            coeff * (harmonic * t).sin()
        } else {
            coeff * (harmonic * t).cos()
        };
    }
    value
}

pub fn andrews_curves(dataset: &Dataset, labels: &Labels) -> CurvePlot {
    let groups = labels.groups();
    let step = 2.0 * PI / (ANDREWS_SAMPLES - 1) as f64;
    let t: Vec<f64> = (0..ANDREWS_SAMPLES).map(|i| -PI + step * i as f64).collect();

    let curves = dataset
        .values()
        .axis_iter(Axis(0))
        .enumerate()
        .map(|(sample, row)| {
            let x = row.to_vec();
            Curve {
                sample,
                group: groups.assignments[sample],
                y: t.iter().map(|&ti| andrews_value(&x, ti)).collect(),
            }
        })
        .collect();

    CurvePlot {
        x: t,
        x_tick_labels: None,
        x_title: "t".to_string(),
        y_title: "f(t)".to_string(),
        curves,
        groups,
    }
}

pub fn radviz(dataset: &Dataset, labels: &Labels) -> RadVizPlot {
    let m = dataset.n_attributes();
    let anchors: Vec<Anchor> = dataset
        .attribute_names()
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let theta = 2.0 * PI * k as f64 / m as f64;
            Anchor {
                name: name.clone(),
                position: [theta.cos(), theta.sin()],
            }
        })
        .collect();

    let ranges = dataset.column_ranges();
    let points = dataset
        .values()
        .axis_iter(Axis(0))
        .map(|row| {
            let normalized: Vec<f64> = row
                .iter()
                .zip(&ranges)
                .map(|(&v, &(lo, hi))| if hi > lo { (v - lo) / (hi - lo) } else { 0.0 })
                .collect();
            let total: f64 = normalized.iter().sum();
            if total <= 0.0 {
                return [0.0, 0.0];
            }
            let (x, y) = normalized
                .iter()
                .zip(&anchors)
                .fold((0.0, 0.0), |(x, y), (&w, a)| (x + w * a.position[0], y + w * a.position[1]));
            [x / total, y / total]
        })
        .collect();

    RadVizPlot {
        anchors,
        points,
        groups: labels.groups(),
    }
}
