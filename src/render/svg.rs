//! SVG surface built on plotters

use super::colormap::{Colormap, Rgb};
use super::{OutputSequence, Renderer, Theme};
use crate::config::RenderConfig;
use crate::error::{Result, VizError};
use crate::visualization::{
    Coloring, CurvePlot, Figure, FigureBody, HeatmapGrid, HistogramPlot, LabelGroups, RadVizPlot,
    ScatterMatrix, ScatterPlot,
};
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Group legends with more entries than this are omitted
const MAX_LEGEND_ENTRIES: usize = 12;
const POINT_SIZE: i32 = 4;
const COLORBAR_STEPS: usize = 64;

/// Draws figures to `<NN>-<selector>.svg`
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    outputs: OutputSequence,
    width: u32,
    height: u32,
}

impl SvgRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let defaults = RenderConfig::default();
        Self {
            outputs: OutputSequence::new(output_dir, "svg"),
            width: defaults.width,
            height: defaults.height,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            outputs: OutputSequence::new(config.output_dir.clone(), "svg"),
            width: config.width,
            height: config.height,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn output_dir(&self) -> &Path {
        self.outputs.dir()
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        self.outputs.written()
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, figure: &Figure, theme: &Theme) -> Result<()> {
        let path = self.outputs.next_path(figure)?;
        if let Err(err) = draw_file(&path, (self.width, self.height), figure, theme) {
            // The backend flushes on drop, so a failed draw can leave a partial file
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            return Err(err);
        }
        debug!(path = %path.display(), "Wrote SVG chart");
        self.outputs.record(path);
        Ok(())
    }
}

fn draw_file(path: &Path, size: (u32, u32), figure: &Figure, theme: &Theme) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&color(theme.background())).map_err(VizError::render)?;
    draw_figure(&root, figure, theme)?;
    root.present().map_err(VizError::render)
}

fn draw_figure(root: &Area<'_>, figure: &Figure, theme: &Theme) -> Result<()> {
    match &figure.body {
        FigureBody::Scatter(plot) if plot.n_coordinates() >= 3 => {
            draw_scatter_3d(root, &figure.title, plot, theme)
        }
        FigureBody::Scatter(plot) => draw_scatter_2d(root, &figure.title, plot, theme),
        FigureBody::Heatmap(grid) => draw_heatmap(root, &figure.title, grid, theme),
        FigureBody::ScatterMatrix(matrix) => draw_scatter_matrix(root, &figure.title, matrix, theme),
        FigureBody::Curves(plot) => draw_curves(root, &figure.title, plot, theme),
        FigureBody::RadViz(plot) => draw_radviz(root, &figure.title, plot, theme),
        FigureBody::Histogram(plot) => draw_histogram(root, &figure.title, plot, theme),
    }
}

fn color(c: Rgb) -> RGBColor {
    c.into()
}

fn caption_style(theme: &Theme) -> TextStyle<'static> {
    (theme.font(), theme.caption_size())
        .into_font()
        .color(&color(theme.foreground()))
}

fn label_style(theme: &Theme, size: u32) -> TextStyle<'static> {
    (theme.font(), size).into_font().color(&color(theme.foreground()))
}

/// Data range padded by 5% on each side
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn group_color(groups: &LabelGroups, group: usize) -> RGBColor {
    color(Colormap::Viridis.discrete(group, groups.len()))
}

fn draw_scatter_2d(root: &Area<'_>, title: &str, plot: &ScatterPlot, theme: &Theme) -> Result<()> {
    let xs = plot.points.column(0);
    let ys = plot.points.column(1);

    let mut chart = ChartBuilder::on(root)
        .caption(title, caption_style(theme))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(padded_range(xs.iter().copied()), padded_range(ys.iter().copied()))
        .map_err(VizError::render)?;

    chart
        .configure_mesh()
        .bold_line_style(color(theme.grid()))
        .light_line_style(color(theme.background()))
        .axis_style(color(theme.foreground()))
        .label_style(label_style(theme, 14))
        .axis_desc_style(label_style(theme, 16))
        .x_desc(plot.axis_titles[0].as_str())
        .y_desc(plot.axis_titles[1].as_str())
        .draw()
        .map_err(VizError::render)?;

    match &plot.coloring {
        Coloring::Groups(groups) => {
            for g in 0..groups.len() {
                let c = color(theme.series_color(g));
                let anno = chart
                    .draw_series(
                        groups
                            .members(g)
                            .map(|i| Circle::new((xs[i], ys[i]), POINT_SIZE, c.mix(0.8).filled())),
                    )
                    .map_err(VizError::render)?;
                if groups.len() <= MAX_LEGEND_ENTRIES {
                    anno.label(groups.names[g].as_str())
                        .legend(move |(x, y)| Rectangle::new([(x - 5, y - 5), (x + 5, y + 5)], c.filled()));
                }
            }
            if groups.len() <= MAX_LEGEND_ENTRIES {
                chart
                    .configure_series_labels()
                    .label_font(label_style(theme, 14))
                    .background_style(color(theme.background()).mix(0.8))
                    .border_style(color(theme.grid()))
                    .draw()
                    .map_err(VizError::render)?;
            }
        }
        Coloring::Continuous { values, min, max } => {
            chart
                .draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let c = color(Colormap::Viridis.scaled(v, *min, *max));
                    Circle::new((xs[i], ys[i]), POINT_SIZE, c.filled())
                }))
                .map_err(VizError::render)?;
        }
    }
    Ok(())
}

fn draw_scatter_3d(root: &Area<'_>, title: &str, plot: &ScatterPlot, theme: &Theme) -> Result<()> {
    let xs = plot.points.column(0);
    let ys = plot.points.column(1);
    let zs = plot.points.column(2);

    let mut chart = ChartBuilder::on(root)
        .caption(title, caption_style(theme))
        .margin(20)
        .build_cartesian_3d(
            padded_range(xs.iter().copied()),
            padded_range(ys.iter().copied()),
            padded_range(zs.iter().copied()),
        )
        .map_err(VizError::render)?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(color(theme.grid()).mix(0.5))
        .max_light_lines(3)
        .label_style(label_style(theme, 12))
        .draw()
        .map_err(VizError::render)?;

    match &plot.coloring {
        Coloring::Groups(groups) => {
            for g in 0..groups.len() {
                let c = color(theme.series_color(g));
                let anno = chart
                    .draw_series(groups.members(g).map(|i| {
                        Circle::new((xs[i], ys[i], zs[i]), POINT_SIZE, c.mix(0.8).filled())
                    }))
                    .map_err(VizError::render)?;
                if groups.len() <= MAX_LEGEND_ENTRIES {
                    anno.label(groups.names[g].as_str())
                        .legend(move |(x, y)| Rectangle::new([(x - 5, y - 5), (x + 5, y + 5)], c.filled()));
                }
            }
            if groups.len() <= MAX_LEGEND_ENTRIES {
                chart
                    .configure_series_labels()
                    .label_font(label_style(theme, 14))
                    .background_style(color(theme.background()).mix(0.8))
                    .border_style(color(theme.grid()))
                    .draw()
                    .map_err(VizError::render)?;
            }
        }
        Coloring::Continuous { values, min, max } => {
            chart
                .draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let c = color(Colormap::Viridis.scaled(v, *min, *max));
                    Circle::new((xs[i], ys[i], zs[i]), POINT_SIZE, c.filled())
                }))
                .map_err(VizError::render)?;
        }
    }

    // 3D axes carry no descriptions of their own
    let (_, height) = root.dim_in_pixel();
    let axes = format!(
        "x: {}   y: {}   z: {}",
        plot.axis_titles[0], plot.axis_titles[1], plot.axis_titles[2]
    );
    root.draw(&Text::new(axes, (20, height as i32 - 30), label_style(theme, 14)))
        .map_err(VizError::render)?;
    Ok(())
}

fn draw_heatmap(root: &Area<'_>, title: &str, grid: &HeatmapGrid, theme: &Theme) -> Result<()> {
    let (rows, cols) = grid.values.dim();
    let (width, _) = root.dim_in_pixel();
    let (main, bar) = root.split_horizontally((width as i32 - 110).max(0));

    let mut chart = ChartBuilder::on(&main)
        .caption(title, caption_style(theme))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..cols).into_segmented(), 0f64..rows as f64)
        .map_err(VizError::render)?;

    let names = &grid.column_labels;
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(color(theme.foreground()))
        .label_style(label_style(theme, 12))
        .axis_desc_style(label_style(theme, 16))
        .x_labels(cols.min(30))
        .x_label_formatter(&|v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(j) => names.get(*j).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc(grid.row_label.as_str())
        .draw()
        .map_err(VizError::render)?;

    // Row 0 at the top, as in a printed matrix
    chart
        .draw_series(grid.values.indexed_iter().map(|((i, j), &v)| {
            let top = (rows - i) as f64;
            let c = color(Colormap::Coolwarm.scaled(v, grid.min, grid.max));
            Rectangle::new(
                [(SegmentValue::Exact(j), top), (SegmentValue::Exact(j + 1), top - 1.0)],
                c.filled(),
            )
        }))
        .map_err(VizError::render)?;

    draw_colorbar(&bar, grid.min, grid.max, theme)
}

fn draw_colorbar(area: &Area<'_>, min: f64, max: f64, theme: &Theme) -> Result<()> {
    let range = if max > min { min..max } else { (min - 0.5)..(max + 0.5) };
    let step = (range.end - range.start) / COLORBAR_STEPS as f64;

    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(70)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, range.clone())
        .map_err(VizError::render)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .label_style(label_style(theme, 12))
        .draw()
        .map_err(VizError::render)?;

    chart
        .draw_series((0..COLORBAR_STEPS).map(|k| {
            let lo = range.start + step * k as f64;
            let c = color(Colormap::Coolwarm.scaled(lo + step / 2.0, range.start, range.end));
            Rectangle::new([(0.0, lo), (1.0, lo + step)], c.filled())
        }))
        .map_err(VizError::render)?;
    Ok(())
}

fn draw_histogram(root: &Area<'_>, title: &str, plot: &HistogramPlot, theme: &Theme) -> Result<()> {
    let x_range = padded_range(
        plot.series
            .iter()
            .flat_map(|s| [s.edges[0], s.edges[s.edges.len() - 1]]),
    );
    let top = plot.series.iter().map(|s| s.max_count()).max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(title, caption_style(theme))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, 0f64..top * 1.1)
        .map_err(VizError::render)?;

    chart
        .configure_mesh()
        .bold_line_style(color(theme.grid()))
        .light_line_style(color(theme.background()))
        .axis_style(color(theme.foreground()))
        .label_style(label_style(theme, 14))
        .axis_desc_style(label_style(theme, 16))
        .x_desc(plot.x_title.as_str())
        .y_desc(plot.y_title.as_str())
        .draw()
        .map_err(VizError::render)?;

    for (k, series) in plot.series.iter().enumerate() {
        let c = color(theme.series_color(k));
        let alpha = plot.alpha;
        let anno = chart
            .draw_series(series.counts.iter().enumerate().map(|(b, &count)| {
                Rectangle::new(
                    [(series.edges[b], 0.0), (series.edges[b + 1], count as f64)],
                    c.mix(alpha).filled(),
                )
            }))
            .map_err(VizError::render)?;
        anno.label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x - 4, y - 4), (x + 4, y + 4)], c.mix(alpha).filled()));
    }

    // One entry per attribute; shrink the font once the list gets long
    let font_size = if plot.series.len() <= MAX_LEGEND_ENTRIES { 14 } else { 9 };
    chart
        .configure_series_labels()
        .label_font(label_style(theme, font_size))
        .background_style(color(theme.background()).mix(0.8))
        .border_style(color(theme.grid()))
        .draw()
        .map_err(VizError::render)?;
    Ok(())
}

fn draw_curves(root: &Area<'_>, title: &str, plot: &CurvePlot, theme: &Theme) -> Result<()> {
    let x_range = padded_range(plot.x.iter().copied());
    let y_range = padded_range(plot.curves.iter().flat_map(|c| c.y.iter().copied()));

    let mut chart = ChartBuilder::on(root)
        .caption(title, caption_style(theme))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range.clone())
        .map_err(VizError::render)?;

    let ticks = plot.x_tick_labels.as_deref();
    let formatter = |x: &f64| match ticks {
        Some(names) => {
            let j = x.round();
            if (x - j).abs() < 1e-6 && j >= 0.0 {
                names.get(j as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        }
        None => format!("{:.2}", x),
    };

    chart
        .configure_mesh()
        .bold_line_style(color(theme.grid()))
        .light_line_style(color(theme.background()))
        .axis_style(color(theme.foreground()))
        .label_style(label_style(theme, 14))
        .axis_desc_style(label_style(theme, 16))
        .x_labels(ticks.map(|t| t.len() * 2 + 1).unwrap_or(10))
        .x_label_formatter(&formatter)
        .x_desc(plot.x_title.as_str())
        .y_desc(plot.y_title.as_str())
        .draw()
        .map_err(VizError::render)?;

    // Vertical axis per attribute for parallel coordinates
    if ticks.is_some() {
        let axis_color = color(theme.foreground()).mix(0.4);
        for &x in &plot.x {
            chart
                .draw_series(LineSeries::new(
                    vec![(x, y_range.start), (x, y_range.end)],
                    axis_color,
                ))
                .map_err(VizError::render)?;
        }
    }

    let legend = plot.groups.len() <= MAX_LEGEND_ENTRIES;
    let mut labelled = vec![false; plot.groups.len()];
    for curve in &plot.curves {
        let c = group_color(&plot.groups, curve.group);
        let anno = chart
            .draw_series(LineSeries::new(
                plot.x.iter().copied().zip(curve.y.iter().copied()),
                c.mix(0.6).stroke_width(1),
            ))
            .map_err(VizError::render)?;
        if legend && !labelled[curve.group] {
            labelled[curve.group] = true;
            anno.label(plot.groups.names[curve.group].as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], c.stroke_width(2)));
        }
    }

    if legend {
        chart
            .configure_series_labels()
            .label_font(label_style(theme, 14))
            .background_style(color(theme.background()).mix(0.8))
            .border_style(color(theme.grid()))
            .draw()
            .map_err(VizError::render)?;
    }
    Ok(())
}

fn draw_radviz(root: &Area<'_>, title: &str, plot: &RadVizPlot, theme: &Theme) -> Result<()> {
    let mut chart = ChartBuilder::on(root)
        .caption(title, caption_style(theme))
        .margin(20)
        .build_cartesian_2d(-1.3f64..1.3f64, -1.3f64..1.3f64)
        .map_err(VizError::render)?;

    let fg = color(theme.foreground());
    chart
        .draw_series(LineSeries::new(
            (0..=120).map(|k| {
                let theta = 2.0 * PI * k as f64 / 120.0;
                (theta.cos(), theta.sin())
            }),
            fg.mix(0.5),
        ))
        .map_err(VizError::render)?;

    chart
        .draw_series(plot.anchors.iter().map(|a| {
            Circle::new((a.position[0], a.position[1]), POINT_SIZE + 1, fg.filled())
        }))
        .map_err(VizError::render)?;
    chart
        .draw_series(plot.anchors.iter().map(|a| {
            Text::new(
                a.name.clone(),
                (a.position[0] * 1.12, a.position[1] * 1.12),
                label_style(theme, 14),
            )
        }))
        .map_err(VizError::render)?;

    let legend = plot.groups.len() <= MAX_LEGEND_ENTRIES;
    for g in 0..plot.groups.len() {
        let c = group_color(&plot.groups, g);
        let anno = chart
            .draw_series(plot.groups.members(g).map(|i| {
                let [x, y] = plot.points[i];
                Circle::new((x, y), POINT_SIZE, c.mix(0.8).filled())
            }))
            .map_err(VizError::render)?;
        if legend {
            anno.label(plot.groups.names[g].as_str())
                .legend(move |(x, y)| Rectangle::new([(x - 5, y - 5), (x + 5, y + 5)], c.filled()));
        }
    }

    if legend {
        chart
            .configure_series_labels()
            .label_font(label_style(theme, 14))
            .background_style(color(theme.background()).mix(0.8))
            .border_style(color(theme.grid()))
            .draw()
            .map_err(VizError::render)?;
    }
    Ok(())
}

fn draw_scatter_matrix(
    root: &Area<'_>,
    title: &str,
    matrix: &ScatterMatrix,
    theme: &Theme,
) -> Result<()> {
    let k = matrix.attributes.len();
    let body = root.titled(title, caption_style(theme)).map_err(VizError::render)?;
    let cells = body.split_evenly((k, k));
    let ranges: Vec<Range<f64>> = (0..k)
        .map(|c| padded_range(matrix.values.column(c).iter().copied()))
        .collect();

    for (idx, cell) in cells.iter().enumerate() {
        let (row, col) = (idx / k, idx % k);
        let bottom = row + 1 == k;
        let left = col == 0;

        if row == col {
            let series = &matrix.diagonal[row];
            let top = series.max_count().max(1) as f64;
            let mut chart = ChartBuilder::on(cell)
                .margin(4)
                .x_label_area_size(if bottom { 30 } else { 0 })
                .y_label_area_size(if left { 40 } else { 0 })
                .build_cartesian_2d(ranges[col].clone(), 0f64..top * 1.1)
                .map_err(VizError::render)?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(3)
                .y_labels(3)
                .label_style(label_style(theme, 10))
                .x_desc(if bottom { matrix.attributes[col].as_str() } else { "" })
                .y_desc(if left { matrix.attributes[row].as_str() } else { "" })
                .draw()
                .map_err(VizError::render)?;
            let c = color(theme.series_color(0));
            chart
                .draw_series(series.counts.iter().enumerate().map(|(b, &count)| {
                    Rectangle::new(
                        [(series.edges[b], 0.0), (series.edges[b + 1], count as f64)],
                        c.mix(0.7).filled(),
                    )
                }))
                .map_err(VizError::render)?;
        } else {
            let mut chart = ChartBuilder::on(cell)
                .margin(4)
                .x_label_area_size(if bottom { 30 } else { 0 })
                .y_label_area_size(if left { 40 } else { 0 })
                .build_cartesian_2d(ranges[col].clone(), ranges[row].clone())
                .map_err(VizError::render)?;
            chart
                .configure_mesh()
                .bold_line_style(color(theme.grid()))
                .light_line_style(color(theme.background()))
                .x_labels(3)
                .y_labels(3)
                .label_style(label_style(theme, 10))
                .x_desc(if bottom { matrix.attributes[col].as_str() } else { "" })
                .y_desc(if left { matrix.attributes[row].as_str() } else { "" })
                .draw()
                .map_err(VizError::render)?;
            let xs = matrix.values.column(col);
            let ys = matrix.values.column(row);
            chart
                .draw_series(matrix.groups.assignments.iter().enumerate().map(|(i, &g)| {
                    Circle::new((xs[i], ys[i]), 2, group_color(&matrix.groups, g).filled())
                }))
                .map_err(VizError::render)?;
        }
    }
    Ok(())
}
