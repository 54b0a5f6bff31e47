//! kolosal-viz CLI Module
//!
//! Command-line interface for plotting CSV data.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::VisualizerConfig;
use crate::render::{JsonRenderer, Renderer, SvgRenderer};
use crate::utils::DataLoader;
use crate::visualization::{ChartKind, Dataset, Labels, VisualizationDispatcher};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

/// Output format for rendered charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
}

#[derive(Parser)]
#[command(name = "kolosal-viz")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Labeled dataset visualization in Rust")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one chart of a labeled CSV file
    Plot {
        /// Input CSV file with a header row
        #[arg(short, long)]
        data: PathBuf,

        /// Label column name
        #[arg(short, long)]
        label: String,

        /// Chart selector (see `charts`)
        #[arg(short, long)]
        chart: String,

        /// Target dimensions for scatter, pca, tsne and umap
        #[arg(long, default_value = "2")]
        dimensions: usize,

        /// Output directory (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "svg")]
        format: OutputFormat,
    },

    /// List the available charts
    Charts,

    /// Show dataset and label information
    Info {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Label column name
        #[arg(short, long)]
        label: Option<String>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_plot(
    data_path: &Path,
    label: &str,
    chart: &str,
    dimensions: usize,
    output: Option<&Path>,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    section("Plot");

    // Parse the selector before touching the data
    let kind: ChartKind = chart.parse()?;

    let mut config = match config_path {
        Some(path) => VisualizerConfig::from_json_file(path)?,
        None => VisualizerConfig::default(),
    };
    if let Some(dir) = output {
        config = config.with_output_dir(dir);
    }

    step_run("Loading data");
    let start = Instant::now();
    let (dataset, labels) = DataLoader::new().load_labeled(data_path, Some(label))?;
    let labels = labels.ok_or_else(|| anyhow::anyhow!("label column '{}' missing", label))?;
    step_done(&format!(
        "{} rows × {} attributes in {:?}",
        dataset.n_samples(),
        dataset.n_attributes(),
        start.elapsed()
    ));

    let written = match format {
        OutputFormat::Svg => {
            let renderer = SvgRenderer::from_config(&config.render);
            render_one(dataset, labels, renderer, config, kind, dimensions, |r| r.written().to_vec())?
        }
        OutputFormat::Json => {
            let renderer = JsonRenderer::from_config(&config.render);
            render_one(dataset, labels, renderer, config, kind, dimensions, |r| r.written().to_vec())?
        }
    };

    for path in written {
        step_ok(&format!("Wrote {}", path.display()));
    }
    println!();
    Ok(())
}

fn render_one<R: Renderer>(
    dataset: Dataset,
    labels: Labels,
    renderer: R,
    config: VisualizerConfig,
    kind: ChartKind,
    dimensions: usize,
    written: impl Fn(&R) -> Vec<PathBuf>,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut viz = VisualizationDispatcher::with_config(dataset, labels, renderer, config)?;

    step_run(&format!("Rendering {}", kind.as_str().cyan()));
    let start = Instant::now();
    viz.visualize(kind, dimensions)?;
    step_done(&format!("{:?}", start.elapsed()));

    Ok(written(viz.renderer()))
}

pub fn cmd_charts() -> anyhow::Result<()> {
    section("Charts");
    for kind in ChartKind::ALL {
        let marker = if kind.uses_dimensions() { "2D/3D" } else { "" };
        println!(
            "  {:<22} {:<6} {}",
            kind.as_str().white(),
            accent(marker),
            muted(kind.description())
        );
    }
    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path, label: Option<&str>) -> anyhow::Result<()> {
    section("Data Info");

    let (dataset, labels) = DataLoader::new().load_labeled(data_path, label)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), dataset.n_samples());
    println!("  {:<12} {}", muted("Attributes"), dataset.n_attributes());
    println!();

    println!("  {:<20} {:>12} {:>12}", muted("Attribute"), muted("Min"), muted("Max"));
    println!("  {}", dim(&"─".repeat(46)));
    for (name, (lo, hi)) in dataset.attribute_names().iter().zip(dataset.column_ranges()) {
        println!("  {:<20} {:>12.4} {:>12.4}", name, lo, hi);
    }

    if let Some(labels) = labels {
        let groups = labels.groups();
        let kind = if labels.is_numeric() { "numeric" } else { "categorical" };
        println!();
        println!(
            "  {:<12} {} {}",
            muted("Labels"),
            groups.len().to_string().white().bold(),
            dim(&format!("distinct ({})", kind))
        );
        println!("  {}", dim(&"─".repeat(46)));
        for g in 0..groups.len() {
            println!("  {:<20} {:>8}", groups.names[g], groups.members(g).count());
        }
    }

    println!();
    Ok(())
}
