//! Rendering surfaces
//!
//! A [`Renderer`] turns a computed [`Figure`] into output. File renderers
//! number their outputs so repeated charts never overwrite each other.

pub mod colormap;
pub mod json;
pub mod memory;
pub mod svg;
pub mod theme;

pub use colormap::{Colormap, Rgb};
pub use json::JsonRenderer;
pub use memory::MemoryRenderer;
pub use svg::SvgRenderer;
pub use theme::Theme;

use crate::error::Result;
use crate::visualization::Figure;
use std::path::{Path, PathBuf};

/// A surface figures are drawn onto
pub trait Renderer {
    fn render(&mut self, figure: &Figure, theme: &Theme) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, figure: &Figure, theme: &Theme) -> Result<()> {
        (**self).render(figure, theme)
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, figure: &Figure, theme: &Theme) -> Result<()> {
        (**self).render(figure, theme)
    }
}

/// Numbered output paths inside one directory
#[derive(Debug, Clone)]
pub(crate) struct OutputSequence {
    dir: PathBuf,
    extension: &'static str,
    next: usize,
    written: Vec<PathBuf>,
}

impl OutputSequence {
    pub(crate) fn new(dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            extension,
            next: 1,
            written: Vec::new(),
        }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for the next figure, creating the directory if needed.
    ///
    /// The number is only used up once the file is [`record`](Self::record)ed.
    pub(crate) fn next_path(&self, figure: &Figure) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(self.dir.join(format!(
            "{:02}-{}.{}",
            self.next,
            figure.kind.as_str(),
            self.extension
        )))
    }

    pub(crate) fn record(&mut self, path: PathBuf) {
        self.written.push(path);
        self.next += 1;
    }

    pub(crate) fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualization::{ChartKind, FigureBody, HeatmapGrid};

    fn heatmap_figure() -> Figure {
        Figure {
            kind: ChartKind::Heatmap,
            title: "Heatmap".to_string(),
            body: FigureBody::Heatmap(HeatmapGrid {
                values: ndarray::Array2::zeros((1, 1)),
                min: 0.0,
                max: 1.0,
                row_label: "Sample".to_string(),
                column_labels: vec!["a".to_string()],
            }),
        }
    }

    #[test]
    fn test_unrecorded_path_is_reused() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut outputs = OutputSequence::new(tmp.path(), "svg");
        let figure = heatmap_figure();

        let first = outputs.next_path(&figure).unwrap();
        assert_eq!(outputs.next_path(&figure).unwrap(), first);
        assert!(first.ends_with("01-heatmap.svg"));

        outputs.record(first);
        assert!(outputs.next_path(&figure).unwrap().ends_with("02-heatmap.svg"));
        assert_eq!(outputs.written().len(), 1);
    }
}
