//! Visualizer configuration

use crate::error::Result;
use crate::reduction::{PcaConfig, TsneConfig, UmapConfig};
use crate::render::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory that file renderers write into
    pub output_dir: PathBuf,

    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            width: 1024,
            height: 768,
        }
    }
}

/// Everything a dispatcher needs besides its data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub theme: Theme,
    pub pca: PcaConfig,
    pub tsne: TsneConfig,
    pub umap: UmapConfig,
    pub render: RenderConfig,
}

impl VisualizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_pca(mut self, pca: PcaConfig) -> Self {
        self.pca = pca;
        self
    }

    pub fn with_tsne(mut self, tsne: TsneConfig) -> Self {
        self.tsne = tsne;
        self
    }

    pub fn with_umap(mut self, umap: UmapConfig) -> Self {
        self.umap = umap;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.render.output_dir = dir.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.render.width = width;
        self.render.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = VisualizerConfig::default();
        assert_eq!(config.theme, Theme::FiveThirtyEight);
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.render.height, 768);
        assert_eq!(config.tsne.perplexity, 30.0);
        assert_eq!(config.umap.n_neighbors, 15);
    }

    #[test]
    fn test_builders() {
        let config = VisualizerConfig::new()
            .with_theme(Theme::Classic)
            .with_output_dir("out")
            .with_size(640, 480);
        assert_eq!(config.theme, Theme::Classic);
        assert_eq!(config.render.output_dir, PathBuf::from("out"));
        assert_eq!(config.render.width, 640);
    }

    #[test]
    fn test_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"theme": "classic", "umap": {{"n_neighbors": 5}}}}"#).unwrap();
        let config = VisualizerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.theme, Theme::Classic);
        assert_eq!(config.umap.n_neighbors, 5);
        assert_eq!(config.umap.min_dist, 0.1);
        assert_eq!(config.render.width, 1024);
    }

    #[test]
    fn test_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = VisualizerConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, VizError::SerializationError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = VisualizerConfig::from_json_file("/nonexistent/viz.json").unwrap_err();
        assert!(matches!(err, VizError::IoError(_)));
    }
}
