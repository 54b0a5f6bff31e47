//! JSON surface
//!
//! Writes each figure as a standalone document that a browser or notebook
//! front end can draw.

use super::{OutputSequence, Renderer, Theme};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::visualization::Figure;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Serialize)]
struct JsonDocument<'a> {
    theme: &'a Theme,
    width: u32,
    height: u32,
    figure: &'a Figure,
}

/// Serializes figures to `<NN>-<selector>.json`
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    outputs: OutputSequence,
    width: u32,
    height: u32,
}

impl JsonRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let defaults = RenderConfig::default();
        Self {
            outputs: OutputSequence::new(output_dir, "json"),
            width: defaults.width,
            height: defaults.height,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            outputs: OutputSequence::new(config.output_dir.clone(), "json"),
            width: config.width,
            height: config.height,
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.outputs.dir()
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        self.outputs.written()
    }
}

impl Renderer for JsonRenderer {
    fn render(&mut self, figure: &Figure, theme: &Theme) -> Result<()> {
        let document = JsonDocument {
            theme,
            width: self.width,
            height: self.height,
            figure,
        };
        let text = serde_json::to_string_pretty(&document)?;
        let path = self.outputs.next_path(figure)?;
        std::fs::write(&path, text)?;
        debug!(path = %path.display(), "Wrote figure JSON");
        self.outputs.record(path);
        Ok(())
    }
}
