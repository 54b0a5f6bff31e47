//! In-memory surface for tests and embedding

use super::{Renderer, Theme};
use crate::error::Result;
use crate::visualization::Figure;

/// Keeps every rendered figure
#[derive(Debug, Clone, Default)]
pub struct MemoryRenderer {
    figures: Vec<Figure>,
    themes: Vec<Theme>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// Theme each figure was rendered with
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn last(&self) -> Option<&Figure> {
        self.figures.last()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn clear(&mut self) {
        self.figures.clear();
        self.themes.clear();
    }
}

impl Renderer for MemoryRenderer {
    fn render(&mut self, figure: &Figure, theme: &Theme) -> Result<()> {
        self.figures.push(figure.clone());
        self.themes.push(*theme);
        Ok(())
    }
}
