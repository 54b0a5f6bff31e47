//! Cosmetic chart styles

use super::colormap::Rgb;
use serde::{Deserialize, Serialize};

/// Chart style, fixed for the lifetime of a dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light grey canvas, grey grid, bold palette
    #[default]
    FiveThirtyEight,
    /// White canvas with a light grid
    Classic,
}

const FIVETHIRTYEIGHT_PALETTE: [Rgb; 6] = [
    Rgb::hex(0x008fd5),
    Rgb::hex(0xfc4f30),
    Rgb::hex(0xe5ae38),
    Rgb::hex(0x6d904f),
    Rgb::hex(0x8b8b8b),
    Rgb::hex(0x810f7c),
];

const CLASSIC_PALETTE: [Rgb; 10] = [
    Rgb::hex(0x1f77b4),
    Rgb::hex(0xff7f0e),
    Rgb::hex(0x2ca02c),
    Rgb::hex(0xd62728),
    Rgb::hex(0x9467bd),
    Rgb::hex(0x8c564b),
    Rgb::hex(0xe377c2),
    Rgb::hex(0x7f7f7f),
    Rgb::hex(0xbcbd22),
    Rgb::hex(0x17becf),
];

impl Theme {
    pub fn background(&self) -> Rgb {
        match self {
            Theme::FiveThirtyEight => Rgb::hex(0xf0f0f0),
            Theme::Classic => Rgb::hex(0xffffff),
        }
    }

    pub fn grid(&self) -> Rgb {
        match self {
            Theme::FiveThirtyEight => Rgb::hex(0xcbcbcb),
            Theme::Classic => Rgb::hex(0xe5e5e5),
        }
    }

    pub fn foreground(&self) -> Rgb {
        match self {
            Theme::FiveThirtyEight => Rgb::hex(0x3c3c3c),
            Theme::Classic => Rgb::hex(0x000000),
        }
    }

    pub fn font(&self) -> &'static str {
        "sans-serif"
    }

    pub fn caption_size(&self) -> u32 {
        match self {
            Theme::FiveThirtyEight => 28,
            Theme::Classic => 24,
        }
    }

    /// Cycling series color
    pub fn series_color(&self, index: usize) -> Rgb {
        let palette: &[Rgb] = match self {
            Theme::FiveThirtyEight => &FIVETHIRTYEIGHT_PALETTE,
            Theme::Classic => &CLASSIC_PALETTE,
        };
        palette[index % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        assert_eq!(Theme::default(), Theme::FiveThirtyEight);
    }

    #[test]
    fn test_palette_cycles() {
        let theme = Theme::FiveThirtyEight;
        assert_eq!(theme.series_color(0), theme.series_color(6));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_theme_serde() {
        let json = serde_json::to_string(&Theme::FiveThirtyEight).unwrap();
        assert_eq!(json, "\"five_thirty_eight\"");
        let theme: Theme = serde_json::from_str("\"classic\"").unwrap();
        assert_eq!(theme, Theme::Classic);
    }
}
