//! Palettes and built-in themes
//!
//! A palette is an ordered list of colors. Templates refer to palette entries
//! by 1-based symbol, the engine by 0-based index. A theme bundles a palette
//! with the surface background so alternate color schemes can drive the same
//! engine.

use image::Rgba;

use crate::color::{parse_color, rgb_distance_sq, ColorError};

/// Ordered set of tile colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    pub fn new(colors: Vec<Rgba<u8>>) -> Self {
        Self { colors }
    }

    /// Parse a palette from color strings, failing on the first bad entry.
    pub fn parse<S: AsRef<str>>(colors: &[S]) -> Result<Self, ColorError> {
        let colors = colors
            .iter()
            .map(|c| parse_color(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgba<u8>> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }

    /// Index of the entry closest to `color` in RGB space.
    ///
    /// Ties resolve to the lowest index. Returns `None` for an empty palette.
    pub fn nearest_index(&self, color: Rgba<u8>) -> Option<usize> {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(i, c)| (rgb_distance_sq(**c, color), *i))
            .map(|(i, _)| i)
    }
}

/// A named color scheme: tile palette plus surface background
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub palette: Palette,
    pub background: Rgba<u8>,
}

/// Names of the themes compiled into the binary
pub const BUILTIN_THEMES: &[&str] = &["wall", "market"];

impl Theme {
    /// Wall yellow, avocado green, blue and coral on a light gray surface.
    pub fn wall() -> Self {
        Self {
            name: "wall".to_string(),
            palette: Palette::new(vec![
                Rgba([212, 196, 84, 255]),
                Rgba([68, 118, 4, 255]),
                Rgba([32, 138, 174, 255]),
                Rgba([242, 132, 130, 255]),
            ]),
            background: Rgba([240, 240, 240, 255]),
        }
    }

    /// Deeper produce tones on an off-white surface.
    pub fn market() -> Self {
        Self {
            name: "market".to_string(),
            palette: Palette::new(vec![
                Rgba([233, 196, 106, 255]),
                Rgba([42, 157, 143, 255]),
                Rgba([38, 70, 83, 255]),
                Rgba([231, 111, 81, 255]),
            ]),
            background: Rgba([250, 247, 240, 255]),
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "wall" => Some(Self::wall()),
            "market" => Some(Self::market()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::wall()
    }
}
