//! Raw food templates
//!
//! A template is a rectangular matrix of palette symbols. Symbol `n` refers to
//! palette entry `n - 1`; anything outside `1..=palette.len()` marks a cell
//! that is left unfilled.

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::Palette;

/// Error raised while reading or decoding a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// File I/O error
    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("Failed to parse template JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Template has no rows or no columns
    #[error("template is empty")]
    Empty,
    /// A row differs in width from the first row
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    /// A cell could not be read as a symbol
    #[error("row {row}, column {col}: invalid cell {value:?}")]
    InvalidCell { row: usize, col: usize, value: String },
    /// Image decoding error
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// Source image is not the expected size
    #[error("image must be {expected_w}x{expected_h} pixels, got {found_w}x{found_h}")]
    ImageSize { expected_w: u32, expected_h: u32, found_w: u32, found_h: u32 },
}

/// One row as stored on disk: either a digit string or a list of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRow {
    Digits(String),
    Cells(Vec<RawCell>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(i64),
    Text(String),
}

/// Immutable matrix of palette symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    width: usize,
    height: usize,
    symbols: Vec<u8>,
}

impl Template {
    /// Build a template from rows of symbols.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, TemplateError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(TemplateError::Empty);
        }

        let mut symbols = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(TemplateError::Ragged { row, expected: width, found: cells.len() });
            }
            symbols.extend(cells);
        }

        Ok(Self { width, height, symbols })
    }

    /// Build a template from digit strings, one character per cell.
    ///
    /// Non-digit characters become symbol 0, which no palette accepts.
    ///
    /// ```
    /// use foodviz::template::Template;
    ///
    /// let t = Template::from_strings(&["12", "34"]).unwrap();
    /// assert_eq!((t.width(), t.height()), (2, 2));
    /// assert_eq!(t.symbol(1, 0), Some(3));
    /// ```
    pub fn from_strings<S: AsRef<str>>(rows: &[S]) -> Result<Self, TemplateError> {
        Self::from_rows(rows.iter().map(|r| digit_row(r.as_ref())).collect())
    }

    /// Parse template JSON: an array of digit strings or an array of arrays.
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let raw: Vec<RawRow> = serde_json::from_str(json)?;
        let mut rows = Vec::with_capacity(raw.len());

        for (r, raw_row) in raw.into_iter().enumerate() {
            let row = match raw_row {
                RawRow::Digits(s) => digit_row(&s),
                RawRow::Cells(cells) => cells
                    .into_iter()
                    .enumerate()
                    .map(|(c, cell)| cell_symbol(r, c, cell))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            rows.push(row);
        }

        Self::from_rows(rows)
    }

    /// Read a template JSON file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize as an array of digit strings.
    ///
    /// Symbols above 9 cannot be written as a single digit and become `0`.
    pub fn to_json_string(&self) -> Result<String, TemplateError> {
        let rows: Vec<String> = (0..self.height)
            .map(|r| {
                self.row(r)
                    .iter()
                    .map(|&s| char::from_digit(s as u32, 10).unwrap_or('0'))
                    .collect()
            })
            .collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Quantize an image to the nearest palette entry per pixel.
    ///
    /// When `required` is given the image must match that size exactly.
    pub fn from_image(
        image: &RgbaImage,
        palette: &Palette,
        required: Option<(u32, u32)>,
    ) -> Result<Self, TemplateError> {
        let (w, h) = image.dimensions();
        if let Some((rw, rh)) = required {
            if (w, h) != (rw, rh) {
                return Err(TemplateError::ImageSize {
                    expected_w: rw,
                    expected_h: rh,
                    found_w: w,
                    found_h: h,
                });
            }
        }

        let rows = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| {
                        palette
                            .nearest_index(*image.get_pixel(x, y))
                            .map_or(0, |i| (i + 1) as u8)
                    })
                    .collect()
            })
            .collect();

        Self::from_rows(rows)
    }

    /// Paint the template with `palette`, one pixel per cell.
    ///
    /// Invalid symbols become transparent pixels.
    pub fn to_image(&self, palette: &Palette) -> RgbaImage {
        let mut image = RgbaImage::new(self.width as u32, self.height as u32);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = self
                .palette_index(y as usize, x as usize, palette.len())
                .and_then(|i| palette.get(i))
                .unwrap_or(Rgba([0, 0, 0, 0]));
        }
        image
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw symbol at `(row, col)`.
    pub fn symbol(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            Some(self.symbols[row * self.width + col])
        } else {
            None
        }
    }

    /// 0-based palette index at `(row, col)`, or `None` for invalid cells.
    pub fn palette_index(&self, row: usize, col: usize, palette_len: usize) -> Option<usize> {
        self.symbol(row, col).and_then(|s| symbol_to_index(s, palette_len))
    }

    fn row(&self, row: usize) -> &[u8] {
        &self.symbols[row * self.width..(row + 1) * self.width]
    }

    /// Most frequent palette index along the border.
    ///
    /// Walks the top and bottom rows, then the left and right columns, so
    /// corner cells count once per edge. Ties go to the lowest index; a border
    /// with no valid cells yields 0.
    pub fn edge_majority_index(&self, palette_len: usize) -> usize {
        let mut counts = vec![0usize; palette_len];
        let mut tally = |row: usize, col: usize| {
            if let Some(i) = self.palette_index(row, col, palette_len) {
                counts[i] += 1;
            }
        };

        for c in 0..self.width {
            tally(0, c);
            tally(self.height - 1, c);
        }
        for r in 0..self.height {
            tally(r, 0);
            tally(r, self.width - 1);
        }

        let mut best = 0;
        for (i, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = i;
            }
        }
        best
    }
}

fn symbol_to_index(symbol: u8, palette_len: usize) -> Option<usize> {
    let index = (symbol as usize).checked_sub(1)?;
    (index < palette_len).then_some(index)
}

fn digit_row(s: &str) -> Vec<u8> {
    s.chars().map(|ch| ch.to_digit(10).map_or(0, |d| d as u8)).collect()
}

fn cell_symbol(row: usize, col: usize, cell: RawCell) -> Result<u8, TemplateError> {
    let invalid = |value: String| TemplateError::InvalidCell { row, col, value };
    match cell {
        // Out-of-range numbers are still cells, just never valid ones
        RawCell::Number(n) => Ok(u8::try_from(n).unwrap_or(0)),
        RawCell::Text(s) => match s.trim().parse::<i64>() {
            Ok(n) => Ok(u8::try_from(n).unwrap_or(0)),
            Err(_) => Err(invalid(s)),
        },
    }
}
