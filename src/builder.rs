//! Template-to-grid mapping
//!
//! Scales a raw template by an integer factor, centers it in the tile grid and
//! records which grid cells it covers. The result is rebuilt whenever either
//! the template or the grid changes and is otherwise read-only.

use std::collections::HashMap;

use crate::template::Template;

/// One template cell replicated to grid resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaledCell {
    pub row: i64,
    pub col: i64,
    /// 0-based palette index
    pub color_index: usize,
}

/// A template placed on a `cols` x `rows` grid
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMap {
    scale: u32,
    offset_row: i64,
    offset_col: i64,
    cells: Vec<ScaledCell>,
    lookup: HashMap<(i64, i64), usize>,
    edge_majority: usize,
}

impl TemplateMap {
    /// Place `template` on the grid.
    ///
    /// The scale is the largest integer factor that fits both axes, never
    /// less than 1. A template larger than the grid still uses scale 1 and
    /// ends up partly off-grid with negative offsets.
    pub fn build(template: &Template, cols: u32, rows: u32, palette_len: usize) -> Self {
        let (w, h) = (template.width() as i64, template.height() as i64);
        let (cols, rows) = (cols as i64, rows as i64);

        let scale = (cols / w).min(rows / h).max(1);
        let offset_col = (cols - w * scale).div_euclid(2);
        let offset_row = (rows - h * scale).div_euclid(2);

        let mut cells = Vec::new();
        let mut lookup = HashMap::new();

        for r in 0..template.height() {
            for c in 0..template.width() {
                let Some(color_index) = template.palette_index(r, c, palette_len) else {
                    continue;
                };
                for dy in 0..scale {
                    for dx in 0..scale {
                        let row = offset_row + r as i64 * scale + dy;
                        let col = offset_col + c as i64 * scale + dx;
                        cells.push(ScaledCell { row, col, color_index });
                        lookup.insert((row, col), color_index);
                    }
                }
            }
        }

        Self {
            scale: scale as u32,
            offset_row,
            offset_col,
            cells,
            lookup,
            edge_majority: template.edge_majority_index(palette_len),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// `(offset_row, offset_col)` of the template's top-left cell.
    pub fn offset(&self) -> (i64, i64) {
        (self.offset_row, self.offset_col)
    }

    /// All scaled cells, in template row-major order.
    pub fn cells(&self) -> &[ScaledCell] {
        &self.cells
    }

    /// Palette index covering grid cell `(row, col)`, if any.
    pub fn color_at(&self, row: i64, col: i64) -> Option<usize> {
        self.lookup.get(&(row, col)).copied()
    }

    /// Fallback index for grid cells the template does not cover.
    pub fn edge_majority(&self) -> usize {
        self.edge_majority
    }
}
