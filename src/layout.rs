//! Grid layout from surface and template size

/// Tile grid that covers the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Edge length of one square tile in pixels
    pub cell_size: u32,
    pub cols: u32,
    pub rows: u32,
}

impl GridLayout {
    /// Fit the largest square cell that still shows the whole template once,
    /// then cover the surface with as many cells as fit.
    ///
    /// A surface smaller than the template falls back to 1px cells. Returns
    /// `None` when either the surface or the template has no area.
    ///
    /// ```
    /// use foodviz::layout::GridLayout;
    ///
    /// let layout = GridLayout::compute(1280, 720, 40, 40).unwrap();
    /// assert_eq!((layout.cell_size, layout.cols, layout.rows), (18, 71, 40));
    /// ```
    pub fn compute(
        surface_width: u32,
        surface_height: u32,
        template_width: usize,
        template_height: usize,
    ) -> Option<Self> {
        if surface_width == 0 || surface_height == 0 || template_width == 0 || template_height == 0
        {
            return None;
        }

        let fit_w = surface_width as usize / template_width;
        let fit_h = surface_height as usize / template_height;
        let cell_size = fit_w.min(fit_h).max(1) as u32;

        Some(Self {
            cell_size,
            cols: surface_width / cell_size,
            rows: surface_height / cell_size,
        })
    }

    /// Number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Pixel origin of the cell at `(row, col)`.
    pub fn cell_origin(&self, row: u32, col: u32) -> (f64, f64) {
        (
            (col * self.cell_size) as f64,
            (row * self.cell_size) as f64,
        )
    }
}
