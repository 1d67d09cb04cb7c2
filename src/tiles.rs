//! Tile pool bookkeeping
//!
//! The pool holds exactly one tile per grid cell. Stage entry shuffles the
//! pool and hands each grid cell the next tile, so tiles wander to new cells
//! every stage instead of sliding in place.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::layout::GridLayout;
use crate::motion::Point2D;

/// One animated square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Where the current transition starts
    pub source: Point2D,
    /// Grid-aligned destination
    pub target: Point2D,
    /// Palette index, or `None` for a blank tile that is not drawn
    pub color: Option<usize>,
}

impl Tile {
    /// Position at eased progress `ease` between source and target.
    pub fn position_at(&self, ease: f64) -> Point2D {
        if ease >= 1.0 {
            self.target
        } else if ease <= 0.0 {
            self.source
        } else {
            self.source.lerp(&self.target, ease)
        }
    }
}

/// Fixed set of tiles covering a grid layout
#[derive(Debug, Clone)]
pub struct TilePool {
    layout: GridLayout,
    tiles: Vec<Tile>,
}

impl TilePool {
    /// Create `cols * rows` blank tiles scattered uniformly over the surface.
    ///
    /// Source and target start out equal, so the scatter point is where the
    /// first transition begins.
    pub fn scatter<R: Rng + ?Sized>(
        layout: GridLayout,
        surface_width: u32,
        surface_height: u32,
        rng: &mut R,
    ) -> Self {
        let w = surface_width.max(1) as f64;
        let h = surface_height.max(1) as f64;
        let tiles = (0..layout.tile_count())
            .map(|_| {
                let p = Point2D::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
                Tile { source: p, target: p, color: None }
            })
            .collect();
        Self { layout, tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile currently assigned to grid cell `(row, col)`.
    pub fn tile_at(&self, row: u32, col: u32) -> Option<&Tile> {
        if row >= self.layout.rows || col >= self.layout.cols {
            return None;
        }
        self.tiles.get((row * self.layout.cols + col) as usize)
    }

    /// Start a new transition.
    ///
    /// Shuffles the pool, then walks the grid row-major: each cell takes the
    /// next tile, whose position at `current_ease` becomes its new source.
    /// `colors` holds one entry per cell in the same row-major order.
    pub fn reassign<R: Rng + ?Sized>(
        &mut self,
        colors: &[Option<usize>],
        current_ease: f64,
        rng: &mut R,
    ) {
        debug_assert_eq!(colors.len(), self.tiles.len());
        self.tiles.shuffle(rng);

        let layout = self.layout;
        let cols = layout.cols.max(1);
        for (i, (tile, color)) in self.tiles.iter_mut().zip(colors).enumerate() {
            let row = i as u32 / cols;
            let col = i as u32 % cols;
            let (x, y) = layout.cell_origin(row, col);
            tile.source = tile.position_at(current_ease);
            tile.target = Point2D::new(x, y);
            tile.color = *color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout(cols: u32, rows: u32) -> GridLayout {
        GridLayout { cell_size: 10, cols, rows }
    }

    #[test]
    fn test_scatter_count_and_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = TilePool::scatter(layout(10, 10), 100, 100, &mut rng);
        assert_eq!(pool.tiles().len(), 100);
        for tile in pool.tiles() {
            assert!(tile.source.x >= 0.0 && tile.source.x < 100.0);
            assert!(tile.source.y >= 0.0 && tile.source.y < 100.0);
            assert_eq!(tile.source, tile.target);
            assert_eq!(tile.color, None);
        }
    }

    #[test]
    fn test_reassign_targets_grid_cells() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = TilePool::scatter(layout(3, 2), 30, 20, &mut rng);
        let colors = vec![Some(0), None, Some(1), Some(2), Some(3), None];
        pool.reassign(&colors, 1.0, &mut rng);

        for row in 0..2 {
            for col in 0..3 {
                let tile = pool.tile_at(row, col).unwrap();
                assert_eq!(tile.target, Point2D::new(col as f64 * 10.0, row as f64 * 10.0));
                assert_eq!(tile.color, colors[(row * 3 + col) as usize]);
            }
        }
        assert!(pool.tile_at(2, 0).is_none());
        assert!(pool.tile_at(0, 3).is_none());
    }

    #[test]
    fn test_reassign_starts_from_current_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = TilePool::scatter(layout(4, 4), 40, 40, &mut rng);
        let colors = vec![Some(0); 16];
        pool.reassign(&colors, 1.0, &mut rng);

        // After a finished transition every tile sits on a grid cell, so the
        // next sources are exactly the set of previous targets
        let mut previous: Vec<(i64, i64)> =
            pool.tiles().iter().map(|t| (t.target.x as i64, t.target.y as i64)).collect();
        pool.reassign(&colors, 1.0, &mut rng);
        let mut sources: Vec<(i64, i64)> =
            pool.tiles().iter().map(|t| (t.source.x as i64, t.source.y as i64)).collect();
        previous.sort();
        sources.sort();
        assert_eq!(previous, sources);
    }

    #[test]
    fn test_position_at() {
        let tile = Tile {
            source: Point2D::new(0.0, 100.0),
            target: Point2D::new(50.0, 0.0),
            color: Some(1),
        };
        assert_eq!(tile.position_at(0.0), tile.source);
        assert_eq!(tile.position_at(1.0), tile.target);
        assert_eq!(tile.position_at(0.5), Point2D::new(25.0, 50.0));
    }
}
