//! Stages and their tile-coloring policies
//!
//! The cycle runs `Random -> Slight -> Closer -> Final` and wraps. Each stage
//! has one assignment function that decides, for every grid cell in
//! row-major order, whether the tile there is visible and which palette
//! index it shows.

use std::collections::HashMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::builder::TemplateMap;
use crate::layout::GridLayout;

/// One step of the reveal cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Pure noise
    Random,
    /// A third of the template shows through
    Slight,
    /// Two thirds of the template shows through
    Closer,
    /// The whole template, background filled with the edge color
    Final,
}

impl Stage {
    /// Cycle order
    pub const ALL: [Stage; 4] = [Stage::Random, Stage::Slight, Stage::Closer, Stage::Final];

    /// Position within the cycle, `0..4`.
    pub fn index(self) -> usize {
        match self {
            Stage::Random => 0,
            Stage::Slight => 1,
            Stage::Closer => 2,
            Stage::Final => 3,
        }
    }

    /// The stage that follows this one; `Final` wraps to `Random`.
    pub fn next(self) -> Stage {
        Stage::ALL[(self.index() + 1) % Stage::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Random => "random",
            Stage::Slight => "slight",
            Stage::Closer => "closer",
            Stage::Final => "final",
        }
    }

    /// Share of template cells forced to their template color.
    pub fn match_fraction(self) -> f64 {
        match self {
            Stage::Random => 0.0,
            Stage::Slight => 0.33,
            Stage::Closer => 0.66,
            Stage::Final => 1.0,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a coloring policy reads
#[derive(Debug, Clone, Copy)]
pub struct AssignContext<'a> {
    pub layout: GridLayout,
    pub palette_len: usize,
    pub map: &'a TemplateMap,
    /// Probability that a tile is visible, in `[0, 1]`
    pub automation: f64,
}

/// Colors for every grid cell, row-major, under `stage`'s policy.
pub fn assign_colors<R: Rng + ?Sized>(
    stage: Stage,
    ctx: &AssignContext<'_>,
    rng: &mut R,
) -> Vec<Option<usize>> {
    // Nothing to paint with
    if ctx.palette_len == 0 {
        return vec![None; ctx.layout.tile_count()];
    }
    match stage {
        Stage::Random => assign_random(ctx, rng),
        Stage::Slight => assign_slight(ctx, rng),
        Stage::Closer => assign_closer(ctx, rng),
        Stage::Final => assign_final(ctx, rng),
    }
}

/// Visible tiles get a uniformly random palette color.
///
/// This gate is strict (`u < a`), so automation 0 hides every tile.
pub fn assign_random<R: Rng + ?Sized>(ctx: &AssignContext<'_>, rng: &mut R) -> Vec<Option<usize>> {
    (0..ctx.layout.tile_count())
        .map(|_| {
            if rng.gen::<f64>() < ctx.automation {
                Some(rng.gen_range(0..ctx.palette_len))
            } else {
                None
            }
        })
        .collect()
}

pub fn assign_slight<R: Rng + ?Sized>(ctx: &AssignContext<'_>, rng: &mut R) -> Vec<Option<usize>> {
    assign_partial(ctx, Stage::Slight.match_fraction(), rng)
}

pub fn assign_closer<R: Rng + ?Sized>(ctx: &AssignContext<'_>, rng: &mut R) -> Vec<Option<usize>> {
    assign_partial(ctx, Stage::Closer.match_fraction(), rng)
}

/// Visible tiles show the template where it covers them and the
/// edge-majority color elsewhere.
pub fn assign_final<R: Rng + ?Sized>(ctx: &AssignContext<'_>, rng: &mut R) -> Vec<Option<usize>> {
    let fallback = ctx.map.edge_majority();
    grid_cells(ctx.layout)
        .map(|(row, col)| {
            visible(ctx.automation, rng).then(|| ctx.map.color_at(row, col).unwrap_or(fallback))
        })
        .collect()
}

/// Pick `floor(n * fraction)` scaled template cells without replacement.
///
/// Returns the chosen cells keyed by grid coordinate. A fresh sample is drawn
/// on every call.
pub fn choose_matched_cells<R: Rng + ?Sized>(
    map: &TemplateMap,
    fraction: f64,
    rng: &mut R,
) -> HashMap<(i64, i64), usize> {
    let need = (map.cells().len() as f64 * fraction.clamp(0.0, 1.0)).floor() as usize;
    map.cells()
        .choose_multiple(rng, need)
        .map(|cell| ((cell.row, cell.col), cell.color_index))
        .collect()
}

fn assign_partial<R: Rng + ?Sized>(
    ctx: &AssignContext<'_>,
    fraction: f64,
    rng: &mut R,
) -> Vec<Option<usize>> {
    let chosen = choose_matched_cells(ctx.map, fraction, rng);
    grid_cells(ctx.layout)
        .map(|(row, col)| {
            if !visible(ctx.automation, rng) {
                return None;
            }
            match chosen.get(&(row, col)) {
                Some(&index) => Some(index),
                None => Some(rng.gen_range(0..ctx.palette_len)),
            }
        })
        .collect()
}

/// Inclusive visibility gate used by every stage after `Random`.
fn visible<R: Rng + ?Sized>(automation: f64, rng: &mut R) -> bool {
    rng.gen::<f64>() <= automation
}

fn grid_cells(layout: GridLayout) -> impl Iterator<Item = (i64, i64)> {
    let cols = layout.cols as i64;
    (0..layout.rows as i64).flat_map(move |row| (0..cols).map(move |col| (row, col)))
}
