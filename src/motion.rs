//! Tile motion between stage transitions
//!
//! Every tile travels in a straight line from where it stood when the stage
//! began to its grid cell. Progress is the elapsed fraction of the transition
//! window, shaped by an easing curve.

use serde::{Deserialize, Serialize};

/// A position on the rendering surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points, per axis
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Easing curve applied to transition progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    /// Constant speed
    Linear,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end
    EaseOut,
    /// Hermite S-curve `t²(3 - 2t)`
    #[default]
    Smoothstep,
}

/// Apply easing to a normalized time value.
///
/// `t` is clamped to `[0, 1]` first, so the result always lies in `[0, 1]`.
pub fn ease(t: f64, interpolation: Interpolation) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match interpolation {
        Interpolation::Linear => t,
        Interpolation::EaseIn => t * t,
        Interpolation::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Interpolation::Smoothstep => t * t * (3.0 - 2.0 * t),
    }
}

/// Fraction of the transition window elapsed at `now_ms`, clamped to `[0, 1]`.
///
/// A zero-length window counts as already finished.
pub fn transition_progress(now_ms: u64, stage_start_ms: u64, transition_ms: u64) -> f64 {
    if transition_ms == 0 {
        return 1.0;
    }
    let elapsed = now_ms.saturating_sub(stage_start_ms) as f64;
    (elapsed / transition_ms as f64).clamp(0.0, 1.0)
}

/// Parse an easing name as written in config files and on the command line
pub fn parse_interpolation(s: &str) -> Option<Interpolation> {
    match s.to_lowercase().as_str() {
        "linear" => Some(Interpolation::Linear),
        "ease-in" | "easein" => Some(Interpolation::EaseIn),
        "ease-out" | "easeout" => Some(Interpolation::EaseOut),
        "smoothstep" | "smooth" | "ease-in-out" => Some(Interpolation::Smoothstep),
        _ => None,
    }
}
