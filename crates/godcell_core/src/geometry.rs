//! Vector and hit-test helpers shared by AI, physics and abilities.
//!
//! Every normalization goes through [`normalize`], which refuses vectors
//! shorter than [`EPSILON`]. Callers skip the entity for the tick on `None`.

use godcell_data::Position;
use rand::Rng;
use std::f64::consts::{PI, TAU};

pub const EPSILON: f64 = 1e-6;

/// Slack applied to arc comparisons so a target placed exactly on the
/// boundary survives `atan2` rounding.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[must_use]
    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Clamps `p` so a circle of `radius` stays inside. Returns whether the
    /// position changed on the x and y axes.
    pub fn clamp(&self, p: &mut Position, radius: f64) -> (bool, bool) {
        let r = radius.min((self.max_x - self.min_x) / 2.0).min((self.max_y - self.min_y) / 2.0);
        let cx = p.x.clamp(self.min_x + r, self.max_x - r);
        let cy = p.y.clamp(self.min_y + r, self.max_y - r);
        let changed = (cx != p.x, cy != p.y);
        p.x = cx;
        p.y = cy;
        changed
    }

    #[must_use]
    pub fn random_point<R: Rng>(&self, rng: &mut R, margin: f64) -> Position {
        let (lo_x, hi_x) = shrink(self.min_x, self.max_x, margin);
        let (lo_y, hi_y) = shrink(self.min_y, self.max_y, margin);
        Position::new(rng.gen_range(lo_x..=hi_x), rng.gen_range(lo_y..=hi_y))
    }
}

fn shrink(lo: f64, hi: f64, margin: f64) -> (f64, f64) {
    if hi - lo > 2.0 * margin {
        (lo + margin, hi - margin)
    } else {
        let mid = (lo + hi) / 2.0;
        (mid, mid)
    }
}

/// Unit vector of `(x, y)`, or `None` if it is too short to have a direction.
#[must_use]
pub fn normalize(x: f64, y: f64) -> Option<(f64, f64)> {
    let len = (x * x + y * y).sqrt();
    if !len.is_finite() || len < EPSILON {
        None
    } else {
        Some((x / len, y / len))
    }
}

/// Unit vector pointing from `from` to `to`.
#[must_use]
pub fn direction(from: &Position, to: &Position) -> Option<(f64, f64)> {
    normalize(to.x - from.x, to.y - from.y)
}

/// Wraps an angle into `[-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

/// Signed difference `to - from`, wrapped into `[-π, π]`.
#[must_use]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    wrap_angle(to - from)
}

/// Rotates `current` toward `target` by at most `max_step` radians.
#[must_use]
pub fn turn_towards(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = angle_diff(current, target);
    if diff.abs() <= max_step {
        target
    } else {
        wrap_angle(current + max_step.copysign(diff))
    }
}

/// Range-and-angle test used by melee, strike beams and serpent bites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTest {
    pub origin: Position,
    /// Facing angle, radians.
    pub facing: f64,
    pub min_range: f64,
    pub max_range: f64,
    pub half_arc: f64,
}

impl ArcTest {
    /// Hit when distance lies in `[min_range, max_range + target_radius]` and
    /// the bearing is within `half_arc` of the facing, both inclusive.
    #[must_use]
    pub fn hits(&self, target: &Position, target_radius: f64) -> bool {
        let dist = self.origin.distance(target);
        if dist < self.min_range || dist > self.max_range + target_radius {
            return false;
        }
        if dist < EPSILON {
            // Coincident targets have no bearing; they are inside any arc.
            return true;
        }
        let bearing = (target.y - self.origin.y).atan2(target.x - self.origin.x);
        angle_diff(self.facing, bearing).abs() <= self.half_arc + ANGLE_EPSILON
    }
}

/// Does the segment `a → b` pass within `radius` of `center`?
#[must_use]
pub fn segment_hits_circle(a: &Position, b: &Position, center: &Position, radius: f64) -> bool {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let t = segment_param(a, b, center);
    let closest = Position::new(a.x + abx * t, a.y + aby * t);
    closest.distance_sq(center) <= radius * radius
}

/// Parameter in `[0, 1]` of the point on `a → b` closest to `p`.
#[must_use]
pub fn segment_param(a: &Position, b: &Position, p: &Position) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq < EPSILON {
        return 0.0;
    }
    (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
}

/// Uniform point inside a circle.
#[must_use]
pub fn random_point_in_circle<R: Rng>(rng: &mut R, center: &Position, radius: f64) -> Position {
    let angle = rng.gen_range(0.0..TAU);
    let r = radius * rng.gen::<f64>().sqrt();
    Position::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
}
