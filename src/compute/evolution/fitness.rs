//! Fitness evaluation for traced chains.
//!
//! Fitness is a cost: lower is better. It adds the squared distance from the
//! chain's end to the target and a weighted quartic penalty on heading
//! changes between consecutive segments. The fourth power makes one sharp
//! turn far more expensive than several gentle ones.

use serde::{Deserialize, Serialize};

use crate::compute::{Point, Trace, trace};

/// Fixed surroundings every organism is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landscape {
    /// Where every chain starts.
    pub start: Point,
    /// Where chains should end.
    pub target: Point,
    /// Length of each segment.
    pub step_length: f64,
    /// Multiplier applied to the truncated turn penalty.
    pub rotation_weight: u64,
}

impl Default for Landscape {
    fn default() -> Self {
        Self {
            start: Point::new(100.0, 100.0),
            target: Point::new(1900.0, 1900.0),
            step_length: 101.0,
            rotation_weight: 100,
        }
    }
}

impl Landscape {
    /// Trace `angles` from the start and score the result.
    pub fn evaluate(&self, angles: &[f64]) -> (Trace, u64) {
        let traced = trace(angles, self.start, self.step_length);
        let fitness = total_fitness(&traced.points, angles, self.target, self.rotation_weight);
        (traced, fitness)
    }
}

/// Squared Euclidean distance from the chain's end to the target.
#[inline]
pub fn endpoint_cost(last: Point, target: Point) -> f64 {
    last.distance_squared(&target)
}

/// Sum of `(a[i] - a[i-1])^4` over consecutive headings.
pub fn smoothness_cost(angles: &[f64]) -> f64 {
    angles.windows(2).map(|w| (w[1] - w[0]).powi(4)).sum()
}

/// Combined cost: `trunc(endpoint) + trunc(smoothness) * rotation_weight`.
///
/// An empty polyline has no end-point cost.
pub fn total_fitness(points: &[Point], angles: &[f64], target: Point, rotation_weight: u64) -> u64 {
    let endpoint = points
        .last()
        .map_or(0.0, |&last| endpoint_cost(last, target));
    let smoothness = smoothness_cost(angles);

    // Float-to-int casts truncate and saturate
    (endpoint as u64).saturating_add((smoothness as u64).saturating_mul(rotation_weight))
}
