//! Chain geometry: turning angles to polylines.
//!
//! Coordinates follow the pixel convention: x grows to the right and y grows
//! downward, so a positive angle turns clockwise on screen.

use serde::{Deserialize, Serialize};

/// A floating-point canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Both coordinates finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Truncate toward zero for drawing.
    #[inline]
    pub fn truncated(&self) -> PixelPoint {
        PixelPoint {
            x: self.x as i32,
            y: self.y as i32,
        }
    }
}

/// An integer drawing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

/// A traced chain: the exact polyline and its drawing copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// `angles.len() + 1` points, beginning at the start position.
    pub points: Vec<Point>,
    /// `points` truncated to integers.
    pub drawing: Vec<PixelPoint>,
}

impl Trace {
    /// Final point of the chain.
    #[inline]
    pub fn end(&self) -> Point {
        // `trace` always pushes the start point
        self.points[self.points.len() - 1]
    }
}

/// Walk `step_length` along each angle in turn, starting at `start`.
pub fn trace(angles: &[f64], start: Point, step_length: f64) -> Trace {
    let mut points = Vec::with_capacity(angles.len() + 1);
    points.push(start);

    let mut current = start;
    for &angle in angles {
        current = Point {
            x: current.x + angle.cos() * step_length,
            y: current.y + angle.sin() * step_length,
        };
        points.push(current);
    }

    let drawing = points.iter().map(Point::truncated).collect();
    Trace { points, drawing }
}
