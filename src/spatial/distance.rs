//! Straight-line distance on the village grid

use crate::core::types::Coordinate;

/// Euclidean distance between two coordinates, in fields
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    (dx * dx + dy * dy).sqrt()
}
