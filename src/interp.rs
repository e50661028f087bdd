use crate::types::{Intensity, Point, Value};

// Map a normalized coordinate in [-1, 1] to a grid index in [0, extent).
// Truncates toward the lower index and clamps the right/top boundary to the last index.
pub fn to_grid_index(coord: Value, extent: usize) -> usize {
    if extent == 0 {
        return 0;
    }
    let index = ((coord + 1.0) / 2.0 * extent as Value).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(extent - 1)
    }
}

// Normalized coordinate of the center of grid index `index`.
pub fn to_normalized(index: usize, extent: usize) -> Value {
    -1.0 + (2 * index + 1) as Value / extent as Value
}

// Return the interpolation factor t corresponding to iso_val.
// Equal endpoint values have no crossing; the edge midpoint (t = 0.5) is used instead.
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    let denom = v1 - v0;
    if denom == 0.0 {
        return 0.5;
    }
    (iso_val - v0) / denom
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
pub fn interpolate_points(p0: Point, p1: Point, t: Value) -> Point {
    Point::new(lerp(p0.x, p1.x, t), lerp(p0.y, p1.y, t))
}

/// Finds where the isoline crosses the edge `a`–`b`.
///
/// The walk starts at whichever endpoint lies below `isovalue` and moves toward the
/// other one, so the result does not depend on argument order.
pub fn edge_crossing(
    a: Point,
    value_a: Intensity,
    b: Point,
    value_b: Intensity,
    isovalue: Intensity,
) -> Point {
    let (low, low_value, high, high_value) = if value_a >= isovalue {
        (b, value_b, a, value_a)
    } else {
        (a, value_a, b, value_b)
    };
    let t = find_t(low_value as Value, high_value as Value, isovalue as Value);
    interpolate_points(low, high, t)
}
