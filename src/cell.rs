use crate::{
    field::ScalarField,
    interp::{edge_crossing, lerp},
    types::{Intensity, Point, Value},
};

/// One of the four corners of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Direction of the two corners that share a sign in an edge-aligned cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Top corners share a sign (and so do the bottom ones): the isoline runs left to right.
    Horizontal,
    /// Left corners share a sign (and so do the right ones): the isoline runs bottom to top.
    Vertical,
}

/// How the isoline passes through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCase {
    /// All corners on one side, no crossing.
    Uniform,
    /// One corner differs from the other three.
    SingleCorner(Corner),
    /// Two adjacent corners on each side.
    EdgeAligned(Axis),
    /// Diagonal corners share a sign, adjacent ones differ.
    Saddle,
}

/// A normalized position and the intensity sampled there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub pos: Point,
    pub value: Intensity,
}

/// A 2×2 neighbourhood of field samples.
///
/// ```text
///   up_left ---- up_right        Y
///      |            |            |
///      |   center   |            *-- X
///      |            |
///  down_left -- down_right
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub up_left: Sample,
    pub up_right: Sample,
    pub down_left: Sample,
    pub down_right: Sample,
}

/// `+1` when `value` is at or above `isovalue`, `-1` otherwise.
#[inline]
pub fn sign(value: Intensity, isovalue: Intensity) -> i8 {
    if value < isovalue { -1 } else { 1 }
}

impl Cell {
    /// Samples the four corners around `center`, `half_extent` away on each axis.
    #[inline]
    pub fn sample<F>(field: &F, center: Point, half_extent: [Value; 2]) -> Self
    where
        F: ScalarField + ?Sized,
    {
        let [dx, dy] = half_extent;
        let at = |x: Value, y: Value| {
            let pos = Point::new(x, y);
            Sample {
                pos,
                value: field.sample_at(pos),
            }
        };
        Self {
            up_left: at(center.x - dx, center.y + dy),
            up_right: at(center.x + dx, center.y + dy),
            down_left: at(center.x - dx, center.y - dy),
            down_right: at(center.x + dx, center.y - dy),
        }
    }

    pub fn corner(&self, corner: Corner) -> Sample {
        match corner {
            Corner::UpLeft => self.up_left,
            Corner::UpRight => self.up_right,
            Corner::DownLeft => self.down_left,
            Corner::DownRight => self.down_right,
        }
    }

    /// Per-corner signs in `[up_left, up_right, down_left, down_right]` order.
    pub fn signs(&self, isovalue: Intensity) -> [i8; 4] {
        [
            sign(self.up_left.value, isovalue),
            sign(self.up_right.value, isovalue),
            sign(self.down_left.value, isovalue),
            sign(self.down_right.value, isovalue),
        ]
    }

    /// Classifies the cell from the sum of its corner signs.
    ///
    /// ```text
    /// sum = ±4  →  Uniform
    /// sum = ±2  →  SingleCorner   (checked UL, UR, DL, else DR)
    /// sum =  0  →  EdgeAligned    (UL == UR, or UL == DL)
    ///              Saddle         (otherwise)
    /// ```
    pub fn classify(&self, isovalue: Intensity) -> CellCase {
        let [ul, ur, dl, dr] = self.signs(isovalue);
        match ul + ur + dl + dr {
            -4 | 4 => CellCase::Uniform,
            -2 | 2 => {
                let lone = if ul != ur && ul != dl {
                    Corner::UpLeft
                } else if ur != ul && ur != dr {
                    Corner::UpRight
                } else if dl != ul && dl != dr {
                    Corner::DownLeft
                } else {
                    Corner::DownRight
                };
                CellCase::SingleCorner(lone)
            }
            _ if ul == ur => CellCase::EdgeAligned(Axis::Horizontal),
            _ if ul == dl => CellCase::EdgeAligned(Axis::Vertical),
            _ => CellCase::Saddle,
        }
    }

    /// Crossing point on the edge between corners `a` and `b`.
    #[inline]
    pub fn crossing(&self, a: Corner, b: Corner, isovalue: Intensity) -> Point {
        let a = self.corner(a);
        let b = self.corner(b);
        edge_crossing(a.pos, a.value, b.pos, b.value, isovalue)
    }

    /// Mean of the four corner values.
    pub fn mean(&self) -> Value {
        (self.up_left.value as Value
            + self.up_right.value as Value
            + self.down_left.value as Value
            + self.down_right.value as Value)
            * 0.25
    }

    /// Value of the bilinear interpolant at its saddle point.
    ///
    /// ```text
    ///   (DL·UR − DR·UL) / (UR + DL − DR − UL)
    /// ```
    ///
    /// Returns `None` when the denominator vanishes (the interpolant has no saddle).
    pub fn saddle_value(&self) -> Option<Value> {
        let [ul, ur, dl, dr] = self.values();
        let denom = ur + dl - dr - ul;
        if denom == 0.0 {
            return None;
        }
        Some((dl * ur - dr * ul) / denom)
    }

    /// Center of the hyperbola traced by the bilinear interpolant's isolines.
    ///
    /// The saddle sits at the parametric position
    ///
    /// ```text
    ///   s = (DL − UL) / D     (left → right)
    ///   t = (DL − DR) / D     (down → up)
    ///   D = UR + DL − DR − UL
    /// ```
    ///
    /// which is then mapped onto the corner positions. Falls back to the cell center
    /// when `D` is zero.
    pub fn hyperbola_center(&self) -> Point {
        let [ul, ur, dl, dr] = self.values();
        let denom = ur + dl - dr - ul;
        let (s, t) = if denom == 0.0 {
            (0.5, 0.5)
        } else {
            ((dl - ul) / denom, (dl - dr) / denom)
        };
        Point::new(
            lerp(self.down_left.pos.x, self.down_right.pos.x, s),
            lerp(self.down_left.pos.y, self.up_left.pos.y, t),
        )
    }

    fn values(&self) -> [Value; 4] {
        [
            self.up_left.value as Value,
            self.up_right.value as Value,
            self.down_left.value as Value,
            self.down_right.value as Value,
        ]
    }
}
