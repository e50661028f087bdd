use nalgebra::Point2;

/// Coordinate and interpolation scalar.
pub type Value = f32;

/// An 8-bit field sample or image channel value.
pub type Intensity = u8;

/// A 2D point in normalized `[-1, 1]` space with [`Value`] components.
pub type Point = Point2<Value>;

/// A sampling function: maps a normalized [`Point`] to an [`Intensity`].
pub type CompiledFunction = dyn Fn(Point) -> Intensity + Sync;
