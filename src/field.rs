use std::sync::Arc;

use bevy::prelude::*;
use ndarray::Array2;

use crate::{
    error::{MarchingSquaresError, Result},
    interp::{to_grid_index, to_normalized},
    isoline::Decider,
    types::{CompiledFunction, Intensity, Point},
};

/// Read-only access to a 2D grid of 8-bit samples.
///
/// Column `x` runs left to right and row `y` runs bottom to top, so row `0`
/// corresponds to `y = -1` in normalized space.
pub trait ScalarField {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// Returns the sample at column `x`, row `y`.
    fn sample(&self, x: usize, y: usize) -> Intensity;

    /// Samples the grid cell containing the normalized point `p`.
    ///
    /// ```text
    ///  x = floor((p.x + 1) / 2 * width)    clamped to width - 1
    ///  y = floor((p.y + 1) / 2 * height)   clamped to height - 1
    /// ```
    fn sample_at(&self, p: Point) -> Intensity {
        self.sample(
            to_grid_index(p.x, self.width()),
            to_grid_index(p.y, self.height()),
        )
    }
}

/// `values[[y, x]]`
impl ScalarField for Array2<Intensity> {
    fn width(&self) -> usize {
        self.ncols()
    }

    fn height(&self) -> usize {
        self.nrows()
    }

    fn sample(&self, x: usize, y: usize) -> Intensity {
        self[[y, x]]
    }
}

/// A scalar field together with the isoline parameters used to contour it.
///
/// Values are stored as `values[[y, x]]`, `height × width`.
///
/// `values` is wrapped in an [`Arc`] so the async extraction task can hold a reference
/// to the grid without copying it.
#[derive(Component, Clone)]
#[require(Transform)]
pub struct Field {
    /// Scalar samples, indexed `[[y, x]]`.
    pub values: Arc<Array2<Intensity>>,
    /// Isoline threshold. Samples ≥ isovalue are "above".
    pub isovalue: Intensity,
    /// Strategy used for saddle cells.
    pub decider: Decider,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            values: Arc::new(Array2::zeros((0, 0))),
            isovalue: 128,
            decider: Decider::default(),
        }
    }
}

impl Field {
    /// Creates a `width × height` field with all samples set to `0`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            values: Arc::new(Array2::zeros((height, width))),
            ..Default::default()
        }
    }

    /// Wraps an existing `[[y, x]]` array.
    pub fn from_array(values: Array2<Intensity>) -> Self {
        Self {
            values: Arc::new(values),
            ..Default::default()
        }
    }

    /// Builds a field from row-major samples, bottom row first.
    ///
    /// Returns [`MarchingSquaresError::SizeMismatch`] if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<Intensity>) -> Result<Self> {
        let expected = width * height;
        let actual = data.len();
        let values = Array2::from_shape_vec((height, width), data)
            .map_err(|_| MarchingSquaresError::SizeMismatch { expected, actual })?;
        Ok(Self::from_array(values))
    }

    /// Sets the isoline threshold.
    pub fn with_isovalue(mut self, isovalue: Intensity) -> Self {
        self.isovalue = isovalue;
        self
    }

    /// Sets the saddle-cell strategy.
    pub fn with_decider(mut self, decider: Decider) -> Self {
        self.decider = decider;
        self
    }

    /// Returns a mutable reference to the inner values grid.
    ///
    /// If the Arc is shared this will clone the data first (copy-on-write).
    fn values_mut(&mut self) -> &mut Array2<Intensity> {
        Arc::make_mut(&mut self.values)
    }

    /// Calls `f(x, y, &mut value)` for every sample in the grid.
    pub fn for_each_sample<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut Intensity),
    {
        for ((y, x), value) in self.values_mut().indexed_iter_mut() {
            f(x, y, value);
        }
    }

    /// Fills the field by evaluating `function` at every sample's normalized position.
    pub fn fill(mut self, function: &CompiledFunction) -> Self {
        let (width, height) = (self.width(), self.height());
        self.for_each_sample(|x, y, value| {
            *value = function(Point::new(
                to_normalized(x, width),
                to_normalized(y, height),
            ));
        });
        self
    }

    /// Returns the sample at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Intensity {
        self.values[[y, x]]
    }

    /// Sets the sample at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, v: Intensity) {
        self.values_mut()[[y, x]] = v
    }
}

impl ScalarField for Field {
    fn width(&self) -> usize {
        self.values.ncols()
    }

    fn height(&self) -> usize {
        self.values.nrows()
    }

    fn sample(&self, x: usize, y: usize) -> Intensity {
        self.values[[y, x]]
    }
}
