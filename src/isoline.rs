use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    cell::{Axis, Cell, CellCase, Corner, sign},
    field::ScalarField,
    types::{Intensity, Point, Value},
};

/// Strategy used to pair the four crossings of a saddle cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Decider {
    /// Classify the mean of the four corners against the isovalue.
    #[default]
    Midpoint,
    /// Compare the left crossing with the center of the bilinear hyperbola.
    Asymptotic,
}

impl Decider {
    pub fn from_asymptotic(use_asymptotic: bool) -> Self {
        if use_asymptotic {
            Decider::Asymptotic
        } else {
            Decider::Midpoint
        }
    }

    /// The other strategy.
    pub fn toggled(self) -> Self {
        match self {
            Decider::Midpoint => Decider::Asymptotic,
            Decider::Asymptotic => Decider::Midpoint,
        }
    }
}

/// Line-list output of [`extract`].
///
/// Vertices are stored flat: every two consecutive vertices form one segment:
/// ```text
/// vertices = [a0, b0,  a1, b1,  ...]
///             \seg0/   \seg1/
/// ```
/// Coordinates are in normalized `[-1, 1]` space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Isoline {
    vertices: Vec<Point>,
}

impl Isoline {
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over `(start, end)` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.vertices.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Vertex positions lifted to `z = 0`, ready for a line-list mesh.
    pub fn to_positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|p| [p.x, p.y, 0.0]).collect()
    }

    fn push_segment(&mut self, a: Point, b: Point) {
        self.vertices.push(a);
        self.vertices.push(b);
    }
}

/// Extracts the isoline of `field` at `isovalue` using marching squares.
///
/// Cells span neighbouring sample centers; a `w × h` field has `(w - 1) × (h - 1)`
/// cells, so anything narrower than 2 samples on either axis yields an empty isoline.
///
/// ```text
/// Per cell:
/// 1. Cell::sample     →  4 corner positions and values
/// 2. Cell::classify   →  Uniform | SingleCorner | EdgeAligned | Saddle
/// 3. march_cell       →  0, 1 or 2 segments appended in case order
/// ```
///
/// Rows are processed in parallel with Rayon and merged bottom to top, so the vertex
/// order matches a sequential row-by-row, left-to-right traversal.
pub fn extract<F>(field: &F, isovalue: Intensity, decider: Decider) -> Isoline
where
    F: ScalarField + Sync + ?Sized,
{
    let (width, height) = (field.width(), field.height());
    if width < 2 || height < 2 {
        tracing::debug!(width, height, "field too small for marching squares");
        return Isoline::new_empty();
    }

    let half_extent = [1.0 / width as Value, 1.0 / height as Value];

    let per_row: Vec<Isoline> = (0..height - 1)
        .into_par_iter()
        .map(|y| {
            let mut local = Isoline::new_empty();
            let center_y = -1.0 + 2.0 * (y + 1) as Value / height as Value;

            for x in 0..width - 1 {
                let center_x = -1.0 + 2.0 * (x + 1) as Value / width as Value;
                let cell = Cell::sample(field, Point::new(center_x, center_y), half_extent);
                march_cell(&cell, isovalue, decider, &mut local);
            }
            local
        })
        .collect();

    // Merge per-row segments into a single vertex buffer
    let total: usize = per_row.iter().map(|row| row.vertices.len()).sum();
    let mut isoline = Isoline {
        vertices: Vec::with_capacity(total),
    };
    for mut row in per_row {
        isoline.vertices.append(&mut row.vertices);
    }

    tracing::debug!(
        width,
        height,
        isovalue,
        ?decider,
        segments = isoline.len(),
        "extracted isoline"
    );
    isoline
}

/// Appends the segments of a single cell to `out`.
pub fn march_cell(cell: &Cell, isovalue: Intensity, decider: Decider, out: &mut Isoline) {
    use Corner::*;

    let cross = |a, b| cell.crossing(a, b, isovalue);

    match cell.classify(isovalue) {
        CellCase::Uniform => {}
        CellCase::SingleCorner(lone) => {
            // top-row corners start on the top edge, bottom-row corners on their side edge
            let (first, second) = match lone {
                UpLeft => (UpRight, DownLeft),
                UpRight => (UpLeft, DownRight),
                DownLeft => (UpLeft, DownRight),
                DownRight => (UpRight, DownLeft),
            };
            out.push_segment(cross(lone, first), cross(lone, second));
        }
        CellCase::EdgeAligned(Axis::Horizontal) => {
            out.push_segment(cross(UpLeft, DownLeft), cross(UpRight, DownRight));
        }
        CellCase::EdgeAligned(Axis::Vertical) => {
            out.push_segment(cross(UpLeft, UpRight), cross(DownLeft, DownRight));
        }
        CellCase::Saddle => {
            let top = cross(UpLeft, UpRight);
            let right = cross(UpRight, DownRight);
            let bottom = cross(DownLeft, DownRight);
            let left = cross(UpLeft, DownLeft);

            match decider {
                Decider::Asymptotic => {
                    let center = cell.hyperbola_center();
                    tracing::trace!(?center, "asymptotic decider");
                    if left.y < center.y {
                        out.push_segment(left, bottom);
                        out.push_segment(right, top);
                    } else {
                        out.push_segment(left, top);
                        out.push_segment(right, bottom);
                    }
                }
                Decider::Midpoint => {
                    let mid = if cell.mean() < isovalue as Value { -1 } else { 1 };
                    if mid == sign(cell.up_left.value, isovalue) {
                        out.push_segment(top, right);
                        out.push_segment(left, bottom);
                    } else {
                        out.push_segment(top, left);
                        out.push_segment(right, bottom);
                    }
                }
            }
        }
    }
}
