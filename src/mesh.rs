use bevy::prelude::*;

use crate::{
    error::{MarchingSquaresError, Result},
    isoline::Isoline,
};

/// Line-list geometry produced from an [`Isoline`], ready to upload.
///
/// Vertices are stored flat: every two consecutive vertices form one segment, and
/// `indices` simply counts them up. Positions are `[x, y, 0]` in normalized space.
#[derive(Component, Clone, Debug, Default)]
pub struct GeneratedIsoline {
    /// Flat list of vertex positions: `[[x, y, 0], ...]`
    pub vertices: Vec<[f32; 3]>,

    /// Sequential line indices: `[0, 1, 2, 3, ...]`
    pub indices: Vec<u32>,
}

impl GeneratedIsoline {
    /// Lifts `isoline` to 3D positions and numbers its vertices.
    pub fn build(isoline: &Isoline) -> Self {
        let vertices = isoline.to_positions();
        let indices = (0..vertices.len() as u32).collect();
        Self { vertices, indices }
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }

    /// Returns the two endpoint positions of segment `segment`.
    ///
    /// Returns [`MarchingSquaresError::SizeMismatch`] if `segment` is out of bounds.
    pub fn segment_coords(&self, segment: usize) -> Result<[[f32; 3]; 2]> {
        let end = 2 * segment + 1;
        if end >= self.indices.len() {
            return Err(MarchingSquaresError::SizeMismatch {
                expected: end + 1,
                actual: self.indices.len(),
            });
        }
        let a = self.vertices[self.indices[end - 1] as usize];
        let b = self.vertices[self.indices[end] as usize];
        Ok([a, b])
    }
}
