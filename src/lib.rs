pub mod ascii;
pub mod cell;
pub mod color;
pub mod error;
pub mod field;
pub mod filter;
pub mod image;
pub mod interp;
pub mod isoline;
pub mod mesh;
pub mod plugin;
pub mod types;

pub use field::{Field, ScalarField};
pub use isoline::{Decider, Isoline, extract};
pub use plugin::MarchingSquaresPlugin;
