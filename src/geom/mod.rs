//! Compound payload types: geometry records, render mesh settings and
//! opaque objects.

mod geometry;
mod mesh_parameters;
mod object;

pub use geometry::*;
pub use mesh_parameters::*;
pub use object::*;
