//! Geometric primitives for cross-sections

pub mod polygon;
pub mod region;

pub use polygon::{Polygon, PolygonIntegrals};
pub use region::{Inclusion, MatrixRegion};
