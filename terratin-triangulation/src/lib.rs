//! Planar triangulation oracle for terratin
//!
//! Wraps a Delaunay triangulation behind the small query surface the
//! conversion algorithms need: simplex listing, point location, and vertex
//! adjacency, all answered in terms of the caller's input indices.

pub mod delaunay;

pub use delaunay::*;
