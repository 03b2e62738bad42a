//! Core data structures for terratin
//!
//! This crate provides the fundamental types for raster-to-TIN conversion:
//! rasters, sample points, the grid arena that owns them, and the shared
//! error taxonomy.

pub mod error;
pub mod grid;
pub mod point;
pub mod raster;

pub use error::*;
pub use grid::*;
pub use point::*;
pub use raster::*;
