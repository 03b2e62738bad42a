//! Raster-to-TIN conversion algorithms
//!
//! This crate converts rectangular elevation rasters into triangulated
//! irregular networks bounded by a caller-specified maximum relative
//! interpolation error:
//! - Fjallstrom refinement: grow the mesh top-down from the corner points
//! - Lee decimation: shrink the mesh bottom-up from the full point set
//! - A racing combinator that runs both and keeps the faster result

pub mod cancel;
pub mod combined;
pub mod fjallstrom;
pub mod lee;
pub mod tin;

pub use cancel::*;
pub use combined::*;
pub use fjallstrom::*;
pub use lee::*;
pub use tin::*;

use terratin_core::{Error, Raster, Result};

/// Shared precondition checks for all conversion entry points.
///
/// Fails before any triangulation work is started.
pub(crate) fn validate_args(raster: &Raster, max_error: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&max_error) {
        return Err(Error::InvalidArgument(format!(
            "max_error must be within [0, 1], got {max_error}"
        )));
    }
    if raster.width() < 2 || raster.height() < 2 {
        return Err(Error::InvalidArgument(format!(
            "raster must have at least 2x2 extent, got {}x{}",
            raster.width(),
            raster.height()
        )));
    }
    Ok(())
}
