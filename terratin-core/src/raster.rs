//! Raster containers

use crate::{Error, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A rectangular grid of elevation samples.
///
/// The first index runs over rows of the input (`x`), the second over
/// columns (`y`); `width` is the number of rows and `height` the number of
/// columns, matching the sample-point coordinates used throughout the
/// conversion algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Raster {
    /// Build a raster from rows of samples; all rows must have equal length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Error::InvalidArgument(
                "raster must contain at least one sample".to_string(),
            ));
        }
        if !rows.iter().map(|row| row.len()).all_equal() {
            return Err(Error::InvalidArgument(
                "raster rows must all have the same length".to_string(),
            ));
        }

        let width = rows.len();
        let height = rows[0].len();
        let data = rows.iter().flatten().copied().collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster from a flat x-major sample buffer
    pub fn from_shape(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(Error::InvalidArgument(format!(
                "sample buffer of length {} does not fill a {}x{} raster",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<f64>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of rows
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of columns
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample value at the given cell
    pub fn get(&self, x: usize, y: usize) -> Result<f64> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.data[x * self.height + y])
    }

    /// Iterate all cells in x-major order as `(x, y, value)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i / self.height, i % self.height, value))
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let raster = Raster::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.get(0, 1).unwrap(), 2.0);
        assert_eq!(raster.get(1, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = Raster::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert!(Raster::from_rows(&[]).is_err());
        assert!(Raster::from_rows(&[vec![]]).is_err());
    }

    #[test]
    fn test_from_shape_rejects_mismatch() {
        let result = Raster::from_shape(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let raster = Raster::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(matches!(raster.get(2, 0), Err(Error::OutOfBounds { .. })));
        assert!(matches!(raster.get(0, 2), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_cells_order() {
        let raster = Raster::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let cells: Vec<_> = raster.cells().collect();
        assert_eq!(
            cells,
            vec![(0, 0, 1.0), (0, 1, 2.0), (1, 0, 3.0), (1, 1, 4.0)]
        );
    }
}
