//! Grid arena of sample points

use crate::point::{PointId, SamplePoint};
use crate::raster::Raster;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Arena of sample points built once from a raster.
///
/// The grid owns every `SamplePoint` for the lifetime of a conversion; TIN
/// snapshots reference points by `PointId` and write interpolation state
/// back through the arena, so there is a single owner for all mutable
/// point state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    points: Vec<SamplePoint>,
}

impl Grid {
    /// Build one sample point per raster cell
    pub fn from_raster(raster: &Raster) -> Self {
        let points = raster
            .cells()
            .map(|(x, y, value)| SamplePoint::new(x as u32, y as u32, value))
            .collect();
        Self {
            width: raster.width(),
            height: raster.height(),
            points,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of sample points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arena index of the point at the given coordinates
    pub fn id_at(&self, x: usize, y: usize) -> Result<PointId> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x * self.height + y)
    }

    /// Point at the given coordinates
    pub fn get(&self, x: usize, y: usize) -> Result<&SamplePoint> {
        let id = self.id_at(x, y)?;
        Ok(&self.points[id])
    }

    pub fn point(&self, id: PointId) -> &SamplePoint {
        &self.points[id]
    }

    pub fn point_mut(&mut self, id: PointId) -> &mut SamplePoint {
        &mut self.points[id]
    }

    /// All point ids in coordinate order
    pub fn point_ids(&self) -> std::ops::Range<PointId> {
        0..self.points.len()
    }

    /// The four extreme-coordinate points. These anchor every triangulation
    /// and are never removed.
    pub fn corner_ids(&self) -> [PointId; 4] {
        [
            0,
            self.height - 1,
            (self.width - 1) * self.height,
            self.width * self.height - 1,
        ]
    }

    /// Mean interpolation error over all points; zero before any conversion
    pub fn average_error(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let total: f64 = self.points.iter().map(|point| point.error).sum();
        total / self.points.len() as f64
    }

    /// Rebuild a raster from the current point state, substituting the
    /// interpolation estimate for any point carrying a nonzero error.
    pub fn to_raster(&self) -> Raster {
        let data = self
            .points
            .iter()
            .map(|point| {
                if point.error > 0.0 {
                    point.estimate
                } else {
                    point.value
                }
            })
            .collect();
        Raster::from_raw(self.width, self.height, data)
    }
}
