//! Top-down TIN refinement
//!
//! Greedy insertion in the manner of Fjallstrom's terrain approximation
//! algorithm: start from the four corner points, repeatedly promote the
//! worst-estimated sample to a vertex, and retriangulate until every
//! remaining sample interpolates within the error bound. Insertion is fast
//! when few vertices are needed, i.e. for loose error bounds.

use std::cmp::Ordering;

use priority_queue::PriorityQueue;
use terratin_core::{Error, Grid, PointId, Raster, Result};

use crate::cancel::CancelFlag;
use crate::tin::Tin;

/// Priority of an estimated point awaiting promotion.
#[derive(Debug, Clone, Copy)]
struct InsertionPriority {
    error: f64,
    id: PointId,
}

impl PartialEq for InsertionPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for InsertionPriority {}

impl PartialOrd for InsertionPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InsertionPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on error; ties pop the lower point id first
        self.error
            .total_cmp(&other.error)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Convert a raster to a TIN by refinement from the corner points.
///
/// On return every non-vertex point interpolates within `max_error` of its
/// sample value.
pub fn fjallstrom_convert(raster: &Raster, max_error: f64) -> Result<(Tin, Grid)> {
    fjallstrom_convert_cancellable(raster, max_error, &CancelFlag::new())
}

pub(crate) fn fjallstrom_convert_cancellable(
    raster: &Raster,
    max_error: f64,
    cancel: &CancelFlag,
) -> Result<(Tin, Grid)> {
    crate::validate_args(raster, max_error)?;

    let mut grid = Grid::from_raster(raster);
    let corners = grid.corner_ids();
    let mut vertices: Vec<PointId> = corners.to_vec();

    // Everything but the corners starts out estimated
    let estimated: Vec<PointId> = grid
        .point_ids()
        .filter(|id| !corners.contains(id))
        .collect();

    let mut tin = Tin::new(vertices.clone(), &grid)?;
    tin.distribute_points(&mut grid, &estimated, None)?;

    let mut queue: PriorityQueue<PointId, InsertionPriority> = estimated
        .iter()
        .map(|&id| {
            (
                id,
                InsertionPriority {
                    error: grid.point(id).error,
                    id,
                },
            )
        })
        .collect();

    while let Some((worst, priority)) = queue.pop() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        // Loop invariant: the maximum bounds every remaining error
        if priority.error <= max_error {
            break;
        }

        vertices.push(worst);
        grid.point_mut(worst).reset_error();

        let old_tin = std::mem::replace(&mut tin, Tin::new(vertices.clone(), &grid)?);
        let diff = tin.inherit_unchanged(&old_tin)?;
        tin.distribute_points(&mut grid, &diff.changed_points, Some(worst))?;

        for id in diff.changed_points {
            if id != worst {
                queue.change_priority(
                    &id,
                    InsertionPriority {
                        error: grid.point(id).error,
                        id,
                    },
                );
            }
        }
    }

    Ok((tin, grid))
}
