//! Bottom-up TIN decimation
//!
//! Implements the point-removal strategy from "Coverage and Visibility
//! Problems on Topographic Surfaces" by Jay Lee: start with every sample as
//! a vertex and repeatedly drop the vertex whose removal disturbs the
//! surface least, until any further removal would exceed the error bound.
//! Decimation is fast when little must be removed, i.e. for tight error
//! bounds.

use std::cmp::Ordering;

use priority_queue::PriorityQueue;
use terratin_core::{Error, Grid, PointId, Raster, Result};

use crate::cancel::CancelFlag;
use crate::tin::Tin;

/// Priority of a vertex awaiting removal.
#[derive(Debug, Clone, Copy)]
struct RemovalPriority {
    error: f64,
    id: PointId,
}

impl PartialEq for RemovalPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for RemovalPriority {}

impl PartialOrd for RemovalPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RemovalPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on removal error; ties pop the lower point id first
        other
            .error
            .total_cmp(&self.error)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Convert a raster to a TIN by decimation from the full point set.
///
/// On return, removing any surviving non-corner vertex would introduce an
/// interpolation error of at least `max_error`.
pub fn lee_convert(raster: &Raster, max_error: f64) -> Result<(Tin, Grid)> {
    lee_convert_cancellable(raster, max_error, &CancelFlag::new())
}

pub(crate) fn lee_convert_cancellable(
    raster: &Raster,
    max_error: f64,
    cancel: &CancelFlag,
) -> Result<(Tin, Grid)> {
    crate::validate_args(raster, max_error)?;

    let mut grid = Grid::from_raster(raster);

    // Every sample starts out as a vertex; the corners are never candidates
    let mut vertices: Vec<PointId> = grid.point_ids().collect();
    let mut tin = Tin::new(vertices.clone(), &grid)?;

    let mut queue: PriorityQueue<PointId, RemovalPriority> = PriorityQueue::new();
    for (id, error) in tin.hypothetical_errors(&grid, grid.point_ids())? {
        queue.push(id, RemovalPriority { error, id });
    }

    while let Some((best, priority)) = queue.pop() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        // No remaining vertex can be removed within the bound
        if priority.error >= max_error {
            break;
        }

        vertices.retain(|&id| id != best);

        let old_tin = std::mem::replace(&mut tin, Tin::new(vertices.clone(), &grid)?);
        let mut diff = tin.inherit_unchanged(&old_tin)?;
        diff.changed_points.push(best);
        tin.distribute_points(&mut grid, &diff.changed_points, None)?;

        // A vertex's removal cost depends only on its adjacency, and
        // adjacency only changes where triangles were destroyed
        let affected: Vec<PointId> = diff
            .affected_vertices
            .iter()
            .copied()
            .filter(|&id| tin.is_vertex(id))
            .collect();
        for (id, error) in tin.hypothetical_errors(&grid, affected)? {
            queue.change_priority(&id, RemovalPriority { error, id });
        }
    }

    Ok((tin, grid))
}
