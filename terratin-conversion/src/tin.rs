//! TIN snapshots and incremental bookkeeping
//!
//! A `Tin` is one triangulation snapshot: the vertex point set, the
//! Delaunay result over it, and a map from canonical triangle key to the
//! triangle's assigned member points. Snapshots are rebuilt on every vertex
//! change; the triangle-set diff between consecutive snapshots limits error
//! recomputation to the points whose containing triangle was actually
//! destroyed.

use std::collections::HashMap;

use nalgebra::Matrix3;
use rayon::prelude::*;
use terratin_core::{relative_error, Error, Grid, PointId, Result, SamplePoint};
use terratin_triangulation::Delaunay;

/// Below this many points the locate/estimate phase runs sequentially
const PARALLEL_THRESHOLD: usize = 64;

/// Canonical order-independent identity of a triangle.
///
/// The same geometric triangle produces the same key across snapshots, so
/// keys from two different triangulations are directly comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleKey([(u32, u32); 3]);

impl TriangleKey {
    pub fn new(mut corners: [(u32, u32); 3]) -> Self {
        corners.sort_unstable();
        Self(corners)
    }

    fn of(grid: &Grid, vertices: [PointId; 3]) -> Self {
        Self::new(vertices.map(|id| {
            let point = grid.point(id);
            (point.x, point.y)
        }))
    }
}

/// A triangle of the TIN: three vertex points plus the non-vertex points
/// currently assigned to it.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [PointId; 3],
    pub members: Vec<PointId>,
}

/// One triangulation snapshot over a grid's point arena.
pub struct Tin {
    vertex_ids: Vec<PointId>,
    /// Delaunay input position of each vertex id
    vertex_slots: HashMap<PointId, usize>,
    delaunay: Delaunay,
    triangles: HashMap<TriangleKey, Triangle>,
}

impl Tin {
    /// Triangulate the given vertex set and build the triangle map.
    ///
    /// The vertex set must contain at least 3 non-collinear points; keeping
    /// the 4 grid corners in every set guarantees this.
    pub fn new(vertex_ids: Vec<PointId>, grid: &Grid) -> Result<Self> {
        let coords: Vec<(f64, f64)> = vertex_ids
            .iter()
            .map(|&id| grid.point(id).coords())
            .collect();
        let delaunay = Delaunay::triangulate(&coords)?;

        let mut triangles = HashMap::with_capacity(delaunay.simplices().len());
        for &[a, b, c] in delaunay.simplices() {
            let vertices = [vertex_ids[a], vertex_ids[b], vertex_ids[c]];
            triangles.insert(
                TriangleKey::of(grid, vertices),
                Triangle {
                    vertices,
                    members: Vec::new(),
                },
            );
        }

        let vertex_slots = vertex_ids
            .iter()
            .enumerate()
            .map(|(slot, &id)| (id, slot))
            .collect();

        Ok(Self {
            vertex_ids,
            vertex_slots,
            delaunay,
            triangles,
        })
    }

    /// Number of triangulated vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_ids.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the given point is a vertex of this snapshot
    pub fn is_vertex(&self, id: PointId) -> bool {
        self.vertex_slots.contains_key(&id)
    }

    /// Ids of all triangulated vertices, in triangulation input order
    pub fn vertex_ids(&self) -> &[PointId] {
        &self.vertex_ids
    }

    /// Iterate all triangles with their canonical keys
    pub fn triangles(&self) -> impl Iterator<Item = (&TriangleKey, &Triangle)> {
        self.triangles.iter()
    }

    pub fn get_triangle(&self, key: &TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    /// Assign each listed point to its containing triangle and recompute its
    /// interpolation estimate and error through the grid arena.
    ///
    /// `skip` excludes a point that just became a vertex. The locate and
    /// estimate work is pure per point and runs in parallel for large
    /// batches; arena writes are applied sequentially in input order.
    pub fn distribute_points(
        &mut self,
        grid: &mut Grid,
        ids: &[PointId],
        skip: Option<PointId>,
    ) -> Result<()> {
        let work: Vec<PointId> = ids.iter().copied().filter(|&id| Some(id) != skip).collect();

        let arena: &Grid = grid;
        let locate_one = |&id: &PointId| -> Result<(PointId, TriangleKey, f64)> {
            let point = arena.point(id);
            let (x, y) = point.coords();
            let simplex = self.delaunay.locate(x, y)?;
            let vertices = simplex.map(|slot| self.vertex_ids[slot]);
            let corners = vertices.map(|vertex| arena.point(vertex));
            let estimate = estimate_in_triangle(point, corners);
            Ok((id, TriangleKey::of(arena, vertices), estimate))
        };

        let located: Vec<(PointId, TriangleKey, f64)> = if work.len() < PARALLEL_THRESHOLD {
            work.iter().map(locate_one).collect::<Result<_>>()?
        } else {
            work.par_iter().map(locate_one).collect::<Result<_>>()?
        };

        for (id, key, estimate) in located {
            let triangle = self.triangles.get_mut(&key).ok_or_else(|| {
                let point = grid.point(id);
                Error::TriangleNotFound(format!(
                    "located triangle for ({}, {}) is missing from the snapshot",
                    point.x, point.y
                ))
            })?;
            triangle.members.push(id);
            grid.point_mut(id).set_estimate(estimate);
        }
        Ok(())
    }

    /// Vertex points sharing a triangulation edge with the given vertex
    pub fn vertex_neighbors(&self, id: PointId) -> Result<Vec<PointId>> {
        let slot = self.vertex_slots.get(&id).copied().ok_or_else(|| {
            Error::InvalidArgument(format!("point {id} is not a vertex of this TIN"))
        })?;
        let neighbors = self.delaunay.neighbors(slot)?;
        Ok(neighbors
            .into_iter()
            .map(|slot| self.vertex_ids[slot])
            .collect())
    }

    /// Error the given vertex would incur if demoted to a non-vertex.
    ///
    /// Builds a local triangulation of the vertex's current neighbors,
    /// locates the vertex inside it, and interpolates, without mutating the
    /// live snapshot or the arena. `None` marks a vertex whose neighborhood
    /// cannot be retriangulated; such a vertex is not removable.
    pub fn hypothetical_error(&self, grid: &Grid, id: PointId) -> Result<Option<f64>> {
        let neighbors = self.vertex_neighbors(id)?;
        if neighbors.len() < 3 {
            return Ok(None);
        }

        let coords: Vec<(f64, f64)> = neighbors
            .iter()
            .map(|&neighbor| grid.point(neighbor).coords())
            .collect();
        let local = match Delaunay::triangulate(&coords) {
            Ok(local) => local,
            Err(Error::Geometry(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let point = grid.point(id);
        let (x, y) = point.coords();
        let simplex = match local.locate(x, y) {
            Ok(simplex) => simplex,
            Err(Error::TriangleNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let corners = simplex.map(|slot| grid.point(neighbors[slot]));
        let estimate = estimate_in_triangle(point, corners);
        Ok(Some(relative_error(point.value, estimate)))
    }

    /// Hypothetical removal errors for the given vertices, skipping the four
    /// corner points, which are never removable.
    ///
    /// Vertices whose neighborhood cannot be retriangulated are pinned in
    /// place with an infinite removal cost.
    pub fn hypothetical_errors(
        &self,
        grid: &Grid,
        ids: impl IntoIterator<Item = PointId>,
    ) -> Result<Vec<(PointId, f64)>> {
        let corners = grid.corner_ids();
        let mut errors = Vec::new();
        for id in ids {
            if corners.contains(&id) {
                continue;
            }
            let error = self.hypothetical_error(grid, id)?.unwrap_or(f64::INFINITY);
            errors.push((id, error));
        }
        Ok(errors)
    }

    /// Substitute the triangle stored under `key`, carrying its member
    /// assignments into this snapshot.
    pub fn replace_triangle(&mut self, key: TriangleKey, triangle: Triangle) -> Result<()> {
        match self.triangles.get_mut(&key) {
            Some(slot) => {
                *slot = triangle;
                Ok(())
            }
            None => Err(Error::TriangleNotFound(format!(
                "no triangle under key {key:?} in this snapshot"
            ))),
        }
    }

    /// Reconcile this fresh snapshot against the previous one.
    ///
    /// Triangles whose vertex triple survived the vertex change are carried
    /// forward with their member assignments intact. The diff reports the
    /// members of every destroyed triangle (the only points whose estimates
    /// must be recomputed) and the vertices incident to a destroyed
    /// triangle (the only vertices whose adjacency can have changed).
    pub fn inherit_unchanged(&mut self, old: &Tin) -> Result<SnapshotDiff> {
        let mut changed_points = Vec::new();
        let mut affected_vertices = Vec::new();
        for (key, triangle) in &old.triangles {
            if self.triangles.contains_key(key) {
                self.replace_triangle(*key, triangle.clone())?;
            } else {
                changed_points.extend_from_slice(&triangle.members);
                affected_vertices.extend_from_slice(&triangle.vertices);
            }
        }
        // Map iteration order is arbitrary; keep downstream work deterministic
        changed_points.sort_unstable();
        affected_vertices.sort_unstable();
        affected_vertices.dedup();
        Ok(SnapshotDiff {
            changed_points,
            affected_vertices,
        })
    }
}

/// Outcome of reconciling a fresh snapshot against its predecessor.
#[derive(Debug, Clone)]
pub struct SnapshotDiff {
    /// Members of destroyed triangles, in need of redistribution
    pub changed_points: Vec<PointId>,
    /// Vertices of destroyed triangles, whose adjacency may have changed
    pub affected_vertices: Vec<PointId>,
}

/// Barycentric interpolation of a point's value inside a triangle.
///
/// Each vertex is weighted by the signed area of the sub-triangle opposite
/// it, normalized by the full triangle area; signs cancel, so vertex
/// orientation does not matter.
fn estimate_in_triangle(point: &SamplePoint, corners: [&SamplePoint; 3]) -> f64 {
    let [t1, t2, t3] = corners;
    let total = signed_area(t1, t2, t3);
    let w1 = signed_area(point, t2, t3) / total;
    let w2 = signed_area(point, t3, t1) / total;
    let w3 = signed_area(point, t1, t2) / total;
    w1 * t1.value + w2 * t2.value + w3 * t3.value
}

/// Signed area of the triangle spanned by three sample points
fn signed_area(p1: &SamplePoint, p2: &SamplePoint, p3: &SamplePoint) -> f64 {
    let m = Matrix3::new(
        p1.x as f64,
        p2.x as f64,
        p3.x as f64,
        p1.y as f64,
        p2.y as f64,
        p3.y as f64,
        1.0,
        1.0,
        1.0,
    );
    0.5 * m.determinant()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terratin_core::Raster;

    /// 3x3 affine surface: value = 1 + 3x + y
    fn affine_grid() -> Grid {
        let raster =
            Raster::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]])
                .unwrap();
        Grid::from_raster(&raster)
    }

    fn non_corner_ids(grid: &Grid) -> Vec<PointId> {
        let corners = grid.corner_ids();
        grid.point_ids().filter(|id| !corners.contains(id)).collect()
    }

    #[test]
    fn test_triangle_key_is_order_independent() {
        let a = TriangleKey::new([(0, 0), (2, 0), (1, 2)]);
        let b = TriangleKey::new([(1, 2), (0, 0), (2, 0)]);
        let c = TriangleKey::new([(2, 0), (1, 2), (0, 0)]);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_corner_tin_has_two_triangles() {
        let grid = affine_grid();
        let tin = Tin::new(grid.corner_ids().to_vec(), &grid).unwrap();
        assert_eq!(tin.vertex_count(), 4);
        assert_eq!(tin.triangle_count(), 2);
    }

    #[test]
    fn test_distribute_points_affine_errors_vanish() {
        let mut grid = affine_grid();
        let estimated = non_corner_ids(&grid);
        let mut tin = Tin::new(grid.corner_ids().to_vec(), &grid).unwrap();
        tin.distribute_points(&mut grid, &estimated, None).unwrap();

        for &id in &estimated {
            let point = grid.point(id);
            assert_relative_eq!(point.estimate, point.value, epsilon = 1e-9);
            assert!(
                point.error < 1e-12,
                "affine surface must interpolate exactly, point {id} had error {}",
                point.error
            );
        }
    }

    #[test]
    fn test_distribute_points_assigns_every_point_once() {
        let mut grid = affine_grid();
        let estimated = non_corner_ids(&grid);
        let mut tin = Tin::new(grid.corner_ids().to_vec(), &grid).unwrap();
        tin.distribute_points(&mut grid, &estimated, None).unwrap();

        let mut assigned: Vec<PointId> = tin
            .triangles()
            .flat_map(|(_, triangle)| triangle.members.iter().copied())
            .collect();
        assigned.sort_unstable();
        assert_eq!(assigned, estimated);
    }

    #[test]
    fn test_distribute_points_respects_skip() {
        let mut grid = affine_grid();
        let estimated = non_corner_ids(&grid);
        let center = grid.id_at(1, 1).unwrap();
        let mut tin = Tin::new(grid.corner_ids().to_vec(), &grid).unwrap();
        tin.distribute_points(&mut grid, &estimated, Some(center))
            .unwrap();

        let assigned: usize = tin.triangles().map(|(_, t)| t.members.len()).sum();
        assert_eq!(assigned, estimated.len() - 1);
    }

    #[test]
    fn test_hypothetical_error_affine_center() {
        let grid = affine_grid();
        let tin = Tin::new(grid.point_ids().collect(), &grid).unwrap();
        let center = grid.id_at(1, 1).unwrap();

        let error = tin.hypothetical_error(&grid, center).unwrap();
        assert!(error.is_some());
        assert!(error.unwrap_or(f64::INFINITY) < 1e-12);
    }

    #[test]
    fn test_hypothetical_errors_skip_corners() {
        let grid = affine_grid();
        let tin = Tin::new(grid.point_ids().collect(), &grid).unwrap();
        let errors = tin
            .hypothetical_errors(&grid, grid.point_ids())
            .unwrap();

        let corners = grid.corner_ids();
        assert_eq!(errors.len(), grid.len() - corners.len());
        for (id, error) in errors {
            assert!(!corners.contains(&id));
            assert!(error < 1e-12 || error.is_infinite());
        }
    }

    #[test]
    fn test_hypothetical_error_does_not_mutate_state() {
        let grid = affine_grid();
        let tin = Tin::new(grid.point_ids().collect(), &grid).unwrap();
        let center = grid.id_at(1, 1).unwrap();
        let triangles_before = tin.triangle_count();

        tin.hypothetical_error(&grid, center).unwrap();
        assert_eq!(tin.triangle_count(), triangles_before);
        assert_eq!(grid.point(center).error, 0.0);
    }

    #[test]
    fn test_inherit_unchanged_carries_members_and_reports_changed() {
        let mut grid = affine_grid();
        let estimated = non_corner_ids(&grid);
        let center = grid.id_at(1, 1).unwrap();

        let mut vertices = grid.corner_ids().to_vec();
        let mut old_tin = Tin::new(vertices.clone(), &grid).unwrap();
        old_tin.distribute_points(&mut grid, &estimated, None).unwrap();

        // Promote the center point and reconcile the snapshots
        vertices.push(center);
        grid.point_mut(center).reset_error();
        let mut tin = Tin::new(vertices, &grid).unwrap();
        let diff = tin.inherit_unchanged(&old_tin).unwrap();

        // Every previously estimated point sat in a triangle incident to the
        // new vertex, so all of them need redistribution
        assert!(diff.changed_points.contains(&center));
        tin.distribute_points(&mut grid, &diff.changed_points, Some(center))
            .unwrap();

        let assigned: usize = tin.triangles().map(|(_, t)| t.members.len()).sum();
        assert_eq!(assigned, estimated.len() - 1);
    }

    #[test]
    fn test_replace_triangle_unknown_key() {
        let grid = affine_grid();
        let mut tin = Tin::new(grid.corner_ids().to_vec(), &grid).unwrap();
        let key = TriangleKey::new([(9, 9), (10, 9), (9, 10)]);
        let triangle = Triangle {
            vertices: [0, 1, 2],
            members: Vec::new(),
        };
        assert!(matches!(
            tin.replace_triangle(key, triangle),
            Err(Error::TriangleNotFound(_))
        ));
    }
}
