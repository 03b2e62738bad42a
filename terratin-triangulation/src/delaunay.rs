//! Delaunay triangulation using the spade crate

use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, Point2, PositionInTriangulation, Triangulation};
use terratin_core::{Error, Result};

/// A Delaunay triangulation over a fixed set of input coordinates.
///
/// Vertex identity is the position of the coordinate in the input slice;
/// every query answers in those indices. For a fixed input sequence the
/// triangulation and every query result are deterministic.
pub struct Delaunay {
    triangulation: DelaunayTriangulation<Point2<f64>>,
    /// spade handle for each input index
    handles: Vec<FixedVertexHandle>,
    /// Input index for each spade vertex handle
    input_index: Vec<usize>,
    simplices: Vec<[usize; 3]>,
}

impl Delaunay {
    /// Triangulate a set of distinct 2D coordinates.
    ///
    /// Requires at least 3 points that are not all collinear.
    pub fn triangulate(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::Geometry(format!(
                "need at least 3 points to triangulate, got {}",
                points.len()
            )));
        }

        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        let mut handles = Vec::with_capacity(points.len());
        for &(x, y) in points {
            let handle = triangulation
                .insert(Point2::new(x, y))
                .map_err(|e| Error::Geometry(format!("failed to insert ({x}, {y}): {e}")))?;
            handles.push(handle);
        }

        // spade silently merges coincident inserts
        if triangulation.num_vertices() != points.len() {
            return Err(Error::Geometry(
                "input coordinates must be distinct".to_string(),
            ));
        }
        if triangulation.num_inner_faces() == 0 {
            return Err(Error::Geometry("input points are collinear".to_string()));
        }

        let mut input_index = vec![0usize; points.len()];
        for (i, handle) in handles.iter().enumerate() {
            input_index[handle.index()] = i;
        }

        let simplices = triangulation
            .inner_faces()
            .map(|face| {
                let [a, b, c] = face.vertices();
                [
                    input_index[a.fix().index()],
                    input_index[b.fix().index()],
                    input_index[c.fix().index()],
                ]
            })
            .collect();

        Ok(Self {
            triangulation,
            handles,
            input_index,
            simplices,
        })
    }

    /// Number of triangulated points
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Vertex-index triples of all interior triangles
    pub fn simplices(&self) -> &[[usize; 3]] {
        &self.simplices
    }

    /// Find the triangle whose interior or boundary contains `(x, y)`.
    ///
    /// Coordinates falling on an edge or vertex resolve to an adjacent
    /// interior triangle; coordinates outside the convex hull fail with
    /// `TriangleNotFound`.
    pub fn locate(&self, x: f64, y: f64) -> Result<[usize; 3]> {
        let outside = || Error::TriangleNotFound(format!("({x}, {y}) is outside the convex hull"));

        let face = match self.triangulation.locate(Point2::new(x, y)) {
            PositionInTriangulation::OnFace(face) => self.triangulation.face(face),
            PositionInTriangulation::OnEdge(edge) => {
                let edge = self.triangulation.directed_edge(edge);
                match edge.face().as_inner() {
                    Some(face) => face,
                    None => edge.rev().face().as_inner().ok_or_else(outside)?,
                }
            }
            PositionInTriangulation::OnVertex(vertex) => self
                .triangulation
                .vertex(vertex)
                .out_edges()
                .find_map(|edge| edge.face().as_inner())
                .ok_or_else(outside)?,
            _ => return Err(outside()),
        };

        let [a, b, c] = face.vertices();
        Ok([
            self.input_index[a.fix().index()],
            self.input_index[b.fix().index()],
            self.input_index[c.fix().index()],
        ])
    }

    /// Indices of vertices sharing a triangulation edge with vertex `index`
    pub fn neighbors(&self, index: usize) -> Result<Vec<usize>> {
        let handle = self.handles.get(index).copied().ok_or_else(|| {
            Error::InvalidArgument(format!("vertex index {index} out of range"))
        })?;

        let mut neighbors: Vec<usize> = self
            .triangulation
            .vertex(handle)
            .out_edges()
            .map(|edge| self.input_index[edge.to().fix().index()])
            .collect();
        neighbors.sort_unstable();
        Ok(neighbors)
    }
}
