//! Voronoi cell construction from Delaunay triangulation
//!
//! Extracts the planar dual of a triangulation: one cell per site, one dual
//! edge per pair of triangles sharing a Delaunay edge. Dual edges connect
//! the two triangles' centroids and are tagged with the cells of the shared
//! edge's endpoints, so each cell accumulates its boundary points and the
//! edges bounding it.

use glam::Vec2;
use log::debug;
use std::collections::HashMap;

use crate::cell::Cell;
use crate::geometry::{point_key, Edge, PointKey, Rect, Triangle};

/// A Voronoi edge between two adjacent cells
///
/// Connects the centroids of the two Delaunay triangles that share an edge.
/// Cell references are indices into the owning diagram's cell arena.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct DualEdge {
    /// The dual segment (triangle centroid to triangle centroid)
    pub edge: Edge,
    /// Cell on one side (the shared Delaunay edge's first endpoint)
    pub left_cell: usize,
    /// Cell on the other side (the shared Delaunay edge's second endpoint)
    pub right_cell: usize,
}

impl DualEdge {
    /// Whether this edge separates two distinct cells
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.left_cell != self.right_cell
    }
}

/// The planar dual of a Delaunay triangulation
///
/// Owns the cell arena, the dual edge list, the generation bounds, and a
/// quantized site-to-cell lookup. The triangulation itself is transient and
/// not retained.
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    cells: Vec<Cell>,
    edges: Vec<DualEdge>,
    bounds: Rect,
    site_lookup: HashMap<PointKey, usize>,
}

impl VoronoiDiagram {
    /// Build the dual of a triangulation
    ///
    /// Creates one empty cell per unique site, then scans every unordered
    /// pair of triangles for a shared edge (exactly two common vertices) and
    /// emits the corresponding dual edge. The pairwise scan is O(T²) in the
    /// triangle count, which is fine for the moderate point counts this
    /// crate targets (hundreds of sites) but is the scaling limit to revisit
    /// first for anything larger.
    ///
    /// A triangulation with fewer than two triangles produces a diagram with
    /// no edges (all cells stay empty); that is not an error.
    pub fn build(triangles: &[Triangle], sites: &[Vec2], bounds: Rect) -> Self {
        let mut cells: Vec<Cell> = Vec::new();
        let mut site_lookup: HashMap<PointKey, usize> = HashMap::new();
        for &site in sites {
            let key = point_key(site);
            site_lookup.entry(key).or_insert_with(|| {
                cells.push(Cell::new(site));
                cells.len() - 1
            });
        }

        let mut edges: Vec<DualEdge> = Vec::new();
        for i in 0..triangles.len() {
            for j in (i + 1)..triangles.len() {
                let Some(shared) = shared_edge(&triangles[i], &triangles[j]) else {
                    continue;
                };
                // The shared Delaunay edge's endpoints are sites; they name
                // the two cells this dual edge separates.
                let left = site_lookup.get(&point_key(shared.a));
                let right = site_lookup.get(&point_key(shared.b));
                let (Some(&left), Some(&right)) = (left, right) else {
                    continue;
                };

                let dual = Edge::new(triangles[i].centroid(), triangles[j].centroid());
                let id = edges.len();
                for &cell_idx in &[left, right] {
                    cells[cell_idx].add_point(dual.a);
                    cells[cell_idx].add_point(dual.b);
                    cells[cell_idx].add_edge_id(id);
                }
                edges.push(DualEdge {
                    edge: dual,
                    left_cell: left,
                    right_cell: right,
                });
            }
        }

        debug!(
            "voronoi dual: {} cells, {} edges from {} triangles",
            cells.len(),
            edges.len(),
            triangles.len()
        );

        Self {
            cells,
            edges,
            bounds,
            site_lookup,
        }
    }

    /// All cells, in site insertion order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All dual edges
    #[inline]
    pub fn edges(&self) -> &[DualEdge] {
        &self.edges
    }

    /// The generation bounds this diagram was built for
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the diagram has any dual edges
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Get a cell by index
    pub fn cell(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }

    /// Look up the cell index for a site point
    pub fn cell_index_at_site(&self, site: Vec2) -> Option<usize> {
        self.site_lookup.get(&point_key(site)).copied()
    }

    /// Look up the cell for a site point
    pub fn cell_at_site(&self, site: Vec2) -> Option<&Cell> {
        self.cell_index_at_site(site).and_then(|i| self.cells.get(i))
    }

    /// Indices of cells adjacent to the given cell, sorted ascending
    pub fn neighbors_of(&self, cell_idx: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.left_cell == cell_idx {
                    Some(e.right_cell)
                } else if e.right_cell == cell_idx {
                    Some(e.left_cell)
                } else {
                    None
                }
            })
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }
}

/// The edge shared by two triangles, if they share exactly two vertices
fn shared_edge(t1: &Triangle, t2: &Triangle) -> Option<Edge> {
    let shared: Vec<Vec2> = t1
        .points
        .iter()
        .copied()
        .filter(|&v| t2.has_vertex(v))
        .collect();
    if shared.len() == 2 {
        Some(Edge::new(shared[0], shared[1]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::delaunay::triangulate;

    fn square_with_center() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 50.0),
        ]
    }

    #[test]
    fn test_square_scenario_bounded_center_cell() {
        let sites = square_with_center();
        let triangles = triangulate(&sites).unwrap();
        let diagram =
            VoronoiDiagram::build(&triangles, &sites, Rect::from_size(100.0, 100.0));

        assert_eq!(diagram.cell_count(), 5);
        assert_eq!(diagram.edges().len(), 4);

        // Only the center cell closes into a polygon; the corner cells stay
        // open with fewer than 3 boundary points.
        let center = diagram.cell_at_site(Vec2::new(50.0, 50.0)).unwrap();
        assert_eq!(center.point_count(), 4);
        for corner in &sites[..4] {
            let cell = diagram.cell_at_site(*corner).unwrap();
            assert!(cell.point_count() < 3);
        }

        // The boundary points are the four fan-triangle centroids, which sit
        // near the square's edge midpoints.
        let midpoints = [
            Vec2::new(50.0, 0.0),
            Vec2::new(100.0, 50.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(0.0, 50.0),
        ];
        for p in center.points() {
            let nearest = midpoints
                .iter()
                .map(|m| m.distance(*p))
                .fold(f32::INFINITY, f32::min);
            assert!(nearest < 20.0, "{:?} not near any edge midpoint", p);
        }
    }

    #[test]
    fn test_duality_one_dual_edge_per_shared_delaunay_edge() {
        let sites: Vec<Vec2> = vec![
            Vec2::new(12.0, 7.0),
            Vec2::new(88.0, 15.0),
            Vec2::new(45.0, 92.0),
            Vec2::new(30.0, 40.0),
            Vec2::new(70.0, 60.0),
            Vec2::new(5.0, 80.0),
            Vec2::new(95.0, 85.0),
            Vec2::new(55.0, 20.0),
        ];
        let triangles = triangulate(&sites).unwrap();
        let diagram =
            VoronoiDiagram::build(&triangles, &sites, Rect::from_size(100.0, 100.0));

        // Count Delaunay edges adjacent to exactly two triangles.
        let mut edge_triangle_count: HashMap<(PointKey, PointKey), usize> = HashMap::new();
        for t in &triangles {
            for e in t.edges() {
                *edge_triangle_count.entry(e.key()).or_insert(0) += 1;
            }
        }
        let shared_count = edge_triangle_count.values().filter(|&&c| c == 2).count();
        assert_eq!(diagram.edges().len(), shared_count);

        // Each dual edge connects the centroids of its two triangles.
        for dual in diagram.edges() {
            assert!(dual.is_boundary());
            let hits = triangles
                .iter()
                .filter(|t| {
                    let c = t.centroid();
                    c.abs_diff_eq(dual.edge.a, 1e-4) || c.abs_diff_eq(dual.edge.b, 1e-4)
                })
                .count();
            assert_eq!(hits, 2);
        }
    }

    #[test]
    fn test_single_triangle_yields_empty_diagram() {
        let sites = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 8.0),
        ];
        let triangles = triangulate(&sites).unwrap();
        assert_eq!(triangles.len(), 1);

        let diagram = VoronoiDiagram::build(&triangles, &sites, Rect::from_size(10.0, 10.0));
        assert!(diagram.is_empty());
        assert_eq!(diagram.cell_count(), 3);
        for cell in diagram.cells() {
            assert_eq!(cell.point_count(), 0);
        }
    }

    #[test]
    fn test_no_triangles_yields_empty_diagram() {
        let sites = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let diagram = VoronoiDiagram::build(&[], &sites, Rect::from_size(10.0, 10.0));
        assert!(diagram.is_empty());
        assert_eq!(diagram.cell_count(), 2);
    }

    #[test]
    fn test_neighbors_of_center_cell() {
        let sites = square_with_center();
        let triangles = triangulate(&sites).unwrap();
        let diagram =
            VoronoiDiagram::build(&triangles, &sites, Rect::from_size(100.0, 100.0));

        let center_idx = diagram.cell_index_at_site(Vec2::new(50.0, 50.0)).unwrap();
        let neighbors = diagram.neighbors_of(center_idx);
        assert_eq!(neighbors.len(), 4);
        for corner in &sites[..4] {
            let idx = diagram.cell_index_at_site(*corner).unwrap();
            assert!(neighbors.contains(&idx));
        }
    }

    #[test]
    fn test_duplicate_sites_share_a_cell() {
        let sites = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 8.0),
        ];
        let triangles = triangulate(&sites).unwrap();
        let diagram = VoronoiDiagram::build(&triangles, &sites, Rect::from_size(10.0, 10.0));
        assert_eq!(diagram.cell_count(), 3);
    }
}
