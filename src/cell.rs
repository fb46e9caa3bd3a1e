//! Voronoi cell structures
//!
//! Represents an individual Voronoi cell (site plus clockwise boundary) and
//! its district-tagged wrapper carrying build sites, the attached road
//! network, and neighbor connectivity.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{point_key, Edge, PointKey};
use crate::roads::Road;

/// District label given to every cell before any spec is applied
pub const DEFAULT_DISTRICT: &str = "unzoned";

/// A single Voronoi cell
///
/// Holds the site point, the boundary points sorted clockwise around the
/// site, and the indices of the dual edges that bound it (indices into the
/// owning diagram's edge list; cells never hold edge back-pointers).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Cell {
    /// The seed point this cell surrounds
    pub site: Vec2,
    /// Boundary points, kept sorted clockwise around the site
    points: Vec<Vec2>,
    /// Indices of the bounding dual edges in the owning diagram
    pub edge_ids: Vec<usize>,
}

impl Cell {
    /// Create an empty cell around a site
    ///
    /// The site must be fixed before boundary points are added: the
    /// clockwise ordering is computed relative to it.
    pub fn new(site: Vec2) -> Self {
        Self {
            site,
            points: Vec::new(),
            edge_ids: Vec::new(),
        }
    }

    /// Boundary points in clockwise order around the site
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Number of boundary points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Add a boundary point
    ///
    /// Coincident points (on the quantized grid) are ignored. The boundary
    /// is re-sorted clockwise around the site after every insertion so the
    /// ordering invariant holds at all times, not just after construction.
    pub fn add_point(&mut self, p: Vec2) {
        let key = point_key(p);
        if self.points.iter().any(|&q| point_key(q) == key) {
            return;
        }
        self.points.push(p);
        self.sort_clockwise();
    }

    /// Register a bounding dual edge by its diagram index
    pub fn add_edge_id(&mut self, id: usize) {
        if !self.edge_ids.contains(&id) {
            self.edge_ids.push(id);
        }
    }

    /// The polygon edges between consecutive boundary points
    ///
    /// Closed (wrapping) for 3+ points; a 2-point boundary yields the single
    /// connecting segment, fewer points yield nothing.
    pub fn polygon_edges(&self) -> Vec<Edge> {
        match self.points.len() {
            0 | 1 => Vec::new(),
            2 => vec![Edge::new(self.points[0], self.points[1])],
            n => (0..n)
                .map(|i| Edge::new(self.points[i], self.points[(i + 1) % n]))
                .collect(),
        }
    }

    fn sort_clockwise(&mut self) {
        let site = self.site;
        let angle = |p: &Vec2| (p.y - site.y).atan2(p.x - site.x);
        self.points.sort_by(|a, b| {
            angle(b)
                .partial_cmp(&angle(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| point_key(*a).cmp(&point_key(*b)))
        });
    }
}

/// A Voronoi cell tagged with a district label
///
/// Wraps the geometric cell with the mutable district assignment, the
/// sampled build sites, the road network once generated, and the sorted
/// ids of adjacent district cells (for pathfinding and flood fills).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct DistrictCell {
    /// The underlying Voronoi cell
    pub cell: Cell,
    /// Current district label; reassigning it moves the cell between districts
    pub label: String,
    /// Sampled interior points for structure placement
    pub build_sites: Vec<Vec2>,
    /// Road network attached after generation
    pub road: Option<Road>,
    /// Ids of adjacent district cells, sorted ascending
    pub neighbors: Vec<usize>,
}

impl DistrictCell {
    /// Wrap a cell with the default district label
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            label: DEFAULT_DISTRICT.to_string(),
            build_sites: Vec::new(),
            road: None,
            neighbors: Vec::new(),
        }
    }

    /// The cell's site point
    #[inline]
    pub fn site(&self) -> Vec2 {
        self.cell.site
    }

    /// Check whether the cell currently carries the given label
    #[inline]
    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }

    /// Check whether any spec has relabeled this cell
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.label != DEFAULT_DISTRICT
    }

    /// Quantized lookup key of the site
    #[inline]
    pub fn site_key(&self) -> PointKey {
        point_key(self.cell.site)
    }
}
