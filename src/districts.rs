//! District assignment
//!
//! Partitions the Voronoi cells that fall within the generation bounds into
//! named districts by repeated radius-based region growing, then samples
//! interior build sites for each cell by sub-triangulating its polygon.

use log::debug;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::DistrictCell;
use crate::error::{CityError, Result};
use crate::generation::{triangulate, VoronoiDiagram};
use crate::geometry::{polygon_centroid, random_point_in_triangle};

/// Specification for one district type
///
/// Specs are applied in list order; where seed radii overlap, the label
/// applied last wins. This overwrite behavior is the intended tie-break for
/// overlapping districts, not an accident of iteration order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictSpec {
    /// District label applied to covered cells (e.g. "Urban", "Farm")
    pub label: String,
    /// Number of seed cells to grow from
    pub frequency: u32,
    /// Seed radius as a fraction of `(bounds.width + bounds.height) / 8`
    pub relative_size: f32,
    /// Build-site points sampled per sub-triangle in this district's cells
    pub build_sites_per_cell: u32,
    /// Structure offset from roads; carried for placement layers, not
    /// interpreted by the core
    pub offset: f32,
    /// Fraction of build sites placement layers should occupy; carried, not
    /// interpreted by the core
    pub percentage: f32,
}

impl DistrictSpec {
    /// Create a spec with default placement parameters
    pub fn new(label: impl Into<String>, frequency: u32, relative_size: f32) -> Self {
        Self {
            label: label.into(),
            frequency,
            relative_size,
            build_sites_per_cell: 1,
            offset: 0.0,
            percentage: 1.0,
        }
    }

    /// Set the build-site sampling density
    pub fn with_build_sites(mut self, per_triangle: u32) -> Self {
        self.build_sites_per_cell = per_triangle;
        self
    }

    /// Set the placement offset passed through to consumers
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// Set the placement percentage passed through to consumers
    pub fn with_percentage(mut self, percentage: f32) -> Self {
        self.percentage = percentage;
        self
    }
}

/// A named grouping of district cells
///
/// Derived from the current labels: districts do not own cells, and a
/// cell's label can change, reclassifying it into a different district.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// The shared label
    pub label: String,
    /// Indices of the cells currently carrying the label
    pub cells: Vec<usize>,
}

/// Assign districts and sample build sites
///
/// 1. Every diagram cell with a closed polygon (3+ boundary points) whose
///    shoelace centroid lies within the bounds becomes a `DistrictCell`
///    with the default label; open hull cells and out-of-bounds cells are
///    dropped. No surviving cell is an `EmptyDiagram` error.
/// 2. Per spec, `frequency` times: a uniformly random cell seeds a relabel
///    of every cell whose site lies within
///    `relative_size * (width + height) / 8` of the seed's site. Later
///    specs overwrite earlier labels (last-write-wins).
/// 3. Each cell's polygon is sub-triangulated and build sites are sampled
///    per triangle at its final district's density (`default_build_sites`
///    for cells still carrying the default label).
///
/// An empty spec list leaves every cell at the default label; that is not
/// an error.
pub fn assign_districts<R: Rng>(
    diagram: &VoronoiDiagram,
    specs: &[DistrictSpec],
    default_build_sites: u32,
    rng: &mut R,
) -> Result<Vec<DistrictCell>> {
    let bounds = diagram.bounds();

    let mut cells: Vec<DistrictCell> = Vec::new();
    let mut index_map: Vec<Option<usize>> = vec![None; diagram.cell_count()];
    for (i, cell) in diagram.cells().iter().enumerate() {
        if cell.point_count() < 3 {
            continue;
        }
        let centroid = polygon_centroid(cell.points())?;
        if bounds.contains(centroid) {
            index_map[i] = Some(cells.len());
            cells.push(DistrictCell::new(cell.clone()));
        }
    }
    if cells.is_empty() {
        return Err(CityError::EmptyDiagram);
    }

    // Adjacency among surviving cells, from the diagram's dual edges.
    for dual in diagram.edges() {
        if let (Some(l), Some(r)) = (index_map[dual.left_cell], index_map[dual.right_cell]) {
            cells[l].neighbors.push(r);
            cells[r].neighbors.push(l);
        }
    }
    for cell in &mut cells {
        cell.neighbors.sort_unstable();
        cell.neighbors.dedup();
    }

    let radius_scale = (bounds.width() + bounds.height()) / 8.0;
    for spec in specs {
        for _ in 0..spec.frequency {
            let seed_site = cells[rng.gen_range(0..cells.len())].site();
            let radius = spec.relative_size * radius_scale;
            for cell in cells.iter_mut() {
                if cell.site().distance(seed_site) <= radius {
                    cell.label = spec.label.clone();
                }
            }
        }
    }

    for cell in cells.iter_mut() {
        let per_triangle = specs
            .iter()
            .find(|s| s.label == cell.label)
            .map(|s| s.build_sites_per_cell)
            .unwrap_or(default_build_sites);
        if per_triangle == 0 {
            continue;
        }
        let triangles = triangulate(cell.cell.points())?;
        for t in &triangles {
            for _ in 0..per_triangle {
                cell.build_sites.push(random_point_in_triangle(t, rng));
            }
        }
    }

    debug!(
        "assigned {} cells across {} specs, {} relabeled",
        cells.len(),
        specs.len(),
        cells.iter().filter(|c| c.is_assigned()).count()
    );
    Ok(cells)
}
