//! CityMap main structure

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cell::DistrictCell;
use crate::config::CityConfig;
use crate::districts::{assign_districts, District};
use crate::error::{CityError, Result};
use crate::generation::{generate_diagram, scatter_points};
use crate::roads::{build_road, RoadOptions};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::Vec2;

/// A complete generated city layout
///
/// Holds the district cells produced by one generation run: each carries
/// its Voronoi polygon, district label, build sites, road network, and
/// neighbor connectivity. Districts are derived groupings over the current
/// labels, not owners of the cells.
///
/// # Examples
///
/// ```rust
/// use voronoi_city::*;
///
/// let config = CityConfigBuilder::new()
///     .seed(42)
///     .point_count(40)
///     .unwrap()
///     .district(DistrictSpec::new("Urban", 2, 1.0))
///     .build()
///     .unwrap();
///
/// let city = CityMap::generate(config).unwrap();
/// println!("generated {} cells", city.cell_count());
///
/// for district in city.districts() {
///     println!("{}: {} cells", district.label, district.cells.len());
/// }
/// ```
#[derive(Clone)]
pub struct CityMap {
    /// Configuration used to generate this city
    config: CityConfig,

    /// All district cells (indexed by cell ID)
    cells: Vec<DistrictCell>,

    /// Spatial index for fast position-to-cell lookups
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl CityMap {
    /// Generate a city from a configuration
    ///
    /// Runs the full pipeline synchronously: scatter (unless explicit
    /// points were supplied) → triangulation → Voronoi dual → district
    /// assignment with build sites → road growth per cell. One seeded
    /// generator is threaded through every randomized stage, so the same
    /// configuration always produces a bit-identical city.
    ///
    /// # Errors
    ///
    /// Returns the first stage error: `InsufficientPoints` or
    /// `DegenerateGeometry` from triangulation, `EmptyDiagram` when no cell
    /// centroid falls within the bounds, `InsufficientBoundary` from road
    /// growth. A city is never partially built.
    pub fn generate(config: CityConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed as u64);

        let points = match &config.points {
            Some(points) => points.clone(),
            None => scatter_points(config.point_count, config.bounds, config.scatter, &mut rng),
        };
        debug!("generating city from {} seed points", points.len());

        let diagram = generate_diagram(&points, config.bounds)?;
        let mut cells = assign_districts(
            &diagram,
            &config.districts,
            config.default_build_sites,
            &mut rng,
        )?;

        let options = RoadOptions {
            inner_roads: config.inner_roads,
            branch_budget: config.road_branches,
        };
        for cell in &mut cells {
            cell.road = Some(build_road(&cell.cell, &options, &mut rng)?);
        }

        debug!(
            "city complete: {} cells, {} road segments",
            cells.len(),
            cells
                .iter()
                .filter_map(|c| c.road.as_ref())
                .map(|r| r.segment_count())
                .sum::<usize>()
        );

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let sites: Vec<Vec2> = cells.iter().map(|c| c.site()).collect();
            SpatialIndex::new(&sites)
        };

        Ok(Self {
            config,
            cells,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this city
    #[inline]
    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Number of district cells in the city
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All district cells as a slice
    #[inline]
    pub fn cells(&self) -> &[DistrictCell] {
        &self.cells
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&DistrictCell> {
        self.cells.get(id)
    }

    /// Get a cell by ID, failing with `CellNotFound` for unknown IDs
    pub fn cell(&self, id: usize) -> Result<&DistrictCell> {
        self.cells.get(id).ok_or(CityError::CellNotFound(id))
    }

    /// Neighbor IDs for a cell
    ///
    /// Returns an empty slice for an invalid cell ID.
    pub fn get_neighbors(&self, cell_id: usize) -> &[usize] {
        self.cells
            .get(cell_id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// The current districts, grouped from cell labels
    ///
    /// Labels are mutable, so the grouping is computed on demand; districts
    /// appear in first-seen cell order and reference cells by ID.
    pub fn districts(&self) -> Vec<District> {
        let mut districts: Vec<District> = Vec::new();
        for (id, cell) in self.cells.iter().enumerate() {
            match districts.iter_mut().find(|d| d.label == cell.label) {
                Some(district) => district.cells.push(id),
                None => districts.push(District {
                    label: cell.label.clone(),
                    cells: vec![id],
                }),
            }
        }
        districts
    }

    /// Iterate the cells currently carrying a label
    pub fn cells_with_label<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = &'a DistrictCell> {
        self.cells.iter().filter(move |c| c.has_label(label))
    }

    /// Find the cell whose site is nearest a position (requires the
    /// `spatial-index` feature)
    ///
    /// # Example
    ///
    /// ```rust
    /// # use voronoi_city::*;
    /// # let config = CityConfigBuilder::new().seed(42).point_count(20).unwrap().build().unwrap();
    /// # let city = CityMap::generate(config).unwrap();
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let id = city.find_cell_at(Vec2::new(100.0, 100.0));
    /// assert!(id < city.cell_count());
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: Vec2) -> usize {
        self.spatial_index.find_nearest(position)
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// Returns the IDs of all cells reachable within `hops` neighbor steps,
    /// including the center cell, sorted ascending. Returns an empty vec
    /// for an invalid center ID.
    pub fn find_cells_within_radius(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.cells.len() {
            return vec![];
        }

        let mut visited = std::collections::HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &cell_id in &current {
                for &neighbor in self.get_neighbors(cell_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut result: Vec<usize> = visited.into_iter().collect();
        result.sort_unstable();
        result
    }
}
