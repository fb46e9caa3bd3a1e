//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::Vec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around a KD-tree for spatial queries
///
/// Provides O(log n) nearest-site lookups to convert 2D positions into
/// cell IDs. This is what turns clicks, raycasts, or agent positions into
/// the cell they belong to.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build a spatial index from cell sites
    ///
    /// Called once at the end of city generation.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_city::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![
    ///     Vec2::new(10.0, 10.0),
    ///     Vec2::new(90.0, 20.0),
    ///     Vec2::new(50.0, 80.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Vec2::new(12.0, 8.0)), 0);
    /// # }
    /// ```
    pub fn new(sites: &[Vec2]) -> Self {
        let points: Vec<[f32; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Find the cell whose site is nearest to a position
    ///
    /// O(log n) nearest-neighbor search; returns the cell ID.
    pub fn find_nearest(&self, position: Vec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}
