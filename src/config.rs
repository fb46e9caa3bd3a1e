//! City generation configuration and builder
//!
//! This module provides configuration types for deterministic city layout
//! generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

use crate::districts::DistrictSpec;
use crate::error::{CityError, Result};
use crate::generation::ScatterMode;
use crate::geometry::Rect;

/// Configuration for deterministic city generation
///
/// The same configuration always produces the identical city: the seed
/// drives one explicit random generator threaded through scattering,
/// district seeding, build-site sampling, and road growth.
///
/// # Serialization
///
/// With the `serde` feature, only the configuration needs to be persisted;
/// the city can be regenerated from it on load.
///
/// # Example
///
/// ```rust
/// use voronoi_city::*;
///
/// let config = CityConfigBuilder::new()
///     .seed(42)
///     .bounds(Rect::from_size(150.0, 150.0)).unwrap()
///     .point_count(40).unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 42);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CityConfig {
    /// Random seed for deterministic generation
    pub seed: u32,

    /// Generation bounds; cells whose centroid falls outside are dropped
    pub bounds: Rect,

    /// Number of seed points to scatter (ignored when `points` is set)
    pub point_count: usize,

    /// Seed point distribution strategy
    pub scatter: ScatterMode,

    /// Explicit seed points, overriding the scatter stage
    pub points: Option<Vec<Vec2>>,

    /// District specifications, applied in order (later specs overwrite
    /// earlier labels where their seed radii overlap)
    pub districts: Vec<DistrictSpec>,

    /// Generate roads inside cells; when false each cell's road network is
    /// just its boundary
    pub inner_roads: bool,

    /// Branch segments attempted per cell during road growth
    pub road_branches: u32,

    /// Build-site samples per sub-triangle for cells no spec relabeled
    pub default_build_sites: u32,
}

impl Default for CityConfig {
    fn default() -> Self {
        CityConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating `CityConfig` with validation
///
/// # Example
///
/// ```rust
/// use voronoi_city::*;
///
/// let config = CityConfigBuilder::new()
///     .seed(12345)
///     .point_count(80)
///     .unwrap()
///     .district(DistrictSpec::new("Urban", 2, 1.0))
///     .district(DistrictSpec::new("Farm", 1, 1.5))
///     .build()
///     .unwrap();
/// assert_eq!(config.districts.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CityConfigBuilder {
    seed: Option<u32>,
    bounds: Rect,
    point_count: usize,
    scatter: ScatterMode,
    points: Option<Vec<Vec2>>,
    districts: Vec<DistrictSpec>,
    inner_roads: bool,
    road_branches: u32,
    default_build_sites: u32,
}

impl CityConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - bounds: 200 x 200 at the origin
    /// - point_count: 100, jittered-grid scatter
    /// - districts: none (all cells keep the default label)
    /// - inner_roads: true, road_branches: 8
    /// - default_build_sites: 1
    pub fn new() -> Self {
        Self {
            seed: None,
            bounds: Rect::from_size(200.0, 200.0),
            point_count: 100,
            scatter: ScatterMode::default(),
            points: None,
            districts: Vec::new(),
            inner_roads: true,
            road_branches: 8,
            default_build_sites: 1,
        }
    }

    /// Set the random seed
    ///
    /// The same seed with the same other parameters produces a bit-identical
    /// city every time.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the generation bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either extent is not positive.
    pub fn bounds(mut self, bounds: Rect) -> Result<Self> {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(CityError::InvalidConfig(format!(
                "bounds must have positive extents (got {} x {})",
                bounds.width(),
                bounds.height()
            )));
        }
        self.bounds = bounds;
        Ok(self)
    }

    /// Set the number of seed points to scatter
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for fewer than 3 points (triangulation needs
    /// at least a triangle).
    pub fn point_count(mut self, count: usize) -> Result<Self> {
        if count < 3 {
            return Err(CityError::InvalidConfig(format!(
                "point count must be >= 3 (got {})",
                count
            )));
        }
        self.point_count = count;
        Ok(self)
    }

    /// Set the seed point distribution strategy
    pub fn scatter(mut self, mode: ScatterMode) -> Self {
        self.scatter = mode;
        self
    }

    /// Supply explicit seed points instead of scattering
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for fewer than 3 points.
    pub fn points(mut self, points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(CityError::InvalidConfig(format!(
                "explicit point set must have >= 3 points (got {})",
                points.len()
            )));
        }
        self.points = Some(points);
        Ok(self)
    }

    /// Append a district spec
    ///
    /// Specs are applied in the order they are added; later specs overwrite
    /// earlier labels where their seed radii overlap.
    pub fn district(mut self, spec: DistrictSpec) -> Self {
        self.districts.push(spec);
        self
    }

    /// Replace the whole district spec list
    pub fn districts(mut self, specs: Vec<DistrictSpec>) -> Self {
        self.districts = specs;
        self
    }

    /// Enable or disable inner road generation
    pub fn inner_roads(mut self, enabled: bool) -> Self {
        self.inner_roads = enabled;
        self
    }

    /// Set the road branch budget per cell
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if branches > 64 (excessive and impractical).
    pub fn road_branches(mut self, branches: u32) -> Result<Self> {
        if branches > 64 {
            return Err(CityError::InvalidConfig(format!(
                "road branches must be <= 64 (got {})",
                branches
            )));
        }
        self.road_branches = branches;
        Ok(self)
    }

    /// Set the build-site density for cells no spec relabeled
    pub fn default_build_sites(mut self, per_triangle: u32) -> Self {
        self.default_build_sites = per_triangle;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any district spec has an empty label or a
    /// negative size parameter.
    pub fn build(self) -> Result<CityConfig> {
        for spec in &self.districts {
            if spec.label.is_empty() {
                return Err(CityError::InvalidConfig(
                    "district labels must not be empty".to_string(),
                ));
            }
            if spec.relative_size < 0.0 {
                return Err(CityError::InvalidConfig(format!(
                    "district '{}' relative size must be >= 0 (got {})",
                    spec.label, spec.relative_size
                )));
            }
            if spec.percentage < 0.0 || spec.offset < 0.0 {
                return Err(CityError::InvalidConfig(format!(
                    "district '{}' placement parameters must be >= 0",
                    spec.label
                )));
            }
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        Ok(CityConfig {
            seed,
            bounds: self.bounds,
            point_count: self.point_count,
            scatter: self.scatter,
            points: self.points,
            districts: self.districts,
            inner_roads: self.inner_roads,
            road_branches: self.road_branches,
            default_build_sites: self.default_build_sites,
        })
    }
}

impl Default for CityConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CityConfigBuilder::new().build().unwrap();
        assert_eq!(config.bounds, Rect::from_size(200.0, 200.0));
        assert_eq!(config.point_count, 100);
        assert_eq!(config.scatter, ScatterMode::JitteredGrid);
        assert!(config.points.is_none());
        assert!(config.districts.is_empty());
        assert!(config.inner_roads);
        assert_eq!(config.road_branches, 8);
        let _seed = config.seed; // seed is random, just verify it was set
    }

    #[test]
    fn test_builder_custom() {
        let config = CityConfigBuilder::new()
            .seed(42)
            .bounds(Rect::from_size(50.0, 80.0))
            .unwrap()
            .point_count(12)
            .unwrap()
            .scatter(ScatterMode::UniformRandom)
            .district(DistrictSpec::new("Urban", 2, 1.0))
            .inner_roads(false)
            .road_branches(4)
            .unwrap()
            .default_build_sites(3)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.bounds.width(), 50.0);
        assert_eq!(config.point_count, 12);
        assert_eq!(config.scatter, ScatterMode::UniformRandom);
        assert_eq!(config.districts.len(), 1);
        assert!(!config.inner_roads);
        assert_eq!(config.road_branches, 4);
        assert_eq!(config.default_build_sites, 3);
    }

    #[test]
    fn test_builder_rejects_degenerate_bounds() {
        assert!(CityConfigBuilder::new()
            .bounds(Rect::from_size(0.0, 100.0))
            .is_err());
        assert!(CityConfigBuilder::new()
            .bounds(Rect::new(Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)))
            .is_err());
    }

    #[test]
    fn test_builder_rejects_too_few_points() {
        assert!(CityConfigBuilder::new().point_count(2).is_err());
        assert!(CityConfigBuilder::new()
            .points(vec![Vec2::ZERO, Vec2::ONE])
            .is_err());
    }

    #[test]
    fn test_builder_rejects_excessive_branches() {
        assert!(CityConfigBuilder::new().road_branches(65).is_err());
        assert!(CityConfigBuilder::new().road_branches(64).is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_specs() {
        let result = CityConfigBuilder::new()
            .district(DistrictSpec::new("", 1, 1.0))
            .build();
        assert!(result.is_err());

        let result = CityConfigBuilder::new()
            .district(DistrictSpec::new("Urban", 1, -0.5))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_points_accepted() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 8.0),
        ];
        let config = CityConfigBuilder::new()
            .points(points.clone())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.points.unwrap(), points);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = CityConfigBuilder::new()
            .seed(12345)
            .district(DistrictSpec::new("Urban", 2, 1.0).with_build_sites(2))
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: CityConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
