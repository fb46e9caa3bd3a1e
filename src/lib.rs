//! Voronoi-based procedural city layout generation
//!
//! A standalone library that turns a set of 2D seed points into a city
//! layout: a Delaunay triangulation, its Voronoi dual, named districts
//! grown over the cells, sampled build sites, and a branching road network
//! inside each cell. Rendering and terrain are left to the host engine
//! (Bevy, Godot, etc.); the output is a plain data graph.
//!
//! # Quick Start
//!
//! ```rust
//! use voronoi_city::*;
//!
//! // Configure a city
//! let config = CityConfigBuilder::new()
//!     .seed(42)
//!     .bounds(Rect::from_size(200.0, 200.0)).unwrap()
//!     .point_count(80).unwrap()
//!     .district(DistrictSpec::new("Urban", 2, 1.0))
//!     .district(DistrictSpec::new("Farm", 1, 1.5))
//!     .build().unwrap();
//!
//! // Generate it
//! let city = CityMap::generate(config).unwrap();
//! println!("generated {} cells", city.cell_count());
//!
//! for cell in city.cells() {
//!     let road = cell.road.as_ref().unwrap();
//!     println!("{}: {} road segments", cell.label, road.segment_count());
//! }
//! ```
//!
//! The same configuration always produces a bit-identical city: one seeded
//! generator is threaded through every randomized stage.
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) position-to-cell lookups using a KD-tree
//! - `serde`: serialization support for configuration and generated cells

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod cell;
pub mod generation;
pub mod districts;
pub mod roads;
pub mod city;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{CityError, Result};
pub use config::{CityConfig, CityConfigBuilder};
pub use geometry::{Edge, Rect, Triangle};
pub use cell::{Cell, DistrictCell, DEFAULT_DISTRICT};
pub use generation::{ScatterMode, VoronoiDiagram};
pub use districts::{District, DistrictSpec};
pub use roads::{Road, RoadOptions};
pub use city::CityMap;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec2 for convenience
pub use glam::Vec2;
