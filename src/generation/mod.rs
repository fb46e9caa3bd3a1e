//! Core layout generation algorithms
//!
//! Seed point scattering, incremental Delaunay triangulation, and Voronoi
//! dual extraction. `generate_diagram` chains the geometric stages; district
//! assignment and road growth build on the resulting diagram.

mod delaunay;
mod points;
mod voronoi;

pub use delaunay::triangulate;
pub use points::{scatter_points, ScatterMode};
pub use voronoi::{DualEdge, VoronoiDiagram};

use glam::Vec2;

use crate::error::Result;
use crate::geometry::Rect;

/// Triangulate a point set and extract its Voronoi dual
///
/// The triangulation is consumed immediately by dual extraction and
/// discarded; only the diagram survives.
pub fn generate_diagram(points: &[Vec2], bounds: Rect) -> Result<VoronoiDiagram> {
    let triangles = delaunay::triangulate(points)?;
    Ok(VoronoiDiagram::build(&triangles, points, bounds))
}
