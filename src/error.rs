//! Error types for city generation

use std::fmt;

/// Errors that can occur during city generation or queries
#[derive(Debug, Clone, PartialEq)]
pub enum CityError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Triangulation input had fewer than the required number of points
    InsufficientPoints {
        /// Minimum number of points required
        expected: usize,
        /// Number of points actually supplied (after deduplication)
        actual: usize,
    },
    /// Collinear or coincident points produced an unsolvable geometric system
    DegenerateGeometry(String),
    /// A cell lacks enough boundary edges to seed road growth
    InsufficientBoundary(usize),
    /// No Voronoi cell fell within the generation bounds
    EmptyDiagram,
    /// Requested cell ID does not exist
    CellNotFound(usize),
}

impl fmt::Display for CityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            CityError::InsufficientPoints { expected, actual } => write!(
                f,
                "insufficient points: expected at least {}, got {}",
                expected, actual
            ),
            CityError::DegenerateGeometry(msg) => write!(f, "degenerate geometry: {}", msg),
            CityError::InsufficientBoundary(edges) => write!(
                f,
                "insufficient boundary: cell has {} edges, road growth needs at least 2",
                edges
            ),
            CityError::EmptyDiagram => {
                write!(f, "empty diagram: no cell centroid fell within the bounds")
            }
            CityError::CellNotFound(id) => write!(f, "cell not found: {}", id),
        }
    }
}

impl std::error::Error for CityError {}

/// Result type alias for city generation operations
pub type Result<T> = std::result::Result<T, CityError>;
