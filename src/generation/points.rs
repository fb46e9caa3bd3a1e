//! Seed point scattering
//!
//! Generates the site points that seed the Voronoi diagram, inside the
//! generation bounds. Two strategies are provided: plain uniform scatter
//! (irregular cells) and a jittered grid (near-uniform cell sizes without a
//! visible lattice pattern).

use glam::Vec2;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Jitter strength as a fraction of grid spacing
///
/// 0.0 keeps the bare lattice; 0.5 displaces points by up to half a grid
/// cell, which breaks up the regular pattern while keeping cell sizes even.
const JITTER_STRENGTH: f32 = 0.5;

/// Strategy for distributing seed points inside the bounds
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScatterMode {
    /// Independent uniform draws; produces irregular cell sizes
    UniformRandom,
    /// Grid cells with random jitter; produces near-uniform cell sizes
    #[default]
    JitteredGrid,
}

/// Generate seed points inside the bounds
///
/// Draws exactly `count` points from the supplied generator, so the same
/// seed always yields the same scatter.
pub fn scatter_points<R: Rng>(
    count: usize,
    bounds: Rect,
    mode: ScatterMode,
    rng: &mut R,
) -> Vec<Vec2> {
    match mode {
        ScatterMode::UniformRandom => uniform_scatter(count, bounds, rng),
        ScatterMode::JitteredGrid => jittered_grid(count, bounds, rng),
    }
}

fn uniform_scatter<R: Rng>(count: usize, bounds: Rect, rng: &mut R) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            Vec2::new(
                rng.gen_range(bounds.min.x..=bounds.max.x),
                rng.gen_range(bounds.min.y..=bounds.max.y),
            )
        })
        .collect()
}

fn jittered_grid<R: Rng>(count: usize, bounds: Rect, rng: &mut R) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    // Pick a column count that keeps grid cells close to square.
    let aspect = bounds.width() / bounds.height().max(f32::EPSILON);
    let cols = ((count as f32 * aspect).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols);

    let spacing = Vec2::new(
        bounds.width() / cols as f32,
        bounds.height() / rows as f32,
    );
    let max_jitter = spacing * JITTER_STRENGTH * 0.5;

    let mut points = Vec::with_capacity(count);
    'outer: for row in 0..rows {
        for col in 0..cols {
            if points.len() == count {
                break 'outer;
            }
            let center = bounds.min
                + Vec2::new(
                    (col as f32 + 0.5) * spacing.x,
                    (row as f32 + 0.5) * spacing.y,
                );
            let jitter = Vec2::new(
                rng.gen_range(-max_jitter.x..=max_jitter.x),
                rng.gen_range(-max_jitter.y..=max_jitter.y),
            );
            points.push((center + jitter).clamp(bounds.min, bounds.max));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_scatter_point_count() {
        let bounds = Rect::from_size(100.0, 100.0);
        for mode in [ScatterMode::UniformRandom, ScatterMode::JitteredGrid] {
            for count in [1, 7, 50, 200] {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                let points = scatter_points(count, bounds, mode, &mut rng);
                assert_eq!(points.len(), count);
            }
        }
    }

    #[test]
    fn test_scatter_empty() {
        let bounds = Rect::from_size(100.0, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(scatter_points(0, bounds, ScatterMode::JitteredGrid, &mut rng).is_empty());
    }

    #[test]
    fn test_scatter_within_bounds() {
        let bounds = Rect::new(Vec2::new(-50.0, 10.0), Vec2::new(50.0, 210.0));
        for mode in [ScatterMode::UniformRandom, ScatterMode::JitteredGrid] {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            for p in scatter_points(300, bounds, mode, &mut rng) {
                assert!(bounds.contains(p), "{:?} outside {:?}", p, bounds);
            }
        }
    }

    #[test]
    fn test_scatter_determinism() {
        let bounds = Rect::from_size(100.0, 100.0);
        let mut rng1 = ChaCha8Rng::seed_from_u64(12345);
        let mut rng2 = ChaCha8Rng::seed_from_u64(12345);
        let p1 = scatter_points(100, bounds, ScatterMode::JitteredGrid, &mut rng1);
        let p2 = scatter_points(100, bounds, ScatterMode::JitteredGrid, &mut rng2);
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_scatter_different_seeds_differ() {
        let bounds = Rect::from_size(100.0, 100.0);
        let mut rng1 = ChaCha8Rng::seed_from_u64(1);
        let mut rng2 = ChaCha8Rng::seed_from_u64(2);
        let p1 = scatter_points(100, bounds, ScatterMode::UniformRandom, &mut rng1);
        let p2 = scatter_points(100, bounds, ScatterMode::UniformRandom, &mut rng2);
        assert_ne!(p1, p2);
    }

    #[test]
    fn test_jittered_grid_spreads_points() {
        // With jitter at half a cell, no two grid points can coincide.
        let bounds = Rect::from_size(100.0, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let points = scatter_points(64, bounds, ScatterMode::JitteredGrid, &mut rng);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) > 1.0);
            }
        }
    }
}
