//! Branching road network growth
//!
//! Grows a road graph inside a single cell. The cell's polygon boundary
//! seeds the segment pool; branches then connect random points on existing
//! segments, splitting at the first discovered intersection. The process is
//! a stochastic growth, not a shortest-path search: dead ends and uneven
//! branching are the intended organic look.

use glam::Vec2;
use log::debug;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{CityError, Result};
use crate::geometry::{points_equal, segment_intersect, Edge, EPSILON};

/// Retry cap when drawing two distinct pool segments
///
/// Keeps a pathological draw sequence from spinning; on exhaustion the
/// current span is reused and the branch counter still bounds growth.
const MAX_PICK_RETRIES: usize = 8;

/// Options controlling road growth for one cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct RoadOptions {
    /// Grow branches inside the cell; when false only the boundary is kept
    pub inner_roads: bool,
    /// Number of branch segments to attempt
    pub branch_budget: u32,
}

impl Default for RoadOptions {
    fn default() -> Self {
        Self {
            inner_roads: true,
            branch_budget: 8,
        }
    }
}

/// A road network owned by one cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Road {
    /// All segments, boundary edges first, branches in insertion order
    pub segments: Vec<Edge>,
    /// Midpoint of the seed span's start edge
    pub start: Vec2,
    /// Midpoint of the seed span's end edge
    pub end: Vec2,
}

impl Road {
    /// Number of segments in the network
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check whether the network contains a segment (undirected comparison)
    pub fn contains_segment(&self, segment: &Edge) -> bool {
        self.segments.iter().any(|s| s == segment)
    }

    /// Total length of all segments
    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(Edge::length).sum()
    }
}

/// Generate the road network for a cell
///
/// The pool starts as the cell's polygon edges; the boundary is always part
/// of the road network. The seed span is the pair of boundary edges with
/// the greatest midpoint distance, and its midpoints become the road's
/// distinguished start and end points. A cell with fewer than two boundary
/// edges cannot seed a span and fails with `InsufficientBoundary`.
pub fn build_road<R: Rng>(cell: &Cell, options: &RoadOptions, rng: &mut R) -> Result<Road> {
    let boundary = cell.polygon_edges();
    if boundary.len() < 2 {
        return Err(CityError::InsufficientBoundary(boundary.len()));
    }

    let (seed_start, seed_end) = longest_span(&boundary);
    let start = boundary[seed_start].midpoint();
    let end = boundary[seed_end].midpoint();

    let mut pool = boundary;
    if options.inner_roads && options.branch_budget > 0 {
        grow_branches(&mut pool, seed_start, seed_end, options.branch_budget, rng);
    }

    debug!(
        "road for site ({}, {}): {} segments",
        cell.site.x,
        cell.site.y,
        pool.len()
    );

    Ok(Road {
        segments: pool,
        start,
        end,
    })
}

/// The pair of edges with the greatest distance between their midpoints
fn longest_span(edges: &[Edge]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut best_dist = -1.0f32;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let dist = edges[i].midpoint().distance_squared(edges[j].midpoint());
            if dist > best_dist {
                best_dist = dist;
                best = (i, j);
            }
        }
    }
    best
}

/// Iterative branch growth
///
/// Each step spans from a random point on the start line to the end line's
/// midpoint, truncates at the first intersection with the pool, appends the
/// segment, and re-picks two distinct pool segments as the next span.
fn grow_branches<R: Rng>(
    pool: &mut Vec<Edge>,
    mut start_idx: usize,
    mut end_idx: usize,
    budget: u32,
    rng: &mut R,
) {
    let mut remaining = budget;
    loop {
        let t = rng.gen_range(0.33..0.66);
        let from = pool[start_idx].point_at(t);
        let to = pool[end_idx].midpoint();
        let mut segment = Edge::new(from, to);
        let full_length = segment.length();

        // Newest segments are scanned first; the first hit decides the split.
        for idx in (0..pool.len()).rev() {
            if idx == start_idx || idx == end_idx {
                continue;
            }
            let Some(hit) = segment_intersect(&segment, &pool[idx]) else {
                continue;
            };
            // Contact at the candidate's own endpoints is not a crossing.
            if points_equal(hit, from) || points_equal(hit, to) {
                continue;
            }
            let near = Edge::new(from, hit);
            // Stub avoidance: a near side under a third of the candidate is
            // discarded in favor of the far side.
            segment = if near.length() < full_length / 3.0 {
                Edge::new(hit, to)
            } else {
                near
            };
            end_idx = idx;
            break;
        }

        if segment.length() > EPSILON {
            pool.push(segment);
        }

        remaining -= 1;
        if remaining == 0 {
            break;
        }
        // Retry exhaustion keeps the current span for the next branch.
        if let Some((s, e)) = pick_distinct_pair(pool.len(), rng) {
            start_idx = s;
            end_idx = e;
        }
    }
}

/// Draw two distinct indices in `0..n`, or give up after a bounded number
/// of tries
fn pick_distinct_pair<R: Rng>(n: usize, rng: &mut R) -> Option<(usize, usize)> {
    if n < 2 {
        return None;
    }
    for _ in 0..MAX_PICK_RETRIES {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            return Some((a, b));
        }
    }
    None
}
