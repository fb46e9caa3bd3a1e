//! Incremental Delaunay triangulation
//!
//! Bowyer–Watson: seed a super triangle that strictly contains every input
//! point, insert points one at a time by carving out the cavity of triangles
//! whose circumcircle contains the new point, re-fan the cavity boundary to
//! the point, and finally drop every triangle touching the super triangle.
//!
//! Output order depends on insertion order and is not canonical; callers
//! comparing triangulations must compare triangle sets.

use glam::Vec2;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

use crate::error::{CityError, Result};
use crate::geometry::{point_key, Edge, PointKey, Rect, Triangle};

/// Triangulate a point set
///
/// Input points are deduplicated on the quantized grid before insertion.
/// Fewer than 3 unique points fail with `InsufficientPoints`. A degenerate
/// circumcircle reached mid-insertion aborts the whole call rather than
/// producing a partially built mesh. A fully collinear input survives to the
/// end but every triangle shares a super-triangle vertex, so the result is
/// an empty list, not an error.
pub fn triangulate(points: &[Vec2]) -> Result<Vec<Triangle>> {
    let mut seen: HashSet<PointKey> = HashSet::with_capacity(points.len());
    let unique: Vec<Vec2> = points
        .iter()
        .copied()
        .filter(|p| seen.insert(point_key(*p)))
        .collect();

    if unique.len() < 3 {
        return Err(CityError::InsufficientPoints {
            expected: 3,
            actual: unique.len(),
        });
    }

    let super_tri = super_triangle(&unique);
    let mut triangles = vec![super_tri];

    for &p in &unique {
        insert_point(&mut triangles, p)?;
        trace!(
            "inserted point ({}, {}), {} triangles",
            p.x,
            p.y,
            triangles.len()
        );
    }

    let result: Vec<Triangle> = triangles
        .into_iter()
        .filter(|t| !super_tri.points.iter().any(|&sp| t.has_vertex(sp)))
        .collect();

    debug!(
        "triangulated {} unique points into {} triangles",
        unique.len(),
        result.len()
    );
    Ok(result)
}

/// Build a triangle strictly containing every input point
///
/// Sized from the point set's bounding box expanded by 2x, so points on the
/// original hull never touch a super-triangle edge.
fn super_triangle(points: &[Vec2]) -> Triangle {
    let bounds = Rect::from_points(points)
        .unwrap_or(Rect::from_size(1.0, 1.0))
        .expanded(2.0);
    let span = bounds.width().max(bounds.height()).max(1.0);
    let c = bounds.center();
    Triangle::new(
        Vec2::new(c.x - 2.0 * span, c.y - span),
        Vec2::new(c.x + 2.0 * span, c.y - span),
        Vec2::new(c.x, c.y + 2.0 * span),
    )
}

/// Insert one point into the current triangulation
fn insert_point(triangles: &mut Vec<Triangle>, p: Vec2) -> Result<()> {
    // Cavity: every triangle whose circumcircle contains the point.
    let mut bad: Vec<usize> = Vec::new();
    for (i, t) in triangles.iter().enumerate() {
        if t.circumcircle_contains(p)? {
            bad.push(i);
        }
    }
    if bad.is_empty() {
        return Ok(());
    }

    let mut cavity_edges: Vec<Edge> = Vec::with_capacity(bad.len() * 3);
    for &i in &bad {
        cavity_edges.extend(triangles[i].edges());
    }
    for &i in bad.iter().rev() {
        triangles.swap_remove(i);
    }

    // An edge shared by two removed triangles is interior to the cavity and
    // must be discarded; only edges seen exactly once (undirected) form the
    // cavity boundary.
    let mut counts: HashMap<(PointKey, PointKey), usize> = HashMap::new();
    for e in &cavity_edges {
        *counts.entry(e.key()).or_insert(0) += 1;
    }
    for e in cavity_edges {
        if counts[&e.key()] == 1 {
            let t = Triangle::new(e.a, e.b, p);
            // Numerically degenerate insertions can collapse a cavity edge
            // onto the new point; such triangles are dropped immediately.
            if !t.has_duplicate_vertex() {
                triangles.push(t);
            }
        }
    }
    Ok(())
}
