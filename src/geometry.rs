//! 2D geometry kernel
//!
//! Stateless primitives and predicates shared by the triangulator, the
//! Voronoi builder, and the road generator: bounds rectangles, undirected
//! edges, triangles with circumcircle predicates, segment intersection,
//! area-uniform triangle sampling, and the shoelace polygon centroid.

use glam::Vec2;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CityError, Result};

/// Tolerance for treating two coordinates as geometrically equal
pub const EPSILON: f32 = 1e-4;

/// Quantization scale for point keys (1e-3 grid resolution)
const KEY_SCALE: f32 = 1000.0;

/// Quantized grid key for a point
///
/// Floating-point `==` on coordinates is unreliable for deduplication and
/// graph lookups. Keys snap coordinates to a 1e-3 grid so that points
/// produced by independent computations still collide when they coincide.
pub type PointKey = (i64, i64);

/// Compute the quantized lookup key for a point
#[inline]
pub fn point_key(p: Vec2) -> PointKey {
    (
        (p.x * KEY_SCALE).round() as i64,
        (p.y * KEY_SCALE).round() as i64,
    )
}

/// Epsilon-based equality for two points
#[inline]
pub fn points_equal(a: Vec2, b: Vec2) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

/// Axis-aligned generation bounds
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner (lowest x and y)
    pub min: Vec2,
    /// Maximum corner (highest x and y)
    pub max: Vec2,
}

impl Rect {
    /// Create bounds from two corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create bounds of the given size with the minimum corner at the origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    /// Smallest rectangle containing all of the given points
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for &p in &points[1..] {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }

    /// Width of the bounds
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the bounds
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point of the bounds
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Check whether a point lies within the bounds (inclusive)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Scale the bounds about their center by the given factor
    pub fn expanded(&self, factor: f32) -> Self {
        let center = self.center();
        let half = (self.max - self.min) * 0.5 * factor;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// A line segment between two points
///
/// Equality is undirected: `(a, b)` and `(b, a)` compare equal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// First endpoint
    pub a: Vec2,
    /// Second endpoint
    pub b: Vec2,
}

impl Edge {
    /// Create a segment between two points
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// Length of the segment
    #[inline]
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    /// Point at parameter `t` along the segment (`t = 0` is `a`, `t = 1` is `b`)
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.a.lerp(self.b, t)
    }

    /// Direction-independent lookup key
    ///
    /// The two endpoint keys are ordered so that both orientations of the
    /// same segment produce the same key.
    pub fn key(&self) -> (PointKey, PointKey) {
        let ka = point_key(self.a);
        let kb = point_key(self.b);
        if ka <= kb {
            (ka, kb)
        } else {
            (kb, ka)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (points_equal(self.a, other.a) && points_equal(self.b, other.b))
            || (points_equal(self.a, other.b) && points_equal(self.b, other.a))
    }
}

/// A triangle defined by three points
///
/// Edges are derived on demand rather than stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// The three vertices
    pub points: [Vec2; 3],
}

impl Triangle {
    /// Create a triangle from three vertices
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { points: [a, b, c] }
    }

    /// The three edges of the triangle
    pub fn edges(&self) -> [Edge; 3] {
        [
            Edge::new(self.points[0], self.points[1]),
            Edge::new(self.points[1], self.points[2]),
            Edge::new(self.points[2], self.points[0]),
        ]
    }

    /// Centroid (vertex average) of the triangle
    #[inline]
    pub fn centroid(&self) -> Vec2 {
        (self.points[0] + self.points[1] + self.points[2]) / 3.0
    }

    /// Check whether `p` is one of the triangle's vertices
    pub fn has_vertex(&self, p: Vec2) -> bool {
        self.points.iter().any(|&v| points_equal(v, p))
    }

    /// Count vertices shared with another triangle
    pub fn shared_vertex_count(&self, other: &Triangle) -> usize {
        self.points
            .iter()
            .filter(|&&v| other.has_vertex(v))
            .count()
    }

    /// Check whether any two vertices coincide
    pub fn has_duplicate_vertex(&self) -> bool {
        points_equal(self.points[0], self.points[1])
            || points_equal(self.points[1], self.points[2])
            || points_equal(self.points[2], self.points[0])
    }

    /// Circumcircle center and radius
    ///
    /// Solves the perpendicular-bisector system in closed form. Collinear or
    /// coincident vertices make the system unsolvable (this covers the
    /// classic two-vertices-share-a-Y special case as well as equal bisector
    /// slopes) and fail with `DegenerateGeometry` instead of dividing by a
    /// vanishing denominator.
    pub fn circumcircle(&self) -> Result<(Vec2, f32)> {
        // f64 intermediates: f32 loses in-circle ties for sites a few
        // hundred units apart.
        let ax = self.points[0].x as f64;
        let ay = self.points[0].y as f64;
        let bx = self.points[1].x as f64;
        let by = self.points[1].y as f64;
        let cx = self.points[2].x as f64;
        let cy = self.points[2].y as f64;

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        if d.abs() < 1e-9 {
            return Err(CityError::DegenerateGeometry(format!(
                "collinear or coincident triangle vertices: {:?}",
                self.points
            )));
        }

        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

        let center = Vec2::new(ux as f32, uy as f32);
        let radius = ((ax - ux) * (ax - ux) + (ay - uy) * (ay - uy)).sqrt() as f32;
        Ok((center, radius))
    }

    /// Check whether a point lies within the triangle's circumcircle
    ///
    /// Compares squared distances; points exactly on the circle count as
    /// inside (inclusive test).
    pub fn circumcircle_contains(&self, p: Vec2) -> Result<bool> {
        let (center, radius) = self.circumcircle()?;
        let dx = (p.x - center.x) as f64;
        let dy = (p.y - center.y) as f64;
        let r = radius as f64;
        Ok(dx * dx + dy * dy <= r * r)
    }
}

/// Intersection point of two line segments
///
/// Each segment is expressed as `Ax + By = C` and the two equations are
/// solved simultaneously. Returns `None` when the determinant of the system
/// vanishes (parallel segments) or when the line-line solution falls outside
/// either segment's coordinate range.
pub fn segment_intersect(s1: &Edge, s2: &Edge) -> Option<Vec2> {
    let a1 = (s1.b.y - s1.a.y) as f64;
    let b1 = (s1.a.x - s1.b.x) as f64;
    let c1 = a1 * s1.a.x as f64 + b1 * s1.a.y as f64;

    let a2 = (s2.b.y - s2.a.y) as f64;
    let b2 = (s2.a.x - s2.b.x) as f64;
    let c2 = a2 * s2.a.x as f64 + b2 * s2.a.y as f64;

    let det = a1 * b2 - a2 * b1;
    if det.abs() < 1e-9 {
        return None;
    }

    let x = ((b2 * c1 - b1 * c2) / det) as f32;
    let y = ((a1 * c2 - a2 * c1) / det) as f32;

    let on_segment = |s: &Edge| {
        x >= s.a.x.min(s.b.x) - EPSILON
            && x <= s.a.x.max(s.b.x) + EPSILON
            && y >= s.a.y.min(s.b.y) - EPSILON
            && y <= s.a.y.max(s.b.y) + EPSILON
    };
    if on_segment(s1) && on_segment(s2) {
        Some(Vec2::new(x, y))
    } else {
        None
    }
}

/// Sample a uniformly distributed random point inside a triangle
///
/// Uses the barycentric form `(1-√r1)·P1 + √r1(1-r2)·P2 + √r1·r2·P3` with
/// two uniform draws; the square root is what makes the distribution
/// area-uniform rather than clustered toward `P1`.
pub fn random_point_in_triangle<R: Rng>(t: &Triangle, rng: &mut R) -> Vec2 {
    let r1: f32 = rng.gen();
    let r2: f32 = rng.gen();
    let s = r1.sqrt();
    t.points[0] * (1.0 - s) + t.points[1] * (s * (1.0 - r2)) + t.points[2] * (s * r2)
}

/// Area-weighted centroid of a polygon
///
/// Uses the shoelace formula, not the vertex average, so unevenly spaced
/// boundary points do not skew the result. Fewer than 3 points or a
/// zero-area (collinear) boundary is invalid input.
pub fn polygon_centroid(points: &[Vec2]) -> Result<Vec2> {
    if points.len() < 3 {
        return Err(CityError::DegenerateGeometry(format!(
            "polygon centroid needs at least 3 points, got {}",
            points.len()
        )));
    }

    let mut area_sum = 0.0f64;
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        let cross = p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
        area_sum += cross;
        cx += (p.x as f64 + q.x as f64) * cross;
        cy += (p.y as f64 + q.y as f64) * cross;
    }

    if area_sum.abs() < 1e-9 {
        return Err(CityError::DegenerateGeometry(
            "zero-area polygon has no centroid".to_string(),
        ));
    }

    Ok(Vec2::new(
        (cx / (3.0 * area_sum)) as f32,
        (cy / (3.0 * area_sum)) as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rect_queries() {
        let rect = Rect::from_size(100.0, 50.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);
        assert_eq!(rect.center(), Vec2::new(50.0, 25.0));
        assert!(rect.contains(Vec2::new(50.0, 25.0)));
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(!rect.contains(Vec2::new(101.0, 25.0)));
        assert!(!rect.contains(Vec2::new(50.0, -1.0)));
    }

    #[test]
    fn test_rect_expanded() {
        let rect = Rect::from_size(100.0, 100.0).expanded(2.0);
        assert_eq!(rect.min, Vec2::new(-50.0, -50.0));
        assert_eq!(rect.max, Vec2::new(150.0, 150.0));
    }

    #[test]
    fn test_rect_from_points() {
        let points = vec![
            Vec2::new(3.0, 7.0),
            Vec2::new(-1.0, 2.0),
            Vec2::new(5.0, 0.0),
        ];
        let rect = Rect::from_points(&points).unwrap();
        assert_eq!(rect.min, Vec2::new(-1.0, 0.0));
        assert_eq!(rect.max, Vec2::new(5.0, 7.0));

        assert!(Rect::from_points(&[]).is_none());
    }

    #[test]
    fn test_edge_equality_is_undirected() {
        let e1 = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let e2 = Edge::new(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0));
        let e3 = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0));
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
        assert_eq!(e1.key(), e2.key());
    }

    #[test]
    fn test_edge_geometry() {
        let e = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(e.midpoint(), Vec2::new(5.0, 0.0));
        assert_eq!(e.length(), 10.0);
        assert_eq!(e.point_at(0.25), Vec2::new(2.5, 0.0));
    }

    #[test]
    fn test_circumcircle_right_triangle() {
        let t = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 3.0),
        );
        let (center, radius) = t.circumcircle().unwrap();
        // Hypotenuse midpoint is the circumcenter of a right triangle.
        assert!(center.abs_diff_eq(Vec2::new(2.0, 1.5), 1e-5));
        assert!((radius - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_circumcircle_shared_y_vertices() {
        // Two vertices share a Y coordinate; the closed-form solve must not
        // special-case its way into a division by zero.
        let t = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(2.0, 3.0),
        );
        let (center, radius) = t.circumcircle().unwrap();
        for &p in &t.points {
            assert!((center.distance(p) - radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_circumcircle_collinear_fails() {
        let t = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
        );
        assert!(matches!(
            t.circumcircle(),
            Err(CityError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_circumcircle_contains_is_inclusive() {
        let t = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 3.0),
        );
        // Vertices lie exactly on the circle and must count as inside.
        assert!(t.circumcircle_contains(Vec2::new(4.0, 0.0)).unwrap());
        assert!(t.circumcircle_contains(Vec2::new(1.0, 1.0)).unwrap());
        assert!(!t.circumcircle_contains(Vec2::new(10.0, 10.0)).unwrap());
    }

    #[test]
    fn test_triangle_shared_vertices() {
        let t1 = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        );
        let t2 = Triangle::new(
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        assert_eq!(t1.shared_vertex_count(&t2), 2);
        assert!(!t1.has_duplicate_vertex());

        let degenerate = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
        );
        assert!(degenerate.has_duplicate_vertex());
    }

    #[test]
    fn test_segment_intersect_crossing() {
        let s1 = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let s2 = Edge::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0));
        let p = segment_intersect(&s1, &s2).unwrap();
        assert!(p.abs_diff_eq(Vec2::new(5.0, 5.0), 1e-5));
    }

    #[test]
    fn test_segment_intersect_parallel() {
        let s1 = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        let s2 = Edge::new(Vec2::new(0.0, 1.0), Vec2::new(10.0, 1.0));
        assert!(segment_intersect(&s1, &s2).is_none());
    }

    #[test]
    fn test_segment_intersect_disjoint() {
        // Lines cross at (5, 5) but the second segment stops short of it.
        let s1 = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let s2 = Edge::new(Vec2::new(0.0, 10.0), Vec2::new(4.0, 6.0));
        assert!(segment_intersect(&s1, &s2).is_none());
    }

    #[test]
    fn test_random_point_in_triangle_uniformity() {
        let t = Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(0.0, 9.0),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let mut sum = Vec2::ZERO;
        let samples = 10_000;
        for _ in 0..samples {
            let p = random_point_in_triangle(&t, &mut rng);
            // Every sample stays inside the triangle (x + y <= 9).
            assert!(p.x >= -EPSILON && p.y >= -EPSILON);
            assert!(p.x + p.y <= 9.0 + EPSILON);
            sum += p;
        }

        let mean = sum / samples as f32;
        let centroid = t.centroid();
        assert!(
            mean.abs_diff_eq(centroid, 0.15),
            "sample mean {:?} should converge to centroid {:?}",
            mean,
            centroid
        );
    }

    #[test]
    fn test_polygon_centroid_square() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let c = polygon_centroid(&square).unwrap();
        assert!(c.abs_diff_eq(Vec2::new(1.0, 1.0), 1e-5));
    }

    #[test]
    fn test_polygon_centroid_triangle() {
        let tri = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(0.0, 6.0),
        ];
        let c = polygon_centroid(&tri).unwrap();
        assert!(c.abs_diff_eq(Vec2::new(2.0, 2.0), 1e-5));
    }

    #[test]
    fn test_polygon_centroid_invalid() {
        assert!(polygon_centroid(&[Vec2::ZERO, Vec2::ONE]).is_err());

        let collinear = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
        ];
        assert!(matches!(
            polygon_centroid(&collinear),
            Err(CityError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_point_key_quantization() {
        let a = Vec2::new(1.00001, 2.00001);
        let b = Vec2::new(1.00002, 2.00002);
        assert_eq!(point_key(a), point_key(b));
        assert_ne!(point_key(a), point_key(Vec2::new(1.01, 2.0)));
        assert!(points_equal(a, b));
    }
}
