use crate::collision::detection::line::segment_intersection;
use crate::error::{CollisionError, Result};
use crate::math::vec2::Vec2;

/// Two vertices closer than this are merged during canonicalization.
const MERGE_EPSILON: f64 = 1e-9;

/// Untransformed polygon geometry: a closed ring of points plus the center that
/// rotation and scale pivot around.
///
/// The ring is canonicalized on construction: duplicate consecutive points and
/// a repeated closing point are dropped, and the winding is made consistent so
/// that edge normals point outwards. Only convex rings are accepted, since the
/// separating-axis tests depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
    center: Vec2,
}

/// An axis-aligned rectangle, the only polygon the narrow phase may treat as a box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape(Polygon);

impl BoxShape {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        Ok(BoxShape(Polygon::rect(width, height)?))
    }

    pub fn width(&self) -> f64 {
        self.0.points[2].x
    }

    pub fn height(&self) -> f64 {
        self.0.points[2].y
    }

    pub fn polygon(&self) -> &Polygon {
        &self.0
    }
}

impl Polygon {
    /// Creates a new polygon from a ring of points.
    ///
    /// Fails with `InvalidArgument` when fewer than 3 distinct points remain,
    /// when the points are collinear, when the ring crosses itself or when it is concave.
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CollisionError::invalid("polygon points must be finite"));
        }

        let mut ring: Vec<Vec2> = Vec::with_capacity(points.len());
        for p in points {
            if ring.last().map_or(true, |last| last.distance_squared(p) > MERGE_EPSILON * MERGE_EPSILON) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && ring[0].distance_squared(ring[ring.len() - 1]) <= MERGE_EPSILON * MERGE_EPSILON {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(CollisionError::invalid(format!(
                "polygon needs at least 3 distinct points, got {}",
                ring.len()
            )));
        }

        let signed_area = signed_area(&ring);
        if signed_area.abs() < 1e-10 {
            return Err(CollisionError::invalid("polygon points are collinear"));
        }
        if signed_area < 0.0 {
            ring.reverse();
        }
        if is_self_intersecting(&ring) {
            return Err(CollisionError::invalid("polygon ring intersects itself"));
        }
        if !is_convex_ring(&ring) {
            return Err(CollisionError::invalid("polygon must be convex"));
        }

        let center = centroid(&ring);
        Ok(Polygon { points: ring, center })
    }

    /// An axis-aligned `width` x `height` rectangle with corners at
    /// (0,0), (w,0), (w,h), (0,h).
    pub fn rect(width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(CollisionError::invalid(format!(
                "box size must be positive, got {width}x{height}"
            )));
        }
        Ok(Polygon {
            points: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
            center: Vec2::new(width / 2.0, height / 2.0),
        })
    }

    /// A regular polygon with `count` vertices on a circle of `radius` around the origin.
    pub fn regular(count: usize, radius: f64) -> Result<Self> {
        if count < 3 {
            return Err(CollisionError::invalid(format!(
                "regular polygon needs at least 3 vertices, got {count}"
            )));
        }
        if !(radius > 0.0) {
            return Err(CollisionError::invalid(format!("regular polygon radius must be positive, got {radius}")));
        }
        let step = std::f64::consts::TAU / count as f64;
        let points = (0..count)
            .map(|i| Vec2::new(radius * (step * i as f64).cos(), radius * (step * i as f64).sin()))
            .collect();
        Self::new(points)
    }

    /// Ring in canonical winding.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Pivot for rotation and scale.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Calculates the area of the polygon using the Shoelace formula.
    pub fn calculate_area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    /// Returns the outward-facing unit normal of every edge `points[i] -> points[i+1]`.
    pub fn get_edge_normals(&self) -> Vec<Vec2> {
        edge_normals(&self.points)
    }

    /// Whether every turn along the ring goes the same way.
    pub fn is_convex(&self) -> bool {
        is_convex_ring(&self.points)
    }
}

/// Every turn of a positively wound ring bends left; straight runs are allowed.
fn is_convex_ring(points: &[Vec2]) -> bool {
    let n = points.len();
    (0..n).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let (ab, bc) = (b - a, c - b);
        ab.cross(bc) >= -1e-9 * ab.magnitude() * bc.magnitude()
    })
}

/// Signed shoelace area; positive for the canonical winding.
pub(crate) fn signed_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        area += points[i].cross(points[(i + 1) % n]);
    }
    area / 2.0
}

/// Outward normals for a ring with positive signed area.
pub(crate) fn edge_normals(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let edge = points[(i + 1) % n] - points[i];
            (-edge.perpendicular()).normalize()
        })
        .collect()
}

/// Area-weighted centroid, falling back to the vertex average for degenerate rings.
fn centroid(points: &[Vec2]) -> Vec2 {
    let n = points.len();
    let origin = points[0];
    let mut centroid = Vec2::ZERO;
    let mut signed_area_sum = 0.0;

    for i in 1..(n - 1) {
        let v2 = points[i];
        let v3 = points[i + 1];
        let triangle_signed_area = (v2 - origin).cross(v3 - origin) / 2.0;
        signed_area_sum += triangle_signed_area;
        centroid += (origin + v2 + v3) / 3.0 * triangle_signed_area;
    }

    if signed_area_sum.abs() < 1e-10 {
        let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
        sum / n as f64
    } else {
        centroid / signed_area_sum
    }
}

fn is_self_intersecting(points: &[Vec2]) -> bool {
    let n = points.len();
    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            // edges i and j share a vertex when they are neighbours around the ring
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segment_intersection(a1, a2, b1, b2).is_some() {
                return true;
            }
        }
    }
    false
}
