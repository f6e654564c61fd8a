use crate::collision::result::{CollisionResult, RaycastHit, ShapeHit};
use crate::math::vec2::Vec2;
use crate::shapes::world_shape::{WorldCircle, WorldLine, WorldPolygon};

/// Finds the point on a line segment closest to a given point.
/// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
pub fn closest_point_on_segment(segment_a: Vec2, segment_b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = segment_b - segment_a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq < 1e-12 {
        return (segment_a, 0.0);
    }

    let t = ((point - segment_a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    (segment_a + segment_vec * t, t)
}

/// Parametric intersection of segments `a1 -> a2` and `b1 -> b2`.
///
/// Returns the intersection point and the parameters `(t, u)` along A and B.
/// Endpoints count (`t, u` in `[0, 1]`); parallel and collinear segments never intersect.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(Vec2, f64, f64)> {
    let b = a2 - a1;
    let d = b2 - b1;
    let b_cross_d = b.cross(d);
    if b_cross_d.abs() < 1e-10 {
        return None;
    }

    let c = b1 - a1;
    let t = c.cross(d) / b_cross_d;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let u = c.cross(b) / b_cross_d;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some((a1 + b * t, t, u))
}

pub fn line_overlaps_line(first: &WorldLine, second: &WorldLine) -> bool {
    segment_intersection(first.start, first.end, second.start, second.end).is_some()
}

/// Casts `ray` against `target`. The normal is `target`'s perpendicular, facing the ray start.
pub fn cast_line_line(ray: &WorldLine, target: &WorldLine) -> Option<RaycastHit> {
    let (point, t, _) = segment_intersection(ray.start, ray.end, target.start, target.end)?;
    let mut normal = target.direction().perpendicular().normalize();
    if normal.dot(ray.start - point) < 0.0 {
        normal = -normal;
    }
    Some(RaycastHit::new(t, ray.length() * t, point, normal))
}

/// Segment vs segment with contact output.
///
/// Two crossing segments have no penetration depth, so the translation vector
/// reported here is the vector from the intersection to the nearest of the
/// four endpoints. It is a usable nudge, not a true minimum translation.
pub fn line_to_line(first: &WorldLine, second: &WorldLine) -> Option<ShapeHit> {
    let hit = cast_line_line(first, second)?;
    let nearest = [first.start, first.end, second.start, second.end]
        .into_iter()
        .min_by(|p, q| p.distance_squared(hit.point).total_cmp(&q.distance_squared(hit.point)))?;

    Some(ShapeHit {
        result: CollisionResult {
            normal: hit.normal,
            minimum_translation_vector: nearest - hit.point,
            point: hit.point,
        },
        raycast: Some(hit),
    })
}

pub fn line_overlaps_circle(line: &WorldLine, circle: &WorldCircle) -> bool {
    let (closest, _) = closest_point_on_segment(line.start, line.end, circle.center);
    closest.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Segment vs circle using the quadratic ray formulation.
/// A start point inside the circle hits at fraction 0; a tangent graze is a miss.
pub fn cast_line_circle(line: &WorldLine, circle: &WorldCircle) -> Option<RaycastHit> {
    let radius_sq = circle.radius * circle.radius;
    let length = line.length();
    if length == 0.0 {
        let inside = line.start.distance_squared(circle.center) < radius_sq;
        return inside.then(|| RaycastHit::new(0.0, 0.0, line.start, (line.start - circle.center).normalize()));
    }

    let d = line.direction() / length;
    let m = line.start - circle.center;
    let b = m.dot(d);
    let c = m.dot(m) - radius_sq;

    // start outside and pointing away
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant <= 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()).max(0.0);
    if t > length {
        return None;
    }
    let point = line.start + d * t;
    Some(RaycastHit::new(
        t / length,
        t,
        point,
        (point - circle.center).normalize(),
    ))
}

/// Circle (first) vs segment (second).
pub fn circle_to_line(circle: &WorldCircle, line: &WorldLine) -> Option<ShapeHit> {
    let (closest, _) = closest_point_on_segment(line.start, line.end, circle.center);
    let distance_sq = closest.distance_squared(circle.center);
    if distance_sq >= circle.radius * circle.radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    let normal = if distance > 1e-10 {
        (circle.center - closest) / distance
    } else {
        // center on the segment: push off to one side
        line.direction().perpendicular().normalize()
    };
    let depth = circle.radius - distance;

    Some(ShapeHit {
        result: CollisionResult {
            normal,
            minimum_translation_vector: -normal * depth,
            point: closest,
        },
        raycast: cast_line_circle(line, circle),
    })
}

pub fn line_overlaps_polygon(line: &WorldLine, polygon: &WorldPolygon) -> bool {
    polygon.contains_point(line.start)
        || polygon
            .edges()
            .any(|(a, b, _)| segment_intersection(a, b, line.start, line.end).is_some())
}

/// First hit of the segment on the polygon boundary.
/// A start point inside the polygon hits at fraction 0 with a normal facing back along the segment.
pub fn cast_line_polygon(line: &WorldLine, polygon: &WorldPolygon) -> Option<RaycastHit> {
    if polygon.contains_point(line.start) {
        return Some(RaycastHit::new(0.0, 0.0, line.start, (-line.direction()).normalize()));
    }

    let length = line.length();
    let mut best: Option<RaycastHit> = None;
    for (a, b, normal) in polygon.edges() {
        if let Some((point, _, u)) = segment_intersection(a, b, line.start, line.end) {
            if best.map_or(true, |hit| u < hit.fraction) {
                best = Some(RaycastHit::new(u, u * length, point, normal));
            }
        }
    }
    best
}

/// Segment (first) vs polygon (second).
///
/// The contact sits on the first edge the segment crosses. Depth is how far the
/// segment's end lies behind that edge.
pub fn line_to_polygon(line: &WorldLine, polygon: &WorldPolygon) -> Option<ShapeHit> {
    let hit = cast_line_polygon(line, polygon)?;
    let depth = (hit.point - line.end).dot(hit.normal).max(0.0);
    Some(ShapeHit {
        result: CollisionResult {
            normal: hit.normal,
            minimum_translation_vector: -hit.normal * depth,
            point: hit.point,
        },
        raycast: Some(hit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::aabb::AABB;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-9;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> WorldLine {
        WorldLine::new(Vec2::new(ax, ay), Vec2::new(bx, by))
    }

    fn square(x: f64, y: f64, size: f64) -> WorldPolygon {
        WorldPolygon::from_rect(&AABB::from_position_size(Vec2::new(x, y), Vec2::new(size, size)))
    }

    #[test]
    fn test_segment_intersection_crossing() {
        let (p, t, u) = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(p, Vec2::new(5.0, 5.0), epsilon = EPSILON);
        assert!((0.0..=1.0).contains(&t));
        assert!((0.0..=1.0).contains(&u));
        assert_abs_diff_eq!(t, 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_segment_intersection_rejects_out_of_range_and_parallel() {
        // would cross at t = 1.5
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 0.0)
        )
        .is_none());
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0)
        )
        .is_none());
        // collinear
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0)
        )
        .is_none());
    }

    #[test]
    fn test_segment_intersection_touching_endpoints() {
        let (p, t, u) = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(p, Vec2::new(1.0, 1.0), epsilon = EPSILON);
        assert_abs_diff_eq!(t, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(u, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_line_to_line_reports_nearest_endpoint_vector() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 10.0, 6.0, 4.0);
        let hit = line_to_line(&a, &b).unwrap();
        assert_abs_diff_eq!(hit.result.point, Vec2::new(5.0, 5.0), epsilon = EPSILON);
        // (6,4) is the closest endpoint to (5,5)
        assert_abs_diff_eq!(hit.result.minimum_translation_vector, Vec2::new(1.0, -1.0), epsilon = EPSILON);
        let raycast = hit.raycast.unwrap();
        assert_abs_diff_eq!(raycast.fraction, 0.5, epsilon = EPSILON);
        // normal faces back towards the start of `a`
        assert!(raycast.normal.dot(a.start - raycast.point) > 0.0);
    }

    #[test]
    fn test_cast_line_circle_from_outside() {
        let circle = WorldCircle { center: Vec2::new(10.0, 0.0), radius: 2.0 };
        let hit = cast_line_circle(&seg(0.0, 0.0, 20.0, 0.0), &circle).unwrap();
        assert_abs_diff_eq!(hit.point, Vec2::new(8.0, 0.0), epsilon = EPSILON);
        assert_abs_diff_eq!(hit.distance, 8.0, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.fraction, 0.4, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_cast_line_circle_misses() {
        let circle = WorldCircle { center: Vec2::new(10.0, 0.0), radius: 2.0 };
        // stops short
        assert!(cast_line_circle(&seg(0.0, 0.0, 7.0, 0.0), &circle).is_none());
        // points away
        assert!(cast_line_circle(&seg(0.0, 0.0, -20.0, 0.0), &circle).is_none());
        // tangent
        assert!(cast_line_circle(&seg(0.0, 2.0, 20.0, 2.0), &circle).is_none());
    }

    #[test]
    fn test_cast_line_circle_from_inside_clamps_to_start() {
        let circle = WorldCircle { center: Vec2::new(0.0, 0.0), radius: 5.0 };
        let hit = cast_line_circle(&seg(1.0, 0.0, 20.0, 0.0), &circle).unwrap();
        assert_eq!(hit.fraction, 0.0);
        assert_eq!(hit.point, Vec2::new(1.0, 0.0));
        assert_abs_diff_eq!(hit.normal, Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_circle_to_line_pushes_circle_off_line() {
        let circle = WorldCircle { center: Vec2::new(0.0, 0.0), radius: 1.0 };
        let hit = circle_to_line(&circle, &seg(-2.0, 0.5, 2.0, 0.5)).unwrap();
        assert_abs_diff_eq!(hit.result.normal, Vec2::new(0.0, -1.0), epsilon = EPSILON);
        assert_abs_diff_eq!(hit.result.minimum_translation_vector, Vec2::new(0.0, 0.5), epsilon = EPSILON);
        assert_abs_diff_eq!(hit.result.point, Vec2::new(0.0, 0.5), epsilon = EPSILON);
        assert!(hit.raycast.is_some());

        // touching the endpoint exactly is not a collision
        let touching = WorldCircle { center: Vec2::new(1.0, 1.0), radius: 1.0 };
        assert!(circle_to_line(&touching, &seg(1.0, 0.0, 3.0, 0.0)).is_none());
        assert!(!line_overlaps_circle(&seg(1.0, 0.0, 3.0, 0.0), &touching));
    }

    #[test]
    fn test_cast_line_polygon_reports_nearest_edge() {
        let square = square(0.0, 0.0, 10.0);
        let hit = cast_line_polygon(&seg(-5.0, 5.0, 15.0, 5.0), &square).unwrap();
        assert_abs_diff_eq!(hit.point, Vec2::new(0.0, 5.0), epsilon = EPSILON);
        assert_abs_diff_eq!(hit.fraction, 0.25, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);

        let reverse = cast_line_polygon(&seg(15.0, 5.0, -5.0, 5.0), &square).unwrap();
        assert_abs_diff_eq!(reverse.point, Vec2::new(10.0, 5.0), epsilon = EPSILON);
        assert_abs_diff_eq!(reverse.normal, Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_line_inside_polygon_overlaps() {
        let square = square(0.0, 0.0, 10.0);
        let inner = seg(2.0, 2.0, 8.0, 8.0);
        assert!(line_overlaps_polygon(&inner, &square));
        let hit = cast_line_polygon(&inner, &square).unwrap();
        assert_eq!(hit.fraction, 0.0);
        assert!(!line_overlaps_polygon(&seg(11.0, 0.0, 11.0, 10.0), &square));
    }

    #[test]
    fn test_line_to_polygon_depth_behind_edge() {
        let square = square(0.0, 0.0, 10.0);
        let hit = line_to_polygon(&seg(-5.0, 5.0, 3.0, 5.0), &square).unwrap();
        assert_abs_diff_eq!(hit.result.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
        assert_abs_diff_eq!(hit.result.minimum_translation_vector, Vec2::new(3.0, 0.0), epsilon = EPSILON);
    }
}
