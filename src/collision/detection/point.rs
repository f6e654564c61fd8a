use crate::collision::aabb::AABB;
use crate::collision::result::{CollisionResult, RaycastHit};
use crate::math::vec2::Vec2;
use crate::shapes::world_shape::{WorldCircle, WorldLine, WorldPolygon};

use super::line::closest_point_on_segment;

/// How far a point may sit from a segment and still count as lying on it.
pub const ON_LINE_EPSILON: f64 = 1e-9;

pub fn point_overlaps_point(first: Vec2, second: Vec2) -> bool {
    first == second
}

/// Coincident points. There is no meaningful direction, so the normal and
/// translation are a fixed unit vector pointing down.
pub fn point_to_point(first: Vec2, second: Vec2) -> Option<CollisionResult> {
    point_overlaps_point(first, second).then_some(CollisionResult {
        normal: Vec2::DOWN,
        minimum_translation_vector: Vec2::DOWN,
        point: first,
    })
}

pub fn point_on_line(point: Vec2, line: &WorldLine) -> bool {
    let (closest, _) = closest_point_on_segment(line.start, line.end, point);
    closest.distance_squared(point) <= ON_LINE_EPSILON * ON_LINE_EPSILON
}

/// Casts `ray` against a bare point. The hit is the point itself and the
/// normal faces back along the ray.
pub fn cast_line_point(ray: &WorldLine, point: Vec2) -> Option<RaycastHit> {
    if !point_on_line(point, ray) {
        return None;
    }
    let (_, t) = closest_point_on_segment(ray.start, ray.end, point);
    let length = ray.length();
    let normal = if length == 0.0 { Vec2::DOWN } else { -ray.direction().normalize() };
    Some(RaycastHit::new(t, length * t, point, normal))
}

/// Point (first) on a segment (second).
///
/// The translation vector runs from the point to the nearer segment endpoint,
/// the same nudge [`line_to_line`](super::line::line_to_line) reports.
pub fn point_to_line(point: Vec2, line: &WorldLine) -> Option<CollisionResult> {
    if !point_on_line(point, line) {
        return None;
    }
    let nearest = if point.distance_squared(line.start) <= point.distance_squared(line.end) {
        line.start
    } else {
        line.end
    };
    Some(CollisionResult {
        normal: line.direction().perpendicular().normalize(),
        minimum_translation_vector: nearest - point,
        point,
    })
}

pub fn point_in_circle(point: Vec2, circle: &WorldCircle) -> bool {
    point.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Point (first) inside a circle (second), treating the point as a zero-radius circle.
pub fn point_to_circle(point: Vec2, circle: &WorldCircle) -> Option<CollisionResult> {
    let distance_sq = point.distance_squared(circle.center);
    if distance_sq >= circle.radius * circle.radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    let normal = if distance > 1e-10 {
        (point - circle.center) / distance
    } else {
        Vec2::DOWN
    };
    Some(CollisionResult {
        normal,
        minimum_translation_vector: -normal * (circle.radius - distance),
        point: circle.center + normal * circle.radius,
    })
}

pub fn point_in_box(point: Vec2, bounds: &AABB) -> bool {
    bounds.strictly_contains(point)
}

pub fn point_to_box(point: Vec2, bounds: &AABB) -> Option<CollisionResult> {
    if !point_in_box(point, bounds) {
        return None;
    }
    let (closest, normal) = bounds.closest_point_on_border(point);
    Some(CollisionResult {
        normal,
        minimum_translation_vector: point - closest,
        point: closest,
    })
}

/// Strict containment: a point on the boundary is touching, not inside.
pub fn point_in_polygon(point: Vec2, polygon: &WorldPolygon) -> bool {
    if polygon.is_axis_aligned_box() {
        return point_in_box(point, &polygon.bounds);
    }
    if !polygon.contains_point(point) {
        return false;
    }
    let (_, distance_sq, _) = polygon.closest_point(point);
    distance_sq > 0.0
}

pub fn point_to_polygon(point: Vec2, polygon: &WorldPolygon) -> Option<CollisionResult> {
    if polygon.is_axis_aligned_box() {
        return point_to_box(point, &polygon.bounds);
    }
    if !point_in_polygon(point, polygon) {
        return None;
    }
    let (closest, _, normal) = polygon.closest_point(point);
    Some(CollisionResult {
        normal,
        minimum_translation_vector: point - closest,
        point: closest,
    })
}
