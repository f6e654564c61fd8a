use crate::collision::aabb::AABB;
use crate::collision::result::CollisionResult;
use crate::math::vec2::Vec2;
use crate::shapes::world_shape::{WorldCircle, WorldPolygon};

pub fn circle_overlaps_circle(first: &WorldCircle, second: &WorldCircle) -> bool {
    let radius_sum = first.radius + second.radius;
    first.center.distance_squared(second.center) < radius_sum * radius_sum
}

/// Circle vs circle. Coincident centers push the first circle down.
pub fn circle_to_circle(first: &WorldCircle, second: &WorldCircle) -> Option<CollisionResult> {
    let radius_sum = first.radius + second.radius;
    let distance_sq = first.center.distance_squared(second.center);
    if distance_sq >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    let normal = if distance > 1e-10 {
        (first.center - second.center) / distance
    } else {
        Vec2::DOWN
    };
    let depth = radius_sum - distance;

    Some(CollisionResult {
        normal,
        minimum_translation_vector: -normal * depth,
        point: second.center + normal * second.radius,
    })
}

pub fn circle_overlaps_box(circle: &WorldCircle, bounds: &AABB) -> bool {
    if bounds.strictly_contains(circle.center) {
        return true;
    }
    let clamped = circle.center.max(bounds.min).min(bounds.max);
    clamped.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Circle vs axis-aligned box, using the closest point on the box border.
pub fn circle_to_box(circle: &WorldCircle, bounds: &AABB) -> Option<CollisionResult> {
    let (closest, border_normal) = bounds.closest_point_on_border(circle.center);

    if bounds.strictly_contains(circle.center) {
        let safe_place = closest + border_normal * circle.radius;
        return Some(CollisionResult {
            normal: border_normal,
            minimum_translation_vector: circle.center - safe_place,
            point: closest,
        });
    }

    let distance_sq = closest.distance_squared(circle.center);
    if distance_sq >= circle.radius * circle.radius {
        return None;
    }

    if distance_sq == 0.0 {
        // center sits on the border
        let normal = border_normal.normalize();
        return Some(CollisionResult {
            normal,
            minimum_translation_vector: -normal * circle.radius,
            point: closest,
        });
    }

    let distance = distance_sq.sqrt();
    let normal = (circle.center - closest) / distance;
    Some(CollisionResult {
        normal,
        minimum_translation_vector: normal * (distance - circle.radius),
        point: closest,
    })
}

pub fn circle_overlaps_polygon(circle: &WorldCircle, polygon: &WorldPolygon) -> bool {
    if polygon.contains_point(circle.center) {
        return true;
    }
    let (_, distance_sq, _) = polygon.closest_point(circle.center);
    distance_sq < circle.radius * circle.radius
}

/// Circle vs arbitrary polygon.
///
/// The normal is the outward normal of the edge nearest to the circle center.
/// When the center is inside the polygon the penetration is taken as
/// `distance - radius` measured from that edge.
pub fn circle_to_polygon(circle: &WorldCircle, polygon: &WorldPolygon) -> Option<CollisionResult> {
    let (closest, distance_sq, normal) = polygon.closest_point(circle.center);
    let inside = polygon.contains_point(circle.center);
    if !inside && distance_sq >= circle.radius * circle.radius {
        return None;
    }

    let minimum_translation_vector = if inside {
        normal * (distance_sq.sqrt() - circle.radius)
    } else if distance_sq == 0.0 {
        -normal * circle.radius
    } else {
        let distance = distance_sq.sqrt();
        -(circle.center - closest) * ((circle.radius - distance) / distance)
    };

    Some(CollisionResult {
        normal,
        minimum_translation_vector,
        point: closest,
    })
}
