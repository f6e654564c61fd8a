use crate::collision::aabb::AABB;
use crate::collision::result::CollisionResult;
use crate::math::vec2::Vec2;
use crate::shapes::world_shape::WorldPolygon;

/// Unrotated boxes overlap when their Minkowski difference strictly contains the origin.
pub fn box_overlaps_box(first: &AABB, second: &AABB) -> bool {
    first.minkowski_difference(second).strictly_contains(Vec2::ZERO)
}

pub fn box_to_box(first: &AABB, second: &AABB) -> Option<CollisionResult> {
    let difference = first.minkowski_difference(second);
    if !difference.strictly_contains(Vec2::ZERO) {
        return None;
    }

    let minimum_translation_vector = difference.closest_point_on_bounds_to_origin();
    let overlap = AABB::new(first.min.max(second.min), first.max.min(second.max));
    Some(CollisionResult {
        normal: (-minimum_translation_vector).normalize(),
        minimum_translation_vector,
        point: overlap.center(),
    })
}

/// Signed gap between two projected intervals; negative while they overlap.
fn interval_distance(min_a: f64, max_a: f64, min_b: f64, max_b: f64) -> f64 {
    if min_a < min_b {
        min_b - max_a
    } else {
        min_a - max_b
    }
}

/// Projects both polygons on `axis` and returns the signed gap.
fn axis_gap(first: &WorldPolygon, second: &WorldPolygon, offset: Vec2, axis: Vec2) -> f64 {
    let (min_a, max_a) = first.interval(axis);
    let (min_b, max_b) = second.interval(axis);
    let shift = offset.dot(axis);
    interval_distance(min_a + shift, max_a + shift, min_b, max_b)
}

pub fn polygon_overlaps_polygon(first: &WorldPolygon, second: &WorldPolygon) -> bool {
    let offset = first.position - second.position;
    first
        .normals
        .iter()
        .chain(second.normals.iter())
        .all(|axis| axis_gap(first, second, offset, *axis) < 0.0)
}

/// Separating axis test over the edge normals of both polygons.
///
/// The translation axis is the one with the smallest overlap, oriented to point
/// from `second` towards `first`.
pub fn polygon_to_polygon(first: &WorldPolygon, second: &WorldPolygon) -> Option<CollisionResult> {
    let offset = first.position - second.position;
    let center_offset = first.center - second.center;
    let mut min_overlap = f64::INFINITY;
    let mut translation_axis = Vec2::ZERO;

    for axis in first.normals.iter().chain(second.normals.iter()) {
        let gap = axis_gap(first, second, offset, *axis);
        if gap >= 0.0 {
            return None;
        }

        let overlap = -gap;
        if overlap < min_overlap {
            min_overlap = overlap;
            translation_axis = if axis.dot(center_offset) < 0.0 { -*axis } else { *axis };
        }
    }

    let overlap_bounds = AABB::new(
        first.bounds.min.max(second.bounds.min),
        first.bounds.max.min(second.bounds.max),
    );
    Some(CollisionResult {
        normal: translation_axis,
        minimum_translation_vector: -translation_axis * min_overlap,
        point: overlap_bounds.center(),
    })
}
