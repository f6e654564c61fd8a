//! Routes a pair of world shapes to the matching narrow-phase test.
//!
//! Pairs are handled in one orientation only; the reversed orientation swaps
//! the arguments and inverts the contact so the normal still points towards
//! the first shape.

use crate::collision::detection::{circle, line, point, polygon};
use crate::collision::result::{CollisionResult, RaycastHit, ShapeHit};
use crate::math::Vec2;
use crate::shapes::world_shape::{WorldCircle, WorldLine, WorldPolygon, WorldShape};

fn inverted(hit: ShapeHit) -> ShapeHit {
    ShapeHit {
        result: hit.result.inverted(),
        raycast: hit.raycast,
    }
}

/// Boolean overlap. Symmetric in its arguments.
pub fn overlaps(first: &WorldShape, second: &WorldShape) -> bool {
    use WorldShape::*;
    match (first, second) {
        (Point(a), Point(b)) => point::point_overlaps_point(*a, *b),
        (Point(p), Line(l)) | (Line(l), Point(p)) => point::point_on_line(*p, l),
        (Point(p), Circle(c)) | (Circle(c), Point(p)) => point::point_in_circle(*p, c),
        (Point(p), Polygon(poly)) | (Polygon(poly), Point(p)) => point::point_in_polygon(*p, poly),
        (Line(a), Line(b)) => line::line_overlaps_line(a, b),
        (Line(l), Circle(c)) | (Circle(c), Line(l)) => line::line_overlaps_circle(l, c),
        (Line(l), Polygon(poly)) | (Polygon(poly), Line(l)) => line::line_overlaps_polygon(l, poly),
        (Circle(a), Circle(b)) => circle::circle_overlaps_circle(a, b),
        (Circle(c), Polygon(poly)) | (Polygon(poly), Circle(c)) => {
            if poly.is_axis_aligned_box() {
                circle::circle_overlaps_box(c, &poly.bounds)
            } else {
                circle::circle_overlaps_polygon(c, poly)
            }
        }
        (Polygon(a), Polygon(b)) => {
            if a.is_axis_aligned_box() && b.is_axis_aligned_box() {
                polygon::box_overlaps_box(&a.bounds, &b.bounds)
            } else {
                polygon::polygon_overlaps_polygon(a, b)
            }
        }
    }
}

/// Detailed test. `None` when the shapes are apart or only touching.
pub fn collide(first: &WorldShape, second: &WorldShape) -> Option<ShapeHit> {
    use WorldShape::*;
    match (first, second) {
        (Point(a), Point(b)) => point::point_to_point(*a, *b).map(ShapeHit::from),
        (Point(p), Line(l)) => point::point_to_line(*p, l).map(ShapeHit::from),
        (Line(l), Point(p)) => point::point_to_line(*p, l).map(|r| r.inverted().into()),
        (Point(p), Circle(c)) => point::point_to_circle(*p, c).map(ShapeHit::from),
        (Circle(c), Point(p)) => point::point_to_circle(*p, c).map(|r| r.inverted().into()),
        (Point(p), Polygon(poly)) => point::point_to_polygon(*p, poly).map(ShapeHit::from),
        (Polygon(poly), Point(p)) => point::point_to_polygon(*p, poly).map(|r| r.inverted().into()),
        (Line(a), Line(b)) => line::line_to_line(a, b),
        (Circle(c), Line(l)) => line::circle_to_line(c, l),
        (Line(l), Circle(c)) => line::circle_to_line(c, l).map(inverted),
        (Line(l), Polygon(poly)) => line::line_to_polygon(l, poly),
        (Polygon(poly), Line(l)) => line::line_to_polygon(l, poly).map(inverted),
        (Circle(a), Circle(b)) => circle::circle_to_circle(a, b).map(ShapeHit::from),
        (Circle(c), Polygon(poly)) => circle_to_polygon(c, poly).map(ShapeHit::from),
        (Polygon(poly), Circle(c)) => circle_to_polygon(c, poly).map(|r| r.inverted().into()),
        (Polygon(a), Polygon(b)) => {
            let result = if a.is_axis_aligned_box() && b.is_axis_aligned_box() {
                polygon::box_to_box(&a.bounds, &b.bounds)
            } else {
                polygon::polygon_to_polygon(a, b)
            };
            result.map(ShapeHit::from)
        }
    }
}

fn circle_to_polygon(c: &WorldCircle, poly: &WorldPolygon) -> Option<CollisionResult> {
    if poly.is_axis_aligned_box() {
        circle::circle_to_box(c, &poly.bounds)
    } else {
        circle::circle_to_polygon(c, poly)
    }
}

/// Casts `segment` against `target` and reports the first hit along it.
pub fn cast_segment(segment: &WorldLine, target: &WorldShape) -> Option<RaycastHit> {
    match target {
        WorldShape::Point(p) => point::cast_line_point(segment, *p),
        WorldShape::Line(other) => line::cast_line_line(segment, other),
        WorldShape::Circle(c) => line::cast_line_circle(segment, c),
        WorldShape::Polygon(poly) => line::cast_line_polygon(segment, poly),
    }
}

/// Inclusive containment: boundary points count.
pub fn contains_point(shape: &WorldShape, p: Vec2) -> bool {
    match shape {
        WorldShape::Point(q) => *q == p,
        WorldShape::Line(l) => point::point_on_line(p, l),
        WorldShape::Circle(c) => p.distance_squared(c.center) <= c.radius * c.radius,
        WorldShape::Polygon(poly) => poly.contains_point(p),
    }
}
