//! World-space geometry derived from a shape and its transform.
//!
//! These are the values the narrow phase works on. They are rebuilt by
//! [`Collider`](super::Collider) only when its transform changed since the last read.

use crate::collision::aabb::AABB;
use crate::collision::detection::line::closest_point_on_segment;
use crate::math::{Transform, Vec2};

use super::polygon::{edge_normals, Polygon};
use super::Shape;

/// A circle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCircle {
    pub center: Vec2,
    pub radius: f64,
}

/// A segment in world space. `start` and `end` already include the position offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldLine {
    pub start: Vec2,
    pub end: Vec2,
    pub center: Vec2,
}

impl WorldLine {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            center: start.lerp(end, 0.5),
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// A polygon in world space.
///
/// `points` are stored relative to `position` so that separating-axis tests can
/// project them once and shift the interval by the position offset.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPolygon {
    pub position: Vec2,
    pub points: Vec<Vec2>,
    /// `normals[i]` is the outward unit normal of edge `points[i] -> points[i + 1]`.
    pub normals: Vec<Vec2>,
    pub center: Vec2,
    pub bounds: AABB,
    pub is_box: bool,
    pub is_unrotated: bool,
}

impl WorldPolygon {
    /// An unrotated box covering `rect`.
    pub fn from_rect(rect: &AABB) -> Self {
        let position = rect.min;
        let points: Vec<Vec2> = rect.corners().iter().map(|c| *c - position).collect();
        let normals = edge_normals(&points);
        WorldPolygon {
            position,
            points,
            normals,
            center: rect.center(),
            bounds: *rect,
            is_box: true,
            is_unrotated: true,
        }
    }

    /// Whether the fast axis-aligned box paths apply.
    pub fn is_axis_aligned_box(&self) -> bool {
        self.is_box && self.is_unrotated
    }

    pub fn vertex(&self, i: usize) -> Vec2 {
        self.position + self.points[i % self.points.len()]
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| self.position + *p)
    }

    /// World-space edges with their outward normals.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2, Vec2)> + '_ {
        (0..self.points.len()).map(move |i| (self.vertex(i), self.vertex(i + 1), self.normals[i]))
    }

    /// Projects the relative points onto `axis`.
    pub fn interval(&self, axis: Vec2) -> (f64, f64) {
        self.points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            let d = p.dot(axis);
            (min.min(d), max.max(d))
        })
    }

    /// Even-odd containment test.
    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.is_axis_aligned_box() {
            return self.bounds.contains_point(point);
        }
        if !self.bounds.contains_point(point) {
            return false;
        }
        let local = point - self.position;
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (self.points[i], self.points[j]);
            if (pi.y > local.y) != (pj.y > local.y)
                && local.x < (pj.x - pi.x) * (local.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Nearest point on the polygon boundary to `point`.
    /// Returns the world-space point, its squared distance and the normal of the edge it lies on.
    pub fn closest_point(&self, point: Vec2) -> (Vec2, f64, Vec2) {
        let mut best = (self.vertex(0), f64::INFINITY, self.normals[0]);
        for (a, b, normal) in self.edges() {
            let (closest, _) = closest_point_on_segment(a, b, point);
            let distance_sq = closest.distance_squared(point);
            if distance_sq < best.1 {
                best = (closest, distance_sq, normal);
            }
        }
        best
    }
}

/// World-space view of a collider.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Point(Vec2),
    Line(WorldLine),
    Circle(WorldCircle),
    /// Boxes, polygons and scaled-up points.
    Polygon(WorldPolygon),
}

/// Derived geometry cached on a collider.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shape: WorldShape,
    pub bounds: AABB,
}

impl Geometry {
    pub(crate) fn compute(shape: &Shape, transform: &Transform) -> Self {
        match shape {
            Shape::Point => {
                let position = transform.position;
                if transform.scale > 1.0 {
                    let rect = AABB::from_center_half_extent(position, transform.scale + 0.5);
                    let polygon = WorldPolygon::from_rect(&rect);
                    let bounds = polygon.bounds;
                    Geometry {
                        shape: WorldShape::Polygon(polygon),
                        bounds,
                    }
                } else {
                    Geometry {
                        shape: WorldShape::Point(position),
                        bounds: AABB::from_center_half_extent(position, 0.5),
                    }
                }
            }
            Shape::Circle(circle) => {
                let world = WorldCircle {
                    center: transform.position,
                    radius: circle.radius * transform.scale,
                };
                Geometry {
                    shape: WorldShape::Circle(world),
                    bounds: AABB::from_center_half_extent(world.center, world.radius),
                }
            }
            Shape::Line(line) => {
                let world = WorldLine {
                    start: transform.apply_around(line.center, line.start),
                    end: transform.apply_around(line.center, line.end),
                    center: line.center + transform.position,
                };
                Geometry {
                    shape: WorldShape::Line(world),
                    bounds: AABB::new(world.start, world.end),
                }
            }
            Shape::Box(rect) => Self::polygon(rect.polygon(), transform, true),
            Shape::Polygon(polygon) => Self::polygon(polygon, transform, false),
        }
    }

    fn polygon(polygon: &Polygon, transform: &Transform, is_box: bool) -> Self {
        let world_points: Vec<Vec2> = polygon
            .points()
            .iter()
            .map(|p| transform.apply_around(polygon.center(), *p))
            .collect();
        let bounds = AABB::from_points(&world_points).unwrap_or(AABB::new(transform.position, transform.position));
        let position = transform.position;
        let points: Vec<Vec2> = world_points.iter().map(|p| *p - position).collect();
        let normals = edge_normals(&points);
        let world = WorldPolygon {
            position,
            points,
            normals,
            center: polygon.center() + position,
            bounds,
            is_box,
            is_unrotated: transform.rotation == 0.0,
        };
        Geometry {
            shape: WorldShape::Polygon(world),
            bounds,
        }
    }
}
