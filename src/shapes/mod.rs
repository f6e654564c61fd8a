pub mod circle;
pub mod collider;
pub mod derived;
pub mod line_segment;
pub mod polygon;
pub mod world_shape;

pub use circle::Circle;
pub use collider::{Collider, ColliderHandle, ColliderSet};
pub use derived::Derived;
pub use line_segment::LineSegment;
pub use polygon::{BoxShape, Polygon};
pub use world_shape::{Geometry, WorldCircle, WorldLine, WorldPolygon, WorldShape};

use crate::error::Result;
use crate::math::vec2::Vec2;

/// Untransformed geometry of a collider.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single point. Scaling it above 1 turns it into a box of side `2 * scale + 1`.
    Point,
    Line(LineSegment),
    Circle(Circle),
    /// An axis-aligned rectangle; only [`BoxShape::new`] builds one.
    Box(BoxShape),
    Polygon(Polygon),
}

/// Tag identifying a shape variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    Line,
    Circle,
    Box,
    Polygon,
}

impl Shape {
    pub fn point() -> Self {
        Shape::Point
    }

    pub fn line(start: Vec2, end: Vec2) -> Self {
        Shape::Line(LineSegment::new(start, end))
    }

    pub fn circle(radius: f64) -> Result<Self> {
        Ok(Shape::Circle(Circle::new(radius)?))
    }

    pub fn rect(width: f64, height: f64) -> Result<Self> {
        Ok(Shape::Box(BoxShape::new(width, height)?))
    }

    pub fn polygon(points: Vec<Vec2>) -> Result<Self> {
        Ok(Shape::Polygon(Polygon::new(points)?))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point => ShapeKind::Point,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Box(_) => ShapeKind::Box,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }
}
