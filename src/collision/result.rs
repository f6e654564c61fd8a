use crate::math::vec2::Vec2;
use crate::shapes::ColliderHandle;

/// Contact geometry between two overlapping shapes.
///
/// `normal` points from the second shape towards the first.
/// `minimum_translation_vector` points the other way: subtracting it from the
/// first shape's position separates the pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    pub normal: Vec2,
    pub minimum_translation_vector: Vec2,
    /// Witness point on or near the contact.
    pub point: Vec2,
}

impl CollisionResult {
    /// The same contact seen from the other shape.
    pub fn inverted(self) -> Self {
        Self {
            normal: -self.normal,
            minimum_translation_vector: -self.minimum_translation_vector,
            point: self.point,
        }
    }

    /// Penetration depth along the normal.
    pub fn depth(&self) -> f64 {
        self.minimum_translation_vector.magnitude()
    }
}

/// Result of casting a segment against a shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RaycastHit {
    /// Position of the hit along the cast segment, from 0 (start) to 1 (end).
    pub fraction: f64,
    /// Distance from the segment start to `point`.
    pub distance: f64,
    pub point: Vec2,
    /// Surface normal of the shape at `point`.
    pub normal: Vec2,
    /// Filled in by index-level casts.
    pub collider: Option<ColliderHandle>,
    /// Center of the cast shape at the time of impact; equal to `point` for segment casts.
    pub centroid: Vec2,
}

impl RaycastHit {
    pub fn new(fraction: f64, distance: f64, point: Vec2, normal: Vec2) -> Self {
        Self {
            fraction,
            distance,
            point,
            normal,
            collider: None,
            centroid: point,
        }
    }
}

/// Output of a detailed shape-vs-shape test.
///
/// `raycast` is present when one of the two shapes is a line: it describes the
/// line's first hit on the other shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeHit {
    pub result: CollisionResult,
    pub raycast: Option<RaycastHit>,
}

impl From<CollisionResult> for ShapeHit {
    fn from(result: CollisionResult) -> Self {
        Self { result, raycast: None }
    }
}
