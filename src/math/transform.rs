use super::vec2::Vec2;

/// Position, rotation and uniform scale of a collider.
///
/// Points are scaled first, then rotated, then translated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Angle in radians.
    pub rotation: f64,
    pub scale: f64,
}

impl Transform {
    /// Scales at or below this value are rejected by [`Collider`](crate::shapes::Collider).
    pub const MIN_SCALE: f64 = 1e-6;

    /// Creates a new transform with unit scale.
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    /// Creates an identity transform (no translation, no rotation, unit scale).
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Applies scale and rotation around `pivot`, then translation.
    pub fn apply_around(self, pivot: Vec2, point: Vec2) -> Vec2 {
        pivot + ((point - pivot) * self.scale).rotate(self.rotation) + self.position
    }

    /// Applies the transform (scale, rotation, translation) to a point.
    pub fn apply(self, point: Vec2) -> Vec2 {
        self.apply_around(Vec2::ZERO, point)
    }

    /// Applies the inverse transform (inverse translation, inverse rotation, inverse scale).
    pub fn apply_inverse(self, point: Vec2) -> Vec2 {
        (point - self.position).rotate(-self.rotation) * (1.0 / self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
