use crate::error::{CollisionError, Result};
use crate::math::vec2::Vec2;

/// Untransformed segment geometry.
///
/// `center` is the pivot that rotation and scale are applied around; it always
/// lies on the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub center: Vec2,
}

impl LineSegment {
    /// Creates a segment pivoting around its midpoint.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            center: start.lerp(end, 0.5),
        }
    }

    /// Creates a segment pivoting around `pivot`, which must lie on the segment.
    pub fn with_pivot(start: Vec2, end: Vec2, pivot: Vec2) -> Result<Self> {
        let dir = end - start;
        let rel = pivot - start;
        let length_sq = dir.magnitude_squared();
        let on_line = dir.cross(rel).abs() <= 1e-9 * length_sq.sqrt().max(1.0);
        let t = if length_sq > 0.0 { rel.dot(dir) / length_sq } else { 0.0 };
        let within = (0.0..=1.0).contains(&t) && (length_sq > 0.0 || rel.magnitude_squared() == 0.0);
        if !on_line || !within {
            return Err(CollisionError::invalid(format!(
                "line pivot {pivot:?} does not lie on segment {start:?} -> {end:?}"
            )));
        }
        Ok(Self {
            start,
            end,
            center: pivot,
        })
    }

    /// Calculates the length of the line segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Calculates the squared length of the line segment.
    pub fn length_squared(&self) -> f64 {
        self.start.distance_squared(self.end)
    }

    /// Returns the direction vector of the line segment (from start to end).
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }
}
