use crate::error::{CollisionError, Result};

/// Untransformed circle geometry. The collider's scale multiplies the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(CollisionError::invalid(format!(
                "circle radius must be finite and non-negative, got {radius}"
            )));
        }
        Ok(Self { radius })
    }
}
