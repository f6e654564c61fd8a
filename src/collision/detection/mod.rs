//! Exact pairwise intersection tests.
//!
//! Every pair of shape families has a boolean `*_overlaps_*` form and a
//! contact-producing `*_to_*` form. All functions are pure and work on the
//! world-space views in [`crate::shapes::world_shape`].
//!
//! Conventions shared by every contact-producing test:
//! - `normal` points from the second shape towards the first;
//! - `minimum_translation_vector` is `-normal * depth`, so subtracting it from
//!   the first shape's position separates the pair;
//! - a pair whose penetration depth is exactly zero is touching, not
//!   colliding, and is reported as no collision. Lines and points have no
//!   interior, so their incidence tests are inclusive instead.
//!
//! Boolean forms compare squared distances and never take a square root.

pub mod circle;
pub mod line;
pub mod point;
pub mod polygon;

pub use circle::*;
pub use line::*;
pub use point::*;
pub use polygon::*;
