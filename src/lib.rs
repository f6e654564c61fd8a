//! 2D collision detection: shapes, exact narrow-phase tests and a spatial hash broadphase.
//!
//! Colliders are stored in a caller-owned [`ColliderSet`] and referenced by
//! [`ColliderHandle`]. A [`CollisionWorld`] indexes handles in a [`SpatialHash`]
//! and answers point, rectangle, shape and segment queries against them.
//!
//! ```
//! use collision2d::{Collider, ColliderSet, CollisionWorld, Shape, Vec2};
//!
//! let mut colliders = ColliderSet::with_key();
//! let mut world = CollisionWorld::new(50.0)?;
//!
//! let a = colliders.insert(Collider::new(Shape::circle(5.0)?));
//! let b = colliders.insert(Collider::new(Shape::circle(5.0)?).with_position(Vec2::new(7.0, 0.0)));
//! world.add(&colliders, a)?;
//! world.add(&colliders, b)?;
//!
//! let hits = world.collisions(&colliders, a)?;
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].1.result.depth() - 3.0).abs() < 1e-9);
//! # Ok::<(), collision2d::CollisionError>(())
//! ```

pub mod collision;
pub mod error;
pub mod math;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{CollisionLayers, CollisionResult, LayerMask, RaycastHit, ShapeHit, SpatialHash, AABB};
pub use error::{CollisionError, Result};
pub use math::{Transform, Vec2};
pub use shapes::{BoxShape, Circle, Collider, ColliderHandle, ColliderSet, LineSegment, Polygon, Shape, ShapeKind};
pub use world::{ColliderEvent, CollisionConfig, CollisionWorld};
