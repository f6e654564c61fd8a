pub mod aabb;
pub mod detection;
pub mod dispatch;
pub mod layers;
pub mod result;
pub mod spatial_hash;

// Re-export key types
pub use aabb::AABB;
pub use layers::{CollisionLayers, LayerMask};
pub use result::{CollisionResult, RaycastHit, ShapeHit};
pub use spatial_hash::SpatialHash;
