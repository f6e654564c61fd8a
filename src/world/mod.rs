pub mod collision_world;
pub mod config;
pub mod events;

pub use collision_world::CollisionWorld;
pub use config::CollisionConfig;
pub use events::ColliderEvent;
