use crate::shapes::ColliderHandle;

/// Lifecycle notifications from an entity system that owns colliders.
///
/// Feed these to [`CollisionWorld::apply_event`](super::CollisionWorld::apply_event)
/// to keep the index in step with the entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderEvent {
    Added(ColliderHandle),
    Removed(ColliderHandle),
    Enabled(ColliderHandle),
    Disabled(ColliderHandle),
    /// The entity swapped one collider for another.
    Changed {
        old: ColliderHandle,
        new: ColliderHandle,
    },
}
