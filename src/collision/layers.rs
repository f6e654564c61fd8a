//! Layer filtering for collider queries.

use bitflags::bitflags;

bitflags! {
    /// A set of up to 32 collision layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        const DEFAULT = 1 << 0;
        const PLAYER = 1 << 1;
        const ENEMY = 1 << 2;
        const PROJECTILE = 1 << 3;
        const ENVIRONMENT = 1 << 4;
        const TRIGGER = 1 << 5;
        const ALL = u32::MAX;
    }
}

/// Which layers a collider lives on and which layers it reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionLayers {
    pub membership: LayerMask,
    pub filter: LayerMask,
}

impl CollisionLayers {
    pub const fn new(membership: LayerMask, filter: LayerMask) -> Self {
        Self { membership, filter }
    }

    /// Both sides must accept each other.
    pub fn interacts_with(&self, other: &CollisionLayers) -> bool {
        self.membership.intersects(other.filter) && other.membership.intersects(self.filter)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::new(LayerMask::ALL, LayerMask::ALL)
    }
}
