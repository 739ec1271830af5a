//! Collision layers and filtering
//!
//! | layer        | bit | collides with               |
//! |--------------|-----|-----------------------------|
//! | world        | 1   | everything                  |
//! | player       | 2   | world, enemies              |
//! | enemy        | 4   | world, player, floor cover  |
//! | enemy floor  | 8   | enemies only                |

use serde::{Deserialize, Serialize};

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Static arena geometry
    pub const WORLD: Self = Self(0);
    /// Player body
    pub const PLAYER: Self = Self(1);
    /// Enemy bodies
    pub const ENEMY: Self = Self(2);
    /// Invisible floor cover that only enemies stand on
    pub const ENEMY_FLOOR: Self = Self(3);

    /// Get the layer as a bitmask
    pub const fn as_mask(&self) -> u32 {
        1 << self.0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Collision groups for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    /// Which groups this object belongs to (membership)
    pub memberships: u32,
    /// Which groups this object can collide with (filter)
    pub filter: u32,
}

impl CollisionGroups {
    /// Collide with everything
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Create new collision groups
    pub const fn new(memberships: u32, filter: u32) -> Self {
        Self { memberships, filter }
    }

    /// Create from a single layer that collides with specific layers
    pub fn from_layer(layer: CollisionLayer, collides_with: &[CollisionLayer]) -> Self {
        let memberships = layer.as_mask();
        let filter = collides_with.iter().fold(0u32, |acc, l| acc | l.as_mask());
        Self { memberships, filter }
    }

    /// Static arena geometry
    pub const fn world() -> Self {
        Self::new(CollisionLayer::WORLD.as_mask(), u32::MAX)
    }

    pub const fn player() -> Self {
        Self::new(
            CollisionLayer::PLAYER.as_mask(),
            CollisionLayer::WORLD.as_mask() | CollisionLayer::ENEMY.as_mask(),
        )
    }

    pub const fn enemy() -> Self {
        Self::new(
            CollisionLayer::ENEMY.as_mask(),
            CollisionLayer::WORLD.as_mask()
                | CollisionLayer::PLAYER.as_mask()
                | CollisionLayer::ENEMY_FLOOR.as_mask(),
        )
    }

    /// Floor cover over the arena hole: enemies stand on it, the player falls through
    pub const fn enemy_floor() -> Self {
        Self::new(CollisionLayer::ENEMY_FLOOR.as_mask(), CollisionLayer::ENEMY.as_mask())
    }

    /// Check if two groups can collide
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }

    /// Check membership in a layer
    pub fn belongs_to(&self, layer: CollisionLayer) -> bool {
        self.memberships & layer.as_mask() != 0
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::world()
    }
}
