//! Content flags for collision filtering.
//!
//! Every collider in the world carries a set of content flags. Queries pass a
//! mask and only see colliders whose contents intersect it, the same way a
//! layer mask works in an engine scene graph.

use serde::{Deserialize, Serialize};

/// Content flags describe what kind of volume a collider is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, ramps.
    pub const SOLID: Self = Self(1 << 0);

    /// Player clip - blocks the player but nothing else.
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Trigger volume. Reported by queries but never blocks movement.
    ///
    /// Combine with a layer (`SOLID | TRIGGER`) so a player-mask query sees it.
    pub const TRIGGER: Self = Self(1 << 2);

    /// Ghost-run replays. Never part of the player mask.
    pub const GHOST: Self = Self(1 << 3);

    /// Standard mask for player movement sweeps.
    pub const MASK_PLAYER_SOLID: Self = Self(Self::SOLID.0 | Self::PLAYER_CLIP.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Combine two flag sets.
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove flags from this set.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
