//! Layer masks for collision filtering.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A set of up to 32 collision layers.
///
/// Colliders carry the layers they belong to; ray queries carry the layers they can hit.
/// A collider is hit only if the two sets intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// The mask containing only layer `n`. `n` must be below 32.
    #[inline]
    pub const fn layer(n: u32) -> Self {
        Self(1 << n)
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for LayerMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_ops() {
        let ground = LayerMask::layer(0);
        let hazard = LayerMask::layer(3);
        let both = ground | hazard;

        assert_eq!(both, ground.union(hazard));
        assert!(both.contains(ground));
        assert!(!ground.contains(both));
        assert!(both.intersects(hazard));
        assert!(!ground.intersects(hazard));
        assert_eq!(both & hazard, hazard);

        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
        assert!(LayerMask::ALL.contains(both));
    }
}
