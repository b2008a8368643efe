//! The composite resource identifier (TGI: Type, Group, Instance).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_hex::{SerHex, StrictPfx};

/// Sentinel group ID meaning "the owning package's derived group".
pub const LOCAL: u32 = 0xFFFF_FFFF;

/// Type ID of the compression directory resource.
pub const DIR_TYPE_ID: u32 = 0xE86B_1EEF;

/// A composite resource identifier: Type ID, Group ID, Instance ID, and
/// (for index-minor-version >= 2 packages) Instance ID High.
///
/// Two keys are compared by all four words, so a key carrying the `LOCAL`
/// sentinel group is never equal to the same key with the group resolved —
/// callers must pick one projection (`internal` or `global`, see
/// [`ResourceKey::with_local_group`]) and stay on it within a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceKey {
    #[cfg_attr(feature = "serde", serde(with = "SerHex::<StrictPfx>"))]
    pub type_id: u32,
    #[cfg_attr(feature = "serde", serde(with = "SerHex::<StrictPfx>"))]
    pub group_id: u32,
    #[cfg_attr(feature = "serde", serde(with = "SerHex::<StrictPfx>"))]
    pub instance_id: u32,
    #[cfg_attr(feature = "serde", serde(with = "SerHex::<StrictPfx>"))]
    pub instance_hi: u32,
}

impl ResourceKey {
    pub const fn new(type_id: u32, group_id: u32, instance_id: u32, instance_hi: u32) -> Self {
        Self {
            type_id,
            group_id,
            instance_id,
            instance_hi,
        }
    }

    /// The well-known key identifying the compression directory resource
    /// stored directly in group `group_id` (DIR is never itself `LOCAL`-grouped
    /// in practice, but callers may pass whatever group the package uses).
    pub const fn dir(group_id: u32, instance_id: u32) -> Self {
        Self::new(DIR_TYPE_ID, group_id, instance_id, 0)
    }

    pub const fn is_dir(&self) -> bool {
        self.type_id == DIR_TYPE_ID
    }

    /// Returns a copy of this key with `group_id` replaced by `owner_group`
    /// iff it currently equals the [`LOCAL`] sentinel; otherwise returns an
    /// unchanged copy. This is the only place `LOCAL` is ever resolved.
    pub fn with_local_group(&self, owner_group: u32) -> Self {
        if self.group_id == LOCAL {
            Self {
                group_id: owner_group,
                ..*self
            }
        } else {
            *self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_group_is_substituted() {
        let internal = ResourceKey::new(0xDEAD, LOCAL, 0xBEEF, 0);
        let global = internal.with_local_group(0x1234);
        assert_eq!(global.group_id, 0x1234);
        assert_eq!(global.type_id, internal.type_id);
    }

    #[test]
    fn non_local_group_is_unchanged() {
        let internal = ResourceKey::new(0xDEAD, 0x5, 0xBEEF, 0);
        assert_eq!(internal.with_local_group(0x1234), internal);
    }

    #[test]
    fn equality_uses_all_four_words() {
        let a = ResourceKey::new(1, 2, 3, 0);
        let b = ResourceKey::new(1, 2, 3, 1);
        assert_ne!(a, b);
    }
}
