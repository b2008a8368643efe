//! The per-resource descriptor and the opaque handle entries use to name
//! their owning package.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::resource_key::ResourceKey;

/// An opaque, `Copy`-able handle identifying a [`crate::package::Package`]
/// without borrowing it. `rpkg-rs`'s own `ResourceInfo` carries no
/// back-pointer to its partition at all — callers re-derive it via map
/// lookup; here we go one step further and hand out a cheap comparable
/// token instead, per the non-owning-reference guidance in `SPEC_FULL.md`
/// §3. It carries no filesystem identity of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackageId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl PackageId {
    /// Mints a fresh, process-wide-unique id.
    pub fn new() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PackageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor of one resource stored in (or staged into) a package.
///
/// `internal_tgi` is the key as it appears on disk (group may still be the
/// `LOCAL` sentinel); `global_tgi` has that sentinel resolved against the
/// owning package's derived group id. Both are computed once at
/// construction and never mutated afterward — a path rebind that changes
/// the package's group id produces new `Entry` values rather than mutating
/// these in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub internal_tgi: ResourceKey,
    pub global_tgi: ResourceKey,
    pub file_offset: u32,
    pub file_size: u32,
    pub owner: PackageId,
}

impl Entry {
    pub fn new(internal_tgi: ResourceKey, owner_group: u32, file_offset: u32, file_size: u32, owner: PackageId) -> Self {
        Self {
            internal_tgi,
            global_tgi: internal_tgi.with_local_group(owner_group),
            file_offset,
            file_size,
            owner,
        }
    }

    /// A synthetic entry for an overlay item: no fixed on-disk position,
    /// `file_size` reflects the overlay's current byte length.
    pub fn synthetic(internal_tgi: ResourceKey, owner_group: u32, file_size: u32, owner: PackageId) -> Self {
        Self::new(internal_tgi, owner_group, 0, file_size, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_ids_are_distinct() {
        let a = PackageId::new();
        let b = PackageId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entry_projects_global_tgi_from_owner_group() {
        let owner = PackageId::new();
        let internal = ResourceKey::new(1, crate::resource_key::LOCAL, 2, 0);
        let entry = Entry::new(internal, 0xABCD, 0, 16, owner);
        assert_eq!(entry.global_tgi.group_id, 0xABCD);
        assert_eq!(entry.internal_tgi.group_id, crate::resource_key::LOCAL);
    }
}
