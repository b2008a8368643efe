//! The per-package mutation overlay: pending deletions and
//! additions/replacements layered non-destructively over the parsed
//! on-disk state, with synchronous provider notification.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::codec::Asset;
use crate::entry::{Entry, PackageId};
use crate::error::DbpfError;
use crate::provider::Provider;
use crate::resource_key::ResourceKey;

/// A staged addition or replacement. The tagged variant DESIGN NOTES call
/// for: either raw bytes ready to write as-is, or a decoded asset object
/// whose serialized form is computed on first access and memoized — the
/// core never needs a third "compressed but not yet parsed" state, since
/// `update_dir` only ever asks for current byte length and current bytes.
pub enum ChangedItem {
    Raw {
        bytes: Vec<u8>,
        compressed: bool,
        codec_type_id: u32,
    },
    Asset {
        asset: Box<dyn Asset>,
        compressed: bool,
        codec_type_id: u32,
        serialized: RefCell<Option<Vec<u8>>>,
    },
}

impl ChangedItem {
    pub fn compressed(&self) -> bool {
        match self {
            Self::Raw { compressed, .. } | Self::Asset { compressed, .. } => *compressed,
        }
    }

    pub fn codec_type_id(&self) -> u32 {
        match self {
            Self::Raw { codec_type_id, .. } | Self::Asset { codec_type_id, .. } => *codec_type_id,
        }
    }

    /// Current byte representation. For `Asset`, the first call serializes
    /// and caches the result; later calls return the cached bytes until the
    /// item is replaced wholesale (there is no in-place asset mutation
    /// path).
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>, DbpfError> {
        match self {
            Self::Raw { bytes, .. } => Ok(Cow::Borrowed(bytes)),
            Self::Asset { asset, serialized, .. } => {
                if serialized.borrow().is_none() {
                    let encoded = asset.to_bytes()?;
                    *serialized.borrow_mut() = Some(encoded);
                }
                let guard = serialized.borrow();
                Ok(Cow::Owned(guard.as_ref().expect("just populated").clone()))
            }
        }
    }

    pub fn len(&self) -> Result<usize, DbpfError> {
        Ok(self.bytes()?.len())
    }
}

/// Overlay of pending deletions (by internal TGI) and pending
/// additions/replacements for one package, plus the dirty flag and the
/// provider hookup every mutator notifies synchronously.
pub struct ChangeSet {
    deleted: HashSet<ResourceKey>,
    changed: IndexMap<ResourceKey, ChangedItem>,
    dirty: bool,
    provider: Option<Rc<RefCell<dyn Provider>>>,
    owner: PackageId,
    owner_group: u32,
}

impl std::fmt::Debug for ChangedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw { bytes, compressed, codec_type_id } => f
                .debug_struct("ChangedItem::Raw")
                .field("bytes_len", &bytes.len())
                .field("compressed", compressed)
                .field("codec_type_id", codec_type_id)
                .finish(),
            Self::Asset { compressed, codec_type_id, .. } => f
                .debug_struct("ChangedItem::Asset")
                .field("compressed", compressed)
                .field("codec_type_id", codec_type_id)
                .finish(),
        }
    }
}

impl std::fmt::Debug for ChangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSet")
            .field("deleted", &self.deleted)
            .field("changed", &self.changed)
            .field("dirty", &self.dirty)
            .field("provider", &self.provider.as_ref().map(|_| "<provider>"))
            .field("owner", &self.owner)
            .field("owner_group", &self.owner_group)
            .finish()
    }
}

impl ChangeSet {
    pub fn new(owner: PackageId, owner_group: u32) -> Self {
        Self {
            deleted: HashSet::new(),
            changed: IndexMap::new(),
            dirty: false,
            provider: None,
            owner,
            owner_group,
        }
    }

    pub fn set_provider(&mut self, provider: Option<Rc<RefCell<dyn Provider>>>) {
        self.provider = provider;
    }

    pub fn set_owner_group(&mut self, owner_group: u32) {
        self.owner_group = owner_group;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_deleted(&self, internal_tgi: &ResourceKey) -> bool {
        self.deleted.contains(internal_tgi)
    }

    pub fn get_changed(&self, internal_tgi: &ResourceKey) -> Option<&ChangedItem> {
        self.changed.get(internal_tgi)
    }

    pub fn changed_iter(&self) -> impl Iterator<Item = (&ResourceKey, &ChangedItem)> {
        self.changed.iter()
    }

    pub fn changed_keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.changed.keys()
    }

    fn global(&self, internal_tgi: ResourceKey) -> ResourceKey {
        internal_tgi.with_local_group(self.owner_group)
    }

    /// Marks `internal_tgi` deleted. Removed from the provider resource
    /// map and invalidated in the cache, in that order.
    pub fn delete(&mut self, internal_tgi: ResourceKey) {
        self.deleted.insert(internal_tgi);
        self.dirty = true;
        let global = self.global(internal_tgi);
        if let Some(p) = &self.provider {
            let mut p = p.borrow_mut();
            p.remove_entry(global, self.owner);
            p.cache_remove(global, self.owner);
        }
    }

    /// Un-deletes `internal_tgi` if it was deleted. `backing_entry`, if
    /// supplied, is the original entry still present for this TGI — its
    /// presence gates whether we re-publish to the provider's resource map.
    pub fn restore(&mut self, internal_tgi: ResourceKey, backing_entry: Option<Entry>) {
        if !self.deleted.remove(&internal_tgi) {
            return;
        }
        self.dirty = true;
        if let Some(entry) = backing_entry {
            if let Some(p) = &self.provider {
                p.borrow_mut().add_entry(entry);
            }
        }
        let global = self.global(internal_tgi);
        if let Some(p) = &self.provider {
            p.borrow_mut().cache_remove(global, self.owner);
        }
    }

    /// Stages `item` under `internal_tgi`, publishing a synthesized entry
    /// of `file_size` bytes to the provider.
    pub fn stage(&mut self, internal_tgi: ResourceKey, item: ChangedItem, file_size: u32) {
        self.deleted.remove(&internal_tgi);
        self.changed.insert(internal_tgi, item);
        self.dirty = true;
        let entry = Entry::synthetic(internal_tgi, self.owner_group, file_size, self.owner);
        if let Some(p) = &self.provider {
            let mut p = p.borrow_mut();
            p.add_entry(entry);
            p.cache_remove(entry.global_tgi, self.owner);
        }
    }

    /// Drops both overlay maps, clears dirty, and re-announces the package
    /// to the provider under a freshly-empty overlay.
    pub fn clear(&mut self) {
        if let Some(p) = &self.provider {
            p.borrow_mut().remove_package(self.owner);
        }
        self.deleted.clear();
        self.changed.clear();
        self.dirty = false;
        if let Some(p) = &self.provider {
            let mut p = p.borrow_mut();
            p.add_package(self.owner);
            p.cache_remove_all(self.owner);
        }
    }

    /// Marks every TGI in `current_tgis` (the caller's current merged view)
    /// deleted, then invalidates the whole package at the provider.
    pub fn delete_all(&mut self, current_tgis: impl IntoIterator<Item = ResourceKey>) {
        for tgi in current_tgis {
            self.deleted.insert(tgi);
        }
        self.dirty = true;
        if let Some(p) = &self.provider {
            let mut p = p.borrow_mut();
            p.remove_package(self.owner);
            p.cache_remove_all(self.owner);
        }
    }

    /// Drops both overlay maps and clears dirty without notifying the
    /// provider. Used after a successful write, where the overlay has just
    /// been folded into the newly-serialized original state the provider
    /// already agrees with.
    pub fn reset(&mut self) {
        self.deleted.clear();
        self.changed.clear();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::RecordingProvider;

    fn owned_change_set() -> (ChangeSet, Rc<RefCell<RecordingProvider>>) {
        let provider = Rc::new(RefCell::new(RecordingProvider::default()));
        let mut cs = ChangeSet::new(PackageId::new(), 0xAAAA);
        cs.set_provider(Some(provider.clone() as Rc<RefCell<dyn Provider>>));
        (cs, provider)
    }

    #[test]
    fn delete_marks_deleted_and_notifies_in_order() {
        let (mut cs, provider) = owned_change_set();
        let tgi = ResourceKey::new(1, 2, 3, 0);
        cs.delete(tgi);
        assert!(cs.is_deleted(&tgi));
        assert!(cs.is_dirty());
        let calls = &provider.borrow().calls;
        assert!(calls[0].starts_with("remove_entry"));
        assert!(calls[1].starts_with("cache_remove("));
    }

    #[test]
    fn restore_without_backing_entry_still_invalidates_cache() {
        let (mut cs, provider) = owned_change_set();
        let tgi = ResourceKey::new(1, 2, 3, 0);
        cs.delete(tgi);
        provider.borrow_mut().calls.clear();
        cs.restore(tgi, None);
        assert!(!cs.is_deleted(&tgi));
        let calls = &provider.borrow().calls;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("cache_remove("));
    }

    #[test]
    fn stage_clears_pending_deletion() {
        let (mut cs, _provider) = owned_change_set();
        let tgi = ResourceKey::new(1, 2, 3, 0);
        cs.delete(tgi);
        cs.stage(
            tgi,
            ChangedItem::Raw {
                bytes: vec![1, 2, 3],
                compressed: false,
                codec_type_id: 1,
            },
            3,
        );
        assert!(!cs.is_deleted(&tgi));
        assert!(cs.get_changed(&tgi).is_some());
    }

    #[test]
    fn clear_resets_overlay_and_dirty_flag() {
        let (mut cs, provider) = owned_change_set();
        let tgi = ResourceKey::new(1, 2, 3, 0);
        cs.delete(tgi);
        cs.clear();
        assert!(!cs.is_dirty());
        assert!(!cs.is_deleted(&tgi));
        let calls = &provider.borrow().calls;
        assert!(calls.iter().any(|c| c.starts_with("remove_package")));
        assert!(calls.iter().any(|c| c.starts_with("add_package")));
        assert!(calls.iter().any(|c| c.starts_with("cache_remove_all")));
    }

    #[test]
    fn delete_all_unions_given_tgis() {
        let (mut cs, _provider) = owned_change_set();
        let a = ResourceKey::new(1, 0, 1, 0);
        let b = ResourceKey::new(1, 0, 2, 0);
        cs.delete_all([a, b]);
        assert!(cs.is_deleted(&a));
        assert!(cs.is_deleted(&b));
    }

    #[test]
    fn raw_item_bytes_are_borrowed() {
        let item = ChangedItem::Raw {
            bytes: vec![9, 9, 9],
            compressed: true,
            codec_type_id: 0,
        };
        assert_eq!(item.bytes().unwrap().as_ref(), &[9, 9, 9]);
        assert!(item.compressed());
    }
}
