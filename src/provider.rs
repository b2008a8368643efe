//! The narrow seam to the out-of-scope content-provider layer: a
//! cross-package resource map plus a decoded-asset cache.
//!
//! A package calls these methods synchronously at the points listed next to
//! each [`crate::change_set::ChangeSet`] operation; all are advisory. A
//! package with no provider attached treats every overlay mutation as a
//! no-op on this front.

use crate::entry::{Entry, PackageId};
use crate::resource_key::ResourceKey;

/// Capability set the surrounding application must supply to keep its
/// cross-package resource map and decoded-asset cache in sync with a
/// package's overlay. Production code wires in the real map/cache; tests
/// can inject a recording fake to assert call order.
pub trait Provider {
    fn add_package(&mut self, package: PackageId);
    fn remove_package(&mut self, package: PackageId);
    fn add_entry(&mut self, entry: Entry);
    fn remove_entry(&mut self, tgi: ResourceKey, package: PackageId);
    fn cache_remove(&mut self, tgi: ResourceKey, package: PackageId);
    fn cache_remove_all(&mut self, package: PackageId);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Records every call in order, for asserting the "resource-map update
    /// then cache invalidation" ordering guarantee in tests.
    #[derive(Debug, Default)]
    pub struct RecordingProvider {
        pub calls: Vec<String>,
    }

    impl Provider for RecordingProvider {
        fn add_package(&mut self, package: PackageId) {
            self.calls.push(format!("add_package({package:?})"));
        }
        fn remove_package(&mut self, package: PackageId) {
            self.calls.push(format!("remove_package({package:?})"));
        }
        fn add_entry(&mut self, entry: Entry) {
            self.calls.push(format!("add_entry({:?})", entry.internal_tgi));
        }
        fn remove_entry(&mut self, tgi: ResourceKey, package: PackageId) {
            self.calls.push(format!("remove_entry({tgi:?}, {package:?})"));
        }
        fn cache_remove(&mut self, tgi: ResourceKey, package: PackageId) {
            self.calls.push(format!("cache_remove({tgi:?}, {package:?})"));
        }
        fn cache_remove_all(&mut self, package: PackageId) {
            self.calls.push(format!("cache_remove_all({package:?})"));
        }
    }
}
