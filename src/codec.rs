//! The narrow seam to the out-of-scope per-resource codec layer: turning
//! raw payload bytes into typed asset objects and back.
//!
//! No codec is bundled here — per-resource schema validation is an
//! explicit non-goal of the core. A caller registers one [`AssetCodec`] per
//! `type_id` it knows how to decode; resources of unregistered types are
//! only ever available as raw bytes via `get_bytes`.

use std::any::Any;

use crate::entry::PackageId;
use crate::error::DbpfError;
use crate::resource_key::ResourceKey;

/// A decoded, typed representation of one resource's payload.
pub trait Asset {
    /// Serializes this asset back to its raw payload form.
    fn to_bytes(&self) -> Result<Vec<u8>, DbpfError>;

    /// Stamps the asset with the identity it was decoded from (or will be
    /// staged under), as called for by `get_asset` and `set_asset`.
    fn set_owner(&mut self, package: PackageId, global_tgi: ResourceKey, compressed: bool);

    fn as_any(&self) -> &dyn Any;

    /// Duplicates this asset behind a new box. `get_asset` returns the
    /// stashed asset from an overlay entry via this rather than handing out
    /// the overlay's own copy, since the overlay keeps ownership of it.
    fn clone_box(&self) -> Box<dyn Asset>;
}

/// A per-type codec: knows how to turn raw bytes for one `type_id` into a
/// decoded [`Asset`].
pub trait AssetCodec {
    fn decode(&self, bytes: &[u8], tgi: ResourceKey) -> Result<Box<dyn Asset>, DbpfError>;
}
