//! Reader/writer and in-memory mutation layer for the Database-Packed File
//! (DBPF) archive format used by Maxis titles (SimCity 4, The Sims 2/3,
//! Spore). A [`package::Package`] parses the on-disk layout across the
//! format's header versions, exposes a merged view of original entries plus
//! a pending [`change_set::ChangeSet`] overlay, transparently
//! decompresses payloads via the per-package DIR directory, and rebuilds
//! the archive on write.

pub mod change_set;
pub mod codec;
pub mod compression;
pub mod dir;
pub mod entry;
pub mod error;
pub mod hash;
pub mod io_buffer;
pub mod package;
pub mod provider;
pub mod resource_key;
pub mod version;

pub use entry::{Entry, PackageId};
pub use error::DbpfError;
pub use package::Package;
pub use resource_key::ResourceKey;
