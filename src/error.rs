//! Crate-wide error taxonomy.
//!
//! One flat enum covers parse, payload-read and write failures, mirroring
//! the single failure model laid out for the package core rather than
//! splitting errors per submodule the way a multi-format library would.

use thiserror::Error;

use crate::resource_key::ResourceKey;

/// Everything that can go wrong while parsing, reading from, or writing a
/// [`crate::package::Package`].
#[derive(Debug, Error)]
pub enum DbpfError {
    /// The first four bytes were not `DBPF`.
    #[error("not a DBPF file (bad magic)")]
    NotDbpf,

    /// The header named a `(major, minor)` pair this crate does not know
    /// how to read (anything beyond the documented v1.0/v1.1/v1.2/v2.0).
    #[error("unsupported DBPF version {0}.{1}")]
    UnsupportedVersion(u32, u32),

    /// The header ended before all the fields required for its version
    /// could be read.
    #[error("truncated DBPF header")]
    TruncatedHeader,

    /// The index table ended before `num_entries` records could be read.
    #[error("truncated DBPF index")]
    TruncatedIndex,

    /// An `Entry`'s `(file_offset, file_size)` fell outside the archive.
    #[error("entry {0:?} lies outside the archive")]
    EntryOutOfRange(ResourceKey),

    /// The refpack decompressor hit a back-reference outside of the
    /// window it has produced so far, or under/overshot the length DIR
    /// promised.
    #[error("corrupt compressed payload: {0}")]
    CorruptCompression(&'static str),

    /// A lookup by [`ResourceKey`] found nothing in the merged view.
    #[error("no entry for {0:?}")]
    MissingEntry(ResourceKey),

    /// No codec is registered for the resource's type id.
    #[error("no codec registered for type {0:#010X}")]
    NoCodecForType(u32),

    /// Propagated filesystem/stream error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
