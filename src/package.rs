//! The DBPF package: header/index parsing, the merged read view over
//! originals plus overlay, payload decompression, and round-trip
//! serialization.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::change_set::{ChangeSet, ChangedItem};
use crate::codec::{Asset, AssetCodec};
use crate::compression;
use crate::dir::DirTable;
use crate::entry::{Entry, PackageId};
use crate::error::DbpfError;
use crate::hash;
use crate::io_buffer::IoBuffer;
use crate::provider::Provider;
use crate::resource_key::ResourceKey;
use crate::version::DbpfVersion;

/// Lifecycle state of a [`Package`]. `Disposed` and `Deleted` are terminal
/// for I/O operations; the dirty flag that distinguishes "Loaded" from
/// "Mutated" in the conceptual state machine lives on the `ChangeSet`
/// instead of as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    Empty,
    Loaded,
    Disposed,
    Deleted,
}

enum PackageSource {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

impl std::fmt::Debug for PackageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(_) => f.write_str("PackageSource::File(..)"),
            Self::Memory(_) => f.write_str("PackageSource::Memory(..)"),
        }
    }
}

impl Read for PackageSource {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.read(out),
            Self::Memory(c) => c.read(out),
        }
    }
}

impl Seek for PackageSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File(f) => f.seek(pos),
            Self::Memory(c) => c.seek(pos),
        }
    }
}

/// A DBPF archive: the parsed on-disk mirror plus the in-memory overlay
/// layered over it.
pub struct Package {
    id: PackageId,
    source: Option<PackageSource>,
    file_path: Option<PathBuf>,
    group_id: u32,
    major: u32,
    minor: u32,
    index_major: u32,
    index_minor: u32,
    date_created: i32,
    date_modified: i32,
    original_entries: IndexMap<ResourceKey, Entry>,
    dir: DirTable,
    change_set: ChangeSet,
    provider: Option<Rc<RefCell<dyn Provider>>>,
    codecs: HashMap<u32, Rc<dyn AssetCodec>>,
    state: PackageState,
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("file_path", &self.file_path)
            .field("group_id", &self.group_id)
            .field("major", &self.major)
            .field("minor", &self.minor)
            .field("index_major", &self.index_major)
            .field("index_minor", &self.index_minor)
            .field("date_created", &self.date_created)
            .field("date_modified", &self.date_modified)
            .field("original_entries", &self.original_entries)
            .field("dir", &self.dir)
            .field("change_set", &self.change_set)
            .field("provider", &self.provider.as_ref().map(|_| "<provider>"))
            .field("codecs", &self.codecs.keys().collect::<Vec<_>>())
            .field("state", &self.state)
            .finish()
    }
}

impl Package {
    fn new_with_group(group_id: u32) -> Self {
        let id = PackageId::new();
        Self {
            id,
            source: None,
            file_path: None,
            group_id,
            major: 1,
            minor: 2,
            index_major: 7,
            index_minor: 2,
            date_created: 0,
            date_modified: 0,
            original_entries: IndexMap::new(),
            dir: DirTable::new(),
            change_set: ChangeSet::new(id, group_id),
            provider: None,
            codecs: HashMap::new(),
            state: PackageState::Empty,
        }
    }

    /// A fresh, empty package with no backing file.
    pub fn new() -> Self {
        Self::new_with_group(0)
    }

    /// Opens and parses the package at `path`. `group_id` is derived from
    /// the file's name stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbpfError> {
        let path_buf = path.as_ref().to_path_buf();
        let group_id = hash::group_id_from_path(&path_buf);
        let mut pkg = Self::new_with_group(group_id);
        let file = File::open(&path_buf)?;
        pkg.file_path = Some(path_buf);
        pkg.source = Some(PackageSource::File(file));
        pkg.parse()?;
        Ok(pkg)
    }

    /// Parses a package already fully resident in memory. With no filename
    /// to derive a group from, `group_id` defaults to zero until
    /// [`Package::set_file_path`] is called.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DbpfError> {
        let mut pkg = Self::new_with_group(0);
        pkg.source = Some(PackageSource::Memory(Cursor::new(bytes)));
        pkg.parse()?;
        Ok(pkg)
    }

    pub fn id(&self) -> PackageId {
        self.id
    }

    pub fn state(&self) -> PackageState {
        self.state
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.change_set.is_dirty()
    }

    pub fn set_provider(&mut self, provider: Option<Rc<RefCell<dyn Provider>>>) {
        self.provider = provider.clone();
        self.change_set.set_provider(provider);
    }

    pub fn register_codec(&mut self, type_id: u32, codec: Rc<dyn AssetCodec>) {
        self.codecs.insert(type_id, codec);
    }

    fn ensure_active(&self) -> Result<(), DbpfError> {
        match self.state {
            PackageState::Disposed | PackageState::Deleted => {
                Err(DbpfError::Io(io::Error::new(io::ErrorKind::Other, "package is disposed")))
            }
            _ => Ok(()),
        }
    }

    // --- Reading -----------------------------------------------------

    fn parse(&mut self) -> Result<(), DbpfError> {
        {
            let source = self.source.as_mut().ok_or(DbpfError::NotDbpf)?;
            let mut buf = IoBuffer::new(source);

            let magic = buf.read_bytes(4).map_err(|_| DbpfError::TruncatedHeader)?;
            if magic != b"DBPF" {
                return Err(DbpfError::NotDbpf);
            }

            let major = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;
            let minor = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;
            let version = DbpfVersion::from_pair(major, minor)?;
            buf.skip(12).map_err(|_| DbpfError::TruncatedHeader)?;

            let is_v2 = version.has_v2_header_fields();

            let (date_created, date_modified) = if !is_v2 {
                (
                    buf.read_i32().map_err(|_| DbpfError::TruncatedHeader)?,
                    buf.read_i32().map_err(|_| DbpfError::TruncatedHeader)?,
                )
            } else {
                (0, 0)
            };

            let index_major = if !is_v2 {
                buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?
            } else {
                0
            };

            let num_entries = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;

            let mut index_offset = if !is_v2 {
                buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?
            } else {
                0
            };

            let _index_size = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;

            let index_minor;
            if !is_v2 {
                buf.skip(12).map_err(|_| DbpfError::TruncatedHeader)?;
                index_minor = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;
            } else {
                index_minor = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;
                index_offset = buf.read_u32().map_err(|_| DbpfError::TruncatedHeader)?;
                buf.skip(4).map_err(|_| DbpfError::TruncatedHeader)?;
            }

            buf.skip(32).map_err(|_| DbpfError::TruncatedHeader)?;

            buf.seek_to(u64::from(index_offset)).map_err(|_| DbpfError::TruncatedIndex)?;

            let mut original_entries = IndexMap::new();
            for _ in 0..num_entries {
                let type_id = buf.read_u32().map_err(|_| DbpfError::TruncatedIndex)?;
                let group_id = buf.read_u32().map_err(|_| DbpfError::TruncatedIndex)?;
                let instance_id = buf.read_u32().map_err(|_| DbpfError::TruncatedIndex)?;
                let instance_hi = if index_minor >= 2 {
                    buf.read_u32().map_err(|_| DbpfError::TruncatedIndex)?
                } else {
                    0
                };
                let file_offset = buf.read_u32().map_err(|_| DbpfError::TruncatedIndex)?;
                let file_size = buf.read_u32().map_err(|_| DbpfError::TruncatedIndex)?;

                let internal_tgi = ResourceKey::new(type_id, group_id, instance_id, instance_hi);
                let entry = Entry::new(internal_tgi, self.group_id, file_offset, file_size, self.id);
                original_entries.insert(internal_tgi, entry);
            }

            self.major = major;
            self.minor = minor;
            self.index_major = index_major;
            self.index_minor = index_minor;
            self.date_created = date_created;
            self.date_modified = date_modified;
            self.original_entries = original_entries;
        }

        self.dir = DirTable::new();
        if let Some(dir_entry) = self.original_entries.values().find(|e| e.internal_tgi.is_dir()).copied() {
            let source = self.source.as_mut().ok_or(DbpfError::TruncatedIndex)?;
            let mut buf = IoBuffer::new(source);
            buf.seek_to(u64::from(dir_entry.file_offset))
                .map_err(|_| DbpfError::EntryOutOfRange(dir_entry.global_tgi))?;
            let raw = buf
                .read_bytes(dir_entry.file_size as usize)
                .map_err(|_| DbpfError::EntryOutOfRange(dir_entry.global_tgi))?;
            let mut reader = IoBuffer::new(Cursor::new(raw));
            self.dir = DirTable::parse(&mut reader, dir_entry.file_size as usize, self.index_minor)?;
        }

        self.state = PackageState::Loaded;
        Ok(())
    }

    /// The merged view: every original entry not suppressed by a deletion
    /// or superseded by an overlay replacement, followed by every overlay
    /// entry in staging order.
    pub fn entries(&self) -> Vec<Entry> {
        let mut result: Vec<Entry> = self
            .original_entries
            .values()
            .filter(|e| !self.change_set.is_deleted(&e.internal_tgi) && self.change_set.get_changed(&e.internal_tgi).is_none())
            .copied()
            .collect();

        for (tgi, item) in self.change_set.changed_iter() {
            let size = item.len().unwrap_or(0) as u32;
            result.push(Entry::synthetic(*tgi, self.group_id, size, self.id));
        }
        result
    }

    pub fn original_entries(&self) -> impl Iterator<Item = &Entry> {
        self.original_entries.values()
    }

    pub fn get_entry_by_tgi(&self, global_tgi: ResourceKey) -> Option<Entry> {
        self.entries().into_iter().find(|e| e.global_tgi == global_tgi)
    }

    fn get_bytes_impl(&mut self, entry: &Entry, ignore_deleted: bool) -> Result<Vec<u8>, DbpfError> {
        self.ensure_active()?;
        if ignore_deleted && self.change_set.is_deleted(&entry.internal_tgi) {
            return Err(DbpfError::MissingEntry(entry.global_tgi));
        }
        if let Some(item) = self.change_set.get_changed(&entry.internal_tgi) {
            return Ok(item.bytes()?.into_owned());
        }

        let expected_len = self.dir.get(&entry.internal_tgi);
        let source = self.source.as_mut().ok_or(DbpfError::MissingEntry(entry.global_tgi))?;
        let mut buf = IoBuffer::new(source);
        buf.seek_to(u64::from(entry.file_offset))
            .map_err(|_| DbpfError::EntryOutOfRange(entry.global_tgi))?;
        let raw = match buf.read_bytes(entry.file_size as usize) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(DbpfError::EntryOutOfRange(entry.global_tgi)),
            Err(e) => return Err(DbpfError::Io(e)),
        };

        match expected_len {
            Some(len) => compression::decompress(&raw, len as usize),
            None => Ok(raw),
        }
    }

    /// Raw payload bytes for `entry`, overlay-resolved, decompressed per
    /// DIR if applicable. Entries currently deleted read as
    /// [`DbpfError::MissingEntry`].
    pub fn get_bytes(&mut self, entry: &Entry) -> Result<Vec<u8>, DbpfError> {
        self.get_bytes_impl(entry, true)
    }

    pub fn get_bytes_by_tgi(&mut self, global_tgi: ResourceKey) -> Result<Vec<u8>, DbpfError> {
        let entry = self.get_entry_by_tgi(global_tgi).ok_or(DbpfError::MissingEntry(global_tgi))?;
        self.get_bytes(&entry)
    }

    /// Decoded asset for `entry`, dispatched to the codec registered for
    /// its type id.
    pub fn get_asset(&mut self, entry: &Entry) -> Result<Box<dyn Asset>, DbpfError> {
        self.ensure_active()?;
        if let Some(item) = self.change_set.get_changed(&entry.internal_tgi) {
            if let ChangedItem::Asset { asset, .. } = item {
                let mut cloned = asset.clone_box();
                cloned.set_owner(self.id, entry.global_tgi, item.compressed());
                return Ok(cloned);
            }
            let codec = self
                .codecs
                .get(&entry.global_tgi.type_id)
                .cloned()
                .ok_or(DbpfError::NoCodecForType(entry.global_tgi.type_id))?;
            let bytes = item.bytes()?;
            let mut asset = codec.decode(&bytes, entry.global_tgi)?;
            asset.set_owner(self.id, entry.global_tgi, item.compressed());
            return Ok(asset);
        }

        let codec = self
            .codecs
            .get(&entry.global_tgi.type_id)
            .cloned()
            .ok_or(DbpfError::NoCodecForType(entry.global_tgi.type_id))?;
        let compressed = self.dir.get(&entry.internal_tgi).is_some();
        let bytes = self.get_bytes_impl(entry, true)?;
        let mut asset = codec.decode(&bytes, entry.global_tgi)?;
        asset.set_owner(self.id, entry.global_tgi, compressed);
        Ok(asset)
    }

    pub fn get_asset_by_tgi(&mut self, global_tgi: ResourceKey) -> Result<Box<dyn Asset>, DbpfError> {
        let entry = self.get_entry_by_tgi(global_tgi).ok_or(DbpfError::MissingEntry(global_tgi))?;
        self.get_asset(&entry)
    }

    // --- Mutation ------------------------------------------------------

    pub fn delete(&mut self, entry: &Entry) {
        self.change_set.delete(entry.internal_tgi);
    }

    pub fn delete_by_tgi(&mut self, global_tgi: ResourceKey) -> Result<(), DbpfError> {
        let entry = self.get_entry_by_tgi(global_tgi).ok_or(DbpfError::MissingEntry(global_tgi))?;
        self.change_set.delete(entry.internal_tgi);
        Ok(())
    }

    pub fn restore(&mut self, internal_tgi: ResourceKey) {
        let backing = self.original_entries.get(&internal_tgi).copied();
        self.change_set.restore(internal_tgi, backing);
    }

    pub fn restore_by_tgi(&mut self, global_tgi: ResourceKey) {
        if let Some(internal) = self
            .original_entries
            .values()
            .find(|e| e.global_tgi == global_tgi)
            .map(|e| e.internal_tgi)
        {
            self.restore(internal);
        }
    }

    /// Stages raw bytes under `internal_tgi`, replacing any prior original
    /// or staged content at that key.
    pub fn set_bytes(&mut self, internal_tgi: ResourceKey, bytes: Vec<u8>, compressed: bool, codec_type_id: u32) {
        let size = bytes.len() as u32;
        self.change_set.stage(
            internal_tgi,
            ChangedItem::Raw {
                bytes,
                compressed,
                codec_type_id,
            },
            size,
        );
    }

    /// Stages a decoded asset under `internal_tgi`, stamping it with this
    /// package's identity before serialization is memoized.
    pub fn set_asset(&mut self, internal_tgi: ResourceKey, mut asset: Box<dyn Asset>, compressed: bool, codec_type_id: u32) -> Result<(), DbpfError> {
        let global_tgi = internal_tgi.with_local_group(self.group_id);
        asset.set_owner(self.id, global_tgi, compressed);
        let bytes = asset.to_bytes()?;
        let size = bytes.len() as u32;
        let item = ChangedItem::Asset {
            asset,
            compressed,
            codec_type_id,
            serialized: RefCell::new(Some(bytes)),
        };
        self.change_set.stage(internal_tgi, item, size);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.change_set.clear();
    }

    pub fn delete_all(&mut self) {
        let tgis: Vec<ResourceKey> = self.entries().iter().map(|e| e.internal_tgi).collect();
        self.change_set.delete_all(tgis);
    }

    /// Rebinds the package to a new filesystem identity: rederives
    /// `group_id` from the new stem, rewrites every original entry's
    /// global projection, and re-announces the package to the provider.
    pub fn set_file_path<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();
        let new_group = hash::group_id_from_path(&path);

        if let Some(p) = &self.provider {
            p.borrow_mut().remove_package(self.id);
        }

        for entry in self.original_entries.values_mut() {
            entry.global_tgi = entry.internal_tgi.with_local_group(new_group);
        }
        self.change_set.set_owner_group(new_group);
        self.group_id = new_group;
        self.file_path = Some(path);

        if let Some(p) = &self.provider {
            p.borrow_mut().add_package(self.id);
        }
    }

    // --- Writing ---------------------------------------------------------

    /// Regenerates the DIR resource from the current merged view. Must run
    /// immediately before serialization; never touched by ordinary
    /// `set_bytes`/`set_asset` calls.
    fn update_dir(&mut self) -> Result<(), DbpfError> {
        let merged = self.entries();
        let mut table = DirTable::new();

        for entry in &merged {
            if entry.internal_tgi.is_dir() {
                continue;
            }
            if let Some(item) = self.change_set.get_changed(&entry.internal_tgi) {
                if item.compressed() {
                    table.insert(entry.internal_tgi, item.len()? as u32);
                }
            } else if let Some(size) = self.dir.get(&entry.internal_tgi) {
                table.insert(entry.internal_tgi, size);
            }
        }

        if table.is_empty() {
            if let Some(dir_entry) = merged.iter().find(|e| e.internal_tgi.is_dir()) {
                self.change_set.delete(dir_entry.internal_tgi);
            }
        } else {
            let dir_internal_tgi = merged
                .iter()
                .find(|e| e.internal_tgi.is_dir())
                .map(|e| e.internal_tgi)
                .or_else(|| self.original_entries.values().find(|e| e.internal_tgi.is_dir()).map(|e| e.internal_tgi))
                .unwrap_or_else(|| ResourceKey::dir(self.group_id, 0));

            let bytes = table.to_bytes(2)?;
            let size = bytes.len() as u32;
            self.change_set.stage(
                dir_internal_tgi,
                ChangedItem::Raw {
                    bytes,
                    compressed: false,
                    codec_type_id: 0,
                },
                size,
            );
        }

        self.dir = table;
        Ok(())
    }

    /// Serializes the current merged view to a single byte buffer: header,
    /// index, then payloads, with offsets and sizes back-patched once
    /// known. The writer always emits version 1.2 / index-minor 2
    /// regardless of the version this package was parsed from.
    pub fn serialize(&mut self) -> Result<Vec<u8>, DbpfError> {
        self.ensure_active()?;
        self.update_dir()?;
        let merged = self.entries();

        let mut buf = IoBuffer::new(Cursor::new(Vec::new()));
        buf.write_bytes(b"DBPF")?;
        buf.write_u32(1)?;
        buf.write_u32(2)?;
        buf.write_zeros(12)?;
        buf.write_i32(0)?;
        buf.write_i32(0)?;
        buf.write_u32(7)?;
        buf.write_u32(merged.len() as u32)?;
        let index_offset_slot = buf.position()?;
        buf.write_u32(0)?;
        let index_size_slot = buf.position()?;
        buf.write_u32(0)?;
        buf.write_i32(0)?;
        buf.write_i32(0)?;
        buf.write_i32(0)?;
        buf.write_u32(2)?;
        buf.write_zeros(32)?;

        let index_offset = buf.position()?;
        buf.backpatch_u32(index_offset_slot, index_offset as u32)?;

        let mut offset_slots = Vec::with_capacity(merged.len());
        let mut size_slots = Vec::with_capacity(merged.len());
        for entry in &merged {
            buf.write_u32(entry.internal_tgi.type_id)?;
            buf.write_u32(entry.internal_tgi.group_id)?;
            buf.write_u32(entry.internal_tgi.instance_id)?;
            buf.write_u32(entry.internal_tgi.instance_hi)?;
            offset_slots.push(buf.position()?);
            buf.write_u32(0)?;
            size_slots.push(buf.position()?);
            buf.write_u32(0)?;
        }

        let index_end = buf.position()?;
        buf.backpatch_u32(index_size_slot, (index_end - index_offset) as u32)?;

        for (i, entry) in merged.iter().enumerate() {
            let payload_start = buf.position()?;
            buf.backpatch_u32(offset_slots[i], payload_start as u32)?;

            let raw = self.get_bytes_impl(entry, false)?;
            let compressed = self.dir.get(&entry.internal_tgi).is_some();
            let payload = if compressed { compression::compress(&raw) } else { raw };

            buf.backpatch_u32(size_slots[i], payload.len() as u32)?;
            buf.write_bytes(&payload)?;
        }

        Ok(buf.into_inner().into_inner())
    }

    pub fn dispose(&mut self) {
        self.source = None;
        self.state = PackageState::Disposed;
    }

    /// Writes the merged view to the package's file path. If
    /// `delete_if_empty` and the merged view is empty, the on-disk file is
    /// deleted instead and the package transitions to `Deleted`. Otherwise
    /// the archive is rebuilt, written to a temp file and renamed into
    /// place (so a failed write leaves the previous file intact), then the
    /// package re-opens its own output and clears the overlay.
    pub fn write_to_file(&mut self, delete_if_empty: bool) -> Result<(), DbpfError> {
        self.ensure_active()?;
        let path = self
            .file_path
            .clone()
            .ok_or_else(|| DbpfError::Io(io::Error::new(io::ErrorKind::NotFound, "package has no file path")))?;

        if delete_if_empty && self.entries().is_empty() {
            self.source = None;
            if let Some(p) = &self.provider {
                p.borrow_mut().remove_package(self.id);
            }
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            self.change_set.reset();
            self.state = PackageState::Deleted;
            return Ok(());
        }

        let bytes = self.serialize()?;
        self.source = None;
        write_atomic(&path, &bytes)?;

        self.source = Some(PackageSource::File(File::open(&path)?));
        self.parse()?;
        self.change_set.reset();
        Ok(())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DbpfError> {
    let tmp_path = path.with_extension("dbpf-rs-tmp");
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(bytes)?;
        tmp.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_package_is_empty_and_clean() {
        let pkg = Package::new();
        assert_eq!(pkg.state(), PackageState::Empty);
        assert!(pkg.entries().is_empty());
        assert!(!pkg.is_dirty());
    }

    #[test]
    fn empty_package_round_trips() {
        let mut pkg = Package::new();
        let bytes = pkg.serialize().unwrap();
        assert_eq!(&bytes[0..4], b"DBPF");
        let reparsed = Package::from_bytes(bytes).unwrap();
        assert!(reparsed.entries().is_empty());
    }

    #[test]
    fn staged_raw_entry_round_trips_uncompressed() {
        let mut pkg = Package::new();
        let tgi = ResourceKey::new(0xDEAD, crate::resource_key::LOCAL, 0xBEEF, 0);
        pkg.set_bytes(tgi, vec![0x01, 0x02, 0x03], false, 0);

        let bytes = pkg.serialize().unwrap();
        let mut reparsed = Package::from_bytes(bytes).unwrap();
        assert_eq!(reparsed.entries().len(), 1);
        let entry = reparsed.entries()[0];
        assert_eq!(reparsed.get_bytes(&entry).unwrap(), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn staged_compressed_entry_round_trips() {
        let mut pkg = Package::new();
        let tgi = ResourceKey::new(0xDEAD, crate::resource_key::LOCAL, 0xBEEF, 0);
        pkg.set_bytes(tgi, vec![0x01, 0x02, 0x03], true, 0);

        let bytes = pkg.serialize().unwrap();
        let mut reparsed = Package::from_bytes(bytes).unwrap();
        let entry = reparsed.entries()[0];
        assert_eq!(reparsed.get_bytes(&entry).unwrap(), vec![0x01, 0x02, 0x03]);
        assert!(entry.file_size as usize >= 3);
    }

    #[test]
    fn deleting_and_restoring_changes_visibility() {
        let mut pkg = Package::new();
        let tgi = ResourceKey::new(1, 0, 1, 0);
        pkg.set_bytes(tgi, vec![9, 9], false, 0);
        let bytes = pkg.serialize().unwrap();
        let mut reparsed = Package::from_bytes(bytes).unwrap();

        let entry = reparsed.entries()[0];
        reparsed.delete(&entry);
        assert!(reparsed.get_bytes(&entry).is_err());
        reparsed.restore(entry.internal_tgi);
        assert_eq!(reparsed.get_bytes(&entry).unwrap(), vec![9, 9]);
    }
}
