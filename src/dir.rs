//! The DIR resource: a package's compression directory.
//!
//! DIR maps every compressed entry's internal TGI to its uncompressed
//! length. It is a resource like any other (parseable, listable) but also
//! doubles as write-time control data — see `update_dir` in
//! [`crate::package`]. It is never itself compressed and never lists
//! itself.

use std::io::{Read, Seek, Write};

use indexmap::IndexMap;

use crate::error::DbpfError;
use crate::io_buffer::IoBuffer;
use crate::resource_key::ResourceKey;

/// Parsed/emitted DIR body: internal TGI to uncompressed size, insertion
/// ordered (the order entries were read from or staged into the table).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirTable {
    sizes: IndexMap<ResourceKey, u32>,
}

impl DirTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tgi: &ResourceKey) -> Option<u32> {
        self.sizes.get(tgi).copied()
    }

    pub fn insert(&mut self, tgi: ResourceKey, uncompressed_size: u32) {
        self.sizes.insert(tgi, uncompressed_size);
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &u32)> {
        self.sizes.iter()
    }

    /// Parses a DIR body: tuples of `type, group, instance_lo, [instance_hi
    /// if index_minor >= 2], uncompressed_size`, all `u32`, repeated until
    /// the buffer is exhausted.
    pub fn parse<R: Read + Seek>(buf: &mut IoBuffer<R>, body_len: usize, index_minor: u32) -> Result<Self, DbpfError> {
        let record_len = if index_minor >= 2 { 20 } else { 16 };
        if record_len == 0 || body_len % record_len != 0 {
            return Err(DbpfError::CorruptCompression("DIR body is not a whole number of records"));
        }
        let count = body_len / record_len;
        let mut table = Self::new();
        for _ in 0..count {
            let type_id = buf.read_u32()?;
            let group_id = buf.read_u32()?;
            let instance_id = buf.read_u32()?;
            let instance_hi = if index_minor >= 2 { buf.read_u32()? } else { 0 };
            let uncompressed_size = buf.read_u32()?;
            table.insert(ResourceKey::new(type_id, group_id, instance_id, instance_hi), uncompressed_size);
        }
        Ok(table)
    }

    /// Serializes this table to its on-disk body form.
    pub fn to_bytes(&self, index_minor: u32) -> Result<Vec<u8>, DbpfError> {
        let mut buf = IoBuffer::new(std::io::Cursor::new(Vec::new()));
        self.write(&mut buf, index_minor)?;
        Ok(buf.into_inner().into_inner())
    }

    fn write<W: Write + Seek>(&self, buf: &mut IoBuffer<W>, index_minor: u32) -> Result<(), DbpfError> {
        for (tgi, size) in &self.sizes {
            buf.write_u32(tgi.type_id)?;
            buf.write_u32(tgi.group_id)?;
            buf.write_u32(tgi.instance_id)?;
            if index_minor >= 2 {
                buf.write_u32(tgi.instance_hi)?;
            }
            buf.write_u32(*size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_with_instance_hi() {
        let mut table = DirTable::new();
        table.insert(ResourceKey::new(1, 2, 3, 4), 100);
        table.insert(ResourceKey::new(5, 6, 7, 8), 200);

        let bytes = table.to_bytes(2).unwrap();
        let mut reader = IoBuffer::new(Cursor::new(bytes.clone()));
        let parsed = DirTable::parse(&mut reader, bytes.len(), 2).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn round_trips_without_instance_hi() {
        let mut table = DirTable::new();
        table.insert(ResourceKey::new(1, 2, 3, 0), 50);

        let bytes = table.to_bytes(1).unwrap();
        assert_eq!(bytes.len(), 16);
        let mut reader = IoBuffer::new(Cursor::new(bytes.clone()));
        let parsed = DirTable::parse(&mut reader, bytes.len(), 1).unwrap();
        assert_eq!(parsed.get(&ResourceKey::new(1, 2, 3, 0)), Some(50));
    }

    #[test]
    fn rejects_malformed_body_length() {
        let mut reader = IoBuffer::new(Cursor::new(vec![0u8; 15]));
        let err = DirTable::parse(&mut reader, 15, 2).unwrap_err();
        assert!(matches!(err, DbpfError::CorruptCompression(_)));
    }

    #[test]
    fn empty_table_is_empty() {
        let table = DirTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
