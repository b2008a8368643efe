//! Little-endian binary cursor used for both header/index parsing and
//! serialization.
//!
//! `rpkg-rs` leans on `binrw` for the fixed-shape parts of its format and
//! falls back to raw `Cursor` + `Seek`/`Write` calls in
//! `PackageBuilder::backpatch` for everything that needs a "go back and
//! patch this offset" dance. The DBPF header is *mostly* the second kind —
//! a chain of version-gated reads and skips — so `IoBuffer` generalizes
//! that raw-cursor style into its own small type instead of fighting
//! `binrw`'s declarative attributes into expressing runtime version
//! dispatch.

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A little-endian cursor over any `Read + Seek` (or `Write + Seek`)
/// backing store.
pub struct IoBuffer<T> {
    inner: T,
}

impl<T> IoBuffer<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T: Seek> IoBuffer<T> {
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.inner.seek(SeekFrom::Start(offset))
    }

    pub fn seek_relative(&mut self, delta: i64) -> io::Result<u64> {
        self.inner.seek(SeekFrom::Current(delta))
    }
}

impl<T: Read + Seek> IoBuffer<T> {
    pub fn skip(&mut self, count: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Current(count as i64))?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.inner.read_u8()
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        self.inner.read_u16::<LE>()
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        self.inner.read_u32::<LE>()
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        self.inner.read_i32::<LE>()
    }

    pub fn read_f32(&mut self) -> io::Result<f32> {
        self.inner.read_f32::<LE>()
    }

    /// Reads `len` raw bytes into an owned buffer.
    pub fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a fixed-length byte run as a C string: exactly `len` bytes,
    /// truncated at the first NUL if one is present, otherwise the whole
    /// run. No NUL scanning happens up front — `len` is always supplied by
    /// the caller from a length-prefix field, never discovered by reading
    /// until a terminator.
    pub fn read_fixed_c_string(&mut self, len: usize) -> io::Result<String> {
        let bytes = self.read_bytes(len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

impl<T: Write + Seek> IoBuffer<T> {
    pub fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.inner.write_u8(v)
    }

    pub fn write_u16(&mut self, v: u16) -> io::Result<()> {
        self.inner.write_u16::<LE>(v)
    }

    pub fn write_u32(&mut self, v: u32) -> io::Result<()> {
        self.inner.write_u32::<LE>(v)
    }

    pub fn write_i32(&mut self, v: i32) -> io::Result<()> {
        self.inner.write_i32::<LE>(v)
    }

    pub fn write_f32(&mut self, v: f32) -> io::Result<()> {
        self.inner.write_f32::<LE>(v)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    pub fn write_zeros(&mut self, count: usize) -> io::Result<()> {
        self.write_bytes(&vec![0u8; count])
    }
}

impl<T: Read + Write + Seek> IoBuffer<T> {
    /// Records the current position, seeks to `offset`, writes `value`,
    /// then returns to where writing left off — the back-patch pattern
    /// used for offset/size fields whose value is only known after the
    /// data they describe has been written.
    pub fn backpatch_u32(&mut self, offset: u64, value: u32) -> io::Result<()> {
        let resume = self.inner.stream_position()?;
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.write_u32::<LE>(value)?;
        self.inner.seek(SeekFrom::Start(resume))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_primitives() {
        let mut buf = IoBuffer::new(Cursor::new(Vec::new()));
        buf.write_u32(0xDEADBEEF).unwrap();
        buf.write_i32(-5).unwrap();
        buf.write_f32(1.5).unwrap();
        buf.write_u8(7).unwrap();

        let mut reader = IoBuffer::new(Cursor::new(buf.into_inner().into_inner()));
        assert_eq!(reader.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_i32().unwrap(), -5);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_u8().unwrap(), 7);
    }

    #[test]
    fn fixed_c_string_truncates_at_nul() {
        let mut buf = IoBuffer::new(Cursor::new(vec![b'h', b'i', 0, b'X']));
        assert_eq!(buf.read_fixed_c_string(4).unwrap(), "hi");
    }

    #[test]
    fn backpatch_restores_position() {
        let mut buf = IoBuffer::new(Cursor::new(vec![0u8; 16]));
        buf.seek_to(12).unwrap();
        buf.backpatch_u32(0, 0x11223344).unwrap();
        assert_eq!(buf.position().unwrap(), 12);
        let mut reader = IoBuffer::new(Cursor::new(buf.into_inner().into_inner()));
        assert_eq!(reader.read_u32().unwrap(), 0x11223344);
    }

    #[test]
    fn skip_and_seek() {
        let mut buf = IoBuffer::new(Cursor::new(vec![1u8, 2, 3, 4]));
        buf.skip(2).unwrap();
        assert_eq!(buf.position().unwrap(), 2);
        buf.seek_to(1).unwrap();
        assert_eq!(buf.position().unwrap(), 1);
    }
}
