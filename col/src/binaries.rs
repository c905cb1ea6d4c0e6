use std::mem;

use bytemuck::Pod;

/// Bounds-checked cursor over an in-memory byte buffer.
///
/// COL data arrives as a borrowed slice (pulled out of an archive entry or
/// read off disk by the host), so unlike a `BufReader` there is no stream
/// to fail mid-read: every read either fits in the remaining bytes or
/// returns `None` and leaves the cursor untouched.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `len` bytes, or `None` without advancing if fewer remain.
    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end > self.data.len() {
            return None;
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    pub fn skip(&mut self, len: usize) -> bool {
        self.take(len).is_some()
    }

    /// Read one fixed-layout record. The wire structs are `#[repr(C, packed)]`,
    /// so unaligned reads are the norm here.
    pub fn read<T: Pod>(&mut self) -> Option<T> {
        let bytes = self.take(mem::size_of::<T>())?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }
}

/// Append-only counterpart used by the encode path.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write<T: Pod>(&mut self, value: &T) {
        self.buf.extend_from_slice(bytemuck::bytes_of(value));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod binaries_tests {
    use super::*;

    #[test]
    fn read_past_end_leaves_cursor() {
        let data = [1u8, 2, 3];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read::<u16>(), Some(u16::from_le_bytes([1, 2])));
        assert_eq!(r.read::<u32>(), None);
        assert_eq!(r.pos(), 2);
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn writer_round_trips_records() {
        let mut w = ByteWriter::new();
        w.write(&0xdeadbeefu32);
        w.write_bytes(b"COLL");
        let bytes = w.into_inner();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read::<u32>(), Some(0xdeadbeef));
        assert_eq!(r.take(4), Some(&b"COLL"[..]));
    }
}
