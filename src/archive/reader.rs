//! Chunk archive reader.
//!
//! Tracks the end offset of every open chunk. Reads may not cross the end of
//! the innermost chunk, and closing a chunk seeks to its recorded end, so any
//! content the caller did not understand is skipped without desynchronizing
//! the stream.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use smallvec::SmallVec;
use uuid::Uuid;

use super::format::*;
use super::{ArchiveRead, DictionaryHeader, EntryHeader};
use crate::util::{Error, Result};

#[derive(Clone, Copy, Debug)]
struct OpenChunk {
    typecode: u32,
    /// Absolute position one past the chunk content.
    end: u64,
}

/// Reads a chunked binary archive from any seekable stream.
pub struct ChunkReader<R: Read + Seek> {
    reader: R,
    pos: u64,
    open: SmallVec<[OpenChunk; 8]>,
    limits: ReadLimits,
}

impl<'a> ChunkReader<Cursor<&'a [u8]>> {
    /// Reader over an in-memory buffer.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            reader: Cursor::new(bytes),
            pos: 0,
            open: SmallVec::new(),
            limits: ReadLimits::default(),
        }
    }
}

impl ChunkReader<BufReader<File>> {
    /// Open a file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Start reading at the stream's current position.
    pub fn new(mut reader: R) -> Result<Self> {
        let pos = reader.stream_position()?;
        Ok(Self {
            reader,
            pos,
            open: SmallVec::new(),
            limits: ReadLimits::default(),
        })
    }

    /// Replace the read limits.
    pub fn with_limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn limits(&self) -> &ReadLimits {
        &self.limits
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Number of chunks currently open.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Return the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Open the next chunk and return its typecode and content length.
    pub fn begin_chunk(&mut self) -> Result<(u32, u64)> {
        if self.open.len() >= self.limits.max_chunk_depth {
            return Err(Error::LimitExceeded {
                what: "chunk depth",
                value: self.open.len() as u64 + 1,
                limit: self.limits.max_chunk_depth as u64,
            });
        }

        let typecode = self.read_fixed(4, |r| r.read_u32::<LittleEndian>())?;
        let length = self.read_fixed(8, |r| r.read_u64::<LittleEndian>())?;
        let end = self
            .pos
            .checked_add(length)
            .ok_or_else(|| Error::invalid(format!("chunk length {length} overflows")))?;
        if let Some(parent) = self.open.last() {
            if end > parent.end {
                return Err(Error::invalid(format!(
                    "{} chunk ends at {} past its parent {} ending at {}",
                    tcode_name(typecode),
                    end,
                    tcode_name(parent.typecode),
                    parent.end
                )));
            }
        }

        self.open.push(OpenChunk { typecode, end });
        tracing::trace!(tcode = tcode_name(typecode), length, depth = self.open.len(), "begin chunk");
        Ok((typecode, length))
    }

    /// Close the innermost chunk, which must have the given typecode, and
    /// skip whatever content was not read.
    pub fn end_chunk(&mut self, typecode: u32) -> Result<()> {
        let chunk = match self.open.last() {
            Some(c) if c.typecode == typecode => *c,
            Some(c) => {
                return Err(Error::invalid(format!(
                    "end of {} while {} is open",
                    tcode_name(typecode),
                    tcode_name(c.typecode)
                )))
            }
            None => {
                return Err(Error::invalid(format!(
                    "end of {} without an open chunk",
                    tcode_name(typecode)
                )))
            }
        };
        self.open.pop();

        if self.pos > chunk.end {
            return Err(Error::invalid(format!(
                "read {} bytes past the end of {}",
                self.pos - chunk.end,
                tcode_name(typecode)
            )));
        }
        if self.pos < chunk.end {
            tracing::trace!(skipped = chunk.end - self.pos, tcode = tcode_name(typecode), "skip chunk tail");
            self.seek_to(chunk.end)?;
        }
        Ok(())
    }

    fn seek_to(&mut self, pos: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    /// Rewind to `pos` and drop chunks opened after `depth`.
    fn rewind(&mut self, pos: u64, depth: usize) -> Result<()> {
        self.open.truncate(depth);
        self.seek_to(pos)
    }

    fn check_available(&self, size: u64) -> Result<()> {
        if let Some(chunk) = self.open.last() {
            if self.pos + size > chunk.end {
                return Err(Error::invalid(format!(
                    "read of {} bytes at {} crosses the end of {} at {}",
                    size,
                    self.pos,
                    tcode_name(chunk.typecode),
                    chunk.end
                )));
            }
        }
        Ok(())
    }

    /// Read a fixed-size value with `f`, mapping a short read to
    /// [`Error::UnexpectedEof`].
    fn read_fixed<T>(&mut self, size: u64, f: impl FnOnce(&mut R) -> io::Result<T>) -> Result<T> {
        self.check_available(size)?;
        let pos = self.pos;
        let v = f(&mut self.reader).map_err(|e| eof_or_io(e, pos))?;
        self.pos += size;
        Ok(v)
    }

    fn check_limit(what: &'static str, value: usize, limit: usize) -> Result<()> {
        if value > limit {
            return Err(Error::LimitExceeded {
                what,
                value: value as u64,
                limit: limit as u64,
            });
        }
        Ok(())
    }
}

fn eof_or_io(e: io::Error, pos: u64) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEof(pos)
    } else {
        Error::Io(e)
    }
}

impl<R: Read + Seek> ArchiveRead for ChunkReader<R> {
    fn begin_read_dictionary(&mut self, format_id: &Uuid) -> Result<DictionaryHeader> {
        let start = self.pos;
        let depth = self.open.len();

        let (typecode, _) = self.begin_chunk()?;
        if typecode != TCODE_DICTIONARY {
            self.rewind(start, depth)?;
            return Err(Error::invalid(format!(
                "expected TCODE_DICTIONARY, found {typecode:#010x}"
            )));
        }

        let found = match self.read_uuid() {
            Ok(id) => id,
            Err(e) => {
                self.rewind(start, depth)?;
                return Err(e);
            }
        };
        if found != *format_id {
            self.rewind(start, depth)?;
            return Err(Error::FormatMismatch {
                expected: *format_id,
                found,
            });
        }

        let version = self.read_u32()?;
        let name = self.read_string()?;
        Ok(DictionaryHeader { version, name })
    }

    fn end_read_dictionary(&mut self) -> Result<()> {
        self.end_chunk(TCODE_DICTIONARY)
    }

    fn begin_read_entry(&mut self) -> Result<EntryHeader> {
        match self.open.last() {
            Some(c) if c.typecode == TCODE_DICTIONARY => {}
            _ => return Err(Error::invalid("entry read outside of a dictionary frame")),
        }

        let (typecode, _) = self.begin_chunk()?;
        match typecode {
            TCODE_DICTIONARY_ENTRY => {
                let header = self.read_u32().and_then(|type_code| Ok((type_code, self.read_string()?)));
                match header {
                    Ok((type_code, key)) => Ok(EntryHeader::More { type_code, key }),
                    Err(e) => {
                        // leave the dictionary frame on top for end_read_dictionary
                        let _ = self.end_chunk(TCODE_DICTIONARY_ENTRY);
                        Err(e)
                    }
                }
            }
            TCODE_DICTIONARY_END => {
                self.end_chunk(TCODE_DICTIONARY_END)?;
                Ok(EntryHeader::Done)
            }
            other => {
                let _ = self.end_chunk(other);
                Err(Error::invalid(format!(
                    "unexpected chunk {other:#010x} in dictionary"
                )))
            }
        }
    }

    fn end_read_entry(&mut self) -> Result<()> {
        self.end_chunk(TCODE_DICTIONARY_ENTRY)
    }

    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.read_fixed(1, |r| r.read_u8())
    }

    fn read_i8(&mut self) -> Result<i8> {
        self.read_fixed(1, |r| r.read_i8())
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.read_fixed(2, |r| r.read_u16::<LittleEndian>())
    }

    fn read_i16(&mut self) -> Result<i16> {
        self.read_fixed(2, |r| r.read_i16::<LittleEndian>())
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.read_fixed(4, |r| r.read_u32::<LittleEndian>())
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.read_fixed(4, |r| r.read_i32::<LittleEndian>())
    }

    fn read_u64(&mut self) -> Result<u64> {
        self.read_fixed(8, |r| r.read_u64::<LittleEndian>())
    }

    fn read_i64(&mut self) -> Result<i64> {
        self.read_fixed(8, |r| r.read_i64::<LittleEndian>())
    }

    fn read_f32(&mut self) -> Result<f32> {
        self.read_fixed(4, |r| r.read_f32::<LittleEndian>())
    }

    fn read_f64(&mut self) -> Result<f64> {
        self.read_fixed(8, |r| r.read_f64::<LittleEndian>())
    }

    fn read_uuid(&mut self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        self.read_fixed(16, |r| r.read_exact(&mut bytes))?;
        Ok(Uuid::from_bytes_le(bytes))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        Self::check_limit("string length", len, self.limits.max_string_len)?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_available(len as u64)?;
        let mut buf = Vec::new();
        let pos = self.pos;
        let got = (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| eof_or_io(e, pos))?;
        self.pos += got as u64;
        if got < len {
            return Err(Error::UnexpectedEof(self.pos));
        }
        Ok(buf)
    }

    fn read_array_len(&mut self) -> Result<usize> {
        let len = self.read_u32()? as usize;
        Self::check_limit("array length", len, self.limits.max_array_len)?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveWrite, ChunkWriter};

    fn chunk_bytes() -> Vec<u8> {
        let mut w = ChunkWriter::memory();
        w.begin_chunk(1).unwrap();
        w.write_u32(10).unwrap();
        w.write_u32(20).unwrap();
        w.end_chunk(1).unwrap();
        w.write_u32(0xFEED).unwrap();
        w.into_bytes().unwrap()
    }

    #[test]
    fn test_end_chunk_skips_tail() {
        let bytes = chunk_bytes();
        let mut r = ChunkReader::from_bytes(&bytes);
        assert_eq!(r.begin_chunk().unwrap(), (1, 8));
        assert_eq!(r.read_u32().unwrap(), 10);
        r.end_chunk(1).unwrap();
        assert_eq!(r.read_u32().unwrap(), 0xFEED);
    }

    #[test]
    fn test_read_cannot_cross_chunk_end() {
        let bytes = chunk_bytes();
        let mut r = ChunkReader::from_bytes(&bytes);
        r.begin_chunk().unwrap();
        r.read_u64().unwrap();
        assert!(matches!(r.read_u8(), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_truncated_stream() {
        let bytes = chunk_bytes();
        let mut r = ChunkReader::from_bytes(&bytes[..6]);
        assert!(matches!(r.begin_chunk(), Err(Error::UnexpectedEof(4))));

        let mut r = ChunkReader::from_bytes(&bytes[..2]);
        assert!(matches!(r.read_u32(), Err(Error::UnexpectedEof(0))));
    }

    #[test]
    fn test_string_limit() {
        let mut w = ChunkWriter::memory();
        w.write_string("0123456789").unwrap();
        let bytes = w.into_bytes().unwrap();

        let limits = ReadLimits { max_string_len: 4, ..ReadLimits::default() };
        let mut r = ChunkReader::from_bytes(&bytes).with_limits(limits);
        assert!(matches!(
            r.read_string(),
            Err(Error::LimitExceeded { what: "string length", value: 10, limit: 4 })
        ));

        let mut r = ChunkReader::from_bytes(&bytes);
        assert_eq!(r.read_string().unwrap(), "0123456789");
    }

    #[test]
    fn test_chunk_depth_limit() {
        let mut w = ChunkWriter::memory();
        for tc in 0..3 {
            w.begin_chunk(tc).unwrap();
        }
        for tc in (0..3).rev() {
            w.end_chunk(tc).unwrap();
        }
        let bytes = w.into_bytes().unwrap();

        let limits = ReadLimits { max_chunk_depth: 2, ..ReadLimits::default() };
        let mut r = ChunkReader::from_bytes(&bytes).with_limits(limits);
        r.begin_chunk().unwrap();
        r.begin_chunk().unwrap();
        assert!(matches!(r.begin_chunk(), Err(Error::LimitExceeded { .. })));
    }

    #[test]
    fn test_uuid_roundtrip() {
        let id = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
        let mut w = ChunkWriter::memory();
        w.write_uuid(&id).unwrap();
        let bytes = w.into_bytes().unwrap();
        // first field is little-endian
        assert_eq!(&bytes[0..4], &[0x33, 0x22, 0x11, 0x00]);
        assert_eq!(ChunkReader::from_bytes(&bytes).read_uuid().unwrap(), id);
    }
}
