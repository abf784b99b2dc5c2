//! Chunk archive writer.
//!
//! Every chunk is written as `typecode: u32`, `length: u64`, content. The
//! length is unknown when the chunk opens, so a placeholder is written and
//! patched when the chunk closes; the underlying stream must be seekable.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use smallvec::SmallVec;
use uuid::Uuid;

use super::format::*;
use super::ArchiveWrite;
use crate::util::{Error, Result};

/// A chunk whose length has not been patched yet.
#[derive(Clone, Copy, Debug)]
struct OpenChunk {
    typecode: u32,
    /// Absolute position of the u64 length field.
    length_pos: u64,
}

/// Writes a chunked binary archive to any seekable stream.
pub struct ChunkWriter<W: Write + Seek> {
    writer: W,
    pos: u64,
    open: SmallVec<[OpenChunk; 8]>,
}

impl ChunkWriter<Cursor<Vec<u8>>> {
    /// Writer backed by an in-memory buffer.
    pub fn memory() -> Self {
        Self {
            writer: Cursor::new(Vec::new()),
            pos: 0,
            open: SmallVec::new(),
        }
    }

    /// Close the archive and return the written bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl ChunkWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write to it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::new(BufWriter::with_capacity(256 * 1024, file))
    }
}

impl<W: Write + Seek> ChunkWriter<W> {
    /// Start writing at the stream's current position.
    pub fn new(mut writer: W) -> Result<Self> {
        let pos = writer.stream_position()?;
        Ok(Self {
            writer,
            pos,
            open: SmallVec::new(),
        })
    }

    /// Current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Number of chunks currently open.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Open a chunk with the given typecode.
    pub fn begin_chunk(&mut self, typecode: u32) -> Result<()> {
        self.put_u32(typecode)?;
        let length_pos = self.pos;
        self.put_u64(0)?;
        self.open.push(OpenChunk { typecode, length_pos });
        tracing::trace!(tcode = tcode_name(typecode), depth = self.open.len(), "begin chunk");
        Ok(())
    }

    /// Close the innermost chunk, which must have the given typecode, and
    /// patch its length.
    pub fn end_chunk(&mut self, typecode: u32) -> Result<()> {
        let chunk = self.open.pop().ok_or_else(|| {
            Error::invalid(format!("end of {} without an open chunk", tcode_name(typecode)))
        })?;
        if chunk.typecode != typecode {
            let msg = format!(
                "end of {} while {} is open",
                tcode_name(typecode),
                tcode_name(chunk.typecode)
            );
            // Keep the stack intact so the caller can still close the right chunk.
            self.open.push(chunk);
            return Err(Error::invalid(msg));
        }

        let length = self.pos - (chunk.length_pos + 8);
        let end = self.pos;
        self.writer.seek(SeekFrom::Start(chunk.length_pos))?;
        self.writer.write_u64::<LittleEndian>(length)?;
        self.writer.seek(SeekFrom::Start(end))?;
        tracing::trace!(tcode = tcode_name(typecode), length, "end chunk");
        Ok(())
    }

    /// Flush and return the underlying stream. Fails if a chunk is still open.
    pub fn finish(mut self) -> Result<W> {
        if let Some(chunk) = self.open.last() {
            return Err(Error::invalid(format!(
                "{} chunk(s) still open, innermost {}",
                self.open.len(),
                tcode_name(chunk.typecode)
            )));
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn put_u32(&mut self, v: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(v)?;
        self.pos += 4;
        Ok(())
    }

    fn put_u64(&mut self, v: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(v)?;
        self.pos += 8;
        Ok(())
    }
}

impl<W: Write + Seek> ArchiveWrite for ChunkWriter<W> {
    fn begin_write_dictionary(&mut self, format_id: &Uuid, version: u32, name: &str) -> Result<()> {
        self.begin_chunk(TCODE_DICTIONARY)?;
        self.write_uuid(format_id)?;
        self.write_u32(version)?;
        self.write_string(name)
    }

    fn end_write_dictionary(&mut self) -> Result<()> {
        self.begin_chunk(TCODE_DICTIONARY_END)?;
        self.end_chunk(TCODE_DICTIONARY_END)?;
        self.end_chunk(TCODE_DICTIONARY)
    }

    fn begin_write_entry(&mut self, type_code: u32, key: &str) -> Result<()> {
        self.begin_chunk(TCODE_DICTIONARY_ENTRY)?;
        self.write_u32(type_code)?;
        self.write_string(key)
    }

    fn end_write_entry(&mut self) -> Result<()> {
        self.end_chunk(TCODE_DICTIONARY_ENTRY)
    }

    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(v as u8)
    }

    fn write_u8(&mut self, v: u8) -> Result<()> {
        self.writer.write_u8(v)?;
        self.pos += 1;
        Ok(())
    }

    fn write_i8(&mut self, v: i8) -> Result<()> {
        self.writer.write_i8(v)?;
        self.pos += 1;
        Ok(())
    }

    fn write_u16(&mut self, v: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(v)?;
        self.pos += 2;
        Ok(())
    }

    fn write_i16(&mut self, v: i16) -> Result<()> {
        self.writer.write_i16::<LittleEndian>(v)?;
        self.pos += 2;
        Ok(())
    }

    fn write_u32(&mut self, v: u32) -> Result<()> {
        self.put_u32(v)
    }

    fn write_i32(&mut self, v: i32) -> Result<()> {
        self.writer.write_i32::<LittleEndian>(v)?;
        self.pos += 4;
        Ok(())
    }

    fn write_u64(&mut self, v: u64) -> Result<()> {
        self.put_u64(v)
    }

    fn write_i64(&mut self, v: i64) -> Result<()> {
        self.writer.write_i64::<LittleEndian>(v)?;
        self.pos += 8;
        Ok(())
    }

    fn write_f32(&mut self, v: f32) -> Result<()> {
        self.writer.write_f32::<LittleEndian>(v)?;
        self.pos += 4;
        Ok(())
    }

    fn write_f64(&mut self, v: f64) -> Result<()> {
        self.writer.write_f64::<LittleEndian>(v)?;
        self.pos += 8;
        Ok(())
    }

    fn write_uuid(&mut self, v: &Uuid) -> Result<()> {
        self.write_bytes(&v.to_bytes_le())
    }

    fn write_string(&mut self, v: &str) -> Result<()> {
        self.write_array_len(v.len())?;
        self.write_bytes(v.as_bytes())
    }

    fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.writer.write_all(v)?;
        self.pos += v.len() as u64;
        Ok(())
    }
}
