//! Abstract archive interfaces consumed by the dictionary.
//!
//! These traits define the boundary between value/dictionary persistence and
//! whatever chunked stream carries the bytes. Every primitive is
//! self-delimiting: a read consumes exactly the bytes the matching write
//! produced. Frame calls (`begin_*` / `end_*`) must be balanced.

use uuid::Uuid;

use crate::util::{Color, Error, Point2d, Point3d, Point4d, Rect, Result, Size, Vector2d, Vector3d};
use glam::{DVec2, DVec3, DVec4};

// ============================================================================
// Frame headers
// ============================================================================

/// Metadata carried by a dictionary frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictionaryHeader {
    pub version: u32,
    pub name: String,
}

/// Result of asking the archive for the next dictionary entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryHeader {
    /// An entry frame is open; its payload follows.
    More { type_code: u32, key: String },
    /// The dictionary has no more entries.
    Done,
}

// ============================================================================
// Writer
// ============================================================================

/// Sequential writer side of a binary archive.
pub trait ArchiveWrite {
    /// Open a dictionary frame. Must be paired with `end_write_dictionary`.
    fn begin_write_dictionary(&mut self, format_id: &Uuid, version: u32, name: &str) -> Result<()>;

    /// Close the innermost dictionary frame.
    fn end_write_dictionary(&mut self) -> Result<()>;

    /// Open one entry frame. Must be paired with `end_write_entry`, even when
    /// the payload write failed.
    fn begin_write_entry(&mut self, type_code: u32, key: &str) -> Result<()>;

    /// Close the innermost entry frame.
    fn end_write_entry(&mut self) -> Result<()>;

    fn write_bool(&mut self, v: bool) -> Result<()>;
    fn write_u8(&mut self, v: u8) -> Result<()>;
    fn write_i8(&mut self, v: i8) -> Result<()>;
    fn write_u16(&mut self, v: u16) -> Result<()>;
    fn write_i16(&mut self, v: i16) -> Result<()>;
    fn write_u32(&mut self, v: u32) -> Result<()>;
    fn write_i32(&mut self, v: i32) -> Result<()>;
    fn write_u64(&mut self, v: u64) -> Result<()>;
    fn write_i64(&mut self, v: i64) -> Result<()>;
    fn write_f32(&mut self, v: f32) -> Result<()>;
    fn write_f64(&mut self, v: f64) -> Result<()>;
    fn write_uuid(&mut self, v: &Uuid) -> Result<()>;

    /// Length-prefixed UTF-8 string.
    fn write_string(&mut self, v: &str) -> Result<()>;

    /// Raw bytes, no length prefix.
    fn write_bytes(&mut self, v: &[u8]) -> Result<()>;

    /// Element count prefix of a homogeneous array.
    fn write_array_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::LimitExceeded {
            what: "array length",
            value: len as u64,
            limit: u32::MAX as u64,
        })?;
        self.write_u32(len)
    }

    fn write_color(&mut self, v: Color) -> Result<()> {
        self.write_u32(v.to_u32())
    }

    fn write_point2d(&mut self, v: &Point2d) -> Result<()> {
        write_dvec2(self, v.0)
    }

    fn write_point3d(&mut self, v: &Point3d) -> Result<()> {
        write_dvec3(self, v.0)
    }

    fn write_point4d(&mut self, v: &Point4d) -> Result<()> {
        let DVec4 { x, y, z, w } = v.0;
        self.write_f64(x)?;
        self.write_f64(y)?;
        self.write_f64(z)?;
        self.write_f64(w)
    }

    fn write_vector2d(&mut self, v: &Vector2d) -> Result<()> {
        write_dvec2(self, v.0)
    }

    fn write_vector3d(&mut self, v: &Vector3d) -> Result<()> {
        write_dvec3(self, v.0)
    }

    fn write_rect(&mut self, v: &Rect) -> Result<()> {
        self.write_i32(v.left)?;
        self.write_i32(v.top)?;
        self.write_i32(v.right)?;
        self.write_i32(v.bottom)
    }

    fn write_size(&mut self, v: &Size) -> Result<()> {
        self.write_i32(v.cx)?;
        self.write_i32(v.cy)
    }
}

fn write_dvec2<A: ArchiveWrite + ?Sized>(ar: &mut A, v: DVec2) -> Result<()> {
    ar.write_f64(v.x)?;
    ar.write_f64(v.y)
}

fn write_dvec3<A: ArchiveWrite + ?Sized>(ar: &mut A, v: DVec3) -> Result<()> {
    ar.write_f64(v.x)?;
    ar.write_f64(v.y)?;
    ar.write_f64(v.z)
}

// ============================================================================
// Reader
// ============================================================================

/// Sequential reader side of a binary archive.
pub trait ArchiveRead {
    /// Open a dictionary frame and check its format id.
    ///
    /// Fails with [`Error::FormatMismatch`] when the frame carries a
    /// different id; implementations that can seek restore the stream
    /// position to before the frame in that case.
    fn begin_read_dictionary(&mut self, format_id: &Uuid) -> Result<DictionaryHeader>;

    /// Skip any unread content of the dictionary frame and close it.
    fn end_read_dictionary(&mut self) -> Result<()>;

    /// Open the next entry frame, or report that none remain.
    fn begin_read_entry(&mut self) -> Result<EntryHeader>;

    /// Skip any unread payload and close the entry frame. Called exactly once
    /// per [`EntryHeader::More`], including for entries of unknown type.
    fn end_read_entry(&mut self) -> Result<()>;

    fn read_bool(&mut self) -> Result<bool>;
    fn read_u8(&mut self) -> Result<u8>;
    fn read_i8(&mut self) -> Result<i8>;
    fn read_u16(&mut self) -> Result<u16>;
    fn read_i16(&mut self) -> Result<i16>;
    fn read_u32(&mut self) -> Result<u32>;
    fn read_i32(&mut self) -> Result<i32>;
    fn read_u64(&mut self) -> Result<u64>;
    fn read_i64(&mut self) -> Result<i64>;
    fn read_f32(&mut self) -> Result<f32>;
    fn read_f64(&mut self) -> Result<f64>;
    fn read_uuid(&mut self) -> Result<Uuid>;
    fn read_string(&mut self) -> Result<String>;

    /// Exactly `len` raw bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Element count prefix of a homogeneous array.
    fn read_array_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    fn read_color(&mut self) -> Result<Color> {
        Ok(Color::from_u32(self.read_u32()?))
    }

    fn read_point2d(&mut self) -> Result<Point2d> {
        Ok(Point2d(read_dvec2(self)?))
    }

    fn read_point3d(&mut self) -> Result<Point3d> {
        Ok(Point3d(read_dvec3(self)?))
    }

    fn read_point4d(&mut self) -> Result<Point4d> {
        let x = self.read_f64()?;
        let y = self.read_f64()?;
        let z = self.read_f64()?;
        let w = self.read_f64()?;
        Ok(Point4d::new(x, y, z, w))
    }

    fn read_vector2d(&mut self) -> Result<Vector2d> {
        Ok(Vector2d(read_dvec2(self)?))
    }

    fn read_vector3d(&mut self) -> Result<Vector3d> {
        Ok(Vector3d(read_dvec3(self)?))
    }

    fn read_rect(&mut self) -> Result<Rect> {
        let left = self.read_i32()?;
        let top = self.read_i32()?;
        let right = self.read_i32()?;
        let bottom = self.read_i32()?;
        Ok(Rect::new(left, top, right, bottom))
    }

    fn read_size(&mut self) -> Result<Size> {
        let cx = self.read_i32()?;
        let cy = self.read_i32()?;
        Ok(Size::new(cx, cy))
    }
}

fn read_dvec2<A: ArchiveRead + ?Sized>(ar: &mut A) -> Result<DVec2> {
    let x = ar.read_f64()?;
    let y = ar.read_f64()?;
    Ok(DVec2::new(x, y))
}

fn read_dvec3<A: ArchiveRead + ?Sized>(ar: &mut A) -> Result<DVec3> {
    let x = ar.read_f64()?;
    let y = ar.read_f64()?;
    let z = ar.read_f64()?;
    Ok(DVec3::new(x, y, z))
}
