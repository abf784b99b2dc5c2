//! Opaque serialized objects.

use uuid::Uuid;

use crate::archive::{ArchiveRead, ArchiveWrite};
use crate::util::Result;

/// An object serialized by a component this library does not know about.
///
/// The dictionary round-trips the bytes untouched; `class_id` tells the
/// owning component how to decode them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OpaqueObject {
    pub class_id: Uuid,
    pub data: Vec<u8>,
}

impl OpaqueObject {
    pub fn new(class_id: Uuid, data: impl Into<Vec<u8>>) -> Self {
        Self { class_id, data: data.into() }
    }

    /// True when no class is set and there is no data.
    pub fn is_empty(&self) -> bool {
        self.class_id.is_nil() && self.data.is_empty()
    }

    pub fn write(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.write_uuid(&self.class_id)?;
        ar.write_array_len(self.data.len())?;
        ar.write_bytes(&self.data)
    }

    pub fn read(&mut self, ar: &mut dyn ArchiveRead) -> Result<()> {
        self.class_id = ar.read_uuid()?;
        let len = ar.read_array_len()?;
        self.data = ar.read_bytes(len)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ChunkReader, ChunkWriter};

    #[test]
    fn test_opaque_object_roundtrip() {
        let obj = OpaqueObject::new(Uuid::from_u128(42), vec![0, 1, 2, 255]);
        let mut w = ChunkWriter::memory();
        obj.write(&mut w).unwrap();
        let bytes = w.into_bytes().unwrap();
        assert_eq!(bytes.len(), 16 + 4 + 4);

        let mut back = OpaqueObject::default();
        assert!(back.is_empty());
        back.read(&mut ChunkReader::from_bytes(&bytes)).unwrap();
        assert_eq!(back, obj);
    }
}
