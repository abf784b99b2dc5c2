//! # threedm
//!
//! Persistence core of a CAD file-format library: a heterogeneous,
//! archivable key/value dictionary and the chunked binary archive it is
//! stored in.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (points, vectors, colors, errors)
//! - [`archive`] - Archive traits and the chunk reader/writer
//! - [`dictionary`] - Type tags, values and the dictionary itself
//! - [`geom`] - Geometry records, mesh parameters, opaque objects
//!
//! ## Example
//!
//! ```
//! use threedm::prelude::*;
//!
//! let mut opts = Dictionary::with_name("opts", 3);
//! opts.set("enabled", true);
//! opts.set("scale", 2.5f64);
//!
//! let mut writer = ChunkWriter::memory();
//! opts.write(&mut writer)?;
//! let bytes = writer.into_bytes()?;
//!
//! let back = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes))?;
//! assert_eq!(back.get::<f64>("scale"), 2.5);
//! # Ok::<(), threedm::Error>(())
//! ```

pub mod util;
pub mod archive;
pub mod dictionary;
pub mod geom;

// Re-export commonly used types
pub use util::{Error, Result};
pub use dictionary::{Dictionary, DictionaryValue, TypeTag, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Color, Error, Point2d, Point3d, Point4d, Rect, Result, Size, Vector2d, Vector3d};
    pub use crate::archive::{ArchiveRead, ArchiveWrite, ChunkReader, ChunkWriter, ReadLimits};
    pub use crate::dictionary::{Dictionary, DictionaryValue, TypeTag, Value};
    pub use crate::geom::{Geometry, MeshParameters, OpaqueObject};
}
