//! Chunked binary archive.
//!
//! The dictionary talks to its storage only through [`ArchiveWrite`] and
//! [`ArchiveRead`]. [`ChunkWriter`] / [`ChunkReader`] implement them over any
//! seekable stream.
//!
//! ## Wire layout
//!
//! ```text
//! chunk      := typecode:u32  length:u64  content[length]
//!
//! dictionary := chunk(TCODE_DICTIONARY) {
//!                   format_id:16  version:u32  name:string
//!                   entry*
//!                   chunk(TCODE_DICTIONARY_END) {}
//!               }
//! entry      := chunk(TCODE_DICTIONARY_ENTRY) {
//!                   type_code:u32  key:string  payload
//!               }
//! string     := len:u32  utf8[len]
//! ```
//!
//! All integers are little-endian.

mod element;
mod format;
mod reader;
mod traits;
mod writer;

pub use element::*;
pub use format::*;
pub use reader::*;
pub use traits::*;
pub use writer::*;
