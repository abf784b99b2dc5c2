//! Archivable dictionary.
//!
//! A [`Dictionary`] maps string keys to values of any supported type and
//! persists them through an [`ArchiveWrite`](crate::archive::ArchiveWrite) /
//! [`ArchiveRead`](crate::archive::ArchiveRead).
//!
//! - [`TypeTag`] - stable wire code of each supported type
//! - [`Value`] - the closed set of storable values
//! - [`DictionaryValue`] - typed access from Rust types
//!
//! Readers skip entries whose type code they do not know, so a file written
//! by a newer version with new value types still loads; only the unknown
//! entries are dropped.

mod store;
mod type_tag;
mod typed;
mod value;

pub use store::*;
pub use type_tag::*;
pub use typed::*;
pub use value::*;
