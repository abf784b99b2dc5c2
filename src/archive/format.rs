//! Chunk archive format constants and reader limits.

use uuid::Uuid;

/// Size of a chunk header: typecode (u32) + content length (u64).
pub const CHUNK_HEADER_SIZE: u64 = 12;

/// Offset of the length field inside a chunk header.
pub const CHUNK_LENGTH_OFFSET: u64 = 4;

/// Chunk holding a whole dictionary: format id, version, name, entries.
pub const TCODE_DICTIONARY: u32 = 0x4000_8000;

/// Chunk holding one dictionary entry: type code, key, payload.
pub const TCODE_DICTIONARY_ENTRY: u32 = 0x4000_8001;

/// Empty chunk terminating the entry list of a dictionary.
pub const TCODE_DICTIONARY_END: u32 = 0x4000_8002;

/// Identifier written at the start of every dictionary frame.
///
/// Baked into both reader and writer; never changes.
pub const DICTIONARY_FORMAT_ID: Uuid = Uuid::from_u128(0x2d8e4c2f_8a3b_4f1e_9c62_4b7d1e0a5c93);

/// Human-readable name of a chunk typecode, for logs and errors.
pub fn tcode_name(typecode: u32) -> &'static str {
    match typecode {
        TCODE_DICTIONARY => "TCODE_DICTIONARY",
        TCODE_DICTIONARY_ENTRY => "TCODE_DICTIONARY_ENTRY",
        TCODE_DICTIONARY_END => "TCODE_DICTIONARY_END",
        _ => "TCODE_UNKNOWN",
    }
}

/// Upper bounds applied while reading, so a corrupt or hostile length field
/// fails the read instead of allocating without bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadLimits {
    /// Maximum string length in bytes.
    pub max_string_len: usize,
    /// Maximum element count of an array (and byte length of a blob).
    pub max_array_len: usize,
    /// Maximum number of simultaneously open chunks.
    pub max_chunk_depth: usize,
}

impl ReadLimits {
    pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;
    pub const DEFAULT_MAX_ARRAY_LEN: usize = 64 * 1024 * 1024;
    pub const DEFAULT_MAX_CHUNK_DEPTH: usize = 64;

    /// No limits at all.
    pub const fn unlimited() -> Self {
        Self {
            max_string_len: usize::MAX,
            max_array_len: usize::MAX,
            max_chunk_depth: usize::MAX,
        }
    }
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_string_len: Self::DEFAULT_MAX_STRING_LEN,
            max_array_len: Self::DEFAULT_MAX_ARRAY_LEN,
            max_chunk_depth: Self::DEFAULT_MAX_CHUNK_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_is_stable() {
        assert_eq!(
            DICTIONARY_FORMAT_ID.to_string(),
            "2d8e4c2f-8a3b-4f1e-9c62-4b7d1e0a5c93"
        );
    }

    #[test]
    fn test_tcodes_distinct() {
        assert_ne!(TCODE_DICTIONARY, TCODE_DICTIONARY_ENTRY);
        assert_ne!(TCODE_DICTIONARY_ENTRY, TCODE_DICTIONARY_END);
        assert_eq!(tcode_name(TCODE_DICTIONARY_END), "TCODE_DICTIONARY_END");
        assert_eq!(tcode_name(0), "TCODE_UNKNOWN");
    }

    #[test]
    fn test_default_limits() {
        let l = ReadLimits::default();
        assert_eq!(l.max_chunk_depth, 64);
        assert!(ReadLimits::unlimited().max_string_len > l.max_string_len);
    }
}
