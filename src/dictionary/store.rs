//! The archivable dictionary.

use std::collections::btree_map::{self, BTreeMap};

use super::{DictionaryValue, TypeTag, Value};
use crate::archive::{ArchiveRead, ArchiveWrite, EntryHeader, DICTIONARY_FORMAT_ID};
use crate::util::Result;

/// A named, versioned map from string keys to typed values.
///
/// `Clone` is a full deep copy: nested dictionaries and arrays are
/// duplicated, so a clone can be mutated without affecting the original.
///
/// Keys are case-sensitive. Iteration is in key order, but nothing in the
/// file format depends on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    version: u32,
    name: String,
    entries: BTreeMap<String, Value>,
}

impl Dictionary {
    /// Empty dictionary with version 0 and no name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty dictionary with the given metadata.
    pub fn with_name(name: impl Into<String>, version: u32) -> Self {
        Self {
            version,
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    // === Metadata ===

    /// Caller-defined version, round-tripped unchanged.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Caller-defined name, round-tripped unchanged.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // === Enumeration ===

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All keys.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate over key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The untyped value at `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Type of the value at `key`.
    pub fn type_tag(&self, key: &str) -> Option<TypeTag> {
        self.entries.get(key).map(Value::type_tag)
    }

    // === Typed access ===

    /// Store `value` unless `key` already holds a different type.
    ///
    /// Returns `false`, leaving the entry untouched, on a type conflict.
    pub fn try_set<V: DictionaryValue>(&mut self, key: &str, value: V) -> bool {
        match self.entries.get_mut(key) {
            Some(existing) => match V::from_value_mut(existing) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => {
                    tracing::trace!(
                        key,
                        existing = %existing.type_tag(),
                        requested = %V::TYPE_TAG,
                        "try_set type conflict"
                    );
                    false
                }
            },
            None => {
                self.entries.insert(key.to_owned(), value.into_value());
                true
            }
        }
    }

    /// Store `value`, replacing whatever `key` held, of any type.
    pub fn set<V: DictionaryValue>(&mut self, key: &str, value: V) -> &V {
        let slot = match self.entries.entry(key.to_owned()) {
            btree_map::Entry::Occupied(mut e) => {
                e.insert(value.into_value());
                e.into_mut()
            }
            btree_map::Entry::Vacant(e) => e.insert(value.into_value()),
        };
        match V::from_value(slot) {
            Some(v) => v,
            None => unreachable!("{} stored as {}", V::TYPE_TAG, slot.type_tag()),
        }
    }

    /// Store an untyped value, replacing whatever `key` held.
    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Copy of the value at `key` if it is of type `V`.
    pub fn try_get<V: DictionaryValue>(&self, key: &str) -> Option<V> {
        self.get_ref::<V>(key).cloned()
    }

    /// Copy of the value at `key`, or `V::default()` if it is absent or of
    /// another type.
    pub fn get<V: DictionaryValue>(&self, key: &str) -> V {
        self.try_get(key).unwrap_or_default()
    }

    /// Borrow the value at `key` if it is of type `V`.
    pub fn get_ref<V: DictionaryValue>(&self, key: &str) -> Option<&V> {
        self.entries.get(key).and_then(V::from_value)
    }

    /// Mutably borrow the value at `key` if it is of type `V`.
    pub fn get_mut<V: DictionaryValue>(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key).and_then(V::from_value_mut)
    }

    // === Removal ===

    /// Remove `key`. Returns `true` if it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry. Metadata is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // === Merge ===

    /// Deep-copy `src[src_key]` into `self[dst_key]`, replacing any existing
    /// entry. Returns `false` if `src` has no such key.
    pub fn copy_value(&mut self, dst_key: &str, src: &Dictionary, src_key: &str) -> bool {
        match src.entries.get(src_key) {
            Some(v) => {
                self.entries.insert(dst_key.to_owned(), v.clone());
                true
            }
            None => false,
        }
    }

    /// Deep-copy every entry of `src`, replacing same-named entries.
    pub fn copy_values(&mut self, src: &Dictionary) {
        for (k, v) in &src.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    // === Persistence ===

    /// Write the dictionary as one frame.
    ///
    /// Entry and dictionary frames are closed even when a payload write
    /// fails; the first error is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %self.name, entries = self.entries.len()))]
    pub fn write(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.begin_write_dictionary(&DICTIONARY_FORMAT_ID, self.version, &self.name)?;
        let body = self.write_entries(ar);
        let end = ar.end_write_dictionary();
        body.and(end)
    }

    fn write_entries(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        for (key, value) in &self.entries {
            ar.begin_write_entry(value.type_tag().wire(), key)?;
            let payload = value.write(ar);
            let end = ar.end_write_entry();
            if let Err(e) = &payload {
                tracing::debug!(key = key.as_str(), tag = %value.type_tag(), error = %e, "entry write failed");
            }
            payload.and(end)?;
        }
        Ok(())
    }

    /// Replace this dictionary with one read from `ar`.
    ///
    /// Entries whose type code this build does not know are skipped. On
    /// error `self` is left exactly as it was.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn read(&mut self, ar: &mut dyn ArchiveRead) -> Result<()> {
        let header = ar.begin_read_dictionary(&DICTIONARY_FORMAT_ID)?;
        let mut fresh = Dictionary::with_name(header.name, header.version);
        let body = fresh.read_entries(ar);
        let end = ar.end_read_dictionary();
        body.and(end)?;

        tracing::debug!(name = %fresh.name, version = fresh.version, entries = fresh.len(), "read dictionary");
        *self = fresh;
        Ok(())
    }

    /// Read a dictionary from `ar` into a new instance.
    pub fn read_from(ar: &mut dyn ArchiveRead) -> Result<Self> {
        let mut dict = Self::new();
        dict.read(ar)?;
        Ok(dict)
    }

    fn read_entries(&mut self, ar: &mut dyn ArchiveRead) -> Result<()> {
        loop {
            let (type_code, key) = match ar.begin_read_entry()? {
                EntryHeader::More { type_code, key } => (type_code, key),
                EntryHeader::Done => return Ok(()),
            };

            let Some(mut value) = Value::from_wire_code(type_code) else {
                tracing::warn!(type_code, key = key.as_str(), "skipping entry of unknown type");
                ar.end_read_entry()?;
                continue;
            };

            let payload = value.read(ar);
            let end = ar.end_read_entry();
            payload.and(end)?;
            tracing::trace!(key = key.as_str(), tag = %value.type_tag(), "read entry");
            self.entries.insert(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ChunkReader, ChunkWriter};
    use crate::util::{Point3d, Vector3d};

    #[test]
    fn test_try_set_type_stability() {
        let mut d = Dictionary::new();
        assert!(d.try_set("k", 5i32));
        assert!(d.try_set("k", 6i32));
        assert!(!d.try_set("k", 7i64));
        assert!(!d.try_set("k", "seven".to_string()));
        assert_eq!(d.get::<i32>("k"), 6);
        assert_eq!(d.type_tag("k"), Some(TypeTag::I32));
    }

    #[test]
    fn test_set_replaces_type() {
        let mut d = Dictionary::new();
        d.set("k", 5i32);
        let stored = d.set("k", String::from("five"));
        assert_eq!(stored, "five");
        assert_eq!(d.try_get::<i32>("k"), None);
        assert_eq!(d.get::<String>("k"), "five");
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_get_never_coerces() {
        let mut d = Dictionary::new();
        d.set("n", 42i32);
        d.set("p", Point3d::new(1.0, 2.0, 3.0));

        assert_eq!(d.try_get::<i32>("n"), Some(42));
        assert_eq!(d.try_get::<i64>("n"), None);
        assert_eq!(d.try_get::<u32>("n"), None);
        assert_eq!(d.try_get::<f64>("n"), None);
        assert_eq!(d.get::<i64>("n"), 0);
        assert_eq!(d.try_get::<Vector3d>("p"), None);
        assert_eq!(d.try_get::<i32>("missing"), None);
    }

    #[test]
    fn test_keys_case_sensitive() {
        let mut d = Dictionary::new();
        d.set("Key", true);
        assert!(d.contains("Key"));
        assert!(!d.contains("key"));
        assert!(!d.get::<bool>("KEY"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut d = Dictionary::with_name("d", 1);
        d.set("a", 1u8);
        d.set("b", 2u8);
        assert!(d.remove("a"));
        assert!(!d.remove("a"));
        assert_eq!(d.keys(), vec!["b".to_string()]);

        d.clear();
        assert!(d.keys().is_empty());
        d.clear();
        assert!(d.keys().is_empty());
        assert_eq!(d.name(), "d");
    }

    #[test]
    fn test_deep_copy_independence() {
        let mut inner = Dictionary::with_name("inner", 1);
        inner.set("depth", 1i32);
        let mut d1 = Dictionary::new();
        d1.set("child", inner);
        d1.set("list", vec![1.0f64, 2.0]);

        let mut d2 = d1.clone();
        d2.get_mut::<Dictionary>("child").unwrap().set("depth", 2i32);
        d2.get_mut::<Vec<f64>>("list").unwrap().push(3.0);

        assert_eq!(d1.get::<Dictionary>("child").get::<i32>("depth"), 1);
        assert_eq!(d1.get::<Vec<f64>>("list"), vec![1.0, 2.0]);
        assert_eq!(d2.get::<Dictionary>("child").get::<i32>("depth"), 2);

        d1.get_mut::<Dictionary>("child").unwrap().set("extra", true);
        assert!(!d2.get::<Dictionary>("child").contains("extra"));
    }

    #[test]
    fn test_copy_value_and_values() {
        let mut src = Dictionary::new();
        src.set("a", 1i32);
        src.set("b", String::from("bee"));

        let mut dst = Dictionary::new();
        dst.set("b", 99u64);
        assert!(dst.copy_value("renamed", &src, "a"));
        assert!(!dst.copy_value("x", &src, "missing"));
        assert_eq!(dst.get::<i32>("renamed"), 1);

        dst.copy_values(&src);
        assert_eq!(dst.get::<String>("b"), "bee");
        assert_eq!(dst.len(), 3);

        src.set("a", 2i32);
        assert_eq!(dst.get::<i32>("a"), 1);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let mut d = Dictionary::with_name("opts", 3);
        d.set("enabled", true);
        d.set("scale", 2.5f64);
        d.set("tags", vec!["a".to_string(), "b".to_string()]);

        let mut w = ChunkWriter::memory();
        d.write(&mut w).unwrap();
        let bytes = w.into_bytes().unwrap();

        let back = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes)).unwrap();
        assert_eq!(back.version(), 3);
        assert_eq!(back.name(), "opts");
        assert!(back.get::<bool>("enabled"));
        assert_eq!(back.get::<f64>("scale"), 2.5);
        assert_eq!(back.get::<Vec<String>>("tags"), vec!["a", "b"]);
        assert_eq!(back, d);
    }

    #[test]
    fn test_empty_dictionary_roundtrip() {
        let d = Dictionary::new();
        let mut w = ChunkWriter::memory();
        d.write(&mut w).unwrap();
        let bytes = w.into_bytes().unwrap();

        let mut back = Dictionary::with_name("stale", 9);
        back.set("stale", 1i32);
        back.read(&mut ChunkReader::from_bytes(&bytes)).unwrap();
        assert_eq!(back, d);
    }
}
