//! Integration tests for writing dictionaries and reading them back.

use threedm::archive::{
    ArchiveRead, ArchiveWrite, ChunkReader, ChunkWriter, ReadLimits, DICTIONARY_FORMAT_ID,
};
use threedm::geom::{Geometry, MeshParameters, OpaqueObject};
use threedm::util::{Color, Point2d, Point3d, Point4d, Rect, Size, Vector2d, Vector3d};
use threedm::{Dictionary, Error, Result, TypeTag};

use tempfile::NamedTempFile;
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn to_bytes(d: &Dictionary) -> Vec<u8> {
    let mut w = ChunkWriter::memory();
    d.write(&mut w).expect("write failed");
    w.into_bytes().expect("finish failed")
}

fn sample_dictionary() -> Dictionary {
    let mut d = Dictionary::with_name("sample", 7);
    d.set("flag", true);
    d.set("u8", 8u8);
    d.set("i8", -8i8);
    d.set("u16", 16u16);
    d.set("i16", -16i16);
    d.set("u32", 32u32);
    d.set("i32", -32i32);
    d.set("u64", 64u64);
    d.set("i64", -64i64);
    d.set("float", 0.5f32);
    d.set("double", 1.0f64 / 3.0);
    d.set("id", Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0));
    d.set("text", String::from("layer \"Walls\""));
    d.set("flags", vec![true, false]);
    d.set("bytes", vec![1u8, 2, 3]);
    d.set("i8s", vec![-1i8, 1]);
    d.set("u16s", vec![1u16, 65535]);
    d.set("i16s", vec![-2i16]);
    d.set("u32s", vec![0u32, u32::MAX]);
    d.set("i32s", vec![i32::MIN, i32::MAX]);
    d.set("u64s", vec![u64::MAX]);
    d.set("i64s", Vec::<i64>::new());
    d.set("floats", vec![1.25f32]);
    d.set("doubles", vec![0.1f64, 0.2, 0.3]);
    d.set("ids", vec![Uuid::nil(), Uuid::from_u128(99)]);
    d.set("names", vec!["front".to_string(), "top".to_string()]);
    d.set("color", Color::rgba(10, 20, 30, 128));
    d.set("p2", Point2d::new(1.0, -1.0));
    d.set("p3", Point3d::new(1.0, 2.0, 3.0));
    d.set("p4", Point4d::new(1.0, 2.0, 3.0, 4.0));
    d.set("v2", Vector2d::new(0.0, 1.0));
    d.set("v3", Vector3d::new(0.0, 0.0, -1.0));
    d.set("rect", Rect::new(-5, -5, 5, 5));
    d.set("size", Size::new(800, 600));
    d.set("object", OpaqueObject::new(Uuid::from_u128(5), vec![9, 8, 7]));
    d.set("mesh", MeshParameters::fast_render());
    d.set("geometry", Geometry::Line { from: Point3d::ZERO, to: Point3d::new(1.0, 1.0, 1.0) });

    let mut child = Dictionary::with_name("child", 1);
    child.set("answer", 42i32);
    let mut grandchild = Dictionary::with_name("grandchild", 2);
    grandchild.set("leaf", String::from("deep"));
    child.set("grandchild", grandchild);
    d.set("child", child);
    d
}

#[test]
fn test_end_to_end_options() {
    init_tracing();

    let mut d = Dictionary::with_name("opts", 3);
    d.set("enabled", true);
    d.set("scale", 2.5f64);
    d.set("tags", vec!["a".to_string(), "b".to_string()]);

    let bytes = to_bytes(&d);
    let mut back = Dictionary::new();
    back.read(&mut ChunkReader::from_bytes(&bytes)).expect("read failed");

    assert_eq!(back.version(), 3);
    assert_eq!(back.name(), "opts");
    assert!(back.get::<bool>("enabled"));
    assert_eq!(back.get::<f64>("scale"), 2.5);
    assert_eq!(back.get::<Vec<String>>("tags"), vec!["a", "b"]);
}

#[test]
fn test_every_type_roundtrips() {
    init_tracing();

    let d = sample_dictionary();
    assert_eq!(d.len(), TypeTag::ALL.len());

    let bytes = to_bytes(&d);
    let mut r = ChunkReader::from_bytes(&bytes);
    let back = Dictionary::read_from(&mut r).expect("read failed");

    assert_eq!(r.pos(), bytes.len() as u64);
    assert_eq!(back, d);
    for key in d.keys() {
        assert_eq!(back.type_tag(&key), d.type_tag(&key), "type of {key}");
    }
    assert_eq!(
        back.get::<Dictionary>("child")
            .get::<Dictionary>("grandchild")
            .get::<String>("leaf"),
        "deep"
    );
}

#[test]
fn test_unknown_type_is_skipped() {
    init_tracing();

    let mut w = ChunkWriter::memory();
    w.begin_write_dictionary(&DICTIONARY_FORMAT_ID, 1, "future").unwrap();

    w.begin_write_entry(TypeTag::I32.wire(), "a").unwrap();
    w.write_i32(1).unwrap();
    w.end_write_entry().unwrap();

    w.begin_write_entry(9999, "b").unwrap();
    w.write_string("payload nobody here understands").unwrap();
    w.write_f64(6.02e23).unwrap();
    w.end_write_entry().unwrap();

    w.begin_write_entry(TypeTag::String.wire(), "c").unwrap();
    w.write_string("sea").unwrap();
    w.end_write_entry().unwrap();

    w.end_write_dictionary().unwrap();

    // A second dictionary follows in the same stream.
    let mut next = Dictionary::with_name("next", 2);
    next.set("after", true);
    next.write(&mut w).unwrap();
    w.write_u32(0xC0FFEE).unwrap();
    let bytes = w.into_bytes().unwrap();

    let mut r = ChunkReader::from_bytes(&bytes);
    let d = Dictionary::read_from(&mut r).expect("unknown entry must not fail the read");

    assert_eq!(d.keys(), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(d.get::<i32>("a"), 1);
    assert_eq!(d.get::<String>("c"), "sea");
    assert!(!d.contains("b"));

    let second = Dictionary::read_from(&mut r).expect("stream misaligned after skip");
    assert_eq!(second, next);
    assert_eq!(r.read_u32().unwrap(), 0xC0FFEE);
    assert_eq!(r.pos(), bytes.len() as u64);
}

#[test]
fn test_newer_payload_tail_is_skipped() {
    let mut w = ChunkWriter::memory();
    w.begin_write_dictionary(&DICTIONARY_FORMAT_ID, 0, "").unwrap();
    w.begin_write_entry(TypeTag::MeshParameters.wire(), "mesh").unwrap();
    MeshParameters::default().write(&mut w).unwrap();
    // fields a newer writer appended
    w.write_u64(0xDEAD_BEEF).unwrap();
    w.write_string("new field").unwrap();
    w.end_write_entry().unwrap();
    w.begin_write_entry(TypeTag::Bool.wire(), "ok").unwrap();
    w.write_bool(true).unwrap();
    w.end_write_entry().unwrap();
    w.end_write_dictionary().unwrap();
    let bytes = w.into_bytes().unwrap();

    let d = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes)).unwrap();
    assert_eq!(d.get::<MeshParameters>("mesh"), MeshParameters::default());
    assert!(d.get::<bool>("ok"));
}

#[test]
fn test_format_mismatch_leaves_target_unchanged() {
    let other_format = Uuid::from_u128(0x0bad_f00d);
    let mut w = ChunkWriter::memory();
    w.begin_write_dictionary(&other_format, 1, "foreign").unwrap();
    w.end_write_dictionary().unwrap();
    let bytes = w.into_bytes().unwrap();

    let mut target = Dictionary::with_name("mine", 4);
    target.set("keep", 1i32);
    let before = target.clone();

    let mut r = ChunkReader::from_bytes(&bytes);
    let err = target.read(&mut r).unwrap_err();
    match err {
        Error::FormatMismatch { expected, found } => {
            assert_eq!(expected, DICTIONARY_FORMAT_ID);
            assert_eq!(found, other_format);
        }
        other => panic!("expected FormatMismatch, got {other:?}"),
    }
    assert_eq!(target, before);
    // position restored to before the frame
    assert_eq!(r.pos(), 0);
    assert_eq!(r.depth(), 0);
}

#[test]
fn test_truncated_stream_leaves_target_unchanged() {
    let bytes = to_bytes(&sample_dictionary());

    for cut in [1usize, 5, 13, bytes.len() / 2, bytes.len() - 1] {
        let mut target = Dictionary::with_name("mine", 4);
        target.set("keep", 1i32);
        let before = target.clone();

        let err = target
            .read(&mut ChunkReader::from_bytes(&bytes[..bytes.len() - cut]))
            .unwrap_err();
        assert!(err.is_archive_io(), "cut {cut}: {err}");
        assert_eq!(target, before, "cut {cut}");
    }
}

#[test]
fn test_bad_payload_fails_but_keeps_stream_aligned() {
    let mut w = ChunkWriter::memory();
    w.begin_write_dictionary(&DICTIONARY_FORMAT_ID, 1, "bad").unwrap();
    w.begin_write_entry(TypeTag::Geometry.wire(), "g").unwrap();
    w.write_u8(77).unwrap(); // no such geometry kind
    w.end_write_entry().unwrap();
    w.end_write_dictionary().unwrap();
    w.write_u32(0xFACE).unwrap();
    let bytes = w.into_bytes().unwrap();

    let mut target = Dictionary::new();
    target.set("keep", true);
    let mut r = ChunkReader::from_bytes(&bytes);
    let err = target.read(&mut r).unwrap_err();

    assert!(matches!(err, Error::InvalidValue(_)));
    assert!(target.get::<bool>("keep"));
    assert_eq!(target.len(), 1);
    assert_eq!(r.read_u32().unwrap(), 0xFACE);
}

#[test]
fn test_read_limits() {
    let mut d = Dictionary::new();
    d.set("long", "x".repeat(100));
    d.set("many", vec![0u8; 100]);
    let bytes = to_bytes(&d);

    let strict = ReadLimits { max_string_len: 10, ..ReadLimits::default() };
    let err = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes).with_limits(strict)).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded { what: "string length", .. }));

    let strict = ReadLimits { max_array_len: 10, ..ReadLimits::default() };
    let err = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes).with_limits(strict)).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded { what: "array length", .. }));

    assert_eq!(Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes)).unwrap(), d);
}

#[test]
fn test_nesting_depth_limit() {
    let mut d = Dictionary::new();
    for level in 0..10 {
        let mut parent = Dictionary::new();
        parent.set("level", level as i32);
        parent.set("child", d);
        d = parent;
    }
    let bytes = to_bytes(&d);

    let shallow = ReadLimits { max_chunk_depth: 8, ..ReadLimits::default() };
    let err = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes).with_limits(shallow)).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded { what: "chunk depth", .. }));

    let back = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes)).unwrap();
    assert_eq!(back.get::<i32>("level"), 9);
    assert_eq!(back, d);
}

#[test]
fn test_file_roundtrip() {
    init_tracing();

    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp.path();
    let d = sample_dictionary();

    {
        let mut w = ChunkWriter::create(path).expect("Failed to create archive");
        d.write(&mut w).expect("Failed to write dictionary");
        w.finish().expect("Failed to finish archive");
    }

    let mut r = ChunkReader::open(path).expect("Failed to open archive");
    let back = Dictionary::read_from(&mut r).expect("Failed to read dictionary");
    assert_eq!(back, d);
}

#[test]
fn test_read_then_write_is_stable() {
    let bytes = to_bytes(&sample_dictionary());
    let back = Dictionary::read_from(&mut ChunkReader::from_bytes(&bytes)).unwrap();
    assert_eq!(to_bytes(&back), bytes);
}

/// Archive that records frame calls and fails every `f64` write.
#[derive(Default)]
struct FailingArchive {
    events: Vec<String>,
}

impl FailingArchive {
    fn ok(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ArchiveWrite for FailingArchive {
    fn begin_write_dictionary(&mut self, _: &Uuid, _: u32, name: &str) -> Result<()> {
        self.events.push(format!("begin dict {name}"));
        Ok(())
    }
    fn end_write_dictionary(&mut self) -> Result<()> {
        self.events.push("end dict".into());
        Ok(())
    }
    fn begin_write_entry(&mut self, _: u32, key: &str) -> Result<()> {
        self.events.push(format!("begin entry {key}"));
        Ok(())
    }
    fn end_write_entry(&mut self) -> Result<()> {
        self.events.push("end entry".into());
        Ok(())
    }
    fn write_bool(&mut self, _: bool) -> Result<()> { self.ok() }
    fn write_u8(&mut self, _: u8) -> Result<()> { self.ok() }
    fn write_i8(&mut self, _: i8) -> Result<()> { self.ok() }
    fn write_u16(&mut self, _: u16) -> Result<()> { self.ok() }
    fn write_i16(&mut self, _: i16) -> Result<()> { self.ok() }
    fn write_u32(&mut self, _: u32) -> Result<()> { self.ok() }
    fn write_i32(&mut self, _: i32) -> Result<()> { self.ok() }
    fn write_u64(&mut self, _: u64) -> Result<()> { self.ok() }
    fn write_i64(&mut self, _: i64) -> Result<()> { self.ok() }
    fn write_f32(&mut self, _: f32) -> Result<()> { self.ok() }
    fn write_f64(&mut self, _: f64) -> Result<()> {
        Err(Error::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "disk gone")))
    }
    fn write_uuid(&mut self, _: &Uuid) -> Result<()> { self.ok() }
    fn write_string(&mut self, _: &str) -> Result<()> { self.ok() }
    fn write_bytes(&mut self, _: &[u8]) -> Result<()> { self.ok() }
}

#[test]
fn test_failed_write_still_closes_frames() {
    let mut d = Dictionary::with_name("d", 1);
    d.set("a", 1i32);
    d.set("b", 2.0f64);
    d.set("c", 3i32);

    let mut ar = FailingArchive::default();
    let err = d.write(&mut ar).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(
        ar.events,
        vec!["begin dict d", "begin entry a", "end entry", "begin entry b", "end entry", "end dict"]
    );
}
