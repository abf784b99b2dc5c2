//! Dictionary values.
//!
//! [`Value`] is the closed set of everything a dictionary can hold. Each
//! variant owns its payload; cloning a value deep-copies it, including nested
//! dictionaries.

use uuid::Uuid;

use super::{Dictionary, TypeTag};
use crate::archive::{read_array, write_array, ArchiveRead, ArchiveWrite};
use crate::geom::{Geometry, MeshParameters, OpaqueObject};
use crate::util::{Color, Point2d, Point3d, Point4d, Rect, Result, Size, Vector2d, Vector3d};

/// A dictionary value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Float(f32),
    Double(f64),
    Uuid(Uuid),
    String(String),
    BoolArray(Vec<bool>),
    U8Array(Vec<u8>),
    I8Array(Vec<i8>),
    U16Array(Vec<u16>),
    I16Array(Vec<i16>),
    U32Array(Vec<u32>),
    I32Array(Vec<i32>),
    U64Array(Vec<u64>),
    I64Array(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    UuidArray(Vec<Uuid>),
    StringArray(Vec<String>),
    Color(Color),
    Point2d(Point2d),
    Point3d(Point3d),
    Point4d(Point4d),
    Vector2d(Vector2d),
    Vector3d(Vector3d),
    Rect(Rect),
    Size(Size),
    Dictionary(Dictionary),
    Object(OpaqueObject),
    MeshParameters(MeshParameters),
    Geometry(Geometry),
}

impl Value {
    /// Tag of this value's concrete type.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Bool(_) => TypeTag::Bool,
            Self::U8(_) => TypeTag::U8,
            Self::I8(_) => TypeTag::I8,
            Self::U16(_) => TypeTag::U16,
            Self::I16(_) => TypeTag::I16,
            Self::U32(_) => TypeTag::U32,
            Self::I32(_) => TypeTag::I32,
            Self::U64(_) => TypeTag::U64,
            Self::I64(_) => TypeTag::I64,
            Self::Float(_) => TypeTag::Float,
            Self::Double(_) => TypeTag::Double,
            Self::Uuid(_) => TypeTag::Uuid,
            Self::String(_) => TypeTag::String,
            Self::BoolArray(_) => TypeTag::BoolArray,
            Self::U8Array(_) => TypeTag::U8Array,
            Self::I8Array(_) => TypeTag::I8Array,
            Self::U16Array(_) => TypeTag::U16Array,
            Self::I16Array(_) => TypeTag::I16Array,
            Self::U32Array(_) => TypeTag::U32Array,
            Self::I32Array(_) => TypeTag::I32Array,
            Self::U64Array(_) => TypeTag::U64Array,
            Self::I64Array(_) => TypeTag::I64Array,
            Self::FloatArray(_) => TypeTag::FloatArray,
            Self::DoubleArray(_) => TypeTag::DoubleArray,
            Self::UuidArray(_) => TypeTag::UuidArray,
            Self::StringArray(_) => TypeTag::StringArray,
            Self::Color(_) => TypeTag::Color,
            Self::Point2d(_) => TypeTag::Point2d,
            Self::Point3d(_) => TypeTag::Point3d,
            Self::Point4d(_) => TypeTag::Point4d,
            Self::Vector2d(_) => TypeTag::Vector2d,
            Self::Vector3d(_) => TypeTag::Vector3d,
            Self::Rect(_) => TypeTag::Rect,
            Self::Size(_) => TypeTag::Size,
            Self::Dictionary(_) => TypeTag::Dictionary,
            Self::Object(_) => TypeTag::Object,
            Self::MeshParameters(_) => TypeTag::MeshParameters,
            Self::Geometry(_) => TypeTag::Geometry,
        }
    }

    /// Zero-valued instance of the type identified by `tag`, ready to
    /// [`read`](Self::read) into. `None` if this build cannot hold the type.
    pub fn create_empty(tag: TypeTag) -> Option<Self> {
        Some(match tag {
            TypeTag::Bool => Self::Bool(false),
            TypeTag::U8 => Self::U8(0),
            TypeTag::I8 => Self::I8(0),
            TypeTag::U16 => Self::U16(0),
            TypeTag::I16 => Self::I16(0),
            TypeTag::U32 => Self::U32(0),
            TypeTag::I32 => Self::I32(0),
            TypeTag::U64 => Self::U64(0),
            TypeTag::I64 => Self::I64(0),
            TypeTag::Float => Self::Float(0.0),
            TypeTag::Double => Self::Double(0.0),
            TypeTag::Uuid => Self::Uuid(Uuid::nil()),
            TypeTag::String => Self::String(String::new()),
            TypeTag::BoolArray => Self::BoolArray(Vec::new()),
            TypeTag::U8Array => Self::U8Array(Vec::new()),
            TypeTag::I8Array => Self::I8Array(Vec::new()),
            TypeTag::U16Array => Self::U16Array(Vec::new()),
            TypeTag::I16Array => Self::I16Array(Vec::new()),
            TypeTag::U32Array => Self::U32Array(Vec::new()),
            TypeTag::I32Array => Self::I32Array(Vec::new()),
            TypeTag::U64Array => Self::U64Array(Vec::new()),
            TypeTag::I64Array => Self::I64Array(Vec::new()),
            TypeTag::FloatArray => Self::FloatArray(Vec::new()),
            TypeTag::DoubleArray => Self::DoubleArray(Vec::new()),
            TypeTag::UuidArray => Self::UuidArray(Vec::new()),
            TypeTag::StringArray => Self::StringArray(Vec::new()),
            TypeTag::Color => Self::Color(Color::default()),
            TypeTag::Point2d => Self::Point2d(Point2d::ZERO),
            TypeTag::Point3d => Self::Point3d(Point3d::ZERO),
            TypeTag::Point4d => Self::Point4d(Point4d::ZERO),
            TypeTag::Vector2d => Self::Vector2d(Vector2d::ZERO),
            TypeTag::Vector3d => Self::Vector3d(Vector3d::ZERO),
            TypeTag::Rect => Self::Rect(Rect::default()),
            TypeTag::Size => Self::Size(Size::default()),
            TypeTag::Dictionary => Self::Dictionary(Dictionary::new()),
            TypeTag::Object => Self::Object(OpaqueObject::default()),
            TypeTag::MeshParameters => Self::MeshParameters(MeshParameters::default()),
            TypeTag::Geometry => Self::Geometry(Geometry::default()),
        })
    }

    /// Empty value for a wire type code. `None` for unknown or future codes,
    /// which readers skip.
    pub fn from_wire_code(code: u32) -> Option<Self> {
        TypeTag::from_wire(code).and_then(Self::create_empty)
    }

    /// Write the payload only. The type code and key belong to the entry
    /// frame written by the caller.
    pub fn write(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        match self {
            Self::Bool(v) => ar.write_bool(*v),
            Self::U8(v) => ar.write_u8(*v),
            Self::I8(v) => ar.write_i8(*v),
            Self::U16(v) => ar.write_u16(*v),
            Self::I16(v) => ar.write_i16(*v),
            Self::U32(v) => ar.write_u32(*v),
            Self::I32(v) => ar.write_i32(*v),
            Self::U64(v) => ar.write_u64(*v),
            Self::I64(v) => ar.write_i64(*v),
            Self::Float(v) => ar.write_f32(*v),
            Self::Double(v) => ar.write_f64(*v),
            Self::Uuid(v) => ar.write_uuid(v),
            Self::String(v) => ar.write_string(v),
            Self::BoolArray(v) => write_array(ar, v),
            Self::U8Array(v) => write_array(ar, v),
            Self::I8Array(v) => write_array(ar, v),
            Self::U16Array(v) => write_array(ar, v),
            Self::I16Array(v) => write_array(ar, v),
            Self::U32Array(v) => write_array(ar, v),
            Self::I32Array(v) => write_array(ar, v),
            Self::U64Array(v) => write_array(ar, v),
            Self::I64Array(v) => write_array(ar, v),
            Self::FloatArray(v) => write_array(ar, v),
            Self::DoubleArray(v) => write_array(ar, v),
            Self::UuidArray(v) => write_array(ar, v),
            Self::StringArray(v) => write_array(ar, v),
            Self::Color(v) => ar.write_color(*v),
            Self::Point2d(v) => ar.write_point2d(v),
            Self::Point3d(v) => ar.write_point3d(v),
            Self::Point4d(v) => ar.write_point4d(v),
            Self::Vector2d(v) => ar.write_vector2d(v),
            Self::Vector3d(v) => ar.write_vector3d(v),
            Self::Rect(v) => ar.write_rect(v),
            Self::Size(v) => ar.write_size(v),
            Self::Dictionary(v) => v.write(ar),
            Self::Object(v) => v.write(ar),
            Self::MeshParameters(v) => v.write(ar),
            Self::Geometry(v) => v.write(ar),
        }
    }

    /// Read the payload into this value, keeping its variant.
    pub fn read(&mut self, ar: &mut dyn ArchiveRead) -> Result<()> {
        match self {
            Self::Bool(v) => *v = ar.read_bool()?,
            Self::U8(v) => *v = ar.read_u8()?,
            Self::I8(v) => *v = ar.read_i8()?,
            Self::U16(v) => *v = ar.read_u16()?,
            Self::I16(v) => *v = ar.read_i16()?,
            Self::U32(v) => *v = ar.read_u32()?,
            Self::I32(v) => *v = ar.read_i32()?,
            Self::U64(v) => *v = ar.read_u64()?,
            Self::I64(v) => *v = ar.read_i64()?,
            Self::Float(v) => *v = ar.read_f32()?,
            Self::Double(v) => *v = ar.read_f64()?,
            Self::Uuid(v) => *v = ar.read_uuid()?,
            Self::String(v) => *v = ar.read_string()?,
            Self::BoolArray(v) => *v = read_array(ar)?,
            Self::U8Array(v) => *v = read_array(ar)?,
            Self::I8Array(v) => *v = read_array(ar)?,
            Self::U16Array(v) => *v = read_array(ar)?,
            Self::I16Array(v) => *v = read_array(ar)?,
            Self::U32Array(v) => *v = read_array(ar)?,
            Self::I32Array(v) => *v = read_array(ar)?,
            Self::U64Array(v) => *v = read_array(ar)?,
            Self::I64Array(v) => *v = read_array(ar)?,
            Self::FloatArray(v) => *v = read_array(ar)?,
            Self::DoubleArray(v) => *v = read_array(ar)?,
            Self::UuidArray(v) => *v = read_array(ar)?,
            Self::StringArray(v) => *v = read_array(ar)?,
            Self::Color(v) => *v = ar.read_color()?,
            Self::Point2d(v) => *v = ar.read_point2d()?,
            Self::Point3d(v) => *v = ar.read_point3d()?,
            Self::Point4d(v) => *v = ar.read_point4d()?,
            Self::Vector2d(v) => *v = ar.read_vector2d()?,
            Self::Vector3d(v) => *v = ar.read_vector3d()?,
            Self::Rect(v) => *v = ar.read_rect()?,
            Self::Size(v) => *v = ar.read_size()?,
            Self::Dictionary(v) => v.read(ar)?,
            Self::Object(v) => v.read(ar)?,
            Self::MeshParameters(v) => v.read(ar)?,
            Self::Geometry(v) => v.read(ar)?,
        }
        Ok(())
    }

    /// Name of this value's type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }
}
