//! Type tags - the stable wire vocabulary of dictionary entries.

use std::fmt;

/// Identifies the concrete type of a dictionary value on the wire.
///
/// Codes are append-only: a code, once shipped, is never removed or
/// renumbered, because every archive ever written with it depends on it.
/// Zero is reserved as invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum TypeTag {
    Bool = 1,
    U8 = 2,
    I8 = 3,
    U16 = 4,
    I16 = 5,
    U32 = 6,
    I32 = 7,
    U64 = 8,
    I64 = 9,
    Float = 10,
    Double = 11,
    Uuid = 12,
    String = 13,
    BoolArray = 14,
    U8Array = 15,
    I8Array = 16,
    U16Array = 17,
    I16Array = 18,
    U32Array = 19,
    I32Array = 20,
    U64Array = 21,
    I64Array = 22,
    FloatArray = 23,
    DoubleArray = 24,
    UuidArray = 25,
    StringArray = 26,
    Color = 27,
    Point2d = 28,
    Point3d = 29,
    Point4d = 30,
    Vector2d = 31,
    Vector3d = 32,
    Rect = 33,
    Size = 34,
    Dictionary = 35,
    Object = 36,
    MeshParameters = 37,
    Geometry = 38,
}

impl TypeTag {
    /// Every tag, in wire-code order.
    pub const ALL: [TypeTag; 38] = [
        Self::Bool,
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::Float,
        Self::Double,
        Self::Uuid,
        Self::String,
        Self::BoolArray,
        Self::U8Array,
        Self::I8Array,
        Self::U16Array,
        Self::I16Array,
        Self::U32Array,
        Self::I32Array,
        Self::U64Array,
        Self::I64Array,
        Self::FloatArray,
        Self::DoubleArray,
        Self::UuidArray,
        Self::StringArray,
        Self::Color,
        Self::Point2d,
        Self::Point3d,
        Self::Point4d,
        Self::Vector2d,
        Self::Vector3d,
        Self::Rect,
        Self::Size,
        Self::Dictionary,
        Self::Object,
        Self::MeshParameters,
        Self::Geometry,
    ];

    /// Wire integer of this tag.
    #[inline]
    pub const fn wire(self) -> u32 {
        self as u32
    }

    /// Tag for a wire integer, `None` for anything this build does not know
    /// (including codes added by newer writers).
    pub const fn from_wire(code: u32) -> Option<Self> {
        Some(match code {
            1 => Self::Bool,
            2 => Self::U8,
            3 => Self::I8,
            4 => Self::U16,
            5 => Self::I16,
            6 => Self::U32,
            7 => Self::I32,
            8 => Self::U64,
            9 => Self::I64,
            10 => Self::Float,
            11 => Self::Double,
            12 => Self::Uuid,
            13 => Self::String,
            14 => Self::BoolArray,
            15 => Self::U8Array,
            16 => Self::I8Array,
            17 => Self::U16Array,
            18 => Self::I16Array,
            19 => Self::U32Array,
            20 => Self::I32Array,
            21 => Self::U64Array,
            22 => Self::I64Array,
            23 => Self::FloatArray,
            24 => Self::DoubleArray,
            25 => Self::UuidArray,
            26 => Self::StringArray,
            27 => Self::Color,
            28 => Self::Point2d,
            29 => Self::Point3d,
            30 => Self::Point4d,
            31 => Self::Vector2d,
            32 => Self::Vector3d,
            33 => Self::Rect,
            34 => Self::Size,
            35 => Self::Dictionary,
            36 => Self::Object,
            37 => Self::MeshParameters,
            38 => Self::Geometry,
            _ => return None,
        })
    }

    /// Returns the name of this tag.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Uuid => "uuid",
            Self::String => "string",
            Self::BoolArray => "bool[]",
            Self::U8Array => "u8[]",
            Self::I8Array => "i8[]",
            Self::U16Array => "u16[]",
            Self::I16Array => "i16[]",
            Self::U32Array => "u32[]",
            Self::I32Array => "i32[]",
            Self::U64Array => "u64[]",
            Self::I64Array => "i64[]",
            Self::FloatArray => "float[]",
            Self::DoubleArray => "double[]",
            Self::UuidArray => "uuid[]",
            Self::StringArray => "string[]",
            Self::Color => "color",
            Self::Point2d => "point2d",
            Self::Point3d => "point3d",
            Self::Point4d => "point4d",
            Self::Vector2d => "vector2d",
            Self::Vector3d => "vector3d",
            Self::Rect => "rect",
            Self::Size => "size",
            Self::Dictionary => "dictionary",
            Self::Object => "object",
            Self::MeshParameters => "mesh_parameters",
            Self::Geometry => "geometry",
        }
    }

    /// Returns true for the homogeneous array tags.
    #[inline]
    pub const fn is_array(self) -> bool {
        let code = self as u32;
        code >= Self::BoolArray as u32 && code <= Self::StringArray as u32
    }

    /// Element tag of an array tag, `None` for non-array tags.
    pub const fn element(self) -> Option<Self> {
        if self.is_array() {
            Self::from_wire(self as u32 - (Self::BoolArray as u32 - Self::Bool as u32))
        } else {
            None
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<TypeTag> for u32 {
    #[inline]
    fn from(tag: TypeTag) -> Self {
        tag.wire()
    }
}
