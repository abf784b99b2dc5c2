//! Binding between Rust types and dictionary values.

use uuid::Uuid;

use super::{Dictionary, TypeTag, Value};
use crate::geom::{Geometry, MeshParameters, OpaqueObject};
use crate::util::{Color, Point2d, Point3d, Point4d, Rect, Size, Vector2d, Vector3d};

/// A Rust type that can be stored in a [`Dictionary`].
///
/// Each implementor maps to exactly one [`Value`] variant and one
/// [`TypeTag`]. Lookups never convert between types: an `i32` entry is not
/// readable as `i64`.
pub trait DictionaryValue: Clone + Default {
    /// Tag of the variant this type is stored as.
    const TYPE_TAG: TypeTag;

    /// Wrap into the matching variant.
    fn into_value(self) -> Value;

    /// Borrow the payload if `value` is this type's variant.
    fn from_value(value: &Value) -> Option<&Self>;

    /// Mutably borrow the payload if `value` is this type's variant.
    fn from_value_mut(value: &mut Value) -> Option<&mut Self>;
}

macro_rules! impl_dictionary_value {
    ($($ty:ty => $variant:ident;)*) => {
        $(
            impl DictionaryValue for $ty {
                const TYPE_TAG: TypeTag = TypeTag::$variant;

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn from_value(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                #[inline]
                fn from_value_mut(value: &mut Value) -> Option<&mut Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_dictionary_value! {
    bool => Bool;
    u8 => U8;
    i8 => I8;
    u16 => U16;
    i16 => I16;
    u32 => U32;
    i32 => I32;
    u64 => U64;
    i64 => I64;
    f32 => Float;
    f64 => Double;
    Uuid => Uuid;
    String => String;
    Vec<bool> => BoolArray;
    Vec<u8> => U8Array;
    Vec<i8> => I8Array;
    Vec<u16> => U16Array;
    Vec<i16> => I16Array;
    Vec<u32> => U32Array;
    Vec<i32> => I32Array;
    Vec<u64> => U64Array;
    Vec<i64> => I64Array;
    Vec<f32> => FloatArray;
    Vec<f64> => DoubleArray;
    Vec<Uuid> => UuidArray;
    Vec<String> => StringArray;
    Color => Color;
    Point2d => Point2d;
    Point3d => Point3d;
    Point4d => Point4d;
    Vector2d => Vector2d;
    Vector3d => Vector3d;
    Rect => Rect;
    Size => Size;
    Dictionary => Dictionary;
    OpaqueObject => Object;
    MeshParameters => MeshParameters;
    Geometry => Geometry;
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}
