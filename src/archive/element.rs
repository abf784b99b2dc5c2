//! Homogeneous, length-prefixed arrays.
//!
//! An array is a `u32` element count followed by each element written with
//! its scalar codec.

use uuid::Uuid;

use super::{ArchiveRead, ArchiveWrite};
use crate::util::{Point3d, Result};

/// Types that can be stored as array elements.
pub trait ArchiveElement: Sized {
    fn write_element(&self, ar: &mut dyn ArchiveWrite) -> Result<()>;
    fn read_element(ar: &mut dyn ArchiveRead) -> Result<Self>;
}

macro_rules! impl_element {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl ArchiveElement for $ty {
                #[inline]
                fn write_element(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
                    ar.$write(*self)
                }

                #[inline]
                fn read_element(ar: &mut dyn ArchiveRead) -> Result<Self> {
                    ar.$read()
                }
            }
        )*
    };
}

impl_element! {
    bool => write_bool, read_bool;
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
}

impl ArchiveElement for Uuid {
    fn write_element(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.write_uuid(self)
    }

    fn read_element(ar: &mut dyn ArchiveRead) -> Result<Self> {
        ar.read_uuid()
    }
}

impl ArchiveElement for String {
    fn write_element(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.write_string(self)
    }

    fn read_element(ar: &mut dyn ArchiveRead) -> Result<Self> {
        ar.read_string()
    }
}

impl ArchiveElement for Point3d {
    fn write_element(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.write_point3d(self)
    }

    fn read_element(ar: &mut dyn ArchiveRead) -> Result<Self> {
        ar.read_point3d()
    }
}

/// Write `items` as a length-prefixed array.
pub fn write_array<T: ArchiveElement>(ar: &mut dyn ArchiveWrite, items: &[T]) -> Result<()> {
    ar.write_array_len(items.len())?;
    for item in items {
        item.write_element(ar)?;
    }
    Ok(())
}

/// Read a length-prefixed array.
pub fn read_array<T: ArchiveElement>(ar: &mut dyn ArchiveRead) -> Result<Vec<T>> {
    let len = ar.read_array_len()?;
    // The count is untrusted until the elements actually arrive.
    let mut items = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        items.push(T::read_element(ar)?);
    }
    Ok(items)
}
