//! Math type re-exports and the fixed-size payload types stored in dictionaries.
//!
//! Points and vectors share a `glam` representation, so each gets its own
//! transparent newtype: the dictionary binds every Rust type to exactly one
//! type tag, and a `Point3d` must never be readable as a `Vector3d`.

pub use glam::{DVec2, DVec3, DVec4};

use bytemuck::{Pod, Zeroable};
use std::fmt;

macro_rules! define_tuple {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Origin / zero value.
            pub const ZERO: Self = Self(<$inner>::ZERO);
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(v: $inner) -> Self {
                Self(v)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = $inner;

            #[inline]
            fn deref(&self) -> &$inner {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{:?}", stringify!($name), self.0.to_array())
            }
        }
    };
}

define_tuple!(
    /// Location in 2D space.
    Point2d, DVec2
);
define_tuple!(
    /// Location in 3D space.
    Point3d, DVec3
);
define_tuple!(
    /// Homogeneous (rational) 3D location: x, y, z, w.
    Point4d, DVec4
);
define_tuple!(
    /// Direction/displacement in 2D space.
    Vector2d, DVec2
);
define_tuple!(
    /// Direction/displacement in 3D space.
    Vector3d, DVec3
);

impl Point2d {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }
}

impl Point3d {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }
}

impl Point4d {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self(DVec4::new(x, y, z, w))
    }

    /// Euclidean point (x/w, y/w, z/w). `None` when the weight is zero.
    pub fn euclidean(&self) -> Option<Point3d> {
        if self.0.w == 0.0 {
            None
        } else {
            Some(Point3d(self.0.truncate() / self.0.w))
        }
    }
}

impl Vector2d {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }
}

impl Vector3d {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }
}

/// Integer rectangle in screen/window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// Integer 2D size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

impl Size {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// True when either extent is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.cx == 0 || self.cy == 0
    }
}

/// 3D bounding box with double precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3d {
    pub min: DVec3,
    pub max: DVec3,
}

impl BBox3d {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Option<Self> {
        let mut b = Self::EMPTY;
        for p in points {
            b.expand_by_point(p.0);
        }
        (!b.is_empty()).then_some(b)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn expand_by_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

impl Default for BBox3d {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3d({:?} - {:?})", self.min, self.max)
    }
}
