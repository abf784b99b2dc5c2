//! Simple geometry records that can be stored in a dictionary.

use crate::archive::{read_array, write_array, ArchiveRead, ArchiveWrite};
use crate::util::{BBox3d, Error, Point3d, Result};

/// Wire codes of the geometry kinds. Append-only.
const KIND_POINT: u8 = 1;
const KIND_POINT_CLOUD: u8 = 2;
const KIND_LINE: u8 = 3;
const KIND_POLYLINE: u8 = 4;
const KIND_BOUNDING_BOX: u8 = 5;

/// A geometry record.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point3d),
    PointCloud(Vec<Point3d>),
    Line { from: Point3d, to: Point3d },
    Polyline(Vec<Point3d>),
    BoundingBox { min: Point3d, max: Point3d },
}

impl Geometry {
    /// Wire code of this kind.
    pub fn kind_code(&self) -> u8 {
        match self {
            Self::Point(_) => KIND_POINT,
            Self::PointCloud(_) => KIND_POINT_CLOUD,
            Self::Line { .. } => KIND_LINE,
            Self::Polyline(_) => KIND_POLYLINE,
            Self::BoundingBox { .. } => KIND_BOUNDING_BOX,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::PointCloud(_) => "PointCloud",
            Self::Line { .. } => "Line",
            Self::Polyline(_) => "Polyline",
            Self::BoundingBox { .. } => "BoundingBox",
        }
    }

    /// Axis-aligned bounds. `None` for an empty point cloud or polyline.
    pub fn bounding_box(&self) -> Option<BBox3d> {
        match self {
            Self::Point(p) => BBox3d::from_points([p]),
            Self::PointCloud(pts) | Self::Polyline(pts) => BBox3d::from_points(pts),
            Self::Line { from, to } => BBox3d::from_points([from, to]),
            Self::BoundingBox { min, max } => Some(BBox3d::new(min.0, max.0)),
        }
    }

    pub fn write(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.write_u8(self.kind_code())?;
        match self {
            Self::Point(p) => ar.write_point3d(p),
            Self::PointCloud(pts) | Self::Polyline(pts) => write_array(ar, pts),
            Self::Line { from, to } => {
                ar.write_point3d(from)?;
                ar.write_point3d(to)
            }
            Self::BoundingBox { min, max } => {
                ar.write_point3d(min)?;
                ar.write_point3d(max)
            }
        }
    }

    /// Read a record, replacing `self` whatever its current kind.
    pub fn read(&mut self, ar: &mut dyn ArchiveRead) -> Result<()> {
        *self = match ar.read_u8()? {
            KIND_POINT => Self::Point(ar.read_point3d()?),
            KIND_POINT_CLOUD => Self::PointCloud(read_array(ar)?),
            KIND_LINE => {
                let from = ar.read_point3d()?;
                let to = ar.read_point3d()?;
                Self::Line { from, to }
            }
            KIND_POLYLINE => Self::Polyline(read_array(ar)?),
            KIND_BOUNDING_BOX => {
                let min = ar.read_point3d()?;
                let max = ar.read_point3d()?;
                Self::BoundingBox { min, max }
            }
            other => return Err(Error::invalid_value(format!("unknown geometry kind {other}"))),
        };
        Ok(())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::Point(Point3d::ZERO)
    }
}
