//! Render mesh settings.

use crate::archive::{ArchiveRead, ArchiveWrite};
use crate::util::{Error, Result};

/// Settings that control how surfaces are tessellated into render meshes.
///
/// Zero in a length or count field means "no limit".
#[derive(Clone, Debug, PartialEq)]
pub struct MeshParameters {
    /// Refine the initial grid until the tolerances are met.
    pub refine: bool,
    /// Mesh each face independently, leaving seams unwelded.
    pub jagged_seams: bool,
    /// Mesh planar faces with as few triangles as possible.
    pub simple_planes: bool,
    pub compute_curvature: bool,
    pub closed_object_post_process: bool,
    /// 1 = packed texture coordinates, 2 = surface parameter space.
    pub texture_range: u32,
    pub grid_min_count: i32,
    pub grid_max_count: i32,
    pub grid_angle_radians: f64,
    pub grid_aspect_ratio: f64,
    pub grid_amplification: f64,
    /// Maximum distance between mesh and surface.
    pub tolerance: f64,
    pub min_tolerance: f64,
    pub relative_tolerance: f64,
    pub min_edge_length: f64,
    pub max_edge_length: f64,
    pub refine_angle_radians: f64,
}

impl MeshParameters {
    /// Current payload version.
    pub const PAYLOAD_VERSION: u8 = 1;

    /// Coarse, fast settings for interactive display.
    pub fn fast_render() -> Self {
        Self {
            refine: false,
            simple_planes: true,
            grid_min_count: 16,
            grid_angle_radians: 0.0,
            grid_aspect_ratio: 0.0,
            grid_amplification: 0.0,
            refine_angle_radians: 0.0,
            ..Self::default()
        }
    }

    pub fn write(&self, ar: &mut dyn ArchiveWrite) -> Result<()> {
        ar.write_u8(Self::PAYLOAD_VERSION)?;
        ar.write_bool(self.refine)?;
        ar.write_bool(self.jagged_seams)?;
        ar.write_bool(self.simple_planes)?;
        ar.write_bool(self.compute_curvature)?;
        ar.write_bool(self.closed_object_post_process)?;
        ar.write_u32(self.texture_range)?;
        ar.write_i32(self.grid_min_count)?;
        ar.write_i32(self.grid_max_count)?;
        ar.write_f64(self.grid_angle_radians)?;
        ar.write_f64(self.grid_aspect_ratio)?;
        ar.write_f64(self.grid_amplification)?;
        ar.write_f64(self.tolerance)?;
        ar.write_f64(self.min_tolerance)?;
        ar.write_f64(self.relative_tolerance)?;
        ar.write_f64(self.min_edge_length)?;
        ar.write_f64(self.max_edge_length)?;
        ar.write_f64(self.refine_angle_radians)
    }

    /// Read the payload. Fields appended by newer payload versions are left
    /// for the enclosing frame to skip.
    pub fn read(&mut self, ar: &mut dyn ArchiveRead) -> Result<()> {
        let version = ar.read_u8()?;
        if version == 0 {
            return Err(Error::invalid_value("mesh parameters payload version 0"));
        }
        if version > Self::PAYLOAD_VERSION {
            tracing::debug!(version, "mesh parameters written by a newer version");
        }

        self.refine = ar.read_bool()?;
        self.jagged_seams = ar.read_bool()?;
        self.simple_planes = ar.read_bool()?;
        self.compute_curvature = ar.read_bool()?;
        self.closed_object_post_process = ar.read_bool()?;
        self.texture_range = ar.read_u32()?;
        self.grid_min_count = ar.read_i32()?;
        self.grid_max_count = ar.read_i32()?;
        self.grid_angle_radians = ar.read_f64()?;
        self.grid_aspect_ratio = ar.read_f64()?;
        self.grid_amplification = ar.read_f64()?;
        self.tolerance = ar.read_f64()?;
        self.min_tolerance = ar.read_f64()?;
        self.relative_tolerance = ar.read_f64()?;
        self.min_edge_length = ar.read_f64()?;
        self.max_edge_length = ar.read_f64()?;
        self.refine_angle_radians = ar.read_f64()?;
        Ok(())
    }
}

impl Default for MeshParameters {
    /// The default render mesh settings.
    fn default() -> Self {
        Self {
            refine: true,
            jagged_seams: false,
            simple_planes: false,
            compute_curvature: false,
            closed_object_post_process: false,
            texture_range: 2,
            grid_min_count: 0,
            grid_max_count: 0,
            grid_angle_radians: 20f64.to_radians(),
            grid_aspect_ratio: 6.0,
            grid_amplification: 1.0,
            tolerance: 0.0,
            min_tolerance: 0.0,
            relative_tolerance: 0.0,
            min_edge_length: 0.0001,
            max_edge_length: 0.0,
            refine_angle_radians: 20f64.to_radians(),
        }
    }
}
