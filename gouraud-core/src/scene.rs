/// A renderable object: mesh, light and material, with the per-frame pipeline
use std::collections::BTreeMap;
use std::path::Path;

use crate::color::Color;
use crate::config::SceneConfig;
use crate::error::{MatrixError, MeshError, RenderError};
use crate::geometry::Mesh;
use crate::lighting::{shade_mesh, LightSource, Material, RegionTints};
use crate::math::{Matrix, Vec3};
use crate::obj::load_obj;
use crate::projection::Camera;
use crate::raster::{rasterize_triangle, ColorVertex, Surface};
use crate::transform::Transform;

/// What a single frame did, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    /// Triangles that produced no pixel (degenerate, off-raster or hidden)
    pub culled: usize,
    pub pixels: usize,
}

#[derive(Debug, Clone)]
pub struct Scene {
    mesh: Mesh,
    light: LightSource,
    material: Material,
    tints: RegionTints,
    /// Everything applied since load or the last reset
    cumulative: Matrix,
    pristine: (Mesh, LightSource),
}

impl Scene {
    /// Load a mesh description and set up lighting from the config
    pub fn load(path: impl AsRef<Path>, config: &SceneConfig) -> Result<Self, MeshError> {
        let mesh = load_obj(path)?;
        Ok(Self::from_mesh(mesh, config.light(), config.material(), &config.regions))
    }

    pub fn from_mesh(
        mesh: Mesh,
        light: LightSource,
        material: Material,
        regions: &BTreeMap<String, Color>,
    ) -> Self {
        let tints = RegionTints::resolve(&mesh, regions);
        Self {
            pristine: (mesh.clone(), light),
            mesh,
            light,
            material,
            tints,
            cumulative: Matrix::identity(4),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn light(&self) -> &LightSource {
        &self.light
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn cumulative_transform(&self) -> &Matrix {
        &self.cumulative
    }

    /// Rotate positions, both normal arrays and the light about the origin
    /// (radians, applied X then Y then Z). Shading relative to the mesh is
    /// unchanged by a rotation.
    pub fn rotate(&mut self, ax: f32, ay: f32, az: f32) -> Result<(), MatrixError> {
        let m = Transform::rotation_matrix(ax, ay, az)?;
        self.mesh.transform_positions(&m)?;
        self.mesh.rotate_normals(&m)?;
        self.light.position = m.transform_point(&self.light.position)?;
        self.accumulate(&m)
    }

    /// Uniform scale of positions only
    pub fn scale(&mut self, factor: f32) -> Result<(), MatrixError> {
        let m = Transform::scale_matrix(factor);
        self.mesh.transform_positions(&m)?;
        self.accumulate(&m)
    }

    pub fn translate(&mut self, offset: Vec3) -> Result<(), MatrixError> {
        let m = Transform::translation_matrix(&offset);
        self.mesh.transform_positions(&m)?;
        self.accumulate(&m)
    }

    /// Undo every transform since load
    pub fn reset(&mut self) {
        self.mesh = self.pristine.0.clone();
        self.light = self.pristine.1;
        self.cumulative = Matrix::identity(4);
    }

    fn accumulate(&mut self, m: &Matrix) -> Result<(), MatrixError> {
        self.cumulative = m.multiply(&self.cumulative)?;
        Ok(())
    }

    /// Light, project and rasterize the whole mesh into `surface`, then present it
    pub fn render_frame<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        camera: &Camera,
    ) -> Result<FrameStats, RenderError> {
        surface.clear();

        let colors = shade_mesh(&self.mesh, &self.light, &self.material, &self.tints);
        let projector = camera.projector(surface.width(), surface.height())?;
        let raster = projector.project_all(self.mesh.positions())?;

        let mut stats = FrameStats {
            triangles: self.mesh.triangle_count(),
            ..FrameStats::default()
        };
        for face in self.mesh.faces() {
            let [i, j, k] = face.position;
            let written = rasterize_triangle(
                surface,
                ColorVertex::new(raster[i], colors[i]),
                ColorVertex::new(raster[j], colors[j]),
                ColorVertex::new(raster[k], colors[k]),
            );
            if written == 0 {
                stats.culled += 1;
            }
            stats.pixels += written;
        }

        surface.present()?;
        log::debug!(
            "frame {}x{}: {} triangles, {} culled, {} pixels written",
            surface.width(),
            surface.height(),
            stats.triangles,
            stats.culled,
            stats.pixels
        );
        Ok(stats)
    }
}
