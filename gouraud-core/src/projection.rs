/// Camera and projection utilities
use crate::error::{MatrixError, ProjectionError, RenderError};
use crate::math::{Matrix, Vec3, VectorExt, EPSILON};

/// Up reference for the look-at basis
pub fn world_up() -> Vec3 {
    Vec3::y()
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Full vertical field of view, radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Device depth range is `[0, max_depth]`, near plane at 0
    pub max_depth: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    /// World to camera basis. The camera looks down its local -z axis.
    ///
    /// If the view direction is parallel to [`world_up`] the basis falls back
    /// to world z as the up reference.
    pub fn view_matrix(&self) -> Result<Matrix, ProjectionError> {
        let back = self.position - self.target;
        if back.norm() <= EPSILON {
            return Err(ProjectionError::CameraAtTarget);
        }
        let n = back.normalized_or_zero();

        let mut up = world_up();
        if up.cross(&n).norm() <= EPSILON {
            up = if n.y > 0.0 { -Vec3::z() } else { Vec3::z() };
            log::debug!("view direction parallel to world up, using {:?} as up", up);
        }
        let u = up.cross(&n).normalized_or_zero();
        let v = n.cross(&u).normalized_or_zero();
        let eye = self.position;

        Ok(Matrix::from_rows4([
            [u.x, u.y, u.z, -u.dot(&eye)],
            [v.x, v.y, v.z, -v.dot(&eye)],
            [n.x, n.y, n.z, -n.dot(&eye)],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// Camera to clip space; w receives the distance in front of the camera
    pub fn perspective_matrix(&self, width: usize, height: usize) -> Matrix {
        let aspect = width as f32 / height as f32;
        let f = 1.0 / (self.fov / 2.0).tan();
        let (n, fa) = (self.near, self.far);
        Matrix::from_rows4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, -(fa + n) / (fa - n), -(2.0 * fa * n) / (fa - n)],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Normalized device coordinates to raster pixels, y pointing down
    pub fn device_matrix(&self, width: usize, height: usize) -> Matrix {
        let (w, h) = (width as f32, height as f32);
        let d = self.max_depth;
        Matrix::from_rows4([
            [w / 2.0, 0.0, 0.0, w / 2.0],
            [0.0, -h / 2.0, 0.0, h / 2.0],
            [0.0, 0.0, d / 2.0, d / 2.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Compose device * perspective * view for one frame
    pub fn projector(&self, width: usize, height: usize) -> Result<Projector, RenderError> {
        if width == 0 || height == 0 {
            return Err(ProjectionError::EmptyViewport { width, height }.into());
        }
        let view = self.view_matrix()?;
        let matrix = self
            .device_matrix(width, height)
            .multiply(&self.perspective_matrix(width, height))?
            .multiply(&view)?;
        Ok(Projector { matrix })
    }

    /// Project a single point to raster space
    pub fn project_to_screen(
        &self,
        point: &Vec3,
        width: usize,
        height: usize,
    ) -> Result<Vec3, RenderError> {
        Ok(self.projector(width, height)?.project(point)?)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            target: Vec3::zeros(),
            fov: 120f32.to_radians(),
            near: 5.0,
            far: 0xff_ffff as f32,
            max_depth: 0x5000 as f32,
        }
    }
}

/// The composed world-to-raster transform of a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    matrix: Matrix,
}

impl Projector {
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Transform and divide by w. Points on the camera plane come out non-finite.
    pub fn project(&self, point: &Vec3) -> Result<Vec3, MatrixError> {
        let h = self.matrix.transform_homogeneous(point)?;
        Ok(h.xyz() / h.w)
    }

    pub fn project_all(&self, points: &[Vec3]) -> Result<Vec<Vec3>, MatrixError> {
        points.iter().map(|p| self.project(p)).collect()
    }
}
