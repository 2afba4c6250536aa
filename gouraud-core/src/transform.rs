/// Elementary 4x4 transformation matrices
use crate::error::MatrixError;
use crate::math::{Matrix, Vec3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn rotation_x(angle: f32) -> Matrix {
        let (s, c) = angle.sin_cos();
        Matrix::from_rows4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Matrix {
        let (s, c) = angle.sin_cos();
        Matrix::from_rows4([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f32) -> Matrix {
        let (s, c) = angle.sin_cos();
        Matrix::from_rows4([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Create a rotation matrix from per-axis angles (radians)
    pub fn rotation_matrix(ax: f32, ay: f32, az: f32) -> Result<Matrix, MatrixError> {
        // Apply rotations in order: Z, Y, X
        Self::rotation_z(az)
            .multiply(&Self::rotation_y(ay))?
            .multiply(&Self::rotation_x(ax))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(factor: f32) -> Matrix {
        Matrix::from_rows4([
            [factor, 0.0, 0.0, 0.0],
            [0.0, factor, 0.0, 0.0],
            [0.0, 0.0, factor, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vec3) -> Matrix {
        Matrix::from_rows4([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(0.0, 0.0, 0.0).unwrap();
        assert_eq!(matrix, Matrix::identity(4));
    }

    #[test]
    fn test_quarter_turns() {
        let p = Vec3::new(1.0, 0.0, 0.0);
        let rz = Transform::rotation_z(FRAC_PI_2).transform_point(&p).unwrap();
        assert!(close(&rz, &Vec3::new(0.0, 1.0, 0.0)));

        let q = Vec3::new(0.0, 1.0, 0.0);
        let rx = Transform::rotation_x(FRAC_PI_2).transform_point(&q).unwrap();
        assert!(close(&rx, &Vec3::new(0.0, 0.0, 1.0)));

        let r = Vec3::new(0.0, 0.0, 1.0);
        let ry = Transform::rotation_y(FRAC_PI_2).transform_point(&r).unwrap();
        assert!(close(&ry, &Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_composition_order_is_zyx() {
        // X first, then Z: (0,1,0) -x-> (0,0,1) -z-> (0,0,1)
        let m = Transform::rotation_matrix(FRAC_PI_2, 0.0, FRAC_PI_2).unwrap();
        let out = m.transform_point(&Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(close(&out, &Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_scale_and_translate() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        let s = Transform::scale_matrix(1.5).transform_point(&p).unwrap();
        assert!(close(&s, &Vec3::new(1.5, -3.0, 4.5)));
        let t = Transform::translation_matrix(&Vec3::new(1.0, 1.0, 1.0))
            .transform_point(&p)
            .unwrap();
        assert!(close(&t, &Vec3::new(2.0, -1.0, 4.0)));
    }
}
