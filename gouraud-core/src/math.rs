/// Vector helpers and a dense, dimension-checked matrix
use std::ops::{Index, IndexMut};

use nalgebra::{DMatrix, Vector3, Vector4};

use crate::error::MatrixError;

pub type Vec3 = Vector3<f32>;

/// Magnitudes at or below this are treated as zero
pub const EPSILON: f32 = 1e-6;

/// Vector operations the shading code relies on that nalgebra spells differently
pub trait VectorExt {
    /// Normalize in place; a zero-length vector is left untouched.
    fn normalize_or_keep(&mut self);

    /// Unit copy of the vector, or the zero vector when it has no length.
    fn normalized_or_zero(&self) -> Self;

    /// Cosine of the angle between two vectors, 0 if either is zero-length.
    fn cosine(&self, other: &Self) -> f32;
}

impl VectorExt for Vec3 {
    fn normalize_or_keep(&mut self) {
        // None means the vector was too short and stays as it is
        let _ = self.try_normalize_mut(EPSILON);
    }

    fn normalized_or_zero(&self) -> Self {
        self.try_normalize(EPSILON).unwrap_or_else(Vec3::zeros)
    }

    fn cosine(&self, other: &Self) -> f32 {
        let denom = self.norm() * other.norm();
        if denom <= EPSILON {
            return 0.0;
        }
        self.dot(other) / denom
    }
}

/// Row-major r×c matrix with value semantics.
///
/// Arithmetic between incompatible shapes yields [`MatrixError::DimensionMismatch`]
/// instead of panicking, so malformed transforms can be rejected by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: DMatrix<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: DMatrix::zeros(rows, cols),
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            data: DMatrix::identity(n, n),
        }
    }

    /// Build a matrix from values listed row by row
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f32]) -> Result<Self, MatrixError> {
        if values.len() != rows * cols {
            return Err(MatrixError::ElementCount {
                expected: rows * cols,
                actual: values.len(),
            });
        }
        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, values),
        })
    }

    /// Infallible 4x4 constructor for the transform builders
    pub fn from_rows4(rows: [[f32; 4]; 4]) -> Self {
        Self {
            data: DMatrix::from_fn(4, 4, |r, c| rows[r][c]),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.data.get((row, col)).copied()
    }

    /// `self * rhs`
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols() != rhs.rows() {
            return Err(self.mismatch("multiply", rhs));
        }
        Ok(Matrix {
            data: &self.data * &rhs.data,
        })
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch("add", rhs));
        }
        Ok(Matrix {
            data: &self.data + &rhs.data,
        })
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch("subtract", rhs));
        }
        Ok(Matrix {
            data: &self.data - &rhs.data,
        })
    }

    /// Multiply the homogeneous column `(v, 1)` and return all four components
    pub fn transform_homogeneous(&self, v: &Vec3) -> Result<Vector4<f32>, MatrixError> {
        if self.shape() != (4, 4) {
            return Err(MatrixError::NotHomogeneous {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        let m = &self.data;
        let mut out = Vector4::zeros();
        for r in 0..4 {
            out[r] = m[(r, 0)] * v.x + m[(r, 1)] * v.y + m[(r, 2)] * v.z + m[(r, 3)];
        }
        Ok(out)
    }

    /// Apply an affine 4x4 transform to a point, ignoring w
    pub fn transform_point(&self, v: &Vec3) -> Result<Vec3, MatrixError> {
        let h = self.transform_homogeneous(v)?;
        Ok(h.xyz())
    }

    /// Apply the upper-left 3x3 block to a direction; translation is ignored
    pub fn transform_direction(&self, v: &Vec3) -> Result<Vec3, MatrixError> {
        if self.shape() != (4, 4) {
            return Err(MatrixError::NotHomogeneous {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        let m = &self.data;
        Ok(Vec3::from_fn(|r, _| {
            m[(r, 0)] * v.x + m[(r, 1)] * v.y + m[(r, 2)] * v.z
        }))
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> MatrixError {
        MatrixError::DimensionMismatch {
            op,
            lhs: self.shape(),
            rhs: rhs.shape(),
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, index: (usize, usize)) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f32 {
        &mut self.data[index]
    }
}
