/// Error types shared across the rendering pipeline
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Incompatible operands or construction input for [`crate::math::Matrix`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("expected {expected} elements for matrix, got {actual}")]
    ElementCount { expected: usize, actual: usize },
    #[error("homogeneous transform needs a 4x4 matrix, got {rows}x{cols}")]
    NotHomogeneous { rows: usize, cols: usize },
}

/// Which attribute array a face index points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Position,
    Texture,
    Normal,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IndexKind::Position => "position",
            IndexKind::Texture => "texture",
            IndexKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Mesh loading failures. No partial mesh is ever returned.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("cannot open mesh source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("face {face}: {kind} index {index} out of range (have {len})")]
    IndexOutOfRange {
        face: usize,
        kind: IndexKind,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("camera position coincides with its look-at target")]
    CameraAtTarget,
    #[error("viewport of {width}x{height} has no pixels")]
    EmptyViewport { width: usize, height: usize },
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("display surface of {width}x{height} cannot be created")]
    ZeroSized { width: usize, height: usize },
    #[error("failed to present surface: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read scene config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid scene config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can abort a frame
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
