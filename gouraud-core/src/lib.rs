/// Gouraud Core Library - software rendering pipeline
///
/// Mesh loading, rigid transforms, camera projection, per-vertex lighting and
/// a z-buffered scanline rasterizer that paints any [`Surface`].

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod math;
pub mod obj;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use config::SceneConfig;
pub use error::{ConfigError, MatrixError, MeshError, ProjectionError, RenderError, SurfaceError};
pub use geometry::{Face, Mesh, MeshBuilder};
pub use lighting::{LightSource, Material};
pub use math::{Matrix, Vec3};
pub use projection::Camera;
pub use raster::{rasterize_triangle, ColorVertex, FrameBuffer, Surface};
pub use scene::{FrameStats, Scene};
pub use transform::Transform;
