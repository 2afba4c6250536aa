/// Indexed triangle mesh with per-vertex averaged normals
use crate::error::{IndexKind, MatrixError, MeshError};
use crate::math::{Matrix, Vec3, VectorExt};

/// Index into [`Mesh::regions`]
pub type RegionId = usize;

/// A triangle: for each corner, 0-based indices into positions, texture
/// coordinates and normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub position: [usize; 3],
    pub texture: [usize; 3],
    pub normal: [usize; 3],
}

/// A loaded mesh. Face indices are guaranteed to be in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec3>,
    faces: Vec<Face>,
    vertex_regions: Vec<Option<RegionId>>,
    regions: Vec<String>,
    averaged_normals: Vec<Vec3>,
}

impl Mesh {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn tex_coords(&self) -> &[Vec3] {
        &self.tex_coords
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Region names in order of first appearance
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn vertex_region(&self, vertex: usize) -> Option<RegionId> {
        self.vertex_regions.get(vertex).copied().flatten()
    }

    pub fn region_id(&self, name: &str) -> Option<RegionId> {
        self.regions.iter().position(|r| r == name)
    }

    /// Per-position unit normal, fixed at load time
    pub fn averaged_normals(&self) -> &[Vec3] {
        &self.averaged_normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn transform_positions(&mut self, m: &Matrix) -> Result<(), MatrixError> {
        for p in &mut self.positions {
            *p = m.transform_point(p)?;
        }
        Ok(())
    }

    /// Rotate the raw and the averaged normals as fixed directions.
    /// The averages are carried along, never recomputed.
    pub fn rotate_normals(&mut self, m: &Matrix) -> Result<(), MatrixError> {
        for n in self.normals.iter_mut().chain(self.averaged_normals.iter_mut()) {
            *n = m.transform_direction(n)?;
        }
        Ok(())
    }

    /// Create a simple cube mesh for testing
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut b = MeshBuilder::new();
        for &(x, y, z) in &[
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
        ] {
            b.position(Vec3::new(x, y, z));
        }
        for &(x, y, z) in &[
            (0.0, 0.0, 1.0),
            (0.0, 0.0, -1.0),
            (0.0, 1.0, 0.0),
            (0.0, -1.0, 0.0),
            (1.0, 0.0, 0.0),
            (-1.0, 0.0, 0.0),
        ] {
            b.normal(Vec3::new(x, y, z));
        }
        b.tex_coord(Vec3::zeros());

        // (quad corners, normal), 1-based like the source format
        let quads = [
            ([1, 2, 3, 4], 1), // front
            ([6, 5, 8, 7], 2), // back
            ([4, 3, 7, 8], 3), // top
            ([5, 6, 2, 1], 4), // bottom
            ([2, 6, 7, 3], 5), // right
            ([5, 1, 4, 8], 6), // left
        ];
        for (q, n) in quads {
            b.face([q[0], q[1], q[2]], [1; 3], [n; 3]);
            b.face([q[0], q[2], q[3]], [1; 3], [n; 3]);
        }
        b.build()
            .unwrap_or_else(|e| unreachable!("built-in cube is well formed: {e}"))
    }
}

/// Collects raw records (1-based face indices, as written in a mesh source)
/// and turns them into a validated [`Mesh`].
#[derive(Debug, Default)]
pub struct MeshBuilder {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec3>,
    raw_faces: Vec<Face>,
    vertex_regions: Vec<Option<RegionId>>,
    regions: Vec<String>,
    current_region: Option<RegionId>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions added from now on belong to `name`
    pub fn begin_region(&mut self, name: &str) {
        let id = match self.regions.iter().position(|r| r == name) {
            Some(id) => id,
            None => {
                self.regions.push(name.to_string());
                self.regions.len() - 1
            }
        };
        self.current_region = Some(id);
    }

    pub fn position(&mut self, p: Vec3) {
        self.positions.push(p);
        self.vertex_regions.push(self.current_region);
    }

    pub fn normal(&mut self, n: Vec3) {
        self.normals.push(n);
    }

    pub fn tex_coord(&mut self, t: Vec3) {
        self.tex_coords.push(t);
    }

    /// Add a face with 1-based indices
    pub fn face(&mut self, position: [usize; 3], texture: [usize; 3], normal: [usize; 3]) {
        self.raw_faces.push(Face {
            position,
            texture,
            normal,
        });
    }

    /// Validate every index once and compute averaged normals
    pub fn build(self) -> Result<Mesh, MeshError> {
        let mut faces = Vec::with_capacity(self.raw_faces.len());
        for (i, raw) in self.raw_faces.iter().enumerate() {
            faces.push(Face {
                position: rebase(i, IndexKind::Position, raw.position, self.positions.len())?,
                texture: rebase(i, IndexKind::Texture, raw.texture, self.tex_coords.len())?,
                normal: rebase(i, IndexKind::Normal, raw.normal, self.normals.len())?,
            });
        }

        let averaged_normals = average_normals(self.positions.len(), &self.normals, &faces);
        Ok(Mesh {
            positions: self.positions,
            normals: self.normals,
            tex_coords: self.tex_coords,
            faces,
            vertex_regions: self.vertex_regions,
            regions: self.regions,
            averaged_normals,
        })
    }
}

fn rebase(face: usize, kind: IndexKind, idx: [usize; 3], len: usize) -> Result<[usize; 3], MeshError> {
    let mut out = [0; 3];
    for (slot, &index) in out.iter_mut().zip(idx.iter()) {
        if index == 0 || index > len {
            return Err(MeshError::IndexOutOfRange {
                face: face + 1,
                kind,
                index,
                len,
            });
        }
        *slot = index - 1;
    }
    Ok(out)
}

/// Sum the normal of every face corner into its position, divide by three
/// and normalize.
///
/// The divisor assumes each vertex is shared by exactly three corners. For
/// other valences the direction is still right after normalization, but the
/// result is not a valence-weighted mean.
pub fn average_normals(vertex_count: usize, normals: &[Vec3], faces: &[Face]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::zeros(); vertex_count];
    for face in faces {
        for corner in 0..3 {
            acc[face.position[corner]] += normals[face.normal[corner]];
        }
    }
    for n in &mut acc {
        *n /= 3.0;
        n.normalize_or_keep();
    }
    acc
}
