/// Per-vertex ambient + directional diffuse lighting
use std::collections::{BTreeMap, HashMap};

use crate::color::Color;
use crate::geometry::{Mesh, RegionId};
use crate::math::{Vec3, VectorExt};

/// A single light. The position is used as a direction from the origin,
/// not as a point emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec3,
    pub intensity: Color,
}

impl LightSource {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl Default for LightSource {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 100.0, 0.0), Color::rgb(1.0, 0.0, 0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient light intensity
    pub ambient_light: Color,
    /// Ambient reflection coefficient
    pub ambient: Color,
    /// Diffuse reflection coefficient
    pub diffuse: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient_light: Color::gray(0.3),
            ambient: Color::gray(0.5),
            diffuse: Color::gray(0.5),
        }
    }
}

/// Region table key that tints every vertex no named entry covers
pub const FALLBACK_REGION: &str = "*";

/// Region id -> tint, resolved against a mesh's region names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTints {
    tints: HashMap<RegionId, Color>,
    fallback: Option<Color>,
}

impl RegionTints {
    pub fn resolve(mesh: &Mesh, table: &BTreeMap<String, Color>) -> Self {
        let mut tints = HashMap::with_capacity(table.len());
        let fallback = table.get(FALLBACK_REGION).copied();
        for (name, &tint) in table {
            if name == FALLBACK_REGION {
                continue;
            }
            match mesh.region_id(name) {
                Some(id) => {
                    tints.insert(id, tint);
                }
                None => log::warn!("region `{}` has a tint but no vertices in the mesh", name),
            }
        }
        Self { tints, fallback }
    }

    /// Tint of a vertex's region, else the fallback tint if one is set
    pub fn get(&self, region: Option<RegionId>) -> Option<Color> {
        region
            .and_then(|id| self.tints.get(&id).copied())
            .or(self.fallback)
    }

    /// Named regions with a tint; the fallback is not counted
    pub fn len(&self) -> usize {
        self.tints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tints.is_empty() && self.fallback.is_none()
    }
}

/// Colour of one vertex.
///
/// With a tint `t`, each channel's diffuse term becomes
/// `t * (intensity * kd * cos + 1)`, so a tint channel of 1 lifts that channel
/// by a constant and a channel of 0 removes its diffuse light entirely.
pub fn shade_vertex(
    normal: &Vec3,
    tint: Option<Color>,
    light: &LightSource,
    material: &Material,
) -> Color {
    let mut color = material.ambient_light.modulate(material.ambient);

    let cos = light.position.cosine(normal);
    if cos > 0.0 {
        let diffuse = light.intensity.modulate(material.diffuse) * cos;
        color = match tint {
            Some(t) => color + (diffuse + Color::WHITE).modulate(t),
            None => color + diffuse,
        };
    }
    Color { a: 1.0, ..color }
}

/// Shade every vertex of the mesh from its averaged normal
pub fn shade_mesh(
    mesh: &Mesh,
    light: &LightSource,
    material: &Material,
    tints: &RegionTints,
) -> Vec<Color> {
    mesh.averaged_normals()
        .iter()
        .enumerate()
        .map(|(i, n)| shade_vertex(n, tints.get(mesh.vertex_region(i)), light, material))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::parse_obj;

    fn white_light(position: Vec3) -> LightSource {
        LightSource::new(position, Color::WHITE)
    }

    #[test]
    fn test_ambient_only_when_facing_away() {
        let c = shade_vertex(
            &Vec3::new(0.0, -1.0, 0.0),
            None,
            &white_light(Vec3::new(0.0, 10.0, 0.0)),
            &Material::default(),
        );
        assert!(c.approx_eq(&Color::gray(0.15), 1e-6));
    }

    #[test]
    fn test_diffuse_scales_with_cosine() {
        let light = white_light(Vec3::new(0.0, 10.0, 0.0));
        let head_on = shade_vertex(&Vec3::y(), None, &light, &Material::default());
        assert!(head_on.approx_eq(&Color::gray(0.65), 1e-6));

        let tilted = Vec3::new(1.0, 1.0, 0.0).normalize();
        let c = shade_vertex(&tilted, None, &light, &Material::default());
        let expected = 0.15 + 0.5 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(c.approx_eq(&Color::gray(expected), 1e-5));
    }

    #[test]
    fn test_zero_normal_gets_ambient() {
        let c = shade_vertex(
            &Vec3::zeros(),
            None,
            &white_light(Vec3::y()),
            &Material::default(),
        );
        assert!(c.approx_eq(&Color::gray(0.15), 1e-6));
    }

    #[test]
    fn test_region_tint_overrides_diffuse() {
        let light = white_light(Vec3::new(0.0, 10.0, 0.0));
        let c = shade_vertex(
            &Vec3::y(),
            Some(Color::rgb(0.0, 1.0, 0.0)),
            &light,
            &Material::default(),
        );
        // ambient 0.15 everywhere; green gets diffuse 0.5 + boost 1
        assert!(c.approx_eq(&Color::rgb(0.15, 1.65, 0.15), 1e-6));
    }

    #[test]
    fn test_tints_resolve_by_region_name() {
        let src = "v 0 0 0\ng turf\nv 1 0 0\nv 0 1 0\nvn 0 1 0\nvt 0 0\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = parse_obj(src).unwrap();
        let mut table = BTreeMap::new();
        table.insert("turf".to_string(), Color::rgb(1.0, 0.0, 0.0));
        table.insert("missing".to_string(), Color::rgb(0.0, 0.0, 1.0));
        let tints = RegionTints::resolve(&mesh, &table);
        assert_eq!(tints.len(), 1);

        let colors = shade_mesh(&mesh, &white_light(Vec3::y()), &Material::default(), &tints);
        assert_eq!(colors.len(), 3);
        assert!(colors[0].approx_eq(&Color::gray(0.65), 1e-5));
        assert!(colors[1].approx_eq(&Color::rgb(1.65, 0.15, 0.15), 1e-5));
    }

    #[test]
    fn test_fallback_tint_covers_remaining_vertices() {
        let src = "v 0 0 0\ng turf\nv 1 0 0\ng lines\nv 0 1 0\nvn 0 1 0\nvt 0 0\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = parse_obj(src).unwrap();
        let mut table = BTreeMap::new();
        table.insert("turf".to_string(), Color::rgb(1.0, 0.0, 0.0));
        table.insert(FALLBACK_REGION.to_string(), Color::rgb(0.0, 0.0, 1.0));
        let tints = RegionTints::resolve(&mesh, &table);
        assert_eq!(tints.len(), 1);
        assert!(!tints.is_empty());

        let colors = shade_mesh(&mesh, &white_light(Vec3::y()), &Material::default(), &tints);
        // no region, and a region without its own entry, both get the fallback
        assert!(colors[0].approx_eq(&Color::rgb(0.15, 0.15, 1.65), 1e-5));
        assert!(colors[1].approx_eq(&Color::rgb(1.65, 0.15, 0.15), 1e-5));
        assert!(colors[2].approx_eq(&Color::rgb(0.15, 0.15, 1.65), 1e-5));
    }
}
