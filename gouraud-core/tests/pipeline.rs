// tests/pipeline.rs
//
// End-to-end properties of the rendering pipeline.
// Run with: cargo test -p gouraud-core --test pipeline

use std::collections::BTreeMap;

use gouraud_core::math::VectorExt;
use gouraud_core::obj::parse_obj;
use gouraud_core::{
    rasterize_triangle, Camera, Color, ColorVertex, FrameBuffer, LightSource, Material, Mesh,
    MeshBuilder, Scene, Surface, Vec3,
};

const TOL: f32 = 1e-4;

fn close(a: &Vec3, b: &Vec3, tol: f32) -> bool {
    (a - b).norm() <= tol
}

fn scene_from(src: &str) -> Scene {
    let mesh = parse_obj(src).unwrap();
    Scene::from_mesh(mesh, LightSource::default(), Material::default(), &BTreeMap::new())
}

const TETRA: &str = "\
v 1 1 1
v -1 -1 1
v -1 1 -1
v 1 -1 -1
vn 0.577 0.577 0.577
vn -0.577 -0.577 0.577
vn -0.577 0.577 -0.577
vn 0.577 -0.577 -0.577
vt 0 0
f 1/1/1 2/1/2 3/1/3
f 1/1/1 4/1/4 2/1/2
f 1/1/1 3/1/3 4/1/4
f 2/1/2 4/1/4 3/1/3
";

#[test]
fn target_projects_to_raster_center() {
    let cameras = [
        Camera::default(),
        Camera::new(Vec3::new(7.0, 3.0, -9.0), Vec3::new(1.0, 1.0, 1.0)),
        Camera::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(0.0, 0.0, 0.0)),
    ];
    for camera in &cameras {
        for &(w, h) in &[(800, 600), (640, 480), (13, 7), (1920, 1080)] {
            let p = camera.project_to_screen(&camera.target, w, h).unwrap();
            assert!((p.x - w as f32 / 2.0).abs() < 1e-2, "{:?} {}x{}", p, w, h);
            assert!((p.y - h as f32 / 2.0).abs() < 1e-2, "{:?} {}x{}", p, w, h);
        }
    }
}

#[test]
fn zero_rotation_is_identity() {
    let mut scene = scene_from(TETRA);
    let positions = scene.mesh().positions().to_vec();
    let normals = scene.mesh().normals().to_vec();
    scene.rotate(0.0, 0.0, 0.0).unwrap();
    for (a, b) in positions.iter().zip(scene.mesh().positions()) {
        assert!(close(a, b, TOL));
    }
    for (a, b) in normals.iter().zip(scene.mesh().normals()) {
        assert!(close(a, b, TOL));
    }
}

#[test]
fn rotation_about_x_is_reversible() {
    for &angle in &[0.035, 0.5, -1.2, 3.0, 10.0] {
        let mut scene = scene_from(TETRA);
        let positions = scene.mesh().positions().to_vec();
        scene.rotate(angle, 0.0, 0.0).unwrap();
        scene.rotate(-angle, 0.0, 0.0).unwrap();
        for (a, b) in positions.iter().zip(scene.mesh().positions()) {
            assert!(close(a, b, TOL), "angle {}: {:?} vs {:?}", angle, a, b);
        }
    }
}

#[test]
fn depth_test_is_order_independent() {
    let near = Color::rgb(1.0, 0.0, 0.0);
    let far = Color::rgb(0.0, 0.0, 1.0);
    let front = [
        ColorVertex::new(Vec3::new(2.0, 2.0, 10.0), near),
        ColorVertex::new(Vec3::new(20.0, 4.0, 10.0), near),
        ColorVertex::new(Vec3::new(6.0, 20.0, 10.0), near),
    ];
    let back = [
        ColorVertex::new(Vec3::new(0.0, 0.0, 50.0), far),
        ColorVertex::new(Vec3::new(24.0, 1.0, 40.0), far),
        ColorVertex::new(Vec3::new(10.0, 23.0, 45.0), far),
    ];

    let mut first = FrameBuffer::new(24, 24).unwrap();
    rasterize_triangle(&mut first, front[0], front[1], front[2]);
    rasterize_triangle(&mut first, back[0], back[1], back[2]);

    let mut second = FrameBuffer::new(24, 24).unwrap();
    rasterize_triangle(&mut second, back[0], back[1], back[2]);
    rasterize_triangle(&mut second, front[0], front[1], front[2]);

    assert!(first.rows().eq(second.rows()));
    // inside both triangles
    assert_eq!(first.pixel(8, 8), Some(near.to_rgb8()));

    let mut only_front = FrameBuffer::new(24, 24).unwrap();
    rasterize_triangle(&mut only_front, front[0], front[1], front[2]);
    for y in 0..24 {
        for x in 0..24 {
            if only_front.pixel(x, y) != Some(only_front.background()) {
                assert_eq!(first.pixel(x, y), Some(near.to_rgb8()), "pixel ({}, {})", x, y);
            }
        }
    }
}

#[test]
fn three_orthogonal_corner_normals_average_to_their_normalized_sum() {
    let mut b = MeshBuilder::new();
    b.position(Vec3::zeros());
    b.position(Vec3::x());
    b.position(Vec3::y());
    b.position(Vec3::z());
    b.normal(Vec3::x());
    b.normal(Vec3::y());
    b.normal(Vec3::z());
    b.tex_coord(Vec3::zeros());
    b.face([1, 2, 3], [1, 1, 1], [1, 1, 1]);
    b.face([1, 3, 4], [1, 1, 1], [2, 2, 2]);
    b.face([1, 4, 2], [1, 1, 1], [3, 3, 3]);
    let mesh = b.build().unwrap();

    let n = mesh.averaged_normals()[0];
    let expected = (Vec3::x() + Vec3::y() + Vec3::z()).normalized_or_zero();
    assert!(close(&n, &expected, 1e-6));
    assert!((n.norm() - 1.0).abs() < 1e-6);
}

#[test]
fn uniform_triangle_scenario() {
    let c = Color::rgb(0.2, 0.4, 0.6);
    let mut fb = FrameBuffer::new(11, 11).unwrap();
    rasterize_triangle(
        &mut fb,
        ColorVertex::new(Vec3::new(0.0, 0.0, 1.0), c),
        ColorVertex::new(Vec3::new(10.0, 0.0, 1.0), c),
        ColorVertex::new(Vec3::new(5.0, 10.0, 1.0), c),
    );
    assert_eq!(fb.pixel(5, 5), Some(c.to_rgb8()));
    for (x, y) in [(5, 1), (2, 2), (8, 2), (5, 8), (3, 4), (7, 4)] {
        assert_ne!(fb.pixel(x, y), Some(fb.background()), "pixel ({}, {})", x, y);
    }
}

#[test]
fn single_face_mesh_scenario() {
    let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvt 0 0\nf 1/1/1 2/1/1 3/1/1\n").unwrap();
    assert!(close(&mesh.averaged_normals()[0], &Vec3::new(0.0, 0.0, 1.0), 1e-6));
}

#[test]
fn cube_renders_identically_after_reset() {
    let camera = Camera::new(Vec3::new(6.0, 8.0, 20.0), Vec3::zeros());
    let mut scene = Scene::from_mesh(
        Mesh::cube(6.0),
        LightSource::new(Vec3::new(0.0, 100.0, 50.0), Color::WHITE),
        Material::default(),
        &BTreeMap::new(),
    );

    let mut before = FrameBuffer::new(48, 32).unwrap();
    scene.render_frame(&mut before, &camera).unwrap();

    scene.rotate(0.2, 0.4, 0.0).unwrap();
    scene.scale(1.5).unwrap();
    let mut moved = FrameBuffer::new(48, 32).unwrap();
    scene.render_frame(&mut moved, &camera).unwrap();
    assert!(!moved.rows().eq(before.rows()));

    scene.reset();
    let mut after = FrameBuffer::new(48, 32).unwrap();
    scene.render_frame(&mut after, &camera).unwrap();
    assert!(after.rows().eq(before.rows()));
}

#[test]
fn render_clears_previous_frame() {
    let scene = Scene::from_mesh(
        Mesh::cube(6.0),
        LightSource::default(),
        Material::default(),
        &BTreeMap::new(),
    );
    let mut fb = FrameBuffer::new(32, 32).unwrap();
    fb.set_pixel(0, 0, 0.0, Color::BLACK);
    scene.render_frame(&mut fb, &Camera::default()).unwrap();
    assert_eq!(fb.pixel(0, 0), Some(fb.background()));
}
