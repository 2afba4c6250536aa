/// Gouraud Terminal - interactive software renderer
///
/// Usage: gouraud-terminal [mesh.obj] [scene.json]
///
/// With no mesh a cube is rendered. Controls:
///   - Arrows: rotate about Z / X
///   - C/V: rotate about Y
///   - L/K: scale up / down
///   - T: translate by (1, 1, 1)
///   - A/D, S/W, Z/X: move the camera along x, y, z
///   - R: reset, Q/ESC: quit

use anyhow::Context;
use gouraud_core::{Mesh, Scene, SceneConfig};
use gouraud_terminal::TerminalApp;
use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::init(); // stderr; redirect it when running with RUST_LOG set

    let mut args = env::args().skip(1);
    let mesh_path = args.next();
    let config = match args.next() {
        Some(path) => SceneConfig::load(&path).with_context(|| format!("loading scene config {}", path))?,
        None => SceneConfig::default(),
    };

    let scene = match mesh_path {
        Some(path) => Scene::load(&path, &config).with_context(|| format!("loading mesh {}", path))?,
        None => {
            log::info!("no mesh given, rendering a cube");
            Scene::from_mesh(Mesh::cube(10.0), config.light(), config.material(), &config.regions)
        }
    };
    log::info!(
        "{} vertices, {} triangles",
        scene.mesh().vertex_count(),
        scene.mesh().triangle_count()
    );

    let mut app = TerminalApp::new(scene, &config)?;
    app.run()
}
