/// Display surface abstraction and the Gouraud scanline rasterizer
use std::cmp::Ordering;

use crate::color::Color;
use crate::error::SurfaceError;
use crate::math::{Vec3, EPSILON};

/// A pixel store with a matching depth store.
///
/// `set_pixel` skips out-of-bounds coordinates and only writes when the
/// candidate depth is closer than or equal to the stored one (smaller wins).
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Reset every pixel to the background and every depth to infinity
    fn clear(&mut self);

    /// Returns whether the pixel was written
    fn set_pixel(&mut self, x: i32, y: i32, depth: f32, color: Color) -> bool;

    fn present(&mut self) -> Result<(), SurfaceError>;
}

/// Light grey (0xdadada)
pub const DEFAULT_BACKGROUND: Color = Color::rgb(218.0 / 255.0, 218.0 / 255.0, 218.0 / 255.0);

/// In-memory surface; also the backing store of the terminal surface
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
    depth: Vec<f32>,
    background: [u8; 3],
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, SurfaceError> {
        Self::with_background(width, height, DEFAULT_BACKGROUND)
    }

    pub fn with_background(width: usize, height: usize, background: Color) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }
        let size = width * height;
        let background = background.to_rgb8();
        Ok(Self {
            width,
            height,
            pixels: vec![background; size],
            depth: vec![f32::INFINITY; size],
            background,
        })
    }

    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![self.background; width * height];
            self.depth = vec![f32::INFINITY; width * height];
        }
        Ok(())
    }

    pub fn background(&self) -> [u8; 3] {
        self.background
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Rows of pixels, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]]> {
        self.pixels.chunks(self.width)
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
        self.depth.fill(f32::INFINITY);
    }

    fn set_pixel(&mut self, x: i32, y: i32, depth: f32, color: Color) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let Some(idx) = self.index(x as usize, y as usize) else {
            return false;
        };
        // NaN never wins
        if !(depth <= self.depth[idx]) {
            return false;
        }
        self.depth[idx] = depth;
        self.pixels[idx] = color.to_rgb8();
        true
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// A raster-space vertex carrying its lit colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: Color,
}

impl ColorVertex {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }

    fn x(&self) -> f32 {
        self.position.x
    }

    fn y(&self) -> f32 {
        self.position.y
    }
}

/// Plane through the triangle, used to recover depth at any pixel
struct Plane {
    normal: Vec3,
    offset: f32,
}

impl Plane {
    /// `None` when the triangle is seen edge-on or has no area
    fn through(a: &Vec3, b: &Vec3, c: &Vec3) -> Option<Self> {
        let normal = (b - a).cross(&(c - b));
        if normal.z.abs() <= EPSILON {
            return None;
        }
        Some(Self {
            normal,
            offset: -normal.dot(a),
        })
    }

    fn depth_at(&self, x: f32, y: f32) -> f32 {
        -(self.normal.x * x + self.normal.y * y + self.offset) / self.normal.z
    }
}

/// dx/dy and dcolor/dy of an edge; zero for an edge with no height
#[derive(Debug, Clone, Copy)]
struct Slope {
    dx: f32,
    dcolor: Color,
}

impl Slope {
    fn between(from: &ColorVertex, to: &ColorVertex) -> Self {
        let dy = to.y() - from.y();
        if dy > 0.0 {
            Self {
                dx: (to.x() - from.x()) / dy,
                dcolor: (to.color - from.color) * (1.0 / dy),
            }
        } else {
            Self {
                dx: 0.0,
                dcolor: Color::new(0.0, 0.0, 0.0, 0.0),
            }
        }
    }
}

/// Running x and colour along one edge, stepped once per scanline
#[derive(Debug, Clone, Copy)]
struct Tracker {
    x: f32,
    color: Color,
    slope: Slope,
}

impl Tracker {
    fn start(origin: &ColorVertex, slope: Slope, y: f32) -> Self {
        let t = y - origin.y();
        Self {
            x: origin.x() + slope.dx * t,
            color: origin.color + slope.dcolor * t,
            slope,
        }
    }

    fn step(&mut self) {
        self.x += self.slope.dx;
        self.color = self.color + self.slope.dcolor;
    }
}

/// Fill one triangle with Gouraud shading and a depth test.
///
/// Returns the number of pixels that passed the depth test. Degenerate and
/// fully off-raster triangles are skipped silently.
pub fn rasterize_triangle<S: Surface + ?Sized>(
    surface: &mut S,
    v0: ColorVertex,
    v1: ColorVertex,
    v2: ColorVertex,
) -> usize {
    let finite = |v: &ColorVertex| v.position.iter().all(|c| c.is_finite());
    if !(finite(&v0) && finite(&v1) && finite(&v2)) {
        return 0;
    }
    let Some(plane) = Plane::through(&v0.position, &v1.position, &v2.position) else {
        return 0;
    };

    // stable sort: equal y keeps submission order
    let mut sorted = [v0, v1, v2];
    sorted.sort_by(|p, q| p.y().partial_cmp(&q.y()).unwrap_or(Ordering::Equal));
    let [a, b, c] = sorted;

    let height = surface.height() as f32;
    if a.y() == c.y() || a.y() >= height || c.y() < 0.0 {
        return 0;
    }

    let ab = Slope::between(&a, &b);
    let ac = Slope::between(&a, &c);
    let bc = Slope::between(&b, &c);

    let b_on_left = if b.y() > a.y() {
        ab.dx < ac.dx
    } else {
        b.x() < a.x()
    };

    let mut written = 0;

    // upper half: rows in [a.y, b.y)
    let first = a.y().ceil();
    let last = b.y().ceil() - 1.0;
    let (left, right) = if b_on_left {
        ((&a, ab), (&a, ac))
    } else {
        ((&a, ac), (&a, ab))
    };
    written += sweep(surface, &plane, first, last, left, right);

    // lower half: rows in [b.y, c.y]
    let first = b.y().ceil();
    let last = c.y().floor();
    let (left, right) = if b_on_left {
        ((&b, bc), (&a, ac))
    } else {
        ((&a, ac), (&b, bc))
    };
    written += sweep(surface, &plane, first, last, left, right);

    written
}

fn sweep<S: Surface + ?Sized>(
    surface: &mut S,
    plane: &Plane,
    first: f32,
    last: f32,
    left: (&ColorVertex, Slope),
    right: (&ColorVertex, Slope),
) -> usize {
    let first = first.max(0.0);
    let last = last.min(surface.height() as f32 - 1.0);
    if first > last {
        return 0;
    }

    let mut l = Tracker::start(left.0, left.1, first);
    let mut r = Tracker::start(right.0, right.1, first);
    let mut written = 0;
    let mut y = first;
    while y <= last {
        written += fill_row(surface, plane, y, &l, &r);
        l.step();
        r.step();
        y += 1.0;
    }
    written
}

fn fill_row<S: Surface + ?Sized>(
    surface: &mut S,
    plane: &Plane,
    y: f32,
    left: &Tracker,
    right: &Tracker,
) -> usize {
    let span = right.x - left.x;
    if span <= 0.0 {
        return 0;
    }
    let dcolor = (right.color - left.color) * (1.0 / span);

    let x_start = left.x.ceil().max(0.0);
    let x_end = right.x.ceil().min(surface.width() as f32);
    let mut color = left.color + dcolor * (x_start - left.x);
    let mut written = 0;
    let mut x = x_start;
    while x < x_end {
        let depth = plane.depth_at(x, y);
        if surface.set_pixel(x as i32, y as i32, depth, color) {
            written += 1;
        }
        color = color + dcolor;
        x += 1.0;
    }
    written
}
