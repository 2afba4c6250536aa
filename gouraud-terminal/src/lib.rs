/// Terminal front-end for the Gouraud renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use gouraud_core::config::ControlConfig;
use gouraud_core::{Camera, FrameStats, Scene, SceneConfig, Vec3};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

pub mod surface;

pub use surface::TerminalSurface;

/// One cell row is kept for the status line
const STATUS_ROWS: u16 = 1;

/// What a key press asks the scene or camera to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Radians about X, Y, Z
    Rotate(f32, f32, f32),
    Scale(f32),
    Translate(Vec3),
    MoveCamera(Vec3),
    Reset,
    Quit,
}

impl Command {
    /// Key bindings, with step sizes taken from the controls config
    pub fn from_key(code: KeyCode, controls: &ControlConfig) -> Option<Self> {
        let step = controls.rotate_step_degrees.to_radians();
        let cam = controls.camera_step;
        let command = match code {
            KeyCode::Left => Command::Rotate(0.0, 0.0, -step),
            KeyCode::Right => Command::Rotate(0.0, 0.0, step),
            KeyCode::Up => Command::Rotate(step, 0.0, 0.0),
            KeyCode::Down => Command::Rotate(-step, 0.0, 0.0),
            KeyCode::Char('c') => Command::Rotate(0.0, step, 0.0),
            KeyCode::Char('v') => Command::Rotate(0.0, -step, 0.0),
            KeyCode::Char('l') => Command::Scale(controls.scale_up),
            KeyCode::Char('k') => Command::Scale(controls.scale_down),
            KeyCode::Char('t') => Command::Translate(Vec3::from(controls.translate_step)),
            KeyCode::Char('a') => Command::MoveCamera(Vec3::new(-cam, 0.0, 0.0)),
            KeyCode::Char('d') => Command::MoveCamera(Vec3::new(cam, 0.0, 0.0)),
            KeyCode::Char('s') => Command::MoveCamera(Vec3::new(0.0, -cam, 0.0)),
            KeyCode::Char('w') => Command::MoveCamera(Vec3::new(0.0, cam, 0.0)),
            KeyCode::Char('z') => Command::MoveCamera(Vec3::new(0.0, 0.0, cam)),
            KeyCode::Char('x') => Command::MoveCamera(Vec3::new(0.0, 0.0, -cam)),
            KeyCode::Char('r') => Command::Reset,
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Raw mode and the alternate screen for as long as it lives; restored on
/// drop, including when the loop unwinds.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(ScreenGuard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show) {
            log::error!("failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to disable raw mode: {}", e);
        }
    }
}

/// Frame pacing and a once-per-second FPS estimate
#[derive(Debug, Clone)]
pub struct FrameClock {
    budget: Duration,
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new(budget: Duration, now: Instant) -> Self {
        Self {
            budget,
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Count a frame that began at `started`; returns how long to sleep so the
    /// frame fills its budget.
    pub fn finish_frame(&mut self, started: Instant, now: Instant) -> Duration {
        self.frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / window.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        self.budget
            .saturating_sub(now.saturating_duration_since(started))
    }
}

/// Main application struct for interactive terminal rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    controls: ControlConfig,
    surface: TerminalSurface<Stdout>,
    running: bool,
    last_stats: FrameStats,
    clock: FrameClock,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: &SceneConfig) -> anyhow::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let surface = TerminalSurface::new(
            stdout(),
            columns,
            rows.saturating_sub(STATUS_ROWS),
            STATUS_ROWS,
            config.background,
        )?;
        log::info!(
            "terminal {}x{} cells, raster {}x{}",
            columns,
            rows,
            gouraud_core::Surface::width(&surface),
            gouraud_core::Surface::height(&surface)
        );

        Ok(Self {
            scene,
            camera: config.camera(),
            controls: config.controls.clone(),
            surface,
            running: true,
            last_stats: FrameStats::default(),
            clock: FrameClock::new(
                Duration::from_millis(config.controls.frame_millis),
                Instant::now(),
            ),
        })
    }

    /// Take over the terminal until a quit command; the screen is restored
    /// however the loop ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let _screen = ScreenGuard::enter()?;
        while self.running {
            let started = Instant::now();
            self.drain_events()?;
            if !self.running {
                break;
            }
            self.render()?;
            let pause = self.clock.finish_frame(started, Instant::now());
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }
        log::info!("quit at {:.1} fps", self.clock.fps());
        Ok(())
    }

    fn drain_events(&mut self) -> anyhow::Result<()> {
        while event::poll(Duration::ZERO)? {
            self.handle_event(event::read()?)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(command) = Command::from_key(code, &self.controls) {
                    self.apply(command)?;
                }
            }
            Event::Resize(columns, rows) => {
                if let Err(e) = self.surface.resize(columns, rows.saturating_sub(STATUS_ROWS)) {
                    log::warn!("ignoring resize to {}x{}: {}", columns, rows, e);
                    return Ok(());
                }
                execute!(stdout(), terminal::Clear(ClearType::All))?;
                log::debug!("resized to {}x{} cells", columns, rows);
            }
            _ => {}
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> anyhow::Result<()> {
        log::trace!("command {:?}", command);
        match command {
            Command::Rotate(ax, ay, az) => self.scene.rotate(ax, ay, az)?,
            Command::Scale(factor) => self.scene.scale(factor)?,
            Command::Translate(offset) => self.scene.translate(offset)?,
            Command::MoveCamera(delta) => self.camera.position += delta,
            Command::Reset => self.scene.reset(),
            Command::Quit => self.running = false,
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        match self.scene.render_frame(&mut self.surface, &self.camera) {
            Ok(stats) => self.last_stats = stats,
            // camera moved onto its target: keep the last frame
            Err(gouraud_core::RenderError::Projection(e)) => log::warn!("frame skipped: {}", e),
            Err(e) => return Err(e.into()),
        }
        self.draw_status()
    }

    fn draw_status(&mut self) -> anyhow::Result<()> {
        let p = self.camera.position;
        let out = self.surface.writer_mut();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Gouraud | FPS: {:.1} | tris {} ({} culled) | cam ({:.0}, {:.0}, {:.0}) | \
                 Arrows/C/V=Rotate L/K=Scale T=Move WASDZX=Camera R=Reset Q=Quit",
                self.clock.fps(), self.last_stats.triangles, self.last_stats.culled, p.x, p.y, p.z
            )),
            ResetColor
        )?;
        out.flush()?;
        Ok(())
    }
}
