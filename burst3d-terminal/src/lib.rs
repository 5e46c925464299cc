/// Terminal shell: keyboard hand simulation and ASCII rendering
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use burst3d_core::{
    Camera, Engine, FrameSnapshot, HandPose, Mesh, Navigator, ProjectionMode, RedirectPhase, SceneConfig,
    Transform,
};

pub mod hand;
pub mod renderer;
pub mod worker;

pub use hand::{SimulatedHand, DEMO_SCRIPT};
pub use renderer::AsciiRenderer;
pub use worker::DetectionWorker;

use renderer::{DUST_GLYPH, GLOW_GLYPH, PHOTO_GLYPH};

/// Rows reserved for the status overlay
const HUD_ROWS: u16 = 2;
const MOVE_STEP: f32 = 0.03;
const SPAN_STEP: f32 = 0.02;

/// Load a TOML scene config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<SceneConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => {
            info!("no config given, using defaults");
            SceneConfig::default()
        }
    };
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

/// Remembers where the session asked to go; the terminal cannot open it.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    destination: Option<String>,
}

impl TerminalNavigator {
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&mut self, destination: &str) {
        info!(destination, "navigation requested");
        self.destination = Some(destination.to_string());
    }
}

/// Main application struct for the terminal session
pub struct TerminalApp {
    engine: Engine,
    hand: SimulatedHand,
    worker: DetectionWorker,
    mesh: Mesh,
    camera: Camera,
    renderer: AsciiRenderer,
    navigator: TerminalNavigator,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        let height = height.saturating_sub(HUD_ROWS).max(1);

        let mesh = Mesh::ring(
            config.ambient.ring_inner,
            config.ambient.ring_outer,
            config.ambient.ring_thickness,
            48,
        );
        let worker = DetectionWorker::spawn(config.controls.clone())?;

        Ok(Self {
            engine: Engine::new(config),
            hand: SimulatedHand::new(),
            worker,
            mesh,
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            navigator: TerminalNavigator::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Run until the user quits or the session redirects. Returns the
    /// redirect destination, if one fired.
    pub fn run(&mut self) -> Result<Option<String>> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        if matches!(self.engine.redirect_phase(), RedirectPhase::Armed { .. }) {
            warn!("session closed with redirect pending");
        }
        self.engine.dispose();

        result.map(|()| self.navigator.destination().map(str::to_string))
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            let dt = (frame_start - previous).as_secs_f32();
            previous = frame_start;
            let snapshot = self.update(dt);

            self.render(&snapshot)?;

            if self.navigator.destination().is_some() {
                self.running = false;
            }

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => self.handle_key(code),
            Event::Resize(width, height) => {
                let height = height.saturating_sub(HUD_ROWS).max(1);
                self.renderer.resize(width as usize, height as usize);
                self.camera.set_aspect(width as u32, height as u32);
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('o') => self.hand.set_pose(HandPose::OpenPalm),
            KeyCode::Char('f') => self.hand.set_pose(HandPose::Fist),
            KeyCode::Char('1') => self.hand.set_pose(HandPose::One),
            KeyCode::Char('h') => self.hand.toggle_presence(),
            KeyCode::Char('p') => {
                self.camera.mode = match self.camera.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
            }
            KeyCode::Left => self.hand.nudge(-MOVE_STEP, 0.0),
            KeyCode::Right => self.hand.nudge(MOVE_STEP, 0.0),
            KeyCode::Up => self.hand.nudge(0.0, -MOVE_STEP),
            KeyCode::Down => self.hand.nudge(0.0, MOVE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.hand.resize(SPAN_STEP),
            KeyCode::Char('-') => self.hand.resize(-SPAN_STEP),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32) -> FrameSnapshot {
        self.worker.offer(self.hand.sample());
        for observation in self.worker.drain() {
            self.engine.submit_observation(observation);
        }
        self.engine.tick(dt, &mut self.navigator)
    }

    fn render(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        self.camera.set_distance(snapshot.rig.camera_distance);
        let model = Transform::rotation_matrix(&snapshot.rig.rotation);

        self.renderer.clear();

        let solid = &snapshot.layers.solid;
        if solid.visible {
            self.renderer.render_mesh(&self.mesh, &model, &self.camera, solid.opacity);
        }
        for particle in snapshot.layers.ambient.iter().filter(|p| p.scale > 0.0) {
            self.renderer.plot_point(&particle.position, &model, &self.camera, DUST_GLYPH);
        }
        for photo in &snapshot.layers.photos {
            let glyph = if photo.texture_visible { PHOTO_GLYPH } else { GLOW_GLYPH };
            self.renderer.plot_point(&photo.position, &model, &self.camera, glyph);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let (_, rows) = self.renderer.size();
        let state = &snapshot.state;
        let redirect = if state.is_redirecting {
            format!("REDIRECTING {:>3.0}%", snapshot.redirect_progress * 100.0)
        } else {
            snapshot.redirect.label().to_uppercase()
        };
        queue!(
            stdout,
            cursor::MoveTo(0, rows as u16),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Gesture: {} | Mode: {} | Redirect: {} | Hand: {} | Dist: {:.1} | FPS: {:.1} | Dropped: {}",
                state.gesture.label(),
                state.visual_mode(),
                redirect,
                self.hand.label(),
                state.camera_distance,
                self.fps,
                self.worker.dropped(),
            )),
            cursor::MoveTo(0, rows as u16 + 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print("o=Open palm f=Fist 1=One h=Hide hand Arrows=Move +/-=Size p=Projection q=Quit"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
