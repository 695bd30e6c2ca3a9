/// Terminal host for the painter's-algorithm renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use rast3d_core::{
    full_pipeline,
    settings::{FOV, LINE_SIZE, SPEED},
    FrameStats, ParamConfig, RenderOptions,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod canvas;
pub mod orbit;
pub mod scene;

pub use canvas::CharCanvas;
pub use orbit::Orbit;

/// Radians per key press
const ROTATE_STEP: f64 = 0.1;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    params: ParamConfig,
    orbit: Orbit,
    canvas: CharCanvas,
    render_options: RenderOptions,
    paused: bool,
    running: bool,
    last_frame: Instant,
    last_update: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(params: ParamConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            params,
            orbit: Orbit {
                pitch: 0.35,
                ..Orbit::default()
            },
            canvas: CharCanvas::new(width as usize, height as usize),
            render_options: RenderOptions::default(),
            paused: false,
            running: true,
            last_frame: Instant::now(),
            last_update: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        tracing::info!(params = %self.params.to_share_string(), "starting terminal renderer");
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        tracing::info!(params = %self.params.to_share_string(), "terminal renderer stopped");
        result
    }

    /// Current parameters, for sharing on exit
    pub fn params(&self) -> &ParamConfig {
        &self.params
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.canvas = CharCanvas::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let nudged = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                Ok(())
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.orbit.rotate(0.0, ROTATE_STEP);
                Ok(())
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.orbit.rotate(0.0, -ROTATE_STEP);
                Ok(())
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.orbit.rotate(-ROTATE_STEP, 0.0);
                Ok(())
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.orbit.rotate(ROTATE_STEP, 0.0);
                Ok(())
            }
            KeyCode::Char('p') => {
                self.paused = !self.paused;
                Ok(())
            }
            KeyCode::Char('r') => {
                self.params.reset();
                Ok(())
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.params.nudge(FOV, 1).map(drop),
            KeyCode::Char('-') => self.params.nudge(FOV, -1).map(drop),
            KeyCode::Char(']') => self.params.nudge(LINE_SIZE, 1).map(drop),
            KeyCode::Char('[') => self.params.nudge(LINE_SIZE, -1).map(drop),
            _ => Ok(()),
        };
        if let Err(e) = nudged {
            tracing::warn!(error = %e, "parameter update failed");
        }
    }

    /// Auto-rotation, scaled by the speed parameter (degrees per second)
    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f64();
        self.last_update = now;
        if !self.paused {
            let speed = self.params.get(SPEED).unwrap_or(10.0);
            self.orbit.rotate(speed.to_radians() * dt, 0.0);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let fov = self.params.get(FOV).unwrap_or(1.0);
        let line_size = self.params.get(LINE_SIZE).unwrap_or(1.0);
        let project_options = self.orbit.project_options(fov, self.canvas.screen_dim());
        let geometries = scene::demo_scene(line_size);

        self.canvas.clear();
        self.stats = full_pipeline(
            &geometries,
            &project_options,
            &mut self.canvas,
            &self.render_options,
        );

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "rast3d | FPS: {:.1} | drawn {}/{} | {}{} | WASD/Arrows=Orbit +/-=FOV [/]=Line P=Pause R=Reset Q=Quit",
                self.fps,
                self.stats.drawn,
                self.stats.fragments,
                self.params.to_share_string(),
                if self.paused { " (paused)" } else { "" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
