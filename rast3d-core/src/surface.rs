/// The 2D drawing surface the pipeline paints onto
use crate::math::Vec2;
use crate::style::Paint;

/// A canvas-like immediate-mode drawing target.
///
/// This is the pipeline's only side effect. Path calls build up a current path that
/// `fill` and `stroke` consume; state setters persist until changed.
pub trait Surface {
    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);

    fn begin_path(&mut self);
    fn move_to(&mut self, to: Vec2);
    fn line_to(&mut self, to: Vec2);
    fn close_path(&mut self);
    /// Add a circular arc around `center`, angles in radians
    fn arc(&mut self, center: Vec2, radius: f64, start_angle: f64, end_angle: f64);

    fn fill(&mut self);
    fn stroke(&mut self);

    /// Width `text` would take in the current font
    fn measure_text(&mut self, text: &str) -> f64;
    /// Draw `text` with its left baseline at `at`, squeezed into `max_width` if given
    fn fill_text(&mut self, text: &str, at: Vec2, max_width: Option<f64>);
}

/// One call made on a [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetFill(Paint),
    SetStroke(Paint),
    SetLineWidth(f64),
    SetFont(String),
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    ClosePath,
    Arc {
        center: Vec2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Fill,
    Stroke,
    MeasureText(String),
    FillText {
        text: String,
        at: Vec2,
        max_width: Option<f64>,
    },
}

/// A surface that records every call, for headless rendering and inspection
#[derive(Debug, Clone)]
pub struct Recorder {
    pub commands: Vec<Command>,
    /// Width of one character when measuring text
    pub char_width: f64,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            char_width: 6.0,
        }
    }

    /// Every `fill` or `stroke`, in order, with the paint in effect at the time
    pub fn draws(&self) -> Vec<(Command, Paint)> {
        let mut fill = Paint::default();
        let mut stroke = Paint::default();
        let mut draws = Vec::new();
        for command in &self.commands {
            match command {
                Command::SetFill(paint) => fill = paint.clone(),
                Command::SetStroke(paint) => stroke = paint.clone(),
                Command::Fill => draws.push((Command::Fill, fill.clone())),
                Command::Stroke => draws.push((Command::Stroke, stroke.clone())),
                Command::FillText { .. } => draws.push((command.clone(), fill.clone())),
                _ => {}
            }
        }
        draws
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Recorder {
    fn set_fill(&mut self, paint: &Paint) {
        self.commands.push(Command::SetFill(paint.clone()));
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.commands.push(Command::SetStroke(paint.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(Command::SetLineWidth(width));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(Command::SetFont(font.to_string()));
    }

    fn begin_path(&mut self) {
        self.commands.push(Command::BeginPath);
    }

    fn move_to(&mut self, to: Vec2) {
        self.commands.push(Command::MoveTo(to));
    }

    fn line_to(&mut self, to: Vec2) {
        self.commands.push(Command::LineTo(to));
    }

    fn close_path(&mut self) {
        self.commands.push(Command::ClosePath);
    }

    fn arc(&mut self, center: Vec2, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(Command::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn fill(&mut self) {
        self.commands.push(Command::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(Command::Stroke);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.commands.push(Command::MeasureText(text.to_string()));
        text.chars().count() as f64 * self.char_width
    }

    fn fill_text(&mut self, text: &str, at: Vec2, max_width: Option<f64>) {
        self.commands.push(Command::FillText {
            text: text.to_string(),
            at,
            max_width,
        });
    }
}
