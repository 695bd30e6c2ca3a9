/// Character-grid drawing surface for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use rast3d_core::{Paint, Surface, Vec2};
use std::io::Write;

/// Character luminosity ramp for fills (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// Segments used to approximate a full circle
const ARC_SEGMENTS: usize = 24;

/// Slack around the screen, in pixels, that strokes are clipped to
const CLIP_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

#[derive(Debug, Clone, Default)]
struct Subpath {
    points: Vec<Vec2>,
    closed: bool,
}

/// A [`Surface`] that paints into a grid of coloured characters.
///
/// Pixel space is one unit per column and `CELL_ASPECT` units per row, so square
/// things stay square. Later draws overwrite earlier ones; there is no depth buffer.
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    fill: Paint,
    stroke: Paint,
    line_width: f64,
    path: Vec<Subpath>,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
            fill: Paint::default(),
            stroke: Paint::default(),
            line_width: 1.0,
            path: Vec::new(),
        }
    }

    /// Size of the drawable area in pixel units
    pub fn screen_dim(&self) -> Vec2 {
        Vec2::new(self.width as f64, self.height as f64 * CELL_ASPECT)
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
        self.path.clear();
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.cells[row * self.width + col].ch)
    }

    /// Row `row` as a string
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|cell| cell.ch)
            .collect()
    }

    fn put(&mut self, col: i64, row: i64, cell: Cell) {
        if col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height {
            self.cells[row as usize * self.width + col as usize] = cell;
        }
    }

    fn current_subpath(&mut self) -> &mut Subpath {
        if self.path.last().map_or(true, |sub| sub.closed) {
            let start = self.path.last().and_then(|sub| sub.points.first().copied());
            self.path.push(Subpath {
                points: start.into_iter().collect(),
                closed: false,
            });
        }
        let last = self.path.len() - 1;
        &mut self.path[last]
    }

    /// Even-odd test against every subpath, each implicitly closed
    fn path_contains(&self, p: &Vec2) -> bool {
        let mut inside = false;
        for sub in &self.path {
            let n = sub.points.len();
            for i in 0..n {
                let a = sub.points[i];
                let b = sub.points[(i + 1) % n];
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if p.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    fn stroke_segment(&mut self, a: Vec2, b: Vec2) {
        // Vertices just ahead of the camera can land billions of pixels away
        let margin = Vec2::repeat(CLIP_MARGIN);
        let Some((a, b)) = clip_segment(a, b, -margin, self.screen_dim() + margin) else {
            return;
        };
        let delta = b - a;
        let ch = if self.line_width >= 3.0 {
            '#'
        } else {
            stroke_char(&delta)
        };
        // Walk in half-cell steps so no cell along the way is skipped
        let steps = (delta.x.abs().max(delta.y.abs() / CELL_ASPECT) * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a + delta * (i as f64 / steps as f64);
            let color = to_terminal_color(&self.stroke, &p);
            self.put(
                p.x.floor() as i64,
                (p.y / CELL_ASPECT).floor() as i64,
                Cell { ch, color },
            );
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.ch))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for CharCanvas {
    fn set_fill(&mut self, paint: &Paint) {
        self.fill = paint.clone();
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.stroke = paint.clone();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_font(&mut self, _font: &str) {
        // Terminal text has a single font
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, to: Vec2) {
        self.path.push(Subpath {
            points: vec![to],
            closed: false,
        });
    }

    fn line_to(&mut self, to: Vec2) {
        self.current_subpath().points.push(to);
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            sub.closed = true;
        }
    }

    fn arc(&mut self, center: Vec2, radius: f64, start_angle: f64, end_angle: f64) {
        let sweep = end_angle - start_angle;
        let segments = ((sweep.abs() / std::f64::consts::TAU) * ARC_SEGMENTS as f64)
            .ceil()
            .max(1.0) as usize;
        let sub = self.current_subpath();
        for i in 0..=segments {
            let angle = start_angle + sweep * (i as f64 / segments as f64);
            sub.points
                .push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
        }
    }

    fn fill(&mut self) {
        let points = self.path.iter().flat_map(|sub| sub.points.iter());
        let (min, max) = points.fold(
            (Vec2::repeat(f64::INFINITY), Vec2::repeat(f64::NEG_INFINITY)),
            |(min, max), p| (min.inf(p), max.sup(p)),
        );
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return;
        }

        // Bounding box in cells, clipped to the screen
        let min_col = (min.x.floor() as i64).max(0);
        let max_col = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let min_row = ((min.y / CELL_ASPECT).floor() as i64).max(0);
        let max_row = ((max.y / CELL_ASPECT).ceil() as i64).min(self.height as i64 - 1);

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let center = Vec2::new(col as f64 + 0.5, (row as f64 + 0.5) * CELL_ASPECT);
                if self.path_contains(&center) {
                    let color = self.fill.color_at(&center);
                    let cell = Cell {
                        ch: luminosity_char(color.r, color.g, color.b),
                        color: Color::Rgb {
                            r: color.r,
                            g: color.g,
                            b: color.b,
                        },
                    };
                    self.put(col, row, cell);
                }
            }
        }
    }

    fn stroke(&mut self) {
        let segments: Vec<(Vec2, Vec2)> = self
            .path
            .iter()
            .flat_map(|sub| {
                let n = sub.points.len();
                let count = if sub.closed && n > 2 { n } else { n.saturating_sub(1) };
                (0..count).map(move |i| (sub.points[i], sub.points[(i + 1) % n]))
            })
            .collect();
        for (a, b) in segments {
            self.stroke_segment(a, b);
        }
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64
    }

    fn fill_text(&mut self, text: &str, at: Vec2, max_width: Option<f64>) {
        let limit = max_width.map_or(usize::MAX, |w| w.max(0.0) as usize);
        let row = (at.y / CELL_ASPECT).floor() as i64;
        let start = at.x.round() as i64;
        for (i, ch) in text.chars().take(limit).enumerate() {
            let p = Vec2::new(start as f64 + i as f64 + 0.5, at.y);
            let color = to_terminal_color(&self.fill, &p);
            self.put(start + i as i64, row, Cell { ch, color });
        }
    }
}

/// Liang-Barsky clip of the segment `a`-`b` to the box `min`..`max`
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    if !(a.iter().chain(b.iter()).all(|c| c.is_finite())) {
        return None;
    }
    let delta = b - a;
    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-delta.x, a.x - min.x),
        (delta.x, max.x - a.x),
        (-delta.y, a.y - min.y),
        (delta.y, max.y - a.y),
    ] {
        if p == 0.0 {
            // Parallel to this edge and outside it
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            enter = enter.max(q / p);
        } else {
            exit = exit.min(q / p);
        }
    }
    (enter <= exit).then(|| (a + delta * enter, a + delta * exit))
}

fn to_terminal_color(paint: &Paint, at: &Vec2) -> Color {
    let color = paint.color_at(at);
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Map brightness to a ramp character
fn luminosity_char(r: u8, g: u8, b: u8) -> char {
    let brightness = (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0;
    let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Pick a line character from a segment's on-screen slope
fn stroke_char(delta: &Vec2) -> char {
    let dx = delta.x;
    let dy = delta.y / CELL_ASPECT;
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}
