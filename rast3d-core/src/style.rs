/// Colours, paints and styles that may depend on where a geometry lands on screen
use std::fmt;
use std::sync::Arc;

use crate::math::Vec2;

/// An sRGB colour with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise blend, `t = 0` gives `self`
    pub fn mix(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgba(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
            lerp(self.a, other.a),
        )
    }
}

impl fmt::Display for Color {
    /// CSS form, e.g. `rgba(255, 255, 255, 1)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

/// A linear gradient anchored to two screen-space points
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    /// `(offset, colour)` pairs with offsets in `0..=1`, ascending
    pub stops: Vec<(f64, Color)>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }

    /// Colour of the gradient at a screen position
    pub fn color_at(&self, at: &Vec2) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::rgba(0, 0, 0, 0),
        };

        let axis = self.end - self.start;
        let len_sq = axis.norm_squared();
        let t = if len_sq > 0.0 {
            (at - self.start).dot(&axis) / len_sq
        } else {
            0.0
        };

        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        self.stops
            .windows(2)
            .find(|pair| t <= pair[1].0)
            .map(|pair| {
                let span = pair[1].0 - pair[0].0;
                let local = if span > 0.0 { (t - pair[0].0) / span } else { 1.0 };
                pair[0].1.mix(&pair[1].1, local)
            })
            .unwrap_or(last.1)
    }
}

/// What a fill or stroke is painted with
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
}

impl Paint {
    /// Colour of the paint at a screen position
    pub fn color_at(&self, at: &Vec2) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear(gradient) => gradient.color_at(at),
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::WHITE)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<LinearGradient> for Paint {
    fn from(gradient: LinearGradient) -> Self {
        Paint::Linear(gradient)
    }
}

/// A style value, either fixed or computed from the projected geometry.
///
/// `A` is what the geometry projects to (`Vec2` for points and labels, `[Vec2]` for
/// paths). Computed styles must be pure; they run once per draw.
pub enum Style<A: ?Sized, V = Paint> {
    Static(V),
    Computed(Arc<dyn Fn(&A) -> V + Send + Sync>),
}

impl<A: ?Sized, V: Clone> Style<A, V> {
    pub fn computed(f: impl Fn(&A) -> V + Send + Sync + 'static) -> Self {
        Style::Computed(Arc::new(f))
    }

    pub fn resolve(&self, projected: &A) -> V {
        match self {
            Style::Static(value) => value.clone(),
            Style::Computed(f) => f(projected),
        }
    }
}

impl<A: ?Sized, V: Clone> Clone for Style<A, V> {
    fn clone(&self) -> Self {
        match self {
            Style::Static(value) => Style::Static(value.clone()),
            Style::Computed(f) => Style::Computed(Arc::clone(f)),
        }
    }
}

impl<A: ?Sized, V: fmt::Debug> fmt::Debug for Style<A, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Style::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<A: ?Sized> From<Color> for Style<A, Paint> {
    fn from(color: Color) -> Self {
        Style::Static(Paint::Solid(color))
    }
}

impl<A: ?Sized> From<Paint> for Style<A, Paint> {
    fn from(paint: Paint) -> Self {
        Style::Static(paint)
    }
}

impl<A: ?Sized> From<&str> for Style<A, String> {
    fn from(font: &str) -> Self {
        Style::Static(font.to_string())
    }
}

/// Fill or stroke style for a single projected point
pub type PointStyle = Style<Vec2, Paint>;
/// Fill or stroke style for a projected path
pub type PathStyle = Style<[Vec2], Paint>;
/// Font for text anchored at a projected point
pub type FontStyle = Style<Vec2, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_computed_resolve() {
        let fixed: PointStyle = Color::RED.into();
        assert_eq!(fixed.resolve(&Vec2::new(3.0, 4.0)), Paint::Solid(Color::RED));

        let by_height: PointStyle = Style::computed(|at: &Vec2| {
            if at.y > 100.0 {
                Color::BLUE.into()
            } else {
                Color::GREEN.into()
            }
        });
        assert_eq!(by_height.resolve(&Vec2::new(0.0, 150.0)), Paint::Solid(Color::BLUE));
        assert_eq!(by_height.resolve(&Vec2::new(0.0, 50.0)), Paint::Solid(Color::GREEN));
    }

    #[test]
    fn test_path_style_sees_whole_path() {
        let style: PathStyle = Style::computed(|path: &[Vec2]| {
            LinearGradient::new(path[0], path[path.len() - 1])
                .with_stop(0.0, Color::BLACK)
                .with_stop(1.0, Color::WHITE)
                .into()
        });
        let path = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        match style.resolve(&path[..]) {
            Paint::Linear(gradient) => {
                assert_eq!(gradient.start, path[0]);
                assert_eq!(gradient.end, path[1]);
            }
            other => panic!("expected a gradient, got {:?}", other),
        }
    }

    #[test]
    fn test_gradient_color_at() {
        let gradient = LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0))
            .with_stop(0.0, Color::BLACK)
            .with_stop(1.0, Color::WHITE);
        assert_eq!(gradient.color_at(&Vec2::new(-5.0, 0.0)), Color::BLACK);
        assert_eq!(gradient.color_at(&Vec2::new(20.0, 3.0)), Color::WHITE);
        assert_eq!(
            gradient.color_at(&Vec2::new(5.0, 7.0)),
            Color::rgb(128, 128, 128)
        );
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::WHITE.to_string(), "rgba(255, 255, 255, 1)");
    }
}
