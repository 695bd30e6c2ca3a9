/// Issue drawing calls for projected geometry
use std::f64::consts::TAU;

use crate::geometry::{Caption, LineString};
use crate::math::Vec2;
use crate::projection::ProjectedGeometry;
use crate::style::{Color, Paint};
use crate::surface::Surface;

/// Surface state every geometry starts from
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub default_fill: Paint,
    pub default_stroke: Paint,
    pub default_font: String,
    pub default_line_width: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_fill: Paint::Solid(Color::WHITE),
            default_stroke: Paint::Solid(Color::WHITE),
            default_font: "10px sans-serif".to_string(),
            default_line_width: 1.0,
        }
    }
}

/// Put the surface back to the defaults so styles don't leak between geometries
pub fn reset_defaults<S: Surface + ?Sized>(surface: &mut S, options: &RenderOptions) {
    surface.set_fill(&options.default_fill);
    surface.set_stroke(&options.default_stroke);
    surface.set_font(&options.default_font);
    surface.set_line_width(options.default_line_width);
}

/// Draw one projected geometry with the surface's current state as the fallback style
pub fn render_one<S: Surface + ?Sized>(surface: &mut S, projected: &ProjectedGeometry<'_>) {
    match projected {
        ProjectedGeometry::Point { point, at } => {
            if let Some(fill) = &point.fill {
                surface.set_fill(&fill.resolve(at));
            }
            surface.begin_path();
            surface.arc(*at, point.radius.unwrap_or(1.0), 0.0, TAU);
            surface.fill();
            if let Some(caption) = &point.label {
                render_caption(surface, caption, at);
            }
        }
        ProjectedGeometry::Label { label, at } => render_caption(surface, &label.caption, at),
        ProjectedGeometry::Line { line, path } => {
            if let Some(width) = line.width {
                surface.set_line_width(width);
            }
            if let Some(stroke) = &line.stroke {
                surface.set_stroke(&stroke.resolve(path.as_slice()));
            }
            trace_path(surface, path);
            surface.stroke();
        }
        ProjectedGeometry::LineString { line, path } => render_line_string(surface, line, path),
        ProjectedGeometry::Polygon { polygon, path } => {
            if let Some(fill) = polygon.fill() {
                surface.set_fill(&fill.resolve(path.as_slice()));
            }
            trace_path(surface, path);
            surface.close_path();
            surface.fill();
        }
    }
}

fn trace_path<S: Surface + ?Sized>(surface: &mut S, path: &[Vec2]) {
    surface.begin_path();
    if let Some((first, rest)) = path.split_first() {
        surface.move_to(*first);
        for point in rest {
            surface.line_to(*point);
        }
    }
}

/// Text horizontally centred on `at`
fn render_caption<S: Surface + ?Sized>(surface: &mut S, caption: &Caption, at: &Vec2) {
    if let Some(font) = &caption.font {
        surface.set_font(&font.resolve(at));
    }
    if let Some(fill) = &caption.fill {
        surface.set_fill(&fill.resolve(at));
    }
    let width = surface.measure_text(&caption.text);
    let drawn = caption.max_width.map_or(width, |max| width.min(max));
    surface.fill_text(
        &caption.text,
        Vec2::new(at.x - drawn / 2.0, at.y),
        caption.max_width,
    );
}

/// A polyline whose items may switch colour or width.
///
/// An item's overrides take effect on the segment ending at it. Whenever the state
/// actually changes, the path so far is stroked and a new one starts at the previous
/// vertex.
fn render_line_string<S: Surface + ?Sized>(surface: &mut S, line: &LineString, path: &[Vec2]) {
    let mut stroke: Option<Color> = None;
    let mut width: Option<f64> = None;

    for (i, (item, point)) in line.items.iter().zip(path).enumerate() {
        let new_stroke = item.stroke.filter(|s| stroke != Some(*s));
        let new_width = item.width.filter(|w| width != Some(*w));
        let changed = new_stroke.is_some() || new_width.is_some();

        if i > 0 && changed {
            surface.stroke();
        }
        if let Some(color) = new_stroke {
            surface.set_stroke(&Paint::Solid(color));
            stroke = Some(color);
        }
        if let Some(w) = new_width {
            surface.set_line_width(w);
            width = Some(w);
        }

        if i == 0 {
            surface.begin_path();
            surface.move_to(*point);
        } else {
            if changed {
                surface.begin_path();
                surface.move_to(path[i - 1]);
            }
            surface.line_to(*point);
        }
    }
    surface.stroke();
}
