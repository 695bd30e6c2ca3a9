/// Renderable geometry primitives
use crate::math::{centroid, Plane, Vec3};
use crate::style::{Color, FontStyle, PathStyle, PointStyle};

/// Errors raised while constructing geometry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{kind} needs at least {min} points, got {got}")]
    TooFewPoints {
        kind: &'static str,
        min: usize,
        got: usize,
    },
}

/// Text drawn at a projected position
#[derive(Debug, Clone)]
pub struct Caption {
    pub text: String,
    pub max_width: Option<f64>,
    pub fill: Option<PointStyle>,
    pub font: Option<FontStyle>,
}

impl Caption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_width: None,
            fill: None,
            font: None,
        }
    }

    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<PointStyle>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_font(mut self, font: impl Into<FontStyle>) -> Self {
        self.font = Some(font.into());
        self
    }
}

/// A filled dot, optionally captioned
#[derive(Debug, Clone)]
pub struct Point {
    pub point: Vec3,
    pub radius: Option<f64>,
    pub fill: Option<PointStyle>,
    pub label: Option<Caption>,
}

impl Point {
    pub fn new(point: Vec3) -> Self {
        Self {
            point,
            radius: None,
            fill: None,
            label: None,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<PointStyle>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_label(mut self, label: Caption) -> Self {
        self.label = Some(label);
        self
    }
}

/// Free-standing text anchored to a 3D position
#[derive(Debug, Clone)]
pub struct Label {
    pub point: Vec3,
    pub caption: Caption,
}

impl Label {
    pub fn new(point: Vec3, caption: Caption) -> Self {
        Self { point, caption }
    }
}

/// An open polyline drawn with one stroke
#[derive(Debug, Clone)]
pub struct Line {
    pub points: Vec<Vec3>,
    pub width: Option<f64>,
    pub stroke: Option<PathStyle>,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            points: vec![start, end],
            width: None,
            stroke: None,
        }
    }

    /// A polyline through two or more points
    pub fn strip(points: Vec<Vec3>) -> Result<Self, GeometryError> {
        check_len("Line", 2, points.len())?;
        Ok(Self {
            points,
            width: None,
            stroke: None,
        })
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<PathStyle>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }
}

/// One vertex of a [`LineString`]; its overrides apply from this vertex onwards
#[derive(Debug, Clone, PartialEq)]
pub struct LineStringItem {
    pub point: Vec3,
    pub width: Option<f64>,
    pub stroke: Option<Color>,
}

impl LineStringItem {
    pub fn new(point: Vec3) -> Self {
        Self {
            point,
            width: None,
            stroke: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// A polyline whose width and colour may change part way along
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    pub items: Vec<LineStringItem>,
}

impl LineString {
    pub fn new(items: Vec<LineStringItem>) -> Result<Self, GeometryError> {
        check_len("LineString", 2, items.len())?;
        Ok(Self { items })
    }

    pub fn points(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.items.iter().map(|item| &item.point)
    }
}

/// A filled, planar, implicitly closed loop.
///
/// Always holds at least three points.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Vec3>,
    fill: Option<PathStyle>,
}

impl Polygon {
    pub fn new(points: Vec<Vec3>) -> Result<Self, GeometryError> {
        check_len("Polygon", 3, points.len())?;
        Ok(Self { points, fill: None })
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            points: vec![a, b, c],
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<PathStyle>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// A piece of this polygon sharing its style
    pub fn fragment(&self, points: Vec<Vec3>) -> Result<Self, GeometryError> {
        check_len("Polygon", 3, points.len())?;
        Ok(Self {
            points,
            fill: self.fill.clone(),
        })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn fill(&self) -> Option<&PathStyle> {
        self.fill.as_ref()
    }

    pub fn plane(&self) -> Plane {
        Plane::from_loop(&self.points)
    }
}

/// Anything the pipeline can draw
#[derive(Debug, Clone)]
pub enum Geometry {
    Point(Point),
    Label(Label),
    Line(Line),
    LineString(LineString),
    Polygon(Polygon),
}

impl Geometry {
    pub fn point(point: Vec3) -> Point {
        Point::new(point)
    }

    pub fn line(start: Vec3, end: Vec3) -> Line {
        Line::new(start, end)
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Polygon {
        Polygon::triangle(a, b, c)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Label(_) => "Label",
            Geometry::Line(_) => "Line",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }

    /// The 3D control points, in order
    pub fn control_points(&self) -> Vec<Vec3> {
        match self {
            Geometry::Point(p) => vec![p.point],
            Geometry::Label(l) => vec![l.point],
            Geometry::Line(l) => l.points.clone(),
            Geometry::LineString(ls) => ls.points().copied().collect(),
            Geometry::Polygon(p) => p.points.clone(),
        }
    }

    /// The point depth is measured from: the point itself or the centroid
    pub fn representative_point(&self) -> Vec3 {
        match self {
            Geometry::Point(p) => p.point,
            Geometry::Label(l) => l.point,
            Geometry::Line(l) => centroid(&l.points),
            Geometry::LineString(_) => centroid(&self.control_points()),
            Geometry::Polygon(p) => centroid(&p.points),
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<Label> for Geometry {
    fn from(label: Label) -> Self {
        Geometry::Label(label)
    }
}

impl From<Line> for Geometry {
    fn from(line: Line) -> Self {
        Geometry::Line(line)
    }
}

impl From<LineString> for Geometry {
    fn from(line_string: LineString) -> Self {
        Geometry::LineString(line_string)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

fn check_len(kind: &'static str, min: usize, got: usize) -> Result<(), GeometryError> {
    if got < min {
        return Err(GeometryError::TooFewPoints { kind, min, got });
    }
    Ok(())
}
