/// Perspective projection onto the screen plane
use crate::geometry::{Geometry, Label, Line, LineString, Point, Polygon};
use crate::math::{is_finite, segment_param, Vec2, Vec3, WORLD_UP};

/// Per-frame camera and screen state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectOptions {
    pub view_pos: Vec3,
    /// Unit view direction
    pub dir_norm: Vec3,
    /// Larger values widen the view; the screen plane sits `1 / fov` ahead
    pub fov: f64,
    /// Screen size in pixels
    pub screen_dim: Vec2,
}

impl ProjectOptions {
    pub fn new(view_pos: Vec3, direction: Vec3, fov: f64, screen_dim: Vec2) -> Self {
        Self {
            view_pos,
            dir_norm: direction.normalize(),
            fov,
            screen_dim,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.screen_dim.x / self.screen_dim.y
    }
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::x(), 1.0, Vec2::new(800.0, 600.0))
    }
}

/// Where a point lands on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Pixel coordinate. Only meaningful when `visible`, may be NaN or infinite.
    pub coord: Vec2,
    /// In front of the camera and inside the screen rectangle
    pub visible: bool,
    /// In front of the camera, regardless of the screen rectangle
    pub in_front: bool,
}

/// Project a world-space point to pixel coordinates
pub fn project(point: &Vec3, options: &ProjectOptions) -> Projection {
    let dir_norm = options.dir_norm;
    let offset = point - options.view_pos;
    let in_front = offset.dot(&dir_norm) > 0.0;

    // Ray/plane intersection with the screen plane, in camera-local space
    let screen_center = dir_norm * (1.0 / options.fov);
    let t = screen_center.dot(&dir_norm) / offset.dot(&dir_norm);
    let on_plane = offset * t;

    let x_axis = dir_norm.cross(&WORLD_UP).normalize();
    let y_axis = dir_norm.cross(&x_axis);

    // Measured from the left and top edges respectively
    let (x_t, on_x) = segment_param(
        &(screen_center + x_axis / 2.0),
        &(screen_center - x_axis / 2.0),
        &on_plane,
    );
    let (y_t, on_y) = segment_param(
        &(screen_center + y_axis / 2.0),
        &(screen_center - y_axis / 2.0),
        &on_plane,
    );

    let normalized = Vec2::new((x_t - 0.5) / options.aspect_ratio(), y_t - 0.5);
    let coord = (normalized + Vec2::new(0.5, 0.5)).component_mul(&options.screen_dim);

    Projection {
        coord,
        visible: in_front && on_x && on_y,
        in_front,
    }
}

/// A geometry paired with its screen-space projection
#[derive(Debug, Clone)]
pub enum ProjectedGeometry<'a> {
    Point { point: &'a Point, at: Vec2 },
    Label { label: &'a Label, at: Vec2 },
    Line { line: &'a Line, path: Vec<Vec2> },
    LineString { line: &'a LineString, path: Vec<Vec2> },
    Polygon { polygon: &'a Polygon, path: Vec<Vec2> },
}

impl<'a> ProjectedGeometry<'a> {
    pub fn geometry_kind(&self) -> &'static str {
        match self {
            ProjectedGeometry::Point { .. } => "Point",
            ProjectedGeometry::Label { .. } => "Label",
            ProjectedGeometry::Line { .. } => "Line",
            ProjectedGeometry::LineString { .. } => "LineString",
            ProjectedGeometry::Polygon { .. } => "Polygon",
        }
    }

    /// Every projected screen coordinate, in control-point order
    pub fn screen_points(&self) -> &[Vec2] {
        match self {
            ProjectedGeometry::Point { at, .. } | ProjectedGeometry::Label { at, .. } => {
                std::slice::from_ref(at)
            }
            ProjectedGeometry::Line { path, .. }
            | ProjectedGeometry::LineString { path, .. }
            | ProjectedGeometry::Polygon { path, .. } => path,
        }
    }
}

/// Project a geometry, or `None` when it should not be drawn this frame.
///
/// Single-point geometry must be visible. Paths must have every vertex in front of the
/// camera with a finite coordinate and at least one vertex on screen; the surface clips
/// whatever hangs off the edges.
pub fn project_geometry<'a>(
    geometry: &'a Geometry,
    options: &ProjectOptions,
) -> Option<ProjectedGeometry<'a>> {
    match geometry {
        Geometry::Point(point) => project_single(&point.point, options)
            .map(|at| ProjectedGeometry::Point { point, at }),
        Geometry::Label(label) => project_single(&label.point, options)
            .map(|at| ProjectedGeometry::Label { label, at }),
        Geometry::Line(line) => project_path(line.points.iter(), options)
            .map(|path| ProjectedGeometry::Line { line, path }),
        Geometry::LineString(line) => project_path(line.points(), options)
            .map(|path| ProjectedGeometry::LineString { line, path }),
        Geometry::Polygon(polygon) => project_path(polygon.points().iter(), options)
            .map(|path| ProjectedGeometry::Polygon { polygon, path }),
    }
}

fn project_single(point: &Vec3, options: &ProjectOptions) -> Option<Vec2> {
    let projection = project(point, options);
    (projection.visible && is_finite(&projection.coord)).then_some(projection.coord)
}

fn project_path<'p>(
    points: impl Iterator<Item = &'p Vec3>,
    options: &ProjectOptions,
) -> Option<Vec<Vec2>> {
    let mut any_visible = false;
    let mut path = Vec::new();
    for point in points {
        let projection = project(point, options);
        if !projection.in_front || !is_finite(&projection.coord) {
            return None;
        }
        any_visible |= projection.visible;
        path.push(projection.coord);
    }
    (any_visible && !path.is_empty()).then_some(path)
}
