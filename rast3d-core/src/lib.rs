/// rast3d core library - software 3D projection and painter's-algorithm rendering
///
/// Geometry is projected with a custom perspective projection, ordered back to front
/// (splitting polygons that cut through each other) and drawn through the `Surface`
/// trait. No GPU and no depth buffer are involved.

pub mod depth;
pub mod geometry;
pub mod math;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod settings;
pub mod style;
pub mod surface;

// Re-export commonly used types
pub use geometry::{Caption, Geometry, GeometryError, Label, Line, LineString, LineStringItem, Point, Polygon};
pub use math::{Vec2, Vec3};
pub use pipeline::{full_pipeline, naive_pipeline, FrameStats};
pub use projection::{project, project_geometry, ProjectOptions, ProjectedGeometry, Projection};
pub use render::RenderOptions;
pub use settings::{ConfigError, ParamConfig, ParamSpec};
pub use style::{Color, LinearGradient, Paint, Style};
pub use surface::{Recorder, Surface};
