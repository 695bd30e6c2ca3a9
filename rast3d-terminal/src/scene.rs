/// Demo scene shown by the terminal app
use rast3d_core::{
    style::PathStyle, Caption, Color, Geometry, Label, LineString, LineStringItem, LinearGradient,
    Paint, Polygon, Style, Vec2, Vec3,
};

/// Two triangles cutting through each other over a floor, with labelled axes and a
/// colour-switching ring. `line_size` scales every stroke.
pub fn demo_scene(line_size: f64) -> Vec<Geometry> {
    let mut scene: Vec<Geometry> = vec![
        Polygon::triangle(
            Vec3::new(-1.5, -1.0, 0.0),
            Vec3::new(1.5, -1.0, 0.0),
            Vec3::new(0.0, 1.5, 0.0),
        )
        .with_fill(Color::rgb(220, 60, 60))
        .into(),
        Polygon::triangle(
            Vec3::new(0.0, -1.2, -1.5),
            Vec3::new(0.0, -1.2, 1.5),
            Vec3::new(0.0, 1.2, 0.0),
        )
        .with_fill(Color::rgb(60, 90, 220))
        .into(),
        Polygon::triangle(
            Vec3::new(-2.0, -1.5, -2.0),
            Vec3::new(2.0, -1.5, -2.0),
            Vec3::new(2.0, -1.5, 2.0),
        )
        .with_fill(Color::rgb(70, 70, 70))
        .into(),
        Polygon::triangle(
            Vec3::new(-2.0, -1.5, -2.0),
            Vec3::new(2.0, -1.5, 2.0),
            Vec3::new(-2.0, -1.5, 2.0),
        )
        .with_fill(Color::rgb(90, 90, 90))
        .into(),
    ];

    for (axis, color, name) in [
        (Vec3::x(), Color::RED, "x"),
        (Vec3::y(), Color::GREEN, "y"),
        (Vec3::z(), Color::BLUE, "z"),
    ] {
        let tip = axis * 2.5;
        scene.push(
            Geometry::line(Vec3::zeros(), tip)
                .with_stroke(color)
                .with_width(line_size)
                .into(),
        );
        scene.push(Label::new(tip * 1.1, Caption::new(name).with_fill(color)).into());
    }

    let ring = [
        (Vec3::new(-2.0, 1.8, -2.0), Color::RED),
        (Vec3::new(2.0, 1.8, -2.0), Color::GREEN),
        (Vec3::new(2.0, 1.8, 2.0), Color::BLUE),
        (Vec3::new(-2.0, 1.8, 2.0), Color::WHITE),
        (Vec3::new(-2.0, 1.8, -2.0), Color::RED),
    ];
    let items = ring
        .iter()
        .map(|&(point, color)| LineStringItem::new(point).with_stroke(color).with_width(line_size))
        .collect();
    if let Ok(ring) = LineString::new(items) {
        scene.push(ring.into());
    }

    let gradient: PathStyle = Style::computed(|path: &[Vec2]| match (path.first(), path.last()) {
        (Some(start), Some(end)) => LinearGradient::new(*start, *end)
            .with_stop(0.0, Color::rgb(255, 200, 0))
            .with_stop(1.0, Color::rgb(200, 0, 255))
            .into(),
        _ => Paint::default(),
    });
    scene.push(
        Geometry::line(Vec3::new(-2.0, -1.4, 2.0), Vec3::new(2.0, 1.4, -2.0))
            .with_stroke(gradient)
            .with_width(line_size)
            .into(),
    );

    scene.push(
        Geometry::point(Vec3::zeros())
            .with_radius(1.0)
            .with_fill(Color::WHITE)
            .with_label(Caption::new("origin").with_max_width(12.0))
            .into(),
    );
    scene
}
