/// Project, order and draw a frame's geometry
use crate::depth::{merge_sort_by, naive_order, plane_aware_order, resolve_intersections, DepthKey};
use crate::geometry::Geometry;
use crate::projection::{project_geometry, ProjectOptions, ProjectedGeometry};
use crate::render::{render_one, reset_defaults, RenderOptions};
use crate::surface::Surface;

/// Counts for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Geometries handed in
    pub submitted: usize,
    /// Geometries after intersection splitting
    pub fragments: usize,
    /// Dropped as off screen, behind the camera or degenerate
    pub culled: usize,
    pub drawn: usize,
}

/// Project everything, drop what can't be seen, and pair it with its depth key
fn project_visible<'a>(
    geometries: &'a [Geometry],
    options: &ProjectOptions,
) -> Vec<(DepthKey, ProjectedGeometry<'a>)> {
    geometries
        .iter()
        .enumerate()
        .filter_map(|(index, geometry)| {
            let projected = project_geometry(geometry, options);
            if projected.is_none() {
                tracing::trace!(index, kind = geometry.kind(), "culled");
            }
            projected.map(|p| (DepthKey::new(index, geometry, &options.view_pos), p))
        })
        .collect()
}

fn draw_all<'r, 'g: 'r, S, I>(surface: &mut S, ordered: I, render_options: &RenderOptions)
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = &'r ProjectedGeometry<'g>>,
{
    for projected in ordered {
        tracing::trace!(
            kind = projected.geometry_kind(),
            points = projected.screen_points().len(),
            "draw"
        );
        reset_defaults(surface, render_options);
        render_one(surface, projected);
    }
}

/// Painter's algorithm by centroid distance alone.
///
/// Meant for points, labels and lines; polygons are drawn but never split.
pub fn naive_pipeline<S: Surface + ?Sized>(
    geometries: &[Geometry],
    project_options: &ProjectOptions,
    surface: &mut S,
    render_options: &RenderOptions,
) -> FrameStats {
    let mut visible = project_visible(geometries, project_options);
    visible.sort_by(|(a, _), (b, _)| naive_order(a, b));
    draw_all(surface, visible.iter().map(|(_, p)| p), render_options);

    let stats = FrameStats {
        submitted: geometries.len(),
        fragments: geometries.len(),
        culled: geometries.len() - visible.len(),
        drawn: visible.len(),
    };
    tracing::debug!(?stats, "naive pipeline frame");
    stats
}

/// Painter's algorithm with intersecting polygons split apart and polygon pairs
/// ordered through their planes.
pub fn full_pipeline<S: Surface + ?Sized>(
    geometries: &[Geometry],
    project_options: &ProjectOptions,
    surface: &mut S,
    render_options: &RenderOptions,
) -> FrameStats {
    let resolved = resolve_intersections(geometries);
    let visible = project_visible(&resolved, project_options);
    let (keys, projected): (Vec<DepthKey>, Vec<ProjectedGeometry<'_>>) =
        visible.into_iter().unzip();

    let view_pos = project_options.view_pos;
    let order = merge_sort_by((0..keys.len()).collect(), &mut |&a: &usize, &b: &usize| {
        plane_aware_order(&view_pos, &keys[a], &keys[b])
    });
    draw_all(surface, order.iter().map(|&i| &projected[i]), render_options);

    let stats = FrameStats {
        submitted: geometries.len(),
        fragments: resolved.len(),
        culled: resolved.len() - projected.len(),
        drawn: projected.len(),
    };
    tracing::debug!(?stats, "full pipeline frame");
    stats
}
