/// Painter's-algorithm ordering and polygon intersection splitting
use std::cmp::Ordering;

use crate::geometry::{Geometry, Polygon};
use crate::math::{polygon_area, Plane, Vec3};

/// Signed distances within this of a plane count as touching it
pub const INTERSECT_THRESHOLD: f64 = 1e-10;

/// Relative slack when deciding whether a ray hits a plane at a centroid
const COPLANAR_TOLERANCE: f64 = 1e-9;

/// Squared distances from the camera to a geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceMeasure {
    /// To the representative point (the point itself, or the centroid)
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

pub fn sqr_dist(from: &Vec3, geometry: &Geometry) -> DistanceMeasure {
    let (min, max) = geometry
        .control_points()
        .iter()
        .map(|p| (from - p).norm_squared())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| {
            (min.min(d), max.max(d))
        });
    DistanceMeasure {
        avg: (from - geometry.representative_point()).norm_squared(),
        min,
        max,
    }
}

/// Test whether two polygons cut through each other's planes.
///
/// Returns the signed distances of `a`'s vertices to `b`'s plane and of `b`'s vertices
/// to `a`'s plane when both polygons have vertices strictly on both sides.
pub fn intersect_polygons(a: &Polygon, b: &Polygon) -> Option<(Vec<f64>, Vec<f64>)> {
    let a_distances = signed_distances(a, &b.plane());
    let b_distances = signed_distances(b, &a.plane());
    (straddles(&a_distances) && straddles(&b_distances)).then_some((a_distances, b_distances))
}

fn signed_distances(polygon: &Polygon, plane: &Plane) -> Vec<f64> {
    polygon
        .points()
        .iter()
        .map(|p| plane.signed_distance(p))
        .collect()
}

fn straddles(distances: &[f64]) -> bool {
    let below = distances.iter().any(|&d| d < -INTERSECT_THRESHOLD);
    let above = distances.iter().any(|&d| d > INTERSECT_THRESHOLD);
    below && above
}

/// Cut a polygon along the zero crossings of its vertices' signed distances.
///
/// Crossing points are inserted into the boundary and paired up in order along the
/// cut line, which gives the chords lying inside the polygon. Each fragment is then
/// traced by following the boundary and jumping across a chord at every crossing, so
/// concave polygons crossed several times come apart into the right pieces. Returns
/// the polygon unchanged when no edge changes sign.
pub fn cut_polygon(polygon: &Polygon, distances: &[f64]) -> Vec<Polygon> {
    let points = polygon.points();
    let n = points.len();

    // Boundary with the crossings spliced in
    let mut ring: Vec<Vec3> = Vec::with_capacity(n * 2);
    let mut crossings: Vec<usize> = Vec::new();
    for i in 0..n {
        let next = (i + 1) % n;
        ring.push(points[i]);
        if (distances[i] >= 0.0) != (distances[next] >= 0.0) {
            let t = distances[i] / (distances[i] - distances[next]);
            crossings.push(ring.len());
            ring.push(points[i].lerp(&points[next], t));
        }
    }
    if crossings.is_empty() || crossings.len() % 2 != 0 {
        return vec![polygon.clone()];
    }

    // All crossings lie on one line; order them along it
    let origin = ring[crossings[0]];
    let farthest = crossings
        .iter()
        .map(|&c| ring[c])
        .max_by(|a, b| (a - origin).norm_squared().total_cmp(&(b - origin).norm_squared()))
        .unwrap_or(origin);
    let along = farthest - origin;
    let mut sorted = crossings.clone();
    let position = |c: usize| (ring[c] - origin).dot(&along);
    sorted.sort_by(|&a, &b| position(a).total_cmp(&position(b)));

    let mut partner: Vec<Option<usize>> = vec![None; ring.len()];
    for pair in sorted.chunks_exact(2) {
        partner[pair[0]] = Some(pair[1]);
        partner[pair[1]] = Some(pair[0]);
    }

    // Every fragment has at least one original vertex to start from
    let mut visited = vec![false; ring.len()];
    let mut fragments = Vec::new();
    for start in 0..ring.len() {
        if visited[start] || partner[start].is_some() {
            continue;
        }
        let mut piece = Vec::new();
        let mut i = start;
        for _ in 0..ring.len() {
            visited[i] = true;
            piece.push(ring[i]);
            let next = match partner[i] {
                Some(across) => {
                    piece.push(ring[across]);
                    (across + 1) % ring.len()
                }
                None => (i + 1) % ring.len(),
            };
            if next == start {
                break;
            }
            i = next;
        }
        // Slivers left by a cut running along an edge have no area
        let piece = dedup_loop(piece);
        if polygon_area(&piece) <= 0.0 {
            continue;
        }
        if let Ok(fragment) = polygon.fragment(piece) {
            fragments.push(fragment);
        }
    }
    fragments
}

/// Merge consecutive coincident vertices, including across the closing edge
fn dedup_loop(mut points: Vec<Vec3>) -> Vec<Vec3> {
    const COINCIDENT_SQ: f64 = 1e-24;
    points.dedup_by(|b, a| (*a - *b).norm_squared() <= COINCIDENT_SQ);
    while points.len() > 1
        && (points[0] - points[points.len() - 1]).norm_squared() <= COINCIDENT_SQ
    {
        points.pop();
    }
    points
}

/// Split every pair of mutually penetrating polygons into fragments.
///
/// Runs in two phases. First every polygon pair of the input is tested and each
/// polygon collects the planes of the polygons crossing it. Then the list is rebuilt
/// once: a crossed polygon is replaced in place by the pieces left after cutting it by
/// each collected plane in turn. Everything else passes through in order.
pub fn resolve_intersections(geometries: &[Geometry]) -> Vec<Geometry> {
    let mut cutters: Vec<Vec<Plane>> = vec![Vec::new(); geometries.len()];

    for i in 0..geometries.len() {
        for j in (i + 1)..geometries.len() {
            // Pairs involving points, labels or lines are not split
            let (Geometry::Polygon(a), Geometry::Polygon(b)) = (&geometries[i], &geometries[j])
            else {
                continue;
            };
            if intersect_polygons(a, b).is_some() {
                tracing::trace!(i, j, "polygons intersect");
                cutters[i].push(b.plane());
                cutters[j].push(a.plane());
            }
        }
    }

    let mut resolved = Vec::with_capacity(geometries.len());
    for (geometry, planes) in geometries.iter().zip(cutters) {
        match geometry {
            Geometry::Polygon(polygon) if !planes.is_empty() => {
                let fragments = planes.iter().fold(vec![polygon.clone()], |pieces, plane| {
                    pieces
                        .iter()
                        .flat_map(|piece| {
                            let distances = signed_distances(piece, plane);
                            if straddles(&distances) {
                                cut_polygon(piece, &distances)
                            } else {
                                vec![piece.clone()]
                            }
                        })
                        .collect()
                });
                resolved.extend(fragments.into_iter().map(Geometry::Polygon));
            }
            _ => resolved.push(geometry.clone()),
        }
    }
    resolved
}

/// Depth data for one projected geometry, used by the orderings below
#[derive(Debug, Clone)]
pub struct DepthKey {
    /// Position in the resolved list; the final tie-break
    pub index: usize,
    /// Representative point
    pub centroid: Vec3,
    /// Squared camera distances, `avg` being to `centroid`
    pub distance: DistanceMeasure,
    /// Present for polygons
    pub plane: Option<Plane>,
}

impl DepthKey {
    pub fn new(index: usize, geometry: &Geometry, view_pos: &Vec3) -> Self {
        let plane = match geometry {
            Geometry::Polygon(polygon) => Some(polygon.plane()),
            Geometry::Point(_)
            | Geometry::Label(_)
            | Geometry::Line(_)
            | Geometry::LineString(_) => None,
        };
        Self {
            index,
            centroid: geometry.representative_point(),
            distance: sqr_dist(view_pos, geometry),
            plane,
        }
    }
}

/// Farthest first by representative point, then by farthest and nearest vertex, then
/// by index
pub fn naive_order(a: &DepthKey, b: &DepthKey) -> Ordering {
    b.distance
        .avg
        .total_cmp(&a.distance.avg)
        .then(b.distance.max.total_cmp(&a.distance.max))
        .then(b.distance.min.total_cmp(&a.distance.min))
        .then(a.index.cmp(&b.index))
}

/// Farthest first, with polygon pairs compared through their planes.
///
/// For two polygons, a ray from the camera through the nearer centroid is run onto the
/// farther polygon's plane. If it meets that plane beyond the nearer centroid the
/// farther polygon really is behind and goes first; if it meets it before, the pair is
/// swapped. Without a forward hit the centroid distances decide.
pub fn plane_aware_order(view_pos: &Vec3, a: &DepthKey, b: &DepthKey) -> Ordering {
    let refined = match (&a.plane, &b.plane) {
        (Some(_), Some(_)) => occlusion_order(view_pos, a, b),
        _ => None,
    };
    refined.unwrap_or_else(|| naive_order(a, b))
}

fn occlusion_order(view_pos: &Vec3, a: &DepthKey, b: &DepthKey) -> Option<Ordering> {
    let a_is_far = naive_order(a, b) != Ordering::Greater;
    let (far, near) = if a_is_far { (a, b) } else { (b, a) };
    let far_plane = far.plane?;

    let t = far_plane.ray_param(view_pos, &(near.centroid - view_pos));
    if !t.is_finite() || t <= 0.0 {
        return None;
    }
    // The nearer centroid lies on the farther plane, e.g. coplanar fragments
    if (t - 1.0).abs() <= COPLANAR_TOLERANCE {
        return None;
    }
    let far_goes_first = t > 1.0;
    Some(if far_goes_first == a_is_far {
        Ordering::Less
    } else {
        Ordering::Greater
    })
}

/// Stable merge sort.
///
/// Tolerates comparators that are not total orders, such as
/// [`plane_aware_order`], and always terminates with a permutation of the input.
pub fn merge_sort_by<T, F>(items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort_by(left, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) != Ordering::Less,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::style::{Color, Paint};

    fn v(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3::new(x, y, z)
    }

    /// Triangle in the z = 0 plane
    fn flat() -> Polygon {
        Polygon::triangle(v(-1.0, -1.0, 0.0), v(1.0, -1.0, 0.0), v(0.0, 1.0, 0.0))
    }

    /// Triangle in the x = 0 plane, poking through `flat`
    fn upright() -> Polygon {
        Polygon::triangle(v(0.0, -0.5, -1.0), v(0.0, -0.5, 1.0), v(0.0, 0.5, 0.0))
    }

    #[test]
    fn test_sqr_dist() {
        let line: Geometry = Geometry::line(v(2.0, 0.0, 0.0), v(4.0, 0.0, 0.0)).into();
        let measure = sqr_dist(&Vec3::zeros(), &line);
        assert_eq!(measure.avg, 9.0);
        assert_eq!(measure.min, 4.0);
        assert_eq!(measure.max, 16.0);
    }

    #[test]
    fn test_intersecting_triangles_are_detected() {
        let (a_distances, b_distances) = intersect_polygons(&flat(), &upright()).unwrap();
        assert_eq!(a_distances.len(), 3);
        assert!(a_distances.iter().any(|&d| d < -INTERSECT_THRESHOLD));
        assert!(a_distances.iter().any(|&d| d > INTERSECT_THRESHOLD));
        assert!(b_distances.iter().any(|&d| d < -INTERSECT_THRESHOLD));
        assert!(b_distances.iter().any(|&d| d > INTERSECT_THRESHOLD));
    }

    #[test]
    fn test_touching_is_not_intersecting() {
        // One vertex resting on the other plane, the rest above it
        let resting = Polygon::triangle(v(0.0, 0.0, 0.0), v(0.0, 0.5, 1.0), v(0.5, 0.0, 1.0));
        assert!(intersect_polygons(&flat(), &resting).is_none());
    }

    fn fill_of(polygon: &Polygon) -> Option<Paint> {
        let no_path: &[Vec2] = &[];
        polygon.fill().map(|style| style.resolve(no_path))
    }

    #[test]
    fn test_split_fragments_cover_original() {
        let geometries: Vec<Geometry> = vec![
            flat().with_fill(Color::RED).into(),
            upright().with_fill(Color::BLUE).into(),
        ];
        let resolved = resolve_intersections(&geometries);

        for (original, color) in [(flat(), Color::RED), (upright(), Color::BLUE)] {
            let pieces: Vec<&Polygon> = resolved
                .iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })
                .filter(|p| fill_of(p) == Some(Paint::Solid(color)))
                .collect();
            assert!(pieces.len() >= 2, "{:?} split into {}", color, pieces.len());
            let total: f64 = pieces.iter().map(|p| polygon_area(p.points())).sum();
            assert!((total - polygon_area(original.points())).abs() < 1e-9);
            for piece in &pieces {
                assert!(piece.points().len() >= 3);
                assert!(polygon_area(piece.points()) > 0.0);
            }
        }
    }

    #[test]
    fn test_fragments_replace_in_place() {
        let marker: Geometry = Geometry::point(v(9.0, 9.0, 9.0)).into();
        let geometries: Vec<Geometry> = vec![flat().into(), marker, upright().into()];
        let resolved = resolve_intersections(&geometries);
        let kinds: Vec<&str> = resolved.iter().map(Geometry::kind).collect();
        let point_at = kinds.iter().position(|k| *k == "Point").unwrap();
        assert!(point_at >= 2);
        assert!(kinds[..point_at].iter().all(|k| *k == "Polygon"));
        assert!(kinds[point_at + 1..].len() >= 2);
    }

    #[test]
    fn test_disjoint_polygons_pass_through() {
        let near = Polygon::triangle(v(2.0, -1.0, -1.0), v(2.0, 1.0, -1.0), v(2.0, 0.0, 1.0));
        let far = Polygon::triangle(v(5.0, -1.0, -1.0), v(5.0, 1.0, -1.0), v(5.0, 0.0, 1.0));
        let geometries: Vec<Geometry> = vec![near.clone().into(), far.clone().into()];
        let resolved = resolve_intersections(&geometries);
        assert_eq!(resolved.len(), 2);
        for (got, want) in resolved.iter().zip([near, far]) {
            match got {
                Geometry::Polygon(p) => assert_eq!(p.points(), want.points()),
                other => panic!("unexpected {}", other.kind()),
            }
        }
    }

    #[test]
    fn test_cut_square_into_two() {
        let square = Polygon::new(vec![
            v(0.0, 0.0, 0.0),
            v(2.0, 0.0, 0.0),
            v(2.0, 2.0, 0.0),
            v(0.0, 2.0, 0.0),
        ])
        .unwrap();
        // Plane x = 0.5
        let distances: Vec<f64> = square.points().iter().map(|p| p.x - 0.5).collect();
        let pieces = cut_polygon(&square, &distances);
        assert_eq!(pieces.len(), 2);
        let areas: Vec<f64> = pieces.iter().map(|p| polygon_area(p.points())).collect();
        assert!(areas.iter().any(|a| (a - 1.0).abs() < 1e-12));
        assert!(areas.iter().any(|a| (a - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_cut_through_vertex_drops_duplicates() {
        let triangle = Polygon::triangle(v(0.0, 1.0, 0.0), v(1.0, -1.0, 0.0), v(-1.0, -1.0, 0.0));
        // Plane x = 0 passes through the apex
        let distances: Vec<f64> = triangle.points().iter().map(|p| p.x).collect();
        let pieces = cut_polygon(&triangle, &distances);
        assert_eq!(pieces.len(), 2);
        for piece in &pieces {
            assert_eq!(piece.points().len(), 3);
            assert!((polygon_area(piece.points()) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cut_concave_polygon_crossed_four_times() {
        // A U shape with a 1x1 notch cut into its top edge
        let u_shape = Polygon::new(vec![
            v(0.0, 0.0, 0.0),
            v(3.0, 0.0, 0.0),
            v(3.0, 2.0, 0.0),
            v(2.0, 2.0, 0.0),
            v(2.0, 1.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(1.0, 2.0, 0.0),
            v(0.0, 2.0, 0.0),
        ])
        .unwrap();
        // Plane y = 1.5 runs through both prongs
        let distances: Vec<f64> = u_shape.points().iter().map(|p| p.y - 1.5).collect();
        let pieces = cut_polygon(&u_shape, &distances);
        assert_eq!(pieces.len(), 3);

        let total: f64 = pieces.iter().map(|p| polygon_area(p.points())).sum();
        assert!((total - 5.0).abs() < 1e-12);
        assert!((polygon_area(u_shape.points()) - 5.0).abs() < 1e-12);

        let mut areas: Vec<f64> = pieces.iter().map(|p| polygon_area(p.points())).collect();
        areas.sort_by(f64::total_cmp);
        assert!((areas[0] - 0.5).abs() < 1e-12);
        assert!((areas[1] - 0.5).abs() < 1e-12);
        assert!((areas[2] - 4.0).abs() < 1e-12);

        // Every piece stays on one side of the cut
        for piece in &pieces {
            let above = piece.points().iter().all(|p| p.y >= 1.5 - 1e-12);
            let below = piece.points().iter().all(|p| p.y <= 1.5 + 1e-12);
            assert!(above || below, "{:?} straddles the cut", piece.points());
        }
    }

    #[test]
    fn test_intersection_found_with_collinear_leading_vertices() {
        // Square in z = 0 whose first three vertices are collinear
        let square = Polygon::new(vec![
            v(-1.0, -1.0, 0.0),
            v(0.0, -1.0, 0.0),
            v(1.0, -1.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(-1.0, 1.0, 0.0),
        ])
        .unwrap();
        assert!(intersect_polygons(&square, &upright()).is_some());

        let geometries: Vec<Geometry> = vec![square.into(), upright().into()];
        assert!(resolve_intersections(&geometries).len() >= 4);
    }

    #[test]
    fn test_naive_order_breaks_ties_on_extent() {
        let view_pos = Vec3::zeros();
        // Same midpoint, but the long line reaches farther
        let short: Geometry = Geometry::line(v(4.0, 0.0, -1.0), v(4.0, 0.0, 1.0)).into();
        let long: Geometry = Geometry::line(v(3.0, 0.0, 0.0), v(5.0, 0.0, 0.0)).into();
        let short_key = DepthKey::new(0, &short, &view_pos);
        let long_key = DepthKey::new(1, &long, &view_pos);
        assert_eq!(short_key.distance.avg, long_key.distance.avg);
        assert_eq!(naive_order(&long_key, &short_key), Ordering::Less);
        assert_eq!(naive_order(&short_key, &long_key), Ordering::Greater);
    }

    #[test]
    fn test_plane_aware_order_can_reverse_centroid_order() {
        let view_pos = Vec3::zeros();
        // Straight ahead, centroid at (5, 0, 0)
        let near = Polygon::triangle(v(5.0, -1.0, -1.0), v(5.0, 1.0, -1.0), v(5.0, 0.0, 2.0));
        // Off to the side with a farther centroid, but its plane x = 4 crosses the
        // line of sight in front of `near`
        let far = Polygon::new(vec![
            v(4.0, -1.0, 10.0),
            v(4.0, 1.0, 10.0),
            v(4.0, 1.0, 12.0),
            v(4.0, -1.0, 12.0),
        ])
        .unwrap();
        let near_key = DepthKey::new(0, &near.into(), &view_pos);
        let far_key = DepthKey::new(1, &far.into(), &view_pos);
        assert!(far_key.distance.avg > near_key.distance.avg);

        assert_eq!(naive_order(&far_key, &near_key), Ordering::Less);
        assert_eq!(
            plane_aware_order(&view_pos, &far_key, &near_key),
            Ordering::Greater
        );
        assert_eq!(
            plane_aware_order(&view_pos, &near_key, &far_key),
            Ordering::Less
        );
    }

    #[test]
    fn test_plane_aware_order_keeps_centroid_order() {
        let view_pos = Vec3::zeros();
        let near = Polygon::triangle(v(2.0, -1.0, -1.0), v(2.0, 1.0, -1.0), v(2.0, 0.0, 1.0));
        let far = Polygon::triangle(v(6.0, -1.0, -1.0), v(6.0, 1.0, -1.0), v(6.0, 0.0, 1.0));
        let near_key = DepthKey::new(0, &near.into(), &view_pos);
        let far_key = DepthKey::new(1, &far.into(), &view_pos);
        assert_eq!(
            plane_aware_order(&view_pos, &far_key, &near_key),
            Ordering::Less
        );

        // Without two planes the centroids decide
        let point_key = DepthKey::new(2, &Geometry::point(v(1.0, 0.0, 0.0)).into(), &view_pos);
        assert!(point_key.plane.is_none());
        assert_eq!(
            plane_aware_order(&view_pos, &point_key, &far_key),
            Ordering::Greater
        );
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let items = vec![(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e')];
        let sorted = merge_sort_by(items, &mut |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        assert_eq!(sorted, vec![(1, 'b'), (1, 'e'), (2, 'd'), (3, 'a'), (3, 'c')]);
    }

    #[test]
    fn test_merge_sort_survives_inconsistent_comparator() {
        let items: Vec<u32> = (0..50).collect();
        let mut calls = 0;
        let sorted = merge_sort_by(items, &mut |a: &u32, b: &u32| {
            calls += 1;
            // Rock-paper-scissors on residues mod 3
            match (a % 3 + 3 - b % 3) % 3 {
                0 => Ordering::Equal,
                1 => Ordering::Less,
                _ => Ordering::Greater,
            }
        });
        assert!(calls > 0);
        let mut check = sorted.clone();
        check.sort();
        assert_eq!(check, (0..50).collect::<Vec<u32>>());
    }
}
