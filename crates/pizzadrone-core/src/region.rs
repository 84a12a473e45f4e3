//! Polygon membership tests for the central area and no-fly zones.
//!
//! Vertex rings are implicitly closed: the last vertex connects back to the
//! first. A repeated closing vertex only adds a zero-length edge, which none of
//! the tests below are sensitive to.

use crate::error::GeometryError;
use crate::models::LngLat;

/// Maximum distance (degrees) from an edge for a point to count as on it.
pub const BOUNDARY_TOLERANCE: f64 = 1e-6;

/// Whether `vertices` describe a usable polygon.
///
/// Requires at least three vertices, at least two consecutive pairs that
/// differ, and at least one consecutive triple that is not collinear.
pub fn is_closed_polygon(vertices: &[LngLat]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let has_non_collinear = vertices
        .windows(3)
        .any(|w| twice_signed_area(w[0], w[1], w[2]) != 0.0);

    let distinct_pairs = vertices
        .windows(2)
        .filter(|w| w[0].lng != w[1].lng || w[0].lat != w[1].lat)
        .count();

    distinct_pairs >= 2 && has_non_collinear
}

/// Crossing-number point-in-polygon test.
///
/// Points exactly on an edge may land on either side; use
/// [`in_region_or_on_boundary`] when edges must count as inside.
pub fn contains_point(vertices: &[LngLat], point: LngLat) -> Result<bool, GeometryError> {
    if vertices.is_empty() {
        return Err(GeometryError::EmptyPolygon);
    }

    let mut inside = false;
    let n = vertices.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].lng, vertices[i].lat);
        let (xj, yj) = (vertices[j].lng, vertices[j].lat);

        if ((yi > point.lat) != (yj > point.lat))
            && (point.lng < (xj - xi) * (point.lat - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }

    Ok(inside)
}

/// Whether `point` lies on the segment from `a` to `b`.
///
/// The point must sit inside the segment's bounding box and within
/// [`BOUNDARY_TOLERANCE`] of the line through `a` and `b`.
pub fn on_boundary(a: LngLat, b: LngLat, point: LngLat) -> bool {
    on_boundary_with_tolerance(a, b, point, BOUNDARY_TOLERANCE)
}

/// [`on_boundary`] with an explicit tolerance.
///
/// `tolerance` bounds the perpendicular distance (degrees) from the point to
/// the line through `a` and `b`: the cross product is divided by the edge
/// length, so the bound does not scale with how long the edge is.
pub fn on_boundary_with_tolerance(a: LngLat, b: LngLat, point: LngLat, tolerance: f64) -> bool {
    let within_box = point.lng >= a.lng.min(b.lng)
        && point.lng <= a.lng.max(b.lng)
        && point.lat >= a.lat.min(b.lat)
        && point.lat <= a.lat.max(b.lat);
    if !within_box {
        return false;
    }

    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        // Degenerate edge: the bounding box already pinned the point onto it.
        return true;
    }

    let cross = (point.lat - a.lat) * dx - (point.lng - a.lng) * dy;
    (cross / length).abs() < tolerance
}

/// Point-in-polygon where every edge (including last to first) counts as inside.
pub fn in_region_or_on_boundary(
    vertices: &[LngLat],
    point: LngLat,
) -> Result<bool, GeometryError> {
    if contains_point(vertices, point)? {
        return Ok(true);
    }

    let n = vertices.len();
    Ok((0..n).any(|i| on_boundary(vertices[i], vertices[(i + 1) % n], point)))
}

fn twice_signed_area(p1: LngLat, p2: LngLat, p3: LngLat) -> f64 {
    p1.lng * (p2.lat - p3.lat) + p2.lng * (p3.lat - p1.lat) + p3.lng * (p1.lat - p2.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<LngLat> {
        vec![
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(0.0, 1.0),
            LngLat::new(0.0, 0.0),
        ]
    }

    #[test]
    fn closed_polygon_rejects_degenerate_inputs() {
        assert!(!is_closed_polygon(&[]));
        assert!(!is_closed_polygon(&[
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 1.0)
        ]));
        assert!(!is_closed_polygon(&[
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(2.0, 2.0),
        ]));
        assert!(!is_closed_polygon(&[
            LngLat::new(0.5, 0.5),
            LngLat::new(0.5, 0.5),
            LngLat::new(0.5, 0.5),
            LngLat::new(0.5, 0.5),
        ]));
    }

    #[test]
    fn closed_polygon_accepts_square_with_repeated_first_vertex() {
        assert!(is_closed_polygon(&square()));
        assert!(is_closed_polygon(&square()[..4]));
    }

    #[test]
    fn contains_point_fails_on_empty_polygon() {
        assert_eq!(
            contains_point(&[], LngLat::new(0.0, 0.0)),
            Err(GeometryError::EmptyPolygon)
        );
        assert_eq!(
            in_region_or_on_boundary(&[], LngLat::new(0.0, 0.0)),
            Err(GeometryError::EmptyPolygon)
        );
    }

    #[test]
    fn contains_point_inside_and_outside() {
        let poly = square();
        assert_eq!(contains_point(&poly, LngLat::new(0.5, 0.5)), Ok(true));
        assert_eq!(contains_point(&poly, LngLat::new(1.5, 0.5)), Ok(false));
        assert_eq!(contains_point(&poly, LngLat::new(-0.1, 0.5)), Ok(false));
    }

    #[test]
    fn in_region_counts_vertices_edges_and_centroid() {
        let poly = square();
        for vertex in &poly {
            assert_eq!(in_region_or_on_boundary(&poly, *vertex), Ok(true));
        }
        assert_eq!(in_region_or_on_boundary(&poly, LngLat::new(0.5, 0.5)), Ok(true));
        assert_eq!(in_region_or_on_boundary(&poly, LngLat::new(1.0, 0.25)), Ok(true));
        assert_eq!(in_region_or_on_boundary(&poly, LngLat::new(0.5, 1.0)), Ok(true));
        assert_eq!(in_region_or_on_boundary(&poly, LngLat::new(10.0, 10.0)), Ok(false));
    }

    #[test]
    fn closing_edge_is_checked_without_repeated_vertex() {
        let poly = square();
        let open_ring = &poly[..4];
        // Left edge runs from the last vertex back to the first.
        assert_eq!(
            in_region_or_on_boundary(open_ring, LngLat::new(0.0, 0.5)),
            Ok(true)
        );
    }

    #[test]
    fn on_boundary_handles_diagonal_edges() {
        let a = LngLat::new(-3.18709731, 55.94328812);
        let b = LngLat::new(-3.18768203, 55.94447774);
        let mid = LngLat::new((a.lng + b.lng) / 2.0, (a.lat + b.lat) / 2.0);
        assert!(on_boundary(a, b, mid));
        assert!(!on_boundary(a, b, LngLat::new(mid.lng + 0.0001, mid.lat)));
        // Collinear but past the end of the segment.
        let beyond = LngLat::new(b.lng + (b.lng - a.lng), b.lat + (b.lat - a.lat));
        assert!(!on_boundary(a, b, beyond));
    }

    #[test]
    fn boundary_tolerance_is_a_distance_not_a_raw_cross_product() {
        // Offset `distance` perpendicular to the diagonal through the midpoint.
        fn off_diagonal(mid: f64, distance: f64) -> LngLat {
            let d = distance / std::f64::consts::SQRT_2;
            LngLat::new(mid - d, mid + d)
        }

        let a = LngLat::new(0.0, 0.0);
        let long = LngLat::new(10.0, 10.0);
        // Raw cross product for a 5e-7 offset here is about 7e-6.
        assert!(on_boundary_with_tolerance(a, long, off_diagonal(5.0, 5e-7), 1e-6));
        assert!(!on_boundary_with_tolerance(a, long, off_diagonal(5.0, 2e-6), 1e-6));

        let short = LngLat::new(0.001, 0.001);
        assert!(on_boundary_with_tolerance(a, short, off_diagonal(0.0005, 5e-7), 1e-6));
        assert!(!on_boundary_with_tolerance(a, short, off_diagonal(0.0005, 2e-6), 1e-6));
    }

    #[test]
    fn on_boundary_degenerate_edge_matches_only_the_vertex() {
        let a = LngLat::new(1.0, 1.0);
        assert!(on_boundary(a, a, a));
        assert!(!on_boundary(a, a, LngLat::new(1.0, 1.0000001)));
    }
}
