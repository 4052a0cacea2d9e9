//! Geodesic measurement math
//!
//! Pure functions computing distances, path lengths, and polygon areas from
//! geographic coordinates (WGS84 decimal degrees). Distances use the Haversine
//! formula on a spherical Earth. Areas project the ring onto a local tangent
//! plane centered at the ring's mean vertex and apply the Shoelace formula;
//! this is accurate to within a few percent for parcel- to county-scale
//! polygons but is not an ellipsoidal (true geodesic) area.
//!
//! All functions take [`geo::Point<f64>`] with x = longitude and y = latitude,
//! the single coordinate convention used throughout this crate.

use geo::Point;

/// Mean Earth radius in meters, used by the Haversine formula
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude for the tangent-plane projection
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Build a point from latitude/longitude in degrees
///
/// Convenience constructor mirroring the map library's `lat_lon`; the
/// underlying storage is x = longitude, y = latitude.
#[inline]
pub fn lat_lng(lat: f64, lng: f64) -> Point<f64> {
    Point::new(lng, lat)
}

/// Build a point from a GeoJSON-ordered `[lng, lat]` coordinate pair
///
/// This is the one supported adapter for tuple-ordered input; everything else
/// in the crate works with [`Point`] directly.
#[inline]
pub fn point_from_lng_lat(lng_lat: [f64; 2]) -> Point<f64> {
    Point::new(lng_lat[0], lng_lat[1])
}

/// Great-circle distance between two points in meters (Haversine)
///
/// Symmetric in its arguments; zero only for coincident points.
#[inline]
pub fn haversine_distance(p1: Point<f64>, p2: Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let delta_lat = (p2.y() - p1.y()).to_radians();
    let delta_lng = (p2.x() - p1.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Total length of an open polyline in meters
///
/// Sums the Haversine distance over consecutive point pairs. Returns 0 for
/// fewer than 2 points.
pub fn path_length(points: &[Point<f64>]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Area of a polygon ring in square meters
///
/// Requires at least 3 points (returns 0 otherwise). An open ring (first
/// point != last point) is implicitly closed. Vertices are projected onto a
/// local tangent plane centered at the mean vertex, then the Shoelace formula
/// is applied. See the module docs for the approximation's error bound.
pub fn ring_area(points: &[Point<f64>]) -> f64 {
    let vertices = open_ring(points);
    if vertices.len() < 3 {
        return 0.0;
    }

    let center_lat =
        vertices.iter().map(|p| p.y()).sum::<f64>() / vertices.len() as f64;
    let center_lng =
        vertices.iter().map(|p| p.x()).sum::<f64>() / vertices.len() as f64;

    let lat_scale = METERS_PER_DEGREE_LAT;
    let lng_scale = METERS_PER_DEGREE_LAT * center_lat.to_radians().cos();

    // Shoelace over the projected, implicitly closed ring
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        let ax = (a.x() - center_lng) * lng_scale;
        let ay = (a.y() - center_lat) * lat_scale;
        let bx = (b.x() - center_lng) * lng_scale;
        let by = (b.y() - center_lat) * lat_scale;
        sum += ax * by - bx * ay;
    }

    (sum / 2.0).abs()
}

/// Boundary length of a polygon ring in meters
///
/// Requires at least 3 points (returns 0 otherwise); an open ring is closed
/// before summing the segment lengths.
pub fn ring_perimeter(points: &[Point<f64>]) -> f64 {
    let vertices = open_ring(points);
    if vertices.len() < 3 {
        return 0.0;
    }

    let closing = haversine_distance(vertices[vertices.len() - 1], vertices[0]);
    path_length(vertices) + closing
}

/// Strip the duplicated closing vertex from an explicitly closed ring
fn open_ring(points: &[Point<f64>]) -> &[Point<f64>] {
    match points {
        [first, .., last] if first == last => &points[..points.len() - 1],
        _ => points,
    }
}
