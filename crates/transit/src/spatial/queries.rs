//! Great-circle distance on a spherical Earth.
//!
//! Points are stored in radians (`x` = longitude, `y` = latitude) so the
//! conversion happens once, when a stop is declared.

use geo::Point;

/// Earth radius used for stop-to-stop distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Build a radian point from latitude/longitude in degrees
pub fn point_from_degrees(latitude: f64, longitude: f64) -> Point {
    Point::new(longitude.to_radians(), latitude.to_radians())
}

/// Great-circle distance in meters between two radian points, using the
/// spherical law of cosines
pub fn great_circle_distance(a: Point, b: Point) -> f64 {
    if a == b {
        return 0.0;
    }

    let (lat_a, lat_b) = (a.y(), b.y());
    let delta_lon = (a.x() - b.x()).abs();

    // Rounding can push the cosine just past 1 for coincident points.
    let cosine = (lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lon.cos())
        .clamp(-1.0, 1.0);

    cosine.acos() * EARTH_RADIUS_M
}
