//! Geodesic distance utilities.

pub mod queries;

pub use queries::{great_circle_distance, point_from_degrees, EARTH_RADIUS_M};
