//! Compiling the network into a routing graph and reading itineraries back.

pub mod builder;
pub mod itinerary;

pub use builder::TransitGraph;
pub use itinerary::{compute_route, Itinerary, Leg};
