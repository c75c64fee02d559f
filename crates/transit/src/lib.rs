//! # bus-transit
//!
//! Bus network modelling and fastest-route queries.
//!
//! ## Features
//!
//! - **Registries**: stops with declared road distances, bus lines with
//!   length and curvature statistics
//! - **Routing**: transfer-aware fastest itineraries over a compiled graph
//! - **Requests**: two-phase processing of JSON request documents
//!
//! ## Example
//!
//! ```
//! use bus_transit::prelude::*;
//! use serde_json::json;
//!
//! let mut dispatcher = Dispatcher::new(DistancePolicy::Lenient);
//! let responses = dispatcher
//!     .process_document(&json!({
//!         "routing_settings": {"bus_wait_time": 6, "bus_velocity": 40},
//!         "base_requests": [
//!             {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
//!              "road_distances": {"B": 1000}},
//!             {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.0},
//!             {"type": "Bus", "name": "1", "stops": ["A", "B", "A"], "is_roundtrip": true}
//!         ],
//!         "stat_requests": [{"id": 1, "type": "Route", "from": "A", "to": "B"}]
//!     }))
//!     .unwrap();
//!
//! assert_eq!(responses[0]["total_time"], 7.5);
//! ```

pub mod dispatch;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod registry;
pub mod routing;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::dispatch::{Dispatcher, GetRequest, PostRequest, Response, ResponseBody};
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::network::Network;
    pub use crate::registry::{BusRoute, BusStats, Catalogue, Stop};
    pub use crate::routing::{Itinerary, Leg, TransitGraph};
}

pub use prelude::*;
