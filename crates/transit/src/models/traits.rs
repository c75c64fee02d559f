//! Read-only view of a transit network.
//!
//! The graph builder and the itinerary reconstruction only need lookups, so
//! they are written against this trait rather than the concrete registries.

use bus_graph::VertexId;

use crate::registry::routes::BusRoute;
use crate::registry::stops::Stop;

pub trait TransitProvider {
    // ---- Lookups ----
    fn get_stop(&self, name: &str) -> Option<&Stop>;

    /// Stop owning a wait or board vertex
    fn stop_at_vertex(&self, vertex: VertexId) -> Option<&Stop>;

    // ---- Collections ----

    /// Stops in vertex order
    fn all_stops(&self) -> Vec<&Stop>;

    /// Routes in ascending bus number order
    fn all_routes(&self) -> Vec<&BusRoute>;

    /// Two vertices per stop
    fn vertex_count(&self) -> usize {
        self.all_stops().len() * 2
    }
}
