//! Stop and route registries.

pub mod routes;
pub mod stops;

pub use routes::{expand_stops, BusRoute, BusStats, RouteRegistry};
pub use stops::{is_wait_vertex, Stop, StopRegistry};

use std::collections::BTreeSet;

use bus_graph::VertexId;

use crate::identifiers::*;
use crate::models::{traits::TransitProvider, types::*};

/// Every stop and bus line declared so far.
///
/// This is the context object a dispatcher owns; nothing about the network
/// lives in global state.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    pub stops: StopRegistry,
    pub routes: RouteRegistry,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute derived route data; see [`RouteRegistry::finalize`]
    pub fn finalize_routes(&mut self, policy: DistancePolicy) -> Result<Vec<BusNumber>> {
        self.routes.finalize(&mut self.stops, policy)
    }

    pub fn bus_stats(&self, number: BusNumber) -> Result<BusStats> {
        self.routes.bus_stats(number)
    }

    /// No stop or bus declared yet
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.routes.is_empty()
    }

    /// Buses calling at a stop, ascending. Empty for a stop no bus visits.
    pub fn serving_buses(&self, stop: &str) -> Result<&BTreeSet<BusNumber>> {
        self.stops.require(stop).map(|s| &s.serving_buses)
    }
}

impl TransitProvider for Catalogue {
    fn get_stop(&self, name: &str) -> Option<&Stop> {
        self.stops.get(name)
    }

    fn stop_at_vertex(&self, vertex: VertexId) -> Option<&Stop> {
        self.stops.at_vertex(vertex)
    }

    fn all_stops(&self) -> Vec<&Stop> {
        self.stops.iter().collect()
    }

    fn all_routes(&self) -> Vec<&BusRoute> {
        self.routes.iter().collect()
    }

    fn vertex_count(&self) -> usize {
        self.stops.vertex_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serving_buses_for_known_and_unknown_stops() {
        let mut catalogue = Catalogue::new();
        catalogue
            .stops
            .add_stop("Biryulyovo Zapadnoye".into(), 55.574371, 37.6517, [])
            .unwrap();
        catalogue
            .stops
            .add_stop("Prazhskaya".into(), 55.611678, 37.603831, [])
            .unwrap();
        catalogue
            .routes
            .add_bus(
                BusNumber::new(828),
                RouteKind::Circular,
                vec!["Biryulyovo Zapadnoye".into()],
            )
            .unwrap();
        catalogue.finalize_routes(DistancePolicy::Lenient).unwrap();

        assert!(catalogue.serving_buses("Prazhskaya").unwrap().is_empty());
        assert_eq!(
            catalogue
                .serving_buses("Biryulyovo Zapadnoye")
                .unwrap()
                .iter()
                .collect::<Vec<_>>(),
            vec![&BusNumber::new(828)]
        );
        assert!(catalogue.serving_buses("Samara").unwrap_err().is_not_found());
        assert_eq!(catalogue.vertex_count(), 4);
        assert_eq!(
            catalogue.stop_at_vertex(3).map(|s| s.name.as_str()),
            Some("Prazhskaya")
        );
    }
}
