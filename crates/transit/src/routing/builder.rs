//! Graph compilation.
//!
//! ## Encoding
//!
//! Each stop contributes a wait vertex and a board vertex. A wait edge
//! (`wait -> board`) costs the configured wait time. Each bus line adds a
//! ride edge from the board vertex of every stop to the wait vertex of every
//! later stop, weighted by the ride time between them. A rider who changes
//! buses therefore passes through a wait edge again, and a plain
//! shortest-path search yields transfer-aware itineraries. The price is
//! O(stops²) ride edges per line.

use bus_graph::{DirectedWeightedGraph, Edge, Router, VertexId};

use crate::models::{traits::TransitProvider, types::*};
use crate::registry::routes::BusRoute;

/// Routing graph plus the router built over it. Immutable once built.
#[derive(Debug)]
pub struct TransitGraph {
    router: Router,
    settings: Settings,
}

impl TransitGraph {
    /// Compile finalized routes into a fresh graph and router
    pub fn build<P: TransitProvider>(provider: &P, settings: Settings) -> Result<Self> {
        let mut graph = DirectedWeightedGraph::new(provider.vertex_count());
        let wait_minutes = f64::from(settings.wait_time_minutes);

        for stop in provider.all_stops() {
            graph.add_edge(Edge::new(stop.wait_vertex, stop.board_vertex(), wait_minutes))?;
        }

        for route in provider.all_routes() {
            add_route_edges(provider, route, &settings, &mut graph)?;
        }

        tracing::info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built routing graph"
        );

        Ok(Self {
            router: Router::new(graph),
            settings,
        })
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn graph(&self) -> &DirectedWeightedGraph {
        self.router.graph()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

fn add_route_edges<P: TransitProvider>(
    provider: &P,
    route: &BusRoute,
    settings: &Settings,
    graph: &mut DirectedWeightedGraph,
) -> Result<()> {
    let stop_count = route.stops.len();
    if route.segment_lengths.len() != stop_count.saturating_sub(1) {
        return Err(TransitError::InvalidOrdering(
            "routes must be finalized before the graph is built",
        ));
    }

    let vertices = route
        .stops
        .iter()
        .map(|name| {
            provider
                .get_stop(name.as_str())
                .map(|stop| (stop.wait_vertex, stop.board_vertex()))
                .ok_or_else(|| TransitError::StopNotFound(name.clone()))
        })
        .collect::<Result<Vec<(VertexId, VertexId)>>>()?;
    let segment_minutes: Vec<f64> = route
        .segment_lengths
        .iter()
        .map(|&meters| settings.ride_minutes(meters))
        .collect();

    for (i, &(_, board)) in vertices.iter().enumerate() {
        let mut minutes = 0.0;
        for j in i + 1..stop_count {
            minutes += segment_minutes[j - 1];
            graph.add_edge(Edge::new(board, vertices[j].0, minutes))?;
        }
    }

    // Loops that do not list their first stop again still run back to it.
    if let Some(closing) = route.closing_length {
        let first_wait = vertices[0].0;
        let mut minutes = settings.ride_minutes(closing);
        for k in (1..stop_count).rev() {
            graph.add_edge(Edge::new(vertices[k].1, first_wait, minutes))?;
            minutes += segment_minutes[k - 1];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::identifiers::*;
    use crate::registry::Catalogue;

    fn catalogue(kind: RouteKind, stops: &[&str]) -> Catalogue {
        let mut catalogue = Catalogue::new();
        catalogue
            .stops
            .add_stop("A".into(), 55.60, 37.20, [("B".into(), 1000.0)])
            .unwrap();
        catalogue
            .stops
            .add_stop("B".into(), 55.61, 37.21, [("C".into(), 2000.0)])
            .unwrap();
        catalogue
            .stops
            .add_stop("C".into(), 55.62, 37.22, [("A".into(), 4000.0)])
            .unwrap();
        catalogue
            .routes
            .add_bus(
                BusNumber::new(1),
                kind,
                stops.iter().map(|&s| StopName::new(s)).collect(),
            )
            .unwrap();
        catalogue.finalize_routes(DistancePolicy::Strict).unwrap();
        catalogue
    }

    fn edge_weight(graph: &DirectedWeightedGraph, from: VertexId, to: VertexId) -> Vec<f64> {
        graph
            .edges()
            .filter(|(_, e)| e.from == from && e.to == to)
            .map(|(_, e)| e.weight)
            .collect()
    }

    #[test]
    fn test_wait_and_ride_edges() {
        let catalogue = catalogue(RouteKind::Circular, &["A", "B", "C", "A"]);
        let graph = TransitGraph::build(&catalogue, Settings::new(6, 40.0)).unwrap();
        let graph = graph.graph();

        assert_eq!(graph.vertex_count(), 6);
        // 3 wait edges + 4 * 3 / 2 ride edges
        assert_eq!(graph.edge_count(), 3 + 6);
        assert_eq!(edge_weight(graph, 0, 1), vec![6.0]);

        // A(board) -> B(wait): 1000 m at 40 km/h
        assert_relative_eq!(edge_weight(graph, 1, 2)[0], 1.5);
        // A(board) -> C(wait): 3000 m
        assert_relative_eq!(edge_weight(graph, 1, 4)[0], 4.5);
        // B(board) -> A(wait) runs on through C
        assert_relative_eq!(edge_weight(graph, 3, 0)[0], 9.0);
    }

    #[test]
    fn test_open_loop_gets_seam_edges() {
        let catalogue = catalogue(RouteKind::Circular, &["A", "B", "C"]);
        let graph = TransitGraph::build(&catalogue, Settings::new(2, 60.0)).unwrap();
        let graph = graph.graph();

        // 3 wait + 3 forward + 2 seam
        assert_eq!(graph.edge_count(), 8);
        // C -> A closes the loop: 4000 m at 60 km/h
        assert_relative_eq!(edge_weight(graph, 5, 0)[0], 4.0);
        // B -> C -> A
        assert_relative_eq!(edge_weight(graph, 3, 0)[0], 6.0);
    }

    #[test]
    fn test_linear_route_edges() {
        let catalogue = catalogue(RouteKind::Linear, &["A", "B", "C", "B", "A"]);
        let graph = TransitGraph::build(&catalogue, Settings::new(1, 40.0)).unwrap();

        // 3 wait + 5 * 4 / 2 ride, no seam for linear lines
        assert_eq!(graph.graph().edge_count(), 13);
    }

    #[test]
    fn test_unfinalized_routes_are_rejected() {
        let mut catalogue = Catalogue::new();
        catalogue.stops.add_stop("A".into(), 55.0, 37.0, []).unwrap();
        catalogue.stops.add_stop("B".into(), 55.1, 37.0, []).unwrap();
        catalogue
            .routes
            .add_bus(BusNumber::new(7), RouteKind::Circular, vec!["A".into(), "B".into()])
            .unwrap();

        assert!(matches!(
            TransitGraph::build(&catalogue, Settings::new(1, 30.0)),
            Err(TransitError::InvalidOrdering(_))
        ));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let catalogue = catalogue(RouteKind::Circular, &["A", "B", "C", "A"]);
        let first = TransitGraph::build(&catalogue, Settings::new(6, 40.0)).unwrap();
        let second = TransitGraph::build(&catalogue, Settings::new(6, 40.0)).unwrap();

        assert_eq!(first.graph(), second.graph());
    }
}
