//! # bus-graph
//!
//! A small directed, weighted graph with a shortest-path router.
//!
//! Edges are numbered in insertion order so callers can keep their own
//! meaning for each edge id. The router hands out [`RouteHandle`]s that own
//! the expanded path until they are released (explicitly or on drop).
//!
//! ## Example
//!
//! ```
//! use bus_graph::prelude::*;
//!
//! let mut graph = DirectedWeightedGraph::new(3);
//! graph.add_edge(Edge::new(0, 1, 2.0)).unwrap();
//! graph.add_edge(Edge::new(1, 2, 3.0)).unwrap();
//! graph.add_edge(Edge::new(0, 2, 10.0)).unwrap();
//!
//! let router = Router::new(graph);
//! let route = router.build_route(0, 2).unwrap();
//! assert_eq!(route.weight(), 5.0);
//! assert_eq!(route.edge_count(), 2);
//! ```

pub mod graph;
pub mod router;

pub mod prelude {
    pub use crate::graph::{DirectedWeightedGraph, Edge, EdgeId, GraphError, VertexId};
    pub use crate::router::{RouteHandle, RouteId, Router};
}

pub use prelude::*;
