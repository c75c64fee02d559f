//! Shortest-path router over a [`DirectedWeightedGraph`].
//!
//! Each successful query stores its expanded edge list inside the router and
//! returns a [`RouteHandle`] referring to it. The handle is the only way to
//! read the path back, and it frees the stored path when it is released or
//! dropped, so early returns on the caller's side cannot leak route storage.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ordered_float::OrderedFloat;

use crate::graph::{DirectedWeightedGraph, EdgeId, VertexId};

pub type RouteId = u64;

#[derive(Debug)]
struct StoredRoute {
    edges: Vec<EdgeId>,
}

/// Priority queue entry for Dijkstra
#[derive(Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    cost: OrderedFloat<f64>,
    vertex: VertexId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct Router {
    graph: DirectedWeightedGraph,
    routes: Mutex<HashMap<RouteId, StoredRoute>>,
    next_route_id: AtomicU64,
}

impl Router {
    pub fn new(graph: DirectedWeightedGraph) -> Self {
        Self {
            graph,
            routes: Mutex::new(HashMap::new()),
            next_route_id: AtomicU64::new(0),
        }
    }

    pub fn graph(&self) -> &DirectedWeightedGraph {
        &self.graph
    }

    /// Find the cheapest path from `from` to `to`.
    ///
    /// Returns `None` if either vertex is unknown or `to` is unreachable.
    /// A query with `from == to` yields an empty, zero-weight route.
    pub fn build_route(&self, from: VertexId, to: VertexId) -> Option<RouteHandle<'_>> {
        if !self.graph.contains_vertex(from) || !self.graph.contains_vertex(to) {
            return None;
        }

        let (weight, edges) = self.shortest_path(from, to)?;
        let edge_count = edges.len();
        let id = self.next_route_id.fetch_add(1, AtomicOrdering::Relaxed);
        self.lock_routes().insert(id, StoredRoute { edges });

        Some(RouteHandle {
            router: self,
            id,
            weight,
            edge_count,
        })
    }

    /// Number of route handles that have not been released yet
    pub fn active_routes(&self) -> usize {
        self.lock_routes().len()
    }

    fn route_edge(&self, id: RouteId, index: usize) -> Option<EdgeId> {
        self.lock_routes()
            .get(&id)
            .and_then(|route| route.edges.get(index).copied())
    }

    fn release_route(&self, id: RouteId) {
        if self.lock_routes().remove(&id).is_none() {
            tracing::warn!(route_id = id, "released a route that was not stored");
        }
    }

    fn lock_routes(&self) -> MutexGuard<'_, HashMap<RouteId, StoredRoute>> {
        // The map stays consistent even if a holder panicked mid-query.
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn shortest_path(&self, from: VertexId, to: VertexId) -> Option<(f64, Vec<EdgeId>)> {
        let vertex_count = self.graph.vertex_count();
        let mut dist = vec![f64::INFINITY; vertex_count];
        let mut via_edge: Vec<Option<EdgeId>> = vec![None; vertex_count];
        let mut heap = BinaryHeap::new();

        dist[from] = 0.0;
        heap.push(QueueEntry {
            cost: OrderedFloat(0.0),
            vertex: from,
        });

        while let Some(QueueEntry { cost, vertex }) = heap.pop() {
            let cost = cost.0;
            if cost > dist[vertex] {
                continue;
            }
            if vertex == to {
                break;
            }

            for &edge_id in self.graph.incident_edges(vertex) {
                let Some(edge) = self.graph.edge(edge_id) else {
                    continue;
                };
                let next_cost = cost + edge.weight;
                if next_cost < dist[edge.to] {
                    dist[edge.to] = next_cost;
                    via_edge[edge.to] = Some(edge_id);
                    heap.push(QueueEntry {
                        cost: OrderedFloat(next_cost),
                        vertex: edge.to,
                    });
                }
            }
        }

        if !dist[to].is_finite() {
            return None;
        }

        let mut edges = Vec::new();
        let mut current = to;
        while current != from {
            let edge_id = via_edge[current]?;
            edges.push(edge_id);
            current = self.graph.edge(edge_id)?.from;
        }
        edges.reverse();

        Some((dist[to], edges))
    }
}

/// A computed route, valid until released.
///
/// Dropping the handle releases the route, so it is released exactly once on
/// every exit path.
#[derive(Debug)]
pub struct RouteHandle<'a> {
    router: &'a Router,
    id: RouteId,
    weight: f64,
    edge_count: usize,
}

impl RouteHandle<'_> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Total weight of the route
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edge id at position `index` along the route
    pub fn edge(&self, index: usize) -> Option<EdgeId> {
        self.router.route_edge(self.id, index)
    }

    /// Release the route now instead of at the end of scope
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for RouteHandle<'_> {
    fn drop(&mut self) {
        self.router.release_route(self.id);
    }
}
