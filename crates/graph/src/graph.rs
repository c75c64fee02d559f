//! Adjacency-list graph with stable, insertion-ordered edge ids.

pub type VertexId = usize;
pub type EdgeId = usize;

/// A directed edge with a non-negative weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: f64,
}

impl Edge {
    pub fn new(from: VertexId, to: VertexId, weight: f64) -> Self {
        Self { from, to, weight }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    #[error("Vertex {vertex} out of range (graph has {vertex_count} vertices)")]
    VertexOutOfRange {
        vertex: VertexId,
        vertex_count: usize,
    },

    #[error("Edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        from: VertexId,
        to: VertexId,
        weight: f64,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectedWeightedGraph {
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
}

impl DirectedWeightedGraph {
    /// Create a graph with `vertex_count` vertices and no edges
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Append an edge and return its id (ids are assigned in insertion order).
    ///
    /// Weights must be finite and non-negative.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        self.check_vertex(edge.from)?;
        self.check_vertex(edge.to)?;
        if !(edge.weight.is_finite() && edge.weight >= 0.0) {
            return Err(GraphError::InvalidWeight {
                from: edge.from,
                to: edge.to,
                weight: edge.weight,
            });
        }

        let id = self.edges.len();
        self.edges.push(edge);
        self.incidence[edge.from].push(id);
        Ok(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Outgoing edge ids of `vertex` (empty for out-of-range vertices)
    pub fn incident_edges(&self, vertex: VertexId) -> &[EdgeId] {
        self.incidence
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate()
    }

    pub(crate) fn contains_vertex(&self, vertex: VertexId) -> bool {
        vertex < self.incidence.len()
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), GraphError> {
        if self.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_ids_follow_insertion_order() {
        let mut graph = DirectedWeightedGraph::new(3);
        let a = graph.add_edge(Edge::new(0, 1, 1.0)).unwrap();
        let b = graph.add_edge(Edge::new(1, 2, 2.0)).unwrap();
        let c = graph.add_edge(Edge::new(0, 2, 4.0)).unwrap();

        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(graph.edge(1), Some(&Edge::new(1, 2, 2.0)));
        assert_eq!(graph.incident_edges(0), &[0, 2]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_out_of_range_vertex_is_rejected() {
        let mut graph = DirectedWeightedGraph::new(2);
        let err = graph.add_edge(Edge::new(0, 5, 1.0)).unwrap_err();

        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 5,
                vertex_count: 2
            }
        );
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.incident_edges(7).is_empty());
    }

    #[test]
    fn test_negative_and_nan_weights_are_rejected() {
        let mut graph = DirectedWeightedGraph::new(2);

        assert_eq!(
            graph.add_edge(Edge::new(1, 0, -150.0)),
            Err(GraphError::InvalidWeight {
                from: 1,
                to: 0,
                weight: -150.0
            })
        );
        assert!(matches!(
            graph.add_edge(Edge::new(0, 1, f64::NAN)),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(graph.add_edge(Edge::new(0, 1, f64::INFINITY)).is_err());
        assert_eq!(graph.add_edge(Edge::new(0, 1, 0.0)), Ok(0));
        assert_eq!(graph.edge_count(), 1);
    }
}
