//! The finalized, read-only network that answers queries.

use std::collections::BTreeSet;

use crate::identifiers::*;
use crate::models::types::*;
use crate::registry::{BusStats, Catalogue};
use crate::routing::{compute_route, Itinerary, TransitGraph};

/// Registries plus the routing graph compiled from them.
///
/// Nothing in a `Network` changes after it is built, so it can be shared
/// between threads for concurrent queries.
#[derive(Debug)]
pub struct Network {
    catalogue: Catalogue,
    graph: TransitGraph,
}

impl Network {
    /// Finalize routes and compile the routing graph
    pub fn build(
        mut catalogue: Catalogue,
        settings: Settings,
        policy: DistancePolicy,
    ) -> Result<Self> {
        catalogue.finalize_routes(policy)?;
        let graph = TransitGraph::build(&catalogue, settings)?;
        Ok(Self::from_parts(catalogue, graph))
    }

    /// Pair finalized registries with a graph built from them
    pub(crate) fn from_parts(catalogue: Catalogue, graph: TransitGraph) -> Self {
        Self { catalogue, graph }
    }

    /// Recompute routes and replace the graph wholesale
    pub(crate) fn rebuild(&mut self, policy: DistancePolicy) -> Result<()> {
        let settings = *self.settings();
        self.catalogue.finalize_routes(policy)?;
        self.graph = TransitGraph::build(&self.catalogue, settings)?;
        Ok(())
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn graph(&self) -> &TransitGraph {
        &self.graph
    }

    pub fn settings(&self) -> &Settings {
        self.graph.settings()
    }

    pub fn bus_stats(&self, number: BusNumber) -> Result<BusStats> {
        self.catalogue.bus_stats(number)
    }

    pub fn serving_buses(&self, stop: &str) -> Result<&BTreeSet<BusNumber>> {
        self.catalogue.serving_buses(stop)
    }

    pub fn compute_route(&self, from: &str, to: &str) -> Result<Itinerary> {
        compute_route(&self.catalogue, &self.graph, from, to)
    }
}
