//! Two-phase request processing.
//!
//! A [`Dispatcher`] starts out accepting declarations (stops, buses,
//! settings). [`Dispatcher::finalize`] compiles them into a [`Network`], after
//! which only queries are accepted.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::dispatch::node::*;
use crate::dispatch::request::*;
use crate::dispatch::response::*;
use crate::models::types::*;
use crate::network::Network;
use crate::registry::Catalogue;
use crate::routing::TransitGraph;

#[derive(Debug)]
enum Phase {
    Mutating {
        catalogue: Catalogue,
        settings: Option<Settings>,
    },
    Queryable(Network),
}

/// Owns every registry of one request document
#[derive(Debug)]
pub struct Dispatcher {
    phase: Phase,
    policy: DistancePolicy,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DistancePolicy::default())
    }
}

impl Dispatcher {
    pub fn new(policy: DistancePolicy) -> Self {
        Self {
            phase: Phase::Mutating {
                catalogue: Catalogue::new(),
                settings: None,
            },
            policy,
        }
    }

    pub fn is_queryable(&self) -> bool {
        matches!(self.phase, Phase::Queryable(_))
    }

    /// The finalized network, once [`finalize`](Self::finalize) has succeeded
    pub fn network(&self) -> Option<&Network> {
        match &self.phase {
            Phase::Queryable(network) => Some(network),
            Phase::Mutating { .. } => None,
        }
    }

    /// Settings are accepted once, before the first declaration
    pub fn set_settings(&mut self, new_settings: Settings) -> Result<()> {
        match &mut self.phase {
            Phase::Mutating { settings: Some(_), .. } => Err(TransitError::SettingsAlreadySet),
            Phase::Mutating { catalogue, .. } if !catalogue.is_empty() => Err(
                TransitError::InvalidOrdering("settings after the first declaration"),
            ),
            Phase::Mutating { settings, .. } => {
                *settings = Some(new_settings);
                Ok(())
            }
            Phase::Queryable(_) => Err(TransitError::InvalidOrdering("settings after finalize")),
        }
    }

    /// Apply one declaration. Requests are applied in the order received.
    pub fn apply(&mut self, request: PostRequest) -> Result<()> {
        let Phase::Mutating { catalogue, .. } = &mut self.phase else {
            return Err(TransitError::InvalidOrdering("mutation after finalize"));
        };

        match request {
            PostRequest::Stop {
                name,
                latitude,
                longitude,
                road_distances,
            } => {
                catalogue
                    .stops
                    .add_stop(name, latitude, longitude, road_distances)?;
            }
            PostRequest::Bus {
                number,
                kind,
                stops,
            } => {
                catalogue.routes.add_bus(number, kind, stops)?;
            }
        }

        Ok(())
    }

    /// Finalize routes and build the routing graph.
    ///
    /// On a dispatcher that is already queryable this rebuilds the graph from
    /// the same registries, which yields an identical graph.
    pub fn finalize(&mut self) -> Result<()> {
        match &mut self.phase {
            Phase::Mutating { catalogue, settings } => {
                let settings = settings.ok_or(TransitError::MissingSettings)?;
                catalogue.finalize_routes(self.policy)?;
                let graph = TransitGraph::build(&*catalogue, settings)?;
                let network = Network::from_parts(std::mem::take(catalogue), graph);

                info!(
                    stops = network.catalogue().stops.len(),
                    buses = network.catalogue().routes.len(),
                    "network finalized, accepting queries"
                );
                self.phase = Phase::Queryable(network);
            }
            Phase::Queryable(network) => {
                network.rebuild(self.policy)?;
                debug!("network rebuilt");
            }
        }

        Ok(())
    }

    /// Answer one query. Unknown buses, stops and unreachable destinations
    /// produce a `not found` response rather than an error.
    pub fn query(&self, request: &GetRequest) -> Result<Response> {
        let network = self
            .network()
            .ok_or(TransitError::InvalidOrdering("query before finalize"))?;
        debug!(?request, "query");

        let body = match request {
            GetRequest::Bus { number, .. } => network.bus_stats(*number).map(ResponseBody::from),
            GetRequest::Stop { name, .. } => {
                network.serving_buses(name.as_str()).map(ResponseBody::from)
            }
            GetRequest::Route { from, to, .. } => network
                .compute_route(from.as_str(), to.as_str())
                .map(|itinerary| ResponseBody::from(&itinerary)),
        };

        match body {
            Ok(body) => Ok(Response::new(request.id(), body)),
            Err(e) if e.is_not_found() => Ok(Response::not_found(request.id())),
            Err(e) => Err(e),
        }
    }

    /// Process a whole request document and return the response array.
    ///
    /// Malformed requests, duplicate declarations and buses that cannot be
    /// finalized are logged and dropped. A malformed document or missing
    /// settings abort processing.
    pub fn process_document(&mut self, document: &Value) -> Result<Value> {
        document.as_map_node("document")?;

        if let Some(node) = document.opt_key("routing_settings")? {
            self.set_settings(decode_settings(node)?)?;
        }

        for node in document.array_or_empty("base_requests")? {
            let request = match PostRequest::decode(node) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "dropping malformed base request");
                    continue;
                }
            };

            match self.apply(request) {
                Ok(()) => {}
                Err(e @ (TransitError::DuplicateStop(_) | TransitError::DuplicateBus(_))) => {
                    warn!(error = %e, "dropping duplicate declaration");
                }
                Err(e) => return Err(e),
            }
        }

        self.finalize()?;

        let stat_requests = document.array_or_empty("stat_requests")?;
        let mut responses = Vec::with_capacity(stat_requests.len());
        for node in stat_requests {
            let request = match GetRequest::decode(node) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "dropping malformed stat request");
                    continue;
                }
            };

            match self.query(&request) {
                Ok(response) => responses.push(serde_json::to_value(response)?),
                Err(e) => error!(id = request.id(), error = %e, "query failed"),
            }
        }

        Ok(Value::Array(responses))
    }
}
