//! Turning a raw shortest path back into rider-facing legs.

use bus_graph::Edge;

use crate::identifiers::*;
use crate::models::{traits::TransitProvider, types::*};
use crate::registry::stops::is_wait_vertex;
use crate::routing::builder::TransitGraph;

/// One step of an itinerary
#[derive(Clone, Debug, PartialEq)]
pub enum Leg {
    /// Wait at a stop for the next bus
    Wait { stop: StopName, minutes: f64 },
    /// Ride a bus across `span_count` consecutive stop-to-stop hops
    Ride {
        bus: BusNumber,
        span_count: usize,
        minutes: f64,
    },
}

impl Leg {
    pub fn minutes(&self) -> f64 {
        match self {
            Self::Wait { minutes, .. } | Self::Ride { minutes, .. } => *minutes,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Itinerary {
    pub total_time: f64,
    pub legs: Vec<Leg>,
}

/// Fastest itinerary between two stops.
///
/// Fails with `StopNotFound` for an unknown endpoint and `RouteNotFound`
/// when no bus connects them.
pub fn compute_route<P: TransitProvider>(
    provider: &P,
    graph: &TransitGraph,
    from: &str,
    to: &str,
) -> Result<Itinerary> {
    let source = provider
        .get_stop(from)
        .ok_or_else(|| TransitError::StopNotFound(StopName::new(from)))?;
    let target = provider
        .get_stop(to)
        .ok_or_else(|| TransitError::StopNotFound(StopName::new(to)))?;

    let route = graph
        .router()
        .build_route(source.wait_vertex, target.wait_vertex)
        .ok_or_else(|| TransitError::RouteNotFound {
            from: source.name.clone(),
            to: target.name.clone(),
        })?;

    // The handle is released when it goes out of scope, including on `?`.
    let mut legs = Vec::with_capacity(route.edge_count());
    for index in 0..route.edge_count() {
        let edge = route
            .edge(index)
            .and_then(|id| graph.graph().edge(id))
            .ok_or(TransitError::InconsistentGraph("route edge vanished before it was read"))?;
        legs.push(leg_for_edge(provider, edge)?);
    }

    let total_time = legs.iter().fold(0.0, |total, leg| total + leg.minutes());
    let weight = route.weight();
    route.release();

    if (total_time - weight).abs() > 1e-9 * weight.max(1.0) {
        tracing::error!(
            total_time,
            weight,
            from,
            to,
            "itinerary time disagrees with router weight"
        );
    }
    tracing::debug!(from, to, total_time, legs = legs.len(), "computed route");

    Ok(Itinerary { total_time, legs })
}

fn leg_for_edge<P: TransitProvider>(provider: &P, edge: &Edge) -> Result<Leg> {
    let from_stop = provider
        .stop_at_vertex(edge.from)
        .ok_or(TransitError::InconsistentGraph("edge refers to an unknown vertex"))?;

    if is_wait_vertex(edge.from) {
        return Ok(Leg::Wait {
            stop: from_stop.name.clone(),
            minutes: edge.weight,
        });
    }

    let to_stop = provider
        .stop_at_vertex(edge.to)
        .ok_or(TransitError::InconsistentGraph("edge refers to an unknown vertex"))?;
    let (bus, span_count) = attribute_ride(provider, from_stop.name.as_str(), to_stop.name.as_str())
        .ok_or_else(|| TransitError::UnattributedRide {
            from: from_stop.name.clone(),
            to: to_stop.name.clone(),
        })?;

    Ok(Leg::Ride {
        bus,
        span_count,
        minutes: edge.weight,
    })
}

/// Bus covering `board -> alight` in the fewest hops; ties go to the lowest
/// bus number.
fn attribute_ride<P: TransitProvider>(
    provider: &P,
    board: &str,
    alight: &str,
) -> Option<(BusNumber, usize)> {
    let mut best: Option<(BusNumber, usize)> = None;

    for route in provider.all_routes() {
        if let Some(span) = route.span_between(board, alight) {
            if best.map_or(true, |(_, best_span)| span < best_span) {
                best = Some((route.number, span));
            }
        }
    }

    best
}
