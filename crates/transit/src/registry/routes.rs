//! Bus line registry and derived route statistics.

use std::collections::{BTreeMap, HashSet};

use crate::identifiers::*;
use crate::models::types::*;
use crate::registry::stops::StopRegistry;

/// Expand declared stops into the sequence a bus actually visits.
///
/// A Linear line `A, B, C` runs `A, B, C, B, A`; a Circular line is kept as is.
pub fn expand_stops(kind: RouteKind, declared: Vec<StopName>) -> Vec<StopName> {
    match kind {
        RouteKind::Circular => declared,
        RouteKind::Linear => {
            let mut stops = declared.clone();
            stops.extend(declared.into_iter().rev().skip(1));
            stops
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BusRoute {
    pub number: BusNumber,
    pub kind: RouteKind,
    /// Full visiting order (already expanded for Linear lines)
    pub stops: Vec<StopName>,
    pub unique_stops: HashSet<StopName>,

    // Filled in by `RouteRegistry::finalize`
    pub length_geo: f64,
    pub length_road: f64,
    pub curvature: f64,
    /// Road distance of each consecutive stop pair
    pub segment_lengths: Vec<f64>,
    /// Road distance from the last stop back to the first, for loops that
    /// are not closed explicitly
    pub closing_length: Option<f64>,
}

/// Statistics reported for a single bus
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BusStats {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: f64,
    pub curvature: f64,
}

impl BusRoute {
    pub fn new(number: BusNumber, kind: RouteKind, stops: Vec<StopName>) -> Self {
        let unique_stops = stops.iter().cloned().collect();
        Self {
            number,
            kind,
            stops,
            unique_stops,
            length_geo: 0.0,
            length_road: 0.0,
            curvature: 1.0,
            segment_lengths: Vec::new(),
            closing_length: None,
        }
    }

    /// True when the stored sequence already returns to its first stop
    pub fn is_closed(&self) -> bool {
        self.stops.len() > 1 && self.stops.first() == self.stops.last()
    }

    /// Circular line whose seam (last -> first) is implicit
    pub fn has_open_seam(&self) -> bool {
        self.kind == RouteKind::Circular && self.stops.len() > 1 && !self.is_closed()
    }

    pub fn stats(&self) -> BusStats {
        BusStats {
            stop_count: self.stops.len(),
            unique_stop_count: self.unique_stops.len(),
            route_length: self.length_road,
            curvature: self.curvature,
        }
    }

    /// Fewest stop-to-stop hops this bus needs to carry a rider from `board`
    /// to `alight`, or `None` if it never does.
    pub fn span_between(&self, board: &str, alight: &str) -> Option<usize> {
        let len = self.stops.len();
        let mut best: Option<usize> = None;

        for (i, stop) in self.stops.iter().enumerate() {
            if stop.as_str() != board {
                continue;
            }

            let forward = self.stops[i + 1..]
                .iter()
                .position(|s| s.as_str() == alight)
                .map(|offset| offset + 1);
            let through_seam = (self.has_open_seam() && self.stops[0].as_str() == alight)
                .then_some(len - i);

            for span in forward.into_iter().chain(through_seam) {
                best = Some(best.map_or(span, |b| b.min(span)));
            }
        }

        best
    }

    fn finalize(&mut self, stops: &mut StopRegistry, policy: DistancePolicy) -> Result<()> {
        self.length_geo = 0.0;
        self.length_road = 0.0;
        self.segment_lengths.clear();
        self.closing_length = None;

        for stop in &self.stops {
            stops.require(stop.as_str())?;
        }

        for pair in self.stops.windows(2) {
            let (from, to) = (pair[0].as_str(), pair[1].as_str());
            let road = stops.road_distance_with(from, to, policy)?;

            self.length_geo += stops.geo_distance(from, to)?;
            self.length_road += road;
            self.segment_lengths.push(road);
        }

        if self.has_open_seam() {
            if let (Some(last), Some(first)) = (self.stops.last(), self.stops.first()) {
                self.closing_length =
                    Some(stops.road_distance_with(last.as_str(), first.as_str(), policy)?);
            }
        }

        // No travel at all (single stop, or coincident stops) has no meaningful ratio.
        self.curvature = if self.length_geo > 0.0 {
            self.length_road / self.length_geo
        } else {
            1.0
        };

        for stop in &self.stops {
            stops.register_bus(stop.as_str(), self.number)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct RouteRegistry {
    routes: BTreeMap<BusNumber, BusRoute>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bus line; `stops` must already be expanded (see [`expand_stops`])
    pub fn add_bus(
        &mut self,
        number: BusNumber,
        kind: RouteKind,
        stops: Vec<StopName>,
    ) -> Result<&BusRoute> {
        if self.routes.contains_key(&number) {
            return Err(TransitError::DuplicateBus(number));
        }

        Ok(self
            .routes
            .entry(number)
            .or_insert_with(|| BusRoute::new(number, kind, stops)))
    }

    pub fn get(&self, number: BusNumber) -> Option<&BusRoute> {
        self.routes.get(&number)
    }

    /// Routes in ascending bus number order
    pub fn iter(&self) -> impl Iterator<Item = &BusRoute> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn bus_stats(&self, number: BusNumber) -> Result<BusStats> {
        self.get(number)
            .map(BusRoute::stats)
            .ok_or(TransitError::BusNotFound(number))
    }

    /// Compute lengths and curvature for every route and record which buses
    /// serve each stop. Safe to run again; previous results are replaced.
    ///
    /// A bus through an undeclared stop, or one missing a road distance under
    /// [`DistancePolicy::Strict`], is removed and reported in the returned list.
    pub fn finalize(
        &mut self,
        stops: &mut StopRegistry,
        policy: DistancePolicy,
    ) -> Result<Vec<BusNumber>> {
        stops.clear_serving_buses();

        let mut dropped = Vec::new();
        for route in self.routes.values_mut() {
            match route.finalize(stops, policy) {
                Ok(()) => {}
                Err(e @ TransitError::StopNotFound(_))
                | Err(e @ TransitError::MissingRoadDistance { .. }) => {
                    tracing::warn!(bus = %route.number, error = %e, "dropping bus");
                    dropped.push(route.number);
                }
                Err(e) => return Err(e),
            }
        }

        for number in &dropped {
            self.routes.remove(number);
        }
        Ok(dropped)
    }
}
