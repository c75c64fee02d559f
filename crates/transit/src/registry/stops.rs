//! Stop registry: stop identity, coordinates, graph vertices and the
//! directed road-distance table.

use std::collections::{BTreeSet, HashMap};

use bus_graph::VertexId;
use geo::Point;

use crate::identifiers::*;
use crate::models::types::*;
use crate::spatial::{great_circle_distance, point_from_degrees};

/// A declared stop.
///
/// Every stop owns two graph vertices: the wait vertex (even id) where riders
/// arrive, and the board vertex (`wait + 1`) they reach after waiting.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub name: StopName,
    /// Radians, `x` = longitude, `y` = latitude
    pub location: Point,
    pub wait_vertex: VertexId,
    pub serving_buses: BTreeSet<BusNumber>,
}

impl Stop {
    pub fn board_vertex(&self) -> VertexId {
        self.wait_vertex + 1
    }
}

pub fn is_wait_vertex(vertex: VertexId) -> bool {
    vertex % 2 == 0
}

#[derive(Clone, Debug, Default)]
pub struct StopRegistry {
    stops: Vec<Stop>,
    index: HashMap<StopName, usize>,
    distances: HashMap<StopName, HashMap<StopName, f64>>,
}

impl StopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a stop and its road distances to nearby stops.
    ///
    /// A declared distance `a -> b` also fills `b -> a` unless that direction
    /// already has a value; an explicit declaration always overwrites.
    pub fn add_stop(
        &mut self,
        name: StopName,
        latitude: f64,
        longitude: f64,
        nearby: impl IntoIterator<Item = (StopName, f64)>,
    ) -> Result<&Stop> {
        if self.index.contains_key(&name) {
            return Err(TransitError::DuplicateStop(name));
        }

        for (other, meters) in nearby {
            self.distances
                .entry(name.clone())
                .or_default()
                .insert(other.clone(), meters);
            self.distances
                .entry(other)
                .or_default()
                .entry(name.clone())
                .or_insert(meters);
        }

        let position = self.stops.len();
        self.index.insert(name.clone(), position);
        self.stops.push(Stop {
            name,
            location: point_from_degrees(latitude, longitude),
            wait_vertex: position * 2,
            serving_buses: BTreeSet::new(),
        });

        Ok(&self.stops[position])
    }

    pub fn get(&self, name: &str) -> Option<&Stop> {
        self.index.get(name).map(|&i| &self.stops[i])
    }

    pub fn require(&self, name: &str) -> Result<&Stop> {
        self.get(name)
            .ok_or_else(|| TransitError::StopNotFound(StopName::new(name)))
    }

    /// Stop owning `vertex` (either its wait or its board vertex)
    pub fn at_vertex(&self, vertex: VertexId) -> Option<&Stop> {
        self.stops.get(vertex / 2)
    }

    /// Stops in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.stops.len() * 2
    }

    /// Road distance exactly as declared (or mirrored), without fallback
    pub fn declared_distance(&self, from: &str, to: &str) -> Option<f64> {
        self.distances.get(from)?.get(to).copied()
    }

    /// Great-circle distance between two declared stops, in meters
    pub fn geo_distance(&self, from: &str, to: &str) -> Result<f64> {
        let a = self.require(from)?;
        let b = self.require(to)?;
        Ok(great_circle_distance(a.location, b.location))
    }

    /// Road distance, falling back to the geodesic distance when none is declared
    pub fn road_distance(&self, from: &str, to: &str) -> Result<f64> {
        self.road_distance_with(from, to, DistancePolicy::Lenient)
    }

    pub fn road_distance_with(&self, from: &str, to: &str, policy: DistancePolicy) -> Result<f64> {
        if let Some(meters) = self.declared_distance(from, to) {
            return Ok(meters);
        }

        match policy {
            DistancePolicy::Strict => Err(TransitError::MissingRoadDistance {
                from: StopName::new(from),
                to: StopName::new(to),
            }),
            DistancePolicy::Lenient => {
                let meters = self.geo_distance(from, to)?;
                tracing::warn!(
                    from,
                    to,
                    meters,
                    "no road distance declared, using geodesic distance"
                );
                Ok(meters)
            }
        }
    }

    pub(crate) fn register_bus(&mut self, name: &str, bus: BusNumber) -> Result<()> {
        let position = *self
            .index
            .get(name)
            .ok_or_else(|| TransitError::StopNotFound(StopName::new(name)))?;
        self.stops[position].serving_buses.insert(bus);
        Ok(())
    }

    pub(crate) fn clear_serving_buses(&mut self) {
        for stop in &mut self.stops {
            stop.serving_buses.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use approx::assert_relative_eq;

    use super::*;

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    fn registry() -> StopRegistry {
        let mut stops = StopRegistry::new();
        stops
            .add_stop(
                "Tolstopaltsevo".into(),
                55.611087,
                37.20829,
                [("Marushkino".into(), 3900.0)],
            )
            .unwrap();
        stops
            .add_stop(
                "Marushkino".into(),
                55.595884,
                37.209755,
                [("Rasskazovka".into(), 9900.0)],
            )
            .unwrap();
        stops
            .add_stop("Rasskazovka".into(), 55.632761, 37.333324, [])
            .unwrap();
        stops
    }

    #[test]
    fn test_vertices_are_assigned_in_pairs() {
        let stops = registry();
        let ids: Vec<_> = stops.iter().map(|s| (s.wait_vertex, s.board_vertex())).collect();

        assert_eq!(ids, vec![(0, 1), (2, 3), (4, 5)]);
        assert_eq!(stops.vertex_count(), 6);
        assert_eq!(stops.at_vertex(3).unwrap().name.as_str(), "Marushkino");
        assert!(is_wait_vertex(4));
        assert!(!is_wait_vertex(5));
    }

    #[test]
    fn test_symmetric_fallback() {
        let stops = registry();

        assert_eq!(stops.road_distance("Tolstopaltsevo", "Marushkino").unwrap(), 3900.0);
        assert_eq!(stops.road_distance("Marushkino", "Tolstopaltsevo").unwrap(), 3900.0);
        assert_eq!(stops.road_distance("Rasskazovka", "Marushkino").unwrap(), 9900.0);
    }

    #[test]
    fn test_explicit_reverse_takes_precedence() {
        let mut stops = StopRegistry::new();
        stops.add_stop("A".into(), 55.0, 37.0, [("B".into(), 100.0)]).unwrap();
        stops.add_stop("B".into(), 55.0, 37.1, [("A".into(), 250.0)]).unwrap();
        stops.add_stop("C".into(), 55.0, 37.2, [("D".into(), 400.0)]).unwrap();
        stops.add_stop("D".into(), 55.0, 37.3, []).unwrap();

        assert_eq!(stops.road_distance("A", "B").unwrap(), 100.0);
        assert_eq!(stops.road_distance("B", "A").unwrap(), 250.0);

        // a later declaration must not clobber an explicit one
        let mut reversed = StopRegistry::new();
        reversed.add_stop("B".into(), 55.0, 37.1, [("A".into(), 250.0)]).unwrap();
        reversed.add_stop("A".into(), 55.0, 37.0, [("B".into(), 100.0)]).unwrap();
        assert_eq!(reversed.road_distance("B", "A").unwrap(), 250.0);
        assert_eq!(reversed.road_distance("A", "B").unwrap(), 100.0);
    }

    #[test]
    fn test_geodesic_fallback_and_strict_policy() {
        let stops = registry();
        let geo = stops.geo_distance("Tolstopaltsevo", "Rasskazovka").unwrap();

        assert!(stops.declared_distance("Tolstopaltsevo", "Rasskazovka").is_none());
        assert_relative_eq!(stops.road_distance("Tolstopaltsevo", "Rasskazovka").unwrap(), geo);
        assert!(matches!(
            stops.road_distance_with("Tolstopaltsevo", "Rasskazovka", DistancePolicy::Strict),
            Err(TransitError::MissingRoadDistance { .. })
        ));
    }

    #[test]
    fn test_geodesic_fallback_is_logged() {
        let stops = registry();

        let (meters, logs) =
            with_captured_logs(|| stops.road_distance("Tolstopaltsevo", "Rasskazovka"));
        assert!(meters.unwrap() > 0.0);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("no road distance declared"));
        assert!(logs.contains("Rasskazovka"));

        let (_, logs) = with_captured_logs(|| stops.road_distance("Marushkino", "Tolstopaltsevo"));
        assert!(logs.is_empty());
    }

    #[test]
    fn test_unknown_and_duplicate_stops() {
        let mut stops = registry();

        assert!(matches!(
            stops.geo_distance("Samara", "Marushkino"),
            Err(TransitError::StopNotFound(_))
        ));
        assert!(matches!(
            stops.add_stop("Marushkino".into(), 0.0, 0.0, []),
            Err(TransitError::DuplicateStop(_))
        ));
        assert_eq!(stops.len(), 3);
        assert_eq!(stops.get("Marushkino").unwrap().wait_vertex, 2);
    }
}
