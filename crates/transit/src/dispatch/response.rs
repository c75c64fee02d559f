//! Response documents.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::identifiers::*;
use crate::registry::BusStats;
use crate::routing::{Itinerary, Leg};

pub const NOT_FOUND: &str = "not found";

/// One entry of the response array
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    pub request_id: i64,
    #[serde(flatten)]
    pub body: ResponseBody,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Bus {
        stop_count: usize,
        unique_stop_count: usize,
        route_length: f64,
        curvature: f64,
    },
    Stop {
        buses: Vec<String>,
    },
    Route {
        total_time: f64,
        items: Vec<RouteItem>,
    },
    NotFound {
        error_message: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RouteItem {
    Wait {
        stop_name: String,
        time: f64,
    },
    Bus {
        bus: String,
        span_count: usize,
        time: f64,
    },
}

impl Response {
    pub fn new(request_id: i64, body: ResponseBody) -> Self {
        Self { request_id, body }
    }

    pub fn not_found(request_id: i64) -> Self {
        Self::new(
            request_id,
            ResponseBody::NotFound {
                error_message: NOT_FOUND,
            },
        )
    }
}

impl From<BusStats> for ResponseBody {
    fn from(stats: BusStats) -> Self {
        Self::Bus {
            stop_count: stats.stop_count,
            unique_stop_count: stats.unique_stop_count,
            route_length: stats.route_length,
            curvature: stats.curvature,
        }
    }
}

impl From<&BTreeSet<BusNumber>> for ResponseBody {
    fn from(buses: &BTreeSet<BusNumber>) -> Self {
        Self::Stop {
            buses: buses.iter().map(BusNumber::to_string).collect(),
        }
    }
}

impl From<&Leg> for RouteItem {
    fn from(leg: &Leg) -> Self {
        match leg {
            Leg::Wait { stop, minutes } => Self::Wait {
                stop_name: stop.to_string(),
                time: *minutes,
            },
            Leg::Ride {
                bus,
                span_count,
                minutes,
            } => Self::Bus {
                bus: bus.to_string(),
                span_count: *span_count,
                time: *minutes,
            },
        }
    }
}

impl From<&Itinerary> for ResponseBody {
    fn from(itinerary: &Itinerary) -> Self {
        Self::Route {
            total_time: itinerary.total_time,
            items: itinerary.legs.iter().map(RouteItem::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_not_found_shape() {
        let value = serde_json::to_value(Response::not_found(7)).unwrap();
        assert_eq!(value, json!({"request_id": 7, "error_message": "not found"}));
    }

    #[test]
    fn test_route_shape() {
        let itinerary = Itinerary {
            total_time: 7.5,
            legs: vec![
                Leg::Wait {
                    stop: "A".into(),
                    minutes: 6.0,
                },
                Leg::Ride {
                    bus: BusNumber::new(1),
                    span_count: 1,
                    minutes: 1.5,
                },
            ],
        };
        let value = serde_json::to_value(Response::new(3, (&itinerary).into())).unwrap();

        assert_eq!(
            value,
            json!({
                "request_id": 3,
                "total_time": 7.5,
                "items": [
                    {"type": "Wait", "stop_name": "A", "time": 6.0},
                    {"type": "Bus", "bus": "1", "span_count": 1, "time": 1.5}
                ]
            })
        );
    }

    #[test]
    fn test_stop_shape() {
        let buses: BTreeSet<_> = [BusNumber::new(828), BusNumber::new(256)].into_iter().collect();
        let value = serde_json::to_value(Response::new(1, (&buses).into())).unwrap();

        assert_eq!(value, json!({"request_id": 1, "buses": ["256", "828"]}));
    }
}
