//! Decoding individual requests.
//!
//! Every concrete request is one enum variant; the `type` field of a request
//! selects the variant through the strum-generated discriminant enums.

use serde_json::Value;
use strum::{Display, EnumDiscriminants, EnumString};

use crate::dispatch::node::*;
use crate::identifiers::*;
use crate::models::types::*;
use crate::registry::expand_stops;

/// Requests that declare the network (`base_requests`)
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(PostKind), derive(Display, EnumString))]
pub enum PostRequest {
    Stop {
        name: StopName,
        latitude: f64,
        longitude: f64,
        road_distances: Vec<(StopName, f64)>,
    },
    Bus {
        number: BusNumber,
        kind: RouteKind,
        /// Expanded visiting order
        stops: Vec<StopName>,
    },
}

/// Requests answered once the network is final (`stat_requests`)
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(GetKind), derive(Display, EnumString))]
pub enum GetRequest {
    Bus { id: i64, number: BusNumber },
    Stop { id: i64, name: StopName },
    Route { id: i64, from: StopName, to: StopName },
}

fn request_type<K: std::str::FromStr>(node: &Value) -> RequestResult<K> {
    let name = node.str_at("type")?;
    name.parse()
        .map_err(|_| RequestError::UnknownType(name.to_owned()))
}

fn bus_number(node: &Value) -> RequestResult<BusNumber> {
    let name = node.str_at("name")?;
    name.parse()
        .map_err(|_| RequestError::InvalidBusNumber(name.to_owned()))
}

fn road_meters(stop: &str, node: &Value) -> RequestResult<f64> {
    let meters = node.as_int(stop)?;
    if meters < 0 {
        return Err(RequestError::OutOfRange(stop.to_owned()));
    }
    Ok(meters as f64)
}

pub fn decode_settings(node: &Value) -> RequestResult<Settings> {
    let wait = node.int_at("bus_wait_time")?;
    let wait = u32::try_from(wait).map_err(|_| RequestError::OutOfRange("bus_wait_time".into()))?;
    let velocity = node.double_at("bus_velocity")?;
    if !(velocity.is_finite() && velocity > 0.0) {
        return Err(RequestError::OutOfRange("bus_velocity".into()));
    }

    Ok(Settings::new(wait, velocity))
}

impl PostRequest {
    pub fn decode(node: &Value) -> RequestResult<Self> {
        let kind: PostKind = request_type(node)?;

        match kind {
            PostKind::Stop => {
                let road_distances = match node.opt_key("road_distances")? {
                    Some(distances) => distances
                        .as_map_node("road_distances")?
                        .iter()
                        .map(|(stop, meters)| Ok((StopName::new(stop), road_meters(stop, meters)?)))
                        .collect::<RequestResult<Vec<_>>>()?,
                    None => Vec::new(),
                };

                Ok(Self::Stop {
                    name: node.str_at("name")?.into(),
                    latitude: node.double_at("latitude")?,
                    longitude: node.double_at("longitude")?,
                    road_distances,
                })
            }
            PostKind::Bus => {
                let kind = RouteKind::from_roundtrip(node.bool_at("is_roundtrip")?);
                let declared = node
                    .key("stops")?
                    .as_array_node("stops")?
                    .iter()
                    .map(|stop| stop.as_string("stops").map(StopName::new))
                    .collect::<RequestResult<Vec<_>>>()?;

                Ok(Self::Bus {
                    number: bus_number(node)?,
                    kind,
                    stops: expand_stops(kind, declared),
                })
            }
        }
    }
}

impl GetRequest {
    pub fn decode(node: &Value) -> RequestResult<Self> {
        let kind: GetKind = request_type(node)?;
        let id = node.int_at("id")?;

        Ok(match kind {
            GetKind::Bus => Self::Bus {
                id,
                number: bus_number(node)?,
            },
            GetKind::Stop => Self::Stop {
                id,
                name: node.str_at("name")?.into(),
            },
            GetKind::Route => Self::Route {
                id,
                from: node.str_at("from")?.into(),
                to: node.str_at("to")?.into(),
            },
        })
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Bus { id, .. } | Self::Stop { id, .. } | Self::Route { id, .. } => *id,
        }
    }
}
