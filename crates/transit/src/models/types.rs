//! Core data types and enums for the transit network.

use bus_graph::GraphError;

use crate::dispatch::RequestError;
use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Shape of a bus line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Goes out along its stops and comes back the same way
    Linear,
    /// Declared stops already describe the whole loop
    Circular,
}

impl RouteKind {
    pub fn from_roundtrip(is_roundtrip: bool) -> Self {
        if is_roundtrip {
            Self::Circular
        } else {
            Self::Linear
        }
    }
}

/// What to do when a route segment has no declared road distance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistancePolicy {
    /// Use the geodesic distance instead and log a warning
    #[default]
    Lenient,
    /// Fail route finalization
    Strict,
}

// ============================================================================
// Data Structures
// ============================================================================

/// Global routing parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub wait_time_minutes: u32,
    pub velocity_km_per_hour: f64,
}

impl Settings {
    pub fn new(wait_time_minutes: u32, velocity_km_per_hour: f64) -> Self {
        Self {
            wait_time_minutes,
            velocity_km_per_hour,
        }
    }

    /// Minutes needed to ride `meters` at the configured bus velocity
    pub fn ride_minutes(&self, meters: f64) -> f64 {
        meters / 1000.0 / self.velocity_km_per_hour * 60.0
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Stop not found: {0}")]
    StopNotFound(StopName),

    #[error("Bus not found: {0}")]
    BusNotFound(BusNumber),

    #[error("No route from {from} to {to}")]
    RouteNotFound { from: StopName, to: StopName },

    #[error("Stop declared twice: {0}")]
    DuplicateStop(StopName),

    #[error("Bus declared twice: {0}")]
    DuplicateBus(BusNumber),

    #[error("No road distance declared from {from} to {to}")]
    MissingRoadDistance { from: StopName, to: StopName },

    #[error("Routing settings were never provided")]
    MissingSettings,

    #[error("Routing settings were already provided")]
    SettingsAlreadySet,

    #[error("Invalid ordering: {0}")]
    InvalidOrdering(&'static str),

    #[error("Routing graph is inconsistent with the network: {0}")]
    InconsistentGraph(&'static str),

    #[error("No bus rides from {from} to {to}")]
    UnattributedRide { from: StopName, to: StopName },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransitError {
    /// Errors reported to clients as `"not found"` rather than failures
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StopNotFound(_) | Self::BusNotFound(_) | Self::RouteNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
