//! Transit data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::TransitProvider;
pub use types::{DistancePolicy, Result, RouteKind, Settings, TransitError};
