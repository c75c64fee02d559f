//! Type-safe identifiers for stops and buses.
//!
//! Stop names use Arc<str> for cheap cloning; they are cloned into every
//! route and distance entry that mentions them.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Unique name of a stop
#[derive(Clone, Debug, PartialOrd, Ord)]
pub struct StopName(Arc<str>);

impl StopName {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for StopName {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for StopName {}

impl Hash for StopName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

// Lets maps keyed by StopName be queried with a plain &str.
impl Borrow<str> for StopName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StopName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for StopName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Numeric bus line identifier (declared as text, e.g. `"750"`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusNumber(u32);

impl BusNumber {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BusNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BusNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u32> for BusNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_name_equality() {
        let id1 = StopName::new("Marushkino");
        let id2 = StopName::new("Marushkino");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_stop_name_lookup_by_str() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(StopName::new("Biryusinka"), 42);

        assert_eq!(map.get("Biryusinka"), Some(&42));
        assert_eq!(map.get(&StopName::new("Biryusinka")), Some(&42));
    }

    #[test]
    fn test_bus_number_parsing() {
        assert_eq!("750".parse::<BusNumber>(), Ok(BusNumber::new(750)));
        assert_eq!(" 256 ".parse::<BusNumber>(), Ok(BusNumber::new(256)));
        assert!("7a".parse::<BusNumber>().is_err());
        assert_eq!(BusNumber::new(828).to_string(), "828");
    }

    #[test]
    fn test_bus_numbers_order_numerically() {
        let mut buses = vec![BusNumber::new(828), BusNumber::new(256), BusNumber::new(1000)];
        buses.sort();
        assert_eq!(buses, vec![BusNumber::new(256), BusNumber::new(828), BusNumber::new(1000)]);
    }
}
