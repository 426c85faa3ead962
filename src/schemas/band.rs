use std::fmt;

use serde::{Deserialize, Serialize};

// Coordinates are compared as integers at this scale when keying bands.
const COORDINATE_SCALE: f64 = 1e12;

/// A percentile band placed on the cumulative `[0, 1]` axis of its country.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PercentileBand {
    pub lower: String,
    pub upper: String,
    pub size: f64,
    pub size_lower: f64,
    pub size_upper: f64,
    pub country: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BandRange {
    pub lower: String,
    pub upper: String,
}

/// Identity of a band as drawn: its range plus both cumulative coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BandKey {
    lower: String,
    upper: String,
    size_lower: i64,
    size_upper: i64,
}

impl PercentileBand {
    pub fn range(&self) -> BandRange {
        BandRange::new(&self.lower, &self.upper)
    }

    pub fn key(&self) -> BandKey {
        BandKey {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            size_lower: to_fixed(self.size_lower),
            size_upper: to_fixed(self.size_upper),
        }
    }
}

impl BandRange {
    pub fn new(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }
}

impl fmt::Display for BandRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

fn to_fixed(coordinate: f64) -> i64 {
    (coordinate * COORDINATE_SCALE).round() as i64
}
