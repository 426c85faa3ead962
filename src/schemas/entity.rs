use serde::{Serialize, Serializer};

use super::PercentileBand;
use crate::algorithm::{BandError, ReferenceSpec, REFERENCE_PREFIX};

/// A row of the chart: a real country, or the synthetic percent-bar axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Country(String),
    ReferenceAxis(ReferenceSpec),
}

/// Bands to draw for one entity, or the "no data" marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Bands(Vec<PercentileBand>),
    NoData,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub entity: Entity,
    pub bands: Selection,
}

impl Entity {
    pub fn parse(name: &str) -> Result<Self, BandError> {
        if name.starts_with(REFERENCE_PREFIX) {
            Ok(Self::ReferenceAxis(ReferenceSpec::parse(name)?))
        } else {
            Ok(Self::Country(name.to_string()))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Country(name) => name,
            Self::ReferenceAxis(spec) => spec.as_str(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::ReferenceAxis(_))
    }
}

impl Selection {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn bands(&self) -> &[PercentileBand] {
        match self {
            Self::Bands(bands) => bands,
            Self::NoData => &[],
        }
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// NoData goes out as `[null]` so a renderer still draws one placeholder bar.
impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bands(bands) => bands.serialize(serializer),
            Self::NoData => [Option::<&PercentileBand>::None].serialize(serializer),
        }
    }
}
