use std::collections::HashSet;

use itertools::Itertools;

use super::BandError;
use crate::schemas::BandRange;

pub const REFERENCE_PREFIX: &str = "percentBar";
pub const LOWEST_PERCENTILE: &str = "0";
pub const HIGHEST_PERCENTILE: &str = "100";

/// One boundary of a percent bar, keeping the label exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub label: String,
    pub value: f64,
}

/// Parsed form of `percentBar-0-x_1-...-x_n-100`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSpec {
    spec: String,
    boundaries: Vec<Boundary>,
}

pub fn percentile_value(label: &str) -> Option<f64> {
    label.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_band_key(key: &str) -> Result<BandRange, BandError> {
    let tokens = key.split('p').collect::<Vec<&str>>();
    let malformed = || BandError::MalformedKey {
        key: key.to_string(),
    };

    if tokens.len() != 3 || !tokens[0].is_empty() {
        return Err(malformed());
    }

    if percentile_value(tokens[1]).is_none() || percentile_value(tokens[2]).is_none() {
        return Err(malformed());
    }

    Ok(BandRange::new(tokens[1], tokens[2]))
}

pub fn parse_size(key: &str, value: &str) -> Result<f64, BandError> {
    percentile_value(value.trim()).ok_or_else(|| BandError::MalformedSize {
        key: key.to_string(),
        value: value.to_string(),
    })
}

pub fn parse_reference_spec(spec: &str) -> Result<ReferenceSpec, BandError> {
    let malformed = |reason: String| BandError::MalformedSpec {
        spec: spec.to_string(),
        reason,
    };
    let mut tokens = spec.split('-');

    if tokens.next() != Some(REFERENCE_PREFIX) {
        return Err(malformed(format!("must start with {}", REFERENCE_PREFIX)));
    }

    let boundaries = tokens
        .map(|label| {
            percentile_value(label)
                .map(|value| Boundary {
                    label: label.to_string(),
                    value,
                })
                .ok_or_else(|| malformed(format!("boundary {:?} is not a number", label)))
        })
        .collect::<Result<Vec<Boundary>, BandError>>()?;

    match (boundaries.first(), boundaries.last()) {
        (Some(first), Some(last)) if boundaries.len() >= 2 => {
            if first.value != 0.0 {
                return Err(malformed(format!("first boundary {} is not 0", first.label)));
            }
            if last.value != 100.0 {
                return Err(malformed(format!("last boundary {} is not 100", last.label)));
            }
        }
        _ => return Err(malformed("needs at least two boundaries".to_string())),
    }

    if let Some((lower, upper)) = boundaries
        .iter()
        .tuple_windows()
        .find(|(lower, upper)| lower.value >= upper.value)
    {
        return Err(malformed(format!(
            "boundaries {} and {} are not strictly increasing",
            lower.label, upper.label
        )));
    }

    Ok(ReferenceSpec {
        spec: spec.to_string(),
        boundaries,
    })
}

impl ReferenceSpec {
    pub fn parse(spec: &str) -> Result<Self, BandError> {
        parse_reference_spec(spec)
    }

    pub fn as_str(&self) -> &str {
        &self.spec
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.boundaries.iter().map(|boundary| boundary.label.as_str())
    }

    /// Every consecutive boundary pair; a country row must carry exactly these bands.
    pub fn requested_bands(&self) -> HashSet<BandRange> {
        self.boundaries
            .iter()
            .tuple_windows()
            .map(|(lower, upper)| BandRange::new(&lower.label, &upper.label))
            .collect()
    }
}
