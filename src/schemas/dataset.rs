use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ChartRow, Entity, PercentileBand};
use crate::algorithm::{normalize_year, select};
use crate::config::Settings;

/// `(band key, size)` as reported by the source, e.g. `["p0p90", "0.6"]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawBand(pub String, pub String);

/// Country name to reported bands; `None` marks a country with no data.
pub type RawYear = BTreeMap<String, Option<Vec<RawBand>>>;

/// Country name to its normalized, ordered bands.
pub type NormalizedYear = BTreeMap<String, Vec<PercentileBand>>;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RawDataset {
    pub years: BTreeMap<String, RawYear>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InequalityKind {
    Income,
    Wealth,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DataBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<InequalityKind>,
    pub years: BTreeMap<String, NormalizedYear>,
}

impl RawBand {
    pub fn new(key: impl Into<String>, size: impl Into<String>) -> Self {
        Self(key.into(), size.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    pub fn size(&self) -> &str {
        &self.1
    }

    pub fn is_blank(&self) -> bool {
        self.1.trim().is_empty()
    }
}

impl DataBase {
    pub fn from_raw(kind: Option<InequalityKind>, raw: &RawDataset, settings: &Settings) -> Self {
        let years = raw
            .years
            .iter()
            .map(|(year, countries)| (year.clone(), normalize_year(year, countries, settings)))
            .collect();

        Self { kind, years }
    }

    pub fn year(&self, year: &str) -> Option<&NormalizedYear> {
        self.years.get(year)
    }

    /// One row per entity, in order. The band set every country must match
    /// comes from the first percent-bar entity; without one, countries get no data.
    pub fn view(&self, year: &str, entities: &[Entity]) -> Vec<ChartRow> {
        let requested = entities
            .iter()
            .find_map(|entity| match entity {
                Entity::ReferenceAxis(spec) => Some(spec.requested_bands()),
                Entity::Country(_) => None,
            })
            .unwrap_or_default();
        let countries = self.year(year);

        entities
            .iter()
            .map(|entity| ChartRow {
                entity: entity.clone(),
                bands: select(entity, &requested, countries),
            })
            .collect()
    }
}

impl fmt::Display for InequalityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Wealth => write!(f, "Wealth"),
        }
    }
}

impl FromStr for InequalityKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "wealth" => Ok(Self::Wealth),
            other => Err(format!("unknown inequality kind {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "1980": {
            "France": [["p0p50", "0.2"], ["p50p100", "0.8"]],
            "Chad": null
        }
    }"#;

    #[test]
    fn test_raw_dataset_from_json() {
        let raw: RawDataset = serde_json::from_str(RAW).unwrap();
        let year = &raw.years["1980"];

        assert_eq!(year["Chad"], None);
        assert_eq!(
            year["France"].as_ref().unwrap()[1],
            RawBand::new("p50p100", "0.8")
        );
    }

    #[test]
    fn test_database_drops_null_countries() {
        let raw: RawDataset = serde_json::from_str(RAW).unwrap();
        let db = DataBase::from_raw(Some(InequalityKind::Wealth), &raw, &Settings::default());
        let year = db.year("1980").unwrap();

        assert!(!year.contains_key("Chad"));
        assert_eq!(year["France"].len(), 2);

        let json = serde_json::to_value(&db).unwrap();
        assert_eq!(json["kind"], "wealth");
        assert_eq!(json["years"]["1980"]["France"][1]["sizeLower"], 0.2);
    }

    #[test]
    fn test_inequality_kind() {
        assert_eq!("Income".parse::<InequalityKind>(), Ok(InequalityKind::Income));
        assert_eq!(InequalityKind::Wealth.to_string(), "Wealth");
        assert!("poverty".parse::<InequalityKind>().is_err());
    }
}
