//! Turn the tabular export of the inequality source (one row per percentile
//! and year, one column per country) into a [`RawDataset`].

use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{anyhow, Context, Result};
use log::{error, info};

use crate::algorithm::complete_implicit_bands;
use crate::schemas::{RawBand, RawDataset, RawYear};

pub const PERCENTILE_COLUMN: &str = "Percentile";
pub const YEAR_COLUMN: &str = "Year";

/// Country column headers carry extra lines of description; keep the last one.
pub fn column_names<S: AsRef<str>>(header: &[S]) -> Result<Vec<String>> {
    match header {
        [percentile, year, ..]
            if percentile.as_ref() == PERCENTILE_COLUMN && year.as_ref() == YEAR_COLUMN => {}
        _ => {
            return Err(anyhow!(
                "Header must start with {} and {} columns",
                PERCENTILE_COLUMN,
                YEAR_COLUMN
            ))
        }
    }

    Ok(header
        .iter()
        .map(|name| {
            name.as_ref()
                .lines()
                .last()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .collect())
}

/// Group `(percentile, size)` pairs by year and country. Countries whose sizes
/// are all blank get no data; the others have missing bands filled in.
pub fn dataset_from_rows<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> Result<RawDataset> {
    let columns = column_names(header)?;
    let mut grouped = BTreeMap::<(String, String), Vec<RawBand>>::new();

    for row in rows {
        let (percentile, year) = match (row.first(), row.get(1)) {
            (Some(percentile), Some(year)) => (percentile.trim(), year.trim()),
            _ => continue,
        };

        for (country, size) in columns.iter().zip(row.iter()).skip(2) {
            grouped
                .entry((year.to_string(), country.clone()))
                .or_default()
                .push(RawBand::new(percentile, size.trim()));
        }
    }

    let mut dataset = RawDataset::default();

    for ((year, country), bands) in grouped {
        let bands = if bands.iter().all(RawBand::is_blank) {
            None
        } else {
            match complete_implicit_bands(&bands) {
                Ok(bands) => Some(bands),
                Err(error) => {
                    error!("Drop {} in {}: {}", country, year, error);
                    None
                }
            }
        };

        dataset.years.entry(year).or_default().insert(country, bands);
    }

    info!(
        "Collected {} years over {} countries",
        dataset.years.len(),
        columns.len().saturating_sub(2)
    );
    Ok(dataset)
}

/// Read a CSV export, header included, and group it with [`dataset_from_rows`].
pub fn dataset_from_csv<R: Read>(reader: R) -> Result<RawDataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(String::from)
        .collect::<Vec<String>>();
    let rows = reader
        .records()
        .map(|record| record.map(|record| record.iter().map(String::from).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()
        .context("Failed to read CSV rows")?;

    dataset_from_rows(&header, &rows)
}

/// Fill in implied bands for every country of an already grouped dataset.
pub fn complete_dataset(raw: &RawDataset) -> RawDataset {
    let years = raw
        .years
        .iter()
        .map(|(year, countries)| {
            let countries = countries
                .iter()
                .map(|(country, bands)| {
                    let bands = bands.as_ref().and_then(|bands| {
                        complete_implicit_bands(bands)
                            .map_err(|error| error!("Drop {} in {}: {}", country, year, error))
                            .ok()
                    });
                    (country.clone(), bands)
                })
                .collect::<RawYear>();
            (year.clone(), countries)
        })
        .collect();

    RawDataset { years }
}
