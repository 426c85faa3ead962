use std::collections::HashMap;

use log::{debug, error, warn};
use rayon::prelude::*;

use super::{parse_band_key, parse_size, percentile_value, BandError, LOWEST_PERCENTILE};
use crate::config::{MissingBoundPolicy, Settings};
use crate::schemas::{BandRange, NormalizedYear, PercentileBand, RawBand, RawYear};

/// Two ways of reaching the same boundary disagreed beyond the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Inconsistency {
    pub country: String,
    pub boundary: String,
    pub existing: f64,
    pub computed: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub bands: Vec<PercentileBand>,
    pub inconsistencies: Vec<Inconsistency>,
}

struct Entry {
    range: BandRange,
    lower: f64,
    upper: f64,
    size: f64,
}

pub fn within_tolerance(computed: f64, existing: f64, threshold: f64) -> bool {
    let delta = (computed - existing).abs();

    if computed == 0.0 {
        delta <= threshold
    } else {
        delta / computed.abs() <= threshold
    }
}

/// Place every band of a country on the cumulative axis.
///
/// Bands are visited by ascending lower then upper percentile, so each lower
/// boundary has been reached by an earlier band (or is `0`) before it is
/// used. Overlapping reports of the same span (`p90p100` next to `p90p99` and
/// `p99p100`) are allowed; when they disagree the later value wins and the
/// disagreement is reported.
pub fn normalize_country(
    country: &str,
    raw: &[RawBand],
    settings: &Settings,
) -> Result<Normalized, BandError> {
    let mut entries = raw
        .iter()
        .map(|band| {
            let range = parse_band_key(band.key())?;
            let size = parse_size(band.key(), band.size())?;

            // @NOTE: parse_band_key already checked both labels are numeric
            let lower = percentile_value(&range.lower).unwrap_or_default();
            let upper = percentile_value(&range.upper).unwrap_or_default();

            Ok(Entry {
                range,
                lower,
                upper,
                size,
            })
        })
        .collect::<Result<Vec<Entry>, BandError>>()?;

    entries.sort_by(|a, b| a.lower.total_cmp(&b.lower).then(a.upper.total_cmp(&b.upper)));

    let seed = HashMap::from([(LOWEST_PERCENTILE.to_string(), 0.0)]);
    let (_, normalized) = entries.into_iter().try_fold(
        (seed, Normalized::default()),
        |(mut bounds, mut normalized), entry| {
            let size_lower = match bounds.get(&entry.range.lower).copied() {
                Some(size_lower) => size_lower,
                None => match settings.missing_lower {
                    MissingBoundPolicy::Reject => {
                        return Err(BandError::MissingLowerBound {
                            country: country.to_string(),
                            lower: entry.range.lower,
                        });
                    }
                    MissingBoundPolicy::SkipBand => {
                        error!(
                            "Lower percent bound {} missing for {}, skip band {}",
                            entry.range.lower, country, entry.range
                        );
                        return Ok((bounds, normalized));
                    }
                },
            };
            let size_upper = size_lower + entry.size;

            if let Some(existing) = bounds.get(&entry.range.upper) {
                if !within_tolerance(size_upper, *existing, settings.consistency_threshold) {
                    warn!(
                        "Data inconsistency in {}: calculated percentile bound of {} at percentile {}, but was already calculated as {}",
                        country, size_upper, entry.range.upper, existing
                    );

                    normalized.inconsistencies.push(Inconsistency {
                        country: country.to_string(),
                        boundary: entry.range.upper.clone(),
                        existing: *existing,
                        computed: size_upper,
                    });
                }
            }

            bounds.insert(entry.range.upper.clone(), size_upper);
            normalized.bands.push(PercentileBand {
                lower: entry.range.lower,
                upper: entry.range.upper,
                size: entry.size,
                size_lower,
                size_upper,
                country: country.to_string(),
            });

            Ok((bounds, normalized))
        },
    )?;

    Ok(normalized)
}

/// Normalize every country of one year. Countries without data, or whose data
/// cannot be placed, are left out of the result.
pub fn normalize_year(year: &str, countries: &RawYear, settings: &Settings) -> NormalizedYear {
    countries
        .par_iter()
        .filter_map(|(country, raw)| {
            let raw = raw.as_ref()?;

            match normalize_country(country, raw, settings) {
                Ok(normalized) => {
                    debug!(
                        "Normalized {} bands of {} in {} ({} inconsistencies)",
                        normalized.bands.len(),
                        country,
                        year,
                        normalized.inconsistencies.len()
                    );
                    Some((country.clone(), normalized.bands))
                }
                Err(error) => {
                    error!("Drop {} in {}: {}", country, year, error);
                    None
                }
            }
        })
        .collect()
}
