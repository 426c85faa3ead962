use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::warn;

use super::{parse_band_key, parse_size, percentile_value, BandError};
use super::{HIGHEST_PERCENTILE, LOWEST_PERCENTILE};
use crate::schemas::{BandRange, RawBand};

/// Fill in every band implied by the reported ones.
///
/// Boundaries form a graph whose edges are reported bands (weight = size,
/// reversed edge = -size) plus the whole population `0 -> 100 = 1.0`. Every
/// boundary reachable from `0` gets a cumulative coordinate from the first
/// path that reaches it, and each pair of such boundaries yields a band.
/// Given `p0p90 = 0.6`, `p0p50 = 0.3` and `p90p100 = 0.4` this adds
/// `p50p90 = 0.3`, `p50p100 = 0.7` and the rest of the pairs.
///
/// Blank sizes are dropped before building the graph, which is how a single
/// missing band gets repaired from its neighbours. Reported bands are kept as
/// given; only missing pairs are derived, and never with a negative size.
pub fn complete_implicit_bands(raw: &[RawBand]) -> Result<Vec<RawBand>, BandError> {
    let mut graph = HashMap::<String, Vec<(String, f64)>>::new();
    let mut known = BTreeMap::<BandRange, String>::new();
    let mut link = |range: &BandRange, size: f64| {
        graph
            .entry(range.lower.clone())
            .or_default()
            .push((range.upper.clone(), size));
        graph
            .entry(range.upper.clone())
            .or_default()
            .push((range.lower.clone(), -size));
    };

    let whole = BandRange::new(LOWEST_PERCENTILE, HIGHEST_PERCENTILE);
    link(&whole, 1.0);
    known.insert(whole, "1.0".to_string());

    for band in raw.iter().filter(|band| !band.is_blank()) {
        let range = parse_band_key(band.key())?;
        let size = parse_size(band.key(), band.size())?;

        link(&range, size);
        known.insert(range, band.size().trim().to_string());
    }

    let mut coordinates = HashMap::from([(LOWEST_PERCENTILE.to_string(), 0.0)]);
    let mut stack = vec![LOWEST_PERCENTILE.to_string()];

    while let Some(boundary) = stack.pop() {
        let origin = coordinates[&boundary];

        for (next, size) in graph.get(&boundary).into_iter().flatten() {
            if !coordinates.contains_key(next) {
                coordinates.insert(next.clone(), origin + size);
                stack.push(next.clone());
            }
        }
    }

    let reached = coordinates
        .iter()
        .filter_map(|(label, coordinate)| Some((label, percentile_value(label)?, *coordinate)))
        .sorted_by(|a, b| a.1.total_cmp(&b.1))
        .collect::<Vec<_>>();

    for ((lower, _, from), (upper, _, to)) in reached.iter().tuple_combinations() {
        let range = BandRange::new(*lower, *upper);
        let size = to - from;

        if known.contains_key(&range) {
            continue;
        }

        // @NOTE: only inconsistent reports place an upper boundary below a lower one
        if size < 0.0 {
            warn!("Skip implied band {} with negative size {}", range, size);
            continue;
        }

        known.insert(range, size.to_string());
    }

    Ok(known
        .into_iter()
        .map(|(range, size)| {
            let lower = percentile_value(&range.lower).unwrap_or_default();
            let upper = percentile_value(&range.upper).unwrap_or_default();
            (lower, upper, RawBand::new(format!("p{}p{}", range.lower, range.upper), size))
        })
        .sorted_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)))
        .map(|(_, _, band)| band)
        .collect())
}
