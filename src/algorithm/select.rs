use std::collections::HashSet;

use log::debug;

use super::reference_bands;
use crate::schemas::{BandRange, Entity, NormalizedYear, Selection};

/// Bands of `entity` covering exactly `requested`, or `NoData`.
///
/// A country row is drawn only when every requested band is present; a
/// partial breakdown is never returned.
pub fn select(
    entity: &Entity,
    requested: &HashSet<BandRange>,
    countries: Option<&NormalizedYear>,
) -> Selection {
    let country = match entity {
        Entity::ReferenceAxis(spec) => return Selection::Bands(reference_bands(spec)),
        Entity::Country(country) => country,
    };

    let bands = match countries.and_then(|countries| countries.get(country)) {
        Some(bands) if !bands.is_empty() => bands,
        _ => return Selection::NoData,
    };

    if requested.is_empty() {
        return Selection::NoData;
    }

    let usable = bands
        .iter()
        .filter(|band| requested.contains(&band.range()))
        .cloned()
        .collect::<Vec<_>>();

    let covered = usable
        .iter()
        .map(|band| band.range())
        .collect::<HashSet<_>>();

    // @NOTE: every requested range present, and only once
    if covered.len() == requested.len() && usable.len() == covered.len() {
        Selection::Bands(usable)
    } else {
        debug!(
            "{} covers {} of {} requested bands with {} bands",
            country,
            covered.len(),
            requested.len(),
            usable.len()
        );
        Selection::NoData
    }
}
