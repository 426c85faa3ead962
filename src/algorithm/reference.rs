use itertools::Itertools;

use super::ReferenceSpec;
use crate::schemas::PercentileBand;

/// One band per consecutive pair of percent-bar boundaries, sized by the interval width.
///
/// Coordinates are taken straight from the boundaries (`99.9` sits at
/// `0.999`), so consecutive bands share their edge exactly and the last one
/// ends at `1.0`.
pub fn reference_bands(spec: &ReferenceSpec) -> Vec<PercentileBand> {
    spec.boundaries()
        .iter()
        .tuple_windows()
        .map(|(lower, upper)| {
            let size_lower = lower.value / 100.0;
            let size_upper = upper.value / 100.0;

            PercentileBand {
                lower: lower.label.clone(),
                upper: upper.label.clone(),
                size: (upper.value - lower.value) / 100.0,
                size_lower,
                size_upper,
                country: spec.as_str().to_string(),
            }
        })
        .collect()
}
