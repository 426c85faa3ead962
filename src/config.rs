use std::str::FromStr;

use anyhow::{anyhow, Result};

pub const DEFAULT_CONSISTENCY_THRESHOLD: f64 = 1.0 / 100.0;
pub const DEFAULT_REFERENCE: &str = "percentBar-0-90-99-99.9-100";

const ENV_CONSISTENCY_THRESHOLD: &str = "BANDS_CONSISTENCY_THRESHOLD";
const ENV_MISSING_LOWER: &str = "BANDS_MISSING_LOWER";
const ENV_REFERENCE: &str = "BANDS_REFERENCE";

/// What to do with a band whose lower boundary no earlier band reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingBoundPolicy {
    /// Drop the whole country.
    #[default]
    Reject,
    /// Log and drop only the offending band.
    SkipBand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Relative disagreement allowed between two derivations of a boundary.
    pub consistency_threshold: f64,
    pub missing_lower: MissingBoundPolicy,
    /// Percent bar used when no entity list names one.
    pub reference: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            consistency_threshold: DEFAULT_CONSISTENCY_THRESHOLD,
            missing_lower: MissingBoundPolicy::default(),
            reference: DEFAULT_REFERENCE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        // @NOTE: reconciliation
        if let Some(value) = lookup(ENV_CONSISTENCY_THRESHOLD) {
            settings.consistency_threshold = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|threshold| threshold.is_finite() && *threshold >= 0.0)
                .ok_or_else(|| anyhow!("Invalid {}: {:?}", ENV_CONSISTENCY_THRESHOLD, value))?;
        }

        if let Some(value) = lookup(ENV_MISSING_LOWER) {
            settings.missing_lower = value
                .parse::<MissingBoundPolicy>()
                .map_err(|error| anyhow!("Invalid {}: {}", ENV_MISSING_LOWER, error))?;
        }

        // @NOTE: rendering
        if let Some(value) = lookup(ENV_REFERENCE) {
            settings.reference = value;
        }

        Ok(settings)
    }
}

impl FromStr for MissingBoundPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::SkipBand),
            other => Err(format!("expected reject or skip, got {:?}", other)),
        }
    }
}
