use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BandError {
    /// Band key is not of the form `p<L>p<U>`
    MalformedKey { key: String },
    /// Size of a band is not a finite number
    MalformedSize { key: String, value: String },
    /// Percent-bar spec cannot be decomposed into increasing boundaries from 0 to 100
    MalformedSpec { spec: String, reason: String },
    /// Band starts at a boundary that no earlier band reached
    MissingLowerBound { country: String, lower: String },
}

impl fmt::Display for BandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedKey { key } => {
                write!(f, "malformed band key {:?}, expected p<lower>p<upper>", key)
            }
            Self::MalformedSize { key, value } => {
                write!(f, "malformed size {:?} for band {}", value, key)
            }
            Self::MalformedSpec { spec, reason } => {
                write!(f, "malformed percent bar {:?}: {}", spec, reason)
            }
            Self::MissingLowerBound { country, lower } => {
                write!(
                    f,
                    "lower percent bound {} of {} was never reached by a previous band",
                    lower, country
                )
            }
        }
    }
}

impl std::error::Error for BandError {}
