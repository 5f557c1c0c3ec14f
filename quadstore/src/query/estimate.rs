//! Size estimates.

use std::fmt;

/// Advisory cardinality of a pattern.
///
/// Never an exact count: backends may over- or under-estimate, and some
/// cannot estimate at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproximateSize {
    /// The backend's estimate of the number of matching keys.
    Estimate(u64),
    /// The backend cannot estimate range sizes.
    Unknown,
}

impl ApproximateSize {
    /// The estimate, if the backend produced one.
    #[must_use]
    pub const fn value(self) -> Option<u64> {
        match self {
            Self::Estimate(n) => Some(n),
            Self::Unknown => None,
        }
    }

    /// Sort key for ordering patterns by selectivity: unknown sizes last.
    #[must_use]
    pub const fn cost(self) -> u64 {
        match self {
            Self::Estimate(n) => n,
            Self::Unknown => u64::MAX,
        }
    }
}

impl fmt::Display for ApproximateSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Estimate(n) => write!(f, "~{n}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
