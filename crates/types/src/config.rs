use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// How a record store serves its cell-to-record lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// Rebuild the mapping from the record list on every call.
    Recompute,
    /// Build the mapping once at construction and hand out borrows of it.
    #[default]
    Cached,
}

/// Inclusive integer range used to draw synthetic attributes.
///
/// # Examples
///
/// ```
/// use hexdex_types::config::ValueRange;
///
/// let levels = ValueRange::new(-120, -47);
/// assert!(levels.contains(-47));
/// assert!(!levels.contains(-46));
/// assert_eq!(levels.width(), 74);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: i64,
    pub high: i64,
}

impl ValueRange {
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// `false` when the bounds are inverted.
    pub const fn is_valid(&self) -> bool {
        self.low <= self.high
    }

    pub const fn contains(&self, value: i64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Number of distinct values in the range (0 when inverted).
    pub fn width(&self) -> u64 {
        if self.is_valid() {
            self.high.abs_diff(self.low) + 1
        } else {
            0
        }
    }

    pub fn as_range(&self) -> RangeInclusive<i64> {
        self.low..=self.high
    }
}

impl From<RangeInclusive<i64>> for ValueRange {
    fn from(range: RangeInclusive<i64>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}
