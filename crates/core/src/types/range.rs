//! Half-open time range type.

use core::fmt;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building or splitting a [`TimeRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The start of the range is not strictly before its end.
    #[error("range start {from} must be before end {to}")]
    Inverted {
        /// Requested start.
        from: DateTime<Utc>,
        /// Requested end.
        to: DateTime<Utc>,
    },
    /// The split point does not fall strictly inside the range.
    #[error("split point {at} is outside range {range}")]
    SplitOutOfRange {
        /// Requested split point.
        at: DateTime<Utc>,
        /// The range that was being split.
        range: TimeRange,
    },
    /// An interval step of zero hours was requested.
    #[error("interval step must be at least one hour")]
    ZeroStep,
}

/// A half-open interval `[from, to)` of UTC timestamps.
///
/// ## Constraints
///
/// - `from < to`, checked at construction
/// - Immutable once built
///
/// ## Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ct_metrics_core::TimeRange;
///
/// let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let to = Utc.with_ymd_and_hms(2026, 1, 1, 1, 0, 0).unwrap();
///
/// assert!(TimeRange::new(from, to).is_ok());
/// assert!(TimeRange::new(to, from).is_err());
/// assert!(TimeRange::new(from, from).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `from >= to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, RangeError> {
        if from >= to {
            return Err(RangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn from(&self) -> DateTime<Utc> {
        self.from
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Length of the range.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.to - self.from
    }

    /// Split into `[from, at)` and `[at, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::SplitOutOfRange`] unless `from < at < to`.
    pub fn split_at(&self, at: DateTime<Utc>) -> Result<(Self, Self), RangeError> {
        if at <= self.from || at >= self.to {
            return Err(RangeError::SplitOutOfRange { at, range: *self });
        }
        Ok((
            Self {
                from: self.from,
                to: at,
            },
            Self { from: at, to: self.to },
        ))
    }

    /// Lower bound in the wire format used by query filters.
    #[must_use]
    pub fn start_iso(&self) -> String {
        to_iso(self.from)
    }

    /// Upper bound in the wire format used by query filters.
    #[must_use]
    pub fn end_iso(&self) -> String {
        to_iso(self.to)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {})", self.start_iso(), self.end_iso())
    }
}

/// Render a timestamp as RFC 3339 UTC with millisecond precision.
///
/// ```
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap();
/// assert_eq!(ct_metrics_core::to_iso(ts), "2026-02-02T00:00:00.000Z");
/// ```
#[must_use]
pub fn to_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
