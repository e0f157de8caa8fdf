//! Frequency parsing and fire-time arithmetic.
//!
//! A task frequency is a number of days, possibly fractional. It maps to
//! a single-unit recurrence: hours below one day, whole days otherwise.
//! Truncation (no rounding) is deliberate policy: `2.9` means every 2
//! days, `0.99` means every 23 hours.

use chrono::{DateTime, Duration, Utc};

/// A single-unit recurrence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Hours(i64),
    Days(i64),
}

impl Recurrence {
    /// A recurrence is schedulable only with a positive interval.
    /// Zero or negative frequencies parse to degenerate values that the
    /// scheduler rejects at install time.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Hours(h) => *h > 0,
            Self::Days(d) => *d > 0,
        }
    }

    /// One recurrence unit as a duration. Only meaningful when valid.
    pub fn interval(&self) -> Duration {
        match self {
            Self::Hours(h) => Duration::hours(*h),
            Self::Days(d) => Duration::days(*d),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hours(h) => write!(f, "every {h}h"),
            Self::Days(d) => write!(f, "every {d}d"),
        }
    }
}

/// Convert a frequency in days to a recurrence descriptor.
pub fn parse_frequency(freq: f64) -> Recurrence {
    if freq < 1.0 {
        Recurrence::Hours((freq * 24.0) as i64)
    } else {
        Recurrence::Days(freq as i64)
    }
}

/// First fire time on the grid anchored at `start`: the earliest
/// `start + n * interval` (n ≥ 1) that is after `now`. Past grid points
/// are skipped, not replayed.
pub fn first_fire(start: DateTime<Utc>, rec: Recurrence, now: DateTime<Utc>) -> DateTime<Utc> {
    let step = rec.interval();
    let elapsed = now - start;
    if elapsed < Duration::zero() {
        return start + step;
    }
    let steps = elapsed.num_milliseconds() / step.num_milliseconds() + 1;
    start + step * (steps as i32)
}

/// Next fire time: one unit past the previous *scheduled* time, never
/// relative to the actual delivery moment, so delivery latency does not
/// drift the grid.
pub fn advance(prev: DateTime<Utc>, rec: Recurrence) -> DateTime<Utc> {
    prev + rec.interval()
}
