//! Time source for record timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Supplies "now" to the store. Swapped out in tests to make timestamps
/// deterministic.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to milliseconds so persisted timestamps match the
/// precision browsers wrote into the same entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}
