//! Injectable clock for time-dependent expansion strategies.
//!
//! Only the calendar-aware strategies read the clock. Injecting it keeps
//! those strategies pure and deterministic under test: fix the clock to a
//! March date and the "current semester" label is always "1st semester".

use chrono::{DateTime, TimeZone, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time. The production implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
///
/// Used by tests and by callers that want reproducible expansion output
/// (e.g. replaying logged queries).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Builds a fixed clock from calendar components (UTC).
    ///
    /// Falls back to the Unix epoch if the components are out of range.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
