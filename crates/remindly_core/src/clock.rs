//! Time source for trigger resolution.
//!
//! A clock owns a time zone, not just an offset: "today" and "tomorrow" are
//! the user's calendar days, and a reminder picked for 08:00 fires at 08:00
//! wall-clock time even when the offset changes overnight.

use crate::service::reminder::resolve_trigger_instant;
use chrono::{DateTime, FixedOffset, Local, NaiveTime, TimeZone, Utc};

pub trait Clock: Send + Sync {
    /// Current instant, tagged with the zone's offset at that instant.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Wall-clock time of day of `instant` in the clock's zone.
    fn time_of_day(&self, instant: DateTime<Utc>) -> NaiveTime;

    /// Next instant after `now()` whose wall-clock time is `picked`.
    fn next_occurrence(&self, picked: NaiveTime) -> DateTime<FixedOffset>;
}

/// Wall clock in the host's local time zone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn time_of_day(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&Local).time()
    }

    fn next_occurrence(&self, picked: NaiveTime) -> DateTime<FixedOffset> {
        resolve_trigger_instant(picked, &Local::now()).fixed_offset()
    }
}

/// Clock frozen at one instant of zone `Tz`.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone = FixedOffset>(pub DateTime<Tz>);

impl<Tz> Clock for FixedClock<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    fn now(&self) -> DateTime<FixedOffset> {
        self.0.fixed_offset()
    }

    fn time_of_day(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.0.timezone()).time()
    }

    fn next_occurrence(&self, picked: NaiveTime) -> DateTime<FixedOffset> {
        resolve_trigger_instant(picked, &self.0).fixed_offset()
    }
}
