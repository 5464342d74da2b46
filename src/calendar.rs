//! Calendar capability - maps instants onto local calendar days

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Local calendar used for every "which day is it" question.
///
/// A day is midnight-to-midnight in the calendar's zone, not a rolling
/// 24 hour window, so DST transitions never shift a date.
pub trait Calendar {
    /// Calendar day the instant falls on
    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate;

    /// First instant of the given calendar day
    fn midnight(&self, day: NaiveDate) -> DateTime<Utc>;

    /// Start-of-day boundary for the day containing `instant`
    fn start_of_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.midnight(self.day_of(instant))
    }

    /// Whole calendar days from `from` to `to` (negative if `to` is earlier)
    fn days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        (self.day_of(to) - self.day_of(from)).num_days()
    }
}

/// Calendar over any chrono time zone
#[derive(Debug, Clone)]
pub struct ZonedCalendar<Tz: TimeZone> {
    tz: Tz,
}

pub type LocalCalendar = ZonedCalendar<Local>;
pub type UtcCalendar = ZonedCalendar<Utc>;

impl<Tz: TimeZone> ZonedCalendar<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl ZonedCalendar<Local> {
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl ZonedCalendar<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc)
    }
}

impl<Tz: TimeZone> Calendar for ZonedCalendar<Tz> {
    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    fn midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        // Zones that skip midnight start the day at the first hour that exists
        (0..24)
            .find_map(|hour| {
                day.and_hms_opt(hour, 0, 0)
                    .and_then(|t| self.tz.from_local_datetime(&t).earliest())
            })
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| day.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Source of "now"
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
