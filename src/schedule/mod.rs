//! Schedule module - maps calendar dates onto program days
//!
//! Every lookup is re-derived from `(date, start_date)`; nothing here
//! caches a day index, so switching the anchor or the program takes
//! effect on the very next call.

pub mod week;

pub use week::{DEFAULT_HORIZON_DAYS, ScheduledDate};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::calendar::{Calendar, Clock};
use crate::program::{ActiveProgram, WorkoutDay, WorkoutProgram};

/// Read-only source of truth for "was this date's workout done"
pub trait CompletionOracle {
    fn is_date_completed(&self, program_id: &str, day: NaiveDate) -> bool;
}

/// Pure resolver from (program, activation anchor, date) to a program day
pub struct ScheduleResolver<C: Calendar, K: Clock> {
    calendar: C,
    clock: K,
}

impl<C: Calendar, K: Clock> ScheduleResolver<C, K> {
    pub fn new(calendar: C, clock: K) -> Self {
        Self { calendar, clock }
    }

    /// Today's calendar day
    pub fn today(&self) -> NaiveDate {
        self.calendar.day_of(self.clock.now())
    }

    /// Position within the cycle for `date`.
    ///
    /// The cycle repeats in both directions, so dates before the start
    /// still resolve. `None` for an empty program or when `active` is
    /// bound to a different program.
    pub fn day_index(&self, date: DateTime<Utc>, program: &WorkoutProgram, active: &ActiveProgram) -> Option<usize> {
        if !active.is_for(program) {
            return None;
        }
        let n = program.cycle_len() as i64;
        if n == 0 {
            debug!(program = %program.id, "schedule lookup on empty program");
            return None;
        }

        let since_start = self.calendar.days_between(active.start_date, date);
        Some(since_start.rem_euclid(n) as usize)
    }

    /// Same as [`day_index`](Self::day_index) for a calendar day
    pub fn day_index_on(&self, day: NaiveDate, program: &WorkoutProgram, active: &ActiveProgram) -> Option<usize> {
        self.day_index(self.calendar.midnight(day), program, active)
    }

    pub fn current_day_index(&self, program: &WorkoutProgram, active: &ActiveProgram) -> Option<usize> {
        self.day_index(self.clock.now(), program, active)
    }

    /// Tomorrow's index, derived from tomorrow's date rather than `current + 1`
    pub fn next_day_index(&self, program: &WorkoutProgram, active: &ActiveProgram) -> Option<usize> {
        let tomorrow = self.today().succ_opt()?;
        self.day_index_on(tomorrow, program, active)
    }

    pub fn workout_day<'a>(
        &self,
        date: DateTime<Utc>,
        program: &'a WorkoutProgram,
        active: &ActiveProgram,
    ) -> Option<&'a WorkoutDay> {
        self.day_index(date, program, active).map(|i| &program.days[i])
    }

    pub fn workout_day_on<'a>(
        &self,
        day: NaiveDate,
        program: &'a WorkoutProgram,
        active: &ActiveProgram,
    ) -> Option<&'a WorkoutDay> {
        self.day_index_on(day, program, active).map(|i| &program.days[i])
    }

    pub fn current_day<'a>(&self, program: &'a WorkoutProgram, active: &ActiveProgram) -> Option<&'a WorkoutDay> {
        self.workout_day(self.clock.now(), program, active)
    }

    /// Completion lives with the oracle; the resolver only asks
    pub fn is_completed(&self, date: DateTime<Utc>, program: &WorkoutProgram, oracle: &impl CompletionOracle) -> bool {
        oracle.is_date_completed(&program.id, self.calendar.day_of(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{FixedClock, UtcCalendar};
    use crate::program::{ProgramCategory, WorkoutDay};
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;

    fn program(names: &[&str]) -> WorkoutProgram {
        WorkoutProgram {
            id: "test".into(),
            name: "Test".into(),
            description: String::new(),
            category: ProgramCategory::Split,
            frequency: String::new(),
            split: None,
            days: names
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    if *n == "Rest" {
                        WorkoutDay::rest(i as u32 + 1, n)
                    } else {
                        WorkoutDay::training(i as u32 + 1, n, "", vec![])
                    }
                })
                .collect(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    fn resolver(now: DateTime<Utc>) -> ScheduleResolver<UtcCalendar, FixedClock> {
        ScheduleResolver::new(UtcCalendar::utc(), FixedClock(now))
    }

    struct Done(HashSet<(String, NaiveDate)>);

    impl CompletionOracle for Done {
        fn is_date_completed(&self, program_id: &str, day: NaiveDate) -> bool {
            self.0.contains(&(program_id.to_string(), day))
        }
    }

    #[test]
    fn test_index_steady_across_dst_change() {
        use crate::calendar::{Calendar, ZonedCalendar};
        use chrono_tz::America::Sao_Paulo;

        let cal = ZonedCalendar::new(Sao_Paulo);
        let p = program(&["A", "B", "C"]);
        let active = ActiveProgram::new("test", cal.midnight(NaiveDate::from_ymd_opt(2018, 11, 1).unwrap()));
        let r = ScheduleResolver::new(cal, FixedClock(active.start_date));

        // Sao Paulo moved to -02 on 2018-11-04
        for d in 1..=10u32 {
            let day = NaiveDate::from_ymd_opt(2018, 11, d).unwrap();
            assert_eq!(r.day_index_on(day, &p, &active), Some(((d - 1) % 3) as usize), "2018-11-{:02}", d);
        }
        // 23:30 local on the eve of the change is still Nov 3
        let late = Utc.with_ymd_and_hms(2018, 11, 4, 2, 30, 0).unwrap();
        assert_eq!(r.day_index(late, &p, &active), Some(2));
    }

    #[test]
    fn test_three_day_scenario() {
        let p = program(&["A", "B", "C"]);
        let active = ActiveProgram::new("test", at(2025, 1, 1));
        let r = resolver(at(2025, 1, 1));

        assert_eq!(r.day_index(at(2025, 1, 1), &p, &active), Some(0));
        assert_eq!(r.day_index(at(2025, 1, 2), &p, &active), Some(1));
        assert_eq!(r.day_index(at(2025, 1, 4), &p, &active), Some(0));
        assert_eq!(r.day_index(at(2024, 12, 31), &p, &active), Some(2));
        assert_eq!(r.workout_day(at(2024, 12, 31), &p, &active).unwrap().name, "C");
    }

    #[test]
    fn test_index_is_k_mod_n() {
        let p = program(&["A", "B", "C", "D", "Rest"]);
        let start = at(2025, 3, 10);
        let active = ActiveProgram::new("test", start);
        let r = resolver(start);

        for k in -40i64..40 {
            let date = start + Duration::days(k);
            assert_eq!(r.day_index(date, &p, &active), Some(k.rem_euclid(5) as usize), "k = {}", k);
        }
    }

    #[test]
    fn test_day_before_start_wraps_to_last() {
        let p = program(&["A", "B", "C", "D"]);
        let start = at(2025, 5, 1);
        let active = ActiveProgram::new("test", start);
        let r = resolver(start);

        assert_eq!(r.day_index(start, &p, &active), Some(0));
        assert_eq!(r.day_index(start - Duration::days(1), &p, &active), Some(3));
    }

    #[test]
    fn test_periodic_with_cycle_length() {
        let p = program(&["A", "B", "Rest"]);
        let active = ActiveProgram::new("test", at(2025, 1, 1));
        let r = resolver(at(2025, 1, 1));

        for offset in 0..10 {
            let d = at(2025, 2, 1) + Duration::days(offset);
            assert_eq!(
                r.day_index(d, &p, &active),
                r.day_index(d + Duration::days(3), &p, &active)
            );
        }
    }

    #[test]
    fn test_time_of_day_does_not_matter() {
        let p = program(&["A", "B"]);
        let active = ActiveProgram::new("test", Utc.with_ymd_and_hms(2025, 1, 1, 23, 50, 0).unwrap());
        let r = resolver(at(2025, 1, 1));
        let early_next_day = Utc.with_ymd_and_hms(2025, 1, 2, 0, 5, 0).unwrap();
        assert_eq!(r.day_index(early_next_day, &p, &active), Some(1));
    }

    #[test]
    fn test_reanchoring_drops_old_start() {
        let p = program(&["A", "B", "C"]);
        let r = resolver(at(2025, 1, 1));
        let old = ActiveProgram::new("test", at(2025, 1, 1));
        let new = ActiveProgram::new("test", at(2025, 1, 5));

        assert_eq!(r.day_index(at(2025, 1, 5), &p, &old), Some(1));
        assert_eq!(r.day_index(at(2025, 1, 5), &p, &new), Some(0));
        for k in 0..9 {
            let d = at(2025, 1, 5) + Duration::days(k);
            assert_eq!(r.day_index(d, &p, &new), Some((k % 3) as usize));
        }
    }

    #[test]
    fn test_empty_program_is_undefined() {
        let p = program(&[]);
        let active = ActiveProgram::new("test", at(2025, 1, 1));
        let r = resolver(at(2025, 1, 1));

        assert_eq!(r.day_index(at(2025, 1, 3), &p, &active), None);
        assert!(r.workout_day(at(2025, 1, 3), &p, &active).is_none());
        assert_eq!(r.current_day_index(&p, &active), None);
        assert_eq!(r.next_day_index(&p, &active), None);
    }

    #[test]
    fn test_other_program_does_not_resolve() {
        let p = program(&["A", "B"]);
        let active = ActiveProgram::new("something-else", at(2025, 1, 1));
        let r = resolver(at(2025, 1, 1));
        assert_eq!(r.day_index(at(2025, 1, 1), &p, &active), None);
    }

    #[test]
    fn test_current_and_next_follow_clock() {
        let p = program(&["A", "B", "C"]);
        let active = ActiveProgram::new("test", at(2025, 1, 1));
        let r = resolver(at(2025, 1, 3));

        assert_eq!(r.current_day_index(&p, &active), Some(2));
        // Wraps via tomorrow's date
        assert_eq!(r.next_day_index(&p, &active), Some(0));
        assert_eq!(r.current_day(&p, &active).unwrap().name, "C");
    }

    #[test]
    fn test_rest_day_is_a_valid_result() {
        let p = program(&["A", "Rest"]);
        let active = ActiveProgram::new("test", at(2025, 1, 1));
        let r = resolver(at(2025, 1, 2));
        let day = r.current_day(&p, &active).unwrap();
        assert!(day.is_rest_day);
        assert!(day.exercises.is_empty());
    }

    #[test]
    fn test_is_completed_delegates_to_oracle() {
        let p = program(&["A", "B"]);
        let r = resolver(at(2025, 1, 1));
        let mut set = HashSet::new();
        set.insert(("test".to_string(), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
        let oracle = Done(set);

        assert!(r.is_completed(at(2025, 1, 2), &p, &oracle));
        assert!(!r.is_completed(at(2025, 1, 1), &p, &oracle));
        // Same cycle slot, different date
        assert!(!r.is_completed(at(2025, 1, 4), &p, &oracle));
    }
}
