//! Weekly calendar view and next-workout lookup

use chrono::{Datelike, Days, Duration, NaiveDate};

use super::{CompletionOracle, ScheduleResolver};
use crate::calendar::{Calendar, Clock};
use crate::program::{ActiveProgram, WorkoutDay, WorkoutProgram};

/// How far ahead to look for the next training day
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// One calendar cell of the weekly view
#[derive(Debug, Clone)]
pub struct ScheduledDate<'a> {
    pub date: NaiveDate,
    pub index: Option<usize>,
    pub day: Option<&'a WorkoutDay>,
    pub completed: bool,
    pub is_today: bool,
}

impl ScheduledDate<'_> {
    pub fn is_rest_day(&self) -> bool {
        self.day.is_some_and(|d| d.is_rest_day)
    }
}

impl<C: Calendar, K: Clock> ScheduleResolver<C, K> {
    /// Monday-start week containing today, shifted by `week_offset` weeks.
    ///
    /// `None` when the shifted week falls outside the representable date range.
    pub fn week<'a>(
        &self,
        program: &'a WorkoutProgram,
        active: &ActiveProgram,
        oracle: &impl CompletionOracle,
        week_offset: i64,
    ) -> Option<Vec<ScheduledDate<'a>>> {
        let today = self.today();
        let monday = today
            .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))?
            .checked_add_signed(Duration::try_weeks(week_offset)?)?;
        // Sunday must exist too
        monday.checked_add_days(Days::new(6))?;

        let week = (0..7)
            .map(|offset| {
                let date = monday + Days::new(offset);
                let index = self.day_index_on(date, program, active);
                ScheduledDate {
                    date,
                    index,
                    day: index.map(|i| &program.days[i]),
                    completed: oracle.is_date_completed(&program.id, date),
                    is_today: date == today,
                }
            })
            .collect();
        Some(week)
    }

    /// First training day strictly after today, skipping rest days
    pub fn next_workout<'a>(
        &self,
        program: &'a WorkoutProgram,
        active: &ActiveProgram,
        horizon_days: u32,
    ) -> Option<(NaiveDate, &'a WorkoutDay)> {
        let today = self.today();
        (1..=horizon_days as u64)
            .map_while(|offset| today.checked_add_days(Days::new(offset)))
            .filter_map(|date| self.workout_day_on(date, program, active).map(|day| (date, day)))
            .find(|(_, day)| !day.is_rest_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{FixedClock, UtcCalendar};
    use crate::program::ProgramCategory;
    use chrono::{DateTime, TimeZone, Utc, Weekday};

    struct NothingDone;

    impl CompletionOracle for NothingDone {
        fn is_date_completed(&self, _program_id: &str, _day: NaiveDate) -> bool {
            false
        }
    }

    struct EveryDayDone;

    impl CompletionOracle for EveryDayDone {
        fn is_date_completed(&self, program_id: &str, _day: NaiveDate) -> bool {
            program_id == "wk"
        }
    }

    fn program(names: &[&str]) -> WorkoutProgram {
        WorkoutProgram {
            id: "wk".into(),
            name: "Week".into(),
            description: String::new(),
            category: ProgramCategory::Split,
            frequency: String::new(),
            split: None,
            days: names
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    if n.starts_with("Rest") {
                        WorkoutDay::rest(i as u32 + 1, n)
                    } else {
                        WorkoutDay::training(i as u32 + 1, n, "", vec![])
                    }
                })
                .collect(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_week_starts_monday() {
        // 2025-01-08 is a Wednesday
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 8)));
        let p = program(&["A", "B", "C"]);
        let active = ActiveProgram::new("wk", at(2025, 1, 6));

        let week = r.week(&p, &active, &NothingDone, 0).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date.weekday(), Weekday::Mon);
        assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert!(week[2].is_today);
        assert_eq!(week.iter().filter(|d| d.is_today).count(), 1);

        let names: Vec<_> = week.iter().map(|d| d.day.unwrap().name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "A", "B", "C", "A"]);
    }

    #[test]
    fn test_week_offset_shifts_by_seven_days() {
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 8)));
        let p = program(&["A", "B", "C"]);
        let active = ActiveProgram::new("wk", at(2025, 1, 6));

        let next = r.week(&p, &active, &EveryDayDone, 1).unwrap();
        assert_eq!(next[0].date, NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert!(next.iter().all(|d| !d.is_today));
        assert!(next.iter().all(|d| d.completed));
        // 7 days past an "A" Monday lands on "B"
        assert_eq!(next[0].index, Some(1));

        let prev = r.week(&p, &active, &NothingDone, -1).unwrap();
        assert_eq!(prev[0].date, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(prev[6].index, Some(2));
    }

    #[test]
    fn test_week_of_empty_program_has_no_days() {
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 8)));
        let p = program(&[]);
        let active = ActiveProgram::new("wk", at(2025, 1, 6));

        let week = r.week(&p, &active, &NothingDone, 0).unwrap();
        assert!(week.iter().all(|d| d.day.is_none() && d.index.is_none()));
    }

    #[test]
    fn test_week_far_out_of_range_is_none() {
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 8)));
        let p = program(&["A", "B", "C"]);
        let active = ActiveProgram::new("wk", at(2025, 1, 6));

        assert!(r.week(&p, &active, &NothingDone, 20_000_000).is_none());
        assert!(r.week(&p, &active, &NothingDone, -20_000_000).is_none());
        assert!(r.week(&p, &active, &NothingDone, i64::MAX).is_none());
        assert!(r.week(&p, &active, &NothingDone, i64::MIN).is_none());
        // Large but representable
        assert!(r.week(&p, &active, &NothingDone, 10_000).is_some());
    }

    #[test]
    fn test_next_workout_skips_rest_days() {
        // Today is "A", then two rest days, then "B"
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 1)));
        let p = program(&["A", "Rest", "Rest 2", "B"]);
        let active = ActiveProgram::new("wk", at(2025, 1, 1));

        let (date, day) = r.next_workout(&p, &active, DEFAULT_HORIZON_DAYS).unwrap();
        assert_eq!(day.name, "B");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }

    #[test]
    fn test_next_workout_never_returns_today() {
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 1)));
        let p = program(&["A"]);
        let active = ActiveProgram::new("wk", at(2025, 1, 1));

        let (date, _) = r.next_workout(&p, &active, DEFAULT_HORIZON_DAYS).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn test_next_workout_beyond_horizon() {
        let r = ScheduleResolver::new(UtcCalendar::utc(), FixedClock(at(2025, 1, 1)));
        let p = program(&["A", "Rest", "Rest", "Rest"]);
        let active = ActiveProgram::new("wk", at(2025, 1, 1));

        assert!(r.next_workout(&p, &active, 2).is_none());
        assert!(r.next_workout(&p, &active, 4).is_some());
    }
}
