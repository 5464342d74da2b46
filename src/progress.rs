//! Progress analytics - streaks and training frequency

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Current and longest run of consecutive active days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

impl Streaks {
    /// Build from workout days and rest days; both count toward a streak.
    ///
    /// The current streak ends today, or yesterday if today has not been
    /// logged yet. Days after `today` are ignored.
    pub fn from_dates(workout_dates: &[NaiveDate], rest_days: &[NaiveDate], today: NaiveDate) -> Self {
        let days: BTreeSet<NaiveDate> = workout_dates
            .iter()
            .chain(rest_days.iter())
            .copied()
            .filter(|d| *d <= today)
            .collect();

        if days.is_empty() {
            return Self::default();
        }

        let mut current = 0;
        let mut check = if days.contains(&today) {
            Some(today)
        } else {
            today.pred_opt()
        };
        while let Some(day) = check {
            if !days.contains(&day) {
                break;
            }
            current += 1;
            check = day.pred_opt();
        }

        let mut longest = 1;
        let mut run = 1;
        let mut prev: Option<NaiveDate> = None;
        for day in &days {
            if let Some(p) = prev {
                if (*day - p).num_days() == 1 {
                    run += 1;
                    longest = longest.max(run);
                } else {
                    run = 1;
                }
            }
            prev = Some(*day);
        }

        Self { current, longest }
    }
}

/// Training sessions per week over the span of the history
pub fn weekly_frequency(workout_dates: &[NaiveDate]) -> f64 {
    if workout_dates.len() < 2 {
        return 0.0;
    }

    let (Some(first), Some(last)) = (workout_dates.iter().min(), workout_dates.iter().max()) else {
        return 0.0;
    };
    let days = (*last - *first).num_days() as f64;

    if days == 0.0 {
        return workout_dates.len() as f64;
    }

    (workout_dates.len() as f64 / days) * 7.0
}
