use super::date::{format_date, parse_date};
use super::{DurationUnit, Schedule, TaskEnd};
use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

/// Upper bound on days pushed out by exclusions for one task. Hit only when every day is
/// excluded.
const MAX_SKIPPED_DAYS: u32 = 3660;

/// `excludes` / `includes` as written, plus the date format literal entries are compared in.
pub(super) struct Calendar<'a> {
    pub(super) date_format: &'a str,
    pub(super) excludes: &'a [String],
    pub(super) includes: &'a [String],
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl Calendar<'_> {
    fn lists(list: &[String], formatted: &str, iso: &str) -> bool {
        list.iter().any(|v| v == formatted || v == iso)
    }

    pub(super) fn is_excluded(&self, date: NaiveDateTime) -> bool {
        let formatted = format_date(date, self.date_format).to_lowercase();
        let iso = date.format("%Y-%m-%d").to_string();
        if Self::lists(self.includes, &formatted, &iso) {
            return false;
        }
        let weekday = date.weekday();
        if self.excludes.iter().any(|v| v == "weekends")
            && matches!(weekday, Weekday::Sat | Weekday::Sun)
        {
            return true;
        }
        if self.excludes.iter().any(|v| v == weekday_name(weekday)) {
            return true;
        }
        Self::lists(self.excludes, &formatted, &iso)
    }

    /// Walks the days from `start` to `end` and pushes `end` out one day for every excluded day
    /// met on the way.
    fn skip_excluded(&self, start: NaiveDateTime, mut end: NaiveDateTime) -> NaiveDateTime {
        if self.excludes.is_empty() {
            return end;
        }
        let mut day = start;
        let mut skipped = 0;
        while day <= end && skipped < MAX_SKIPPED_DAYS {
            if self.is_excluded(day) {
                end += Duration::days(1);
                skipped += 1;
            }
            day += Duration::days(1);
        }
        end
    }

    /// End of a task starting at `start`. `None` when an end date does not parse.
    pub(super) fn resolve(&self, start: NaiveDateTime, end: &TaskEnd) -> Option<Schedule> {
        let end = match end {
            TaskEnd::Date { value } => parse_date(value, self.date_format)?,
            TaskEnd::Duration { amount, unit } => {
                let amount = i64::try_from(*amount).ok()?;
                match unit {
                    DurationUnit::Hours => start.checked_add_signed(Duration::try_hours(amount)?)?,
                    DurationUnit::Days => {
                        let end = start.checked_add_signed(Duration::try_days(amount)?)?;
                        self.skip_excluded(start, end)
                    }
                    DurationUnit::Weeks => {
                        let end = start.checked_add_signed(Duration::try_weeks(amount)?)?;
                        self.skip_excluded(start, end)
                    }
                }
            }
        };
        Some(Schedule { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        parse_date(text, "YYYY-MM-DD").unwrap()
    }

    fn days(amount: u64) -> TaskEnd {
        TaskEnd::Duration {
            amount,
            unit: DurationUnit::Days,
        }
    }

    #[test]
    fn plain_day_counts_add_calendar_days() {
        let cal = Calendar {
            date_format: "YYYY-MM-DD",
            excludes: &[],
            includes: &[],
        };
        let s = cal.resolve(at("2024-01-01"), &days(5)).unwrap();
        assert_eq!(s.end, at("2024-01-06"));
    }

    #[test]
    fn weekends_push_the_end_out() {
        let excludes = vec!["weekends".to_string()];
        let cal = Calendar {
            date_format: "YYYY-MM-DD",
            excludes: &excludes,
            includes: &[],
        };
        // 2024-01-05 is a Friday.
        let s = cal.resolve(at("2024-01-05"), &days(2)).unwrap();
        assert_eq!(s.end, at("2024-01-09"));
    }

    #[test]
    fn includes_override_excludes() {
        let excludes = vec!["weekends".to_string()];
        let includes = vec!["2024-01-06".to_string()];
        let cal = Calendar {
            date_format: "YYYY-MM-DD",
            excludes: &excludes,
            includes: &includes,
        };
        assert!(!cal.is_excluded(at("2024-01-06")));
        assert!(cal.is_excluded(at("2024-01-07")));
    }

    #[test]
    fn excluding_every_day_still_terminates() {
        let excludes: Vec<String> = [
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let cal = Calendar {
            date_format: "YYYY-MM-DD",
            excludes: &excludes,
            includes: &[],
        };
        assert!(cal.resolve(at("2024-01-01"), &days(1)).is_some());
    }
}
