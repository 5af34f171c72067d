use chrono::NaiveDate;
use chrono_tz::Tz;
use shared_types::{ProviderSchedule, UnavailableDate, WorkingHours};
use std::collections::{HashMap, HashSet};

use super::calendar::{weekday_key, MonthWindow};

/// Reduces a blocked entry to the provider-local calendar day it covers.
pub fn blocked_day(entry: &UnavailableDate, tz: Tz) -> NaiveDate {
    match entry {
        UnavailableDate::Day(day) => *day,
        UnavailableDate::Local(local) => local.date(),
        UnavailableDate::Instant(instant) => instant.with_timezone(&tz).date_naive(),
    }
}

pub fn blocked_days(schedule: &ProviderSchedule, tz: Tz) -> HashSet<NaiveDate> {
    schedule
        .unavailable_dates
        .iter()
        .map(|entry| blocked_day(entry, tz))
        .collect()
}

pub fn is_working_day(date: NaiveDate, working_hours: &HashMap<String, WorkingHours>) -> bool {
    working_hours
        .get(weekday_key(date))
        .is_some_and(WorkingHours::is_open)
}

/// Keeps the days whose weekday is open and that are not blocked, in order.
pub fn available_dates(
    days: &[NaiveDate],
    working_hours: &HashMap<String, WorkingHours>,
    blocked: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    days.iter()
        .copied()
        .filter(|day| is_working_day(*day, working_hours) && !blocked.contains(day))
        .collect()
}

pub fn available_dates_in_month(
    month: &MonthWindow,
    schedule: Option<&ProviderSchedule>,
    tz: Tz,
) -> Vec<NaiveDate> {
    let Some(schedule) = schedule else {
        return Vec::new();
    };
    let blocked = blocked_days(schedule, tz);
    available_dates(&month.days(), &schedule.working_hours, &blocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekday_schedule(blocked: &[&str]) -> ProviderSchedule {
        let working_hours = ["monday", "tuesday", "wednesday", "thursday", "friday"]
            .into_iter()
            .map(|day| (day.to_string(), WorkingHours::new("09:00", "17:00")))
            .collect();
        ProviderSchedule {
            working_hours,
            unavailable_dates: blocked.iter().map(|raw| raw.parse().unwrap()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn march_2025_weekdays_minus_blocked_friday() {
        let march = MonthWindow::new(2025, 3).unwrap();
        let schedule = weekday_schedule(&["2025-03-14"]);

        let available = available_dates_in_month(&march, Some(&schedule), Tz::UTC);

        assert_eq!(available.len(), 20);
        assert!(!available.contains(&date(2025, 3, 14)));
        assert!(available.contains(&date(2025, 3, 7)));
        assert!(available.contains(&date(2025, 3, 31)));
        assert!(available.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(available
            .iter()
            .all(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn every_result_is_in_month_and_open() {
        let schedule = weekday_schedule(&[]);
        for month in 1..=12 {
            let window = MonthWindow::new(2025, month).unwrap();
            for day in available_dates_in_month(&window, Some(&schedule), Tz::UTC) {
                assert!(window.contains(day));
                assert!(is_working_day(day, &schedule.working_hours));
            }
        }
    }

    #[test]
    fn blocked_timestamps_block_the_whole_day() {
        let march = MonthWindow::new(2025, 3).unwrap();
        let schedule = weekday_schedule(&["2025-03-14T18:45:00", "2025-03-17T00:00:01Z"]);

        let available = available_dates_in_month(&march, Some(&schedule), Tz::UTC);

        assert!(!available.contains(&date(2025, 3, 14)));
        assert!(!available.contains(&date(2025, 3, 17)));
        assert_eq!(available.len(), 19);
    }

    #[test]
    fn instants_resolve_in_provider_zone() {
        let entry: UnavailableDate = "2025-03-14T02:00:00Z".parse().unwrap();
        assert_eq!(blocked_day(&entry, Tz::UTC), date(2025, 3, 14));
        assert_eq!(blocked_day(&entry, chrono_tz::America::New_York), date(2025, 3, 13));
    }

    #[test]
    fn blank_start_counts_as_closed() {
        let mut schedule = weekday_schedule(&[]);
        schedule.working_hours.insert(
            "saturday".to_string(),
            WorkingHours {
                start: Some("  ".to_string()),
                end: Some("12:00".to_string()),
            },
        );
        schedule
            .working_hours
            .insert("sunday".to_string(), WorkingHours::default());

        assert!(!is_working_day(date(2025, 3, 15), &schedule.working_hours));
        assert!(!is_working_day(date(2025, 3, 16), &schedule.working_hours));
    }

    #[test]
    fn missing_schedule_yields_nothing() {
        let march = MonthWindow::new(2025, 3).unwrap();
        assert!(available_dates_in_month(&march, None, Tz::UTC).is_empty());
        assert!(
            available_dates_in_month(&march, Some(&ProviderSchedule::default()), Tz::UTC).is_empty()
        );
    }
}
