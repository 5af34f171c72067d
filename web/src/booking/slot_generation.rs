//! Server-side derivation of bookable start times for one day.

use chrono::{NaiveTime, Timelike};
use shared_types::WorkingHours;

const MINUTES_PER_DAY: u32 = 24 * 60;

pub fn parse_time(label: &str) -> Option<NaiveTime> {
    let label = label.trim();
    NaiveTime::parse_from_str(label, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(label, "%H:%M:%S"))
        .ok()
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// A span of the day already taken by an existing booking, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    start: u32,
    end: u32,
}

impl BusyInterval {
    pub fn from_booking(time: &str, duration_minutes: u32) -> Option<Self> {
        let start = minutes_of(parse_time(time)?);
        Some(Self {
            start,
            end: (start + duration_minutes.max(1)).min(MINUTES_PER_DAY),
        })
    }

    fn overlaps(&self, start: u32, end: u32) -> bool {
        start < self.end && self.start < end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRules {
    pub duration_minutes: u32,
    pub interval_minutes: u32,
    /// Slots starting at or before this time are dropped (used for today).
    pub not_before: Option<NaiveTime>,
}

/// Start times, as `HH:MM`, at which a service of the given length fits
/// inside the opening hours without touching a busy interval.
pub fn generate_slots(hours: &WorkingHours, rules: &SlotRules, busy: &[BusyInterval]) -> Vec<String> {
    if !hours.is_open() {
        return Vec::new();
    }
    let (Some(open), Some(close)) = (
        hours.start.as_deref().and_then(parse_time),
        hours.end.as_deref().and_then(parse_time),
    ) else {
        return Vec::new();
    };

    let open = minutes_of(open);
    let close = minutes_of(close);
    let duration = rules.duration_minutes.max(1);
    let step = rules.interval_minutes.max(1);
    let cutoff = rules.not_before.map(|time| time.num_seconds_from_midnight());

    (open..close)
        .step_by(step as usize)
        .filter(|start| start + duration <= close)
        .filter(|start| cutoff.map_or(true, |cutoff| start * 60 > cutoff))
        .filter(|start| !busy.iter().any(|taken| taken.overlaps(*start, start + duration)))
        .map(|start| format!("{:02}:{:02}", start / 60, start % 60))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(duration: u32) -> SlotRules {
        SlotRules {
            duration_minutes: duration,
            interval_minutes: 30,
            not_before: None,
        }
    }

    #[test]
    fn fits_service_length_before_closing() {
        let hours = WorkingHours::new("09:00", "12:00");
        assert_eq!(
            generate_slots(&hours, &rules(60), &[]),
            ["09:00", "09:30", "10:00", "10:30", "11:00"]
        );
        assert!(generate_slots(&hours, &rules(240), &[]).is_empty());
    }

    #[test]
    fn skips_overlapping_bookings() {
        let hours = WorkingHours::new("09:00", "12:00");
        let busy = [BusyInterval::from_booking("10:00", 60).unwrap()];
        assert_eq!(generate_slots(&hours, &rules(60), &busy), ["09:00", "11:00"]);
    }

    #[test]
    fn drops_started_slots_for_today() {
        let hours = WorkingHours::new("09:00", "12:00");
        let today = SlotRules {
            not_before: NaiveTime::from_hms_opt(10, 0, 0),
            ..rules(60)
        };
        assert_eq!(generate_slots(&hours, &today, &[]), ["10:30", "11:00"]);
    }

    #[test]
    fn closed_or_malformed_hours_yield_nothing() {
        assert!(generate_slots(&WorkingHours::default(), &rules(30), &[]).is_empty());
        let malformed = WorkingHours {
            start: Some("09:00".to_string()),
            end: Some("late".to_string()),
        };
        assert!(generate_slots(&malformed, &rules(30), &[]).is_empty());
    }

    #[test]
    fn accepts_seconds_in_stored_times() {
        let hours = WorkingHours::new("09:00:00", "10:00:00");
        assert_eq!(generate_slots(&hours, &rules(30), &[]), ["09:00", "09:30"]);
    }
}
