//! Timezone and display formatting helpers for booking dates and times.
//!
//! All calendar reasoning happens in the provider's zone; the client device's
//! zone is never consulted.
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parses an IANA zone name, falling back to UTC when absent or unknown.
pub fn resolve_timezone(name: Option<&str>) -> Tz {
    match name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(timezone = name, "unknown provider timezone, using UTC");
            Tz::UTC
        }),
        None => Tz::UTC,
    }
}

/// The provider-local calendar day at `now`.
pub fn today_in(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Convert 24-hour time to 12-hour format
pub fn convert_to_12_hour_format(time_24: &str) -> String {
    if let Some((hour_str, minute_str)) = time_24.split_once(':') {
        if let Ok(hour) = hour_str.parse::<u32>() {
            let (hour_12, period) = match hour {
                0 => (12, "AM"),
                1..=11 => (hour, "AM"),
                12 => (12, "PM"),
                _ => (hour - 12, "PM"),
            };

            // Only show minutes if they're not 00
            return if minute_str == "00" {
                format!("{} {}", hour_12, period)
            } else {
                format!("{}:{} {}", hour_12, minute_str, period)
            };
        }
    }
    time_24.to_string()
}

/// Long-form date for confirmations, e.g. "March 10, 2025".
pub fn format_date_for_booking(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn twelve_hour_labels() {
        assert_eq!(convert_to_12_hour_format("00:00"), "12 AM");
        assert_eq!(convert_to_12_hour_format("09:30"), "9:30 AM");
        assert_eq!(convert_to_12_hour_format("12:00"), "12 PM");
        assert_eq!(convert_to_12_hour_format("14:30"), "2:30 PM");
        assert_eq!(convert_to_12_hour_format("soon"), "soon");
    }

    #[test]
    fn long_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(format_date_for_booking(date), "March 10, 2025");
    }

    #[test]
    fn timezone_resolution_and_today() {
        assert_eq!(resolve_timezone(None), Tz::UTC);
        assert_eq!(resolve_timezone(Some("Mars/Olympus")), Tz::UTC);
        let new_york = resolve_timezone(Some("America/New_York"));
        assert_eq!(new_york, chrono_tz::America::New_York);

        let now = Utc.with_ymd_and_hms(2025, 3, 11, 2, 0, 0).unwrap();
        assert_eq!(today_in(now, Tz::UTC), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        assert_eq!(today_in(now, new_york), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }
}
