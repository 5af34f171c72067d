use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Calendar dates travel as `yyyy-MM-dd` in every request and response.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Opening hours for one weekday. A missing or blank `start` means closed.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct WorkingHours {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl WorkingHours {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.start
            .as_deref()
            .is_some_and(|start| !start.trim().is_empty())
    }
}

/// An explicit override that blocks an otherwise open day.
///
/// Providers store these either as plain dates or as timestamps; the
/// timestamp forms are reduced to a calendar day by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableDate {
    Day(NaiveDate),
    Local(NaiveDateTime),
    Instant(DateTime<FixedOffset>),
}

impl FromStr for UnavailableDate {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(day) = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT) {
            return Ok(Self::Day(day));
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::Instant(instant));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(local) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Self::Local(local));
            }
        }
        Err(format!("unrecognised unavailable date: {value}"))
    }
}

impl fmt::Display for UnavailableDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{}", day.format(ISO_DATE_FORMAT)),
            Self::Local(local) => write!(f, "{}", local.format("%Y-%m-%dT%H:%M:%S")),
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

impl Serialize for UnavailableDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UnavailableDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBooking {
    pub id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSchedule {
    #[serde(default, deserialize_with = "deserialize_working_hours")]
    pub working_hours: HashMap<String, WorkingHours>,
    #[serde(default)]
    pub unavailable_dates: Vec<UnavailableDate>,
    #[serde(default)]
    pub bookings: Vec<ScheduledBooking>,
    /// IANA zone the provider works in.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl ProviderSchedule {
    pub fn hours_for(&self, weekday: &str) -> Option<&WorkingHours> {
        self.working_hours.get(weekday)
    }
}

// `null` entries mean closed, and keys are matched case-insensitively.
fn deserialize_working_hours<'de, D>(deserializer: D) -> Result<HashMap<String, WorkingHours>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Option<WorkingHours>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(day, hours)| hours.map(|hours| (day.to_lowercase(), hours)))
        .collect())
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAvailability {
    #[serde(default)]
    pub available_slots: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "At least one service must be selected"))]
    pub services: Vec<String>,
    #[validate(length(equal = 10, message = "Date must be formatted as yyyy-MM-dd"))]
    pub date: String,
    #[validate(length(min = 1, message = "A time must be selected"))]
    pub time: String,
}

impl CreateBookingRequest {
    pub fn booking_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreatedBooking {
    pub id: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CreatedBooking {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: HashMap::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub price_cents: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    pub id: String,
    pub provider_id: String,
    pub provider_name: String,
    pub services: Vec<String>,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
}
