use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub timezone: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct WorkingHoursRow {
    pub weekday: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct UnavailableDateRow {
    pub blocked_on: NaiveDate,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct Service {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: String,
    pub provider_id: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    pub status: String,
}

pub const CANCELLED_STATUS: &str = "cancelled";
pub const PENDING_STATUS: &str = "pending";
