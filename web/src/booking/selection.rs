use chrono::NaiveDate;
use shared_types::{format_iso_date, CreateBookingRequest};

/// The user's in-progress choice of service, date and time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSelection {
    pub service_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl BookingSelection {
    pub fn is_complete(&self) -> bool {
        self.service_id.as_deref().is_some_and(|id| !id.trim().is_empty())
            && self.date.is_some()
            && self.time.as_deref().is_some_and(|time| !time.trim().is_empty())
    }

    pub fn to_request(&self) -> Option<CreateBookingRequest> {
        if !self.is_complete() {
            return None;
        }
        Some(CreateBookingRequest {
            services: vec![self.service_id.clone()?],
            date: format_iso_date(self.date?),
            time: self.time.clone()?,
        })
    }
}
