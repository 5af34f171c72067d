use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::{CreateBookingRequest, CreatedBooking, ProviderSchedule, ServiceAvailability};

use super::notification::Notification;
use crate::error::BookingError;

/// The three remote calls the booking flow depends on.
///
/// Futures are not required to be `Send`: in the browser they are driven by
/// the single-threaded event loop.
#[async_trait(?Send)]
pub trait BookingBackend {
    async fn provider_schedule(
        &self,
        provider_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProviderSchedule, BookingError>;

    async fn service_availability(
        &self,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<ServiceAvailability, BookingError>;

    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreatedBooking, BookingError>;
}

/// Where the session sends user-facing side effects.
pub trait SessionShell {
    fn notify(&self, notification: Notification);
    fn navigate(&self, path: &str);
}
