use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::{format_iso_date, CreateBookingRequest, CreatedBooking, ProviderSchedule, ServiceAvailability};

use crate::booking::BookingBackend;
use crate::error::BookingError;
use crate::server::{create_booking, get_provider_schedule, get_service_availability};

/// Reaches the booking endpoints through the app's server functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerFnBackend;

#[async_trait(?Send)]
impl BookingBackend for ServerFnBackend {
    async fn provider_schedule(
        &self,
        provider_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProviderSchedule, BookingError> {
        get_provider_schedule(
            provider_id.to_string(),
            format_iso_date(start),
            format_iso_date(end),
        )
        .await
        .map_err(BookingError::from)
    }

    async fn service_availability(
        &self,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<ServiceAvailability, BookingError> {
        get_service_availability(service_id.to_string(), format_iso_date(date))
            .await
            .map_err(BookingError::from)
    }

    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreatedBooking, BookingError> {
        create_booking(request.services, request.date, request.time)
            .await
            .map_err(BookingError::from)
    }
}
