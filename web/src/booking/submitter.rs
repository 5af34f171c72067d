use chrono::NaiveDate;
use shared_types::{CreateBookingRequest, CreatedBooking};
use validator::Validate;

use super::notification::{Notification, BOOKING_FAILED_FALLBACK};
use super::selection::BookingSelection;
use crate::error::BookingError;
use crate::utils::timezone::format_date_for_booking;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
}

/// A request that has left `Idle` and awaits the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    request: CreateBookingRequest,
    date: NaiveDate,
}

impl PendingSubmission {
    pub fn request(&self) -> &CreateBookingRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded {
        booking_id: String,
        route: String,
        notification: Notification,
    },
    Failed {
        notification: Notification,
    },
}

pub fn booking_route(booking_id: &str) -> String {
    format!("/bookings/{}", urlencoding::encode(booking_id))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSubmitter {
    status: SubmitStatus,
}

impl BookingSubmitter {
    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    pub fn can_submit(&self, selection: &BookingSelection) -> bool {
        !self.is_submitting() && selection.is_complete()
    }

    /// Moves to `Submitting`. Incomplete selections and double submits are no-ops.
    pub fn begin(&mut self, selection: &BookingSelection) -> Option<PendingSubmission> {
        if self.is_submitting() {
            return None;
        }
        let request = selection.to_request()?;
        let date = selection.date?;
        if let Err(err) = request.validate() {
            tracing::warn!(error = %err, "refusing to submit invalid booking request");
            return None;
        }

        self.status = SubmitStatus::Submitting;
        Some(PendingSubmission { request, date })
    }

    pub fn finish(
        &mut self,
        pending: PendingSubmission,
        result: Result<CreatedBooking, BookingError>,
    ) -> SubmitOutcome {
        self.status = SubmitStatus::Idle;

        match result {
            Ok(created) => {
                tracing::info!(booking_id = %created.id, "booking created");
                let description = format!(
                    "Your appointment on {} at {} is booked.",
                    format_date_for_booking(pending.date),
                    pending.request.time
                );
                SubmitOutcome::Succeeded {
                    route: booking_route(&created.id),
                    booking_id: created.id,
                    notification: Notification::success("Booking confirmed", description),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "booking creation failed");
                let description = err
                    .remote_message()
                    .unwrap_or(BOOKING_FAILED_FALLBACK)
                    .to_string();
                SubmitOutcome::Failed {
                    notification: Notification::destructive("Booking failed", description),
                }
            }
        }
    }
}
