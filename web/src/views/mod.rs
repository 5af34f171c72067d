pub mod booking_confirmation;
pub mod not_found;
pub mod service_booking;

pub use booking_confirmation::BookingConfirmation;
pub use not_found::NotFoundPage;
pub use service_booking::ServiceBookingPage;
