pub mod available_date_picker;
pub mod error;
pub mod loading;
pub mod notification_host;
pub mod service_booking_form;
pub mod time_slot_picker;

// Re-export commonly used types
pub use available_date_picker::AvailableDatePicker;
pub use notification_host::{LeptosShell, NotificationHost, NotificationQueue};
pub use service_booking_form::ServiceBookingForm;
pub use time_slot_picker::TimeSlotPicker;
