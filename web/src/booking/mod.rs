//! Booking flow core: month availability, slot selection and submission.
//!
//! Nothing in here touches the DOM or the database, so it runs unchanged in
//! the browser, on the server and under `cargo test`.

pub mod availability;
pub mod backend;
pub mod calendar;
pub mod notification;
pub mod selection;
pub mod session;
pub mod slot_generation;
pub mod slots;
pub mod submitter;

pub use backend::{BookingBackend, SessionShell};
pub use calendar::{CalendarDay, CalendarView, MonthWindow};
pub use notification::{Notification, NotificationKind};
pub use selection::BookingSelection;
pub use session::{BookingPolicy, BookingSession, ScheduleOutcome, ScheduleTicket};
pub use slots::{SlotBoard, SlotOutcome, SlotTicket};
pub use submitter::{BookingSubmitter, PendingSubmission, SubmitOutcome, SubmitStatus};
