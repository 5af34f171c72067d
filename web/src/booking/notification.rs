pub const SLOT_FETCH_FAILED: &str = "Could not fetch available time slots";
pub const SCHEDULE_FETCH_FAILED: &str = "Could not load availability";
pub const BOOKING_FAILED_FALLBACK: &str = "We couldn't create your booking. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Destructive,
}

/// A toast raised by the booking flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.kind == NotificationKind::Destructive
    }
}
