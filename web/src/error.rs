use leptos::prelude::ServerFnError;
use thiserror::Error;

/// Failures surfaced by the booking flow. None of them are fatal to the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The backend rejected the call and explained why.
    #[error("{0}")]
    Remote(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid booking request: {0}")]
    Validation(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl BookingError {
    /// The backend's own message, when it sent a non-empty one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote(message) if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<ServerFnError> for BookingError {
    fn from(err: ServerFnError) -> Self {
        match err {
            ServerFnError::ServerError(message) => Self::Remote(message),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}
