//! Error types for the star-rating core crate.

use std::fmt;

use crate::object::ObjectError;

/// The main error type for core operations.
#[derive(Debug)]
pub enum CoreError {
    /// The UI dispatcher has already been installed on another thread.
    DispatcherThreadConflict,
    /// The UI dispatcher has not been installed yet.
    DispatcherNotInstalled,
    /// Object-related error.
    Object(ObjectError),
    /// Signal-related error.
    Signal(SignalError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DispatcherThreadConflict => {
                write!(
                    f,
                    "UI dispatcher was already installed on a different thread"
                )
            }
            Self::DispatcherNotInstalled => {
                write!(
                    f,
                    "UI dispatcher has not been installed. Call UiDispatcher::install() first"
                )
            }
            Self::Object(err) => write!(f, "Object error: {err}"),
            Self::Signal(err) => write!(f, "Signal error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Object(err) => Some(err),
            Self::Signal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ObjectError> for CoreError {
    fn from(err: ObjectError) -> Self {
        Self::Object(err)
    }
}

impl From<SignalError> for CoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
    /// Failed to queue the signal invocation to the UI dispatcher.
    QueueFailed,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
            Self::QueueFailed => write!(f, "Failed to queue signal invocation"),
        }
    }
}

impl std::error::Error for SignalError {}

/// A specialized Result type for star-rating core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
