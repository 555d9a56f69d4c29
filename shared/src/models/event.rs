//! Logging event abstraction.

use super::exception::{CapturedException, Throwable};

/// A logging event as seen by the stacktrace encoder.
pub trait Event {
    /// The formatted log message.
    fn message(&self) -> &str;

    /// The exception attached to the event, if any.
    fn exception(&self) -> Option<&dyn Throwable>;
}

/// An owned logging event.
///
/// # Example
///
/// ```
/// use shared::models::{CapturedException, Event, LogEvent};
///
/// let event = LogEvent::new("search failed")
///     .with_exception(CapturedException::new("QueryError"));
/// assert!(event.exception().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEvent {
    /// The formatted log message.
    pub message: String,

    /// The attached exception.
    pub exception: Option<CapturedException>,
}

impl LogEvent {
    /// Creates an event without an exception.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exception: None,
        }
    }

    /// Attaches an exception to the event.
    #[must_use]
    pub fn with_exception(mut self, exception: CapturedException) -> Self {
        self.exception = Some(exception);
        self
    }
}

impl Event for LogEvent {
    fn message(&self) -> &str {
        &self.message
    }

    fn exception(&self) -> Option<&dyn Throwable> {
        self.exception.as_ref().map(|e| e as &dyn Throwable)
    }
}
