//! Stacktrace encoding for single-line JSON log records.
//!
//! An exception renders to many lines of text, but a JSON log record must stay
//! on one line. The encoder renders the exception chain, splits it into lines
//! and writes them as a JSON array of strings:
//!
//! ```text
//! , "stacktrace": ["QueryError: search failed","at search::run(Unknown Source)"]
//! ```
//!
//! The fragment starts with a field separator so it can be spliced after the
//! last field of a record, before the closing brace.
//!
//! # Example
//!
//! ```
//! use shared::encoder::encode;
//! use shared::models::{CapturedException, LogEvent};
//!
//! let event = LogEvent::new("search failed")
//!     .with_exception(CapturedException::new("QueryError").with_message("bad \"query\""));
//!
//! assert_eq!(
//!     encode(&event),
//!     r#", "stacktrace": ["QueryError: bad \"query\""]"#
//! );
//! assert_eq!(encode(&LogEvent::new("no error")), "");
//! ```

mod chain;

pub use chain::{ExceptionChain, Truncation};

use crate::config::{ConfigError, EncoderConfig};
use crate::models::{Event, Throwable};

/// Key of the encoded field.
pub const STACKTRACE_FIELD: &str = "stacktrace";

/// Encodes the exception of a log event as a `stacktrace` JSON fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StacktraceEncoder {
    config: EncoderConfig,
}

impl StacktraceEncoder {
    /// Creates an encoder with the given configuration.
    #[must_use]
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Creates an encoder after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range.
    pub fn try_new(config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate_config()?;
        Ok(Self::new(config))
    }

    /// Returns the encoder configuration.
    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes the event's exception.
    ///
    /// Returns an empty string when the event has no exception, otherwise
    /// `, "stacktrace": [...]` with one JSON string per rendered line.
    #[must_use]
    pub fn encode(&self, event: &dyn Event) -> String {
        match event.exception() {
            Some(exception) => self.encode_throwable(exception),
            None => String::new(),
        }
    }

    /// Encodes an exception chain as a `stacktrace` fragment.
    #[must_use]
    pub fn encode_throwable(&self, exception: &dyn Throwable) -> String {
        let lines = self.lines(exception);

        let mut out = String::with_capacity(
            STACKTRACE_FIELD.len() + 8 + lines.iter().map(|l| l.len() + 3).sum::<usize>(),
        );
        out.push_str(", \"");
        out.push_str(STACKTRACE_FIELD);
        out.push_str("\": [");
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&quote(line));
        }
        out.push(']');
        out
    }

    /// Renders an exception chain into its line sequence.
    #[must_use]
    pub fn lines(&self, exception: &dyn Throwable) -> Vec<String> {
        let chain = ExceptionChain::collect(exception, self.config.max_cause_depth);
        if let Some(reason) = chain.truncation() {
            tracing::debug!(
                ?reason,
                nodes = chain.len(),
                "Exception chain truncated"
            );
        }
        chain.rendered_lines()
    }
}

/// Encodes the event's exception with the default configuration.
///
/// See [`StacktraceEncoder::encode`].
#[must_use]
pub fn encode(event: &dyn Event) -> String {
    StacktraceEncoder::default().encode(event)
}

/// Renders an exception chain into its line sequence with the default
/// configuration.
#[must_use]
pub fn stacktrace_lines(exception: &dyn Throwable) -> Vec<String> {
    StacktraceEncoder::default().lines(exception)
}

/// Quotes a line as a JSON string literal.
fn quote(line: String) -> String {
    serde_json::Value::String(line).to_string()
}
