//! Reading JSON log streams.
//!
//! Each non-blank line of the source is parsed as an independent JSON object
//! into a [`LogLine`]. Known fields are extracted according to a [`Schema`];
//! unknown keys are ignored. A malformed line produces a [`LineError`] for
//! that line only; whether iteration continues is decided by the
//! [`ErrorPolicy`](crate::config::ErrorPolicy).
//!
//! # Example
//!
//! ```
//! use shared::reader::JsonLogsStream;
//!
//! let input = concat!(
//!     r#"{"type": "console", "timestamp": "2019-01-03T16:30:53,058+0100", "level": "ERROR", "#,
//!     r#""component": "o.e.Node", "message": "failed", "stacktrace": ["E: boom", "at f(f.rs:1)"]}"#,
//!     "\n",
//!     "not json\n",
//! );
//!
//! let records: Vec<_> = JsonLogsStream::new(input.as_bytes()).collect();
//! assert_eq!(records.len(), 2);
//!
//! let line = records[0].outcome.as_ref().unwrap();
//! assert_eq!(line.stacktrace.as_deref(), Some(&["E: boom".to_string(), "at f(f.rs:1)".to_string()][..]));
//! assert!(records[1].outcome.is_err());
//! ```

mod async_stream;
mod error;
mod sync;

pub use async_stream::AsyncJsonLogsStream;
pub use error::LineError;
pub use sync::JsonLogsStream;

use serde_json::{Map, Value};

use crate::config::{ErrorPolicy, ReaderConfig, Schema};
use crate::models::{Field, LogLine};

/// The outcome of reading one line of a JSON log stream.
#[derive(Debug)]
pub struct LogLineRecord {
    /// 1-based line number in the source. Blank lines are counted.
    pub line_number: usize,
    /// The parsed line, or the reason it could not be parsed.
    pub outcome: Result<LogLine, LineError>,
}

impl LogLineRecord {
    /// Converts the record into its outcome.
    ///
    /// # Errors
    ///
    /// Returns the line's error if it could not be parsed.
    pub fn into_result(self) -> Result<LogLine, LineError> {
        self.outcome
    }
}

/// Parses a single log line.
///
/// Returns `Ok(None)` for blank lines. A trailing `\r` is ignored.
///
/// # Errors
///
/// Returns an error if the line is not a JSON object, lacks a field the
/// schema requires, or holds a known field of the wrong type. A known field
/// set to `null` counts as the wrong type.
///
/// # Example
///
/// ```
/// use shared::config::Schema;
/// use shared::reader::{parse_line, LineError};
///
/// assert!(parse_line("   ", Schema::Default).unwrap().is_none());
/// assert!(matches!(
///     parse_line(r#"{"message": "hi"}"#, Schema::Default),
///     Err(LineError::MissingField { .. })
/// ));
/// ```
pub fn parse_line(line: &str, schema: Schema) -> Result<Option<LogLine>, LineError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line).map_err(LineError::Syntax)?;
    let Value::Object(object) = value else {
        return Err(LineError::NotAnObject);
    };

    for &field in schema.required() {
        if !object.contains_key(field.key()) {
            return Err(LineError::MissingField { field, schema });
        }
    }

    let mut recognized = Map::new();
    for (key, value) in object {
        let Some(field) = Field::from_key(&key).filter(|f| schema.recognizes(*f)) else {
            continue;
        };
        check_type(field, &value)?;
        recognized.insert(key, value);
    }

    serde_json::from_value(Value::Object(recognized))
        .map(Some)
        .map_err(LineError::InvalidField)
}

fn check_type(field: Field, value: &Value) -> Result<(), LineError> {
    let ok = match field {
        Field::Stacktrace => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        _ => value.is_string(),
    };
    if ok {
        Ok(())
    } else {
        Err(LineError::WrongType {
            field,
            expected: match field {
                Field::Stacktrace => "an array of strings",
                _ => "a string",
            },
        })
    }
}

/// Turns raw lines into records, applying the schema and error policy.
///
/// Shared by the blocking and async streams.
#[derive(Debug)]
struct LineDecoder {
    config: ReaderConfig,
    line_number: usize,
    done: bool,
}

impl LineDecoder {
    fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            line_number: 0,
            done: false,
        }
    }

    /// Decodes one physical line, without its `\n`. Returns `None` for
    /// blank lines.
    fn decode(&mut self, bytes: &[u8]) -> Option<LogLineRecord> {
        self.line_number += 1;
        let outcome = match std::str::from_utf8(bytes) {
            Ok(line) => parse_line(line, self.config.schema).transpose()?,
            Err(_) => Err(LineError::InvalidUtf8),
        };
        Some(self.record(outcome))
    }

    /// Records a read failure. The stream ends afterwards.
    fn read_failed(&mut self, err: std::io::Error) -> LogLineRecord {
        self.line_number += 1;
        self.record(Err(LineError::Io(err)))
    }

    fn record(&mut self, outcome: Result<LogLine, LineError>) -> LogLineRecord {
        if let Err(err) = &outcome {
            tracing::warn!(
                line_number = self.line_number,
                error = %err,
                "Malformed log line"
            );
            if !err.is_recoverable() || self.config.policy == ErrorPolicy::FailFast {
                tracing::debug!(line_number = self.line_number, "Stopping log stream");
                self.done = true;
            }
        }
        LogLineRecord {
            line_number: self.line_number,
            outcome,
        }
    }
}

/// Strips the trailing `\n` from a line read with `read_until`.
fn trim_newline(buffer: &[u8]) -> &[u8] {
    buffer.strip_suffix(b"\n").unwrap_or(buffer)
}
