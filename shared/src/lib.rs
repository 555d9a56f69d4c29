//! Jsonlog Shared Library
//!
//! This crate encodes exceptions for single-line JSON log records and reads
//! such records back from a line-oriented stream.
//!
//! # Modules
//!
//! - [`models`] - Exception, event and log line models
//! - [`encoder`] - Renders an exception chain as a `stacktrace` JSON fragment
//! - [`reader`] - Lazily parses JSON log lines into records
//! - [`config`] - Encoder and reader configuration
//!
//! # Example
//!
//! ```
//! use shared::encoder::encode;
//! use shared::models::{CapturedException, Frame, LogEvent};
//! use shared::reader::JsonLogsStream;
//!
//! let event = LogEvent::new("search failed").with_exception(
//!     CapturedException::new("QueryError")
//!         .with_message("{\n  \"query\": 1\n}")
//!         .with_frame(Frame::new("search::run")),
//! );
//!
//! let record = format!(
//!     r#"{{"type": "console", "timestamp": "2024-01-15T10:30:00Z", "level": "ERROR", "component": "search", "message": "search failed"{}}}"#,
//!     encode(&event),
//! );
//!
//! let line = JsonLogsStream::new(record.as_bytes())
//!     .next()
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//! assert_eq!(line.stacktrace.unwrap().len(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod encoder;
pub mod models;
pub mod reader;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
