//! Data models for Jsonlog.
//!
//! This module contains the exception and event abstractions consumed by the
//! encoder, and the log line record produced by the reader.

pub mod event;
pub mod exception;
pub mod log;

pub use event::{Event, LogEvent};
pub use exception::{CapturedException, Frame, Throwable, DEFAULT_MAX_CAUSE_DEPTH};
pub use log::{Field, LogLevel, LogLine};
