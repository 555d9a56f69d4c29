//! Configuration module for Jsonlog.
//!
//! This module contains configuration structures for the encoder and the reader.

pub mod encoder;
pub mod reader;

pub use encoder::{ConfigError, EncoderConfig};
pub use reader::{ErrorPolicy, ReaderConfig, Schema};
