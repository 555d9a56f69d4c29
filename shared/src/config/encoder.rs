//! Encoder configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::models::DEFAULT_MAX_CAUSE_DEPTH;

/// Errors raised while validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Configuration for the stacktrace encoder.
///
/// # Examples
///
/// ```
/// use shared::config::EncoderConfig;
///
/// let config = EncoderConfig::default();
/// assert_eq!(config.max_cause_depth, 32);
/// assert!(config.validate_config().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EncoderConfig {
    /// Maximum number of chain nodes rendered, the outermost exception
    /// included. Longer chains are truncated.
    #[serde(default = "default_max_cause_depth")]
    #[validate(range(min = 1, max = 1024, message = "max_cause_depth must be within 1..=1024"))]
    pub max_cause_depth: usize,
}

fn default_max_cause_depth() -> usize {
    DEFAULT_MAX_CAUSE_DEPTH
}

impl EncoderConfig {
    /// Creates a configuration with the given depth cap.
    #[must_use]
    pub fn new(max_cause_depth: usize) -> Self {
        Self { max_cause_depth }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_cause_depth` is zero or above 1024.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }
}
