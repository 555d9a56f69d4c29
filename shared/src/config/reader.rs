//! Reader configuration.

use serde::{Deserialize, Serialize};

use crate::models::Field;

/// Which fields a log line must carry and which are recognized.
///
/// # Examples
///
/// ```
/// use shared::config::Schema;
/// use shared::models::Field;
///
/// assert!(!Schema::Default.recognizes(Field::NodeName));
/// assert!(Schema::Node.requires(Field::NodeName));
/// assert!(!Schema::Node.requires(Field::Stacktrace));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Basic log line: `type`, `timestamp`, `level`, `component`, `message`.
    #[default]
    Default,
    /// Log line written by a cluster node, additionally carrying
    /// `cluster.name` and `node.name`, plus `cluster.uuid` and `node.id`
    /// once the node has joined.
    Node,
}

const DEFAULT_REQUIRED: &[Field] = &[
    Field::Type,
    Field::Timestamp,
    Field::Level,
    Field::Component,
    Field::Message,
];

const DEFAULT_OPTIONAL: &[Field] = &[Field::Stacktrace];

const NODE_REQUIRED: &[Field] = &[
    Field::Type,
    Field::Timestamp,
    Field::Level,
    Field::Component,
    Field::ClusterName,
    Field::NodeName,
    Field::Message,
];

const NODE_OPTIONAL: &[Field] = &[Field::ClusterUuid, Field::NodeId, Field::Stacktrace];

impl Schema {
    /// Fields that must be present on every line.
    #[must_use]
    pub fn required(self) -> &'static [Field] {
        match self {
            Self::Default => DEFAULT_REQUIRED,
            Self::Node => NODE_REQUIRED,
        }
    }

    /// Fields that are extracted when present.
    #[must_use]
    pub fn optional(self) -> &'static [Field] {
        match self {
            Self::Default => DEFAULT_OPTIONAL,
            Self::Node => NODE_OPTIONAL,
        }
    }

    /// Returns whether the field must be present.
    #[must_use]
    pub fn requires(self, field: Field) -> bool {
        self.required().contains(&field)
    }

    /// Returns whether the field is extracted by this schema.
    #[must_use]
    pub fn recognizes(self, field: Field) -> bool {
        self.requires(field) || self.optional().contains(&field)
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Node => write!(f, "node"),
        }
    }
}

/// What the reader does after a malformed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Yield the error for that line and continue with the next one.
    #[default]
    Report,
    /// Yield the first error, then end the sequence.
    FailFast,
}

/// Configuration for the log line reader.
///
/// # Examples
///
/// ```
/// use shared::config::{ErrorPolicy, ReaderConfig, Schema};
///
/// let config: ReaderConfig = serde_json::from_str(r#"{"schema": "node"}"#).unwrap();
/// assert_eq!(config.schema, Schema::Node);
/// assert_eq!(config.policy, ErrorPolicy::Report);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Field set expected on each line.
    #[serde(default)]
    pub schema: Schema,

    /// Handling of malformed lines.
    #[serde(default)]
    pub policy: ErrorPolicy,
}

impl ReaderConfig {
    /// Creates a configuration for the given schema with the default policy.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            policy: ErrorPolicy::default(),
        }
    }

    /// Sets the error policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}
