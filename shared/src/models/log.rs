//! Log line data model.
//!
//! Defines the `LogLine` record reconstructed from one line of a JSON log
//! stream, the closed set of known `Field` keys, and `LogLevel`.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Timestamp layout written by the JSON log layout, e.g.
/// `2019-01-03T16:30:53,058+0100`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S,%3f%z";

/// Log severity level.
///
/// Serialized in upper case; lower-case input is accepted. Log lines keep
/// their level as written, see [`LogLine::log_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Detailed debug information.
    #[serde(alias = "trace")]
    Trace,
    /// Debug information.
    #[serde(alias = "debug")]
    Debug,
    /// Informational messages.
    #[serde(alias = "info")]
    Info,
    /// Warning conditions.
    #[serde(alias = "warn")]
    Warn,
    /// Error conditions.
    #[serde(alias = "error")]
    Error,
    /// Critical/fatal conditions.
    #[serde(alias = "fatal")]
    Fatal,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Fatal => write!(f, "FATAL"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

/// A known key of a JSON log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `type`: the appender that wrote the line.
    Type,
    /// `timestamp`
    Timestamp,
    /// `level`
    Level,
    /// `component`: the logger name.
    Component,
    /// `cluster.name`
    ClusterName,
    /// `node.name`
    NodeName,
    /// `cluster.uuid`
    ClusterUuid,
    /// `node.id`
    NodeId,
    /// `message`
    Message,
    /// `stacktrace`: the encoded exception, one array element per line.
    Stacktrace,
}

impl Field {
    /// Every known field.
    pub const ALL: [Field; 10] = [
        Self::Type,
        Self::Timestamp,
        Self::Level,
        Self::Component,
        Self::ClusterName,
        Self::NodeName,
        Self::ClusterUuid,
        Self::NodeId,
        Self::Message,
        Self::Stacktrace,
    ];

    /// Looks up a field by its JSON key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// The JSON key of the field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Timestamp => "timestamp",
            Self::Level => "level",
            Self::Component => "component",
            Self::ClusterName => "cluster.name",
            Self::NodeName => "node.name",
            Self::ClusterUuid => "cluster.uuid",
            Self::NodeId => "node.id",
            Self::Message => "message",
            Self::Stacktrace => "stacktrace",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One parsed line of a JSON log stream.
///
/// Every field is optional at this level; which ones must be present is
/// decided by the reader's schema. Unknown keys are ignored.
///
/// # Example
///
/// ```
/// use shared::models::{LogLevel, LogLine};
///
/// let line: LogLine = serde_json::from_str(
///     r#"{"type": "server", "level": "WARN", "message": "disk low", "extra": 1}"#,
/// ).unwrap();
///
/// assert_eq!(line.log_level(), Some(LogLevel::Warn));
/// assert!(line.stacktrace.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// The appender that wrote the line.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub log_type: Option<String>,

    /// Timestamp text as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Severity level as written. Levels outside [`LogLevel`] are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Logger name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    /// Cluster name.
    #[serde(rename = "cluster.name", default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    /// Node name.
    #[serde(rename = "node.name", default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,

    /// Cluster UUID, once the node has joined a cluster.
    #[serde(rename = "cluster.uuid", default, skip_serializing_if = "Option::is_none")]
    pub cluster_uuid: Option<String>,

    /// Node ID, once the node has joined a cluster.
    #[serde(rename = "node.id", default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// The log message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Exception lines, present only if an exception was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Vec<String>>,
}

impl LogLine {
    /// Returns the value of a string-valued field.
    ///
    /// `stacktrace` is not a string and always yields `None`; use the field
    /// directly.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::Type => self.log_type.as_ref(),
            Field::Timestamp => self.timestamp.as_ref(),
            Field::Level => self.level.as_ref(),
            Field::Component => self.component.as_ref(),
            Field::ClusterName => self.cluster_name.as_ref(),
            Field::NodeName => self.node_name.as_ref(),
            Field::ClusterUuid => self.cluster_uuid.as_ref(),
            Field::NodeId => self.node_id.as_ref(),
            Field::Message => self.message.as_ref(),
            Field::Stacktrace => None,
        };
        value.cloned()
    }

    /// Returns whether the line carries the given field.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Stacktrace => self.stacktrace.is_some(),
            other => self.get(other).is_some(),
        }
    }

    /// Returns the severity level, if it is one of the standard levels.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.level.as_deref()?.parse().ok()
    }

    /// Parses the timestamp.
    ///
    /// Accepts the log layout's `2019-01-03T16:30:53,058+0100` form as well
    /// as RFC 3339. Returns `None` when absent or unparseable.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_log_line_deserialization() {
        let value = json!({
            "type": "console",
            "timestamp": "2019-01-03T16:30:53,058+0100",
            "level": "DEBUG",
            "component": "o.e.a.s.TransportSearchAction",
            "cluster.name": "clustername",
            "node.name": "node-0",
            "message": "msg msg",
            "stacktrace": ["java.lang.Exception: boom", "at a.b.C.d(C.java:1)"]
        });

        let line: LogLine = serde_json::from_value(value).unwrap();

        assert_eq!(line.log_type.as_deref(), Some("console"));
        assert_eq!(line.log_level(), Some(LogLevel::Debug));
        assert_eq!(line.cluster_name.as_deref(), Some("clustername"));
        assert_eq!(line.node_name.as_deref(), Some("node-0"));
        assert!(line.node_id.is_none());
        assert_eq!(line.stacktrace.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_log_line_ignores_unknown_fields() {
        let line: LogLine =
            serde_json::from_str(r#"{"message": "hi", "shard.id": 3, "tags": ["a"]}"#).unwrap();
        assert_eq!(line.message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_log_line_rejects_wrong_stacktrace_type() {
        let result = serde_json::from_str::<LogLine>(r#"{"stacktrace": "one line"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<LogLine>(r#"{"stacktrace": ["ok", 1]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_key_roundtrip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("cluster.name"), Some(Field::ClusterName));
        assert!(Field::from_key("shard.id").is_none());
    }

    #[test]
    fn test_log_line_get_and_has() {
        let line = LogLine {
            level: Some("ERROR".to_string()),
            component: Some("o.e.Node".to_string()),
            stacktrace: Some(vec![]),
            ..LogLine::default()
        };

        assert_eq!(line.get(Field::Level).as_deref(), Some("ERROR"));
        assert_eq!(line.get(Field::Component).as_deref(), Some("o.e.Node"));
        assert!(line.get(Field::Stacktrace).is_none());
        assert!(line.has(Field::Stacktrace));
        assert!(!line.has(Field::Message));
    }

    #[test]
    fn test_parsed_timestamp_layout_format() {
        let line = LogLine {
            timestamp: Some("2019-01-03T16:30:53,058+0100".to_string()),
            ..LogLine::default()
        };

        let ts = line.parsed_timestamp().unwrap();
        assert_eq!(ts.year(), 2019);
        assert_eq!(ts.hour(), 16);
        assert_eq!(ts.timestamp_subsec_millis(), 58);
        assert_eq!(ts.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_parsed_timestamp_rfc3339_and_invalid() {
        let mut line = LogLine {
            timestamp: Some("2024-01-15T10:30:00Z".to_string()),
            ..LogLine::default()
        };
        assert_eq!(line.parsed_timestamp().unwrap().day(), 15);

        line.timestamp = Some("yesterday".to_string());
        assert!(line.parsed_timestamp().is_none());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "TRACE");
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogLevel::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn test_log_level_deserialization() {
        let level: LogLevel = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(level, LogLevel::Info);

        let level: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(level, LogLevel::Error);

        assert!(serde_json::from_str::<LogLevel>("\"verbose\"").is_err());
    }

    #[test]
    fn test_nonstandard_level_is_kept() {
        let line: LogLine = serde_json::from_str(r#"{"level": "NOTICE"}"#).unwrap();

        assert_eq!(line.get(Field::Level).as_deref(), Some("NOTICE"));
        assert!(line.has(Field::Level));
        assert!(line.log_level().is_none());

        let line: LogLine = serde_json::from_str(r#"{"level": "warn"}"#).unwrap();
        assert_eq!(line.log_level(), Some(LogLevel::Warn));
        assert_eq!(line.level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_log_line_serialization_skips_absent_fields() {
        let line = LogLine {
            message: Some("m".to_string()),
            ..LogLine::default()
        };
        assert_eq!(serde_json::to_string(&line).unwrap(), r#"{"message":"m"}"#);
    }
}
