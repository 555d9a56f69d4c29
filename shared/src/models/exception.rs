//! Exception data model.
//!
//! Defines the `Throwable` abstraction consumed by the stacktrace encoder,
//! along with `Frame` and the owned `CapturedException` implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on the number of nodes followed through a cause chain.
pub const DEFAULT_MAX_CAUSE_DEPTH: usize = 32;

/// A single call-site in a stack trace.
///
/// # Example
///
/// ```
/// use shared::models::Frame;
///
/// let frame = Frame::new("app::db::connect").with_location("src/db.rs", Some(42));
/// assert_eq!(frame.to_string(), "app::db::connect(src/db.rs:42)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Function or method name, including its module path.
    pub symbol: String,

    /// Source file, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Line within `file`, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Frame {
    /// Creates a frame with no source location.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            file: None,
            line: None,
        }
    }

    /// Sets the source location of the frame.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}({file}:{line})", self.symbol),
            (Some(file), None) => write!(f, "{}({file})", self.symbol),
            (None, _) => write!(f, "{}(Unknown Source)", self.symbol),
        }
    }
}

/// A raised error together with its stack frames and optional cause.
///
/// Implementors are free to build cause graphs that loop back on
/// themselves; the encoder walks them with a visited set and a depth cap.
pub trait Throwable {
    /// Type name of the error, e.g. `io::Error`.
    fn kind(&self) -> Option<&str>;

    /// Message text. May span several lines.
    fn message(&self) -> Option<&str>;

    /// Stack frames, innermost call first.
    fn frames(&self) -> &[Frame];

    /// The error that caused this one.
    fn cause(&self) -> Option<&dyn Throwable>;
}

/// An owned exception with an owned cause chain.
///
/// # Example
///
/// ```
/// use shared::models::{CapturedException, Frame, Throwable};
///
/// let root = CapturedException::new("io::Error")
///     .with_message("connection reset")
///     .with_frame(Frame::new("net::read"));
/// let outer = CapturedException::new("QueryError")
///     .with_message("search failed")
///     .with_cause(root);
///
/// assert_eq!(outer.cause().and_then(|c| c.message()), Some("connection reset"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapturedException {
    /// Type name of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Message text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Stack frames, innermost call first.
    #[serde(default)]
    pub frames: Vec<Frame>,

    /// The underlying cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<CapturedException>>,
}

impl CapturedException {
    /// Creates an exception of the given kind with no message, frames or cause.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Sets the message text.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Appends a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Replaces the frame list.
    #[must_use]
    pub fn with_frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.frames = frames.into_iter().collect();
        self
    }

    /// Sets the underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: CapturedException) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Captures a standard library error and its `source()` chain.
    ///
    /// Each error's `Display` output becomes the node message. Frames are
    /// not available through `std::error::Error` and are left empty. At most
    /// [`DEFAULT_MAX_CAUSE_DEPTH`] nodes are captured.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::models::{CapturedException, Throwable};
    ///
    /// let err = std::io::Error::other("disk full");
    /// let captured = CapturedException::from_error(&err);
    /// assert_eq!(captured.message(), Some("disk full"));
    /// assert!(captured.kind().is_none());
    /// ```
    #[must_use]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut messages = Vec::new();
        let mut current = Some(error);
        while let Some(err) = current {
            if messages.len() == DEFAULT_MAX_CAUSE_DEPTH {
                break;
            }
            messages.push(err.to_string());
            current = err.source();
        }

        messages
            .into_iter()
            .rev()
            .fold(None, |cause: Option<Self>, message| {
                Some(Self {
                    kind: None,
                    message: Some(message),
                    frames: Vec::new(),
                    cause: cause.map(Box::new),
                })
            })
            .unwrap_or_default()
    }
}

impl Throwable for CapturedException {
    fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }

    fn cause(&self) -> Option<&dyn Throwable> {
        self.cause.as_deref().map(|c| c as &dyn Throwable)
    }
}
