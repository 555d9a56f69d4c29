//! Cause-chain collection and rendering.

use std::collections::HashSet;

use crate::models::Throwable;

const CAUSED_BY: &str = "Caused by: ";
const FRAME_PREFIX: &str = "at ";

/// Why a chain walk stopped before reaching a node without a cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// A cause pointed back to a node already in the chain.
    Cycle,
    /// The chain reached the configured depth cap.
    DepthLimit,
}

/// An exception followed by its causes, outermost first.
///
/// # Example
///
/// ```
/// use shared::encoder::ExceptionChain;
/// use shared::models::{CapturedException, Frame};
///
/// let exc = CapturedException::new("QueryError")
///     .with_message("search failed")
///     .with_frame(Frame::new("search::run"))
///     .with_cause(CapturedException::new("io::Error"));
///
/// let chain = ExceptionChain::collect(&exc, 32);
/// assert_eq!(
///     chain.rendered_lines(),
///     vec![
///         "QueryError: search failed",
///         "at search::run(Unknown Source)",
///         "Caused by: io::Error",
///     ]
/// );
/// ```
pub struct ExceptionChain<'a> {
    nodes: Vec<&'a dyn Throwable>,
    truncation: Option<Truncation>,
}

impl<'a> ExceptionChain<'a> {
    /// Walks `cause` links from `root`, keeping at most `max_depth` nodes.
    ///
    /// A cause already visited, or one past the depth cap, ends the walk.
    /// Nodes are identified by address and concrete type, so a cause stored
    /// inline at the start of its parent is a distinct node. At least the
    /// root is always kept.
    #[must_use]
    pub fn collect(root: &'a dyn Throwable, max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        let mut nodes = Vec::new();
        let mut visited: HashSet<*const (dyn Throwable + 'a)> = HashSet::new();
        let mut truncation = None;
        let mut current = Some(root);

        while let Some(node) = current {
            if !visited.insert(std::ptr::from_ref(node)) {
                truncation = Some(Truncation::Cycle);
                break;
            }
            if nodes.len() == max_depth {
                truncation = Some(Truncation::DepthLimit);
                break;
            }
            nodes.push(node);
            current = node.cause();
        }

        Self { nodes, truncation }
    }

    /// Number of nodes in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a chain holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Why the walk stopped early, if it did.
    #[must_use]
    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    /// Renders the chain the way a conventional stack-trace printer does:
    /// for each node, its header split into lines, then one line per frame.
    #[must_use]
    pub fn rendered_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (depth, node) in self.nodes.iter().enumerate() {
            let mut header = header(*node);
            if depth > 0 {
                header.insert_str(0, CAUSED_BY);
            }
            push_message_lines(&mut lines, &header);
            lines.extend(
                node.frames()
                    .iter()
                    .map(|frame| format!("{FRAME_PREFIX}{frame}")),
            );
        }
        lines
    }
}

fn header(node: &dyn Throwable) -> String {
    match (node.kind(), node.message()) {
        (Some(kind), Some(message)) => format!("{kind}: {message}"),
        (Some(kind), None) => kind.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => String::new(),
    }
}

/// Splits on `\n` and `\r\n`. Always contributes at least one line.
fn push_message_lines(lines: &mut Vec<String>, text: &str) {
    let before = lines.len();
    lines.extend(text.lines().map(str::to_string));
    if lines.len() == before {
        lines.push(String::new());
    }
}
