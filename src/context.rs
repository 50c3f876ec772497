//! Per-session positional state shared with node factories.
//!
//! A `ParseContext` lives inside each `Session` and is passed by reference
//! into every factory invocation, so factories can read error-reporting
//! coordinates and the currently open scope without those being threaded
//! explicitly through every call. Only the dispatch engine mutates it.

use crate::node::NodeRef;

/// Positional and scope state for one parse session.
pub struct ParseContext {
    filename: String,
    line: usize,
    scope: Option<NodeRef>,
}

impl ParseContext {
    pub(crate) fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            line: 0,
            scope: None,
        }
    }

    /// The name of the file currently being processed.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The 1-based number of the line currently being parsed.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The currently open scope, if any.
    ///
    /// This is a lookup, not a transfer of ownership: the returned handle is
    /// a shared reference to a node owned by the session's tree.
    pub fn scope(&self) -> Option<NodeRef> {
        self.scope.clone()
    }

    pub(crate) fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    pub(crate) fn set_scope(&mut self, scope: Option<NodeRef>) {
        self.scope = scope;
    }
}
