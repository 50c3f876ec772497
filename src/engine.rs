//! The Trellis dispatch engine.
//!
//! An [`Engine`] holds the long-lived pieces: the token registry, the
//! configured root type, and the trace sink. A [`Session`] is one
//! parse run over one input: it owns the parse context, the scope stack, the
//! last dispatch result, and the collected root nodes. Sessions are plain
//! values, so two of them over the same engine cannot interfere.
//!
//! Scope resolution works purely from leading-whitespace run length. A node's
//! owned indentation level is assigned retroactively: the first time a deeper
//! line appears below it, the node is pushed as the open scope and its
//! whitespace depth becomes that line's indentation. Tabs and spaces are each
//! counted as one character; this matches existing definition files and is a
//! documented quirk, not an oversight.

use std::{any::TypeId, cell::RefCell, fs, path::Path, rc::Rc};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    context::ParseContext,
    diagnostics::TrellisError,
    node::{Node, NodeFactory, NodeRef, PostProcessor},
    registry::TokenRegistry,
};

/// Comment lines start with `//`, `#`, or `;` after optional leading
/// whitespace. Tested before indentation is even measured, so a comment can
/// never open or close a scope.
static COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*((//)|(#)|(;))").expect("comment pattern is valid"));

/// Internal whitespace runs collapse to single separators before tokenizing.
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

// ============================================================================
// TRACE SINK
// ============================================================================

/// Receives a message for every processed line and scope adjustment, to make
/// parser tracing testable and injectable.
pub trait TraceSink {
    fn trace(&mut self, message: &str);
}

/// A silent sink for running without tracing.
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn trace(&mut self, _message: &str) {}
}

// ============================================================================
// ENGINE
// ============================================================================

/// The long-lived half of the parser: registry, root type, trace sink.
///
/// `init` must be called before any parse operation; parsing an uninitialized
/// engine fails with [`TrellisError::Uninitialized`].
pub struct Engine {
    registry: TokenRegistry,
    root_type: Option<TypeId>,
    trace: RefCell<Box<dyn TraceSink>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registry: TokenRegistry::new(),
            root_type: None,
            trace: RefCell::new(Box::new(NullTrace)),
        }
    }

    /// Registers every (keyword, factory) pair and records `R` as the root
    /// type: only nodes of this concrete type are collected for rendering.
    ///
    /// Registration is last-wins, and calling `init` again overwrites on the
    /// same terms.
    pub fn init<R: Node>(&mut self, parsers: &[(&str, NodeFactory)]) {
        for (token, factory) in parsers {
            self.registry.register(token, *factory);
        }
        self.root_type = Some(TypeId::of::<R>());
    }

    pub fn is_initialized(&self) -> bool {
        self.root_type.is_some()
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Mutable registry access, for re-registering tokens after `init`.
    pub fn registry_mut(&mut self) -> &mut TokenRegistry {
        &mut self.registry
    }

    /// Installs a sink that receives every raw line and scope adjustment.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        *self.trace.borrow_mut() = sink;
    }

    pub fn clear_trace_sink(&mut self) {
        *self.trace.borrow_mut() = Box::new(NullTrace);
    }

    fn emit_trace(&self, message: &str) {
        self.trace.borrow_mut().trace(message);
    }

    /// Parses a definition file and returns the rendered output.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<String, TrellisError> {
        self.parse_file_with(path, None)
    }

    /// Parses a definition file, piping every rendered line through `post`.
    pub fn parse_file_with(
        &self,
        path: impl AsRef<Path>,
        post: Option<&PostProcessor>,
    ) -> Result<String, TrellisError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| TrellisError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_source(&path.display().to_string(), &source, post)
    }

    /// The string-input core `parse_file` delegates to: runs the per-line
    /// algorithm over `source` and performs the render pass.
    pub fn parse_source(
        &self,
        filename: &str,
        source: &str,
        post: Option<&PostProcessor>,
    ) -> Result<String, TrellisError> {
        let mut session = Session::new(self, filename)?;
        for (index, line) in source.lines().enumerate() {
            session.feed_line(index + 1, line)?;
        }
        Ok(session.render(post))
    }
}

// ============================================================================
// SESSION - one parse run
// ============================================================================

/// One parse run over one input.
///
/// Created per `parse_file`/`parse_source` call, or directly for line-by-line
/// feeding and injection. All errors abort the session; the caller sees no
/// partial result.
pub struct Session<'e> {
    engine: &'e Engine,
    root_type: TypeId,
    context: ParseContext,
    scopes: Vec<NodeRef>,
    result: Option<NodeRef>,
    roots: Vec<NodeRef>,
}

impl<'e> Session<'e> {
    pub fn new(engine: &'e Engine, filename: impl Into<String>) -> Result<Self, TrellisError> {
        let root_type = engine.root_type.ok_or(TrellisError::Uninitialized)?;
        Ok(Self {
            engine,
            root_type,
            context: ParseContext::new(filename),
            scopes: Vec::new(),
            result: None,
            roots: Vec::new(),
        })
    }

    /// Feeds one line through the per-line algorithm.
    ///
    /// `line_number` is 1-based and is recorded in the context before
    /// anything else, so every error raised below reports it. Returns the
    /// node the line produced, or `None` for discarded comment/blank lines.
    pub fn feed_line(
        &mut self,
        line_number: usize,
        line: &str,
    ) -> Result<Option<NodeRef>, TrellisError> {
        self.context.set_line(line_number);
        self.engine.emit_trace(line);

        // Comments are discarded before indentation is measured.
        if COMMENT_PATTERN.is_match(line) {
            return Ok(None);
        }
        // Only zero-length lines are blank; a whitespace-only line proceeds
        // and dispatches the empty token.
        if line.is_empty() {
            return Ok(None);
        }

        self.resolve_scope(line)?;

        let collapsed = WHITESPACE_RUNS.replace_all(line.trim(), " ");
        let tokens: Vec<String> = collapsed.split(' ').map(str::to_string).collect();
        // split always yields at least one element
        let keyword = tokens[0].as_str();
        let args = &tokens[1..];

        let factory = self.engine.registry.resolve(keyword, &self.context)?;
        self.engine.emit_trace(&format!("dispatching '{}'", keyword));
        let node = factory(args, &self.context)?;

        if node.borrow().as_any().type_id() == self.root_type {
            self.roots.push(Rc::clone(&node));
        }
        self.result = Some(Rc::clone(&node));
        Ok(Some(node))
    }

    /// Injects a synthetic line at the current scope.
    ///
    /// The text is prefixed with whitespace equal to the open scope's depth
    /// (zero when no scope is open) and fed through the identical per-line
    /// algorithm, claiming `line_number` as its origin for error reporting.
    pub fn inject_at_current_scope(
        &mut self,
        line_number: usize,
        text: &str,
    ) -> Result<Option<NodeRef>, TrellisError> {
        let depth = self
            .context
            .scope()
            .map(|scope| scope.borrow().whitespace_depth())
            .unwrap_or(0);
        let line = format!("{}{}", " ".repeat(depth), text);
        self.feed_line(line_number, &line)
    }

    /// Adjusts the scope stack for a content line's indentation and records
    /// the resulting scope in the context.
    fn resolve_scope(&mut self, line: &str) -> Result<(), TrellisError> {
        // Tabs and spaces each count as one character.
        let depth = line.chars().take_while(|c| c.is_whitespace()).count();

        // Bootstrap rule: a previous dispatch result becomes the baseline
        // scope candidate when no scope is recorded yet.
        if self.context.scope().is_none() {
            if let Some(prev) = &self.result {
                self.context.set_scope(Some(Rc::clone(prev)));
            }
        }

        // No baseline node exists for an indented line: the original left
        // this undefined; here it is a typed error.
        if depth > 0 && self.context.scope().is_none() {
            return Err(TrellisError::OrphanIndentation {
                filename: self.context.filename().to_string(),
                line: self.context.line(),
            });
        }

        // Scope-open: the previous result acquires its first deeper child,
        // which retroactively defines its owned indentation level.
        let open = match self.context.scope() {
            Some(scope) => depth > scope.borrow().whitespace_depth(),
            None => false,
        };
        if open {
            if let Some(owner) = self.result.clone() {
                owner.borrow_mut().set_whitespace_depth(depth);
                self.scopes.push(owner);
                self.engine.emit_trace("scope opened");
            }
        }

        // Scope-close: pop every scope deeper than this line.
        while self
            .scopes
            .last()
            .map(|top| depth < top.borrow().whitespace_depth())
            .unwrap_or(false)
        {
            self.scopes.pop();
            self.engine.emit_trace("scope closed");
        }

        self.context.set_scope(self.scopes.last().map(Rc::clone));
        Ok(())
    }

    /// The parse context, as factories see it.
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Number of currently open nesting levels.
    pub fn open_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Root-type nodes in first-encounter order.
    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    /// Renders every collected root in insertion order, forwarding `post`
    /// unchanged, and concatenates the results with no added separator.
    pub fn render(&self, post: Option<&PostProcessor>) -> String {
        let mut result = String::new();
        for root in &self.roots {
            result.push_str(&root.borrow().render(post));
        }
        result
    }
}
