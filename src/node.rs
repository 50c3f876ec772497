//! The node contract every token implementation fulfills.
//!
//! Nodes are produced by factories during dispatch, linked into a tree by
//! attaching themselves to the open scope, and later render themselves (and
//! their children) back into text. The engine itself never inspects a node's
//! fields; it only sets the whitespace depth when the node acquires its first
//! deeper-indented child, and compares concrete types against the configured
//! root type.

use std::{any::Any, cell::RefCell, rc::Rc};

use serde::Serialize;

use crate::{context::ParseContext, diagnostics::TrellisError};

/// A caller-supplied transformation applied to every emitted output line.
pub type PostProcessor<'a> = dyn Fn(&str) -> String + 'a;

/// Shared handle to a node in the parsed tree.
///
/// Parsing is strictly single-threaded, so nodes use `Rc<RefCell<_>>` for the
/// shared mutability the scope machinery needs (a parent is mutated when a
/// later line attaches a child to it).
pub type NodeRef = Rc<RefCell<dyn Node>>;

/// A factory constructs a node from a line's positional arguments.
///
/// The dispatch keyword itself is not included in `args`. Factories may
/// consult the context, especially [`ParseContext::scope`], to attach the new
/// node as a child of the open scope.
pub type NodeFactory = fn(args: &[String], ctx: &ParseContext) -> Result<NodeRef, TrellisError>;

/// A typed node in the parsed tree.
pub trait Node: Any + std::fmt::Debug {
    /// The indentation level of this node's children.
    ///
    /// Set by the engine the first time the node is discovered to own a
    /// deeper-indented child, never by the node itself.
    fn whitespace_depth(&self) -> usize;

    fn set_whitespace_depth(&mut self, depth: usize);

    /// Accept a child node. Variants that cannot semantically hold children
    /// decide for themselves how to handle one.
    fn add_child(&mut self, child: NodeRef);

    /// Render this node and, recursively, its children.
    ///
    /// Every logical output line must pass through `post` exactly once, in
    /// emission order, before inclusion in the returned text.
    fn render(&self, post: Option<&PostProcessor>) -> String;

    /// A serializable projection of this node for tooling.
    fn summary(&self) -> NodeSummary;

    /// Concrete-type access, used by the engine for root-type matching.
    fn as_any(&self) -> &dyn Any;
}

/// Serializable projection of a parsed node, used by the CLI `ast` dump and
/// by tests comparing trees structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub token: String,
    pub args: Vec<String>,
    pub depth: usize,
    pub children: Vec<NodeSummary>,
}

impl NodeSummary {
    pub fn new(token: &str, args: Vec<String>, depth: usize, children: Vec<NodeSummary>) -> Self {
        Self {
            token: token.to_string(),
            args,
            depth,
            children,
        }
    }
}
