//! The `ALLOW` and `DENY` access entries.
//!
//! Syntax: `ALLOW <source>` / `DENY <source>`, where `<source>` is an address
//! or network in whatever notation the consumer of the rendered output
//! expects; the engine does not interpret it. Entries attach themselves to
//! the open scope and render indented one level under it.

use std::{any::Any, cell::RefCell, rc::Rc};

use crate::{
    context::ParseContext,
    diagnostics::TrellisError,
    node::{Node, NodeRef, NodeSummary, PostProcessor},
    nodes::helpers,
};

/// Whether an access entry grants or refuses its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    fn token(self) -> &'static str {
        match self {
            Verdict::Allow => "ALLOW",
            Verdict::Deny => "DENY",
        }
    }
}

#[derive(Debug)]
pub struct AllowNode {
    entry: AccessEntry,
}

#[derive(Debug)]
pub struct DenyNode {
    entry: AccessEntry,
}

/// Shared state of the two access variants. They are distinct node types so
/// either could serve as a root type, but the behavior is identical.
#[derive(Debug)]
struct AccessEntry {
    verdict: Verdict,
    source: String,
    whitespace_depth: usize,
    children: Vec<NodeRef>,
}

/// Factory for the `ALLOW` token.
pub fn parse_allow(args: &[String], ctx: &ParseContext) -> Result<NodeRef, TrellisError> {
    let entry = parse_entry(Verdict::Allow, args, ctx)?;
    let node: NodeRef = Rc::new(RefCell::new(AllowNode { entry }));
    helpers::attach_to_scope(ctx, &node);
    Ok(node)
}

/// Factory for the `DENY` token.
pub fn parse_deny(args: &[String], ctx: &ParseContext) -> Result<NodeRef, TrellisError> {
    let entry = parse_entry(Verdict::Deny, args, ctx)?;
    let node: NodeRef = Rc::new(RefCell::new(DenyNode { entry }));
    helpers::attach_to_scope(ctx, &node);
    Ok(node)
}

fn parse_entry(
    verdict: Verdict,
    args: &[String],
    ctx: &ParseContext,
) -> Result<AccessEntry, TrellisError> {
    helpers::expect_parameters(args, &["source"], ctx)?;
    Ok(AccessEntry {
        verdict,
        source: args[0].clone(),
        whitespace_depth: 0,
        children: Vec::new(),
    })
}

impl AccessEntry {
    fn render(&self, post: Option<&PostProcessor>) -> String {
        let mut out = String::new();
        let line = format!("  {} {}", self.verdict.token(), self.source);
        helpers::emit_line(&mut out, &line, post);
        for child in &self.children {
            out.push_str(&child.borrow().render(post));
        }
        out
    }

    fn summary(&self) -> NodeSummary {
        NodeSummary::new(
            self.verdict.token(),
            vec![self.source.clone()],
            self.whitespace_depth,
            self.children.iter().map(|c| c.borrow().summary()).collect(),
        )
    }
}

macro_rules! access_node {
    ($ty:ident) => {
        impl Node for $ty {
            fn whitespace_depth(&self) -> usize {
                self.entry.whitespace_depth
            }

            fn set_whitespace_depth(&mut self, depth: usize) {
                self.entry.whitespace_depth = depth;
            }

            fn add_child(&mut self, child: NodeRef) {
                // Scope rules permit deeper lines below an access entry.
                self.entry.children.push(child);
            }

            fn render(&self, post: Option<&PostProcessor>) -> String {
                self.entry.render(post)
            }

            fn summary(&self) -> NodeSummary {
                self.entry.summary()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

access_node!(AllowNode);
access_node!(DenyNode);

impl AllowNode {
    pub fn source(&self) -> &str {
        &self.entry.source
    }
}

impl DenyNode {
    pub fn source(&self) -> &str {
        &self.entry.source
    }
}
