//! The `PORT` declaration, the root of a definition tree.
//!
//! Syntax: `PORT <port> [protocol]`. Access entries indented below a port
//! attach themselves as its children and render under it.

use std::{any::Any, cell::RefCell, rc::Rc};

use crate::{
    context::ParseContext,
    diagnostics::TrellisError,
    node::{Node, NodeRef, NodeSummary, PostProcessor},
    nodes::helpers,
};

#[derive(Debug)]
pub struct PortNode {
    pub port: String,
    pub protocol: Option<String>,
    whitespace_depth: usize,
    children: Vec<NodeRef>,
}

/// Factory for the `PORT` token.
pub fn parse_port(args: &[String], ctx: &ParseContext) -> Result<NodeRef, TrellisError> {
    helpers::expect_parameters(args, &["port"], ctx)?;
    let node: NodeRef = Rc::new(RefCell::new(PortNode {
        port: args[0].clone(),
        protocol: args.get(1).cloned(),
        whitespace_depth: 0,
        children: Vec::new(),
    }));
    helpers::attach_to_scope(ctx, &node);
    Ok(node)
}

impl Node for PortNode {
    fn whitespace_depth(&self) -> usize {
        self.whitespace_depth
    }

    fn set_whitespace_depth(&mut self, depth: usize) {
        self.whitespace_depth = depth;
    }

    fn add_child(&mut self, child: NodeRef) {
        self.children.push(child);
    }

    fn render(&self, post: Option<&PostProcessor>) -> String {
        let mut out = String::new();
        let line = helpers::join_present(
            " ",
            &[Some("PORT"), Some(self.port.as_str()), self.protocol.as_deref()],
        );
        helpers::emit_line(&mut out, &line, post);
        for child in &self.children {
            out.push_str(&child.borrow().render(post));
        }
        out
    }

    fn summary(&self) -> NodeSummary {
        let mut args = vec![self.port.clone()];
        if let Some(protocol) = &self.protocol {
            args.push(protocol.clone());
        }
        NodeSummary::new(
            "PORT",
            args,
            self.whitespace_depth,
            self.children.iter().map(|c| c.borrow().summary()).collect(),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
