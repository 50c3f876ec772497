//! # Built-in token set
//!
//! The port/permission vocabulary shipped with the engine. Each token is a
//! node type with a parse-time factory and a render method; the engine itself
//! knows nothing about any of them.
//!
//! ## Module Structure
//!
//! - **`helpers`**: shared infrastructure for all node implementations
//! - **`port`**: the `PORT` declaration (the root type)
//! - **`access`**: the `ALLOW` and `DENY` access entries
//!
//! Custom vocabularies register their own factories via `Engine::init`; this
//! module is one such vocabulary, not a privileged one.

use crate::{engine::Engine, node::NodeFactory, registry::TokenRegistry};

pub mod access;
pub mod helpers;
pub mod port;

pub use access::{AllowNode, DenyNode};
pub use port::PortNode;

/// The standard token table.
pub const STANDARD_TOKENS: &[(&str, NodeFactory)] = &[
    ("PORT", port::parse_port as NodeFactory),
    ("ALLOW", access::parse_allow as NodeFactory),
    ("DENY", access::parse_deny as NodeFactory),
];

/// Registers the standard port/permission tokens with the given registry.
pub fn register_standard_tokens(registry: &mut TokenRegistry) {
    for (token, factory) in STANDARD_TOKENS {
        registry.register(token, *factory);
    }
}

/// An engine initialized with the standard token set and `PortNode` as the
/// root type. This is what the CLI runs.
pub fn standard_engine() -> Engine {
    let mut engine = Engine::new();
    engine.init::<PortNode>(STANDARD_TOKENS);
    engine
}
