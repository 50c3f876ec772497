pub use crate::diagnostics::TrellisError;
pub use crate::engine::{Engine, NullTrace, Session, TraceSink};
pub use crate::node::{Node, NodeFactory, NodeRef, NodeSummary, PostProcessor};

pub mod cli;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod node;
pub mod nodes;
pub mod registry;
