//! Token registry: maps dispatch keywords to node factories.
//!
//! Built once at `Engine::init`, read during every dispatch. Registration is
//! silent and last-wins; resolution of an unregistered keyword is the
//! `UnknownToken` error, stamped with the context's current position.

use im::HashMap;

use crate::{
    context::ParseContext,
    diagnostics::TrellisError,
    node::NodeFactory,
};

/// Registry of all known tokens, inspectable at runtime.
#[derive(Default, Clone)]
pub struct TokenRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a keyword with a factory, silently overwriting any prior
    /// association.
    pub fn register(&mut self, token: &str, factory: NodeFactory) {
        self.factories.insert(token.to_string(), factory);
    }

    pub fn get(&self, token: &str) -> Option<NodeFactory> {
        self.factories.get(token).copied()
    }

    /// Resolves a keyword to its factory, failing with `UnknownToken` if no
    /// factory is registered for it.
    pub fn resolve(
        &self,
        token: &str,
        ctx: &ParseContext,
    ) -> Result<NodeFactory, TrellisError> {
        self.get(token).ok_or_else(|| TrellisError::UnknownToken {
            token: token.to_string(),
            filename: ctx.filename().to_string(),
            line: ctx.line(),
            help: self.registered_tokens_help(),
        })
    }

    fn registered_tokens_help(&self) -> Option<String> {
        if self.factories.is_empty() {
            return None;
        }
        let mut tokens = self.list();
        tokens.sort();
        Some(format!("registered tokens: {}", tokens.join(", ")))
    }

    pub fn list(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn has(&self, token: &str) -> bool {
        self.factories.contains_key(token)
    }

    pub fn remove(&mut self, token: &str) -> Option<NodeFactory> {
        self.factories.remove(token)
    }

    pub fn clear(&mut self) {
        self.factories.clear();
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
