//! Shared helpers for the integration tests.

use trellis::{engine::Session, nodes, Engine, NodeSummary};

/// An engine initialized with the standard port/permission token set.
pub fn standard_engine() -> Engine {
    nodes::standard_engine()
}

/// Feeds `lines` into a fresh session, panicking on any parse error.
pub fn feed<'e>(engine: &'e Engine, lines: &[&str]) -> Session<'e> {
    let mut session = Session::new(engine, "test.rules").unwrap();
    for (index, line) in lines.iter().enumerate() {
        session.feed_line(index + 1, line).unwrap();
    }
    session
}

/// Structural projections of a session's collected roots.
pub fn root_summaries(session: &Session) -> Vec<NodeSummary> {
    session
        .roots()
        .iter()
        .map(|root| root.borrow().summary())
        .collect()
}
