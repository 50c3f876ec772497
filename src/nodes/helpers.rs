//! Shared infrastructure for node implementations.

use crate::{
    context::ParseContext,
    diagnostics::TrellisError,
    node::{NodeRef, PostProcessor},
};

/// Checks that every named required parameter is present in the argument
/// list, by position. Fails with `MissingParameter` naming the first absent
/// one, stamped with the context's current position.
pub fn expect_parameters(
    args: &[String],
    names: &[&str],
    ctx: &ParseContext,
) -> Result<(), TrellisError> {
    for (index, name) in names.iter().enumerate() {
        if args.get(index).is_none() {
            return Err(TrellisError::MissingParameter {
                name: name.to_string(),
                filename: ctx.filename().to_string(),
                line: ctx.line(),
            });
        }
    }
    Ok(())
}

/// Joins the present values with `glue`, skipping absent ones entirely.
pub fn join_present(glue: &str, parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|part| *part)
        .collect::<Vec<_>>()
        .join(glue)
}

/// Appends one logical output line, routing it through the post-processor
/// exactly once if one was supplied.
pub fn emit_line(out: &mut String, line: &str, post: Option<&PostProcessor>) {
    match post {
        Some(post) => out.push_str(&post(line)),
        None => out.push_str(line),
    }
    out.push('\n');
}

/// Attaches `node` as a child of the currently open scope, if any.
pub fn attach_to_scope(ctx: &ParseContext, node: &NodeRef) {
    if let Some(scope) = ctx.scope() {
        scope.borrow_mut().add_child(node.clone());
    }
}
