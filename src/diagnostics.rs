//! The unified diagnostic system for the Trellis engine.
//!
//! Every failure mode of the parse pipeline is represented by one variant of
//! [`TrellisError`]. All variants that originate from a source line carry the
//! filename and 1-based line number taken from the parse context at the moment
//! of failure, so callers never have to reconstruct positions themselves.
//!
//! Errors carry filename:line coordinates rather than source spans: injected
//! synthetic lines (see `Session::inject_at_current_scope`) have no backing
//! source text a span could point into.

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Trellis engine failure modes.
///
/// Every error is fatal to the parse session it occurred in: nothing is
/// caught or retried internally, and no partial result is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum TrellisError {
    /// A parse operation was invoked before `Engine::init`.
    #[error("Parser not initialized. Call init() first.")]
    #[diagnostic(
        code(trellis::engine::uninitialized),
        help("register a token set with Engine::init before parsing")
    )]
    Uninitialized,

    /// The dispatch keyword has no registered factory.
    #[error("Unknown token '{token}' at {filename}:{line}.")]
    #[diagnostic(code(trellis::parse::unknown_token))]
    UnknownToken {
        token: String,
        filename: String,
        line: usize,
        #[help]
        help: Option<String>,
    },

    /// A required positional argument was absent from the token list.
    #[error("Missing parameter '{name}' at {filename}:{line}.")]
    #[diagnostic(code(trellis::parse::missing_parameter))]
    MissingParameter {
        name: String,
        filename: String,
        line: usize,
    },

    /// The first content line of the input was already indented, so no node
    /// exists that could own it.
    #[error("Indented line with no enclosing scope at {filename}:{line}.")]
    #[diagnostic(
        code(trellis::parse::orphan_indentation),
        help("the first statement of a file must start at column zero")
    )]
    OrphanIndentation { filename: String, line: usize },

    /// The input file could not be read.
    #[error("Failed to read '{path}'.")]
    #[diagnostic(code(trellis::io::read))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TrellisError {
    /// The stable diagnostic code for this error, e.g.
    /// `trellis::parse::unknown_token`.
    pub fn code_str(&self) -> &'static str {
        match self {
            TrellisError::Uninitialized => "trellis::engine::uninitialized",
            TrellisError::UnknownToken { .. } => "trellis::parse::unknown_token",
            TrellisError::MissingParameter { .. } => "trellis::parse::missing_parameter",
            TrellisError::OrphanIndentation { .. } => "trellis::parse::orphan_indentation",
            TrellisError::Io { .. } => "trellis::io::read",
        }
    }

    /// The filename/line the error was raised at, when it has one.
    pub fn location(&self) -> Option<(&str, usize)> {
        match self {
            TrellisError::UnknownToken { filename, line, .. }
            | TrellisError::MissingParameter { filename, line, .. }
            | TrellisError::OrphanIndentation { filename, line } => {
                Some((filename.as_str(), *line))
            }
            TrellisError::Uninitialized | TrellisError::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_position_in_the_original_format() {
        let err = TrellisError::UnknownToken {
            token: "FOO".to_string(),
            filename: "ports.rules".to_string(),
            line: 3,
            help: None,
        };
        assert_eq!(err.to_string(), "Unknown token 'FOO' at ports.rules:3.");
        assert_eq!(err.code_str(), "trellis::parse::unknown_token");
        assert_eq!(err.location(), Some(("ports.rules", 3)));
    }

    #[test]
    fn errors_without_a_source_line_have_no_location() {
        assert_eq!(TrellisError::Uninitialized.location(), None);
    }
}
