//! Handles all user-facing output for the CLI.
//!
//! Centralizes colorization, error formatting, and the trace sinks, so every
//! command presents results the same way.

use std::{cell::RefCell, io::Write, rc::Rc};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{diagnostics::TrellisError, engine::TraceSink};

// ============================================================================
// TRACE SINKS: TraceBuffer and StderrTrace implementations
// ============================================================================

/// Collects trace output for testing or programmatic capture.
///
/// Clones share one buffer, so a capture handle stays readable after a clone
/// has been installed on an engine.
#[derive(Default, Clone)]
pub struct TraceBuffer {
    buffer: Rc<RefCell<String>>,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl TraceSink for TraceBuffer {
    fn trace(&mut self, message: &str) {
        let mut buffer = self.buffer.borrow_mut();
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(message);
    }
}

/// Writes trace output to stderr, for the CLI `--verbose` flag.
pub struct StderrTrace;

impl TraceSink for StderrTrace {
    fn trace(&mut self, message: &str) {
        eprintln!("trace: {}", message);
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

fn stdout_color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints a green success line, e.g. for per-file check results.
pub fn print_success(message: &str) {
    let mut stdout = StandardStream::stdout(stdout_color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "ok");
    let _ = stdout.reset();
    println!(" {}", message);
}

/// Prints a red failure line.
pub fn print_failure(message: &str) {
    let mut stdout = StandardStream::stdout(stdout_color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stdout, "failed");
    let _ = stdout.reset();
    println!(" {}", message);
}

/// Renders an error as a full miette diagnostic report on stderr, so the
/// diagnostic code and help text are shown.
pub fn print_error(error: TrellisError) {
    eprintln!("{:?}", miette::Report::new(error));
}
