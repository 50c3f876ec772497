//! The Trellis command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library functions over the standard token set.

use std::{
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use walkdir::WalkDir;

use crate::{
    cli::args::{Command, TrellisArgs},
    cli::output::{print_error, print_failure, print_success, StderrTrace},
    diagnostics::TrellisError,
    engine::{Engine, Session},
    node::NodeSummary,
    nodes,
};

pub mod args;
pub mod output;

/// File extension the `check` command scans directories for.
const DEFINITION_EXTENSION: &str = "rules";

/// The main entry point for the CLI.
pub fn run() {
    let args = TrellisArgs::parse();

    let mut engine = nodes::standard_engine();
    if args.verbose {
        engine.set_trace_sink(Box::new(StderrTrace));
    }

    let result = match args.command {
        Command::Render { file, prefix } => handle_render(&engine, &file, prefix),
        Command::Ast { file } => handle_ast(&engine, &file),
        Command::Check { path } => handle_check(&engine, &path),
        Command::ListTokens => handle_list_tokens(&engine),
    };

    if let Err(error) = result {
        print_error(error);
        process::exit(1);
    }
}

/// Handles the `render` subcommand.
fn handle_render(
    engine: &Engine,
    file: &Path,
    prefix: Option<String>,
) -> Result<(), TrellisError> {
    let rendered = match prefix {
        Some(prefix) => {
            let post = move |line: &str| format!("{}{}", prefix, line);
            engine.parse_file_with(file, Some(&post))?
        }
        None => engine.parse_file(file)?,
    };
    print!("{}", rendered);
    Ok(())
}

/// Handles the `ast` subcommand: parses the file and dumps the root nodes as
/// a JSON tree.
fn handle_ast(engine: &Engine, file: &Path) -> Result<(), TrellisError> {
    let source = std::fs::read_to_string(file).map_err(|source| TrellisError::Io {
        path: file.display().to_string(),
        source,
    })?;

    let mut session = Session::new(engine, file.display().to_string())?;
    for (index, line) in source.lines().enumerate() {
        session.feed_line(index + 1, line)?;
    }

    let summaries: Vec<NodeSummary> = session
        .roots()
        .iter()
        .map(|root| root.borrow().summary())
        .collect();
    match serde_json::to_string_pretty(&summaries) {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("error: {}", error),
    }
    Ok(())
}

/// Handles the `check` subcommand: parses every definition file under `path`
/// and reports per-file results.
fn handle_check(engine: &Engine, path: &Path) -> Result<(), TrellisError> {
    let files = discover_definition_files(path);
    if files.is_empty() {
        println!("no .{} files found under {}", DEFINITION_EXTENSION, path.display());
        return Ok(());
    }

    let mut failures = 0;
    for file in &files {
        match engine.parse_file(file) {
            Ok(_) => print_success(&file.display().to_string()),
            Err(error) => {
                failures += 1;
                print_failure(&file.display().to_string());
                print_error(error);
            }
        }
    }

    println!("{} file(s) checked, {} failure(s)", files.len(), failures);
    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}

/// Handles the `list-tokens` subcommand.
fn handle_list_tokens(engine: &Engine) -> Result<(), TrellisError> {
    let mut tokens = engine.registry().list();
    tokens.sort();
    for token in tokens {
        println!("{}", token);
    }
    Ok(())
}

/// Recursively scans `path` for definition files.
///
/// A file path is returned as-is; a directory is walked for files with the
/// definition extension. The list is sorted for deterministic order.
fn discover_definition_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext == DEFINITION_EXTENSION)
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}
