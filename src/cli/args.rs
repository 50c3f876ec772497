//! Defines the command-line arguments and subcommands for the Trellis CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "trellis",
    version,
    about = "A small, embeddable engine for indentation-structured definition files."
)]
pub struct TrellisArgs {
    /// Trace every processed line and scope adjustment to stderr.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a definition file and print the rendered output.
    Render {
        /// The path to the definition file to render.
        #[arg(required = true)]
        file: PathBuf,
        /// Prefix every rendered line with this string.
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show the parsed node tree as JSON.
    Ast {
        /// The path to the definition file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse every definition file under a directory and report failures.
    Check {
        /// A definition file, or a directory to scan for `.rules` files.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// List all registered tokens.
    ListTokens,
}
