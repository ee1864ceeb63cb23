// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::job::JobFormat;

/// Command-line arguments for `stepdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stepdag",
    version,
    about = "Order job steps by dependencies and precedence.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job file (YAML, or TOML with a `.toml` extension).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the ordering, one step per line.
    ///
    /// If omitted, the ordering is printed to stdout.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Job file format. Guessed from the input extension when omitted.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<JobFormat>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STEPDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse, validate and order, print the job and the ordering, but write
    /// nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the ready set behind every scheduling decision to stderr.
    #[arg(long)]
    pub explain: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
