// src/lib.rs

pub mod cli;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod job;
pub mod logging;
pub mod output;

use std::io::Write;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::dag::{ScheduleTrace, StepGraph};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::load_from_path;
use crate::output::{format_ordering, write_ordering};

pub use crate::engine::order_steps;
pub use crate::errors::StepdagError;

/// High-level entry point used by `main.rs`.
///
/// Reads the job from disk and writes the ordering to the output path, or
/// to stdout when no output path was given.
pub fn run(args: CliArgs) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_fs(&args, &RealFileSystem, &mut out)?;
    Ok(())
}

/// [`run`] with the filesystem and stdout injected.
///
/// This wires together:
/// - job loading (format from `--format` or the input extension)
/// - validation, graph building and scheduling
/// - `--dry-run` / `--explain` reporting
/// - writing the ordering
pub fn run_with_fs(args: &CliArgs, fs: &dyn FileSystem, out: &mut dyn Write) -> Result<()> {
    let records = load_from_path(fs, &args.input, args.format)?;
    info!(input = ?args.input, records = records.len(), "loaded job");

    let graph = engine::build_graph(&records)?;

    // Nothing reaches `out` unless scheduling succeeds.
    let summary = args.dry_run.then(|| graph.clone());

    let order = if args.explain {
        let trace = dag::Scheduler::trace(graph)?;
        print_explain(&trace);
        trace.ordering()
    } else {
        dag::Scheduler::run(graph)?
    };

    if let Some(graph) = summary {
        print_dry_run(&graph, out)?;
        writeln!(out)?;
        writeln!(out, "ordering ({}):", order.len())?;
        for (n, id) in order.iter().enumerate() {
            writeln!(out, "  {:>3}. {id}", n + 1)?;
        }
        debug!("dry-run complete (nothing written)");
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            if fs.exists(path) {
                info!(output = ?path, "overwriting existing output file");
            }
            write_ordering(fs, path, &order)?;
            info!(output = ?path, steps = order.len(), "wrote ordering");
        }
        None => {
            out.write_all(format_ordering(&order).as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}

/// Dry-run output: every step with its precedence and dependencies.
fn print_dry_run(graph: &StepGraph, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "stepdag dry-run")?;
    writeln!(out)?;
    writeln!(out, "steps ({}):", graph.len())?;
    for step in graph.steps() {
        writeln!(out, "  - {}", step.id)?;
        writeln!(out, "      precedence: {}", step.precedence)?;
        if !step.dependency_ids.is_empty() {
            writeln!(out, "      dependencies: {:?}", step.dependency_ids)?;
        }
    }
    Ok(())
}

fn print_explain(trace: &ScheduleTrace) {
    for (n, entry) in trace.entries.iter().enumerate() {
        eprintln!(
            "#{:<3} pick {:?} (precedence {}) from {:?}",
            n + 1,
            entry.step.selected,
            entry.step.precedence,
            entry.frontier
        );
        if !entry.step.newly_ready.is_empty() {
            eprintln!("      now ready: {:?}", entry.step.newly_ready);
        }
    }
}
