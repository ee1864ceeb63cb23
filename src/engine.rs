// src/engine.rs

//! The stateless ordering engine.
//!
//! `order_steps` is the whole pipeline in one call:
//! raw records -> validated steps -> step graph -> ordered ids.
//! Nothing is cached between calls, so independent jobs can be ordered from
//! different threads without coordination.

use tracing::info;

use crate::dag::{ScheduleTrace, Scheduler, StepGraph, StepId};
use crate::errors::Result;
use crate::job::loader::parse_job;
use crate::job::model::{JobFormat, RawStep};
use crate::job::validate::validate_steps;

/// Order raw step records.
///
/// Returns every step id exactly once, dependencies first, with ties among
/// ready steps broken by higher precedence and then by smaller id. On error
/// nothing is returned.
pub fn order_steps(records: &[RawStep]) -> Result<Vec<StepId>> {
    let graph = build_graph(records)?;
    let order = Scheduler::run(graph)?;
    info!(steps = order.len(), "job ordered");
    Ok(order)
}

/// Like [`order_steps`], but also returns the frontier seen at each pick.
pub fn explain_steps(records: &[RawStep]) -> Result<ScheduleTrace> {
    let graph = build_graph(records)?;
    Scheduler::trace(graph)
}

/// Parse a job document and order it.
pub fn order_job_str(text: &str, format: JobFormat) -> Result<Vec<StepId>> {
    let records = parse_job(text, format)?;
    order_steps(&records)
}

/// Validate records and resolve them into a graph, without ordering.
pub fn build_graph(records: &[RawStep]) -> Result<StepGraph> {
    let steps = validate_steps(records)?;
    StepGraph::build(steps)
}
