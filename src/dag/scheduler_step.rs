// src/dag/scheduler_step.rs

//! Step-by-step result types for the scheduler.

use crate::dag::step::StepId;

/// Structured result of a single frontier selection.
///
/// Useful for tests and for `--explain` output that want to see why a step
/// was placed where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerStep {
    /// The step that was appended to the output.
    pub selected: StepId,
    pub precedence: u64,
    /// Steps that became ready because `selected` was their last pending
    /// parent, in child-index order.
    pub newly_ready: Vec<StepId>,
}

/// One selection together with the frontier it was chosen from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Frontier before the selection, best candidate first.
    pub frontier: Vec<StepId>,
    pub step: SchedulerStep,
}

/// Full record of a successful scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleTrace {
    pub entries: Vec<TraceEntry>,
}

impl ScheduleTrace {
    /// The ordering the trace produced.
    pub fn ordering(&self) -> Vec<StepId> {
        self.entries.iter().map(|e| e.step.selected.clone()).collect()
    }
}
