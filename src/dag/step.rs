// src/dag/step.rs

//! Canonical step type and its scheduling state.

/// Identifier of a step: the trimmed `step` field of its record.
pub type StepId = String;

/// Position of a step inside a [`StepGraph`](crate::dag::StepGraph) arena.
pub type StepIndex = usize;

/// Scheduling state of a step (internal to one scheduler pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// At least one parent has not been scheduled yet.
    Pending,
    /// All parents scheduled; sitting in the frontier.
    Ready,
    /// Placed in the output. Terminal.
    Scheduled,
}

/// A validated unit of work.
///
/// Produced by the validator with `parents` empty; the graph builder fills
/// `parents` with arena indices, and only the scheduler touches
/// `remaining_parents` / `scheduled` after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub precedence: u64,
    /// Trimmed dependency ids in declaration order. May contain repeats.
    pub dependency_ids: Vec<StepId>,
    /// Resolved, de-duplicated parent indices.
    pub parents: Vec<StepIndex>,
    pub remaining_parents: usize,
    pub scheduled: bool,
}

impl Step {
    pub fn new(id: impl Into<StepId>, precedence: u64, dependency_ids: Vec<StepId>) -> Self {
        Self {
            id: id.into(),
            precedence,
            dependency_ids,
            parents: Vec::new(),
            remaining_parents: 0,
            scheduled: false,
        }
    }

    pub fn state(&self) -> StepState {
        if self.scheduled {
            StepState::Scheduled
        } else if self.remaining_parents == 0 {
            StepState::Ready
        } else {
            StepState::Pending
        }
    }
}
