// src/dag/scheduler.rs

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace, warn};

use crate::dag::cycles::cycle_members;
use crate::dag::graph::StepGraph;
use crate::dag::scheduler_step::{ScheduleTrace, SchedulerStep, TraceEntry};
use crate::dag::step::{Step, StepId, StepIndex, StepState};
use crate::errors::{Result, StepdagError};

/// A ready step waiting in the frontier.
///
/// Ordered so that the max-heap yields the highest precedence first and,
/// among equal precedence, the lexicographically smallest id. `index` only
/// locates the step and takes no part in comparisons.
#[derive(Debug, Clone)]
struct Candidate {
    precedence: u64,
    id: StepId,
    index: StepIndex,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence
            .cmp(&other.precedence)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-frontier topological sort over a [`StepGraph`].
///
/// The scheduler owns the arena for one pass:
/// - every step starts `Ready` (no parents) or `Pending`
/// - [`Scheduler::step`] moves the best `Ready` step to `Scheduled` and
///   releases children whose last parent it was
/// - [`Scheduler::finish`] turns the pass into an ordering, or into
///   [`StepdagError::CyclicDependency`] if anything was left behind
#[derive(Debug)]
pub struct Scheduler {
    steps: Vec<Step>,
    children: Vec<Vec<StepIndex>>,
    frontier: BinaryHeap<Candidate>,
    order: Vec<StepId>,
}

impl Scheduler {
    pub fn from_graph(graph: StepGraph) -> Self {
        let (mut steps, children) = graph.into_parts();
        let mut frontier = BinaryHeap::new();

        for (index, step) in steps.iter_mut().enumerate() {
            step.scheduled = false;
            step.remaining_parents = step.parents.len();
            if step.remaining_parents == 0 {
                frontier.push(Candidate {
                    precedence: step.precedence,
                    id: step.id.clone(),
                    index,
                });
            }
        }

        debug!(
            steps = steps.len(),
            ready = frontier.len(),
            "scheduler: initial frontier built"
        );

        let order = Vec::with_capacity(steps.len());
        Self {
            steps,
            children,
            frontier,
            order,
        }
    }

    /// Order a graph in one go.
    pub fn run(graph: StepGraph) -> Result<Vec<StepId>> {
        let mut scheduler = Self::from_graph(graph);
        while scheduler.step().is_some() {}
        scheduler.finish()
    }

    /// Order a graph and record the frontier seen at every selection.
    pub fn trace(graph: StepGraph) -> Result<ScheduleTrace> {
        let mut scheduler = Self::from_graph(graph);
        let mut entries = Vec::with_capacity(scheduler.steps.len());

        loop {
            let frontier = scheduler.frontier();
            match scheduler.step() {
                Some(step) => entries.push(TraceEntry { frontier, step }),
                None => break,
            }
        }

        scheduler.finish()?;
        Ok(ScheduleTrace { entries })
    }

    /// Current frontier, best candidate first.
    pub fn frontier(&self) -> Vec<StepId> {
        let mut ready: Vec<&Candidate> = self.frontier.iter().collect();
        ready.sort_by(|a, b| b.cmp(a));
        ready.into_iter().map(|c| c.id.clone()).collect()
    }

    /// Read-only view of a step's state in this pass.
    pub fn state_of(&self, id: &str) -> Option<StepState> {
        self.steps.iter().find(|s| s.id == id).map(Step::state)
    }

    /// Ids placed so far, in order.
    pub fn scheduled(&self) -> &[StepId] {
        &self.order
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Select the next step. Returns `None` once the frontier is empty.
    pub fn step(&mut self) -> Option<SchedulerStep> {
        let Candidate {
            precedence,
            id,
            index,
        } = self.frontier.pop()?;

        trace!(step = %id, precedence, "scheduler: selected");

        self.steps[index].scheduled = true;
        self.order.push(id.clone());

        let mut newly_ready = Vec::new();
        for &child in &self.children[index] {
            let step = &mut self.steps[child];
            step.remaining_parents -= 1;
            if step.remaining_parents == 0 {
                trace!(step = %step.id, parent = %id, "scheduler: step became ready");
                newly_ready.push(step.id.clone());
                self.frontier.push(Candidate {
                    precedence: step.precedence,
                    id: step.id.clone(),
                    index: child,
                });
            }
        }

        Some(SchedulerStep {
            selected: id,
            precedence,
            newly_ready,
        })
    }

    /// Close the pass.
    ///
    /// If fewer steps were scheduled than exist, the remainder is stuck
    /// behind at least one cycle.
    pub fn finish(self) -> Result<Vec<StepId>> {
        let total = self.steps.len();
        if self.order.len() == total {
            debug!(steps = total, "scheduler: all steps scheduled");
            return Ok(self.order);
        }

        let blocked = total - self.order.len();
        let mut cycle = cycle_members(&self.steps);
        if cycle.is_empty() {
            // Not expected for graphs from `StepGraph::build`.
            cycle = self
                .steps
                .iter()
                .filter(|s| !s.scheduled)
                .map(|s| s.id.clone())
                .collect();
        }

        warn!(
            ?cycle,
            blocked,
            scheduled = self.order.len(),
            "scheduler: frontier emptied with steps left over"
        );

        Err(StepdagError::CyclicDependency { cycle, blocked })
    }
}
