// src/dag/mod.rs

//! Step graph and ordering.
//!
//! - [`step`] holds the canonical [`Step`] type and its scheduling state.
//! - [`graph`] resolves dependency ids into an index-based adjacency
//!   structure ([`StepGraph`]).
//! - [`scheduler`] runs the priority-frontier topological sort.
//! - [`scheduler_step`] defines per-selection result and trace types.
//! - [`cycles`] names the steps responsible for a failed sort.

pub mod cycles;
pub mod graph;
pub mod scheduler;
pub mod scheduler_step;
pub mod step;

pub use graph::StepGraph;
pub use scheduler::Scheduler;
pub use scheduler_step::{ScheduleTrace, SchedulerStep, TraceEntry};
pub use step::{Step, StepId, StepIndex, StepState};
