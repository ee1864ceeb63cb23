// src/dag/graph.rs

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::info;

use crate::dag::step::{Step, StepId, StepIndex};
use crate::errors::{Result, StepdagError};

/// Resolved dependency graph over an arena of steps.
///
/// Steps keep their input order inside the arena; edges are arena indices
/// in both directions:
/// - `Step::parents`: the steps this one waits for.
/// - `children[i]`: the steps that list step `i` as a dependency.
#[derive(Debug, Clone)]
pub struct StepGraph {
    steps: Vec<Step>,
    index: HashMap<StepId, StepIndex>,
    children: Vec<Vec<StepIndex>>,
}

impl StepGraph {
    /// Build the graph from validated steps.
    ///
    /// Fails on an empty job, on the first duplicate id and on the first
    /// dependency that names no declared step (all in input order).
    pub fn build(mut steps: Vec<Step>) -> Result<Self> {
        if steps.is_empty() {
            return Err(StepdagError::EmptyJob);
        }

        // First pass: id -> arena index, rejecting duplicates.
        let mut index: HashMap<StepId, StepIndex> = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            match index.entry(step.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(StepdagError::DuplicateStepIdentifier(step.id.clone()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
            }
        }

        // Second pass: resolve parents and fill the reverse index.
        let mut children: Vec<Vec<StepIndex>> = vec![Vec::new(); steps.len()];
        let mut edges = 0usize;

        for (i, step) in steps.iter_mut().enumerate() {
            let mut parents: Vec<StepIndex> = Vec::with_capacity(step.dependency_ids.len());
            for dep in &step.dependency_ids {
                let parent = *index.get(dep).ok_or_else(|| StepdagError::UnknownDependency {
                    step: step.id.clone(),
                    missing: dep.clone(),
                })?;
                // Repeated dependency ids collapse into one edge.
                if !parents.contains(&parent) {
                    parents.push(parent);
                    children[parent].push(i);
                }
            }
            edges += parents.len();
            step.parents = parents;
        }

        let graph = Self {
            steps,
            index,
            children,
        };

        info!(
            steps = graph.len(),
            edges,
            roots = graph.roots().count(),
            "built step graph"
        );

        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false` for a built graph; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in input order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.index.get(id).map(|&i| &self.steps[i])
    }

    pub fn index_of(&self, id: &str) -> Option<StepIndex> {
        self.index.get(id).copied()
    }

    /// Direct parents of a step (the steps it depends on).
    pub fn parents_of(&self, i: StepIndex) -> &[StepIndex] {
        self.steps
            .get(i)
            .map(|s| s.parents.as_slice())
            .unwrap_or(&[])
    }

    /// Direct children of a step (the steps that depend on it).
    pub fn children_of(&self, i: StepIndex) -> &[StepIndex] {
        self.children
            .get(i)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Steps with no dependencies, in input order.
    pub fn roots(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.parents.is_empty())
    }

    /// Hand the arena over to the scheduler.
    pub(crate) fn into_parts(self) -> (Vec<Step>, Vec<Vec<StepIndex>>) {
        (self.steps, self.children)
    }
}
