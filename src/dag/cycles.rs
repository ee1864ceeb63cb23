// src/dag/cycles.rs

//! Naming the steps that make a job unschedulable.
//!
//! When the frontier empties early, every leftover step either sits on a
//! cycle or waits (transitively) on one. Only the former are reported by
//! name; the strongly connected components of the leftover subgraph tell
//! them apart.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::dag::step::{Step, StepId, StepIndex};

/// Ids of the unscheduled steps that lie on a dependency cycle, sorted.
///
/// A component counts as a cycle when it has more than one member or when
/// its single member depends on itself.
pub fn cycle_members(steps: &[Step]) -> Vec<StepId> {
    let mut graph: DiGraph<StepIndex, ()> = DiGraph::new();
    let mut nodes: Vec<Option<NodeIndex>> = vec![None; steps.len()];

    for (i, step) in steps.iter().enumerate() {
        if !step.scheduled {
            nodes[i] = Some(graph.add_node(i));
        }
    }

    // Edge direction: parent -> child.
    for (i, step) in steps.iter().enumerate() {
        let Some(child) = nodes[i] else { continue };
        for &p in &step.parents {
            if let Some(parent) = nodes[p] {
                graph.add_edge(parent, child, ());
            }
        }
    }

    let mut members: Vec<StepId> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| graph.find_edge(n, n).is_some())
        })
        .flatten()
        .map(|n| steps[graph[n]].id.clone())
        .collect();

    members.sort_unstable();
    members
}
