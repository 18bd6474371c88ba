//! First planning pass: breaking cycles through should-run-after edges
//!
//! Iterative depth first search from the entry tasks. The work stack holds
//! nodes still to visit; a node stays on it while its successors are
//! processed and is popped again once they are done. When a successor turns
//! out to be on the current path, the most recently walked should-run-after
//! edge on that cycle is dropped and the search rewinds to the node that
//! owned it, as if that edge had never been followed.

use super::Interrupt;
use crate::graph::{EdgeKind, GraphEdge, TaskId, WorkGraph};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

pub(super) struct CycleBreaker<'a> {
    graph: &'a mut WorkGraph,
    removal_limit: Option<usize>,
    /// Work stack, top at the end
    queue: Vec<TaskId>,
    /// Nodes on the current path plus the node being expanded
    visiting: HashSet<TaskId>,
    path: Vec<TaskId>,
    /// Should-run-after edges followed to reach nodes that are still active
    walked_should_edges: Vec<GraphEdge>,
    /// Tentative linear order
    selected: Vec<TaskId>,
    selected_set: HashSet<TaskId>,
    /// Length of `selected` when a node with should successors was entered
    plan_snapshot: HashMap<TaskId, usize>,
    removed: usize,
}

impl<'a> CycleBreaker<'a> {
    pub(super) fn new(graph: &'a mut WorkGraph, removal_limit: Option<usize>) -> Self {
        let queue = graph.entry_tasks().iter().rev().copied().collect();
        Self {
            graph,
            removal_limit,
            queue,
            visiting: HashSet::new(),
            path: Vec::new(),
            walked_should_edges: Vec::new(),
            selected: Vec::new(),
            selected_set: HashSet::new(),
            plan_snapshot: HashMap::new(),
            removed: 0,
        }
    }

    /// Prune the graph until it is cycle free; returns the number of
    /// should-run-after edges removed.
    pub(super) fn run(mut self) -> Result<usize, Interrupt> {
        while let Some(&node) = self.queue.last() {
            if !self.graph.is_included(node) || self.selected_set.contains(&node) {
                self.queue.pop();
                self.visiting.remove(&node);
                self.maybe_pop_walked_should_edge(node);
                continue;
            }

            if !self.visiting.contains(&node) {
                self.enter(node)?;
            } else {
                // Successors are done, the node joins the tentative plan
                self.queue.pop();
                self.maybe_pop_walked_should_edge(node);
                self.visiting.remove(&node);
                self.path.pop();
                self.selected.push(node);
                self.selected_set.insert(node);
            }
        }
        Ok(self.removed)
    }

    fn enter(&mut self, node: TaskId) -> Result<(), Interrupt> {
        self.visiting.insert(node);
        self.record_edge_if_arrived_via_should_run_after(node);

        let visiting = &self.visiting;
        self.graph
            .node_mut(node)
            .retain_should_successors(|successor| !visiting.contains(successor));
        if !self.graph.node(node).should_successors().is_empty() {
            self.plan_snapshot.insert(node, self.selected.len());
        }

        let successors: Vec<TaskId> = self
            .graph
            .node(node)
            .descending_successors()
            .map(|(successor, _)| successor)
            .collect();
        for successor in successors {
            if self.visiting.contains(&successor) {
                return self.break_cycle(node, successor);
            }
            if self.graph.is_included(successor) {
                self.queue.push(successor);
            }
        }
        self.path.push(node);
        Ok(())
    }

    fn record_edge_if_arrived_via_should_run_after(&mut self, node: TaskId) {
        if let Some(&parent) = self.path.last() {
            if self.graph.node(parent).should_successors().contains(&node) {
                self.walked_should_edges
                    .push(GraphEdge::new(parent, node, EdgeKind::ShouldRunAfter));
            }
        }
    }

    fn maybe_pop_walked_should_edge(&mut self, node: TaskId) {
        if self
            .walked_should_edges
            .last()
            .is_some_and(|edge| edge.to == node)
        {
            self.walked_should_edges.pop();
        }
    }

    /// `node` reached `successor`, which is already being visited.
    ///
    /// The cycle runs along the path from `successor` down to `node`. It can
    /// only be broken when the latest walked should-run-after edge starts on
    /// that stretch of the path.
    fn break_cycle(&mut self, node: TaskId, successor: TaskId) -> Result<(), Interrupt> {
        let cycle_start = self
            .path
            .iter()
            .rposition(|&on_path| on_path == successor)
            .unwrap_or(self.path.len());

        let breakable = self.walked_should_edges.last().is_some_and(|edge| {
            self.path
                .iter()
                .rposition(|&on_path| on_path == edge.from)
                .is_some_and(|position| position >= cycle_start)
        });
        let edge = match self.walked_should_edges.pop() {
            Some(edge) if breakable => edge,
            _ => {
                let mut participants = self.path[cycle_start..].to_vec();
                participants.push(node);
                return Err(Interrupt::OrderingCycle { participants });
            }
        };

        self.removed += 1;
        if let Some(limit) = self.removal_limit {
            if self.removed > limit {
                return Err(Interrupt::RemovalLimit { limit });
            }
        }

        debug!(
            from = %self.graph.identity_path(edge.from),
            to = %self.graph.identity_path(edge.to),
            "Removing should-run-after edge to break an ordering cycle"
        );
        self.graph.node_mut(edge.from).remove_should_successor(edge.to);
        self.restore_to_before(edge.from);
        Ok(())
    }

    /// Rewind the search so that `from` is about to be entered again
    fn restore_to_before(&mut self, from: TaskId) {
        while let Some(on_path) = self.path.pop() {
            if on_path == from {
                break;
            }
        }

        while let Some(&queued) = self.queue.last() {
            self.visiting.remove(&queued);
            if queued == from {
                break;
            }
            self.queue.pop();
        }

        // Entering `from` again records its arrival edge again
        self.maybe_pop_walked_should_edge(from);

        let snapshot = self
            .plan_snapshot
            .get(&from)
            .copied()
            .unwrap_or(self.selected.len())
            .min(self.selected.len());
        for dropped in self.selected.drain(snapshot..) {
            trace!(task = %self.graph.identity_path(dropped), "Discarding tentative plan entry");
            self.selected_set.remove(&dropped);
        }
    }
}
