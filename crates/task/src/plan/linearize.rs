//! Second planning pass: numbering nodes and committing edges
//!
//! Runs the same depth first search over the pruned graph. Every followed
//! successor becomes a committed edge, and nodes receive consecutive indices
//! in post order so that a node always comes after everything it waits on.

use super::{ExecutionPlan, Interrupt};
use crate::graph::{GraphEdge, TaskId};
use std::collections::HashSet;
use tracing::trace;

impl ExecutionPlan {
    pub(super) fn linearize(&mut self) -> Result<(), Interrupt> {
        let mut queue: Vec<TaskId> = self.graph.entry_tasks().iter().rev().copied().collect();
        let mut visiting: HashSet<TaskId> = HashSet::new();
        let mut path: Vec<TaskId> = Vec::new();

        while let Some(&node) = queue.last() {
            if !self.graph.is_included(node) || self.node_index.contains_key(&node) {
                queue.pop();
                visiting.remove(&node);
                continue;
            }

            if visiting.insert(node) {
                let successors: Vec<_> = self.graph.node(node).descending_successors().collect();
                for (successor, kind) in successors {
                    if visiting.contains(&successor) {
                        let start = path
                            .iter()
                            .rposition(|&on_path| on_path == successor)
                            .unwrap_or(path.len());
                        let mut participants = path[start..].to_vec();
                        participants.push(node);
                        return Err(Interrupt::OrderingCycle { participants });
                    }
                    if self.graph.is_included(successor) {
                        self.commit_edge(GraphEdge::new(node, successor, kind));
                        queue.push(successor);
                    }
                }
                path.push(node);
            } else {
                queue.pop();
                visiting.remove(&node);
                path.pop();
                self.finalize(node);
            }
        }

        self.sort_ready_to_execute();
        Ok(())
    }

    fn commit_edge(&mut self, edge: GraphEdge) {
        self.outgoing.entry(edge.from).or_default().insert(edge);
        self.incoming.entry(edge.to).or_default().insert(edge);
    }

    fn finalize(&mut self, node: TaskId) {
        let index = self.nodes.len();
        self.nodes.push(node);
        self.node_index.insert(node, index);
        trace!(task = %self.graph.identity_path(node), index, "Planned task");
        if self.is_ready_to_execute(node) {
            self.ready_to_execute.push(node);
        }
    }
}
