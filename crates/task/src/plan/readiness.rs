//! Readiness tracking while the plan executes

use super::{ExecutionPlan, PlanState};
use crate::graph::TaskId;
use tracing::trace;
use workplan_core::{Error, Result};

impl ExecutionPlan {
    /// Record that `node` has completed.
    ///
    /// Every node waiting on `node` loses the corresponding edge, and nodes
    /// left with no unsatisfied edges become ready. Completing a node that is
    /// not planned, or completing it twice, is rejected.
    pub fn finished_executing(&mut self, node: TaskId) -> Result<()> {
        if self.state != PlanState::Determined {
            return Err(Error::PlanNotDetermined);
        }
        if !self.contains(node) {
            return Err(Error::unplanned_task(self.describe(node)));
        }
        if !self.finished.insert(node) {
            return Err(Error::task_already_finished(self.describe(node)));
        }

        self.ready_to_execute.retain(|ready| *ready != node);
        for edge in self.incoming.shift_remove(&node).unwrap_or_default() {
            let dependent = edge.from;
            let Some(pending) = self.outgoing.get_mut(&dependent) else {
                continue;
            };
            pending.shift_remove(&edge);
            if pending.is_empty() {
                self.outgoing.shift_remove(&dependent);
                if !self.finished.contains(&dependent) {
                    trace!(task = %self.graph.identity_path(dependent), "Task is ready to execute");
                    self.ready_to_execute.push(dependent);
                }
            }
        }
        self.sort_ready_to_execute();
        Ok(())
    }

    /// Whether every planned node has finished executing
    pub fn is_finished(&self) -> bool {
        self.state == PlanState::Determined && self.finished.len() == self.nodes.len()
    }

    fn describe(&self, node: TaskId) -> String {
        self.graph
            .get(node)
            .map(|task| task.identity_path().to_string())
            .unwrap_or_else(|| node.to_string())
    }
}
